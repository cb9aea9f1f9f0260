use super::error::FileError;
use super::traits::LobsterFile;
use super::util::{numbered_lines, parse_f64};
use crate::core::models::charges::MadelungEnergies;
use std::io::BufRead;

/// Reader for `MadelungEnergies.lobster`.
///
/// The energies are taken from the last row consisting only of numbers:
/// Ewald splitting, Mulliken and Löwdin Madelung energies. Older files without
/// the Ewald column carry only the two energies.
pub struct MadelungFile;

impl LobsterFile for MadelungFile {
    type Output = MadelungEnergies;

    fn read_from(reader: &mut impl BufRead) -> Result<MadelungEnergies, FileError> {
        let mut last = None;
        for (line_num, line) in numbered_lines(reader)? {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() >= 2 && fields.iter().all(|f| f.parse::<f64>().is_ok()) {
                last = Some((line_num, line.clone()));
            }
        }

        let (line_num, line) =
            last.ok_or_else(|| FileError::MissingRecord("Madelung energy row".into()))?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let values = fields
            .iter()
            .map(|f| parse_f64(f, "Madelung energy", line_num))
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [mulliken, loewdin] => Ok(MadelungEnergies {
                ewald_splitting: None,
                mulliken: *mulliken,
                loewdin: *loewdin,
            }),
            [.., ewald, mulliken, loewdin] => Ok(MadelungEnergies {
                ewald_splitting: Some(*ewald),
                mulliken: *mulliken,
                loewdin: *loewdin,
            }),
            _ => Err(FileError::MissingRecord("Madelung energy row".into())),
        }
    }
}
