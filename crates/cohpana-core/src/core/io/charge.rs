use super::error::{FileError, ParseErrorKind};
use super::traits::LobsterFile;
use super::util::{numbered_lines, parse_f64, parse_usize, require_fields};
use crate::core::models::charges::{ChargeTable, SiteCharge};
use std::io::BufRead;

/// Reader for `CHARGE.lobster`.
///
/// Each data row lists the one-based site index, the species and the
/// Mulliken and Löwdin charges. Header, separator and blank lines are skipped.
pub struct ChargeFile;

impl LobsterFile for ChargeFile {
    type Output = ChargeTable;

    fn read_from(reader: &mut impl BufRead) -> Result<ChargeTable, FileError> {
        let mut charges = Vec::new();

        for (line_num, line) in numbered_lines(reader)? {
            let Some(first) = line.split_whitespace().next() else {
                continue;
            };
            if first.parse::<usize>().is_err() {
                continue;
            }

            let fields = require_fields(&line, 4, line_num)?;
            let index = parse_usize(fields[0], "site index", line_num)?;
            if index != charges.len() + 1 {
                return Err(FileError::parse(
                    line_num,
                    ParseErrorKind::InvalidInt {
                        field: "site index",
                        value: fields[0].to_string(),
                    },
                ));
            }
            charges.push(SiteCharge {
                species: fields[1].to_string(),
                mulliken: parse_f64(fields[2], "Mulliken charge", line_num)?,
                loewdin: parse_f64(fields[3], "Loewdin charge", line_num)?,
            });
        }

        if charges.is_empty() {
            return Err(FileError::MissingRecord("charge rows".into()));
        }
        Ok(ChargeTable::new(charges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::charges::ChargeModel;
    use std::io::Cursor;

    const NACL: &str = "\

       #        Atom      Mulliken        Loewdin
 ---------------------------------------------------
       1         Na           0.78           0.68
       2         Cl          -0.78          -0.68
 ---------------------------------------------------
";

    #[test]
    fn reads_both_charge_models() {
        let table = ChargeFile::read_from(&mut Cursor::new(NACL)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.charge(1, ChargeModel::Mulliken), Some(-0.78));
        assert_eq!(table.charge(0, ChargeModel::Loewdin), Some(0.68));
        assert_eq!(table.get(1).map(|c| c.species.as_str()), Some("Cl"));
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let text = "1 Na 0.78 0.68\n3 Cl -0.78 -0.68\n";
        let err = ChargeFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, FileError::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_file_is_missing_records() {
        let err = ChargeFile::read_from(&mut Cursor::new("# Atom Mulliken\n")).unwrap_err();
        assert!(matches!(err, FileError::MissingRecord(_)));
    }
}
