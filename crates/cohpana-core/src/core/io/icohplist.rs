use super::error::{FileError, ParseErrorKind};
use super::traits::LobsterFile;
use super::util::{normalize_bond_label, numbered_lines, parse_f64, parse_i32};
use crate::core::models::bonds::{BondList, IcohpEntry};
use crate::core::models::curve::CurveKind;
use crate::core::models::site::SiteLabel;
use crate::core::models::spin::{Spin, SpinPair};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use tracing::debug;

/// Reader for `ICOHPLIST.lobster`, `ICOBILIST.lobster` and `ICOOPLIST.lobster`.
///
/// Supported row layouts, by number of fields:
///
/// - 5: label, atom 1, atom 2, distance, value
/// - 6: label, atom 1, atom 2, distance, value, number of bonds (LOBSTER 2.x)
/// - 8: label, atom 1, atom 2, distance, translation (3 ints), value
///
/// A second header mentioning spin 2 starts the spin-down block. Rows whose
/// atoms carry an orbital suffix (e.g., `Na1[3s]`) are orbital-resolved
/// contributions to the preceding bond with the same label.
pub struct IcohpListFile;

struct Row {
    label: String,
    atom1: SiteLabel,
    atom2: SiteLabel,
    length: f64,
    translation: Option<[i32; 3]>,
    value: f64,
}

fn parse_header(line: &str, line_num: usize) -> Result<(CurveKind, Spin), FileError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let kind = tokens
        .iter()
        .find_map(|t| t.strip_suffix('#'))
        .and_then(|t| t.parse::<CurveKind>().ok())
        .ok_or_else(|| {
            FileError::parse(line_num, ParseErrorKind::UnrecognizedHeader(line.trim().to_string()))
        })?;
    let spin = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case("spin"))
        .and_then(|i| tokens.get(i + 1))
        .map_or(Spin::Up, |t| if *t == "2" { Spin::Down } else { Spin::Up });
    Ok((kind, spin))
}

fn parse_site(token: &str, line_num: usize) -> Result<SiteLabel, FileError> {
    token
        .parse()
        .map_err(|_| FileError::parse(line_num, ParseErrorKind::InvalidSiteLabel(token.to_string())))
}

fn parse_row(line: &str, line_num: usize) -> Result<Row, FileError> {
    let f: Vec<&str> = line.split_whitespace().collect();
    let (translation, value) = match f.len() {
        5 | 6 => (None, f[4]),
        8 => (
            Some([
                parse_i32(f[4], "translation", line_num)?,
                parse_i32(f[5], "translation", line_num)?,
                parse_i32(f[6], "translation", line_num)?,
            ]),
            f[7],
        ),
        found => {
            return Err(FileError::parse(
                line_num,
                ParseErrorKind::UnexpectedFieldCount { found },
            ));
        }
    };

    let label = normalize_bond_label(f[0]);
    if label.is_empty() {
        return Err(FileError::parse(
            line_num,
            ParseErrorKind::InvalidBondLabel(f[0].to_string()),
        ));
    }

    Ok(Row {
        label: label.to_string(),
        atom1: parse_site(f[1], line_num)?,
        atom2: parse_site(f[2], line_num)?,
        length: parse_f64(f[3], "distance", line_num)?,
        translation,
        value: parse_f64(value, "integrated value", line_num)?,
    })
}

fn orbital_tag(row: &Row) -> Option<String> {
    match (&row.atom1.orbital, &row.atom2.orbital) {
        (Some(a), Some(b)) => Some(format!("{a}-{b}")),
        _ => None,
    }
}

fn strip_orbital(label: &SiteLabel) -> String {
    format!("{}{}", label.species, label.index + 1)
}

impl LobsterFile for IcohpListFile {
    type Output = BondList;

    fn read_from(reader: &mut impl BufRead) -> Result<BondList, FileError> {
        let mut kind: Option<CurveKind> = None;
        let mut spin = Spin::Up;
        let mut saw_spin_down = false;
        let mut entries: Vec<IcohpEntry> = Vec::new();
        let mut by_label: HashMap<String, usize> = HashMap::new();

        for (line_num, line) in numbered_lines(reader)? {
            if line.trim().is_empty() {
                continue;
            }
            if line.contains('#') {
                let (header_kind, header_spin) = parse_header(&line, line_num)?;
                if kind.is_some_and(|k| k != header_kind) {
                    return Err(FileError::Inconsistency(format!(
                        "file mixes {} and {} headers",
                        kind.map_or("?", CurveKind::tag),
                        header_kind
                    )));
                }
                kind = Some(header_kind);
                spin = header_spin;
                saw_spin_down |= spin == Spin::Down;
                continue;
            }
            if kind.is_none() {
                return Err(FileError::MissingRecord("COHP#/COBI#/COOP# header".into()));
            }

            let row = parse_row(&line, line_num)?;
            let tag = orbital_tag(&row);

            match (spin, tag) {
                (Spin::Up, None) => {
                    if by_label.contains_key(&row.label) {
                        return Err(FileError::Inconsistency(format!(
                            "bond label '{}' is listed twice",
                            row.label
                        )));
                    }
                    by_label.insert(row.label.clone(), entries.len());
                    entries.push(IcohpEntry {
                        label: row.label.clone(),
                        atom1: strip_orbital(&row.atom1),
                        atom2: strip_orbital(&row.atom2),
                        length: row.length,
                        translation: row.translation,
                        values: SpinPair::new(row.value, None),
                        orbitals: BTreeMap::new(),
                    });
                }
                (Spin::Up, Some(tag)) => {
                    let entry = parent_entry(&mut entries, &by_label, &row.label)?;
                    entry.orbitals.insert(tag, SpinPair::new(row.value, None));
                }
                (Spin::Down, None) => {
                    let entry = parent_entry(&mut entries, &by_label, &row.label)?;
                    entry.values.down = Some(row.value);
                }
                (Spin::Down, Some(tag)) => {
                    let entry = parent_entry(&mut entries, &by_label, &row.label)?;
                    let pair = entry.orbitals.get_mut(&tag).ok_or_else(|| {
                        FileError::Inconsistency(format!(
                            "spin-down orbital pair '{}' of bond '{}' has no spin-up row",
                            tag, row.label
                        ))
                    })?;
                    pair.down = Some(row.value);
                }
            }
        }

        let kind = kind.ok_or_else(|| FileError::MissingRecord("COHP#/COBI#/COOP# header".into()))?;
        if saw_spin_down {
            if let Some(entry) = entries.iter().find(|e| e.values.down.is_none()) {
                return Err(FileError::Inconsistency(format!(
                    "bond '{}' has no spin-down value",
                    entry.label
                )));
            }
        }

        debug!(kind = %kind, bonds = entries.len(), polarized = saw_spin_down, "Parsed integrated bond list.");
        Ok(BondList { kind, entries })
    }
}

fn parent_entry<'a>(
    entries: &'a mut [IcohpEntry],
    by_label: &HashMap<String, usize>,
    label: &str,
) -> Result<&'a mut IcohpEntry, FileError> {
    by_label
        .get(label)
        .and_then(|&i| entries.get_mut(i))
        .ok_or_else(|| FileError::Inconsistency(format!("bond '{label}' has no spin-up row")))
}
