use super::error::{FileError, ParseErrorKind};
use super::traits::LobsterFile;
use super::util::{normalize_bond_label, numbered_lines, parse_f64, parse_usize, require_fields};
use crate::core::models::curve::{BondCurve, CurveError, CurveKind, CurveStore};
use crate::core::models::site::SiteLabel;
use crate::core::models::spin::SpinSeries;
use std::io::BufRead;
use tracing::debug;

/// Reader for `COHPCAR.lobster`, `COBICAR.lobster` and `COOPCAR.lobster`.
///
/// Layout:
///
/// 1. Title line. Mentions of `COBI` or `COOP` select the curve kind,
///    otherwise COHP is assumed.
/// 2. Column count (bonds plus the average), spin count, number of energy
///    points, energy range and Fermi energy.
/// 3. The `Average` label, then one label per column such as
///    `No.1:Na1->Cl2(2.84436)` or `No.1:Na1[3s]->Cl2[3p_x](2.84436)`.
/// 4. One row per energy: the energy relative to the Fermi level, then a
///    (population, integrated) pair per column for spin up, followed by the
///    same block for spin down in polarized files.
///
/// Energies are stored absolute, i.e. shifted by the Fermi energy.
pub struct CohpcarFile;

struct ColumnLabel {
    bond: String,
    orbital: Option<String>,
}

fn parse_column_label(text: &str, line_num: usize) -> Result<ColumnLabel, FileError> {
    let invalid = || FileError::parse(line_num, ParseErrorKind::InvalidBondLabel(text.trim().to_string()));

    let (number, pair) = text.trim().split_once(':').ok_or_else(invalid)?;
    let bond = normalize_bond_label(number);
    if bond.is_empty() {
        return Err(invalid());
    }
    let pair = pair.split('(').next().unwrap_or_default();
    let (a, b) = pair.split_once("->").ok_or_else(invalid)?;
    let a: SiteLabel = a.parse().map_err(|_| invalid())?;
    let b: SiteLabel = b.parse().map_err(|_| invalid())?;

    let orbital = match (a.orbital, b.orbital) {
        (Some(x), Some(y)) => Some(format!("{x}-{y}")),
        (None, None) => None,
        _ => return Err(invalid()),
    };
    Ok(ColumnLabel {
        bond: bond.to_string(),
        orbital,
    })
}

fn kind_from_title(title: &str) -> CurveKind {
    let upper = title.to_ascii_uppercase();
    if upper.contains("COBI") {
        CurveKind::Cobi
    } else if upper.contains("COOP") {
        CurveKind::Coop
    } else {
        CurveKind::Cohp
    }
}

impl LobsterFile for CohpcarFile {
    type Output = CurveStore;

    fn read_from(reader: &mut impl BufRead) -> Result<CurveStore, FileError> {
        let lines = numbered_lines(reader)?;
        let mut lines = lines.into_iter();
        let mut next = |what: &str| {
            lines
                .next()
                .ok_or_else(|| FileError::MissingRecord(what.to_string()))
        };

        let (_, title) = next("title line")?;
        let kind = kind_from_title(&title);

        let (param_line, params) = next("parameter line")?;
        let p = require_fields(&params, 6, param_line)?;
        let n_columns = parse_usize(p[0], "column count", param_line)?;
        let n_spins = parse_usize(p[1], "spin count", param_line)?;
        let n_points = parse_usize(p[2], "energy point count", param_line)?;
        let efermi = parse_f64(p[p.len() - 1], "Fermi energy", param_line)?;
        if n_columns == 0 {
            return Err(FileError::parse(
                param_line,
                ParseErrorKind::InvalidInt {
                    field: "column count",
                    value: p[0].to_string(),
                },
            ));
        }
        let polarized = match n_spins {
            1 => false,
            2 => true,
            _ => {
                return Err(FileError::parse(
                    param_line,
                    ParseErrorKind::InvalidInt {
                        field: "spin count",
                        value: p[1].to_string(),
                    },
                ));
            }
        };

        let (avg_line, avg) = next("Average label")?;
        if !avg.trim().eq_ignore_ascii_case("average") {
            return Err(FileError::parse(
                avg_line,
                ParseErrorKind::UnrecognizedHeader(avg.trim().to_string()),
            ));
        }
        let mut columns = Vec::with_capacity(n_columns - 1);
        for _ in 1..n_columns {
            let (n, text) = next("bond label")?;
            columns.push(parse_column_label(&text, n)?);
        }

        let n_spin_blocks = if polarized { 2 } else { 1 };
        let expected_fields = 1 + 2 * n_columns * n_spin_blocks;
        let mut energies = Vec::with_capacity(n_points);
        let mut data = vec![Vec::with_capacity(n_points); 2 * n_columns * n_spin_blocks];
        for _ in 0..n_points {
            let (n, text) = next("energy row")?;
            let f: Vec<&str> = text.split_whitespace().collect();
            if f.len() != expected_fields {
                return Err(FileError::parse(
                    n,
                    ParseErrorKind::UnexpectedFieldCount { found: f.len() },
                ));
            }
            energies.push(parse_f64(f[0], "energy", n)? + efermi);
            for (column, token) in data.iter_mut().zip(&f[1..]) {
                column.push(parse_f64(token, "population", n)?);
            }
        }

        let block = 2 * n_columns;
        let series = |column: usize, offset: usize| {
            let up = data[2 * column + offset].clone();
            let down = polarized.then(|| data[block + 2 * column + offset].clone());
            SpinSeries::new(up, down)
        };
        let curve = |label: &str, orbital: Option<String>, column: usize| {
            BondCurve::new(label, energies.clone(), series(column, 0), series(column, 1), efermi, orbital)
                .map_err(|e: CurveError| FileError::Inconsistency(e.to_string()))
        };

        let mut store = CurveStore::new(kind);
        store.set_average(curve("Average", None, 0)?);
        for (i, column) in columns.into_iter().enumerate() {
            if column.orbital.is_some() && !store.contains(&column.bond) {
                return Err(FileError::Inconsistency(format!(
                    "orbital-resolved curve of bond '{}' precedes the bond itself",
                    column.bond
                )));
            }
            store.insert(curve(&column.bond, column.orbital, i + 1)?);
        }

        debug!(kind = %kind, bonds = store.len(), points = n_points, polarized, "Parsed curve file.");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::spin::Spin;
    use std::io::Cursor;

    fn two_bond_file() -> String {
        let mut text = String::from("COHPCAR.lobster\n");
        text.push_str("       4       1       3     -1.000      1.000      2.000\n");
        text.push_str("Average\n");
        text.push_str("No.1:Na1->Cl2(2.84500)\n");
        text.push_str("No.1:Na1[3s]->Cl2[3p_x](2.84500)\n");
        text.push_str("No.2:Na1->Cl2(2.84500)\n");
        for (e, p) in [(-1.0, -0.1), (0.0, -0.2), (1.0, 0.3)] {
            text.push_str(&format!(
                "{e} {p} {p} {p} {p} {p} {p} {p} {p}\n"
            ));
        }
        text
    }

    #[test]
    fn reads_bonds_orbitals_and_average() {
        let store = CohpcarFile::read_from(&mut Cursor::new(two_bond_file())).unwrap();
        assert_eq!(store.kind(), CurveKind::Cohp);
        assert_eq!(store.len(), 2);
        assert!(store.average().is_some());
        let orbitals = store.orbitals("1").unwrap();
        assert!(orbitals.contains_key("3s-3p_x"));

        let c = store.get("2").unwrap();
        assert_eq!(c.energies(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.efermi(), 2.0);
        assert_eq!(c.populations().get(Spin::Up), Some(&[-0.1, -0.2, 0.3][..]));
        assert!(!c.is_polarized());
    }

    #[test]
    fn reads_spin_polarized_columns() {
        let mut text = String::from("COBICAR.lobster\n");
        text.push_str(" 2 2 2 -1.0 0.0 0.0\nAverage\nNo.1:Na1->Cl2(2.8)\n");
        text.push_str("-1.0 0 0 0.1 0.01 0 0 0.2 0.02\n");
        text.push_str(" 0.0 0 0 0.3 0.03 0 0 0.4 0.04\n");
        let store = CohpcarFile::read_from(&mut Cursor::new(text)).unwrap();
        assert_eq!(store.kind(), CurveKind::Cobi);
        let c = store.get("1").unwrap();
        assert_eq!(c.populations().get(Spin::Down), Some(&[0.2, 0.4][..]));
        assert_eq!(c.integrated().get(Spin::Up), Some(&[0.01, 0.03][..]));
    }

    #[test]
    fn wrong_row_width_is_a_parse_error() {
        let text = "COHPCAR\n 2 1 1 -1 0 0\nAverage\nNo.1:Na1->Cl2(2.8)\n0.0 0 0 0.1\n";
        let err = CohpcarFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            FileError::Parse {
                line: 5,
                kind: ParseErrorKind::UnexpectedFieldCount { found: 4 }
            }
        ));
    }

    #[test]
    fn truncated_file_is_missing_rows() {
        let text = "COHPCAR\n 2 1 2 -1 0 0\nAverage\nNo.1:Na1->Cl2(2.8)\n0.0 0 0 0.1 0.1\n";
        let err = CohpcarFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(err, FileError::MissingRecord(_)));
    }

    #[test]
    fn malformed_label_is_rejected() {
        let text = "COHPCAR\n 2 1 1 -1 0 0\nAverage\nNa1-Cl2\n0.0 0 0 0.1 0.1\n";
        let err = CohpcarFile::read_from(&mut Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            FileError::Parse {
                kind: ParseErrorKind::InvalidBondLabel(_),
                ..
            }
        ));
    }
}
