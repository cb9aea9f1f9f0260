use super::error::{FileError, ParseErrorKind};
use super::traits::LobsterFile;
use super::util::{numbered_lines, parse_f64, parse_usize, require_fields};
use crate::core::models::structure::Structure;
use nalgebra::{Matrix3, Vector3};
use std::io::BufRead;

/// Reader for VASP POSCAR/CONTCAR structure files.
///
/// Both the VASP 4 layout (species names taken from the comment line) and the
/// VASP 5 layout (species line above the counts) are accepted, as are a
/// negative scale factor (target cell volume), selective dynamics flags and
/// Cartesian coordinates.
pub struct PoscarFile;

impl LobsterFile for PoscarFile {
    type Output = Structure;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, FileError> {
        let lines = numbered_lines(reader)?;
        let mut lines = lines.into_iter().filter(|(_, l)| !l.trim().is_empty());
        let mut next = |what: &str| {
            lines
                .next()
                .ok_or_else(|| FileError::MissingRecord(what.to_string()))
        };

        let (_, comment) = next("comment line")?;
        let (scale_line, scale_text) = next("scale factor")?;
        let scale_fields = require_fields(&scale_text, 1, scale_line)?;
        let scale = parse_f64(scale_fields[0], "scale factor", scale_line)?;

        let mut rows = [Vector3::zeros(); 3];
        for row in rows.iter_mut() {
            let (n, text) = next("lattice vector")?;
            let f = require_fields(&text, 3, n)?;
            *row = Vector3::new(
                parse_f64(f[0], "lattice vector", n)?,
                parse_f64(f[1], "lattice vector", n)?,
                parse_f64(f[2], "lattice vector", n)?,
            );
        }
        let mut lattice = Matrix3::from_columns(&rows);

        let factor = if scale < 0.0 {
            let volume = lattice.determinant().abs();
            if volume == 0.0 {
                return Err(FileError::Inconsistency("lattice vectors are degenerate".into()));
            }
            (scale.abs() / volume).cbrt()
        } else {
            scale
        };
        lattice *= factor;

        let (mut line_no, mut text) = next("species counts")?;
        let first = text.split_whitespace().next().unwrap_or_default();
        let species: Vec<String> = if first.parse::<usize>().is_ok() {
            comment
                .split_whitespace()
                .map(str::to_string)
                .collect()
        } else {
            let names = text.split_whitespace().map(str::to_string).collect();
            (line_no, text) = next("species counts")?;
            names
        };

        let counts = text
            .split_whitespace()
            .map(|t| parse_usize(t, "species count", line_no))
            .collect::<Result<Vec<_>, _>>()?;
        if species.len() < counts.len() {
            return Err(FileError::MissingRecord(format!(
                "species names for {} species counts",
                counts.len()
            )));
        }

        let (mut mode_line, mut mode) = next("coordinate mode")?;
        if mode.trim_start().starts_with(['S', 's']) {
            (mode_line, mode) = next("coordinate mode")?;
        }
        let cartesian = match mode.trim_start().chars().next() {
            Some('C' | 'c' | 'K' | 'k') => true,
            Some('D' | 'd') => false,
            _ => {
                return Err(FileError::parse(
                    mode_line,
                    ParseErrorKind::UnrecognizedHeader(mode.trim().to_string()),
                ));
            }
        };

        let inverse = lattice
            .try_inverse()
            .ok_or_else(|| FileError::Inconsistency("lattice matrix is singular".into()))?;

        let total: usize = counts.iter().sum();
        let mut sites = Vec::with_capacity(total);
        for (name, &count) in species.iter().zip(&counts) {
            for _ in 0..count {
                let (n, text) = next("atomic position")?;
                let f = require_fields(&text, 3, n)?;
                let v = Vector3::new(
                    parse_f64(f[0], "coordinate", n)?,
                    parse_f64(f[1], "coordinate", n)?,
                    parse_f64(f[2], "coordinate", n)?,
                );
                let fractional = if cartesian { inverse * (v * factor) } else { v };
                sites.push((name.clone(), fractional));
            }
        }

        Ok(Structure::from_fractional(lattice, sites))
    }
}
