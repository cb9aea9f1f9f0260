use nalgebra::{Point3, Vector3};
use std::fmt;
use std::str::FromStr;

/// A single atomic site of a periodic crystal structure.
///
/// Sites are immutable once loaded. The `index` is the zero-based position in
/// the structure file; LOBSTER refers to the same site with a one-based label
/// such as `Na1` or `Cl2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Zero-based index of the site in the structure.
    pub index: usize,
    /// The element symbol (e.g., "Na", "Cl").
    pub species: String,
    /// Position in fractional (direct) coordinates of the lattice.
    pub fractional: Vector3<f64>,
    /// Position in Cartesian coordinates in Angstroms.
    pub cartesian: Point3<f64>,
}

impl Site {
    pub fn new(
        index: usize,
        species: impl Into<String>,
        fractional: Vector3<f64>,
        cartesian: Point3<f64>,
    ) -> Self {
        Self {
            index,
            species: species.into(),
            fractional,
            cartesian,
        }
    }

    /// Returns the LOBSTER-style label of this site, `<Species><index + 1>`.
    pub fn label(&self) -> String {
        format!("{}{}", self.species, self.index + 1)
    }
}

/// A parsed LOBSTER site label (e.g., `Na1`), optionally carrying the orbital
/// suffix used by orbital-resolved files (e.g., `Na1[3s]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteLabel {
    /// The element symbol.
    pub species: String,
    /// The zero-based site index.
    pub index: usize,
    /// The orbital name if the label was orbital-resolved.
    pub orbital: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSiteLabelError(pub String);

impl fmt::Display for ParseSiteLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid site label '{}'", self.0)
    }
}

impl std::error::Error for ParseSiteLabelError {}

impl FromStr for SiteLabel {
    type Err = ParseSiteLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSiteLabelError(s.to_string());
        let s_trim = s.trim();

        let (base, orbital) = match s_trim.split_once('[') {
            Some((base, rest)) => {
                let orbital = rest.strip_suffix(']').ok_or_else(err)?;
                if orbital.is_empty() {
                    return Err(err());
                }
                (base, Some(orbital.to_string()))
            }
            None => (s_trim, None),
        };

        let split = base
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(err)?;
        let (species, number) = base.split_at(split);
        if species.is_empty() || !species.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(err());
        }
        let number: usize = number.parse().map_err(|_| err())?;
        if number == 0 {
            return Err(err());
        }

        Ok(SiteLabel {
            species: species.to_string(),
            index: number - 1,
            orbital,
        })
    }
}

impl fmt::Display for SiteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.species, self.index + 1)?;
        if let Some(orbital) = &self.orbital {
            write!(f, "[{}]", orbital)?;
        }
        Ok(())
    }
}
