use super::spin::{Spin, SpinSeries};
use crate::core::broadening::{BroadeningGridError, ensure_common_grid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of pairwise interaction a curve describes.
///
/// The kind fixes the sign convention: negative COHP values are bonding,
/// while positive COBI and COOP values are bonding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Cohp,
    Cobi,
    Coop,
}

impl CurveKind {
    /// Multiplying a population or integral by this sign makes bonding
    /// contributions positive.
    pub fn bonding_sign(self) -> f64 {
        match self {
            CurveKind::Cohp => -1.0,
            CurveKind::Cobi | CurveKind::Coop => 1.0,
        }
    }

    /// The upper-case tag LOBSTER uses in file headers (e.g., `COHP#`).
    pub fn tag(self) -> &'static str {
        match self {
            CurveKind::Cohp => "COHP",
            CurveKind::Cobi => "COBI",
            CurveKind::Coop => "COOP",
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCurveKindError(pub String);

impl fmt::Display for ParseCurveKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown curve kind '{}' (expected cohp, cobi or coop)", self.0)
    }
}

impl std::error::Error for ParseCurveKindError {}

impl FromStr for CurveKind {
    type Err = ParseCurveKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cohp" => Ok(CurveKind::Cohp),
            "cobi" => Ok(CurveKind::Cobi),
            "coop" => Ok(CurveKind::Coop),
            _ => Err(ParseCurveKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("Curve '{label}' has an empty energy grid")]
    EmptyGrid { label: String },
    #[error("Curve '{label}': {series} series for spin {spin} has {found} points, grid has {expected}")]
    LengthMismatch {
        label: String,
        series: &'static str,
        spin: Spin,
        expected: usize,
        found: usize,
    },
    #[error("Curve '{label}' has a non-ascending energy grid")]
    UnsortedGrid { label: String },
    #[error("Curve '{label}' has a spin-down integral but no spin-down population")]
    SpinMismatch { label: String },
    #[error("No curve with label '{0}'")]
    UnknownLabel(String),
    #[error("Cannot combine an empty set of curves")]
    NothingToCombine,
    #[error(transparent)]
    Grid(#[from] BroadeningGridError),
}

/// A pairwise interaction curve (COHP, COBI or COOP) for one bond.
///
/// Energies are absolute, in eV, and ascending. Every present spin channel of
/// the population and of its cumulative integral has one value per grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct BondCurve {
    label: String,
    energies: Vec<f64>,
    populations: SpinSeries,
    integrated: SpinSeries,
    efermi: f64,
    orbital: Option<String>,
}

impl BondCurve {
    pub fn new(
        label: impl Into<String>,
        energies: Vec<f64>,
        populations: SpinSeries,
        integrated: SpinSeries,
        efermi: f64,
        orbital: Option<String>,
    ) -> Result<Self, CurveError> {
        let label = label.into();
        if energies.is_empty() {
            return Err(CurveError::EmptyGrid { label });
        }
        if energies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CurveError::UnsortedGrid { label });
        }
        if integrated.is_polarized() && !populations.is_polarized() {
            return Err(CurveError::SpinMismatch { label });
        }
        for (name, series) in [("population", &populations), ("integrated", &integrated)] {
            for spin in series.spins() {
                let found = series.get(spin).map_or(0, <[f64]>::len);
                if found != energies.len() {
                    return Err(CurveError::LengthMismatch {
                        label,
                        series: name,
                        spin,
                        expected: energies.len(),
                        found,
                    });
                }
            }
        }

        Ok(Self {
            label,
            energies,
            populations,
            integrated,
            efermi,
            orbital,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn populations(&self) -> &SpinSeries {
        &self.populations
    }

    pub fn integrated(&self) -> &SpinSeries {
        &self.integrated
    }

    pub fn efermi(&self) -> f64 {
        self.efermi
    }

    pub fn orbital(&self) -> Option<&str> {
        self.orbital.as_deref()
    }

    pub fn is_polarized(&self) -> bool {
        self.populations.is_polarized()
    }

    /// Population for one spin channel, or summed over spins for `None`.
    pub fn population(&self, spin: Option<Spin>) -> Option<Vec<f64>> {
        match spin {
            Some(spin) => self.populations.get(spin).map(<[f64]>::to_vec),
            None => Some(self.populations.summed()),
        }
    }

    /// The cumulative integral interpolated linearly at the Fermi level.
    ///
    /// `None` sums over spin channels. Returns `None` for a spin channel the
    /// curve does not have. A Fermi level outside the grid takes the nearest
    /// grid value.
    pub fn integrated_at_fermi(&self, spin: Option<Spin>) -> Option<f64> {
        let values = match spin {
            Some(spin) => self.integrated.get(spin)?.to_vec(),
            None => self.integrated.summed(),
        };
        Some(interpolate(&self.energies, &values, self.efermi))
    }
}

fn interpolate(x: &[f64], y: &[f64], at: f64) -> f64 {
    let last = x.len() - 1;
    if at <= x[0] {
        return y[0];
    }
    if at >= x[last] {
        return y[last];
    }
    let upper = x.partition_point(|&e| e < at);
    let lower = upper - 1;
    let t = (at - x[lower]) / (x[upper] - x[lower]);
    y[lower] + t * (y[upper] - y[lower])
}

/// All curves of one COHPCAR/COBICAR/COOPCAR file, keyed by bond label.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveStore {
    kind: CurveKind,
    curves: BTreeMap<String, BondCurve>,
    orbital_curves: BTreeMap<String, BTreeMap<String, BondCurve>>,
    average: Option<BondCurve>,
}

impl CurveStore {
    pub fn new(kind: CurveKind) -> Self {
        Self {
            kind,
            curves: BTreeMap::new(),
            orbital_curves: BTreeMap::new(),
            average: None,
        }
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Overrides the kind guessed from the file title.
    pub fn set_kind(&mut self, kind: CurveKind) {
        self.kind = kind;
    }

    /// Inserts a curve. Curves carrying an orbital tag are stored under their
    /// bond label as orbital-resolved contributions.
    pub fn insert(&mut self, curve: BondCurve) {
        match curve.orbital.clone() {
            Some(tag) => {
                self.orbital_curves
                    .entry(curve.label.clone())
                    .or_default()
                    .insert(tag, curve);
            }
            None => {
                self.curves.insert(curve.label.clone(), curve);
            }
        }
    }

    pub fn set_average(&mut self, curve: BondCurve) {
        self.average = Some(curve);
    }

    pub fn average(&self) -> Option<&BondCurve> {
        self.average.as_ref()
    }

    pub fn get(&self, label: &str) -> Option<&BondCurve> {
        self.curves.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.curves.contains_key(label)
    }

    /// Orbital-resolved curves of a bond, keyed by orbital-pair tag.
    pub fn orbitals(&self, label: &str) -> Option<&BTreeMap<String, BondCurve>> {
        self.orbital_curves.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Sums the curves of the given bonds point by point.
    ///
    /// All curves must share the energy grid of the first one.
    pub fn summed(&self, labels: &[&str]) -> Result<BondCurve, CurveError> {
        let curves = labels
            .iter()
            .map(|&label| {
                self.get(label)
                    .ok_or_else(|| CurveError::UnknownLabel(label.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        sum_curves(&curves)
    }
}

/// Point-wise sum of curves sharing one energy grid.
pub fn sum_curves(curves: &[&BondCurve]) -> Result<BondCurve, CurveError> {
    let (first, rest) = curves.split_first().ok_or(CurveError::NothingToCombine)?;

    let mut populations = first.populations.clone();
    let mut integrated = first.integrated.clone();
    for curve in rest {
        ensure_common_grid(
            (&first.label, &first.energies),
            (&curve.label, &curve.energies),
        )?;
        populations = populations.add(&curve.populations);
        integrated = integrated.add(&curve.integrated);
    }

    let label = curves
        .iter()
        .map(|c| match &c.orbital {
            Some(tag) => format!("{}[{}]", c.label, tag),
            None => c.label.clone(),
        })
        .collect::<Vec<_>>()
        .join("+");

    BondCurve::new(
        label,
        first.energies.clone(),
        populations,
        integrated,
        first.efermi,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energies() -> Vec<f64> {
        vec![-2.0, -1.0, 0.0, 1.0]
    }

    fn curve(label: &str, pop: f64) -> BondCurve {
        let e = energies();
        let populations = SpinSeries::unpolarized(vec![pop; e.len()]);
        let integrated = SpinSeries::unpolarized(vec![0.0, pop, 2.0 * pop, 3.0 * pop]);
        BondCurve::new(label, e, populations, integrated, 0.0, None).unwrap()
    }

    #[test]
    fn bonding_sign_follows_curve_kind() {
        assert_eq!(CurveKind::Cohp.bonding_sign(), -1.0);
        assert_eq!(CurveKind::Cobi.bonding_sign(), 1.0);
        assert_eq!("COOP".parse::<CurveKind>().unwrap(), CurveKind::Coop);
        assert!("dos".parse::<CurveKind>().is_err());
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let err = BondCurve::new(
            "No.1",
            energies(),
            SpinSeries::unpolarized(vec![0.0; 3]),
            SpinSeries::unpolarized(vec![0.0; 4]),
            0.0,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CurveError::LengthMismatch { expected: 4, found: 3, .. }
        ));
    }

    #[test]
    fn new_rejects_short_spin_down_channel() {
        let err = BondCurve::new(
            "No.1",
            energies(),
            SpinSeries::new(vec![0.0; 4], Some(vec![0.0; 2])),
            SpinSeries::new(vec![0.0; 4], Some(vec![0.0; 4])),
            0.0,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CurveError::LengthMismatch { spin: Spin::Down, .. }
        ));
    }

    #[test]
    fn new_rejects_unsorted_or_empty_grid() {
        let unsorted = BondCurve::new(
            "No.1",
            vec![0.0, -1.0],
            SpinSeries::unpolarized(vec![0.0; 2]),
            SpinSeries::unpolarized(vec![0.0; 2]),
            0.0,
            None,
        );
        assert!(matches!(unsorted, Err(CurveError::UnsortedGrid { .. })));

        let empty = BondCurve::new(
            "No.1",
            vec![],
            SpinSeries::default(),
            SpinSeries::default(),
            0.0,
            None,
        );
        assert!(matches!(empty, Err(CurveError::EmptyGrid { .. })));
    }

    #[test]
    fn integrated_value_is_interpolated_at_fermi() {
        let e = energies();
        let c = BondCurve::new(
            "No.1",
            e,
            SpinSeries::unpolarized(vec![-0.1; 4]),
            SpinSeries::unpolarized(vec![0.0, -0.2, -0.4, -0.6]),
            -0.5,
            None,
        )
        .unwrap();
        assert!((c.integrated_at_fermi(None).unwrap() + 0.3).abs() < 1e-12);
        assert_eq!(c.integrated_at_fermi(Some(Spin::Down)), None);
    }

    #[test]
    fn store_separates_orbital_curves() {
        let mut store = CurveStore::new(CurveKind::Cohp);
        store.insert(curve("No.1", -0.1));
        let mut orbital = curve("No.1", -0.05);
        orbital.orbital = Some("3s-3p".into());
        store.insert(orbital);

        assert_eq!(store.len(), 1);
        assert_eq!(store.orbitals("No.1").map(BTreeMap::len), Some(1));
        assert!(store.orbitals("No.2").is_none());
    }

    #[test]
    fn summed_adds_curves_on_a_common_grid() {
        let mut store = CurveStore::new(CurveKind::Cohp);
        store.insert(curve("No.1", -0.1));
        store.insert(curve("No.2", -0.2));
        let sum = store.summed(&["No.1", "No.2"]).unwrap();
        assert_eq!(sum.label(), "No.1+No.2");
        let pop = sum.population(None).unwrap();
        assert!(pop.iter().all(|p| (p + 0.3).abs() < 1e-12));
    }

    #[test]
    fn summed_rejects_incompatible_grids_and_unknown_labels() {
        let mut store = CurveStore::new(CurveKind::Cohp);
        store.insert(curve("No.1", -0.1));
        let other = BondCurve::new(
            "No.2",
            vec![-2.0, -1.5, -1.0, -0.5],
            SpinSeries::unpolarized(vec![0.0; 4]),
            SpinSeries::unpolarized(vec![0.0; 4]),
            0.0,
            None,
        )
        .unwrap();
        store.insert(other);

        assert!(matches!(
            store.summed(&["No.1", "No.2"]),
            Err(CurveError::Grid(BroadeningGridError::Incompatible { .. }))
        ));
        assert_eq!(
            store.summed(&["No.9"]),
            Err(CurveError::UnknownLabel("No.9".into()))
        );
    }
}
