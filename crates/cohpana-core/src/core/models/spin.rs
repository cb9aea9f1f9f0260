use serde::{Deserialize, Serialize};
use std::fmt;

/// A spin channel of a (possibly spin-polarized) calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spin {
    Up,
    Down,
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spin::Up => write!(f, "up"),
            Spin::Down => write!(f, "down"),
        }
    }
}

/// A per-spin series of values aligned to an energy grid.
///
/// The spin-up channel is always present; the spin-down channel exists only
/// for spin-polarized calculations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpinSeries {
    up: Vec<f64>,
    down: Option<Vec<f64>>,
}

impl SpinSeries {
    pub fn new(up: Vec<f64>, down: Option<Vec<f64>>) -> Self {
        Self { up, down }
    }

    pub fn unpolarized(up: Vec<f64>) -> Self {
        Self { up, down: None }
    }

    pub fn get(&self, spin: Spin) -> Option<&[f64]> {
        match spin {
            Spin::Up => Some(&self.up),
            Spin::Down => self.down.as_deref(),
        }
    }

    pub fn is_polarized(&self) -> bool {
        self.down.is_some()
    }

    /// Spin channels present in this series, spin-up first.
    pub fn spins(&self) -> Vec<Spin> {
        if self.is_polarized() {
            vec![Spin::Up, Spin::Down]
        } else {
            vec![Spin::Up]
        }
    }

    /// Sum over all spin channels, point by point.
    pub fn summed(&self) -> Vec<f64> {
        match &self.down {
            Some(down) => self.up.iter().zip(down).map(|(u, d)| u + d).collect(),
            None => self.up.clone(),
        }
    }

    /// Returns `Some(len)` if every channel has the same length.
    pub(crate) fn common_len(&self) -> Option<usize> {
        match &self.down {
            Some(down) if down.len() != self.up.len() => None,
            _ => Some(self.up.len()),
        }
    }

    /// Point-wise sum of two series. Channels missing in either operand are
    /// dropped from the result.
    pub(crate) fn add(&self, other: &SpinSeries) -> SpinSeries {
        let up = self.up.iter().zip(&other.up).map(|(a, b)| a + b).collect();
        let down = match (&self.down, &other.down) {
            (Some(a), Some(b)) => Some(a.iter().zip(b).map(|(x, y)| x + y).collect()),
            _ => None,
        };
        SpinSeries { up, down }
    }
}

/// A scalar value per spin channel, e.g. an ICOHP at the Fermi level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpinPair {
    pub up: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<f64>,
}

impl SpinPair {
    pub fn new(up: f64, down: Option<f64>) -> Self {
        Self { up, down }
    }

    pub fn get(&self, spin: Spin) -> Option<f64> {
        match spin {
            Spin::Up => Some(self.up),
            Spin::Down => self.down,
        }
    }

    pub fn total(&self) -> f64 {
        self.up + self.down.unwrap_or(0.0)
    }
}
