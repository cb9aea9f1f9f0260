use serde::{Deserialize, Serialize};

/// Summary statistics of a set of integrated bond strengths.
///
/// `std` is the population standard deviation (no degrees-of-freedom
/// correction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcohpStatistics {
    #[serde(rename = "ICOHP_mean")]
    pub mean: f64,
    #[serde(rename = "ICOHP_sum")]
    pub sum: f64,
    #[serde(rename = "ICOHP_min")]
    pub min: f64,
    #[serde(rename = "ICOHP_max")]
    pub max: f64,
    #[serde(rename = "ICOHP_std")]
    pub std: f64,
}

impl IcohpStatistics {
    /// Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            sum,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std: variance.sqrt(),
        })
    }
}

/// Mean, min, max and population std of a sample, as used by feature tables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Option<Self> {
        IcohpStatistics::from_values(values).map(|s| Summary {
            avg: s.mean,
            min: s.min,
            max: s.max,
            std: s.std,
        })
    }
}
