use crate::core::models::charges::ChargeModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CUTOFF_ICOHP: f64 = 0.1;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid ICOHP cutoff {0}: must be finite and in (0, 1]")]
    InvalidCutoff(f64),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which atom pairs are eligible for the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhichBonds {
    /// Only bonds between a cation and an anion, judged by charge sign.
    #[default]
    CationAnion,
    /// Every pair that has a curve.
    All,
}

impl fmt::Display for WhichBonds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhichBonds::CationAnion => write!(f, "cation-anion"),
            WhichBonds::All => write!(f, "all"),
        }
    }
}

impl FromStr for WhichBonds {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cation-anion" | "cation_anion" => Ok(WhichBonds::CationAnion),
            "all" => Ok(WhichBonds::All),
            other => Err(ConfigError::InvalidParameter {
                name: "which_bonds",
                reason: format!("expected 'cation-anion' or 'all', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionParams {
    pub which_bonds: WhichBonds,
    /// Fraction of the strongest bond of a site a bond must reach to be kept.
    pub cutoff_icohp: f64,
    pub charge_model: ChargeModel,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            which_bonds: WhichBonds::CationAnion,
            cutoff_icohp: DEFAULT_CUTOFF_ICOHP,
            charge_model: ChargeModel::Mulliken,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationParams {
    pub summed_spins: bool,
    pub orbital_resolved: bool,
    /// Lower integration bound relative to the Fermi level, in eV. `None`
    /// integrates from the bottom of the energy grid.
    pub integration_start: Option<f64>,
}

impl Default for ClassificationParams {
    fn default() -> Self {
        Self {
            summed_spins: true,
            orbital_resolved: false,
            integration_start: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalysisConfig {
    pub selection: SelectionParams,
    pub classification: ClassificationParams,
}

pub fn validate_cutoff(cutoff: f64) -> Result<f64, ConfigError> {
    if cutoff.is_finite() && cutoff > 0.0 && cutoff <= 1.0 {
        Ok(cutoff)
    } else {
        Err(ConfigError::InvalidCutoff(cutoff))
    }
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    which_bonds: Option<WhichBonds>,
    cutoff_icohp: Option<f64>,
    charge_model: Option<ChargeModel>,
    summed_spins: Option<bool>,
    orbital_resolved: Option<bool>,
    integration_start: Option<f64>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn which_bonds(mut self, which: WhichBonds) -> Self {
        self.which_bonds = Some(which);
        self
    }
    pub fn cutoff_icohp(mut self, cutoff: f64) -> Self {
        self.cutoff_icohp = Some(cutoff);
        self
    }
    pub fn charge_model(mut self, model: ChargeModel) -> Self {
        self.charge_model = Some(model);
        self
    }
    pub fn summed_spins(mut self, summed: bool) -> Self {
        self.summed_spins = Some(summed);
        self
    }
    pub fn orbital_resolved(mut self, resolved: bool) -> Self {
        self.orbital_resolved = Some(resolved);
        self
    }
    pub fn integration_start(mut self, start: f64) -> Self {
        self.integration_start = Some(start);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();

        let cutoff_icohp = validate_cutoff(
            self.cutoff_icohp
                .unwrap_or(defaults.selection.cutoff_icohp),
        )?;
        if let Some(start) = self.integration_start {
            if !start.is_finite() || start > 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "integration_start",
                    reason: format!("must be finite and not above the Fermi level, got {start}"),
                });
            }
        }

        Ok(AnalysisConfig {
            selection: SelectionParams {
                which_bonds: self.which_bonds.unwrap_or(defaults.selection.which_bonds),
                cutoff_icohp,
                charge_model: self.charge_model.unwrap_or(defaults.selection.charge_model),
            },
            classification: ClassificationParams {
                summed_spins: self
                    .summed_spins
                    .unwrap_or(defaults.classification.summed_spins),
                orbital_resolved: self
                    .orbital_resolved
                    .unwrap_or(defaults.classification.orbital_resolved),
                integration_start: self.integration_start,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let config = AnalysisConfigBuilder::new().build().unwrap();
        assert_eq!(config.selection.cutoff_icohp, 0.1);
        assert_eq!(config.selection.which_bonds, WhichBonds::CationAnion);
        assert_eq!(config.selection.charge_model, ChargeModel::Mulliken);
        assert!(config.classification.summed_spins);
        assert!(!config.classification.orbital_resolved);
        assert_eq!(config.classification.integration_start, None);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = AnalysisConfigBuilder::new()
            .which_bonds(WhichBonds::All)
            .cutoff_icohp(0.3)
            .summed_spins(false)
            .orbital_resolved(true)
            .integration_start(-5.0)
            .charge_model(ChargeModel::Loewdin)
            .build()
            .unwrap();
        assert_eq!(config.selection.which_bonds, WhichBonds::All);
        assert_eq!(config.selection.cutoff_icohp, 0.3);
        assert_eq!(config.selection.charge_model, ChargeModel::Loewdin);
        assert!(!config.classification.summed_spins);
        assert_eq!(config.classification.integration_start, Some(-5.0));
    }

    #[test]
    fn cutoff_outside_unit_interval_is_rejected() {
        for bad in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            let result = AnalysisConfigBuilder::new().cutoff_icohp(bad).build();
            assert!(matches!(result, Err(ConfigError::InvalidCutoff(_))), "{bad}");
        }
        assert!(validate_cutoff(1.0).is_ok());
    }

    #[test]
    fn integration_start_above_fermi_is_rejected() {
        let result = AnalysisConfigBuilder::new().integration_start(1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "integration_start",
                ..
            })
        ));
    }

    #[test]
    fn which_bonds_round_trips_through_text() {
        assert_eq!("all".parse::<WhichBonds>(), Ok(WhichBonds::All));
        assert_eq!(
            "Cation-Anion".parse::<WhichBonds>(),
            Ok(WhichBonds::CationAnion)
        );
        assert_eq!(WhichBonds::CationAnion.to_string(), "cation-anion");
        assert_eq!(
            serde_json::to_string(&WhichBonds::CationAnion).unwrap(),
            "\"cation-anion\""
        );
        assert!("some".parse::<WhichBonds>().is_err());
    }
}
