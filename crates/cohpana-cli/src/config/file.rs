use crate::error::{CliError, Result};
use cohpana::core::models::charges::ChargeModel;
use cohpana::core::models::curve::CurveKind;
use cohpana::engine::config::WhichBonds;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAnalysisConfig {
    pub which_bonds: Option<WhichBonds>,
    pub cutoff_icohp: Option<f64>,
    pub charge_model: Option<ChargeModel>,
    pub summed_spins: Option<bool>,
    pub orbital_resolved: Option<bool>,
    pub integration_start: Option<f64>,
    pub curve_kind: Option<CurveKind>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub analysis: Option<FileAnalysisConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::file(path, e))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
