use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::ConfigError;
use crate::core::broadening::BroadeningGridError;
use crate::core::io::error::FileError;
use crate::core::models::curve::CurveError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Missing {kind}: '{id}'")]
    MissingData { kind: &'static str, id: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Broadening failed: {0}")]
    BroadeningGrid(#[from] BroadeningGridError),

    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("Input error: {0}")]
    Input(#[from] FileError),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl AnalysisError {
    pub(crate) fn missing(kind: &'static str, id: impl Into<String>) -> Self {
        AnalysisError::MissingData {
            kind,
            id: id.into(),
        }
    }
}

/// A non-fatal condition recorded in the analysis output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// No charges were supplied; every pair was treated as eligible.
    ChargeUnavailable,
}
