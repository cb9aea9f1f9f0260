use crate::engine::error::AnalysisError;
use crate::engine::result::{CondensedAnalysis, RelevantBondGroup};
use crate::engine::stats::Summary;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

/// One compound's fixed-width feature vector.
///
/// Statistics run over every bond group of every site. Column names and
/// their order are part of the CSV format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub compound: String,

    #[serde(rename = "Icohp_mean_avg")]
    pub icohp_mean_avg: f64,
    #[serde(rename = "Icohp_mean_max")]
    pub icohp_mean_max: f64,
    #[serde(rename = "Icohp_mean_min")]
    pub icohp_mean_min: f64,
    #[serde(rename = "Icohp_mean_std")]
    pub icohp_mean_std: f64,

    #[serde(rename = "Icohp_sum_avg")]
    pub icohp_sum_avg: f64,
    #[serde(rename = "Icohp_sum_max")]
    pub icohp_sum_max: f64,
    #[serde(rename = "Icohp_sum_min")]
    pub icohp_sum_min: f64,
    #[serde(rename = "Icohp_sum_std")]
    pub icohp_sum_std: f64,

    pub bonding_perc_avg: f64,
    pub bonding_perc_max: f64,
    pub bonding_perc_min: f64,
    pub bonding_perc_std: f64,

    pub antibonding_perc_avg: f64,
    pub antibonding_perc_min: f64,
    pub antibonding_perc_max: f64,
    pub antibonding_perc_std: f64,

    #[serde(rename = "Madelung_Mull")]
    pub madelung_mulliken: Option<f64>,
    #[serde(rename = "Madelung_Loew")]
    pub madelung_loewdin: Option<f64>,
}

fn summarize(
    analysis: &CondensedAnalysis,
    id: &str,
    value: impl Fn(&RelevantBondGroup) -> f64,
) -> Result<Summary, AnalysisError> {
    let values: Vec<f64> = analysis.groups().map(value).collect();
    Summary::of(&values).ok_or_else(|| AnalysisError::missing("bond groups", id))
}

/// Reduces a condensed analysis to a feature row labelled `id`.
pub fn featurize(id: &str, analysis: &CondensedAnalysis) -> Result<FeatureRow, AnalysisError> {
    let mean = summarize(analysis, id, |g| g.statistics.mean)?;
    let sum = summarize(analysis, id, |g| g.statistics.sum)?;
    let bonding = summarize(analysis, id, |g| g.character.bonding.perc)?;
    let antibonding = summarize(analysis, id, |g| g.character.antibonding.perc)?;
    debug!(compound = id, groups = analysis.groups().count(), "Featurized analysis.");

    Ok(FeatureRow {
        compound: id.to_string(),
        icohp_mean_avg: mean.avg,
        icohp_mean_max: mean.max,
        icohp_mean_min: mean.min,
        icohp_mean_std: mean.std,
        icohp_sum_avg: sum.avg,
        icohp_sum_max: sum.max,
        icohp_sum_min: sum.min,
        icohp_sum_std: sum.std,
        bonding_perc_avg: bonding.avg,
        bonding_perc_max: bonding.max,
        bonding_perc_min: bonding.min,
        bonding_perc_std: bonding.std,
        antibonding_perc_avg: antibonding.avg,
        antibonding_perc_min: antibonding.min,
        antibonding_perc_max: antibonding.max,
        antibonding_perc_std: antibonding.std,
        madelung_mulliken: analysis.madelung_mulliken,
        madelung_loewdin: analysis.madelung_loewdin,
    })
}

/// Writes rows as CSV with a header line. Missing Madelung energies become
/// empty cells.
pub fn write_csv<W: Write>(rows: &[FeatureRow], writer: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
