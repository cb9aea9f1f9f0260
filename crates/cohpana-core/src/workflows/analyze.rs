use crate::core::geometry::SiteClassifier;
use crate::core::io::charge::ChargeFile;
use crate::core::io::cohpcar::CohpcarFile;
use crate::core::io::icohplist::IcohpListFile;
use crate::core::io::madelung::MadelungFile;
use crate::core::io::poscar::PoscarFile;
use crate::core::io::traits::LobsterFile;
use crate::core::models::bonds::BondList;
use crate::core::models::charges::{ChargeTable, MadelungEnergies};
use crate::core::models::curve::{CurveKind, CurveStore};
use crate::core::models::structure::Structure;
use crate::engine::builder::{BuildContext, build};
use crate::engine::config::AnalysisConfig;
use crate::engine::error::AnalysisError;
use crate::engine::interaction::classify;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::CondensedAnalysis;
use crate::engine::selector::select;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Locations of the files one analysis reads.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub poscar: PathBuf,
    pub icohplist: PathBuf,
    pub cohpcar: PathBuf,
    pub charge: Option<PathBuf>,
    pub madelung: Option<PathBuf>,
    /// Forces the curve kind instead of taking it from the bond list header.
    pub kind: Option<CurveKind>,
}

/// Everything an analysis consumes, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInputs {
    pub structure: Structure,
    pub charges: Option<ChargeTable>,
    pub bonds: BondList,
    pub curves: CurveStore,
    pub madelung: Option<MadelungEnergies>,
}

impl AnalysisInputs {
    /// Reads and parses all input files.
    ///
    /// The curve file title does not reliably name its kind, so the curve
    /// store takes the kind of the bond list unless `paths.kind` overrides
    /// both.
    #[instrument(skip_all, name = "load_inputs")]
    pub fn load(paths: &InputPaths) -> Result<Self, AnalysisError> {
        let structure = PoscarFile::read_from_path(&paths.poscar)?;
        let mut bonds = IcohpListFile::read_from_path(&paths.icohplist)?;
        let mut curves = CohpcarFile::read_from_path(&paths.cohpcar)?;
        let charges = paths
            .charge
            .as_ref()
            .map(ChargeFile::read_from_path)
            .transpose()?;
        let madelung = paths
            .madelung
            .as_ref()
            .map(MadelungFile::read_from_path)
            .transpose()?;

        let kind = paths.kind.unwrap_or(bonds.kind);
        if curves.kind() != kind {
            debug!(from = %curves.kind(), to = %kind, "Aligning curve kind with the bond list.");
            curves.set_kind(kind);
        }
        bonds.kind = kind;

        info!(
            sites = structure.len(),
            bonds = bonds.len(),
            curves = curves.len(),
            charges = charges.is_some(),
            madelung = madelung.is_some(),
            "Loaded analysis inputs."
        );
        Ok(Self {
            structure,
            charges,
            bonds,
            curves,
            madelung,
        })
    }
}

/// Runs the full bonding analysis: selection, classification and assembly.
#[instrument(skip_all, name = "analysis_workflow")]
pub fn run(
    inputs: &AnalysisInputs,
    config: &AnalysisConfig,
    classifier: &dyn SiteClassifier,
    reporter: &ProgressReporter,
) -> Result<CondensedAnalysis, AnalysisError> {
    if inputs.bonds.kind != inputs.curves.kind() {
        return Err(AnalysisError::InvalidParameter {
            name: "kind",
            reason: format!(
                "bond list holds {} values but the curves are {}",
                inputs.bonds.kind,
                inputs.curves.kind()
            ),
        });
    }
    info!(
        formula = %inputs.structure.formula(),
        which_bonds = %config.selection.which_bonds,
        cutoff = config.selection.cutoff_icohp,
        "Starting bonding analysis."
    );

    let selection = reporter.phase("Selecting bonds", || {
        select(
            &inputs.structure,
            inputs.charges.as_ref(),
            &inputs.bonds,
            &inputs.curves,
            &config.selection,
            classifier,
        )
    })?;

    let groups = reporter.phase("Classifying interactions", || {
        let centers = selection.centers();
        reporter.report(Progress::SitesStart {
            total: centers.len() as u64,
        });
        let groups = classify(&selection, &inputs.curves, &config.classification);
        for center in centers {
            if let Some(site) = inputs.structure.site(center) {
                reporter.report(Progress::SiteDone { label: site.label() });
            }
        }
        reporter.report(Progress::SitesFinish);
        groups
    })?;

    let analysis = reporter.phase("Building condensed analysis", || {
        let context = BuildContext::new(&selection, config, inputs.madelung);
        build(&inputs.structure, groups, &context)
    });

    info!(
        sites = analysis.sites.0.len(),
        groups = analysis.groups().count(),
        "Analysis complete."
    );
    Ok(analysis)
}
