use super::config::{AnalysisConfig, WhichBonds};
use super::error::AnalysisWarning;
use super::result::{CondensedAnalysis, RelevantBondGroup, SiteAnalysis, SiteMap};
use super::selector::Selection;
use crate::core::models::charges::MadelungEnergies;
use crate::core::models::curve::CurveKind;
use crate::core::models::structure::Structure;
use std::collections::BTreeMap;

/// Global facts about an analysis that the per-site groups do not carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildContext {
    pub which_bonds: WhichBonds,
    pub charges_available: bool,
    pub summed_spins: bool,
    pub kind: CurveKind,
    pub cutoff_icohp: f64,
    pub madelung: Option<MadelungEnergies>,
    pub site_charges: BTreeMap<usize, f64>,
    pub equivalent_sites: BTreeMap<usize, Vec<usize>>,
    pub warnings: Vec<AnalysisWarning>,
}

impl BuildContext {
    pub fn new(
        selection: &Selection,
        config: &AnalysisConfig,
        madelung: Option<MadelungEnergies>,
    ) -> Self {
        let equivalent_sites = selection
            .centers()
            .into_iter()
            .map(|c| (c, selection.equivalence.members(c)))
            .collect();
        Self {
            which_bonds: config.selection.which_bonds,
            charges_available: selection.charges_available,
            summed_spins: config.classification.summed_spins,
            kind: selection.kind,
            cutoff_icohp: config.selection.cutoff_icohp,
            madelung,
            site_charges: selection.site_charges.clone(),
            equivalent_sites,
            warnings: selection.warnings.clone(),
        }
    }
}

/// Assembles the condensed analysis from classified groups.
///
/// Sites appear in ascending structure order. Within a site, groups are
/// ordered by descending magnitude of the mean ICOHP, ties broken by partner
/// species.
pub fn build(
    structure: &Structure,
    groups: Vec<RelevantBondGroup>,
    context: &BuildContext,
) -> CondensedAnalysis {
    let mut by_site: BTreeMap<usize, Vec<RelevantBondGroup>> = BTreeMap::new();
    for group in groups {
        by_site.entry(group.central_site).or_default().push(group);
    }

    let sites = by_site
        .into_iter()
        .filter_map(|(index, mut groups)| {
            let site = structure.site(index)?;
            groups.sort_by(|a, b| {
                b.statistics
                    .mean
                    .abs()
                    .total_cmp(&a.statistics.mean.abs())
                    .then_with(|| a.partner_species.cmp(&b.partner_species))
            });
            let coordination_environment = groups.first()?.coordination_environment.clone();
            Some(SiteAnalysis {
                site_index: index,
                species: site.species.clone(),
                charge: context.site_charges.get(&index).copied(),
                coordination_environment,
                equivalent_sites: context
                    .equivalent_sites
                    .get(&index)
                    .cloned()
                    .unwrap_or_else(|| vec![index]),
                relevant_bonds: groups,
            })
        })
        .collect();

    CondensedAnalysis {
        formula: structure.formula(),
        which_bonds: context.which_bonds,
        charges_available: context.charges_available,
        summed_spins: context.summed_spins,
        kind: context.kind,
        cutoff_icohp: context.cutoff_icohp,
        sites: SiteMap(sites),
        madelung_mulliken: context.madelung.map(|m| m.mulliken),
        madelung_loewdin: context.madelung.map(|m| m.loewdin),
        warnings: context.warnings.clone(),
    }
}
