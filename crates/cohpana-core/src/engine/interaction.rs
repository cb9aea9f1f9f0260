use super::config::ClassificationParams;
use super::error::AnalysisError;
use super::result::{
    BondMember, InteractionCharacter, OrbitalContribution, RelevantBondGroup, SpinResolved,
};
use super::selector::{CandidateBond, Selection};
use super::stats::IcohpStatistics;
use crate::core::models::curve::{BondCurve, CurveKind, CurveStore};
use crate::core::models::spin::Spin;
use std::collections::BTreeMap;
use tracing::debug;

/// Slack on the integration window edges, in eV.
const WINDOW_EPS: f64 = 1e-9;

/// Bonding and antibonding magnitudes of a population below the Fermi level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Integrals {
    pub bonding: f64,
    pub antibonding: f64,
}

impl Integrals {
    fn add(self, other: Integrals) -> Integrals {
        Integrals {
            bonding: self.bonding + other.bonding,
            antibonding: self.antibonding + other.antibonding,
        }
    }

    /// Bonding minus antibonding.
    pub fn net(&self) -> f64 {
        self.bonding - self.antibonding
    }

    fn character(&self) -> InteractionCharacter {
        InteractionCharacter::from_integrals(self.bonding, self.antibonding)
    }
}

/// Integrates `population` over `start <= E - efermi <= 0` with the
/// trapezoid rule, splitting segments at zero crossings.
///
/// `bonding_sign` turns bonding values positive; the positive part of the
/// signed integral is the bonding magnitude and the negative part the
/// antibonding magnitude.
pub fn integrate_below_fermi(
    energies: &[f64],
    population: &[f64],
    efermi: f64,
    start: Option<f64>,
    bonding_sign: f64,
) -> Integrals {
    let lower = start.unwrap_or(f64::NEG_INFINITY);
    let points: Vec<(f64, f64)> = energies
        .iter()
        .zip(population)
        .map(|(&e, &p)| (e - efermi, bonding_sign * p))
        .filter(|&(x, _)| x >= lower - WINDOW_EPS && x <= WINDOW_EPS)
        .collect();

    let mut out = Integrals::default();
    let mut accumulate = |area: f64| {
        if area > 0.0 {
            out.bonding += area;
        } else {
            out.antibonding -= area;
        }
    };

    for w in points.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        let dx = x1 - x0;
        if y0 * y1 < 0.0 {
            let crossing = dx * y0 / (y0 - y1);
            accumulate(0.5 * y0 * crossing);
            accumulate(0.5 * y1 * (dx - crossing));
        } else {
            accumulate(0.5 * (y0 + y1) * dx);
        }
    }
    out
}

fn integrate_curve(
    curve: &BondCurve,
    spin: Option<Spin>,
    kind: CurveKind,
    params: &ClassificationParams,
) -> Option<Integrals> {
    let population = curve.population(spin)?;
    Some(integrate_below_fermi(
        curve.energies(),
        &population,
        curve.efermi(),
        params.integration_start,
        kind.bonding_sign(),
    ))
}

#[derive(Default)]
struct OrbitalAccumulator {
    integrals: Integrals,
    icohps: Vec<f64>,
}

fn build_group(
    center: usize,
    partner_species: &str,
    members: &[&CandidateBond],
    selection: &Selection,
    curves: &CurveStore,
    params: &ClassificationParams,
) -> Result<RelevantBondGroup, AnalysisError> {
    let kind = selection.kind;
    let mut total = Integrals::default();
    let mut up = Integrals::default();
    let mut down: Option<Integrals> = None;
    let mut orbitals: BTreeMap<String, OrbitalAccumulator> = BTreeMap::new();

    for bond in members {
        let curve = curves
            .get(&bond.label)
            .ok_or_else(|| AnalysisError::missing("curve", bond.label.as_str()))?;

        if let Some(i) = integrate_curve(curve, None, kind, params) {
            total = total.add(i);
        }
        if !params.summed_spins {
            if let Some(i) = integrate_curve(curve, Some(Spin::Up), kind, params) {
                up = up.add(i);
            }
            if let Some(i) = integrate_curve(curve, Some(Spin::Down), kind, params) {
                down = Some(down.unwrap_or_default().add(i));
            }
        }

        if params.orbital_resolved {
            for (tag, orbital_curve) in curves.orbitals(&bond.label).into_iter().flatten() {
                let acc = orbitals.entry(tag.clone()).or_default();
                if let Some(i) = integrate_curve(orbital_curve, None, kind, params) {
                    acc.integrals = acc.integrals.add(i);
                }
                let icohp = match bond.orbital_icohps.get(tag) {
                    Some(pair) => Some(pair.total()),
                    None => orbital_curve.integrated_at_fermi(None),
                };
                acc.icohps.extend(icohp);
            }
        }
    }

    let icohps: Vec<f64> = members.iter().map(|b| b.icohp).collect();
    let statistics = IcohpStatistics::from_values(&icohps)
        .ok_or_else(|| AnalysisError::missing("bonds for group", format!("site {center}")))?;

    let character = total.character();
    if character.is_degenerate() {
        debug!(
            site = center,
            partner = partner_species,
            "Bonding and antibonding integrals are both zero; using 0.5/0.5."
        );
    }

    let orbital_data = orbitals
        .into_iter()
        .filter_map(|(tag, acc)| {
            let stats = IcohpStatistics::from_values(&acc.icohps)?;
            let relative_icohp = if statistics.sum != 0.0 {
                stats.sum / statistics.sum
            } else {
                0.0
            };
            Some((
                tag,
                OrbitalContribution {
                    character: acc.integrals.character(),
                    statistics: stats,
                    relative_icohp,
                    number_of_bonds: acc.icohps.len(),
                },
            ))
        })
        .collect();

    let spin_resolved = (!params.summed_spins).then(|| SpinResolved {
        up: up.character(),
        down: down.map(|d| d.character()),
    });

    let mut sorted: Vec<&CandidateBond> = members.to_vec();
    sorted.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.label.cmp(&b.label))
    });
    let members: Vec<BondMember> = sorted
        .iter()
        .map(|b| BondMember {
            label: b.label.clone(),
            partner: format!("{}{}", b.partner_species, b.partner + 1),
            length: b.length,
            icohp: b.icohp,
            strength: b.strength,
            translation: b.translation,
        })
        .collect();

    let central_species = sorted
        .first()
        .map(|b| b.central_species.clone())
        .unwrap_or_default();
    let environment = selection
        .environments
        .get(&center)
        .cloned()
        .ok_or_else(|| AnalysisError::missing("coordination environment", format!("site {center}")))?;

    Ok(RelevantBondGroup {
        central_site: center,
        central_species,
        partner_species: partner_species.to_string(),
        coordination_environment: environment,
        has_antibonding_below_efermi: character.has_antibonding(),
        character,
        statistics,
        number_of_bonds: members.len(),
        bond_labels: members.iter().map(|m| m.label.clone()).collect(),
        members,
        spin_resolved,
        orbital_data,
    })
}

/// Groups the selected bonds by central site and partner species and
/// classifies each group's interaction below the Fermi level.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingData`] if a selected bond has no curve.
pub fn classify(
    selection: &Selection,
    curves: &CurveStore,
    params: &ClassificationParams,
) -> Result<Vec<RelevantBondGroup>, AnalysisError> {
    let mut grouped: BTreeMap<(usize, &str), Vec<&CandidateBond>> = BTreeMap::new();
    for bond in &selection.candidates {
        grouped
            .entry((bond.central, bond.partner_species.as_str()))
            .or_default()
            .push(bond);
    }

    grouped
        .into_iter()
        .map(|((center, partner), members)| {
            build_group(center, partner, &members, selection, curves, params)
        })
        .collect()
}
