use super::config::{SelectionParams, WhichBonds, validate_cutoff};
use super::error::{AnalysisError, AnalysisWarning};
use crate::core::geometry::{EquivalenceClasses, SiteClassifier};
use crate::core::models::bonds::{BondList, IcohpEntry};
use crate::core::models::charges::ChargeTable;
use crate::core::models::curve::{CurveKind, CurveStore};
use crate::core::models::environment::CoordinationEnvironment;
use crate::core::models::spin::SpinPair;
use crate::core::models::structure::Structure;
use nalgebra::Vector3;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Largest mismatch between a listed bond length and a lattice image distance.
const IMAGE_LENGTH_TOLERANCE: f64 = 1e-2;
/// Largest difference of mean strengths for two sites to count as equivalent.
const SIGNATURE_TOLERANCE: f64 = 1e-3;

/// A bond seen from one central site.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateBond {
    /// Bond label shared by the bond list and the curve store.
    pub label: String,
    pub central: usize,
    pub partner: usize,
    pub central_species: String,
    pub partner_species: String,
    pub length: f64,
    /// Lattice translation of the partner image, oriented from the central site.
    pub translation: Option<[i32; 3]>,
    /// Integrated value at the Fermi level, summed over spins.
    pub icohp: f64,
    pub icohp_by_spin: SpinPair,
    pub orbital_icohps: BTreeMap<String, SpinPair>,
    /// `icohp` times the bonding sign of the curve kind; positive is bonding.
    pub strength: f64,
}

/// The bonds kept for each central site, plus what the selector learnt about
/// the sites on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kind: CurveKind,
    pub candidates: Vec<CandidateBond>,
    pub environments: BTreeMap<usize, CoordinationEnvironment>,
    pub equivalence: EquivalenceClasses,
    /// Charges of the central sites under the configured charge model.
    pub site_charges: BTreeMap<usize, f64>,
    pub charges_available: bool,
    pub warnings: Vec<AnalysisWarning>,
}

impl Selection {
    /// Central sites in ascending order.
    pub fn centers(&self) -> Vec<usize> {
        self.environments.keys().copied().collect()
    }

    pub fn bonds_of(&self, center: usize) -> impl Iterator<Item = &CandidateBond> {
        self.candidates.iter().filter(move |c| c.central == center)
    }
}

struct ResolvedEntry<'a> {
    entry: &'a IcohpEntry,
    atom1: usize,
    atom2: usize,
}

fn resolve_entries<'a>(
    structure: &Structure,
    bonds: &'a BondList,
    curves: &CurveStore,
) -> Result<Vec<ResolvedEntry<'a>>, AnalysisError> {
    bonds
        .entries
        .iter()
        .map(|entry| {
            let site = |label: &str| {
                structure
                    .site_by_label(label)
                    .map(|s| s.index)
                    .ok_or_else(|| AnalysisError::missing("site", label))
            };
            let atom1 = site(&entry.atom1)?;
            let atom2 = site(&entry.atom2)?;
            if !curves.contains(&entry.label) {
                return Err(AnalysisError::missing("curve", entry.label.as_str()));
            }
            Ok(ResolvedEntry {
                entry,
                atom1,
                atom2,
            })
        })
        .collect()
}

fn orient(
    resolved: &ResolvedEntry<'_>,
    center: usize,
    structure: &Structure,
    kind: CurveKind,
) -> Option<CandidateBond> {
    let (partner, translation) = if resolved.atom1 == center {
        (resolved.atom2, resolved.entry.translation)
    } else if resolved.atom2 == center {
        (resolved.atom1, resolved.entry.translation.map(|t| t.map(|x| -x)))
    } else {
        return None;
    };
    let species = |i: usize| structure.site(i).map(|s| s.species.clone()).unwrap_or_default();
    let icohp = resolved.entry.values.total();

    Some(CandidateBond {
        label: resolved.entry.label.clone(),
        central: center,
        partner,
        central_species: species(center),
        partner_species: species(partner),
        length: resolved.entry.length,
        translation,
        icohp,
        icohp_by_spin: resolved.entry.values,
        orbital_icohps: resolved.entry.orbitals.clone(),
        strength: kind.bonding_sign() * icohp,
    })
}

/// Cartesian bond vectors of the kept bonds of one central site.
///
/// Listed translations are used directly. Otherwise each bond takes the next
/// unused lattice image of its partner at the listed length.
fn bond_vectors(structure: &Structure, center: usize, bonds: &[CandidateBond]) -> Vec<Vector3<f64>> {
    let mut used: HashSet<(usize, [i32; 3])> = HashSet::new();
    let mut vectors = Vec::with_capacity(bonds.len());

    for bond in bonds {
        if let Some(t) = bond.translation {
            if let Some(v) = structure.bond_vector(center, bond.partner, t) {
                vectors.push(v);
            }
            continue;
        }
        let images = structure.images_at_distance(center, bond.partner, bond.length, IMAGE_LENGTH_TOLERANCE);
        match images.iter().find(|n| !used.contains(&(n.index, n.image))) {
            Some(image) => {
                used.insert((image.index, image.image));
                vectors.push(image.vector);
            }
            None => debug!(
                label = %bond.label,
                length = bond.length,
                "No unused lattice image matches the bond length."
            ),
        }
    }
    vectors
}

/// Per partner species: number of bonds and mean strength.
fn signature(bonds: &[CandidateBond]) -> BTreeMap<String, (usize, f64)> {
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for b in bonds {
        grouped.entry(b.partner_species.clone()).or_default().push(b.strength);
    }
    grouped
        .into_iter()
        .map(|(species, s)| {
            let mean = s.iter().sum::<f64>() / s.len() as f64;
            (species, (s.len(), mean))
        })
        .collect()
}

fn signatures_match(a: &BTreeMap<String, (usize, f64)>, b: &BTreeMap<String, (usize, f64)>) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|((sa, (na, ma)), (sb, (nb, mb)))| {
            sa == sb && na == nb && (ma - mb).abs() <= SIGNATURE_TOLERANCE
        })
}

/// Selects the chemically relevant bonds of every central site.
///
/// # Errors
///
/// - [`AnalysisError::Config`] for a cutoff outside (0, 1].
/// - [`AnalysisError::MissingData`] when a bond names an unknown site or has
///   no curve.
/// - [`AnalysisError::InvalidParameter`] when the charge table does not match
///   the structure.
pub fn select(
    structure: &Structure,
    charges: Option<&ChargeTable>,
    bonds: &BondList,
    curves: &CurveStore,
    params: &SelectionParams,
    classifier: &dyn SiteClassifier,
) -> Result<Selection, AnalysisError> {
    let cutoff = validate_cutoff(params.cutoff_icohp)?;
    let resolved = resolve_entries(structure, bonds, curves)?;

    if let Some(table) = charges {
        if table.len() != structure.len() {
            return Err(AnalysisError::InvalidParameter {
                name: "charges",
                reason: format!(
                    "charge table has {} sites, structure has {}",
                    table.len(),
                    structure.len()
                ),
            });
        }
    }
    let mut warnings = Vec::new();
    if charges.is_none() {
        warn!("No charges available; all pairs are treated as eligible.");
        warnings.push(AnalysisWarning::ChargeUnavailable);
    }
    let charge_of = |i: usize| charges.and_then(|t| t.charge(i, params.charge_model));

    let mut equivalence = classifier.equivalence_classes(structure);
    let use_charges = params.which_bonds == WhichBonds::CationAnion && charges.is_some();
    let centers: Vec<usize> = equivalence
        .representatives()
        .into_iter()
        .filter(|&i| !use_charges || charge_of(i).is_some_and(|q| q > 0.0))
        .collect();

    let mut kept_by_center: BTreeMap<usize, Vec<CandidateBond>> = BTreeMap::new();
    let mut environments = BTreeMap::new();

    for &center in &centers {
        let eligible: Vec<CandidateBond> = resolved
            .iter()
            .filter_map(|r| orient(r, center, structure, bonds.kind))
            .filter(|c| !use_charges || charge_of(c.partner).is_some_and(|q| q < 0.0))
            .collect();

        let strongest = eligible
            .iter()
            .map(|c| c.strength)
            .fold(f64::NEG_INFINITY, f64::max);
        if eligible.is_empty() || strongest <= 0.0 {
            debug!(site = center, "No bonding interaction; site skipped.");
            continue;
        }

        let threshold = cutoff * strongest;
        let kept: Vec<CandidateBond> = eligible.into_iter().filter(|c| c.strength >= threshold).collect();

        let vectors = bond_vectors(structure, center, &kept);
        let environment = classifier.coordination_environment(&vectors);
        debug!(
            site = center,
            bonds = kept.len(),
            environment = %environment,
            threshold,
            "Selected bonds for central site."
        );
        environments.insert(center, environment);
        kept_by_center.insert(center, kept);
    }

    // Collapse representatives that the bond analysis cannot tell apart.
    let kept_centers: Vec<usize> = kept_by_center.keys().copied().collect();
    let mut absorbed: HashSet<usize> = HashSet::new();
    for (i, &a) in kept_centers.iter().enumerate() {
        if absorbed.contains(&a) {
            continue;
        }
        let sig_a = signature(&kept_by_center[&a]);
        for &b in &kept_centers[i + 1..] {
            if absorbed.contains(&b) {
                continue;
            }
            let same_species = structure.site(a).map(|s| &s.species) == structure.site(b).map(|s| &s.species);
            if same_species
                && environments.get(&a) == environments.get(&b)
                && signatures_match(&sig_a, &signature(&kept_by_center[&b]))
            {
                debug!(kept = a, merged = b, "Merged sites with identical bonding.");
                equivalence.merge(a, b);
                absorbed.insert(b);
            }
        }
    }
    for b in &absorbed {
        kept_by_center.remove(b);
        environments.remove(b);
    }

    let site_charges = environments
        .keys()
        .filter_map(|&i| charge_of(i).map(|q| (i, q)))
        .collect();
    let candidates = kept_by_center.into_values().flatten().collect();

    Ok(Selection {
        kind: bonds.kind,
        candidates,
        environments,
        equivalence,
        site_charges,
        charges_available: charges.is_some(),
        warnings,
    })
}
