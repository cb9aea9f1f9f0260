use super::polyhedra::{angle_rms, templates_for};
use super::{EquivalenceClasses, SiteClassifier};
use crate::core::models::environment::CoordinationEnvironment;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::sorted_pairwise_angles;
use nalgebra::Vector3;
use std::collections::BTreeMap;
use tracing::trace;

/// Site classifier based on neighbour-distance fingerprints and ideal
/// polyhedron templates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricClassifier {
    /// Radius of the neighbour shell that defines a site fingerprint, in Angstroms.
    pub fingerprint_radius: f64,
    /// Largest difference between two matching neighbour distances, in Angstroms.
    pub distance_tolerance: f64,
}

impl Default for GeometricClassifier {
    fn default() -> Self {
        Self {
            fingerprint_radius: 6.0,
            distance_tolerance: 1e-2,
        }
    }
}

type Fingerprint = BTreeMap<String, Vec<f64>>;

impl GeometricClassifier {
    fn fingerprint(&self, structure: &Structure, site: usize) -> Fingerprint {
        let mut shells: Fingerprint = BTreeMap::new();
        // skip the outermost tolerance band; rounding can cut shells there
        let cutoff = self.fingerprint_radius - self.distance_tolerance;
        for n in structure.neighbors_within(site, self.fingerprint_radius) {
            if n.distance <= cutoff {
                if let Some(neighbor) = structure.site(n.index) {
                    shells.entry(neighbor.species.clone()).or_default().push(n.distance);
                }
            }
        }
        for distances in shells.values_mut() {
            distances.sort_by(f64::total_cmp);
        }
        shells
    }

    fn fingerprints_match(&self, a: &Fingerprint, b: &Fingerprint) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|((sa, da), (sb, db))| {
                sa == sb
                    && da.len() == db.len()
                    && da
                        .iter()
                        .zip(db)
                        .all(|(x, y)| (x - y).abs() <= self.distance_tolerance)
            })
    }
}

impl SiteClassifier for GeometricClassifier {
    fn equivalence_classes(&self, structure: &Structure) -> EquivalenceClasses {
        let mut representatives: Vec<(usize, Fingerprint)> = Vec::new();
        let mut representative_of = Vec::with_capacity(structure.len());

        for site in structure.sites() {
            let fp = self.fingerprint(structure, site.index);
            let found = representatives.iter().find(|(rep, rep_fp)| {
                structure.site(*rep).is_some_and(|r| r.species == site.species)
                    && self.fingerprints_match(rep_fp, &fp)
            });
            match found {
                Some((rep, _)) => representative_of.push(*rep),
                None => {
                    representative_of.push(site.index);
                    representatives.push((site.index, fp));
                }
            }
        }

        trace!(classes = representatives.len(), sites = structure.len(), "Computed site equivalence classes.");
        EquivalenceClasses::from_representatives(representative_of)
    }

    fn coordination_environment(&self, bond_vectors: &[Vector3<f64>]) -> CoordinationEnvironment {
        let cn = bond_vectors.len();
        let angles = sorted_pairwise_angles(bond_vectors);

        templates_for(cn)
            .map(|t| (t, angle_rms(&angles, &t.angles)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or_else(
                || CoordinationEnvironment::unclassified(cn),
                |(t, _)| CoordinationEnvironment::new(t.symbol, cn),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    fn fluorite() -> Structure {
        let h = 5.39 / 2.0;
        let lattice = Matrix3::from_columns(&[
            Vector3::new(0.0, h, h),
            Vector3::new(h, 0.0, h),
            Vector3::new(h, h, 0.0),
        ]);
        Structure::from_fractional(
            lattice,
            vec![
                ("Cd".to_string(), Vector3::zeros()),
                ("F".to_string(), Vector3::new(0.25, 0.25, 0.25)),
                ("F".to_string(), Vector3::new(0.75, 0.75, 0.75)),
            ],
        )
    }

    #[test]
    fn fluorite_anions_are_equivalent() {
        let classes = GeometricClassifier::default().equivalence_classes(&fluorite());
        assert_eq!(classes.representatives(), vec![0, 1]);
        assert_eq!(classes.members(1), vec![1, 2]);
    }

    #[test]
    fn octahedron_and_cube_are_recognized() {
        let c = GeometricClassifier::default();
        let octahedron = vec![
            Vector3::new(2.8, 0.0, 0.0),
            Vector3::new(-2.8, 0.0, 0.0),
            Vector3::new(0.0, 2.8, 0.0),
            Vector3::new(0.0, -2.8, 0.0),
            Vector3::new(0.0, 0.0, 2.8),
            Vector3::new(0.0, 0.0, -2.8),
        ];
        assert_eq!(c.coordination_environment(&octahedron).code(), "O:6");

        let structure = fluorite();
        let cube: Vec<_> = structure
            .neighbors_within(0, 2.4)
            .into_iter()
            .map(|n| n.vector)
            .collect();
        assert_eq!(cube.len(), 8);
        assert_eq!(c.coordination_environment(&cube).code(), "C:8");
    }

    #[test]
    fn tetrahedron_and_linear_are_recognized() {
        let c = GeometricClassifier::default();
        let tetra = vec![
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
        ];
        assert_eq!(c.coordination_environment(&tetra).code(), "T:4");
        let linear = vec![Vector3::x(), -Vector3::x()];
        assert_eq!(c.coordination_environment(&linear).code(), "L:2");
    }

    #[test]
    fn unsupported_coordination_number_is_unclassified() {
        let c = GeometricClassifier::default();
        let vectors: Vec<_> = (0..9)
            .map(|i| {
                let phi = i as f64 * 0.7;
                Vector3::new(phi.cos(), phi.sin(), (i as f64 - 4.0) / 4.0)
            })
            .collect();
        assert_eq!(c.coordination_environment(&vectors).code(), "CN:9");
        assert_eq!(c.coordination_environment(&[]).code(), "CN:0");
    }
}
