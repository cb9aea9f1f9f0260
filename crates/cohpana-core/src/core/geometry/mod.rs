//! # Structure Adapter
//!
//! Geometric knowledge the bond selector needs about a structure: which sites
//! are equivalent, and which coordination polyhedron a set of bonds forms.
//!
//! Both questions sit behind the [`SiteClassifier`] trait so that a different
//! symmetry backend can replace the built-in [`GeometricClassifier`].

mod classifier;
pub mod polyhedra;

pub use classifier::GeometricClassifier;

use crate::core::models::environment::CoordinationEnvironment;
use crate::core::models::structure::Structure;
use nalgebra::Vector3;
use std::collections::BTreeMap;

/// A partition of the sites of a structure into equivalence classes.
///
/// Each class is represented by its lowest site index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClasses {
    representative_of: Vec<usize>,
}

impl EquivalenceClasses {
    /// Builds the partition from the representative of every site.
    ///
    /// Representatives are normalized to the lowest index of each class.
    pub fn from_representatives(representative_of: Vec<usize>) -> Self {
        let mut lowest: BTreeMap<usize, usize> = BTreeMap::new();
        for (site, &rep) in representative_of.iter().enumerate() {
            let entry = lowest.entry(rep).or_insert(site);
            *entry = (*entry).min(site);
        }
        let representative_of = representative_of
            .iter()
            .map(|rep| lowest.get(rep).copied().unwrap_or(*rep))
            .collect();
        Self { representative_of }
    }

    /// Every site is its own class.
    pub fn trivial(n_sites: usize) -> Self {
        Self {
            representative_of: (0..n_sites).collect(),
        }
    }

    pub fn representative(&self, site: usize) -> Option<usize> {
        self.representative_of.get(site).copied()
    }

    pub fn is_representative(&self, site: usize) -> bool {
        self.representative(site) == Some(site)
    }

    /// Representatives in ascending order.
    pub fn representatives(&self) -> Vec<usize> {
        (0..self.representative_of.len())
            .filter(|&i| self.is_representative(i))
            .collect()
    }

    /// All members of the class of `representative`, ascending.
    pub fn members(&self, representative: usize) -> Vec<usize> {
        self.representative_of
            .iter()
            .enumerate()
            .filter(|&(_, &rep)| rep == representative)
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves every member of the class of `absorbed` into the class of `into`.
    pub fn merge(&mut self, into: usize, absorbed: usize) {
        let (keep, drop) = if into <= absorbed { (into, absorbed) } else { (absorbed, into) };
        for rep in &mut self.representative_of {
            if *rep == drop {
                *rep = keep;
            }
        }
    }
}

/// Classifies sites of a periodic structure.
pub trait SiteClassifier {
    /// Partitions the sites into symmetry-equivalent classes.
    fn equivalence_classes(&self, structure: &Structure) -> EquivalenceClasses;

    /// Names the coordination polyhedron formed by bonds along `bond_vectors`
    /// (Cartesian vectors from the central site to its partners).
    fn coordination_environment(&self, bond_vectors: &[Vector3<f64>]) -> CoordinationEnvironment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representatives_are_normalized_to_lowest_index() {
        let classes = EquivalenceClasses::from_representatives(vec![2, 1, 2, 1]);
        assert_eq!(classes.representatives(), vec![0, 1]);
        assert_eq!(classes.members(0), vec![0, 2]);
        assert_eq!(classes.representative(3), Some(1));
    }

    #[test]
    fn merge_keeps_the_lower_representative() {
        let mut classes = EquivalenceClasses::trivial(3);
        classes.merge(2, 0);
        assert_eq!(classes.members(0), vec![0, 2]);
        assert_eq!(classes.representatives(), vec![0, 1]);
    }
}
