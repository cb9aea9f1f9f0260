use super::site::{Site, SiteLabel};
use crate::core::utils::elements::reduced_formula;
use crate::core::utils::geometry::image_bounds;
use nalgebra::{Matrix3, Point3, Vector3};
use std::collections::BTreeMap;

/// A neighbouring site image found around a central site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbouring site.
    pub index: usize,
    /// Lattice translation of the neighbour image, in units of the lattice vectors.
    pub image: [i32; 3],
    /// Cartesian vector from the central site to the neighbour image.
    pub vector: Vector3<f64>,
    pub distance: f64,
}

/// A periodic crystal structure: a lattice plus the sites of one unit cell.
///
/// The lattice matrix stores the lattice vectors **a**, **b** and **c** as its
/// columns, so `lattice * fractional` gives Cartesian coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    lattice: Matrix3<f64>,
    sites: Vec<Site>,
}

impl Structure {
    /// Builds a structure from a lattice and fractional site positions.
    ///
    /// Site indices are assigned in the order given.
    pub fn from_fractional(
        lattice: Matrix3<f64>,
        species_and_positions: impl IntoIterator<Item = (String, Vector3<f64>)>,
    ) -> Self {
        let sites = species_and_positions
            .into_iter()
            .enumerate()
            .map(|(index, (species, fractional))| {
                let cartesian = Point3::from(lattice * fractional);
                Site::new(index, species, fractional, cartesian)
            })
            .collect();
        Self { lattice, sites }
    }

    pub fn lattice(&self) -> &Matrix3<f64> {
        &self.lattice
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Resolves a LOBSTER site label (e.g., `Cl2`) to a site.
    ///
    /// Returns `None` if the index is out of range or the species does not
    /// match the site at that index.
    pub fn site_by_label(&self, label: &str) -> Option<&Site> {
        let parsed: SiteLabel = label.parse().ok()?;
        self.sites
            .get(parsed.index)
            .filter(|site| site.species == parsed.species)
    }

    pub fn species_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for site in &self.sites {
            *counts.entry(site.species.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// The reduced chemical formula, e.g. `NaCl` or `CdF2`.
    pub fn formula(&self) -> String {
        reduced_formula(&self.species_counts())
    }

    pub fn translation_vector(&self, translation: [i32; 3]) -> Vector3<f64> {
        let t = Vector3::new(
            translation[0] as f64,
            translation[1] as f64,
            translation[2] as f64,
        );
        self.lattice * t
    }

    /// Cartesian vector from `center` to the image of `partner` shifted by
    /// `translation`.
    pub fn bond_vector(&self, center: usize, partner: usize, translation: [i32; 3]) -> Option<Vector3<f64>> {
        let c = self.sites.get(center)?;
        let p = self.sites.get(partner)?;
        Some(p.cartesian - c.cartesian + self.translation_vector(translation))
    }

    /// All site images within `radius` of the central site, excluding the
    /// central site itself, sorted by distance.
    pub fn neighbors_within(&self, center: usize, radius: f64) -> Vec<Neighbor> {
        let Some(origin) = self.sites.get(center) else {
            return Vec::new();
        };
        let bounds = image_bounds(&self.lattice, radius);
        let mut neighbors = Vec::new();

        for site in &self.sites {
            let base = site.cartesian - origin.cartesian;
            for i in -bounds[0]..=bounds[0] {
                for j in -bounds[1]..=bounds[1] {
                    for k in -bounds[2]..=bounds[2] {
                        if site.index == center && i == 0 && j == 0 && k == 0 {
                            continue;
                        }
                        let image = [i, j, k];
                        let vector = base + self.translation_vector(image);
                        let distance = vector.norm();
                        if distance <= radius {
                            neighbors.push(Neighbor {
                                index: site.index,
                                image,
                                vector,
                                distance,
                            });
                        }
                    }
                }
            }
        }

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors
    }

    /// Images of `partner` whose distance from `center` equals `length` within
    /// `tolerance`.
    pub fn images_at_distance(
        &self,
        center: usize,
        partner: usize,
        length: f64,
        tolerance: f64,
    ) -> Vec<Neighbor> {
        self.neighbors_within(center, length + tolerance)
            .into_iter()
            .filter(|n| n.index == partner && (n.distance - length).abs() <= tolerance)
            .collect()
    }
}
