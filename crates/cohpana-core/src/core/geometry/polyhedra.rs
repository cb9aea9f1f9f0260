use crate::core::utils::geometry::sorted_pairwise_angles;
use nalgebra::Vector3;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// An ideal coordination polyhedron, described by the directions from the
/// centre to its vertices.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    pub symbol: &'static str,
    pub directions: Vec<Vector3<f64>>,
    /// Sorted pairwise angles between the directions, in degrees.
    pub angles: Vec<f64>,
}

impl Polyhedron {
    fn new(symbol: &'static str, directions: Vec<Vector3<f64>>) -> Self {
        let angles = sorted_pairwise_angles(&directions);
        Self {
            symbol,
            directions,
            angles,
        }
    }

    pub fn coordination_number(&self) -> usize {
        self.directions.len()
    }
}

fn ring(n: usize, radius: f64, z: f64, phase_deg: f64) -> Vec<Vector3<f64>> {
    (0..n)
        .map(|i| {
            let phi = phase_deg.to_radians() + 2.0 * PI * i as f64 / n as f64;
            Vector3::new(radius * phi.cos(), radius * phi.sin(), z)
        })
        .collect()
}

fn with(mut base: Vec<Vector3<f64>>, extra: impl IntoIterator<Item = Vector3<f64>>) -> Vec<Vector3<f64>> {
    base.extend(extra);
    base
}

fn tetrahedron() -> Vec<Vector3<f64>> {
    vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ]
}

fn octahedron() -> Vec<Vector3<f64>> {
    vec![
        Vector3::x(),
        -Vector3::x(),
        Vector3::y(),
        -Vector3::y(),
        Vector3::z(),
        -Vector3::z(),
    ]
}

fn cube() -> Vec<Vector3<f64>> {
    let mut v = Vec::with_capacity(8);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                v.push(Vector3::new(x, y, z));
            }
        }
    }
    v
}

fn icosahedron() -> Vec<Vector3<f64>> {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let mut v = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-phi, phi] {
            v.push(Vector3::new(0.0, a, b));
            v.push(Vector3::new(a, b, 0.0));
            v.push(Vector3::new(b, 0.0, a));
        }
    }
    v
}

fn cuboctahedron() -> Vec<Vector3<f64>> {
    let mut v = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            v.push(Vector3::new(a, b, 0.0));
            v.push(Vector3::new(a, 0.0, b));
            v.push(Vector3::new(0.0, a, b));
        }
    }
    v
}

/// The reference polyhedra, grouped implicitly by coordination number.
pub static POLYHEDRA: LazyLock<Vec<Polyhedron>> = LazyLock::new(|| {
    let tetra = tetrahedron();
    let cap_height = (2.0f64 / 3.0).sqrt();
    let cap_radius = 1.0 / 3f64.sqrt();
    let antiprism_height = 0.5946;

    vec![
        Polyhedron::new("S", vec![Vector3::z()]),
        Polyhedron::new("L", vec![Vector3::z(), -Vector3::z()]),
        Polyhedron::new("A", tetra[..2].to_vec()),
        Polyhedron::new("TL", ring(3, 1.0, 0.0, 0.0)),
        Polyhedron::new("TY", tetra[..3].to_vec()),
        Polyhedron::new("TS", vec![Vector3::x(), -Vector3::x(), Vector3::y()]),
        Polyhedron::new("T", tetra),
        Polyhedron::new("S", ring(4, 1.0, 0.0, 0.0)),
        // see-saw: trigonal bipyramid without one equatorial vertex
        Polyhedron::new(
            "SS",
            with(vec![Vector3::z(), -Vector3::z()], ring(3, 1.0, 0.0, 0.0).into_iter().take(2)),
        ),
        Polyhedron::new("T", with(ring(3, 1.0, 0.0, 0.0), [Vector3::z(), -Vector3::z()])),
        Polyhedron::new("S", with(ring(4, 1.0, 0.0, 0.0), [Vector3::z()])),
        Polyhedron::new("PP", ring(5, 1.0, 0.0, 0.0)),
        Polyhedron::new("O", octahedron()),
        Polyhedron::new(
            "T",
            with(ring(3, 1.0, 3f64.sqrt() / 2.0, 0.0), ring(3, 1.0, -3f64.sqrt() / 2.0, 0.0)),
        ),
        Polyhedron::new("PB", with(ring(5, 1.0, 0.0, 0.0), [Vector3::z(), -Vector3::z()])),
        Polyhedron::new("C", cube()),
        Polyhedron::new(
            "SA",
            with(ring(4, 1.0, antiprism_height, 0.0), ring(4, 1.0, -antiprism_height, 45.0)),
        ),
        Polyhedron::new("HB", with(ring(6, 1.0, 0.0, 0.0), [Vector3::z(), -Vector3::z()])),
        Polyhedron::new("I", icosahedron()),
        Polyhedron::new("C", cuboctahedron()),
        Polyhedron::new(
            "AC",
            with(
                with(ring(6, 1.0, 0.0, 0.0), ring(3, cap_radius, cap_height, 30.0)),
                ring(3, cap_radius, -cap_height, 30.0),
            ),
        ),
        Polyhedron::new("HP", with(ring(6, 1.0, 0.5, 0.0), ring(6, 1.0, -0.5, 0.0))),
    ]
});

/// Reference polyhedra with the given coordination number.
pub fn templates_for(coordination_number: usize) -> impl Iterator<Item = &'static Polyhedron> {
    POLYHEDRA
        .iter()
        .filter(move |p| p.coordination_number() == coordination_number)
}

/// Root-mean-square difference between two sorted angle lists of equal length.
pub fn angle_rms(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (sum / a.len() as f64).sqrt()
}
