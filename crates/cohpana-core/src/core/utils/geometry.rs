use nalgebra::{Matrix3, Vector3};

/// Number of lattice images to scan along each lattice vector so that every
/// point within `radius` of a site in the cell is reached.
pub fn image_bounds(lattice: &Matrix3<f64>, radius: f64) -> [i32; 3] {
    let a = lattice.column(0).into_owned();
    let b = lattice.column(1).into_owned();
    let c = lattice.column(2).into_owned();
    let volume = a.dot(&b.cross(&c)).abs();

    let spacing = |u: &Vector3<f64>, v: &Vector3<f64>| {
        let area = u.cross(v).norm();
        if area > 0.0 { volume / area } else { f64::INFINITY }
    };
    let planes = [spacing(&b, &c), spacing(&c, &a), spacing(&a, &b)];

    planes.map(|d| {
        if d.is_finite() && d > 0.0 {
            (radius / d).ceil() as i32 + 1
        } else {
            1
        }
    })
}

/// Angle between two vectors in degrees, clamped against rounding.
pub fn angle_degrees(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    let denom = u.norm() * v.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (u.dot(v) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// All pairwise angles between the given directions, sorted ascending.
pub fn sorted_pairwise_angles(vectors: &[Vector3<f64>]) -> Vec<f64> {
    let mut angles = Vec::with_capacity(vectors.len() * vectors.len().saturating_sub(1) / 2);
    for (i, u) in vectors.iter().enumerate() {
        for v in &vectors[i + 1..] {
            angles.push(angle_degrees(u, v));
        }
    }
    angles.sort_by(f64::total_cmp);
    angles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_cell_needs_one_extra_image_layer() {
        let lattice = Matrix3::identity() * 4.0;
        assert_eq!(image_bounds(&lattice, 3.0), [2, 2, 2]);
        assert_eq!(image_bounds(&lattice, 9.0), [4, 4, 4]);
    }

    #[test]
    fn octahedral_directions_have_twelve_right_angles() {
        let dirs = vec![
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ];
        let angles = sorted_pairwise_angles(&dirs);
        assert_eq!(angles.len(), 15);
        assert!(angles[..12].iter().all(|a| (a - 90.0).abs() < 1e-9));
        assert!(angles[12..].iter().all(|a| (a - 180.0).abs() < 1e-9));
    }

    #[test]
    fn zero_vector_angle_is_zero() {
        assert_eq!(angle_degrees(&Vector3::zeros(), &Vector3::x()), 0.0);
    }
}
