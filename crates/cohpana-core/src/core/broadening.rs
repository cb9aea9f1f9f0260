//! Gaussian broadening of population series for plot-data export.
//!
//! Broadening is a discrete convolution and therefore needs a regularly spaced
//! energy grid. Grids that are irregular, too short, or that do not match each
//! other are rejected with a [`BroadeningGridError`].

use thiserror::Error;

/// Largest deviation of a single grid step from the mean step, in eV.
pub const GRID_TOLERANCE: f64 = 1e-5;

/// Kernel half-width as a multiple of sigma.
pub const KERNEL_CUTOFF: f64 = 4.0;

#[derive(Debug, Error, PartialEq)]
pub enum BroadeningGridError {
    #[error("Energy grid is not regular (mean spacing {spacing:.6} eV, deviation {deviation:.2e} eV)")]
    Irregular { spacing: f64, deviation: f64 },
    #[error("Energy grids of '{first}' and '{other}' are incompatible")]
    Incompatible { first: String, other: String },
    #[error("Broadening width must be positive and finite, got {0}")]
    InvalidSigma(f64),
    #[error("Energy grid needs at least two points, got {0}")]
    TooShort(usize),
    #[error("Series length {values} does not match energy grid length {energies}")]
    LengthMismatch { energies: usize, values: usize },
}

/// Converts a full width at half maximum into a Gaussian standard deviation.
pub fn sigma_from_fwhm(fwhm: f64) -> f64 {
    fwhm / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt())
}

/// Returns the mean spacing of a regular grid.
pub fn regular_spacing(energies: &[f64]) -> Result<f64, BroadeningGridError> {
    if energies.len() < 2 {
        return Err(BroadeningGridError::TooShort(energies.len()));
    }
    let spacing = (energies[energies.len() - 1] - energies[0]) / (energies.len() - 1) as f64;
    let deviation = energies
        .windows(2)
        .map(|w| (w[1] - w[0] - spacing).abs())
        .fold(0.0, f64::max);
    if deviation > GRID_TOLERANCE || spacing <= 0.0 {
        return Err(BroadeningGridError::Irregular { spacing, deviation });
    }
    Ok(spacing)
}

/// Checks that two labelled grids coincide point by point.
pub fn ensure_common_grid(
    first: (&str, &[f64]),
    other: (&str, &[f64]),
) -> Result<(), BroadeningGridError> {
    let compatible = first.1.len() == other.1.len()
        && first
            .1
            .iter()
            .zip(other.1)
            .all(|(a, b)| (a - b).abs() <= GRID_TOLERANCE);
    if compatible {
        Ok(())
    } else {
        Err(BroadeningGridError::Incompatible {
            first: first.0.to_string(),
            other: other.0.to_string(),
        })
    }
}

/// Convolves `population` with a normalized Gaussian of width `sigma`.
///
/// The kernel is truncated at [`KERNEL_CUTOFF`] sigma and the output has the
/// same length as the input, with zero padding beyond the grid ends.
pub fn gaussian_broaden(
    energies: &[f64],
    population: &[f64],
    sigma: f64,
) -> Result<Vec<f64>, BroadeningGridError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BroadeningGridError::InvalidSigma(sigma));
    }
    if energies.len() != population.len() {
        return Err(BroadeningGridError::LengthMismatch {
            energies: energies.len(),
            values: population.len(),
        });
    }
    let spacing = regular_spacing(energies)?;

    let half_width = (KERNEL_CUTOFF * sigma / spacing).round() as isize;
    let kernel: Vec<f64> = (-half_width..=half_width)
        .map(|j| {
            let x = j as f64 * spacing / sigma;
            (-0.5 * x * x).exp()
        })
        .collect();
    let norm: f64 = kernel.iter().sum();

    let n = population.len() as isize;
    let broadened = (0..n)
        .map(|i| {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let src = i + k as isize - half_width;
                if (0..n).contains(&src) {
                    acc += weight * population[src as usize];
                }
            }
            acc / norm
        })
        .collect();
    Ok(broadened)
}
