//! This module provides the high-level API for computing the spectrum of an
//! assembled operator matrix.
//!
//! All decompositions go through [`faer`]'s self-adjoint eigensolver, which is
//! specialized for symmetric input and returns eigenvalues in ascending order.
//! Input is validated first: a non-square, empty, non-finite or non-symmetric
//! matrix is reported as a distinct error instead of being handed to the
//! eigensolver.

use crate::{
    error::{SpectralError, SpectralErrorKind},
    operator::first_asymmetry,
    utils::perf::warn_if_dense_matrix_is_large,
};
use faer::{Mat, MatRef, Side};
use std::{ops::RangeInclusive, time::Instant};

/// Relative tolerance used when checking the input for symmetry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Which eigenvalues of the ascending spectrum to return.
///
/// This is an index-range selection, not a value threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenRange {
    /// Every eigenvalue.
    #[default]
    All,
    /// The `count` smallest eigenvalues.
    Lowest(usize),
    /// Eigenvalues with ascending indices `low..=high`.
    Indices { low: usize, high: usize },
}

impl EigenRange {
    /// Resolves the selection against a matrix of dimension `dimension`.
    pub fn resolve(self, dimension: usize) -> Result<RangeInclusive<usize>, SpectralError> {
        let (low, high) = match self {
            EigenRange::All => (0, dimension.saturating_sub(1)),
            EigenRange::Lowest(0) => {
                return Err(SpectralErrorKind::InputError(
                    "at least one eigenvalue must be requested".to_string(),
                )
                .into());
            }
            EigenRange::Lowest(count) => (0, count - 1),
            EigenRange::Indices { low, high } => (low, high),
        };
        if dimension == 0 || low > high || high >= dimension {
            return Err(SpectralErrorKind::IndexOutOfRange {
                low,
                high,
                dimension,
            }
            .into());
        }
        Ok(low..=high)
    }
}

/// Eigenvalues of an operator matrix, with the matching eigenvectors.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Eigenvalues in ascending order.
    pub eigenvalues: Vec<f64>,
    /// Eigenvectors stored as the columns of an `n × k` matrix, in the same
    /// order as `eigenvalues`.
    pub eigenvectors: Mat<f64>,
}

impl Spectrum {
    /// The smallest computed eigenvalue, if any.
    pub fn ground_energy(&self) -> Option<f64> {
        self.eigenvalues.first().copied()
    }

    /// Difference between the two smallest computed eigenvalues.
    pub fn gap(&self) -> Option<f64> {
        match self.eigenvalues.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

/// Checks that `matrix` is a non-empty, square, finite, symmetric matrix.
pub fn validate_symmetric(matrix: MatRef<'_, f64>) -> Result<(), SpectralError> {
    let (nrows, ncols) = (matrix.nrows(), matrix.ncols());
    if nrows != ncols {
        return Err(SpectralErrorKind::DimensionMismatch {
            expected: nrows,
            actual: ncols,
        }
        .into());
    }
    if nrows == 0 {
        return Err(SpectralErrorKind::DimensionMismatch {
            expected: 1,
            actual: 0,
        }
        .into());
    }
    for j in 0..ncols {
        for i in 0..nrows {
            if !matrix[(i, j)].is_finite() {
                return Err(SpectralErrorKind::NonFiniteEntry { row: i, col: j }.into());
            }
        }
    }
    if let Some((row, col)) = first_asymmetry(matrix, SYMMETRY_TOLERANCE) {
        return Err(SpectralErrorKind::NotSymmetric { row, col }.into());
    }
    Ok(())
}

/// Computes the eigenvalues of a dense symmetric matrix selected by `range`,
/// in ascending order.
///
/// # Errors
/// * [`SpectralErrorKind::NonFiniteEntry`] / [`SpectralErrorKind::NotSymmetric`] /
///   [`SpectralErrorKind::DimensionMismatch`] for invalid input.
/// * [`SpectralErrorKind::IndexOutOfRange`] if `range` does not fit the matrix.
/// * [`SpectralErrorKind::EvdError`] if the eigensolver fails.
pub fn solve_eigenvalues(
    matrix: MatRef<'_, f64>,
    range: EigenRange,
) -> Result<Vec<f64>, SpectralError> {
    validate_symmetric(matrix)?;
    let selection = range.resolve(matrix.nrows())?;
    warn_if_dense_matrix_is_large(matrix.nrows());

    let start = Instant::now();
    let mut eigenvalues = matrix.self_adjoint_eigenvalues(Side::Lower)?;
    log::info!(
        "Symmetric eigendecomposition of a {n}x{n} matrix took {:.3}s",
        start.elapsed().as_secs_f64(),
        n = matrix.nrows()
    );

    eigenvalues.sort_by(f64::total_cmp);
    Ok(eigenvalues[selection].to_vec())
}

/// Like [`solve_eigenvalues`], but also returns the eigenvectors.
pub fn solve_spectrum(
    matrix: MatRef<'_, f64>,
    range: EigenRange,
) -> Result<Spectrum, SpectralError> {
    validate_symmetric(matrix)?;
    let selection = range.resolve(matrix.nrows())?;
    warn_if_dense_matrix_is_large(matrix.nrows());

    let start = Instant::now();
    let evd = matrix.self_adjoint_eigen(Side::Lower)?;
    log::info!(
        "Symmetric eigendecomposition (with vectors) of a {n}x{n} matrix took {:.3}s",
        start.elapsed().as_secs_f64(),
        n = matrix.nrows()
    );

    let s = evd.S();
    let eigenvalues = selection.clone().map(|i| s[i]).collect();
    let eigenvectors = evd
        .U()
        .get(.., *selection.start()..*selection.end() + 1)
        .to_owned();

    Ok(Spectrum {
        eigenvalues,
        eigenvectors,
    })
}

/// Maps eigenvalues to zero-height approximations `t = sqrt(λ)`.
///
/// Only strictly positive eigenvalues are kept; zero and negative eigenvalues
/// are discarded, not clamped. Order is preserved.
pub fn approximate_zero_heights(eigenvalues: &[f64]) -> Vec<f64> {
    eigenvalues
        .iter()
        .filter(|&&lambda| lambda > 0.0)
        .map(|lambda| lambda.sqrt())
        .collect()
}
