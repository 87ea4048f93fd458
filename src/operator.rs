//! This module assembles the discretized differential operators.
//!
//! Both experimental lines reduce a 1-D operator on a uniform grid to a dense,
//! symmetric, tridiagonal-plus-diagonal matrix using the three-point
//! second-difference stencil `[1, -2, 1] / h²`. They differ in how the stencil
//! is scaled and what is added to the diagonal:
//!
//! 1.  **Prime Hamiltonian** ([`PrimeHamiltonian`]): `H = -1/2 · d²/dy² + V(y)`,
//!     where `V` is the spatially varying prime potential from
//!     [`crate::potential`].
//! 2.  **Radial operator** ([`RadialOperator`]): `L = -d²/dt² + 3/4` on
//!     `t ∈ [ln ε, T]`. The constant 3/4 comes from rewriting a radial operator
//!     in the logarithmic coordinate `t = ln r`.
//!
//! The two lines must not be conflated, so each has its own builder. They share
//! the [`DiscreteOperator`] trait, which is all the experiment runner needs to
//! know about an operator: its dimension, its grid step, and how to assemble it.

use crate::{
    error::{SpectralError, SpectralErrorKind, invalid_config},
    potential::LogGrid,
};
use faer::{Mat, MatRef};

/// The constant diagonal offset of the radial operator.
pub const RADIAL_OFFSET: f64 = 0.75;

/// The scale of the kinetic term `-1/2 · d²/dy²`.
pub const SCHRODINGER_SCALE: f64 = -0.5;

/// The finite-difference stencil used for the kinetic part of an operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stencil {
    /// `scale · d²/dy²`: main diagonal `-2·scale/h²`, off-diagonals `scale/h²`.
    ///
    /// With `scale = -1/2` this is the kinetic energy `-1/2 · d²/dy²`.
    Kinetic { scale: f64 },
    /// `-d²/dt² + 3/4`: main diagonal `2/h² + 3/4`, off-diagonals `-1/h²`.
    Radial,
}

impl Stencil {
    /// Returns the `(diagonal, off_diagonal)` values for grid step `step`.
    pub fn coefficients(self, step: f64) -> (f64, f64) {
        let inv_h2 = 1.0 / (step * step);
        match self {
            Stencil::Kinetic { scale } => (-2.0 * scale * inv_h2, scale * inv_h2),
            Stencil::Radial => (2.0 * inv_h2 + RADIAL_OFFSET, -inv_h2),
        }
    }
}

/// Builds the dense tridiagonal kinetic matrix of dimension `grid_size`.
pub fn build_kinetic(
    grid_size: usize,
    step: f64,
    stencil: Stencil,
) -> Result<Mat<f64>, SpectralError> {
    if grid_size == 0 {
        return Err(SpectralErrorKind::DimensionMismatch {
            expected: 1,
            actual: 0,
        }
        .into());
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(invalid_config(format!(
            "grid step must be positive and finite, got {step}"
        )));
    }

    let (diagonal, off_diagonal) = stencil.coefficients(step);
    log::debug!(
        "Assembling {grid_size}x{grid_size} {stencil:?} operator: diagonal {diagonal:.6e}, off-diagonal {off_diagonal:.6e}"
    );

    // Both off-diagonals receive the same value, so the result is exactly symmetric.
    let mut matrix = Mat::<f64>::zeros(grid_size, grid_size);
    for i in 0..grid_size {
        matrix[(i, i)] = diagonal;
        if i + 1 < grid_size {
            matrix[(i, i + 1)] = off_diagonal;
            matrix[(i + 1, i)] = off_diagonal;
        }
    }
    Ok(matrix)
}

/// Adds `potential` to the main diagonal of `kinetic`.
///
/// Off-diagonal entries are left untouched.
pub fn add_potential(mut kinetic: Mat<f64>, potential: &[f64]) -> Result<Mat<f64>, SpectralError> {
    if kinetic.nrows() != potential.len() || kinetic.ncols() != potential.len() {
        return Err(SpectralErrorKind::DimensionMismatch {
            expected: kinetic.nrows(),
            actual: potential.len(),
        }
        .into());
    }
    for (i, &v) in potential.iter().enumerate() {
        kinetic[(i, i)] += v;
    }
    Ok(kinetic)
}

/// Returns `true` if `matrix` is square and `matrix[(i, j)] == matrix[(j, i)]`
/// exactly, for every pair of indices.
pub fn is_symmetric(matrix: MatRef<'_, f64>) -> bool {
    matrix.nrows() == matrix.ncols() && first_asymmetry(matrix, 0.0).is_none()
}

/// The first `(row, col)` with `row < col` whose mirror entry differs by more
/// than `tolerance` relative to the larger of the two magnitudes (or 1).
pub(crate) fn first_asymmetry(matrix: MatRef<'_, f64>, tolerance: f64) -> Option<(usize, usize)> {
    let n = matrix.nrows().min(matrix.ncols());
    for j in 0..n {
        for i in 0..j {
            let (upper, lower) = (matrix[(i, j)], matrix[(j, i)]);
            let magnitude = upper.abs().max(lower.abs()).max(1.0);
            if (upper - lower).abs() > tolerance * magnitude {
                return Some((i, j));
            }
        }
    }
    None
}

/// A discretized operator that can be assembled into a dense symmetric matrix.
///
/// The experiment runner only depends on this trait, so the two experimental
/// lines stay independent builders behind a common interface.
pub trait DiscreteOperator {
    /// Dimension of the assembled matrix.
    fn dimension(&self) -> usize;

    /// Uniform grid step.
    fn step(&self) -> f64;

    /// Assembles the full operator matrix.
    fn assemble(&self) -> Result<Mat<f64>, SpectralError>;
}

/// `H = scale · d²/dy² + V(y)` on a [`LogGrid`], with `V` supplied as a vector.
#[derive(Debug, Clone)]
pub struct PrimeHamiltonian {
    grid: LogGrid,
    potential: Vec<f64>,
    scale: f64,
}

impl PrimeHamiltonian {
    /// Pairs a grid with a potential vector of the same length.
    pub fn new(grid: LogGrid, potential: Vec<f64>, scale: f64) -> Result<Self, SpectralError> {
        if potential.len() != grid.grid_size() {
            return Err(SpectralErrorKind::DimensionMismatch {
                expected: grid.grid_size(),
                actual: potential.len(),
            }
            .into());
        }
        if !scale.is_finite() {
            return Err(invalid_config(format!(
                "kinetic scale must be finite, got {scale}"
            )));
        }
        Ok(Self {
            grid,
            potential,
            scale,
        })
    }

    pub fn grid(&self) -> &LogGrid {
        &self.grid
    }

    pub fn potential(&self) -> &[f64] {
        &self.potential
    }
}

impl DiscreteOperator for PrimeHamiltonian {
    fn dimension(&self) -> usize {
        self.grid.grid_size()
    }

    fn step(&self) -> f64 {
        self.grid.step()
    }

    fn assemble(&self) -> Result<Mat<f64>, SpectralError> {
        let kinetic = build_kinetic(
            self.dimension(),
            self.step(),
            Stencil::Kinetic { scale: self.scale },
        )?;
        add_potential(kinetic, &self.potential)
    }
}

/// `L = -d²/dt² + 3/4` on `t ∈ [ln ε, t_max]` with Dirichlet boundaries.
///
/// The interval is split into `grid_points` equal steps; the matrix acts on
/// the `grid_points - 1` interior points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialOperator {
    grid_points: usize,
    epsilon: f64,
    t_max: f64,
}

impl RadialOperator {
    pub fn new(grid_points: usize, epsilon: f64, t_max: f64) -> Result<Self, SpectralError> {
        if grid_points < 2 {
            return Err(invalid_config(format!(
                "radial operator needs at least 2 grid steps, got {grid_points}"
            )));
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(invalid_config(format!(
                "epsilon must be positive and finite, got {epsilon}"
            )));
        }
        if !(t_max.is_finite() && t_max > epsilon.ln()) {
            return Err(invalid_config(format!(
                "t_max ({t_max}) must exceed ln(epsilon) ({})",
                epsilon.ln()
            )));
        }
        Ok(Self {
            grid_points,
            epsilon,
            t_max,
        })
    }

    /// Left boundary `ln ε`.
    pub fn t_min(&self) -> f64 {
        self.epsilon.ln()
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn grid_points(&self) -> usize {
        self.grid_points
    }
}

impl DiscreteOperator for RadialOperator {
    fn dimension(&self) -> usize {
        self.grid_points - 1
    }

    fn step(&self) -> f64 {
        (self.t_max - self.t_min()) / self.grid_points as f64
    }

    fn assemble(&self) -> Result<Mat<f64>, SpectralError> {
        build_kinetic(self.dimension(), self.step(), Stencil::Radial)
    }
}
