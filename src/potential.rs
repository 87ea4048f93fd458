//! The prime potential on a uniform logarithmic grid.
//!
//! Each prime `p` contributes a signed weight `σ(p) · p^(-1/2) · coupling` to
//! the grid cell containing `y = ln p`:
//!
//! ```text
//! V(y) = coupling · Σ_p σ(p) · p^(-1/2) · δ(y - ln p)
//! ```
//!
//! where `σ` is +1 for Euclidean and anchor primes and −1 for hyperbolic
//! primes (see [`crate::primes::PrimeClass`]). Primes landing in the same cell
//! accumulate.

use crate::{
    error::{SpectralError, SpectralErrorKind, invalid_config},
    primes::{PrimeClass, PrimePartition},
};
use serde::Serialize;

/// A uniform grid of `grid_size` cells over the half-open range `[y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogGrid {
    y_min: f64,
    y_max: f64,
    grid_size: usize,
}

impl LogGrid {
    /// Creates a grid, rejecting empty or inverted ranges.
    pub fn new(y_min: f64, y_max: f64, grid_size: usize) -> Result<Self, SpectralError> {
        if grid_size == 0 {
            return Err(SpectralErrorKind::DimensionMismatch {
                expected: 1,
                actual: 0,
            }
            .into());
        }
        if !y_min.is_finite() || !y_max.is_finite() {
            return Err(invalid_config(format!(
                "grid bounds must be finite, got [{y_min}, {y_max})"
            )));
        }
        if y_min >= y_max {
            return Err(invalid_config(format!(
                "y_min ({y_min}) must be smaller than y_max ({y_max})"
            )));
        }
        Ok(Self {
            y_min,
            y_max,
            grid_size,
        })
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Cell width `(y_max - y_min) / grid_size`.
    pub fn step(&self) -> f64 {
        (self.y_max - self.y_min) / self.grid_size as f64
    }

    /// Index of the cell containing `y`, or `None` when `y` lies outside the
    /// open interval `(y_min, y_max)`.
    pub fn cell_of(&self, y: f64) -> Option<usize> {
        if !(self.y_min < y && y < self.y_max) {
            return None;
        }
        let idx = ((y - self.y_min) / self.step()).floor() as usize;
        // Rounding can push a value just below y_max onto grid_size.
        (idx < self.grid_size).then_some(idx)
    }

    /// The `grid_size` sample coordinates `linspace(y_min, y_max, grid_size)`.
    pub fn coordinates(&self) -> Vec<f64> {
        if self.grid_size == 1 {
            return vec![self.y_min];
        }
        let spacing = (self.y_max - self.y_min) / (self.grid_size - 1) as f64;
        (0..self.grid_size)
            .map(|i| self.y_min + spacing * i as f64)
            .collect()
    }
}

/// The signed weight a single prime contributes, before coupling.
pub fn prime_weight(class: PrimeClass, p: u64) -> f64 {
    class.sign() * (p as f64).powf(-0.5)
}

/// Builds the potential vector for a partition on `grid`.
///
/// Out-of-range primes are skipped silently. A zero coupling produces the
/// all-zero vector.
pub fn build_potential(partition: &PrimePartition, grid: &LogGrid, coupling: f64) -> Vec<f64> {
    build_potential_with_counts(partition, grid, coupling).0
}

/// Number of primes from each class that landed on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlacementCounts {
    pub euclidean: usize,
    pub hyperbolic: usize,
    pub anchor: usize,
}

impl PlacementCounts {
    pub fn total(&self) -> usize {
        self.euclidean + self.hyperbolic + self.anchor
    }
}

/// Like [`build_potential`], but also reports how many primes of each class
/// were placed.
pub fn build_potential_with_counts(
    partition: &PrimePartition,
    grid: &LogGrid,
    coupling: f64,
) -> (Vec<f64>, PlacementCounts) {
    let mut potential = vec![0.0; grid.grid_size()];
    let mut counts = PlacementCounts::default();

    for (class, p) in partition.iter() {
        let Some(idx) = grid.cell_of((p as f64).ln()) else {
            continue;
        };
        potential[idx] += prime_weight(class, p) * coupling;
        match class {
            PrimeClass::Euclidean => counts.euclidean += 1,
            PrimeClass::Hyperbolic => counts.hyperbolic += 1,
            PrimeClass::Anchor => counts.anchor += 1,
        }
    }

    log::debug!(
        "Placed {} primes on a {}-cell grid over [{}, {})",
        counts.total(),
        grid.grid_size(),
        grid.y_min(),
        grid.y_max()
    );
    (potential, counts)
}

/// Summary statistics of a potential vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialStatistics {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub positive_sites: usize,
    pub negative_sites: usize,
    pub zero_sites: usize,
}

impl PotentialStatistics {
    /// Returns `None` for an empty vector.
    pub fn of(potential: &[f64]) -> Option<Self> {
        if potential.is_empty() {
            return None;
        }
        let n = potential.len() as f64;
        let mean = potential.iter().sum::<f64>() / n;
        let variance = potential.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            max: potential.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: potential.iter().copied().fold(f64::INFINITY, f64::min),
            mean,
            std_dev: variance.sqrt(),
            positive_sites: potential.iter().filter(|&&v| v > 0.0).count(),
            negative_sites: potential.iter().filter(|&&v| v < 0.0).count(),
            zero_sites: potential.iter().filter(|&&v| v == 0.0).count(),
        })
    }
}
