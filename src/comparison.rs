//! Comparison of computed spectra against reference values, and the error
//! statistics reported by the experiments.
//!
//! Every function here refuses non-finite input and zero reference values
//! instead of letting NaN or infinity leak into an aggregate.

use crate::error::{SpectralError, SpectralErrorKind};
use serde::Serialize;

/// Default thresholds used when counting matches within tolerance.
pub const DEFAULT_TOLERANCES: [f64; 3] = [0.1, 0.01, 0.001];

/// A target value paired with the computed value it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZeroMatch {
    /// 1-based position of the target in the target list.
    pub target_index: usize,
    pub target: f64,
    pub computed: f64,
    /// `|computed - target|`.
    pub absolute_error: f64,
}

impl ZeroMatch {
    fn new(target_index: usize, target: f64, computed: f64) -> Self {
        Self {
            target_index,
            target,
            computed,
            absolute_error: (computed - target).abs(),
        }
    }

    /// `|computed - target| / |target|`.
    pub fn relative_error(&self) -> Result<f64, SpectralError> {
        relative_error(self.computed, self.target)
    }
}

fn ensure_finite(values: &[f64], what: &str) -> Result<(), SpectralError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(SpectralErrorKind::InputError(format!(
            "{what} contains a non-finite value at index {i}"
        ))
        .into()),
        None => Ok(()),
    }
}

/// For each target, finds the computed value with the smallest absolute
/// difference.
///
/// The scan is linear; on ties the first occurrence wins, which for an
/// ascending `computed` slice is the smaller value.
pub fn match_nearest(computed: &[f64], targets: &[f64]) -> Result<Vec<ZeroMatch>, SpectralError> {
    if computed.is_empty() {
        return Err(SpectralErrorKind::InsufficientData {
            needed: 1,
            actual: 0,
        }
        .into());
    }
    ensure_finite(computed, "computed values")?;
    ensure_finite(targets, "target values")?;

    let matches = targets
        .iter()
        .enumerate()
        .map(|(i, &target)| {
            let mut nearest = computed[0];
            let mut best = (nearest - target).abs();
            for &value in &computed[1..] {
                let distance = (value - target).abs();
                if distance < best {
                    best = distance;
                    nearest = value;
                }
            }
            ZeroMatch::new(i + 1, target, nearest)
        })
        .collect();
    Ok(matches)
}

/// Pairs `computed[i]` with `targets[i]`, position by position, for the
/// shorter of the two lists.
pub fn compare_in_order(computed: &[f64], targets: &[f64]) -> Result<Vec<ZeroMatch>, SpectralError> {
    ensure_finite(computed, "computed values")?;
    ensure_finite(targets, "target values")?;
    Ok(computed
        .iter()
        .zip(targets)
        .enumerate()
        .map(|(i, (&computed, &target))| ZeroMatch::new(i + 1, target, computed))
        .collect())
}

/// `|value - reference| / |reference|`.
///
/// # Errors
/// [`SpectralErrorKind::ZeroReference`] when `reference == 0`.
pub fn relative_error(value: f64, reference: f64) -> Result<f64, SpectralError> {
    if reference == 0.0 {
        return Err(SpectralErrorKind::ZeroReference.into());
    }
    Ok((value - reference).abs() / reference.abs())
}

/// Result of a log-log least-squares fit `ln(error) = slope · ln(1/N) + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceFit {
    /// Empirical order of convergence: `error ~ (1/N)^slope`.
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
}

/// Fits `ln(error)` against `ln(1/grid_size)` by ordinary least squares.
pub fn convergence_rate(
    grid_sizes: &[usize],
    errors: &[f64],
) -> Result<ConvergenceFit, SpectralError> {
    if grid_sizes.len() != errors.len() {
        return Err(SpectralErrorKind::DimensionMismatch {
            expected: grid_sizes.len(),
            actual: errors.len(),
        }
        .into());
    }
    if errors.len() < 2 {
        return Err(SpectralErrorKind::InsufficientData {
            needed: 2,
            actual: errors.len(),
        }
        .into());
    }
    if grid_sizes.contains(&0) {
        return Err(SpectralErrorKind::InputError("grid sizes must be positive".to_string()).into());
    }
    if let Some(e) = errors.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
        return Err(SpectralErrorKind::InputError(format!(
            "errors must be positive and finite for a log-log fit, got {e}"
        ))
        .into());
    }

    let xs: Vec<f64> = grid_sizes.iter().map(|&n| (1.0 / n as f64).ln()).collect();
    let ys: Vec<f64> = errors.iter().map(|e| e.ln()).collect();
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(&ys) {
        let (dx, dy) = (x - x_mean, y - y_mean);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return Err(SpectralErrorKind::InputError(
            "at least two distinct grid sizes are required".to_string(),
        )
        .into());
    }

    let slope = sxy / sxx;
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Ok(ConvergenceFit {
        slope,
        intercept: y_mean - slope * x_mean,
        r_squared,
    })
}

/// Mean, population standard deviation, maximum and minimum of a set of errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

impl ErrorSummary {
    pub fn of(errors: &[f64]) -> Result<Self, SpectralError> {
        if errors.is_empty() {
            return Err(SpectralErrorKind::InsufficientData {
                needed: 1,
                actual: 0,
            }
            .into());
        }
        ensure_finite(errors, "errors")?;

        let n = errors.len() as f64;
        let mean = errors.iter().sum::<f64>() / n;
        let variance = errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        Ok(Self {
            count: errors.len(),
            mean,
            std_dev: variance.sqrt(),
            max: errors.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: errors.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}

/// How many errors fall strictly below a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToleranceCount {
    pub tolerance: f64,
    pub count: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Counts errors `< tolerance`, as a count and a percentage of the total.
pub fn count_within_tolerance(
    errors: &[f64],
    tolerance: f64,
) -> Result<ToleranceCount, SpectralError> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(SpectralErrorKind::InputError(format!(
            "tolerance must be non-negative and finite, got {tolerance}"
        ))
        .into());
    }
    if errors.is_empty() {
        return Err(SpectralErrorKind::InsufficientData {
            needed: 1,
            actual: 0,
        }
        .into());
    }
    ensure_finite(errors, "errors")?;

    let count = errors.iter().filter(|&&e| e < tolerance).count();
    Ok(ToleranceCount {
        tolerance,
        count,
        total: errors.len(),
        percentage: 100.0 * count as f64 / errors.len() as f64,
    })
}

/// The match with the smallest absolute error; the first one on ties.
pub fn best_match(matches: &[ZeroMatch]) -> Option<&ZeroMatch> {
    matches.iter().fold(None, |best, m| match best {
        Some(b) if b.absolute_error <= m.absolute_error => Some(b),
        _ => Some(m),
    })
}
