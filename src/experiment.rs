//! Parametrized experiment runner.
//!
//! An [`ExperimentConfig`] fully determines one run: which operator line to
//! build ([`OperatorConfig`]), how many eigenvalues to compute, and how many
//! reference zeros to compare against. The named [`Preset`]s reproduce every
//! numeric configuration the exploratory runs used. Their coupling constants
//! were tuned by hand and differ by orders of magnitude.
//!
//! The two lines are compared differently:
//!
//! - **Prime potential**: eigenvalues are mapped to heights `sqrt(λ)` and
//!   paired in order with the reference heights τ.
//! - **Radial**: each predicted eigenvalue `τ² + 1/2` is matched to the nearest
//!   computed eigenvalue.

use crate::{
    comparison::{
        ConvergenceFit, DEFAULT_TOLERANCES, ErrorSummary, ToleranceCount, ZeroMatch,
        compare_in_order, convergence_rate, count_within_tolerance, match_nearest,
    },
    error::{SpectralError, SpectralErrorKind, invalid_config},
    operator::{DiscreteOperator, PrimeHamiltonian, RadialOperator, SCHRODINGER_SCALE},
    potential::{LogGrid, PlacementCounts, PotentialStatistics, build_potential_with_counts},
    primes::{PartitionStatistics, PrimePartition},
    solvers::{EigenRange, approximate_zero_heights, solve_eigenvalues},
    zeta::predicted_radial_eigenvalue,
};
use serde::Serialize;
use std::time::Instant;

/// Sieve limits above this are rejected; the sieve allocates one byte per integer.
pub const MAX_PRIME_LIMIT: usize = 1_000_000_000;

/// Configuration of the kinetic + prime potential line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimePotentialConfig {
    pub y_min: f64,
    pub y_max: f64,
    pub grid_size: usize,
    pub coupling: f64,
    /// Sieve limit; defaults to `floor(exp(y_max))`, the largest prime that
    /// can land on the grid.
    pub prime_limit: Option<usize>,
    /// Scale of the second-difference term; −1/2 for `-1/2 · d²/dy²`.
    pub kinetic_scale: f64,
}

impl PrimePotentialConfig {
    pub fn new(y_min: f64, y_max: f64, grid_size: usize, coupling: f64) -> Self {
        Self {
            y_min,
            y_max,
            grid_size,
            coupling,
            prime_limit: None,
            kinetic_scale: SCHRODINGER_SCALE,
        }
    }

    /// The sieve limit actually used.
    pub fn prime_limit(&self) -> usize {
        self.prime_limit
            .unwrap_or_else(|| self.y_max.exp().floor() as usize)
    }
}

/// Configuration of the radial line `-d²/dt² + 3/4` on `[ln ε, t_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialConfig {
    /// Number of grid steps; the matrix has `grid_points - 1` rows.
    pub grid_points: usize,
    pub epsilon: f64,
    pub t_max: f64,
}

/// Which operator line an experiment runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum OperatorConfig {
    PrimePotential(PrimePotentialConfig),
    Radial(RadialConfig),
}

/// Everything needed to run one experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentConfig {
    pub operator: OperatorConfig,
    /// Number of lowest eigenvalues to compute; `None` computes all of them.
    pub eigen_count: Option<usize>,
    /// Number of reference zeros to compare against.
    pub num_zeros: usize,
    /// Absolute error below which a comparison counts as a match.
    pub tolerance: f64,
}

impl ExperimentConfig {
    /// Rejects configurations that would produce empty or degenerate
    /// structures, before any matrix work begins.
    pub fn validate(&self) -> Result<(), SpectralError> {
        let dimension = match &self.operator {
            OperatorConfig::PrimePotential(c) => {
                LogGrid::new(c.y_min, c.y_max, c.grid_size)?;
                if !c.coupling.is_finite() {
                    return Err(invalid_config(format!(
                        "coupling must be finite, got {}",
                        c.coupling
                    )));
                }
                if !c.kinetic_scale.is_finite() || c.kinetic_scale == 0.0 {
                    return Err(invalid_config(format!(
                        "kinetic scale must be finite and non-zero, got {}",
                        c.kinetic_scale
                    )));
                }
                let limit = c.prime_limit();
                if limit < 2 {
                    return Err(invalid_config(format!(
                        "sieve limit must be at least 2, got {limit}"
                    )));
                }
                if limit > MAX_PRIME_LIMIT {
                    return Err(invalid_config(format!(
                        "sieve limit {limit} exceeds the maximum of {MAX_PRIME_LIMIT}"
                    )));
                }
                c.grid_size
            }
            OperatorConfig::Radial(c) => {
                RadialOperator::new(c.grid_points, c.epsilon, c.t_max)?.dimension()
            }
        };

        if let Some(count) = self.eigen_count {
            if count == 0 || count > dimension {
                return Err(invalid_config(format!(
                    "eigenvalue count must be in 1..={dimension}, got {count}"
                )));
            }
        }
        if self.num_zeros == 0 {
            return Err(invalid_config("at least one reference zero must be compared"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(invalid_config(format!(
                "tolerance must be non-negative and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    fn eigen_range(&self) -> EigenRange {
        self.eigen_count.map_or(EigenRange::All, EigenRange::Lowest)
    }
}

/// The named configurations of the exploratory runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Library defaults: N = 1000 on `[0, 10)`, coupling 1, primes up to 10 000.
    CoreDefault,
    /// High-resolution Hamiltonian: N = 5000 on `[0, 9)`, coupling 2·10⁵.
    Hamiltonian,
    /// Rescaled Hamiltonian: N = 2000 on `[0, 7)`, coupling 25 000.
    HamiltonianFixed,
    /// Small debugging run: N = 1000 on `[0, 6)`, coupling 10³.
    Debug,
    /// Radial sanity check: N = 1000, ε = 10⁻³, T = 10.
    RadialCheck,
    /// Radial convergence study up to N = 8000, ε = 10⁻⁸, T = 20.
    RadialRigorous,
    /// Largest radial run: N = 16 000, ε = 10⁻¹⁰, T = 25.
    RadialUltra,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::CoreDefault,
        Preset::Hamiltonian,
        Preset::HamiltonianFixed,
        Preset::Debug,
        Preset::RadialCheck,
        Preset::RadialRigorous,
        Preset::RadialUltra,
    ];

    pub fn config(self) -> ExperimentConfig {
        let prime = |y_max: f64,
                     grid_size: usize,
                     coupling: f64,
                     prime_limit: Option<usize>,
                     eigen_count: usize,
                     num_zeros: usize| ExperimentConfig {
            operator: OperatorConfig::PrimePotential(PrimePotentialConfig {
                prime_limit,
                ..PrimePotentialConfig::new(0.0, y_max, grid_size, coupling)
            }),
            eigen_count: Some(eigen_count),
            num_zeros,
            tolerance: 0.5,
        };
        let radial = |grid_points: usize, epsilon: f64, t_max: f64, num_zeros: usize, tolerance| {
            ExperimentConfig {
                operator: OperatorConfig::Radial(RadialConfig {
                    grid_points,
                    epsilon,
                    t_max,
                }),
                eigen_count: None,
                num_zeros,
                tolerance,
            }
        };

        match self {
            Preset::CoreDefault => prime(10.0, 1000, 1.0, Some(10_000), 15, 15),
            Preset::Hamiltonian => prime(9.0, 5000, 2e5, None, 15, 15),
            Preset::HamiltonianFixed => prime(7.0, 2000, 25_000.0, None, 25, 10),
            Preset::Debug => prime(6.0, 1000, 1e3, None, 20, 5),
            Preset::RadialCheck => radial(1000, 1e-3, 10.0, 5, 0.5),
            Preset::RadialRigorous => radial(8000, 1e-8, 20.0, 15, 0.1),
            Preset::RadialUltra => radial(16_000, 1e-10, 25.0, 10, 0.001),
        }
    }

    /// Grid sizes for a convergence study, for the presets that define one.
    pub fn convergence_grid(self) -> Option<Vec<usize>> {
        match self {
            Preset::RadialRigorous => Some(vec![500, 1000, 2000, 4000, 8000]),
            _ => None,
        }
    }
}

/// Prime-side diagnostics for the prime potential line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PotentialReport {
    pub prime_limit: usize,
    pub partition: PartitionStatistics,
    pub placement: PlacementCounts,
    pub statistics: Option<PotentialStatistics>,
}

/// Everything one experiment run produces.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub dimension: usize,
    pub step: f64,
    /// Computed eigenvalues, ascending.
    pub eigenvalues: Vec<f64>,
    /// `sqrt(λ)` for every strictly positive eigenvalue.
    pub zero_heights: Vec<f64>,
    pub matches: Vec<ZeroMatch>,
    /// Summary of `matches[..].absolute_error`; `None` when nothing was compared.
    pub absolute_errors: Option<ErrorSummary>,
    /// Summary of relative errors in percent.
    pub relative_errors_percent: Option<ErrorSummary>,
    /// Matches within the configured tolerance.
    pub within_tolerance: Option<ToleranceCount>,
    /// Matches within each of [`DEFAULT_TOLERANCES`].
    pub tolerance_counts: Vec<ToleranceCount>,
    pub potential: Option<PotentialReport>,
    pub elapsed_s: f64,
}

/// Builds the operator for `config`, along with prime diagnostics when the
/// prime potential line is selected.
pub fn build_operator(
    config: &OperatorConfig,
) -> Result<(Box<dyn DiscreteOperator>, Option<PotentialReport>), SpectralError> {
    match config {
        OperatorConfig::PrimePotential(c) => {
            let grid = LogGrid::new(c.y_min, c.y_max, c.grid_size)?;
            let prime_limit = c.prime_limit();
            let partition = PrimePartition::up_to(prime_limit);
            let (potential, placement) = build_potential_with_counts(&partition, &grid, c.coupling);
            let report = PotentialReport {
                prime_limit,
                partition: partition.statistics(),
                placement,
                statistics: PotentialStatistics::of(&potential),
            };
            let hamiltonian = PrimeHamiltonian::new(grid, potential, c.kinetic_scale)?;
            Ok((Box::new(hamiltonian), Some(report)))
        }
        OperatorConfig::Radial(c) => {
            let radial = RadialOperator::new(c.grid_points, c.epsilon, c.t_max)?;
            Ok((Box::new(radial), None))
        }
    }
}

fn take_reference<'a>(reference: &'a [f64], num_zeros: usize) -> Result<&'a [f64], SpectralError> {
    if reference.len() < num_zeros {
        return Err(SpectralErrorKind::InsufficientData {
            needed: num_zeros,
            actual: reference.len(),
        }
        .into());
    }
    Ok(&reference[..num_zeros])
}

/// Runs one experiment against a reference table of zero heights.
pub fn run_experiment(
    config: &ExperimentConfig,
    reference: &[f64],
) -> Result<ExperimentReport, SpectralError> {
    config.validate()?;
    let taus = take_reference(reference, config.num_zeros)?;
    let start = Instant::now();

    let (operator, potential) = build_operator(&config.operator)?;
    let matrix = operator.assemble()?;
    let eigenvalues = solve_eigenvalues(matrix.as_ref(), config.eigen_range())?;
    drop(matrix);
    let zero_heights = approximate_zero_heights(&eigenvalues);

    let matches = match config.operator {
        OperatorConfig::PrimePotential(_) => compare_in_order(&zero_heights, taus)?,
        OperatorConfig::Radial(_) => {
            let predicted: Vec<f64> = taus.iter().map(|&t| predicted_radial_eigenvalue(t)).collect();
            match_nearest(&eigenvalues, &predicted)?
        }
    };
    if matches.is_empty() {
        log::warn!("No positive eigenvalues were available for comparison.");
    }

    let absolute: Vec<f64> = matches.iter().map(|m| m.absolute_error).collect();
    let relative_percent = matches
        .iter()
        .map(|m| m.relative_error().map(|e| 100.0 * e))
        .collect::<Result<Vec<f64>, _>>()?;

    let (absolute_errors, relative_errors_percent, within_tolerance, tolerance_counts) =
        if matches.is_empty() {
            (None, None, None, Vec::new())
        } else {
            (
                Some(ErrorSummary::of(&absolute)?),
                Some(ErrorSummary::of(&relative_percent)?),
                Some(count_within_tolerance(&absolute, config.tolerance)?),
                DEFAULT_TOLERANCES
                    .iter()
                    .map(|&tol| count_within_tolerance(&absolute, tol))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

    let elapsed_s = start.elapsed().as_secs_f64();
    log::info!(
        "Experiment on a {}-dimensional operator finished in {elapsed_s:.3}s: {} eigenvalues, {} positive",
        operator.dimension(),
        eigenvalues.len(),
        zero_heights.len()
    );

    Ok(ExperimentReport {
        dimension: operator.dimension(),
        step: operator.step(),
        eigenvalues,
        zero_heights,
        matches,
        absolute_errors,
        relative_errors_percent,
        within_tolerance,
        tolerance_counts,
        potential,
        elapsed_s,
    })
}

/// One grid resolution of a convergence study.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceRun {
    pub grid_points: usize,
    pub elapsed_s: f64,
    pub eigenvalue_count: usize,
    pub min_eigenvalue: f64,
    pub max_eigenvalue: f64,
}

/// The nearest-match error of one zero at one grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceSample {
    pub grid_points: usize,
    pub zero_index: usize,
    pub tau: f64,
    pub predicted: f64,
    pub nearest: f64,
    pub absolute_error: f64,
}

/// Fitted convergence order for one zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZeroConvergence {
    pub zero_index: usize,
    pub tau: f64,
    pub fit: ConvergenceFit,
}

/// Result of a radial convergence study.
#[derive(Debug, Clone)]
pub struct ConvergenceStudy {
    pub runs: Vec<ConvergenceRun>,
    pub samples: Vec<ConvergenceSample>,
    pub fits: Vec<ZeroConvergence>,
    /// Matches at the finest grid.
    pub final_matches: Vec<ZeroMatch>,
}

/// Runs the radial operator at each of `grid_points` and fits the empirical
/// convergence order of the nearest-match error of each reference zero.
pub fn run_convergence_study(
    base: &RadialConfig,
    grid_points: &[usize],
    num_zeros: usize,
    reference: &[f64],
) -> Result<ConvergenceStudy, SpectralError> {
    if grid_points.len() < 2 {
        return Err(SpectralErrorKind::InsufficientData {
            needed: 2,
            actual: grid_points.len(),
        }
        .into());
    }
    if num_zeros == 0 {
        return Err(invalid_config("at least one reference zero must be compared"));
    }
    let taus = take_reference(reference, num_zeros)?;
    let predicted: Vec<f64> = taus.iter().map(|&t| predicted_radial_eigenvalue(t)).collect();

    let mut runs = Vec::with_capacity(grid_points.len());
    let mut samples = Vec::with_capacity(grid_points.len() * num_zeros);
    let mut final_matches = Vec::new();

    for &n in grid_points {
        log::info!("Computing radial spectrum for N = {n}...");
        let start = Instant::now();
        let operator = RadialOperator::new(n, base.epsilon, base.t_max)?;
        let matrix = operator.assemble()?;
        let eigenvalues = solve_eigenvalues(matrix.as_ref(), EigenRange::All)?;
        let elapsed_s = start.elapsed().as_secs_f64();

        let matches = match_nearest(&eigenvalues, &predicted)?;
        for (m, &tau) in matches.iter().zip(taus) {
            samples.push(ConvergenceSample {
                grid_points: n,
                zero_index: m.target_index,
                tau,
                predicted: m.target,
                nearest: m.computed,
                absolute_error: m.absolute_error,
            });
        }
        runs.push(ConvergenceRun {
            grid_points: n,
            elapsed_s,
            eigenvalue_count: eigenvalues.len(),
            min_eigenvalue: eigenvalues[0],
            max_eigenvalue: eigenvalues[eigenvalues.len() - 1],
        });
        final_matches = matches;
    }

    let fits = taus
        .iter()
        .enumerate()
        .map(|(i, &tau)| -> Result<ZeroConvergence, SpectralError> {
            let errors: Vec<f64> = samples
                .iter()
                .filter(|s| s.zero_index == i + 1)
                .map(|s| s.absolute_error)
                .collect();
            Ok(ZeroConvergence {
                zero_index: i + 1,
                tau,
                fit: convergence_rate(grid_points, &errors)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConvergenceStudy {
        runs,
        samples,
        fits,
        final_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zeta::reference_zero_heights;

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            preset.config().validate().unwrap();
        }
        assert!(Preset::RadialRigorous.convergence_grid().is_some());
        assert!(Preset::Debug.convergence_grid().is_none());
    }

    #[test]
    fn test_preset_sieve_limits_and_zero_counts() {
        let expected = [
            (Preset::CoreDefault, Some(10_000), 15),
            (Preset::Hamiltonian, Some(8103), 15),
            (Preset::HamiltonianFixed, Some(1096), 10),
            (Preset::Debug, Some(403), 5),
            (Preset::RadialCheck, None, 5),
            (Preset::RadialRigorous, None, 15),
            (Preset::RadialUltra, None, 10),
        ];
        for (preset, prime_limit, num_zeros) in expected {
            let config = preset.config();
            let limit = match &config.operator {
                OperatorConfig::PrimePotential(c) => Some(c.prime_limit()),
                OperatorConfig::Radial(_) => None,
            };
            assert_eq!(limit, prime_limit, "{preset:?}");
            assert_eq!(config.num_zeros, num_zeros, "{preset:?}");
        }
    }

    #[test]
    fn test_default_prime_limit_follows_y_max() {
        let config = PrimePotentialConfig::new(0.0, 7.0, 2000, 25_000.0);
        assert_eq!(config.prime_limit(), 1096);
    }

    #[test]
    fn test_validation_rejects_degenerate_configs() {
        let mut config = Preset::Debug.config();
        if let OperatorConfig::PrimePotential(c) = &mut config.operator {
            c.grid_size = 0;
        }
        assert!(config.validate().is_err());

        let mut config = Preset::Debug.config();
        if let OperatorConfig::PrimePotential(c) = &mut config.operator {
            c.y_min = 6.0;
        }
        assert!(config.validate().is_err());

        let mut config = Preset::Debug.config();
        if let OperatorConfig::PrimePotential(c) = &mut config.operator {
            c.prime_limit = Some(1);
        }
        let err = config.validate().unwrap_err();
        assert!(matches!(err.kind(), SpectralErrorKind::InvalidConfig(_)));

        let mut config = Preset::RadialCheck.config();
        config.eigen_count = Some(1000);
        assert!(config.validate().is_err());

        let mut config = Preset::RadialCheck.config();
        config.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_small_prime_run() {
        let config = ExperimentConfig {
            operator: OperatorConfig::PrimePotential(PrimePotentialConfig::new(0.0, 6.0, 200, 1e3)),
            eigen_count: Some(20),
            num_zeros: 5,
            tolerance: 0.5,
        };
        let report = run_experiment(&config, reference_zero_heights()).unwrap();
        assert_eq!(report.dimension, 200);
        assert_eq!(report.eigenvalues.len(), 20);
        assert!(report.eigenvalues.windows(2).all(|w| w[0] <= w[1]));
        assert!(report.matches.len() <= 5);

        let potential = report.potential.unwrap();
        assert_eq!(potential.prime_limit, 403);
        assert_eq!(potential.placement.total(), potential.partition.total_count);
    }

    #[test]
    fn test_reference_table_too_short() {
        let config = Preset::RadialCheck.config();
        let err = run_experiment(&config, &[14.13]).unwrap_err();
        assert_eq!(
            err.kind(),
            &SpectralErrorKind::InsufficientData {
                needed: 5,
                actual: 1
            }
        );
    }

    #[test]
    fn test_small_convergence_study() {
        let base = RadialConfig {
            grid_points: 0,
            epsilon: 1e-3,
            t_max: 10.0,
        };
        let study =
            run_convergence_study(&base, &[100, 200, 400], 3, reference_zero_heights()).unwrap();
        assert_eq!(study.runs.len(), 3);
        assert_eq!(study.samples.len(), 9);
        assert_eq!(study.fits.len(), 3);
        assert_eq!(study.final_matches.len(), 3);
        assert!(study.runs.iter().all(|r| r.min_eigenvalue > 0.75));
        assert!(study.fits.iter().all(|f| f.fit.slope.is_finite()));

        assert!(run_convergence_study(&base, &[100], 3, reference_zero_heights()).is_err());
    }
}
