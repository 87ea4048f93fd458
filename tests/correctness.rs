//! Integration test suite to verify the numerical correctness of the spectral operators.
//!
//! # Test Methodology
//!
//! Both operator lines reduce, for special parameter choices, to a symmetric
//! Toeplitz tridiagonal matrix whose eigenvalues are known in closed form:
//!
//! ```text
//! eig_k( tridiag(b, a, b) ) = a + 2b · cos(kπ / (n + 1)),   k = 1..n
//! ```
//!
//! 1.  **Kinetic operator with zero coupling:** the prime potential vanishes and
//!     `-1/2 · d²/dy²` has eigenvalues `(2/h²) · sin²(kπ / (2(n + 1)))`.
//! 2.  **Radial operator:** `-d²/dt² + 3/4` on `N - 1` interior points has
//!     eigenvalues `3/4 + (4/h²) · sin²(kπ / (2N))`.
//!
//! The computed spectra are compared against these formulas. The remaining
//! tests check invariants that hold for any input: the trace of a random
//! symmetric matrix equals the sum of its eigenvalues, the prime partition is
//! complete and disjoint, and the end-to-end radial scenario stays above the
//! continuous spectrum floor.

use anyhow::{Result, ensure};
use faer::Mat;
use prime_spectrum::{
    EigenRange, LogGrid, PrimePartition, SpectralErrorKind, build_kinetic, build_potential,
    comparison::match_nearest,
    experiment::{
        ExperimentConfig, OperatorConfig, PrimePotentialConfig, RadialConfig, run_experiment,
    },
    generate_primes,
    operator::{DiscreteOperator, PrimeHamiltonian, RadialOperator, SCHRODINGER_SCALE, Stencil},
    solve_eigenvalues,
    zeta::{
        RADIAL_SPECTRUM_FLOOR, ZETA_2, dirichlet_sum, euler_product, predicted_radial_eigenvalue,
        reference_zero_heights,
    },
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Tolerance for eigenvalues relative to the largest eigenvalue magnitude.
///
/// The dense symmetric eigensolver is backward stable, so each eigenvalue is
/// accurate to a small multiple of `ε · ||A||`.
const SPECTRUM_TOLERANCE: f64 = 1e-10;

/// Absolute tolerance for the nearest-match error of the first zero in the
/// radial scenario (`N = 1000`, `ε = 10⁻³`, `T = 10`). The discretization
/// error at this resolution is about 1.07.
const RADIAL_MATCH_TOLERANCE: f64 = 1.5;

/// Closed-form eigenvalues of `tridiag(off, diag, off)` of dimension `n`, ascending
/// when `off < 0`.
fn toeplitz_eigenvalues(n: usize, diag: f64, off: f64) -> Vec<f64> {
    let mut eigs: Vec<f64> = (1..=n)
        .map(|k| diag + 2.0 * off * (k as f64 * std::f64::consts::PI / (n + 1) as f64).cos())
        .collect();
    eigs.sort_by(f64::total_cmp);
    eigs
}

/// Builds a reproducible random symmetric matrix.
fn random_symmetric(n: usize, seed: u64) -> Mat<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = Mat::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..=j {
            let v: f64 = rng.random::<f64>() * 2.0 - 1.0;
            a[(i, j)] = v;
            a[(j, i)] = v;
        }
    }
    a
}

fn max_deviation(computed: &[f64], exact: &[f64]) -> f64 {
    computed
        .iter()
        .zip(exact)
        .map(|(c, e)| (c - e).abs())
        .fold(0.0, f64::max)
}

/// A macro to generate the boilerplate for each closed-form spectrum test.
///
/// 1. Build the operator matrix with `$build`.
/// 2. Compute its full spectrum.
/// 3. Compare against `toeplitz_eigenvalues(n, diag, off)`, where
///    `(diag, off)` is returned by `$coefficients(n)`.
macro_rules! generate_spectrum_test {
    ($test_name:ident, $n:expr, $build:expr, $coefficients:expr) => {
        #[test]
        fn $test_name() -> Result<()> {
            let n: usize = $n;
            let matrix: Mat<f64> = $build(n)?;
            ensure!(matrix.nrows() == n, "expected dimension {}, got {}", n, matrix.nrows());

            let computed = solve_eigenvalues(matrix.as_ref(), EigenRange::All)?;
            let (diag, off): (f64, f64) = $coefficients(n);
            let exact = toeplitz_eigenvalues(n, diag, off);

            let scale = exact.iter().fold(1.0_f64, |m, e| m.max(e.abs()));
            let deviation = max_deviation(&computed, &exact);
            ensure!(
                deviation < SPECTRUM_TOLERANCE * scale,
                "Eigenvalues deviate from the closed form by {:.3e} (scale {:.3e})",
                deviation,
                scale
            );
            Ok(())
        }
    };
}

generate_spectrum_test!(
    test_kinetic_zero_coupling_spectrum,
    120,
    |n: usize| -> Result<Mat<f64>> {
        let grid = LogGrid::new(0.0, 10.0, n)?;
        let potential = build_potential(&PrimePartition::up_to(22_026), &grid, 0.0);
        Ok(PrimeHamiltonian::new(grid, potential, SCHRODINGER_SCALE)?.assemble()?)
    },
    |n: usize| {
        let h = 10.0 / n as f64;
        (1.0 / (h * h), -0.5 / (h * h))
    }
);

generate_spectrum_test!(
    test_radial_spectrum,
    299,
    |n: usize| -> Result<Mat<f64>> { Ok(RadialOperator::new(n + 1, 1e-3, 10.0)?.assemble()?) },
    |n: usize| {
        let h = (10.0 - 1e-3f64.ln()) / (n + 1) as f64;
        (2.0 / (h * h) + 0.75, -1.0 / (h * h))
    }
);

generate_spectrum_test!(
    test_scaled_kinetic_spectrum,
    64,
    |n: usize| -> Result<Mat<f64>> { Ok(build_kinetic(n, 0.25, Stencil::Kinetic { scale: 2.0 })?) },
    |_n: usize| (-2.0 * 2.0 * 16.0, 2.0 * 16.0)
);

#[test]
fn test_zero_coupling_matches_sine_formula() -> Result<()> {
    let n = 80;
    let h = 0.1;
    let matrix = build_kinetic(n, h, Stencil::Kinetic { scale: SCHRODINGER_SCALE })?;
    let computed = solve_eigenvalues(matrix.as_ref(), EigenRange::Lowest(10))?;
    for (k, &lambda) in computed.iter().enumerate() {
        let angle = (k + 1) as f64 * std::f64::consts::PI / (2.0 * (n + 1) as f64);
        let exact = 2.0 / (h * h) * angle.sin().powi(2);
        ensure!(
            (lambda - exact).abs() < 1e-9,
            "k = {}: computed {}, exact {}",
            k + 1,
            lambda,
            exact
        );
    }
    Ok(())
}

#[test]
fn test_random_symmetric_trace_equals_eigenvalue_sum() -> Result<()> {
    let n = 60;
    let a = random_symmetric(n, 42);
    let trace: f64 = (0..n).map(|i| a[(i, i)]).sum();
    let frobenius_sq: f64 = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| a[(i, j)] * a[(i, j)])
        .sum();

    let eigs = solve_eigenvalues(a.as_ref(), EigenRange::All)?;
    ensure!(eigs.len() == n, "expected {} eigenvalues, got {}", n, eigs.len());
    ensure!(
        eigs.windows(2).all(|w| w[0] <= w[1]),
        "eigenvalues are not ascending"
    );

    let sum: f64 = eigs.iter().sum();
    let sum_sq: f64 = eigs.iter().map(|e| e * e).sum();
    ensure!((trace - sum).abs() < 1e-9, "trace {} != eigenvalue sum {}", trace, sum);
    ensure!(
        (frobenius_sq - sum_sq).abs() < 1e-8 * frobenius_sq,
        "||A||_F² {} != Σλ² {}",
        frobenius_sq,
        sum_sq
    );
    Ok(())
}

#[test]
fn test_radial_end_to_end_scenario() -> Result<()> {
    let config = ExperimentConfig {
        operator: OperatorConfig::Radial(RadialConfig {
            grid_points: 1000,
            epsilon: 1e-3,
            t_max: 10.0,
        }),
        eigen_count: None,
        num_zeros: 1,
        tolerance: RADIAL_MATCH_TOLERANCE,
    };
    let report = run_experiment(&config, reference_zero_heights())?;

    ensure!(report.dimension == 999, "unexpected dimension {}", report.dimension);
    ensure!(
        report.eigenvalues[0] > RADIAL_SPECTRUM_FLOOR,
        "first eigenvalue {} is not above {}",
        report.eigenvalues[0],
        RADIAL_SPECTRUM_FLOOR
    );

    let predicted = predicted_radial_eigenvalue(reference_zero_heights()[0]);
    ensure!((predicted - 200.290_454_832).abs() < 1e-6, "predicted {}", predicted);

    let first = &report.matches[0];
    ensure!(first.target == predicted, "target {} != {}", first.target, predicted);
    ensure!(
        first.absolute_error < RADIAL_MATCH_TOLERANCE,
        "nearest eigenvalue {} is {} away from {}",
        first.computed,
        first.absolute_error,
        predicted
    );
    ensure!(
        report.within_tolerance.map(|t| t.count) == Some(1),
        "tolerance count disagrees with the match"
    );

    let direct = match_nearest(&report.eigenvalues, &[predicted])?;
    ensure!(direct[0] == *first, "runner and direct match disagree");
    Ok(())
}

#[test]
fn test_prime_potential_experiment() -> Result<()> {
    let config = ExperimentConfig {
        operator: OperatorConfig::PrimePotential(PrimePotentialConfig::new(0.0, 7.0, 300, 25_000.0)),
        eigen_count: Some(25),
        num_zeros: 10,
        tolerance: 0.5,
    };
    let report = run_experiment(&config, reference_zero_heights())?;

    ensure!(report.eigenvalues.len() == 25, "expected 25 eigenvalues");
    ensure!(
        report.zero_heights.iter().all(|&t| t > 0.0),
        "zero heights must be positive"
    );
    let positive = report.eigenvalues.iter().filter(|&&l| l > 0.0).count();
    ensure!(report.zero_heights.len() == positive, "zero heights do not match positive eigenvalues");
    ensure!(
        report.matches.len() == positive.min(10),
        "in-order comparison must truncate to the shorter list"
    );

    let potential = report.potential.as_ref().map(|p| p.prime_limit);
    ensure!(potential == Some(1096), "default sieve limit should be floor(e^7)");
    Ok(())
}

#[test]
fn test_invalid_configuration_fails_before_assembly() -> Result<()> {
    let mut config = ExperimentConfig {
        operator: OperatorConfig::PrimePotential(PrimePotentialConfig::new(5.0, 5.0, 100, 1.0)),
        eigen_count: None,
        num_zeros: 5,
        tolerance: 0.5,
    };
    let err = run_experiment(&config, reference_zero_heights())
        .err()
        .ok_or_else(|| anyhow::anyhow!("y_min == y_max must be rejected"))?;
    ensure!(
        matches!(err.kind(), SpectralErrorKind::InvalidConfig(_)),
        "unexpected error {err}"
    );

    config.operator = OperatorConfig::Radial(RadialConfig {
        grid_points: 100,
        epsilon: -1.0,
        t_max: 10.0,
    });
    ensure!(
        run_experiment(&config, reference_zero_heights()).is_err(),
        "negative epsilon must be rejected"
    );
    Ok(())
}

#[test]
fn test_partition_is_complete_and_disjoint() -> Result<()> {
    let primes = generate_primes(10_000);
    let partition = PrimePartition::new(&primes);
    ensure!(partition.len() == primes.len(), "partition lost primes");

    let mut reassembled: Vec<u64> = partition.iter().map(|(_, p)| p).collect();
    reassembled.sort_unstable();
    ensure!(reassembled == primes, "partition is not a permutation of the primes");

    ensure!(partition.anchor == vec![2], "anchor class must be exactly [2]");
    ensure!(
        partition.euclidean.iter().all(|p| p % 4 == 1),
        "euclidean class contains a prime not 1 mod 4"
    );
    ensure!(
        partition.hyperbolic.iter().all(|p| p % 4 == 3),
        "hyperbolic class contains a prime not 3 mod 4"
    );
    Ok(())
}

#[test]
fn test_potential_is_linear_in_coupling() -> Result<()> {
    let grid = LogGrid::new(0.0, 8.0, 257)?;
    let partition = PrimePartition::up_to(2980);
    let unit = build_potential(&partition, &grid, 1.0);
    let scaled = build_potential(&partition, &grid, -3.5);
    for (u, s) in unit.iter().zip(&scaled) {
        ensure!((s + 3.5 * u).abs() < 1e-12, "potential is not linear in the coupling");
    }
    let zero = build_potential(&partition, &grid, 0.0);
    ensure!(zero.iter().all(|&v| v == 0.0), "zero coupling must give a zero potential");
    Ok(())
}

#[test]
fn test_zeta_2_regression() -> Result<()> {
    let dirichlet = dirichlet_sum(2.0, 2000);
    let euler = euler_product(2.0, 2000);
    ensure!((dirichlet - ZETA_2).abs() < 1e-3, "Dirichlet sum {} vs π²/6", dirichlet);
    ensure!((euler - ZETA_2).abs() < 1e-3, "Euler product {} vs π²/6", euler);
    Ok(())
}
