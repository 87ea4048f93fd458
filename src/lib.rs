//! Finite-difference spectral operators built from prime data.
//!
//! This crate builds one-dimensional discretized operators, computes their
//! spectra with a dense symmetric eigensolver, and compares the result against
//! the heights τ of the first nontrivial zeros `1/2 + iτ` of the Riemann zeta
//! function. It is an experimental workbench: nothing here claims that the
//! operators converge to anything, only that the numbers are computed and
//! compared consistently.
//!
//! Built on the [`faer`] linear algebra framework, every operator is assembled
//! as a dense symmetric matrix and decomposed with
//! [`faer::MatRef::self_adjoint_eigenvalues`].
//!
//! ## Operators
//!
//! **Prime Hamiltonian** ([`operator::PrimeHamiltonian`]): `H = -1/2 · d²/dy² + V(y)`
//! on a uniform grid in `y = ln p`. The potential `V` places a signed weight
//! `±p^(-1/2)` for each prime in the grid cell containing `ln p`, with the sign
//! given by the residue class of `p` modulo 4 ([`primes::PrimeClass`]).
//! Eigenvalues are mapped to zero heights `sqrt(λ)` and compared in order.
//!
//! **Radial operator** ([`operator::RadialOperator`]): `L = -d²/dt² + 3/4` on
//! `t ∈ [ln ε, T]`. A zero at height τ predicts the eigenvalue `τ² + 1/2`, which
//! is matched against the nearest computed eigenvalue.
//!
//! Both are selected through [`experiment::OperatorConfig`] and run by
//! [`experiment::run_experiment`].
//!
//! ## Example Usage
//!
//! The following example runs the radial operator on a coarse grid and
//! checks the first computed eigenvalue against the continuous spectrum floor.
//!
//! ```rust
//! use prime_spectrum::experiment::{ExperimentConfig, OperatorConfig, RadialConfig, run_experiment};
//! use prime_spectrum::zeta::{RADIAL_SPECTRUM_FLOOR, reference_zero_heights};
//!
//! let config = ExperimentConfig {
//!     operator: OperatorConfig::Radial(RadialConfig {
//!         grid_points: 200,
//!         epsilon: 1e-3,
//!         t_max: 10.0,
//!     }),
//!     eigen_count: None,
//!     num_zeros: 3,
//!     tolerance: 0.5,
//! };
//!
//! let report = run_experiment(&config, reference_zero_heights()).unwrap();
//! assert_eq!(report.dimension, 199);
//! assert!(report.eigenvalues[0] > RADIAL_SPECTRUM_FLOOR);
//! assert_eq!(report.matches.len(), 3);
//! ```
//!
//! The lower-level pieces can also be used directly:
//!
//! ```rust
//! use prime_spectrum::{EigenRange, LogGrid, PrimePartition, build_potential, solve_eigenvalues};
//! use prime_spectrum::operator::{DiscreteOperator, PrimeHamiltonian, SCHRODINGER_SCALE};
//!
//! let grid = LogGrid::new(0.0, 6.0, 100).unwrap();
//! let partition = PrimePartition::up_to(403);
//! let potential = build_potential(&partition, &grid, 1e3);
//!
//! let hamiltonian = PrimeHamiltonian::new(grid, potential, SCHRODINGER_SCALE).unwrap();
//! let matrix = hamiltonian.assemble().unwrap();
//! let lowest = solve_eigenvalues(matrix.as_ref(), EigenRange::Lowest(5)).unwrap();
//! assert!(lowest.windows(2).all(|w| w[0] <= w[1]));
//! ```
//!
//! ## Performance Characteristics
//!
//! A dense matrix of dimension `N` needs `8·N²` bytes and the eigendecomposition
//! costs `O(N³)`. The largest preset (`N = 16 000`) needs about 2 GB for the
//! matrix alone; [`utils::perf`] logs a warning before such allocations.

pub mod comparison;
pub mod error;
pub mod experiment;
pub mod operator;
pub mod potential;
pub mod primes;
pub mod solvers;
pub mod utils;
pub mod zeta;

// Re-export the main API for convenient access.
pub use comparison::{ZeroMatch, match_nearest, relative_error};
pub use error::{SpectralError, SpectralErrorKind};
pub use experiment::{ExperimentConfig, OperatorConfig, Preset, run_experiment};
pub use operator::{DiscreteOperator, add_potential, build_kinetic};
pub use potential::{LogGrid, build_potential};
pub use primes::{PrimePartition, generate_primes};
pub use solvers::{EigenRange, approximate_zero_heights, solve_eigenvalues};
