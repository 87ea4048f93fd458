//! This module defines the custom error types for the library.
//!
//! Every failure the numerical core can report is collected into a single enum,
//! [`SpectralErrorKind`], wrapped by the public [`SpectralError`]. The taxonomy
//! follows the three places an experiment can go wrong: a bad configuration
//! (rejected before any matrix is built), bad numerical input to the
//! eigensolver, and an undefined comparison.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with minimal
//! boilerplate. Note that [`faer::linalg::evd::EvdError`] does not implement the standard
//! [`std::error::Error`] trait, so we wrap it manually to provide a compatible error type.
use thiserror::Error;

/// Represents all possible errors that can occur while building or solving a
/// spectral experiment.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct SpectralError(#[from] SpectralErrorKind);

impl SpectralError {
    /// Returns the kind of failure, for callers that need to branch on it.
    pub fn kind(&self) -> &SpectralErrorKind {
        &self.0
    }
}

/// The distinct kinds of errors.
#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum SpectralErrorKind {
    /// A configuration value makes the experiment meaningless (empty grid,
    /// inverted coordinate range, sieve limit below 2, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two objects that must share a dimension do not.
    #[error("Dimension mismatch: expected {expected}, found {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A requested eigenvalue index range does not fit the matrix.
    #[error(
        "Eigenvalue index range [{low}, {high}] is invalid for a matrix of dimension {dimension}."
    )]
    IndexOutOfRange {
        low: usize,
        high: usize,
        dimension: usize,
    },

    /// The operator matrix contains a NaN or infinite entry.
    #[error("Matrix entry ({row}, {col}) is not finite.")]
    NonFiniteEntry { row: usize, col: usize },

    /// The operator matrix is not symmetric.
    #[error("Matrix is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ.")]
    NotSymmetric { row: usize, col: usize },

    /// Wraps an error originating from [`faer`]'s eigendecomposition module.
    #[error("A numerical error occurred during the symmetric eigendecomposition: {0:?}")]
    EvdError(faer::linalg::evd::EvdError),

    /// A relative error was requested against a zero reference value.
    #[error("Relative error is undefined for a zero reference value.")]
    ZeroReference,

    /// A statistic needs more samples than were supplied.
    #[error("Insufficient data: at least {needed} values are required, got {actual}.")]
    InsufficientData { needed: usize, actual: usize },

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid input parameter: {0}")]
    InputError(String),
}

// Manually implement PartialEq for the public error type.
// We compare the inner `SpectralErrorKind`.
impl PartialEq for SpectralError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl From<faer::linalg::evd::EvdError> for SpectralError {
    fn from(err: faer::linalg::evd::EvdError) -> Self {
        SpectralErrorKind::EvdError(err).into()
    }
}

/// Shorthand for building an [`SpectralErrorKind::InvalidConfig`] error.
pub(crate) fn invalid_config(message: impl Into<String>) -> SpectralError {
    SpectralErrorKind::InvalidConfig(message.into()).into()
}
