//! Error handling logic

use thiserror::Error;

/// Error types raised while building operators or configuring a search.
///
/// A search that runs out of budget is *not* an error: it is reported through
/// `TuneResult::converged` so a sweep over many targets can keep going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QcondError {
    /// Malformed operator or tuner specification: factor-count mismatch,
    /// unknown Pauli tag, non-finite coefficient, bad tunable index or
    /// out-of-range search settings.
    #[error("Configuration Error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// The assembled matrix is not equal to its conjugate transpose.
    /// Downstream solvers require a Hermitian system matrix.
    #[error("Non-Hermitian Result: max |A - A^dagger| = {deviation:e} (tolerance {tolerance:e})")]
    NonHermitian {
        /// Largest element-wise deviation found
        deviation: f64,
        /// Tolerance the deviation was checked against
        tolerance: f64,
    },

    /// A problem file could not be read or parsed.
    #[error("Config Load Error: {message}")]
    ConfigLoad {
        /// ConfigLoad failure message
        message: String,
    },
}

impl QcondError {
    /// Shorthand for `QcondError::Configuration`.
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        QcondError::Configuration { message: message.into() }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QcondError>;
