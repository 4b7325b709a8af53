// src/lib.rs

//! `qcond` - Pauli-sum operators with prescribed condition numbers
//!
//! This library builds Hermitian operators as weighted sums of tensor products
//! of Pauli matrices and searches one of their coefficients for a value that
//! gives the operator a requested condition number. The resulting matrices
//! (and their Pauli decompositions) serve as test systems for variational
//! linear solvers.

pub mod core;
pub mod operator;
pub mod validation;
pub mod tuning;
pub mod config;

// Re-export the most common types for easier top-level use
pub use core::{Pauli, PauliString, QcondError, Result};
pub use operator::{Operator, OperatorBuilder, Term, Tunable};
pub use tuning::{linear_targets, Search, SearchState, SearchStatus, SweepMode, TuneResult, Tuner, TunerSettings};
pub use validation::{check_hermitian, condition_number, hermitian_deviation, spectral_range};
pub use config::ProblemConfig;

// Example 1: Building an operator
// A diagonal three-qubit operator whose condition number can be read off
// its eigenvalues.
/// ```
/// use qcond::{OperatorBuilder, PauliString, QcondError};
///
/// # fn main() -> Result<(), QcondError> {
/// let op = OperatorBuilder::new(3)
///     .add_term(0.225, "IZI".parse::<PauliString>()?)
///     .add_term(0.275, "IIZ".parse::<PauliString>()?)
///     .offset(0.55)
///     .build()?;
///
/// // Eigenvalues 0.55 ± 0.225 ± 0.275 = {1.05, 0.5, 0.6, 0.05}
/// assert!((op.condition_number() - 21.0).abs() < 1e-9);
/// // The symbolic view reproduces the dense view exactly.
/// assert_eq!(&op.to_dense(), op.matrix());
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Tuning the identity offset
// A = c*I + Z has condition number (c + 1) / (c - 1) for c > 1.
/// ```
/// use qcond::{OperatorBuilder, QcondError, Tunable, Tuner, TunerSettings};
///
/// # fn main() -> Result<(), QcondError> {
/// let base = OperatorBuilder::new(1)
///     .add_term(1.0, "Z".parse()?)
///     .offset(5.0)
///     .build()?;
///
/// let tuner = Tuner::new(base, Tunable::Offset)?.with_settings(TunerSettings {
///     tolerance: 1e-6,
///     lower_bound: Some(1.0),
///     ..TunerSettings::default()
/// });
///
/// let result = tuner.tune(3.0)?;
/// assert!(result.converged);
/// assert!((result.achieved_coefficient - 2.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
