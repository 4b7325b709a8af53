// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod pauli;
pub mod pauli_string;

// Re-export public types for convenient access via `qcond::core::TypeName`
pub use error::{QcondError, Result};
pub use pauli::Pauli;
pub use pauli_string::PauliString;

pub mod constants;
pub use constants::qcond_constants::*; // Re-export
