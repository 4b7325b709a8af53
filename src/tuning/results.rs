// src/tuning/results.rs
use crate::operator::Operator;
use std::fmt;

/// Outcome of a single condition-number search.
///
/// A search that ran out of budget still produces a result, with
/// `converged == false` and the best point it found.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneResult {
    /// Requested condition number κ*.
    pub target: f64,
    /// Final value of the tunable coefficient.
    pub achieved_coefficient: f64,
    /// Operator built with `achieved_coefficient`.
    pub operator: Operator,
    /// Condition number of `operator`.
    pub achieved_condition_number: f64,
    /// `true` if `|achieved_condition_number - target| <= tolerance`.
    pub converged: bool,
    /// Iterations spent.
    pub iterations: usize,
    /// Step size when the search stopped.
    pub final_step: f64,
}

impl TuneResult {
    /// `|achieved_condition_number - target|`.
    pub fn error(&self) -> f64 {
        (self.achieved_condition_number - self.target).abs()
    }
}

impl fmt::Display for TuneResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "target {:>10.4} | coefficient {:>12.6} | kappa {:>12.6} | {} after {} iterations",
            self.target,
            self.achieved_coefficient,
            self.achieved_condition_number,
            if self.converged { "converged" } else { "NOT converged" },
            self.iterations
        )
    }
}
