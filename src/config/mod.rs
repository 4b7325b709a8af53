// src/config/mod.rs

//! Problem files: a serde record describing an operator, the coefficient to
//! tune, the targets and the search settings.
//!
//! ```toml
//! qubit_count = 3
//! offset_coefficient = 0.55
//! tunable = { term = 1 }
//! targets = [10.0, 20.0]
//! tolerance = 0.1
//!
//! [[terms]]
//! coefficient = 0.225
//! factors = ["I", "Z", "I"]
//!
//! [[terms]]
//! coefficient = 0.275
//! factors = ["I", "I", "Z"]
//! ```

use crate::core::{
    PauliString, QcondError, Result, DEFAULT_INITIAL_STEP, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_STEP,
    DEFAULT_SHRINK_FACTOR, DEFAULT_STAGNATION_LIMIT, DEFAULT_TOLERANCE,
};
use crate::operator::{Operator, OperatorBuilder, Term, Tunable};
use crate::tuning::{SweepMode, TuneResult, Tuner, TunerSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_initial_step() -> f64 {
    DEFAULT_INITIAL_STEP
}
fn default_stagnation_limit() -> usize {
    DEFAULT_STAGNATION_LIMIT
}
fn default_shrink_factor() -> f64 {
    DEFAULT_SHRINK_FACTOR
}
fn default_min_step() -> f64 {
    DEFAULT_MIN_STEP
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// One weighted term as written in a problem file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermConfig {
    /// Real weight.
    pub coefficient: f64,
    /// Elementary-matrix tags, one per qubit.
    pub factors: Vec<String>,
}

/// A complete tuning problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    /// System size `N`.
    pub qubit_count: usize,
    /// Weighted Pauli strings.
    #[serde(default)]
    pub terms: Vec<TermConfig>,
    /// Coefficient of the identity term.
    #[serde(default)]
    pub offset_coefficient: f64,
    /// The coefficient the search varies.
    pub tunable: Tunable,
    /// A single target, tuned before any in `targets`.
    #[serde(default)]
    pub target: Option<f64>,
    /// Targets tuned in order.
    #[serde(default)]
    pub targets: Vec<f64>,
    /// Accepted distance `|κ - κ*|`.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Starting coefficient; defaults to the tunable's value in the operator.
    #[serde(default)]
    pub initial_value: Option<f64>,
    /// First step size of every search.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
    /// Rejected trials tolerated before the step shrinks.
    #[serde(default = "default_stagnation_limit")]
    pub stagnation_limit: usize,
    /// Iteration budget per target.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Divisor applied to the step on stagnation; must exceed 1.
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,
    /// Step floor; a search stops once the step falls below it.
    #[serde(default = "default_min_step")]
    pub min_step: f64,
    /// Smallest coefficient a trial may take.
    #[serde(default)]
    pub lower_bound: Option<f64>,
    /// Largest coefficient a trial may take.
    #[serde(default)]
    pub upper_bound: Option<f64>,
    /// Where each target after the first starts its search.
    #[serde(default)]
    pub sweep_mode: SweepMode,
}

impl ProblemConfig {
    /// Parses a problem from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| QcondError::ConfigLoad {
            message: format!("Invalid problem file: {}", e),
        })
    }

    /// Reads and parses a problem file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| QcondError::ConfigLoad {
            message: format!("Cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }

    /// Assembles the operator, parsing every tag first.
    pub fn build_operator(&self) -> Result<Operator> {
        let terms = self
            .terms
            .iter()
            .enumerate()
            .map(|(index, term)| {
                let string = PauliString::from_tags(&term.factors).map_err(|e| {
                    QcondError::configuration(format!("Term {}: {}", index, e))
                })?;
                Ok(Term::new(term.coefficient, string))
            })
            .collect::<Result<Vec<_>>>()?;
        OperatorBuilder::new(self.qubit_count)
            .add_terms(terms)
            .offset(self.offset_coefficient)
            .build()
    }

    /// Search settings described by the file.
    pub fn settings(&self) -> TunerSettings {
        TunerSettings {
            tolerance: self.tolerance,
            initial_step: self.initial_step,
            stagnation_limit: self.stagnation_limit,
            shrink_factor: self.shrink_factor,
            min_step: self.min_step,
            max_iterations: self.max_iterations,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
        }
    }

    /// `target` (if present) followed by `targets`.
    pub fn all_targets(&self) -> Vec<f64> {
        self.target.into_iter().chain(self.targets.iter().copied()).collect()
    }

    /// Builds the operator and wraps it in a configured tuner.
    pub fn tuner(&self) -> Result<Tuner> {
        let settings = self.settings();
        settings.validate()?;
        let mut tuner = Tuner::new(self.build_operator()?, self.tunable)?.with_settings(settings);
        if let Some(value) = self.initial_value {
            tuner = tuner.with_initial_value(value);
        }
        Ok(tuner)
    }

    /// Tunes every target in the file.
    pub fn run(&self) -> Result<Vec<TuneResult>> {
        let targets = self.all_targets();
        if targets.is_empty() {
            return Err(QcondError::configuration("Problem lists no target condition numbers"));
        }
        self.tuner()?.sweep(&targets, self.sweep_mode)
    }
}
