// src/tuning/mod.rs

//! Searches a single coefficient of an `Operator` for a value whose condition
//! number matches a target.
//!
//! The condition number of a multi-term Pauli sum has no closed-form inverse,
//! so the search is numeric: a local coordinate search that accepts improving
//! moves, reflects around the last accepted point on failure, and shrinks its
//! step after repeated failures. It only converges to within `tolerance`.

mod engine;
mod results;

pub use engine::{reflect, Search, SearchState, SearchStatus};
pub use results::TuneResult;

use crate::core::{
    QcondError, Result, DEFAULT_INITIAL_STEP, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_STEP,
    DEFAULT_SHRINK_FACTOR, DEFAULT_STAGNATION_LIMIT, DEFAULT_TOLERANCE,
};
use crate::operator::{Operator, Tunable};
use serde::{Deserialize, Serialize};

/// Tolerances and budgets of a search.
///
/// The defaults are empirical; good values depend on the operator size.
#[derive(Debug, Clone, PartialEq)]
pub struct TunerSettings {
    /// Accepted `|κ - κ*|`.
    pub tolerance: f64,
    /// First step size.
    pub initial_step: f64,
    /// Non-improving iterations tolerated before the step shrinks.
    pub stagnation_limit: usize,
    /// Divisor applied to the step on stagnation. Must exceed 1.
    pub shrink_factor: f64,
    /// The search gives up once the step would drop below this.
    pub min_step: f64,
    /// Overall iteration budget.
    pub max_iterations: usize,
    /// Trials below this value are rejected without evaluation.
    pub lower_bound: Option<f64>,
    /// Trials above this value are rejected without evaluation.
    pub upper_bound: Option<f64>,
}

impl Default for TunerSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            min_step: DEFAULT_MIN_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            lower_bound: None,
            upper_bound: None,
        }
    }
}

impl TunerSettings {
    /// Checks every field is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(QcondError::configuration(format!("{} must be a positive finite number, got {}", name, value)))
            }
        };
        positive("tolerance", self.tolerance)?;
        positive("initial_step", self.initial_step)?;
        positive("min_step", self.min_step)?;
        if !(self.shrink_factor.is_finite() && self.shrink_factor > 1.0) {
            return Err(QcondError::configuration(format!(
                "shrink_factor must be greater than 1, got {}",
                self.shrink_factor
            )));
        }
        if self.stagnation_limit == 0 {
            return Err(QcondError::configuration("stagnation_limit must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(QcondError::configuration("max_iterations must be at least 1"));
        }
        for bound in [self.lower_bound, self.upper_bound].into_iter().flatten() {
            if bound.is_nan() {
                return Err(QcondError::configuration("coefficient bounds must not be NaN"));
            }
        }
        if let (Some(lo), Some(hi)) = (self.lower_bound, self.upper_bound) {
            if lo > hi {
                return Err(QcondError::configuration(format!(
                    "lower_bound {} exceeds upper_bound {}",
                    lo, hi
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` if `coefficient` is finite and within the bounds.
    pub fn contains(&self, coefficient: f64) -> bool {
        coefficient.is_finite()
            && self.lower_bound.is_none_or(|lo| coefficient >= lo)
            && self.upper_bound.is_none_or(|hi| coefficient <= hi)
    }
}

/// Where each search of a sweep starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Every target starts from the tuner's initial value.
    #[default]
    Fresh,
    /// Each target starts from the coefficient the previous target reached.
    CarryForward,
}

/// Tunes one coefficient of a base operator towards target condition numbers.
#[derive(Debug, Clone)]
pub struct Tuner {
    base: Operator,
    tunable: Tunable,
    initial_value: f64,
    settings: TunerSettings,
}

impl Tuner {
    /// Creates a tuner that varies `tunable`, starting from its current value in `base`.
    ///
    /// # Errors
    /// * `QcondError::Configuration` if `tunable` names a term `base` does not have.
    pub fn new(base: Operator, tunable: Tunable) -> Result<Self> {
        let initial_value = base.coefficient(tunable)?;
        Ok(Self {
            base,
            tunable,
            initial_value,
            settings: TunerSettings::default(),
        })
    }

    /// Overrides the starting coefficient.
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = value;
        self
    }

    /// Replaces the search settings.
    pub fn with_settings(mut self, settings: TunerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The operator every trial is derived from.
    pub fn base(&self) -> &Operator {
        &self.base
    }

    /// The coefficient being searched.
    pub fn tunable(&self) -> Tunable {
        self.tunable
    }

    /// Starting coefficient of a fresh search.
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Search settings.
    pub fn settings(&self) -> &TunerSettings {
        &self.settings
    }

    /// Begins a search for `target` from the initial value without running it.
    pub fn search(&self, target: f64) -> Result<Search<'_>> {
        self.search_from(target, self.initial_value)
    }

    /// Begins a search for `target` from `start` without running it.
    pub fn search_from(&self, target: f64, start: f64) -> Result<Search<'_>> {
        self.settings.validate()?;
        if !(target.is_finite() && target > 0.0) {
            return Err(QcondError::configuration(format!(
                "Target condition number must be a positive finite number, got {}",
                target
            )));
        }
        Search::start(&self.base, self.tunable, &self.settings, target, start)
    }

    /// Runs a search for `target` from the initial value.
    ///
    /// # Returns
    /// * `Ok(TuneResult)` whether or not the search converged; check `converged`.
    /// * `Err(QcondError)` only for configuration problems.
    pub fn tune(&self, target: f64) -> Result<TuneResult> {
        self.search(target)?.run()
    }

    /// Runs a search for `target` from `start`.
    pub fn tune_from(&self, target: f64, start: f64) -> Result<TuneResult> {
        self.search_from(target, start)?.run()
    }

    /// Lazily tunes each target in order. Non-convergence is reported in the
    /// item, never as an `Err`, so iteration continues past failed targets.
    pub fn sweep_iter<I>(&self, targets: I, mode: SweepMode) -> Sweep<'_, I::IntoIter>
    where
        I: IntoIterator<Item = f64>,
    {
        Sweep {
            tuner: self,
            targets: targets.into_iter(),
            mode,
            next_start: self.initial_value,
        }
    }

    /// Tunes every target and collects the results in target order.
    ///
    /// Stops at the first configuration error.
    pub fn sweep(&self, targets: &[f64], mode: SweepMode) -> Result<Vec<TuneResult>> {
        self.sweep_iter(targets.iter().copied(), mode).collect()
    }

    /// Tunes every target on the rayon pool. Each search starts fresh, so the
    /// results equal those of `sweep(targets, SweepMode::Fresh)`.
    #[cfg(feature = "parallel")]
    pub fn sweep_par(&self, targets: &[f64]) -> Result<Vec<TuneResult>> {
        use rayon::prelude::*;
        targets.par_iter().map(|&target| self.tune(target)).collect()
    }
}

/// Iterator returned by `Tuner::sweep_iter`.
pub struct Sweep<'a, I> {
    tuner: &'a Tuner,
    targets: I,
    mode: SweepMode,
    next_start: f64,
}

impl<I> Iterator for Sweep<'_, I>
where
    I: Iterator<Item = f64>,
{
    type Item = Result<TuneResult>;

    fn next(&mut self) -> Option<Self::Item> {
        let target = self.targets.next()?;
        let start = match self.mode {
            SweepMode::Fresh => self.tuner.initial_value,
            SweepMode::CarryForward => self.next_start,
        };
        let result = self.tuner.tune_from(target, start);
        if let Ok(r) = &result {
            self.next_start = r.achieved_coefficient;
        }
        Some(result)
    }
}

/// Evenly spaced targets `start, start + step, …` up to and including `stop`
/// (within a small rounding allowance).
///
/// `linear_targets(10.0, 200.0, 10.0)` yields the twenty values `10, 20, …, 200`.
/// A non-positive or non-finite `step`, `stop < start`, or a range holding
/// more points than fit in a `usize` yields no targets.
pub fn linear_targets(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0 && start.is_finite() && stop.is_finite()) || stop < start {
        return Vec::new();
    }
    let span = ((stop - start) / step + 1e-9).floor();
    if !span.is_finite() || span >= usize::MAX as f64 {
        return Vec::new();
    }
    let Some(count) = (span as usize).checked_add(1) else {
        return Vec::new();
    };
    (0..count).map(|i| start + step * i as f64).collect()
}
