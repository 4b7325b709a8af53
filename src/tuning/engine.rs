// src/tuning/engine.rs
use crate::core::{QcondError, Result};
use crate::operator::{Operator, Tunable};
use crate::tuning::{TuneResult, TunerSettings};

/// Control state of a search. `Done` is terminal; success and failure are
/// told apart by whether the final error is within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Still adjusting the coefficient.
    Searching,
    /// Stopped: converged, out of iterations, or step below the floor.
    Done,
}

/// Mutable state of one condition-number search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    target: f64,
    coefficient: f64,
    condition_number: f64,
    error: f64,
    step: f64,
    /// +1.0 or -1.0: the side of `coefficient` the next trial lands on.
    direction: f64,
    stagnation: usize,
    iterations: usize,
    status: SearchStatus,
}

impl SearchState {
    /// Requested condition number κ*.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Last accepted value of the tunable coefficient.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Condition number at `coefficient`.
    pub fn condition_number(&self) -> f64 {
        self.condition_number
    }

    /// `|condition_number - target|`.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Current step size.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Sign of the next trial move.
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// Consecutive iterations without improvement.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Control state.
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    fn accept(&mut self, point: &Evaluation) {
        self.coefficient = point.coefficient;
        self.condition_number = point.condition_number;
        self.error = point.error;
    }
}

/// Mirror image of `trial` through `accepted`: the point the same distance
/// from the last accepted coefficient on the opposite side.
///
/// A trial at `accepted + step` reflects to `accepted - step`.
pub fn reflect(accepted: f64, trial: f64) -> f64 {
    accepted - (trial - accepted)
}

/// An operator built at one coefficient value, with its score.
struct Evaluation {
    coefficient: f64,
    operator: Operator,
    condition_number: f64,
    error: f64,
}

/// A search in progress over one target.
///
/// `Tuner::tune` drives a `Search` to completion. Callers that want their own
/// stopping rule (a wall-clock limit, progress reporting) can drive it with
/// `step` and inspect `state` between iterations.
pub struct Search<'a> {
    base: &'a Operator,
    tunable: Tunable,
    settings: &'a TunerSettings,
    state: SearchState,
    /// Operator at the accepted coefficient.
    operator: Operator,
    /// Both neighbours at the current step are known to be worse.
    bracketed: bool,
}

impl<'a> Search<'a> {
    /// Evaluates the starting point and enters `Searching` (or `Done` if the
    /// start already meets the tolerance).
    ///
    /// # Errors
    /// * `QcondError::Configuration` if `start` is outside the coefficient bounds
    ///   or the tunable does not exist on `base`.
    pub(crate) fn start(
        base: &'a Operator,
        tunable: Tunable,
        settings: &'a TunerSettings,
        target: f64,
        start: f64,
    ) -> Result<Self> {
        if !settings.contains(start) {
            return Err(QcondError::configuration(format!(
                "Initial value {} lies outside the coefficient bounds [{:?}, {:?}]",
                start, settings.lower_bound, settings.upper_bound
            )));
        }
        let initial = evaluate(base, tunable, target, start)?;
        let status = if initial.error <= settings.tolerance {
            SearchStatus::Done
        } else {
            SearchStatus::Searching
        };
        let state = SearchState {
            target,
            coefficient: initial.coefficient,
            condition_number: initial.condition_number,
            error: initial.error,
            step: settings.initial_step,
            direction: 1.0,
            stagnation: 0,
            iterations: 0,
            status,
        };
        tracing::debug!(kappa_target = target, start, kappa = initial.condition_number, "search started");
        Ok(Self { base, tunable, settings, state, operator: initial.operator, bracketed: false })
    }

    /// Current search state.
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Returns `true` once the search has reached `Done`.
    pub fn is_done(&self) -> bool {
        self.state.status == SearchStatus::Done
    }

    /// Runs one iteration: try a move, reflect on failure, shrink on stagnation.
    /// Does nothing once the search is `Done`.
    pub fn step(&mut self) -> Result<SearchStatus> {
        if self.is_done() {
            return Ok(SearchStatus::Done);
        }
        if self.state.iterations >= self.settings.max_iterations {
            self.state.status = SearchStatus::Done;
            return Ok(SearchStatus::Done);
        }
        self.state.iterations += 1;

        if self.bracketed {
            // Same step, same two neighbours: they would fail again.
            self.state.direction = -self.state.direction;
            self.state.stagnation += 1;
        } else {
            let trial = self.state.coefficient + self.state.direction * self.state.step;
            match self.try_point(trial)? {
                Some(point) => {
                    self.take(point);
                    self.state.stagnation = 0;
                }
                None => {
                    // Wrong way: head the other way, moving to the mirror point if it is better.
                    let reflected = reflect(self.state.coefficient, trial);
                    self.state.direction = -self.state.direction;
                    self.state.stagnation += 1;
                    match self.try_point(reflected)? {
                        Some(point) => self.take(point),
                        None => self.bracketed = true,
                    }
                }
            }
        }

        if self.state.error <= self.settings.tolerance {
            self.state.status = SearchStatus::Done;
        } else if self.state.stagnation > self.settings.stagnation_limit {
            self.state.step /= self.settings.shrink_factor;
            self.state.stagnation = 0;
            self.bracketed = false;
            tracing::debug!(step = self.state.step, coefficient = self.state.coefficient, "step shrunk");
            if self.state.step < self.settings.min_step {
                tracing::debug!(min_step = self.settings.min_step, "step fell below floor");
                self.state.status = SearchStatus::Done;
            }
        }
        Ok(self.state.status)
    }

    /// Steps until `Done`, then converts the state into a result.
    pub fn run(mut self) -> Result<TuneResult> {
        while !self.is_done() {
            self.step()?;
        }
        Ok(self.finish())
    }

    /// Stops the search where it is and reports the best point found.
    pub fn finish(self) -> TuneResult {
        let converged = self.state.error <= self.settings.tolerance;
        if converged {
            tracing::info!(
                kappa_target = self.state.target,
                coefficient = self.state.coefficient,
                kappa = self.state.condition_number,
                iterations = self.state.iterations,
                "search converged"
            );
        } else {
            tracing::warn!(
                kappa_target = self.state.target,
                coefficient = self.state.coefficient,
                kappa = self.state.condition_number,
                iterations = self.state.iterations,
                "search did not converge"
            );
        }
        TuneResult {
            target: self.state.target,
            achieved_coefficient: self.state.coefficient,
            operator: self.operator,
            achieved_condition_number: self.state.condition_number,
            converged,
            iterations: self.state.iterations,
            final_step: self.state.step,
        }
    }

    /// Evaluates `coefficient` and returns it only if it beats the current error.
    /// Points outside the bounds are rejected without building an operator.
    fn try_point(&self, coefficient: f64) -> Result<Option<Evaluation>> {
        if !self.settings.contains(coefficient) {
            tracing::debug!(coefficient, "trial outside bounds");
            return Ok(None);
        }
        let point = evaluate(self.base, self.tunable, self.state.target, coefficient)?;
        if point.error < self.state.error {
            tracing::debug!(coefficient, kappa = point.condition_number, error = point.error, "trial accepted");
            Ok(Some(point))
        } else {
            tracing::debug!(coefficient, kappa = point.condition_number, error = point.error, "trial rejected");
            Ok(None)
        }
    }

    fn take(&mut self, point: Evaluation) {
        self.state.accept(&point);
        self.operator = point.operator;
    }
}

/// Builds the operator at `coefficient` and scores it against `target`.
/// Infinite condition numbers give an infinite error, never an `Err`.
fn evaluate(base: &Operator, tunable: Tunable, target: f64, coefficient: f64) -> Result<Evaluation> {
    let operator = base.with_coefficient(tunable, coefficient)?;
    let condition_number = operator.condition_number();
    let error = (condition_number - target).abs();
    Ok(Evaluation { coefficient, operator, condition_number, error })
}
