//! Numerical defaults shared by the builder, validation and tuner.

/// Default thresholds. All of them can be overridden by the caller.
pub mod qcond_constants {
    /// Largest element-wise `|A - A†|` accepted as Hermitian.
    pub const DEFAULT_HERMITIAN_TOLERANCE: f64 = 1e-10;

    /// Accepted `|κ - κ*|` at which a search reports convergence.
    pub const DEFAULT_TOLERANCE: f64 = 0.1;
    /// Step used for the first trial move of the tunable coefficient.
    pub const DEFAULT_INITIAL_STEP: f64 = 1.0;
    /// Consecutive non-improving iterations tolerated before the step shrinks.
    pub const DEFAULT_STAGNATION_LIMIT: usize = 5;
    /// Divisor applied to the step when the search stagnates.
    pub const DEFAULT_SHRINK_FACTOR: f64 = 10.0;
    /// Smallest step the search may use; shrinking below it ends the search.
    pub const DEFAULT_MIN_STEP: f64 = 1e-3;
    /// Overall iteration budget of a single search.
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
}
