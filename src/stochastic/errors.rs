//! stochastic::errors — error surface for sample-vector construction and arithmetic.
//!
//! Purpose
//! -------
//! Define [`StochasticError`] and the [`StochasticResult`] alias used by
//! every fallible operation on [`StochasticVariable`](crate::stochastic::StochasticVariable):
//! explicit construction, generative sampling, elementwise arithmetic between
//! two variables, and parameterised reducers such as quantiles.
//!
//! Conventions
//! -----------
//! - **Indices are 0-based** and refer to positions in the sample vector.
//! - Shape errors always report the *left* operand first.
//! - Errors are small `Clone + PartialEq` values so that they can be carried
//!   inside higher-level errors (see `OptError::ObjectiveEvaluation`) and
//!   compared in tests.

/// Result alias for stochastic-variable operations that may produce [`StochasticError`].
pub type StochasticResult<T> = Result<T, StochasticError>;

/// Unified error type for stochastic variables.
#[derive(Debug, Clone, PartialEq)]
pub enum StochasticError {
    // ---- Construction ----
    /// A stochastic variable needs at least one sample.
    EmptySample,

    /// Explicitly supplied samples must be finite.
    NonFiniteSample { index: usize, value: f64 },

    /// A sampling distribution parameter is out of its domain.
    InvalidDistributionParam { param: &'static str, value: f64, reason: &'static str },

    // ---- Arithmetic ----
    /// Elementwise arithmetic requires equal sample counts.
    ShapeMismatch { left: usize, right: usize },

    /// Linear combinations need one weight per variable.
    WeightCountMismatch { weights: usize, variables: usize },

    // ---- Reducers ----
    /// Probabilities passed to quantile-type reducers must lie in [0, 1].
    InvalidProbability { value: f64 },
}

impl std::error::Error for StochasticError {}

impl std::fmt::Display for StochasticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Construction ----
            StochasticError::EmptySample => {
                write!(f, "Stochastic variable must contain at least one sample.")
            }
            StochasticError::NonFiniteSample { index, value } => {
                write!(f, "Sample at index {index} is non-finite: {value}")
            }
            StochasticError::InvalidDistributionParam { param, value, reason } => {
                write!(f, "Invalid distribution parameter '{param}' = {value}: {reason}")
            }

            // ---- Arithmetic ----
            StochasticError::ShapeMismatch { left, right } => {
                write!(f, "Sample count mismatch: left has {left} samples, right has {right}")
            }
            StochasticError::WeightCountMismatch { weights, variables } => {
                write!(
                    f,
                    "Weight count mismatch: got {weights} weights for {variables} variables"
                )
            }

            // ---- Reducers ----
            StochasticError::InvalidProbability { value } => {
                write!(f, "Probability must lie in [0, 1]; got: {value}")
            }
        }
    }
}
