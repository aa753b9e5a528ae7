//! optimization::errors — the optimizer's single error surface.
//!
//! [`OptError`] collects input validation failures, configuration mistakes,
//! evaluation failures raised while computing the objective, and wrappers for
//! argmin's own error kinds. Lower layers convert into it via `From`.
//!
//! Non-convergence is never an `OptError`: a run that stops early is reported
//! through `OptimizationResult::success`.
use crate::{metrics::errors::MetricError, stochastic::errors::StochasticError};
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Failure raised while turning a weight vector into an objective value.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The portfolio construction function failed.
    Portfolio(StochasticError),
    /// A metric could not be evaluated on the constructed portfolio.
    Metric(MetricError),
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationError::Portfolio(err) => Some(err),
            EvaluationError::Metric(err) => Some(err),
        }
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::Portfolio(err) => write!(f, "portfolio construction failed: {err}"),
            EvaluationError::Metric(err) => write!(f, "metric evaluation failed: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Optimization input ----
    /// A per-asset vector does not have `n_assets` entries.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The number of assets must be positive.
    InvalidAssetCount,

    /// At least one objective is required.
    NoObjectives,

    /// Box bounds must be finite with `low <= high`.
    InvalidBounds {
        index: usize,
        low: f64,
        high: f64,
    },

    /// Initial weight lies outside its box or is non-finite.
    InfeasibleStart {
        index: usize,
        value: f64,
        low: f64,
        high: f64,
    },

    /// No weight vector inside the boxes sums to the budget.
    InfeasibleBudget {
        budget: f64,
        min_sum: f64,
        max_sum: f64,
    },

    /// Budget must be finite.
    InvalidBudget {
        value: f64,
    },

    // ---- Objectives ----
    /// Target values must be finite.
    InvalidTarget {
        value: f64,
    },

    /// Objective weights must be finite and strictly positive.
    InvalidObjectiveWeight {
        value: f64,
    },

    /// Invalid direction name.
    UnsupportedDirection {
        name: String,
        reason: &'static str,
    },

    /// Metric parameters rejected while building an objective.
    Metric(MetricError),

    // ---- Solver options ----
    /// Invalid solver method name.
    UnsupportedMethod {
        name: String,
        reason: &'static str,
    },
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Penalty weight needs to be positive and finite.
    InvalidPenalty {
        value: f64,
        reason: &'static str,
    },

    // ---- Evaluation ----
    /// The portfolio function or a metric failed; the cause is preserved.
    ObjectiveEvaluation {
        source: EvaluationError,
    },

    /// Aggregate cost evaluated to a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Gradient ----
    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// `true` for failures of the numerical backend itself (line searches,
    /// degenerate gradients, argmin internals). The optimizer reports these
    /// as an unsuccessful run instead of an error.
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            OptError::GradientDimMismatch { .. }
                | OptError::InvalidGradient { .. }
                | OptError::InvalidParameter { .. }
                | OptError::NotImplemented { .. }
                | OptError::NotInitialized { .. }
                | OptError::ConditionViolated { .. }
                | OptError::CheckPointNotFound { .. }
                | OptError::PotentialBug { .. }
                | OptError::ImpossibleError { .. }
                | OptError::BackendError { .. }
                | OptError::UnknownError
        )
    }
}

impl std::error::Error for OptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptError::ObjectiveEvaluation { source } => Some(source),
            OptError::Metric(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Optimization input ----
            OptError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }
            OptError::InvalidAssetCount => {
                write!(f, "Number of assets must be greater than zero")
            }
            OptError::NoObjectives => {
                write!(f, "At least one objective is required")
            }
            OptError::InvalidBounds { index, low, high } => {
                write!(
                    f,
                    "Invalid box constraint at index {index}: [{low}, {high}], bounds must be finite with low <= high"
                )
            }
            OptError::InfeasibleStart { index, value, low, high } => {
                write!(
                    f,
                    "Infeasible initial weight at index {index}: {value} is not in [{low}, {high}]"
                )
            }
            OptError::InfeasibleBudget { budget, min_sum, max_sum } => {
                write!(
                    f,
                    "Infeasible budget {budget}: box constraints only allow sums in [{min_sum}, {max_sum}]"
                )
            }
            OptError::InvalidBudget { value } => {
                write!(f, "Invalid budget {value}, must be finite")
            }

            // ---- Objectives ----
            OptError::InvalidTarget { value } => {
                write!(f, "Invalid target value {value}, must be finite")
            }
            OptError::InvalidObjectiveWeight { value } => {
                write!(f, "Invalid objective weight {value}, must be finite and > 0")
            }
            OptError::UnsupportedDirection { name, reason } => {
                write!(f, "Unsupported direction '{name}': {reason}")
            }
            OptError::Metric(err) => {
                write!(f, "Invalid objective metric: {err}")
            }

            // ---- Solver options ----
            OptError::UnsupportedMethod { name, reason } => {
                write!(f, "Unsupported solver method '{name}': {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidPenalty { value, reason } => {
                write!(f, "Invalid penalty weight {value}: {reason}")
            }

            // ---- Evaluation ----
            OptError::ObjectiveEvaluation { source } => {
                write!(f, "Objective evaluation failed: {source}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Gradient ----
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    /// Recover an [`OptError`] that crossed the argmin boundary, otherwise map
    /// argmin's own error kinds.
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<MetricError> for OptError {
    fn from(err: MetricError) -> Self {
        OptError::Metric(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round-tripping OptError through argmin's error type.
    // - Mapping of argmin's own error kinds and foreign errors.
    // - Cause preservation through `Error::source`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An OptError boxed into argmin's error comes back unchanged.
    fn opt_error_survives_argmin_boundary() {
        // Arrange
        let original = OptError::ObjectiveEvaluation {
            source: EvaluationError::Portfolio(StochasticError::ShapeMismatch { left: 3, right: 4 }),
        };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
        assert!(!recovered.is_solver_failure());
    }

    #[test]
    // Purpose
    // -------
    // argmin errors map to their wrappers; anything else is a backend error.
    fn argmin_and_foreign_errors_are_mapped() {
        // Arrange
        let argmin_err: Error =
            ArgminError::ConditionViolated { text: "not a descent direction".to_string() }.into();
        let foreign: Error = std::fmt::Error.into();

        // Act
        let mapped = OptError::from(argmin_err);
        let backend = OptError::from(foreign);

        // Assert
        assert_eq!(
            mapped,
            OptError::ConditionViolated { text: "not a descent direction".to_string() }
        );
        assert!(mapped.is_solver_failure());
        assert!(matches!(backend, OptError::BackendError { .. }));
    }

    #[test]
    // Purpose
    // -------
    // ObjectiveEvaluation exposes the portfolio function's error as its source.
    fn objective_evaluation_preserves_cause() {
        // Arrange
        let cause = StochasticError::EmptySample;
        let err = OptError::ObjectiveEvaluation { source: EvaluationError::Portfolio(cause.clone()) };

        // Act
        let level_one = err.source().expect("source should be present");
        let level_two = level_one.source().expect("nested source should be present");

        // Assert
        assert_eq!(level_two.to_string(), cause.to_string());
        assert!(err.to_string().contains("portfolio construction failed"));
    }
}
