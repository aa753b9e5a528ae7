//! metrics::errors — error surface for metric parsing and evaluation.
//!
//! [`MetricError`] covers the ways a metric can fail: the name does not denote
//! a supported metric, a metric parameter is out of range, the variable is too
//! degenerate for the metric to be defined (e.g. a Sharpe ratio of a
//! constant), or the reduction overflowed to a non-finite value. Failures
//! raised by the underlying [`StochasticError`] reducers are carried as-is.
//! [`MetricResult`] is the matching result alias.
use crate::stochastic::errors::StochasticError;

/// Result alias for metric operations that may produce [`MetricError`].
pub type MetricResult<T> = Result<T, MetricError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MetricError {
    /// Metric name is not part of the closed metric set.
    UnsupportedMetric { name: String, reason: &'static str },

    /// Confidence levels for tail metrics must lie strictly between 0 and 1.
    InvalidConfidenceLevel { level: f64 },

    /// A non-confidence metric parameter is out of its domain.
    InvalidMetricParam { metric: &'static str, value: f64, reason: &'static str },

    /// Metric is undefined for a variable with zero dispersion.
    DegenerateDispersion { metric: &'static str },

    /// Metric reduced to `NaN` or `±∞` (e.g. samples near `f64::MAX`).
    NonFiniteValue { metric: &'static str, value: f64 },

    // ---- Passthrough ----
    /// A stochastic-variable reducer failed underneath the metric.
    Stochastic(StochasticError),
}

impl std::error::Error for MetricError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricError::Stochastic(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::UnsupportedMetric { name, reason } => {
                write!(f, "Unsupported metric '{name}': {reason}")
            }
            MetricError::InvalidConfidenceLevel { level } => {
                write!(f, "Confidence level must lie in (0, 1); got: {level}")
            }
            MetricError::InvalidMetricParam { metric, value, reason } => {
                write!(f, "Invalid parameter {value} for metric '{metric}': {reason}")
            }
            MetricError::DegenerateDispersion { metric } => {
                write!(f, "Metric '{metric}' is undefined for a variable with zero dispersion")
            }
            MetricError::NonFiniteValue { metric, value } => {
                write!(f, "Metric '{metric}' evaluated to a non-finite value: {value}")
            }
            MetricError::Stochastic(err) => {
                write!(f, "Stochastic reducer failed: {err}")
            }
        }
    }
}

impl From<StochasticError> for MetricError {
    fn from(err: StochasticError) -> Self {
        match err {
            StochasticError::InvalidProbability { value } => {
                MetricError::InvalidConfidenceLevel { level: value }
            }
            other => MetricError::Stochastic(other),
        }
    }
}
