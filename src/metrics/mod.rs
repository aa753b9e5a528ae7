//! metrics — scalar risk/return statistics of stochastic variables.
//!
//! Purpose
//! -------
//! Name the statistics an optimization objective can target and evaluate them
//! on a [`StochasticVariable`](crate::stochastic::StochasticVariable).
//!
//! Key behaviors
//! -------------
//! - [`MetricType`]: closed enumeration of metrics, parseable from strings
//!   (`metric_type`).
//! - [`evaluate`]: exhaustive dispatch from metric to value (`evaluator`).
//! - [`MetricError`] / [`MetricResult`]: the metric error surface (`errors`).
//!
//! Conventions
//! -----------
//! - Tail-risk metrics (VaR, CVaR) are positive losses, so *minimizing* them
//!   reduces risk.
//! - Metric values are always finite; undefined or overflowing values surface
//!   as errors.

pub mod errors;
pub mod evaluator;
pub mod metric_type;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{MetricError, MetricResult};
pub use self::evaluator::{evaluate, evaluate_all};
pub use self::metric_type::{DEFAULT_CONFIDENCE_LEVEL, MetricType};
