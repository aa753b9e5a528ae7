//! metrics::evaluator — reduce a stochastic variable to a metric value.
//!
//! Purpose
//! -------
//! Map a [`MetricType`] and a [`StochasticVariable`] to a single `f64`. This
//! is the only place metric semantics live; the optimizer calls it once per
//! objective per cost evaluation.
//!
//! Key behaviors
//! -------------
//! - [`evaluate`] validates the metric parameters, then dispatches with an
//!   exhaustive `match` over the closed metric set.
//! - [`evaluate_all`] evaluates several metrics on one variable, failing on the
//!   first error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Results are always finite. Metrics that are undefined for zero-dispersion
//!   variables (skewness, kurtosis, Sharpe ratio) return
//!   [`MetricError::DegenerateDispersion`] instead of `NaN`/`±∞`; any other
//!   metric that overflows returns [`MetricError::NonFiniteValue`].
//! - Tail metrics follow the loss convention of
//!   [`StochasticVariable::value_at_risk`].
use crate::{
    metrics::{
        errors::{MetricError, MetricResult},
        metric_type::MetricType,
    },
    stochastic::variable::StochasticVariable,
};

/// Evaluate `metric` on `variable`.
///
/// # Errors
/// - [`MetricError::InvalidConfidenceLevel`] / [`MetricError::InvalidMetricParam`]
///   if the metric parameters are invalid.
/// - [`MetricError::DegenerateDispersion`] if the metric is undefined because
///   the variable has zero standard deviation.
/// - [`MetricError::NonFiniteValue`] if the reduction is `NaN` or `±∞`.
pub fn evaluate(metric: MetricType, variable: &StochasticVariable) -> MetricResult<f64> {
    metric.validate()?;
    let value = match metric {
        MetricType::Mean => variable.mean(),
        MetricType::Median => variable.median(),
        MetricType::Std => variable.std(),
        MetricType::Variance => variable.variance(),
        MetricType::Skewness => defined_or_degenerate("skewness", variable.skewness())?,
        MetricType::Kurtosis => defined_or_degenerate("kurtosis", variable.kurtosis())?,
        MetricType::ValueAtRisk { level } => variable.value_at_risk(level)?,
        MetricType::ConditionalValueAtRisk { level } => {
            variable.conditional_value_at_risk(level)?
        }
        MetricType::SharpeRatio { risk_free } => {
            let std = variable.std();
            if std <= f64::EPSILON * variable.mean().abs() {
                return Err(MetricError::DegenerateDispersion { metric: "sharpe" });
            }
            defined_or_degenerate("sharpe", (variable.mean() - risk_free) / std)?
        }
    };
    if !value.is_finite() {
        return Err(MetricError::NonFiniteValue { metric: metric.name(), value });
    }
    Ok(value)
}

/// Evaluate each metric in `metrics` on `variable`, in order.
///
/// # Errors
/// The first error returned by [`evaluate`].
pub fn evaluate_all(
    metrics: &[MetricType], variable: &StochasticVariable,
) -> MetricResult<Vec<f64>> {
    metrics.iter().map(|&metric| evaluate(metric, variable)).collect()
}

impl MetricType {
    /// Shorthand for [`evaluate`]`(*self, variable)`.
    pub fn evaluate(&self, variable: &StochasticVariable) -> MetricResult<f64> {
        evaluate(*self, variable)
    }
}

fn defined_or_degenerate(metric: &'static str, value: f64) -> MetricResult<f64> {
    if !value.is_finite() {
        return Err(MetricError::DegenerateDispersion { metric });
    }
    Ok(value)
}
