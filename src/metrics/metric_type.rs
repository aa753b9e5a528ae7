//! metrics::metric_type — the closed set of risk/return metrics.
//!
//! Purpose
//! -------
//! Enumerate every scalar statistic an optimization objective can target.
//! The set is closed: adding a metric means adding a variant here *and* an
//! arm in [`evaluate`](crate::metrics::evaluator::evaluate), which the
//! compiler enforces through exhaustive matching.
//!
//! Parsing
//! -------
//! [`MetricType`] implements `FromStr` for configuration-driven callers.
//! Names are case-insensitive; parameterised metrics take an optional
//! `:<number>` suffix:
//!
//! | name(s)                                      | variant                      | default |
//! |----------------------------------------------|------------------------------|---------|
//! | `mean`                                       | `Mean`                       |         |
//! | `median`                                     | `Median`                     |         |
//! | `std`, `volatility`                          | `Std`                        |         |
//! | `variance`                                   | `Variance`                   |         |
//! | `skewness`, `skew`                           | `Skewness`                   |         |
//! | `kurtosis`                                   | `Kurtosis`                   |         |
//! | `var`, `value_at_risk`                       | `ValueAtRisk { level }`      | 0.95    |
//! | `cvar`, `expected_shortfall`                 | `ConditionalValueAtRisk`     | 0.95    |
//! | `sharpe`, `sharpe_ratio`                     | `SharpeRatio { risk_free }`  | 0.0     |
//!
//! Anything else yields [`MetricError::UnsupportedMetric`].
use crate::metrics::errors::{MetricError, MetricResult};
use std::{fmt, str::FromStr};

/// Default confidence level for VaR and CVaR.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Scalar statistics of a stochastic variable that objectives can target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricType {
    Mean,
    Median,
    /// Population standard deviation.
    Std,
    /// Population variance.
    Variance,
    Skewness,
    /// Excess kurtosis.
    Kurtosis,
    /// Value-at-risk at confidence `level`, as a positive loss.
    ValueAtRisk { level: f64 },
    /// Expected shortfall beyond the VaR cutoff at `level`, as a positive loss.
    ConditionalValueAtRisk { level: f64 },
    /// `(mean − risk_free) / std`.
    SharpeRatio { risk_free: f64 },
}

impl MetricType {
    pub const fn value_at_risk() -> Self {
        MetricType::ValueAtRisk { level: DEFAULT_CONFIDENCE_LEVEL }
    }

    pub const fn conditional_value_at_risk() -> Self {
        MetricType::ConditionalValueAtRisk { level: DEFAULT_CONFIDENCE_LEVEL }
    }

    pub const fn sharpe_ratio() -> Self {
        MetricType::SharpeRatio { risk_free: 0.0 }
    }

    /// Canonical lower-case name, as accepted by `FromStr`.
    pub const fn name(&self) -> &'static str {
        match self {
            MetricType::Mean => "mean",
            MetricType::Median => "median",
            MetricType::Std => "std",
            MetricType::Variance => "variance",
            MetricType::Skewness => "skewness",
            MetricType::Kurtosis => "kurtosis",
            MetricType::ValueAtRisk { .. } => "var",
            MetricType::ConditionalValueAtRisk { .. } => "cvar",
            MetricType::SharpeRatio { .. } => "sharpe",
        }
    }

    /// Validate metric parameters.
    ///
    /// # Errors
    /// - [`MetricError::InvalidConfidenceLevel`] unless `0 < level < 1`.
    /// - [`MetricError::InvalidMetricParam`] for a non-finite risk-free rate.
    pub fn validate(&self) -> MetricResult<()> {
        match *self {
            MetricType::ValueAtRisk { level } | MetricType::ConditionalValueAtRisk { level } => {
                if !(level > 0.0 && level < 1.0) {
                    return Err(MetricError::InvalidConfidenceLevel { level });
                }
                Ok(())
            }
            MetricType::SharpeRatio { risk_free } => {
                if !risk_free.is_finite() {
                    return Err(MetricError::InvalidMetricParam {
                        metric: "sharpe",
                        value: risk_free,
                        reason: "Risk-free rate must be finite.",
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::ValueAtRisk { level } | MetricType::ConditionalValueAtRisk { level } => {
                write!(f, "{}:{level}", self.name())
            }
            MetricType::SharpeRatio { risk_free } => write!(f, "{}:{risk_free}", self.name()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for MetricType {
    type Err = MetricError;

    /// Parse a metric from its (case-insensitive) name and optional parameter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (name, param) = match lowered.split_once(':') {
            Some((name, raw)) => {
                let value = raw.trim().parse::<f64>().map_err(|_| MetricError::UnsupportedMetric {
                    name: s.to_string(),
                    reason: "Metric parameter after ':' must be a number.",
                })?;
                (name.trim(), Some(value))
            }
            None => (lowered.as_str(), None),
        };
        let metric = match (name, param) {
            ("var" | "value_at_risk", level) => {
                MetricType::ValueAtRisk { level: level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL) }
            }
            ("cvar" | "expected_shortfall", level) => MetricType::ConditionalValueAtRisk {
                level: level.unwrap_or(DEFAULT_CONFIDENCE_LEVEL),
            },
            ("sharpe" | "sharpe_ratio", risk_free) => {
                MetricType::SharpeRatio { risk_free: risk_free.unwrap_or(0.0) }
            }
            (_, Some(_)) => {
                return Err(MetricError::UnsupportedMetric {
                    name: s.to_string(),
                    reason: "Only var, cvar and sharpe accept a parameter.",
                });
            }
            ("mean", None) => MetricType::Mean,
            ("median", None) => MetricType::Median,
            ("std" | "volatility", None) => MetricType::Std,
            ("variance", None) => MetricType::Variance,
            ("skewness" | "skew", None) => MetricType::Skewness,
            ("kurtosis", None) => MetricType::Kurtosis,
            _ => {
                return Err(MetricError::UnsupportedMetric {
                    name: s.to_string(),
                    reason: "Valid options are mean, median, std, variance, skewness, kurtosis, \
                             var[:level], cvar[:level], sharpe[:risk_free].",
                });
            }
        };
        metric.validate()?;
        Ok(metric)
    }
}
