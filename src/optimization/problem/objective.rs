//! problem::objective — declarative optimization goals.
//!
//! An [`ObjectiveSpec`] says *what* to optimize: one metric of the portfolio
//! variable, a direction, an optional target value, and a weight used when
//! several objectives are combined.
//!
//! Cost convention
//! ---------------
//! The optimizer always minimizes. Each objective turns a metric value `m`
//! into a cost:
//! - without a target: `-m` for [`OptimizationDirection::Maximize`], `m` for
//!   [`OptimizationDirection::Minimize`];
//! - with a target `t`: `(m - t)²`, regardless of direction.
//!
//! Several objectives combine as `Σ weightᵢ · costᵢ`.
use crate::{
    metrics::{errors::MetricResult, metric_type::MetricType},
    optimization::errors::{OptError, OptResult},
    stochastic::variable::StochasticVariable,
};
use std::{fmt, str::FromStr};

/// Whether an objective's metric should be driven up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

impl OptimizationDirection {
    /// Multiplier turning a metric into a cost: `-1` to maximize, `+1` to
    /// minimize.
    pub const fn sign(&self) -> f64 {
        match self {
            OptimizationDirection::Maximize => -1.0,
            OptimizationDirection::Minimize => 1.0,
        }
    }
}

impl fmt::Display for OptimizationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationDirection::Maximize => write!(f, "maximize"),
            OptimizationDirection::Minimize => write!(f, "minimize"),
        }
    }
}

impl FromStr for OptimizationDirection {
    type Err = OptError;

    /// Parse a direction (case-insensitive): `maximize`/`max` or
    /// `minimize`/`min`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maximize" | "max" => Ok(OptimizationDirection::Maximize),
            "minimize" | "min" => Ok(OptimizationDirection::Minimize),
            _ => Err(OptError::UnsupportedDirection {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'maximize', 'max', 'minimize' or 'min'.",
            }),
        }
    }
}

/// One optimization goal.
///
/// Built through the validated constructors; fields are read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveSpec {
    metric: MetricType,
    direction: OptimizationDirection,
    target: Option<f64>,
    weight: f64,
}

impl ObjectiveSpec {
    /// Create an objective with unit weight.
    ///
    /// # Errors
    /// - [`OptError::Metric`] if the metric parameters are invalid.
    /// - [`OptError::InvalidTarget`] if `target` is not finite.
    pub fn new(
        metric: MetricType, direction: OptimizationDirection, target: Option<f64>,
    ) -> OptResult<Self> {
        metric.validate()?;
        if let Some(value) = target {
            if !value.is_finite() {
                return Err(OptError::InvalidTarget { value });
            }
        }
        Ok(Self { metric, direction, target, weight: 1.0 })
    }

    pub fn maximize(metric: MetricType) -> OptResult<Self> {
        Self::new(metric, OptimizationDirection::Maximize, None)
    }

    pub fn minimize(metric: MetricType) -> OptResult<Self> {
        Self::new(metric, OptimizationDirection::Minimize, None)
    }

    /// Drive `metric` towards `target`.
    pub fn targeting(metric: MetricType, target: f64) -> OptResult<Self> {
        Self::new(metric, OptimizationDirection::Minimize, Some(target))
    }

    /// Replace the aggregation weight.
    ///
    /// # Errors
    /// [`OptError::InvalidObjectiveWeight`] unless `weight` is finite and `> 0`.
    pub fn with_weight(mut self, weight: f64) -> OptResult<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(OptError::InvalidObjectiveWeight { value: weight });
        }
        self.weight = weight;
        Ok(self)
    }

    pub fn metric(&self) -> MetricType {
        self.metric
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    pub fn target(&self) -> Option<f64> {
        self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Evaluate this objective's metric on `variable`.
    pub fn metric_value(&self, variable: &StochasticVariable) -> MetricResult<f64> {
        self.metric.evaluate(variable)
    }

    /// Unweighted cost of a metric value; lower is better.
    pub fn cost(&self, metric_value: f64) -> f64 {
        match self.target {
            Some(target) => (metric_value - target).powi(2),
            None => self.direction.sign() * metric_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::errors::MetricError;

    #[test]
    // Purpose
    // -------
    // Directions parse from short and long names in any case.
    fn direction_parses_case_insensitively() {
        assert_eq!("MAX".parse::<OptimizationDirection>().unwrap(), OptimizationDirection::Maximize);
        assert_eq!(
            "Minimize".parse::<OptimizationDirection>().unwrap(),
            OptimizationDirection::Minimize
        );
        assert!(matches!(
            "sideways".parse::<OptimizationDirection>().unwrap_err(),
            OptError::UnsupportedDirection { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Cost follows the sign convention without a target and squared
    // deviation with one.
    //
    // Given
    // -----
    // - A metric value of 0.07.
    //
    // Expect
    // ------
    // - maximize → -0.07, minimize → 0.07, target 0.05 → 0.0004.
    fn cost_convention() {
        // Arrange
        let max = ObjectiveSpec::maximize(MetricType::Mean).unwrap();
        let min = ObjectiveSpec::minimize(MetricType::Mean).unwrap();
        let target = ObjectiveSpec::targeting(MetricType::Mean, 0.05).unwrap();

        // Act / Assert
        assert_eq!(max.cost(0.07), -0.07);
        assert_eq!(min.cost(0.07), 0.07);
        assert!((target.cost(0.07) - 0.0004).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Invalid targets, weights, and metric parameters are rejected.
    fn constructors_validate_inputs() {
        assert_eq!(
            ObjectiveSpec::targeting(MetricType::Std, f64::NAN).unwrap_err().to_string(),
            OptError::InvalidTarget { value: f64::NAN }.to_string()
        );
        assert_eq!(
            ObjectiveSpec::maximize(MetricType::Mean).unwrap().with_weight(0.0).unwrap_err(),
            OptError::InvalidObjectiveWeight { value: 0.0 }
        );
        assert_eq!(
            ObjectiveSpec::minimize(MetricType::ValueAtRisk { level: 1.2 }).unwrap_err(),
            OptError::Metric(MetricError::InvalidConfidenceLevel { level: 1.2 })
        );
        let weighted = ObjectiveSpec::minimize(MetricType::Std).unwrap().with_weight(2.5).unwrap();
        assert_eq!(weighted.weight(), 2.5);
        assert_eq!(weighted.target(), None);
    }
}
