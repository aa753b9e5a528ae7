//! Adapter that exposes a portfolio optimization problem to `argmin`.
//!
//! Solvers search an unconstrained vector `θ`. Every candidate is mapped onto
//! the feasible weight set before the portfolio function sees it, and the
//! solver-facing cost is
//!
//! ```text
//! c(θ) = Σ weightᵢ · costᵢ(portfolio(P_F(θ))) + ρ ‖θ − P_F(θ)‖²
//! ```
//!
//! where `costᵢ` is `−metric` for maximized objectives, `+metric` for
//! minimized ones, and `(metric − target)²` when a target is set. On feasible
//! `θ` the penalty vanishes and `c` equals the aggregate objective.
//!
//! Line searches may step to iterates with infinite coordinates. Those get
//! `c(θ) = +∞` and a zero gradient without calling the portfolio function,
//! so the search backs off instead of failing.
use std::cell::RefCell;

use crate::{
    metrics::errors::MetricError,
    optimization::{
        errors::{EvaluationError, OptError, OptResult},
        feasibility::FeasibleSet,
        portfolio_optimizer::{
            finite_diff::fd_gradient,
            traits::PortfolioFunction,
            types::{Cost, Grad, Weights},
        },
        problem::objective::ObjectiveSpec,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Objective value and per-objective metric values at one weight vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub objective: f64,
    pub metric_values: Vec<f64>,
}

/// Best feasible point seen during a run, a portfolio-call counter, and the
/// first evaluation failure.
///
/// Lives outside the adapter so that it survives argmin errors, which
/// consume the problem, and line searches that swallow cost errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Incumbent {
    best: Option<(Weights, f64)>,
    evaluations: u64,
    failure: Option<OptError>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, weights: &Weights, objective: f64) {
        self.evaluations += 1;
        let improves = self.best.as_ref().is_none_or(|(_, best)| objective < *best);
        if improves {
            self.best = Some((weights.clone(), objective));
        }
    }

    /// Weights with the lowest objective evaluated so far.
    pub fn best_weights(&self) -> Option<&Weights> {
        self.best.as_ref().map(|(w, _)| w)
    }

    /// Number of successful portfolio evaluations.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// First evaluation error raised during the run, if any.
    pub fn failure(&self) -> Option<&OptError> {
        self.failure.as_ref()
    }

    fn record_failure(&mut self, err: &OptError) {
        if self.failure.is_none() {
            self.failure = Some(err.clone());
        }
    }
}

/// Bridges a [`PortfolioFunction`] and its objectives to argmin's
/// `CostFunction` and `Gradient`.
#[derive(Debug)]
pub struct PortfolioProblem<'a, P: PortfolioFunction> {
    portfolio_fn: &'a P,
    objectives: &'a [ObjectiveSpec],
    feasible: FeasibleSet,
    penalty: f64,
    incumbent: &'a RefCell<Incumbent>,
}

impl<'a, P: PortfolioFunction> Clone for PortfolioProblem<'a, P> {
    fn clone(&self) -> Self {
        Self {
            portfolio_fn: self.portfolio_fn,
            objectives: self.objectives,
            feasible: self.feasible.clone(),
            penalty: self.penalty,
            incumbent: self.incumbent,
        }
    }
}

impl<'a, P: PortfolioFunction> PortfolioProblem<'a, P> {
    pub fn new(
        portfolio_fn: &'a P, objectives: &'a [ObjectiveSpec], feasible: FeasibleSet,
        penalty: f64, incumbent: &'a RefCell<Incumbent>,
    ) -> Self {
        Self { portfolio_fn, objectives, feasible, penalty, incumbent }
    }

    pub fn feasible_set(&self) -> &FeasibleSet {
        &self.feasible
    }

    /// Snapshot of the incumbent shared by every clone of this problem.
    pub fn incumbent(&self) -> Incumbent {
        self.incumbent.borrow().clone()
    }

    /// Evaluate every objective on the portfolio built from `weights`.
    ///
    /// `weights` are used as given; callers project first.
    ///
    /// # Errors
    /// - [`OptError::ObjectiveEvaluation`] wrapping the portfolio or metric
    ///   failure.
    /// - [`OptError::NonFiniteCost`] if the aggregate cost is not finite.
    pub fn evaluate(&self, weights: &Weights) -> OptResult<Evaluation> {
        let portfolio = self
            .portfolio_fn
            .portfolio(weights)
            .map_err(|e| OptError::ObjectiveEvaluation { source: EvaluationError::Portfolio(e) })?;
        let metric_values = self
            .objectives
            .iter()
            .map(|spec| spec.metric_value(&portfolio))
            .collect::<Result<Vec<f64>, MetricError>>()
            .map_err(|e| OptError::ObjectiveEvaluation { source: EvaluationError::Metric(e) })?;
        let objective = self
            .objectives
            .iter()
            .zip(metric_values.iter())
            .map(|(spec, &m)| spec.weight() * spec.cost(m))
            .sum::<f64>();
        if !objective.is_finite() {
            return Err(OptError::NonFiniteCost { value: objective });
        }
        Ok(Evaluation { objective, metric_values })
    }

    /// Penalized cost `c(θ)` as a crate result; records the incumbent.
    ///
    /// Returns `+∞` for non-finite `θ` without evaluating the portfolio.
    ///
    /// # Errors
    /// See [`PortfolioProblem::evaluate`]. The first error is also kept in
    /// the shared incumbent.
    pub fn penalized_cost(&self, theta: &Weights) -> OptResult<Cost> {
        if !theta.iter().all(|t| t.is_finite()) {
            return Ok(f64::INFINITY);
        }
        let (weights, dist_sq) = self.feasible.project_with_distance(theta);
        let evaluation = match self.evaluate(&weights) {
            Ok(evaluation) => evaluation,
            Err(err) => {
                self.incumbent.borrow_mut().record_failure(&err);
                return Err(err);
            }
        };
        self.incumbent.borrow_mut().record(&weights, evaluation.objective);
        Ok(evaluation.objective + self.penalty * dist_sq)
    }
}

impl<'a, P: PortfolioFunction> CostFunction for PortfolioProblem<'a, P> {
    type Param = Weights;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.penalized_cost(theta)?)
    }
}

impl<'a, P: PortfolioFunction> Gradient for PortfolioProblem<'a, P> {
    type Param = Weights;
    type Gradient = Grad;

    /// Finite-difference gradient of the penalized cost; zero at non-finite
    /// iterates.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        if !theta.iter().all(|t| t.is_finite()) {
            return Ok(Grad::zeros(theta.len()));
        }
        Ok(fd_gradient(theta, |x: &Weights| self.cost(x))?)
    }
}
