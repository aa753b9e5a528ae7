//! problem::input — the validated optimization problem.
//!
//! Purpose
//! -------
//! Bundle everything a solver needs besides the portfolio function itself:
//! objectives, asset count, starting weights, per-asset boxes, and the
//! budget the weights must sum to. Every check happens in the constructor so
//! that solver code can assume a consistent, non-empty feasible set.
//!
//! Invariants & assumptions
//! ------------------------
//! - `initial_weights.len() == bounds.len() == n_assets > 0`.
//! - Every box is finite with `low <= high`, and every initial weight lies in
//!   its box.
//! - When a budget `b` is set, `Σ low ≤ b ≤ Σ high`, so the feasible set is
//!   non-empty. The initial weights need not sum to `b`; solvers start from
//!   their projection onto the feasible set.
use crate::optimization::{
    errors::{OptError, OptResult},
    portfolio_optimizer::types::Weights,
    problem::objective::ObjectiveSpec,
};

/// Closed interval `[low, high]` for one asset weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraint {
    pub low: f64,
    pub high: f64,
}

impl BoxConstraint {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// The long-only box `[0, 1]`.
    pub const fn unit() -> Self {
        Self { low: 0.0, high: 1.0 }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

impl From<(f64, f64)> for BoxConstraint {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Linear constraint on the sum of the weights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightBudget {
    /// `Σ w = 1`.
    #[default]
    FullyInvested,
    /// `Σ w = b`.
    Sum(f64),
    /// Box constraints only.
    Unconstrained,
}

impl WeightBudget {
    /// Required weight sum, if any.
    pub fn total(&self) -> Option<f64> {
        match *self {
            WeightBudget::FullyInvested => Some(1.0),
            WeightBudget::Sum(b) => Some(b),
            WeightBudget::Unconstrained => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationInput {
    objectives: Vec<ObjectiveSpec>,
    n_assets: usize,
    initial_weights: Weights,
    bounds: Vec<BoxConstraint>,
    budget: WeightBudget,
}

impl OptimizationInput {
    /// Build a fully invested problem (`Σ w = 1`).
    ///
    /// # Errors
    /// See [`OptimizationInput::with_budget`].
    pub fn new(
        objectives: Vec<ObjectiveSpec>, n_assets: usize, initial_weights: Weights,
        bounds: Vec<BoxConstraint>,
    ) -> OptResult<Self> {
        Self::with_budget(objectives, n_assets, initial_weights, bounds, WeightBudget::FullyInvested)
    }

    /// Build a problem with an explicit weight budget.
    ///
    /// # Errors
    /// - [`OptError::InvalidAssetCount`] if `n_assets == 0`.
    /// - [`OptError::NoObjectives`] if `objectives` is empty.
    /// - [`OptError::DimensionMismatch`] if `initial_weights` or `bounds` do not
    ///   have `n_assets` entries.
    /// - [`OptError::InvalidBounds`] for the first non-finite or inverted box.
    /// - [`OptError::InfeasibleStart`] for the first initial weight outside its
    ///   box (or non-finite).
    /// - [`OptError::InvalidBudget`] / [`OptError::InfeasibleBudget`] if the
    ///   budget is non-finite or unreachable within the boxes.
    pub fn with_budget(
        objectives: Vec<ObjectiveSpec>, n_assets: usize, initial_weights: Weights,
        bounds: Vec<BoxConstraint>, budget: WeightBudget,
    ) -> OptResult<Self> {
        if n_assets == 0 {
            return Err(OptError::InvalidAssetCount);
        }
        if objectives.is_empty() {
            return Err(OptError::NoObjectives);
        }
        verify_len("initial_weights", n_assets, initial_weights.len())?;
        verify_len("box_constraints", n_assets, bounds.len())?;
        for (index, bound) in bounds.iter().enumerate() {
            if !bound.is_valid() {
                return Err(OptError::InvalidBounds { index, low: bound.low, high: bound.high });
            }
        }
        for (index, (&value, bound)) in initial_weights.iter().zip(bounds.iter()).enumerate() {
            if !value.is_finite() || !bound.contains(value) {
                return Err(OptError::InfeasibleStart {
                    index,
                    value,
                    low: bound.low,
                    high: bound.high,
                });
            }
        }
        if let Some(total) = budget.total() {
            verify_budget(total, &bounds)?;
        }
        Ok(Self { objectives, n_assets, initial_weights, bounds, budget })
    }

    pub fn objectives(&self) -> &[ObjectiveSpec] {
        &self.objectives
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    pub fn initial_weights(&self) -> &Weights {
        &self.initial_weights
    }

    pub fn bounds(&self) -> &[BoxConstraint] {
        &self.bounds
    }

    pub fn budget(&self) -> WeightBudget {
        self.budget
    }
}

// ---- Helper methods ----

fn verify_len(what: &'static str, expected: usize, found: usize) -> OptResult<()> {
    if expected != found {
        return Err(OptError::DimensionMismatch { what, expected, found });
    }
    Ok(())
}

fn verify_budget(total: f64, bounds: &[BoxConstraint]) -> OptResult<()> {
    if !total.is_finite() {
        return Err(OptError::InvalidBudget { value: total });
    }
    let min_sum: f64 = bounds.iter().map(|b| b.low).sum();
    let max_sum: f64 = bounds.iter().map(|b| b.high).sum();
    let slack = 1e-12 * total.abs().max(1.0);
    if total < min_sum - slack || total > max_sum + slack {
        return Err(OptError::InfeasibleBudget { budget: total, min_sum, max_sum });
    }
    Ok(())
}
