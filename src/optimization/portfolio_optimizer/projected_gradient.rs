//! portfolio_optimizer::projected_gradient — constrained first-order solver.
//!
//! Purpose
//! -------
//! Minimize a cost over the feasible weight set `F` (boxes plus budget)
//! while keeping every iterate feasible. This is the crate's default method
//! and the one intended for box- and budget-constrained portfolios.
//!
//! Key behaviors
//! -------------
//! - Iterates `w ← P_F(w − α g)` with `g` the gradient of the cost at `w`.
//! - Armijo backtracking along the projection arc:
//!   `c(w(α)) ≤ c(w) − σ gᵀ(w − w(α))`, halving `α` on rejection.
//! - After an accepted step the trial step doubles (capped), so progress on
//!   flat objectives is geometric.
//! - Converges when the projected-gradient norm `‖w − P_F(w − g)‖` or the
//!   cost change drops below the configured tolerances.
//! - When backtracking finds no decrease (kinks of quantile-type sample
//!   metrics, or a misleading numerical gradient) the solver polls the
//!   feasible compass moves `P_F(w ± δ eᵢ)` and `P_F(w + δ(eᵢ − eⱼ))`. An
//!   improving move is taken and gradient steps resume; otherwise `δ` is
//!   halved. Once `δ` falls below [`MIN_POLL`] no feasible move of any
//!   polled size improves the cost and the solver reports convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - The initial parameter is projected in `init`; all later parameters are
//!   outputs of the projection, so the state never holds infeasible weights.
//! - The problem's cost must coincide with the objective on `F`; the
//!   portfolio adapter guarantees this since its penalty vanishes there.
//!
//! Testing notes
//! -------------
//! - Unit tests run the solver through argmin's `Executor` on analytic
//!   quadratics with known constrained minimizers, including one whose
//!   gradient points uphill so that only the compass poll makes progress.
use crate::optimization::{
    errors::OptResult,
    feasibility::FeasibleSet,
    portfolio_optimizer::{
        types::{Cost, Grad, GradientState, Weights},
        validation::{verify_tol_cost, verify_tol_grad},
    },
};
use argmin::{
    core::{
        ArgminError, CostFunction, Error, Gradient, KV, Problem, Solver, State, TerminationReason,
        TerminationStatus,
    },
    kv,
};
use argmin_math::ArgminL2Norm;

const INITIAL_STEP: f64 = 1.0;
const MAX_STEP: f64 = 1e8;
const STEP_SHRINK: f64 = 0.5;
const STEP_GROWTH: f64 = 2.0;
const SUFFICIENT_DECREASE: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 60;

/// Initial compass mesh size.
pub const INITIAL_POLL: f64 = 0.05;
/// Mesh size below which a failed poll counts as convergence.
pub const MIN_POLL: f64 = 1e-8;
const POLL_SHRINK: f64 = 0.5;

/// Projected-gradient descent with Armijo backtracking and a compass-poll
/// fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedGradient {
    feasible: FeasibleSet,
    step: f64,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    pg_norm: f64,
    cost_change: f64,
    poll_size: f64,
    stalled: bool,
}

/// Result of one Armijo line search.
enum LineSearchOutcome {
    Accepted { weights: Weights, cost: Cost, step: f64 },
    /// `P_F(w − αg) = w` at the first trial step.
    Stationary,
    /// No trial step gave a sufficient decrease.
    Stalled,
}

impl ProjectedGradient {
    pub fn new(feasible: FeasibleSet) -> Self {
        Self {
            feasible,
            step: INITIAL_STEP,
            tol_grad: None,
            tol_cost: None,
            pg_norm: f64::INFINITY,
            cost_change: f64::INFINITY,
            poll_size: INITIAL_POLL,
            stalled: false,
        }
    }

    /// Stop once `‖w − P_F(w − g)‖ ≤ tol`.
    ///
    /// # Errors
    /// [`OptError::InvalidTolGrad`](crate::optimization::errors::OptError::InvalidTolGrad)
    /// unless `tol` is finite and positive.
    pub fn with_tolerance_grad(mut self, tol: f64) -> OptResult<Self> {
        verify_tol_grad(Some(tol))?;
        self.tol_grad = Some(tol);
        Ok(self)
    }

    /// Stop once an accepted step changes the cost by at most `tol`.
    ///
    /// # Errors
    /// [`OptError::InvalidTolCost`](crate::optimization::errors::OptError::InvalidTolCost)
    /// unless `tol` is finite and positive.
    pub fn with_tolerance_cost(mut self, tol: f64) -> OptResult<Self> {
        verify_tol_cost(Some(tol))?;
        self.tol_cost = Some(tol);
        Ok(self)
    }

    fn projected_gradient_norm(&self, weights: &Weights, grad: &Grad) -> f64 {
        let stepped = self.feasible.project(&(weights - grad));
        (weights - &stepped).l2_norm()
    }

    fn line_search<O>(
        &self, problem: &mut Problem<O>, weights: &Weights, grad: &Grad, cost: Cost,
    ) -> Result<LineSearchOutcome, Error>
    where
        O: CostFunction<Param = Weights, Output = Cost>,
    {
        let mut step = self.step;
        for attempt in 0..MAX_BACKTRACKS {
            let candidate = self.feasible.project(&(weights - &(grad * step)));
            if candidate == *weights {
                // P_F(w − αg) = w for some α > 0 only at a stationary point.
                return Ok(if attempt == 0 {
                    LineSearchOutcome::Stationary
                } else {
                    LineSearchOutcome::Stalled
                });
            }
            let decrease = grad.dot(&(weights - &candidate));
            let candidate_cost = problem.cost(&candidate)?;
            if candidate_cost <= cost - SUFFICIENT_DECREASE * decrease {
                return Ok(LineSearchOutcome::Accepted {
                    weights: candidate,
                    cost: candidate_cost,
                    step,
                });
            }
            step *= STEP_SHRINK;
        }
        Ok(LineSearchOutcome::Stalled)
    }

    /// Best strictly improving compass move of size `poll_size`, if any.
    fn poll<O>(
        &self, problem: &mut Problem<O>, weights: &Weights, cost: Cost,
    ) -> Result<Option<(Weights, Cost)>, Error>
    where
        O: CostFunction<Param = Weights, Output = Cost>,
    {
        let n = weights.len();
        let delta = self.poll_size;
        let mut moves = Vec::with_capacity(n * (n + 1));
        for i in 0..n {
            for sign in [1.0, -1.0] {
                let mut theta = weights.clone();
                theta[i] += sign * delta;
                moves.push(theta);
            }
            for j in (0..n).filter(|&j| j != i) {
                let mut theta = weights.clone();
                theta[i] += delta;
                theta[j] -= delta;
                moves.push(theta);
            }
        }

        let mut best: Option<(Weights, Cost)> = None;
        for theta in moves {
            let candidate = self.feasible.project(&theta);
            if candidate == *weights {
                continue;
            }
            let candidate_cost = problem.cost(&candidate)?;
            let threshold = best.as_ref().map_or(cost, |(_, c)| *c);
            if candidate_cost < threshold {
                best = Some((candidate, candidate_cost));
            }
        }
        Ok(best)
    }
}

impl<O> Solver<O, GradientState> for ProjectedGradient
where
    O: CostFunction<Param = Weights, Output = Cost> + Gradient<Param = Weights, Gradient = Grad>,
{
    const NAME: &'static str = "Projected gradient";

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: GradientState,
    ) -> Result<(GradientState, Option<KV>), Error> {
        let start = state.take_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "ProjectedGradient requires an initial parameter vector".to_string(),
        })?;
        let weights = self.feasible.project(&start);
        let cost = problem.cost(&weights)?;
        let grad = problem.gradient(&weights)?;
        self.pg_norm = self.projected_gradient_norm(&weights, &grad);
        let kv = kv!("pg_norm" => self.pg_norm;);
        Ok((state.param(weights).gradient(grad).cost(cost), Some(kv)))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: GradientState,
    ) -> Result<(GradientState, Option<KV>), Error> {
        let weights = state.take_param().ok_or_else(|| ArgminError::PotentialBug {
            text: "ProjectedGradient: parameter missing from state".to_string(),
        })?;
        let grad = state.take_gradient().ok_or_else(|| ArgminError::PotentialBug {
            text: "ProjectedGradient: gradient missing from state".to_string(),
        })?;
        let cost = state.get_cost();

        if !self.stalled {
            match self.line_search(problem, &weights, &grad, cost)? {
                LineSearchOutcome::Accepted { weights: candidate, cost: candidate_cost, step } => {
                    let candidate_grad = problem.gradient(&candidate)?;
                    self.cost_change = (cost - candidate_cost).abs();
                    self.pg_norm = self.projected_gradient_norm(&candidate, &candidate_grad);
                    self.step = (step * STEP_GROWTH).min(MAX_STEP);
                    let kv = kv!("step" => step; "pg_norm" => self.pg_norm;);
                    let state =
                        state.param(candidate).gradient(candidate_grad).cost(candidate_cost);
                    return Ok((state, Some(kv)));
                }
                LineSearchOutcome::Stationary => {
                    let state = state
                        .param(weights)
                        .gradient(grad)
                        .terminate_with(TerminationReason::SolverConverged);
                    return Ok((state, None));
                }
                LineSearchOutcome::Stalled => self.stalled = true,
            }
        }

        match self.poll(problem, &weights, cost)? {
            Some((candidate, candidate_cost)) => {
                let candidate_grad = problem.gradient(&candidate)?;
                self.stalled = false;
                self.cost_change = cost - candidate_cost;
                self.pg_norm = self.projected_gradient_norm(&candidate, &candidate_grad);
                let kv = kv!("poll_size" => self.poll_size; "pg_norm" => self.pg_norm;);
                let state = state.param(candidate).gradient(candidate_grad).cost(candidate_cost);
                Ok((state, Some(kv)))
            }
            None => {
                self.poll_size *= POLL_SHRINK;
                let kv = kv!("poll_size" => self.poll_size;);
                let state = state.param(weights).gradient(grad);
                if self.poll_size < MIN_POLL {
                    return Ok((state.terminate_with(TerminationReason::SolverConverged), Some(kv)));
                }
                Ok((state, Some(kv)))
            }
        }
    }

    fn terminate(&mut self, _state: &GradientState) -> TerminationStatus {
        if self.tol_grad.is_some_and(|tol| self.pg_norm <= tol) {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        if self.tol_cost.is_some_and(|tol| self.cost_change <= tol) {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        TerminationStatus::NotTerminated
    }
}
