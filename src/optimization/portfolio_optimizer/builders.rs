//! portfolio_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Hide argmin's generic wiring behind small builders that apply the crate's
//! [`SolverOptions`], so the API layer can request a configured solver for
//! any [`SolverMethod`](crate::optimization::portfolio_optimizer::traits::SolverMethod)
//! without touching argmin types.
//!
//! Key behaviors
//! -------------
//! - L-BFGS with Hager–Zhang or More–Thuente line search, with optional
//!   gradient/cost tolerances ([`configure_lbfgs`]).
//! - Projected gradient over the problem's feasible set.
//! - Nelder–Mead on an initial simplex around the projected start, with
//!   every vertex pre-evaluated.
//!
//! Conventions
//! -----------
//! - Builders never set the initial parameter or `max_iters`; those are
//!   applied by the runner.
//! - argmin errors are converted into [`OptError`](crate::optimization::errors::OptError)
//!   at this boundary.
use argmin::solver::{neldermead::NelderMead, quasinewton::LBFGS};

use crate::optimization::{
    errors::OptResult,
    feasibility::FeasibleSet,
    portfolio_optimizer::{
        adapter::PortfolioProblem,
        projected_gradient::ProjectedGradient,
        traits::{PortfolioFunction, SolverOptions},
        types::{Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Weights},
    },
};

/// Relative offset of each extra simplex vertex from the start.
const SIMPLEX_STEP: f64 = 0.05;

/// Fallback Nelder–Mead tolerance on the spread of vertex costs.
const DEFAULT_SD_TOLERANCE: f64 = 1e-10;

/// L-BFGS with Hager–Zhang line search and the configured memory/tolerances.
///
/// # Errors
/// Tolerances rejected by argmin, converted into `OptError`.
pub fn build_lbfgs_hager_zhang(opts: &SolverOptions) -> OptResult<LbfgsHagerZhang> {
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), opts.lbfgs_mem_or_default());
    configure_lbfgs(lbfgs, opts)
}

/// L-BFGS with More–Thuente line search and the configured memory/tolerances.
///
/// # Errors
/// Tolerances rejected by argmin, converted into `OptError`.
pub fn build_lbfgs_more_thuente(opts: &SolverOptions) -> OptResult<LbfgsMoreThuente> {
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), opts.lbfgs_mem_or_default());
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// A `None` tolerance leaves argmin's default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Weights, Grad, Cost>, opts: &SolverOptions,
) -> OptResult<LBFGS<L, Weights, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Projected gradient over `feasible` with the configured tolerances.
pub fn build_projected_gradient(
    feasible: FeasibleSet, opts: &SolverOptions,
) -> OptResult<ProjectedGradient> {
    let mut solver = ProjectedGradient::new(feasible);
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Nelder–Mead on a simplex of `n + 1` vertices around the projected start.
///
/// Vertex `0` is `P_F(start)`; vertex `i + 1` moves it by
/// `SIMPLEX_STEP · max(1, |wᵢ|)` along coordinate `i`. Every vertex is
/// evaluated here once so that portfolio failures surface as errors before
/// the solver starts. The simplex stops when the standard deviation of its
/// costs falls below `tol_cost`, else `tol_grad`, else a fixed default.
///
/// # Errors
/// - Any evaluation error at a vertex (see [`PortfolioProblem::penalized_cost`]).
/// - argmin's rejection of the standard-deviation tolerance.
pub fn build_nelder_mead<P: PortfolioFunction>(
    problem: &PortfolioProblem<'_, P>, start: &Weights, opts: &SolverOptions,
) -> OptResult<NelderMead<Weights, Cost>> {
    let origin = problem.feasible_set().project(start);
    let mut vertices = Vec::with_capacity(origin.len() + 1);
    vertices.push(origin.clone());
    for i in 0..origin.len() {
        let mut vertex = origin.clone();
        vertex[i] += SIMPLEX_STEP * origin[i].abs().max(1.0);
        vertices.push(vertex);
    }
    for vertex in &vertices {
        problem.penalized_cost(vertex)?;
    }
    let sd_tolerance = opts.tols.tol_cost.or(opts.tols.tol_grad).unwrap_or(DEFAULT_SD_TOLERANCE);
    Ok(NelderMead::new(vertices).with_sd_tolerance(sd_tolerance)?)
}
