//! portfolio_optimizer — argmin-powered search for optimal portfolio weights.
//!
//! Purpose
//! -------
//! Find weights that optimize one or more risk/return objectives of a
//! caller-defined portfolio, subject to per-asset boxes and a weight budget.
//! Callers provide a [`PortfolioFunction`] (usually a closure) and an
//! [`OptimizationInput`](crate::optimization::problem::OptimizationInput),
//! then call [`optimize`] or [`optimize_with`].
//!
//! Key behaviors
//! -------------
//! - Turn objectives into a single cost `Σ weightᵢ · costᵢ` and expose it to
//!   argmin via [`adapter::PortfolioProblem`], mapping every iterate onto the
//!   feasible set first.
//! - Offer three solvers selected by [`SolverMethod`]: the constrained
//!   [`projected_gradient::ProjectedGradient`] (default), L-BFGS with either
//!   line search, and Nelder–Mead ([`builders`]).
//! - Run any of them through the shared [`run::run_solver`] and normalize the
//!   outcome into an [`OptimizationResult`].
//! - Differentiate black-box portfolio functions numerically
//!   ([`finite_diff`]) with validation ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The portfolio function is only ever called on feasible weights.
//! - Reported weights are feasible, whether or not the solver converged.
//! - Evaluation failures are fatal and returned as errors; non-convergence is
//!   reported through [`OptimizationResult::success`].
//!
//! Conventions
//! -----------
//! - Solvers always minimize. Maximized metrics enter the cost negated; the
//!   per-objective metric values in the result keep their natural sign.
//! - Vectors use the aliases [`Weights`] and [`Grad`].
//!
//! Downstream usage
//! ----------------
//! - Most callers only need [`optimize`] with a method name, or
//!   [`optimize_with`] with a [`SolverOptions`] for tolerances, iteration
//!   caps, L-BFGS memory, penalty weight, and verbosity.
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover parsing and option validation
//!   ([`traits`]), objective aggregation and penalties ([`adapter`]), solver
//!   mechanics ([`projected_gradient`], [`builders`]), and closed-form
//!   end-to-end runs ([`api`]).
//! - The integration suite runs Monte-Carlo scenarios across all methods.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod projected_gradient;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{optimize, optimize_with};
pub use self::traits::{
    LineSearcher, OptimizationResult, PortfolioFunction, SolverMethod, SolverOptions, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, DEFAULT_PENALTY, FnEvalMap, Grad, Weights};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::api::{optimize, optimize_with};
    pub use super::traits::{
        OptimizationResult, PortfolioFunction, SolverMethod, SolverOptions, Tolerances,
    };
    pub use super::types::Weights;
}
