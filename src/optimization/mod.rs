//! optimization — portfolio problem description, feasibility, and solvers.
//!
//! Purpose
//! -------
//! Provide a cohesive layer for choosing portfolio weights: declare what to
//! optimize (`problem`), keep candidate weights admissible (`feasibility`),
//! and run argmin-backed solvers over them (`portfolio_optimizer`), with a
//! single error/result surface (`errors`).
//!
//! Key behaviors
//! -------------
//! - Validate objectives, starting weights, box constraints, and budgets up
//!   front, so solvers can assume a consistent, non-empty feasible set.
//! - Project solver iterates exactly onto the feasible set, so caller code is
//!   never evaluated on inadmissible weights.
//! - Normalize configuration issues, evaluation failures, and backend solver
//!   errors into `errors::OptError` with the alias `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Solvers minimize an aggregate cost; maximized metrics are negated and
//!   targeted metrics become squared deviations.
//! - Weight vectors are `ndarray` arrays (`Weights`).
//! - This module performs no I/O. Progress logging is opt-in through the
//!   `obs_slog` feature and `SolverOptions::verbose`.
//!
//! Downstream usage
//! ----------------
//! - Build an `OptimizationInput`, write a portfolio function over
//!   `StochasticVariable`s, and call `optimize` / `optimize_with`.
//! - Import the curated surface via `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover validation (`problem`), projection
//!   exactness (`feasibility`), error conversions (`errors`), and solver
//!   behavior (`portfolio_optimizer`).
//! - Integration tests exercise complete Monte-Carlo optimizations.

pub mod errors;
pub mod feasibility;
pub mod portfolio_optimizer;
pub mod problem;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use stochastic_portfolio::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{EvaluationError, OptError, OptResult};
    pub use super::portfolio_optimizer::prelude::*;
    pub use super::problem::{
        BoxConstraint, ObjectiveSpec, OptimizationDirection, OptimizationInput, WeightBudget,
    };
}
