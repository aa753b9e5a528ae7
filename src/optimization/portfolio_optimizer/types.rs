//! portfolio_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and solver aliases used by the portfolio
//! optimizer so the rest of the optimization code stays agnostic to
//! `ndarray` and argmin generics.
//!
//! Key behaviors
//! -------------
//! - Canonical aliases for weight vectors, gradients, and scalar costs
//!   (`Weights`, `Grad`, `Cost`).
//! - A standard map type for argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Pre-wired L-BFGS aliases for both line searches, and the iteration-state
//!   aliases for gradient-based and simplex solvers.
//!
//! Conventions
//! -----------
//! - Solvers iterate on an unconstrained vector of the same length as the
//!   weights; it is typed as [`Weights`] too, and only becomes a weight
//!   vector after projection onto the feasible set.
//! - This module defines no runtime behavior; it is exercised indirectly by
//!   every solver path.
use argmin::{
    core::IterState,
    solver::{
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        quasinewton::LBFGS,
    },
};
use ndarray::Array1;
use std::collections::HashMap;

/// Portfolio weight vector (and the solver iterate it is projected from).
pub type Weights = Array1<f64>;

/// Gradient of the solver cost with respect to the iterate.
pub type Grad = Array1<f64>;

/// Scalar cost minimized by every solver.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default weight `ρ` of the `ρ‖θ − P_F(θ)‖²` distance penalty.
pub const DEFAULT_PENALTY: f64 = 10.0;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Weights, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Weights, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Weights, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Weights, Grad, Cost>;

/// Iteration state of gradient-based solvers.
pub type GradientState = IterState<Weights, Grad, (), (), (), Cost>;

/// Iteration state of derivative-free solvers.
pub type SimplexState = IterState<Weights, (), (), (), (), Cost>;
