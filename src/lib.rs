//! stochastic_portfolio — Monte-Carlo risk metrics and portfolio weight
//! optimization.
//!
//! Purpose
//! -------
//! Model uncertain asset outcomes as vectors of sampled scenarios, reduce
//! them to risk/return metrics, and search for portfolio weights that
//! optimize one or more of those metrics under box and budget constraints.
//!
//! Key behaviors
//! -------------
//! - `stochastic`: [`StochasticVariable`](stochastic::StochasticVariable),
//!   an immutable sample vector with arithmetic, moments, quantiles, and
//!   tail-risk reducers, plus seeded generation from parametric
//!   distributions.
//! - `metrics`: the closed set of supported metrics
//!   ([`MetricType`](metrics::MetricType)) and their evaluation on a
//!   variable.
//! - `optimization`: objectives, validated optimization inputs, the feasible
//!   set projection, and argmin-backed solvers behind
//!   [`optimize`](optimization::portfolio_optimizer::optimize).
//!
//! Invariants & assumptions
//! ------------------------
//! - Portfolio construction functions are deterministic and pure; the
//!   optimizer may call them many times with equal weights.
//! - All randomness is confined to explicit sampling constructors and is
//!   reproducible when a seed is given.
//!
//! Downstream usage
//! ----------------
//! - Most callers import [`prelude`] and work with `StochasticVariable`,
//!   `ObjectiveSpec`, `OptimizationInput`, and `optimize`.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests; `tests/integration_portfolio_pipeline.rs`
//!   runs complete optimizations on simulated assets.

pub mod metrics;
pub mod optimization;
pub mod stochastic;

// ---- Crate-wide prelude ---------------------------------------------------

pub mod prelude {
    pub use crate::metrics::{MetricError, MetricType, evaluate};
    pub use crate::optimization::prelude::*;
    pub use crate::stochastic::{
        SampleDistribution, StochasticError, StochasticResult, StochasticVariable,
    };
}
