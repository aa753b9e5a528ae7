//! stochastic — Monte-Carlo sample vectors with arithmetic and reducers.
//!
//! Purpose
//! -------
//! Represent uncertain scalar quantities (asset returns, portfolio P&L, …) as
//! immutable vectors of sampled outcomes, compose them with elementwise
//! arithmetic, and reduce them to statistics that risk/return metrics are
//! built from.
//!
//! Key behaviors
//! -------------
//! - [`StochasticVariable`]: validated, immutable sample vector with moments,
//!   order statistics, and tail-risk reducers (`variable`).
//! - Operator overloading for `+ - * /` and unary `-` with variable and scalar
//!   operands (`ops`). Variable ⊕ variable operators are fallible and enforce
//!   equal sample counts.
//! - Generative construction from parametric distributions with optional
//!   seeding (`sampling`).
//! - A single error surface, [`StochasticError`] / [`StochasticResult`]
//!   (`errors`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Sample counts are positive and never change after construction.
//! - All reducers are pure functions of the stored samples; no operation has
//!   side effects, so variables can be shared freely across threads.
//!
//! Downstream usage
//! ----------------
//! - Callers build one variable per asset, then write a portfolio construction
//!   function `weights → StochasticVariable` combining them with the operators
//!   or with [`StochasticVariable::weighted_sum`].
//! - The `metrics` layer reduces variables to scalars; the optimization layer
//!   drives portfolio construction functions.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule: constructor validation and
//!   reducers in `variable`, shape enforcement and linearity in `ops`,
//!   reproducibility and parameter checks in `sampling`.

pub mod errors;
pub mod ops;
pub mod sampling;
pub mod variable;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{StochasticError, StochasticResult};
pub use self::sampling::SampleDistribution;
pub use self::variable::StochasticVariable;
