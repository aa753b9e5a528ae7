//! feasibility — mapping solver iterates onto admissible portfolio weights.
//!
//! Purpose
//! -------
//! Every solver in this crate searches an unconstrained space and relies on
//! [`FeasibleSet::project`] to turn a candidate into weights that respect the
//! box constraints and the weight budget. Keeping the projection exact means
//! the portfolio function is never evaluated on infeasible weights and the
//! reported optimum is always feasible.
//!
//! Conventions
//! -----------
//! - Feasibility checks use an explicit absolute tolerance; the projection
//!   itself is exact up to `f64` rounding.

pub mod projection;

pub use self::projection::FeasibleSet;
