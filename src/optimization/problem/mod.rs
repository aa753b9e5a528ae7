//! problem — declarative description of a portfolio optimization.
//!
//! - `objective`: [`ObjectiveSpec`] and [`OptimizationDirection`], one goal
//!   each, with the metric→cost convention.
//! - `input`: [`OptimizationInput`], the validated aggregate of objectives,
//!   starting weights, [`BoxConstraint`]s and the [`WeightBudget`].
//!
//! Nothing here runs a solver; these types are plain validated data.

pub mod input;
pub mod objective;

pub use self::input::{BoxConstraint, OptimizationInput, WeightBudget};
pub use self::objective::{ObjectiveSpec, OptimizationDirection};
