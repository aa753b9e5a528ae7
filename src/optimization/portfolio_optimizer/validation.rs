//! portfolio_optimizer::validation — shared checks for solver options and
//! solver outputs.
//!
//! Purpose
//! -------
//! Keep the small "is this number acceptable" rules in one place so that
//! option constructors, gradient code, and the runner agree on them.
//!
//! Conventions
//! -----------
//! - `verify_*` functions validate user-supplied configuration and return the
//!   matching configuration error.
//! - `validate_*` functions check values produced during a run (gradients,
//!   costs) and return numerical errors.
use crate::optimization::{
    errors::{OptError, OptResult},
    portfolio_optimizer::types::{Cost, Grad},
};

/// Gradient tolerance must be finite and strictly positive when present.
///
/// # Errors
/// [`OptError::InvalidTolGrad`].
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Cost-change tolerance must be finite and strictly positive when present.
///
/// # Errors
/// [`OptError::InvalidTolCost`].
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Iteration cap must be at least one when present.
///
/// # Errors
/// [`OptError::InvalidMaxIter`].
pub fn verify_max_iter(max_iter: Option<usize>) -> OptResult<()> {
    match max_iter {
        Some(0) => Err(OptError::InvalidMaxIter {
            max_iter: 0,
            reason: "Maximum iterations must be greater than zero.",
        }),
        _ => Ok(()),
    }
}

/// L-BFGS history length must be at least one when present.
///
/// # Errors
/// [`OptError::InvalidLBFGSMem`].
pub fn verify_lbfgs_mem(mem: Option<usize>) -> OptResult<()> {
    match mem {
        Some(0) => Err(OptError::InvalidLBFGSMem {
            mem: 0,
            reason: "L-BFGS memory must be greater than zero.",
        }),
        _ => Ok(()),
    }
}

/// Distance-penalty weight must be finite and strictly positive.
///
/// # Errors
/// [`OptError::InvalidPenalty`].
pub fn verify_penalty(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidPenalty { value, reason: "Penalty must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidPenalty { value, reason: "Penalty must be positive." });
    }
    Ok(())
}

/// Gradient must have length `dim` and finite entries.
///
/// # Errors
/// [`OptError::GradientDimMismatch`] or [`OptError::InvalidGradient`] for the
/// first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Cost must be finite.
///
/// # Errors
/// [`OptError::NonFiniteCost`].
pub fn validate_cost(value: Cost) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
