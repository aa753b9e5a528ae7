//! portfolio_optimizer::finite_diff — finite-difference gradients of the
//! solver cost.
//!
//! Purpose
//! -------
//! Portfolio functions are black boxes over Monte-Carlo samples, so every
//! gradient-based solver in this crate differentiates the cost numerically.
//! This module wraps the `finitediff` API with error capture and validation.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] takes central differences first and falls back to
//!   forward differences when the central estimate is non-finite.
//! - [`run_fd_diff`] performs the forward-difference pass with error capture
//!   and post-hoc validation.
//!
//! Invariants & assumptions
//! ------------------------
//! - The closures handed to `finitediff` must return `f64`, so a failing cost
//!   evaluation writes its error into a shared `RefCell` slot and returns
//!   `NaN`. The first captured error wins.
//! - A captured evaluation error is fatal: it is returned as-is and never
//!   retried with another difference scheme.
//! - Gradients returned from this module satisfy [`validate_grad`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the central path on a quadratic, error propagation, and
//!   the non-finite failure path.
use crate::optimization::{
    errors::OptResult,
    portfolio_optimizer::{
        types::{Cost, Grad, Weights},
        validation::validate_grad,
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference gradient of a fallible cost at `theta`.
///
/// Central differences are used first. If any evaluation fails the captured
/// error is returned; if the central estimate does not validate, a forward
/// difference pass is attempted via [`run_fd_diff`].
///
/// # Errors
/// - The first error raised by `cost`, converted into `OptError`.
/// - [`validate_grad`] errors if the forward estimate is also invalid.
pub fn fd_gradient<C>(theta: &Weights, cost: C) -> OptResult<Grad>
where
    C: Fn(&Weights) -> Result<Cost, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let cost_func = |x: &Weights| -> f64 {
        match cost(x) {
            Ok(value) => value,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let central = theta.central_diff(&cost_func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    match validate_grad(&central, theta.len()) {
        Ok(()) => Ok(central),
        Err(_) => run_fd_diff(theta, &cost_func, &closure_err),
    }
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, runs `forward_diff`, and returns either the captured
/// error or the validated gradient.
///
/// # Errors
/// - Any error captured in `closure_err` during the pass.
/// - [`OptError::GradientDimMismatch`](crate::optimization::errors::OptError::GradientDimMismatch)
///   or [`OptError::InvalidGradient`](crate::optimization::errors::OptError::InvalidGradient)
///   from [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Weights) -> f64>(
    theta: &Weights, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}
