//! stochastic::ops — elementwise arithmetic on stochastic variables.
//!
//! Two flavours of operand are supported:
//!
//! - **Variable ⊕ variable** (`+ - * /`): fallible, because both operands must
//!   carry the same number of samples. The operators return
//!   `StochasticResult<StochasticVariable>`; the named methods
//!   [`try_add`](StochasticVariable::try_add) & co. do the same.
//! - **Variable ⊕ scalar** and **scalar ⊕ variable**: infallible broadcasts
//!   returning a new [`StochasticVariable`].
//!
//! Every impl exists for owned and borrowed operands. Owned scalar operations
//! reuse the sample buffer of the consumed variable.
//!
//! ```
//! use stochastic_portfolio::stochastic::StochasticVariable;
//!
//! let a = StochasticVariable::from_samples(vec![1.0, 2.0, 3.0])?;
//! let b = StochasticVariable::from_samples(vec![3.0, 2.0, 1.0])?;
//! let mix = (0.5 * &a + &(0.5 * &b))?;
//! assert_eq!(mix.to_vec(), vec![2.0, 2.0, 2.0]);
//! # Ok::<(), stochastic_portfolio::stochastic::StochasticError>(())
//! ```
use crate::stochastic::{
    errors::{StochasticError, StochasticResult},
    variable::StochasticVariable,
};
use ndarray::Array1;
use std::ops::{Add, Div, Mul, Neg, Sub};

impl StochasticVariable {
    /// Elementwise `self + other`.
    ///
    /// # Errors
    /// [`StochasticError::ShapeMismatch`] if the sample counts differ.
    pub fn try_add(&self, other: &StochasticVariable) -> StochasticResult<StochasticVariable> {
        self.check_shape(other)?;
        Ok(StochasticVariable::from_array_unchecked(&self.samples + &other.samples))
    }

    /// Elementwise `self − other`.
    ///
    /// # Errors
    /// [`StochasticError::ShapeMismatch`] if the sample counts differ.
    pub fn try_sub(&self, other: &StochasticVariable) -> StochasticResult<StochasticVariable> {
        self.check_shape(other)?;
        Ok(StochasticVariable::from_array_unchecked(&self.samples - &other.samples))
    }

    /// Elementwise `self · other`.
    ///
    /// # Errors
    /// [`StochasticError::ShapeMismatch`] if the sample counts differ.
    pub fn try_mul(&self, other: &StochasticVariable) -> StochasticResult<StochasticVariable> {
        self.check_shape(other)?;
        Ok(StochasticVariable::from_array_unchecked(&self.samples * &other.samples))
    }

    /// Elementwise `self / other`. Zero denominators follow IEEE-754.
    ///
    /// # Errors
    /// [`StochasticError::ShapeMismatch`] if the sample counts differ.
    pub fn try_div(&self, other: &StochasticVariable) -> StochasticResult<StochasticVariable> {
        self.check_shape(other)?;
        Ok(StochasticVariable::from_array_unchecked(&self.samples / &other.samples))
    }

    /// Multiply every sample by `factor`.
    pub fn scale(&self, factor: f64) -> StochasticVariable {
        self * factor
    }

    /// Add `offset` to every sample.
    pub fn shift(&self, offset: f64) -> StochasticVariable {
        self + offset
    }

    fn check_shape(&self, other: &StochasticVariable) -> StochasticResult<()> {
        if self.len() != other.len() {
            return Err(StochasticError::ShapeMismatch { left: self.len(), right: other.len() });
        }
        Ok(())
    }
}

// ---- Variable ⊕ variable ----

macro_rules! impl_variable_binop {
    ($trait:ident, $method:ident, $named:ident) => {
        impl $trait<&StochasticVariable> for &StochasticVariable {
            type Output = StochasticResult<StochasticVariable>;
            fn $method(self, rhs: &StochasticVariable) -> Self::Output {
                self.$named(rhs)
            }
        }

        impl $trait<StochasticVariable> for &StochasticVariable {
            type Output = StochasticResult<StochasticVariable>;
            fn $method(self, rhs: StochasticVariable) -> Self::Output {
                self.$named(&rhs)
            }
        }

        impl $trait<&StochasticVariable> for StochasticVariable {
            type Output = StochasticResult<StochasticVariable>;
            fn $method(self, rhs: &StochasticVariable) -> Self::Output {
                self.$named(rhs)
            }
        }

        impl $trait<StochasticVariable> for StochasticVariable {
            type Output = StochasticResult<StochasticVariable>;
            fn $method(self, rhs: StochasticVariable) -> Self::Output {
                self.$named(&rhs)
            }
        }
    };
}

impl_variable_binop!(Add, add, try_add);
impl_variable_binop!(Sub, sub, try_sub);
impl_variable_binop!(Mul, mul, try_mul);
impl_variable_binop!(Div, div, try_div);

// ---- Variable ⊕ scalar ----

macro_rules! impl_scalar_rhs_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f64> for &StochasticVariable {
            type Output = StochasticVariable;
            fn $method(self, rhs: f64) -> StochasticVariable {
                StochasticVariable::from_array_unchecked(&self.samples $op rhs)
            }
        }

        impl $trait<f64> for StochasticVariable {
            type Output = StochasticVariable;
            fn $method(self, rhs: f64) -> StochasticVariable {
                StochasticVariable::from_array_unchecked(self.samples $op rhs)
            }
        }
    };
}

impl_scalar_rhs_binop!(Add, add, +);
impl_scalar_rhs_binop!(Sub, sub, -);
impl_scalar_rhs_binop!(Mul, mul, *);
impl_scalar_rhs_binop!(Div, div, /);

// ---- Scalar ⊕ variable ----

macro_rules! impl_scalar_lhs_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&StochasticVariable> for f64 {
            type Output = StochasticVariable;
            fn $method(self, rhs: &StochasticVariable) -> StochasticVariable {
                let samples: Array1<f64> = self $op &rhs.samples;
                StochasticVariable::from_array_unchecked(samples)
            }
        }

        impl $trait<StochasticVariable> for f64 {
            type Output = StochasticVariable;
            fn $method(self, rhs: StochasticVariable) -> StochasticVariable {
                let samples: Array1<f64> = self $op rhs.samples;
                StochasticVariable::from_array_unchecked(samples)
            }
        }
    };
}

impl_scalar_lhs_binop!(Add, add, +);
impl_scalar_lhs_binop!(Sub, sub, -);
impl_scalar_lhs_binop!(Mul, mul, *);
impl_scalar_lhs_binop!(Div, div, /);

// ---- Negation ----

impl Neg for &StochasticVariable {
    type Output = StochasticVariable;
    fn neg(self) -> StochasticVariable {
        StochasticVariable::from_array_unchecked(-&self.samples)
    }
}

impl Neg for StochasticVariable {
    type Output = StochasticVariable;
    fn neg(self) -> StochasticVariable {
        StochasticVariable::from_array_unchecked(-self.samples)
    }
}
