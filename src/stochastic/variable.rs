//! stochastic::variable — the immutable Monte-Carlo sample vector.
//!
//! Purpose
//! -------
//! Define [`StochasticVariable`], the value type behind every asset return,
//! portfolio outcome, and risk metric in this crate. A variable is an ordered,
//! fixed-length vector of `f64` samples plus an optional human-readable label.
//!
//! Key behaviors
//! -------------
//! - Validated explicit construction from samples (`from_samples`,
//!   `from_array`); generative construction lives in
//!   [`sampling`](crate::stochastic::sampling).
//! - Pure statistical reducers: moments, order statistics, and tail-risk
//!   measures computed over the stored samples.
//! - Linear combinations of several variables via [`StochasticVariable::weighted_sum`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The sample count is positive and fixed for the life of the value.
//! - Explicitly supplied samples are finite. Values produced by arithmetic are
//!   not re-validated (dividing by a sample equal to zero yields ±∞, as in
//!   plain `f64` arithmetic).
//! - Nothing mutates a variable after construction; every transform returns a
//!   new instance.
//!
//! Conventions
//! -----------
//! - `variance`/`std` are population moments (`ddof = 0`).
//! - Quantiles use statrs' order-statistics estimator (median-unbiased,
//!   Hyndman–Fan type 8).
//! - Tail-risk measures are reported as positive *losses*:
//!   `VaR_α = −q(1 − α)` and `CVaR_α = −E[X | X ≤ q(1 − α)]`.
use crate::stochastic::errors::{StochasticError, StochasticResult};
use ndarray::{Array1, ArrayView1};
use statrs::statistics::{Data, OrderStatistics};

/// Immutable vector of sampled outcomes with arithmetic and reducers.
///
/// Construct with [`StochasticVariable::from_samples`],
/// [`StochasticVariable::from_array`], or the generative constructors in
/// [`sampling`](crate::stochastic::sampling). Combine instances with the
/// overloaded operators in [`ops`](crate::stochastic::ops).
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticVariable {
    pub(super) samples: Array1<f64>,
    label: Option<String>,
}

impl StochasticVariable {
    /// Build a variable from explicit samples.
    ///
    /// # Errors
    /// - [`StochasticError::EmptySample`] if `samples` is empty.
    /// - [`StochasticError::NonFiniteSample`] for the first `NaN`/`±∞` entry.
    pub fn from_samples(samples: Vec<f64>) -> StochasticResult<Self> {
        Self::from_array(Array1::from(samples))
    }

    /// Build a variable from an owned `ndarray` vector.
    ///
    /// Same validation as [`StochasticVariable::from_samples`].
    pub fn from_array(samples: Array1<f64>) -> StochasticResult<Self> {
        validate_samples(samples.view())?;
        Ok(Self { samples, label: None })
    }

    /// Wrap an arithmetic result. Callers guarantee `samples` is non-empty.
    pub(crate) fn from_array_unchecked(samples: Array1<f64>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { samples, label: None }
    }

    /// Return a copy of `self` carrying `label`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of samples; always `> 0`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of the stored samples.
    pub fn samples(&self) -> ArrayView1<'_, f64> {
        self.samples.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.to_vec()
    }

    /// Apply `f` to every sample and return the transformed variable.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self::from_array_unchecked(self.samples.mapv(f))
    }

    /// Linear combination `Σ wᵢ · Xᵢ` of several variables.
    ///
    /// This is the usual body of a portfolio construction function.
    ///
    /// # Errors
    /// - [`StochasticError::EmptySample`] if `variables` is empty.
    /// - [`StochasticError::WeightCountMismatch`] if the weight and variable
    ///   counts differ.
    /// - [`StochasticError::ShapeMismatch`] if the variables do not share one
    ///   sample count.
    pub fn weighted_sum(
        weights: ArrayView1<'_, f64>, variables: &[StochasticVariable],
    ) -> StochasticResult<Self> {
        let first = variables.first().ok_or(StochasticError::EmptySample)?;
        if weights.len() != variables.len() {
            return Err(StochasticError::WeightCountMismatch {
                weights: weights.len(),
                variables: variables.len(),
            });
        }
        let mut acc = Array1::<f64>::zeros(first.len());
        for (&w, var) in weights.iter().zip(variables) {
            if var.len() != first.len() {
                return Err(StochasticError::ShapeMismatch { left: first.len(), right: var.len() });
            }
            acc.scaled_add(w, &var.samples);
        }
        Ok(Self::from_array_unchecked(acc))
    }

    // ---- Moments ----

    pub fn mean(&self) -> f64 {
        self.samples.sum() / self.len() as f64
    }

    /// Population variance (`ddof = 0`).
    pub fn variance(&self) -> f64 {
        self.samples.var(0.0)
    }

    /// Population standard deviation (`ddof = 0`).
    pub fn std(&self) -> f64 {
        self.samples.std(0.0)
    }

    /// Sample skewness `m₃ / m₂^{3/2}`; `NaN` for a degenerate variable.
    pub fn skewness(&self) -> f64 {
        let m2 = self.central_moment(2);
        if m2 == 0.0 {
            return f64::NAN;
        }
        self.central_moment(3) / m2.powf(1.5)
    }

    /// Excess kurtosis `m₄ / m₂² − 3`; `NaN` for a degenerate variable.
    pub fn kurtosis(&self) -> f64 {
        let m2 = self.central_moment(2);
        if m2 == 0.0 {
            return f64::NAN;
        }
        self.central_moment(4) / (m2 * m2) - 3.0
    }

    // ---- Order statistics ----

    pub fn min(&self) -> f64 {
        self.samples.fold(f64::INFINITY, |acc, &x| acc.min(x))
    }

    pub fn max(&self) -> f64 {
        self.samples.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x))
    }

    /// Empirical `p`-quantile.
    ///
    /// # Errors
    /// [`StochasticError::InvalidProbability`] if `p` is not in `[0, 1]`.
    pub fn quantile(&self, p: f64) -> StochasticResult<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StochasticError::InvalidProbability { value: p });
        }
        Ok(self.order_statistics().quantile(p))
    }

    pub fn median(&self) -> f64 {
        self.order_statistics().quantile(0.5)
    }

    // ---- Tail risk ----

    /// Value-at-risk at confidence `level`, reported as a positive loss.
    ///
    /// # Errors
    /// [`StochasticError::InvalidProbability`] unless `0 < level < 1`.
    pub fn value_at_risk(&self, level: f64) -> StochasticResult<f64> {
        let cutoff = self.tail_cutoff(level)?;
        Ok(-cutoff)
    }

    /// Conditional value-at-risk (expected shortfall) at confidence `level`,
    /// reported as a positive loss.
    ///
    /// # Errors
    /// [`StochasticError::InvalidProbability`] unless `0 < level < 1`.
    pub fn conditional_value_at_risk(&self, level: f64) -> StochasticResult<f64> {
        let cutoff = self.tail_cutoff(level)?;
        let (sum, count) = self
            .samples
            .iter()
            .filter(|&&x| x <= cutoff)
            .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
        // The cutoff is an interpolated order statistic, so the tail can be
        // empty only when it falls below the smallest sample.
        if count == 0 {
            return Ok(-self.min());
        }
        Ok(-(sum / count as f64))
    }

    // ---- Helpers ----

    fn central_moment(&self, k: i32) -> f64 {
        let mu = self.mean();
        self.samples.fold(0.0, |acc, &x| acc + (x - mu).powi(k)) / self.len() as f64
    }

    fn order_statistics(&self) -> Data<Vec<f64>> {
        Data::new(self.samples.to_vec())
    }

    fn tail_cutoff(&self, level: f64) -> StochasticResult<f64> {
        if !(level > 0.0 && level < 1.0) {
            return Err(StochasticError::InvalidProbability { value: level });
        }
        self.quantile(1.0 - level)
    }
}

fn validate_samples(samples: ArrayView1<'_, f64>) -> StochasticResult<()> {
    if samples.is_empty() {
        return Err(StochasticError::EmptySample);
    }
    for (index, &value) in samples.iter().enumerate() {
        if !value.is_finite() {
            return Err(StochasticError::NonFiniteSample { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in explicit constructors (empty and non-finite input).
    // - Moments, order statistics, and tail-risk reducers on small
    //   hand-computable sample vectors.
    // - `weighted_sum` success and failure paths.
    //
    // They intentionally DO NOT cover:
    // - Operator overloading (see `stochastic::ops`).
    // - Random sampling (see `stochastic::sampling`).
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn one_to(n: usize) -> StochasticVariable {
        StochasticVariable::from_samples((1..=n).map(|x| x as f64).collect())
            .expect("1..=n is a valid sample vector")
    }

    #[test]
    // Purpose
    // -------
    // Reject empty sample vectors at construction time.
    //
    // Given
    // -----
    // - An empty `Vec<f64>`.
    //
    // Expect
    // ------
    // - `StochasticError::EmptySample`.
    fn from_samples_rejects_empty_input() {
        // Act
        let err = StochasticVariable::from_samples(Vec::new()).unwrap_err();

        // Assert
        assert_eq!(err, StochasticError::EmptySample);
    }

    #[test]
    // Purpose
    // -------
    // Reject non-finite samples and report the first offending index.
    //
    // Given
    // -----
    // - Samples `[1.0, NaN, ∞]`.
    //
    // Expect
    // ------
    // - `NonFiniteSample { index: 1, .. }`.
    fn from_samples_rejects_non_finite_values() {
        // Act
        let err = StochasticVariable::from_samples(vec![1.0, f64::NAN, f64::INFINITY]).unwrap_err();

        // Assert
        match err {
            StochasticError::NonFiniteSample { index, .. } => assert_eq!(index, 1),
            other => panic!("Expected NonFiniteSample, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check population moments on a hand-computable vector.
    //
    // Given
    // -----
    // - Samples `[2, 4, 4, 4, 5, 5, 7, 9]` (mean 5, population std 2).
    //
    // Expect
    // ------
    // - `mean == 5`, `variance == 4`, `std == 2`.
    fn moments_match_textbook_example() {
        // Arrange
        let x =
            StochasticVariable::from_samples(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();

        // Act / Assert
        assert_relative_eq!(x.mean(), 5.0, epsilon = TOL);
        assert_relative_eq!(x.variance(), 4.0, epsilon = TOL);
        assert_relative_eq!(x.std(), 2.0, epsilon = TOL);
    }

    #[test]
    // Purpose
    // -------
    // Symmetric samples have zero skewness; a degenerate variable has
    // undefined (NaN) shape moments.
    //
    // Given
    // -----
    // - Samples `[-2, -1, 0, 1, 2]` and a constant vector.
    //
    // Expect
    // ------
    // - Skewness 0 for the symmetric vector; NaN skewness/kurtosis for the
    //   constant one.
    fn shape_moments_symmetric_and_degenerate() {
        // Arrange
        let sym = StochasticVariable::from_samples(vec![-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        let flat = StochasticVariable::from_samples(vec![3.0; 4]).unwrap();

        // Act / Assert
        assert_relative_eq!(sym.skewness(), 0.0, epsilon = TOL);
        // m2 = 2, m4 = 6.8 → 6.8 / 4 − 3 = −1.3
        assert_relative_eq!(sym.kurtosis(), -1.3, epsilon = TOL);
        assert!(flat.skewness().is_nan());
        assert!(flat.kurtosis().is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Quantiles are monotone, bounded by min/max, and reject probabilities
    // outside [0, 1].
    //
    // Given
    // -----
    // - Samples `1..=100`.
    //
    // Expect
    // ------
    // - `quantile(0) == min`, `quantile(1) == max`, median 50.5.
    // - `quantile(1.5)` fails with `InvalidProbability`.
    fn quantile_bounds_and_validation() {
        // Arrange
        let x = one_to(100);

        // Act / Assert
        assert_relative_eq!(x.quantile(0.0).unwrap(), x.min(), epsilon = TOL);
        assert_relative_eq!(x.quantile(1.0).unwrap(), x.max(), epsilon = TOL);
        assert_relative_eq!(x.median(), 50.5, epsilon = 1e-9);
        assert!(x.quantile(0.25).unwrap() < x.quantile(0.75).unwrap());
        assert_eq!(
            x.quantile(1.5).unwrap_err(),
            StochasticError::InvalidProbability { value: 1.5 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Tail-risk measures are positive losses with CVaR ≥ VaR.
    //
    // Given
    // -----
    // - Samples `-100..=-1` shifted so that most outcomes are losses.
    //
    // Expect
    // ------
    // - `VaR_0.95 == −quantile(0.05)`.
    // - `CVaR_0.95 ≥ VaR_0.95`.
    // - Levels outside (0, 1) are rejected.
    fn value_at_risk_and_cvar_are_consistent() {
        // Arrange
        let x = one_to(100).map(|v| v - 101.0);

        // Act
        let var = x.value_at_risk(0.95).unwrap();
        let cvar = x.conditional_value_at_risk(0.95).unwrap();

        // Assert
        assert_relative_eq!(var, -x.quantile(0.05).unwrap(), epsilon = TOL);
        assert!(var > 0.0);
        assert!(cvar >= var);
        assert!(x.value_at_risk(1.0).is_err());
        assert!(x.conditional_value_at_risk(0.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // `weighted_sum` combines variables linearly and enforces its shape rules.
    //
    // Given
    // -----
    // - Two 3-sample variables and weights `[0.25, 0.75]`.
    //
    // Expect
    // ------
    // - Samples equal the weighted elementwise sum.
    // - Wrong weight count, mismatched sizes, and no variables all fail.
    fn weighted_sum_combines_and_validates() {
        // Arrange
        let a = StochasticVariable::from_samples(vec![1.0, 2.0, 3.0]).unwrap();
        let b = StochasticVariable::from_samples(vec![4.0, 8.0, 12.0]).unwrap();
        let short = StochasticVariable::from_samples(vec![1.0]).unwrap();
        let w = array![0.25, 0.75];

        // Act
        let combo = StochasticVariable::weighted_sum(w.view(), &[a.clone(), b.clone()]).unwrap();

        // Assert
        assert_eq!(combo.to_vec(), vec![3.25, 6.5, 9.75]);
        assert_eq!(
            StochasticVariable::weighted_sum(array![1.0].view(), &[a.clone(), b]).unwrap_err(),
            StochasticError::WeightCountMismatch { weights: 1, variables: 2 }
        );
        assert_eq!(
            StochasticVariable::weighted_sum(w.view(), &[a, short]).unwrap_err(),
            StochasticError::ShapeMismatch { left: 3, right: 1 }
        );
        assert_eq!(
            StochasticVariable::weighted_sum(Array1::<f64>::zeros(0).view(), &[]).unwrap_err(),
            StochasticError::EmptySample
        );
    }

    #[test]
    // Purpose
    // -------
    // Labels are carried by `with_label` and do not affect the samples.
    fn with_label_sets_label_only() {
        let x = one_to(3).with_label("Asset A");
        assert_eq!(x.label(), Some("Asset A"));
        assert_eq!(x.len(), 3);
        assert!(!x.is_empty());
    }
}
