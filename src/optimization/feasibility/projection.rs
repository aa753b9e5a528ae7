//! Euclidean projection onto the feasible weight set.
//!
//! The feasible set is `F = {w : low ≤ w ≤ high, Σ w = b}` (the budget term is
//! dropped for [`WeightBudget::Unconstrained`]). Solvers work in an
//! unconstrained space `θ` and map every candidate through [`FeasibleSet::project`],
//! so the portfolio function only ever sees feasible weights.
//!
//! For a budget `b` the projection is `w_i(λ) = clip(θ_i − λ, low_i, high_i)`
//! where the scalar `λ` solves `Σ w_i(λ) = b`. The sum is continuous and
//! non-increasing in `λ`, so `λ` is found by bisection between
//! `min(θ_i − high_i)` (sum = Σ high) and `max(θ_i − low_i)` (sum = Σ low).
//!
//! Non-finite coordinates are replaced before projecting: `+∞` by `high_i`,
//! `−∞` by `low_i` (the limits of the projection) and `NaN` by the box
//! midpoint, so the result is feasible for every input.
use crate::optimization::{
    portfolio_optimizer::types::Weights,
    problem::input::{BoxConstraint, OptimizationInput, WeightBudget},
};
use ndarray::{Array1, Zip};

/// Hard cap on bisection steps; `f64` brackets collapse well before this.
const MAX_BISECTION_STEPS: usize = 200;

/// Box bounds plus optional budget, with an exact projection operator.
#[derive(Debug, Clone, PartialEq)]
pub struct FeasibleSet {
    lows: Array1<f64>,
    highs: Array1<f64>,
    budget: Option<f64>,
}

impl FeasibleSet {
    pub fn new(bounds: &[BoxConstraint], budget: WeightBudget) -> Self {
        Self {
            lows: bounds.iter().map(|b| b.low).collect(),
            highs: bounds.iter().map(|b| b.high).collect(),
            budget: budget.total(),
        }
    }

    pub fn from_input(input: &OptimizationInput) -> Self {
        Self::new(input.bounds(), input.budget())
    }

    pub fn dim(&self) -> usize {
        self.lows.len()
    }

    /// Nearest feasible point to `theta` in the Euclidean norm.
    pub fn project(&self, theta: &Weights) -> Weights {
        if theta.iter().all(|t| t.is_finite()) {
            return self.project_finite(theta);
        }
        let sanitized = Zip::from(theta).and(&self.lows).and(&self.highs).map_collect(
            |&t, &lo, &hi| {
                if t.is_nan() { 0.5 * (lo + hi) } else { t.clamp(lo, hi) }
            },
        );
        self.project_finite(&sanitized)
    }

    /// Squared distance `‖θ − P_F(θ)‖²` together with the projection.
    pub fn project_with_distance(&self, theta: &Weights) -> (Weights, f64) {
        let projected = self.project(theta);
        let dist_sq: f64 =
            theta.iter().zip(projected.iter()).map(|(t, w)| (t - w) * (t - w)).sum();
        (projected, dist_sq)
    }

    /// `true` if `w` satisfies every box and the budget within `tol`.
    pub fn contains(&self, w: &Weights, tol: f64) -> bool {
        if w.len() != self.dim() {
            return false;
        }
        let in_boxes = w
            .iter()
            .zip(self.lows.iter().zip(self.highs.iter()))
            .all(|(&x, (&lo, &hi))| x >= lo - tol && x <= hi + tol);
        let on_budget = self.budget.is_none_or(|total| (w.sum() - total).abs() <= tol);
        in_boxes && on_budget
    }

    // ---- Helpers ----

    fn project_finite(&self, theta: &Weights) -> Weights {
        match self.budget {
            None => self.clip(theta, 0.0),
            Some(total) => self.project_onto_budget(theta, total),
        }
    }

    fn clip(&self, theta: &Weights, shift: f64) -> Weights {
        Zip::from(theta)
            .and(&self.lows)
            .and(&self.highs)
            .map_collect(|&t, &lo, &hi| (t - shift).clamp(lo, hi))
    }

    fn project_onto_budget(&self, theta: &Weights, total: f64) -> Weights {
        let mut lo = theta
            .iter()
            .zip(self.highs.iter())
            .fold(f64::INFINITY, |acc, (&t, &high)| acc.min(t - high));
        let mut hi = theta
            .iter()
            .zip(self.lows.iter())
            .fold(f64::NEG_INFINITY, |acc, (&t, &low)| acc.max(t - low));
        for _ in 0..MAX_BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if self.clip(theta, mid).sum() > total {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let projected = self.clip(theta, 0.5 * (lo + hi));
        self.spread_residual(projected, total)
    }

    /// Push the last rounding residual of `Σ w − b` onto coordinates with room.
    fn spread_residual(&self, mut w: Weights, total: f64) -> Weights {
        let residual = total - w.sum();
        if residual == 0.0 {
            return w;
        }
        let free: Vec<usize> = (0..w.len())
            .filter(|&i| {
                if residual > 0.0 { w[i] < self.highs[i] } else { w[i] > self.lows[i] }
            })
            .collect();
        if free.is_empty() {
            return w;
        }
        let share = residual / free.len() as f64;
        for i in free {
            w[i] = (w[i] + share).clamp(self.lows[i], self.highs[i]);
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn assert_close(actual: &Weights, expected: &Weights) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Fixed points: feasible inputs project onto themselves.
    // - Closed-form projections onto the simplex and onto boxes.
    // - Feasibility of projections for arbitrary inputs, including budgets
    //   other than one and non-finite coordinates.
    // -------------------------------------------------------------------------

    fn simplex(n: usize) -> FeasibleSet {
        FeasibleSet::new(&vec![BoxConstraint::unit(); n], WeightBudget::FullyInvested)
    }

    #[test]
    // Purpose
    // -------
    // Feasible points are fixed points of the projection.
    fn feasible_points_are_fixed() {
        // Arrange
        let set = simplex(3);
        let w = array![0.2, 0.5, 0.3];

        // Act
        let (p, dist_sq) = set.project_with_distance(&w);

        // Assert
        assert_close(&p, &w);
        assert_abs_diff_eq!(dist_sq, 0.0, epsilon = 1e-20);
    }

    #[test]
    // Purpose
    // -------
    // Projection onto the simplex matches hand-computed results.
    //
    // Given
    // -----
    // - θ = [1.2, 0.2] → shift λ = 0.2 → [1.0, 0.0].
    // - θ = [0.4, 0.4] → shift λ = -0.1 → [0.5, 0.5].
    //
    // Expect
    // ------
    // - Exact agreement up to rounding.
    fn simplex_projection_closed_forms() {
        let set = simplex(2);
        assert_close(&set.project(&array![1.2, 0.2]), &array![1.0, 0.0]);
        assert_close(&set.project(&array![0.4, 0.4]), &array![0.5, 0.5]);
    }

    #[test]
    // Purpose
    // -------
    // Without a budget the projection is a plain clip.
    fn unconstrained_budget_clips() {
        // Arrange
        let set = FeasibleSet::new(
            &[BoxConstraint::new(-1.0, 1.0), BoxConstraint::new(0.0, 0.5)],
            WeightBudget::Unconstrained,
        );

        // Act
        let p = set.project(&array![-3.0, 0.7]);

        // Assert
        assert_eq!(p, array![-1.0, 0.5]);
        assert!(set.contains(&p, 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Projections of arbitrary points are feasible for asymmetric boxes and a
    // non-unit budget.
    //
    // Given
    // -----
    // - Boxes [0, 0.5], [-0.2, 1], [0.1, 0.4] with budget 0.8.
    // - A spread of inputs, including far-away ones.
    //
    // Expect
    // ------
    // - Each projection lies in F within 1e-12.
    fn projections_are_feasible() {
        // Arrange
        let set = FeasibleSet::new(
            &[
                BoxConstraint::new(0.0, 0.5),
                BoxConstraint::new(-0.2, 1.0),
                BoxConstraint::new(0.1, 0.4),
            ],
            WeightBudget::Sum(0.8),
        );
        let points = [
            array![0.0, 0.0, 0.0],
            array![10.0, -10.0, 3.0],
            array![-5.0, 0.3, 0.2],
            array![0.25, 0.25, 0.3],
            array![1e6, 1e6, -1e6],
        ];

        for theta in points {
            // Act
            let p = set.project(&theta);

            // Assert
            assert!(set.contains(&p, 1e-12), "projection {p} of {theta} is infeasible");
        }
    }

    #[test]
    // Purpose
    // -------
    // Non-finite coordinates never leak into projected weights.
    //
    // Given
    // -----
    // - Unit simplex; θ = [+∞, 0], [NaN, 0.5], [−∞, +∞].
    //
    // Expect
    // ------
    // - [1, 0], [0.5, 0.5] and [0, 1] respectively, all feasible.
    fn non_finite_inputs_project_to_feasible_weights() {
        // Arrange
        let set = simplex(2);
        let cases = [
            (array![f64::INFINITY, 0.0], array![1.0, 0.0]),
            (array![f64::NAN, 0.5], array![0.5, 0.5]),
            (array![f64::NEG_INFINITY, f64::INFINITY], array![0.0, 1.0]),
        ];

        for (theta, expected) in cases {
            // Act
            let p = set.project(&theta);

            // Assert
            assert!(p.iter().all(|w| w.is_finite()), "{theta} -> {p}");
            assert!(set.contains(&p, 1e-12), "{theta} -> {p}");
            assert_close(&p, &expected);
        }
    }
}
