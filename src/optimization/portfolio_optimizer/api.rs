//! High-level entry points for optimizing portfolio weights.
//!
//! [`optimize`] parses a method name and runs with default options;
//! [`optimize_with`] takes full [`SolverOptions`]. Both wrap the caller's
//! portfolio function and objectives in a [`PortfolioProblem`], build the
//! requested solver, and delegate the run to [`run_solver`].
use std::cell::RefCell;

use crate::optimization::{
    errors::OptResult,
    feasibility::FeasibleSet,
    portfolio_optimizer::{
        adapter::{Incumbent, PortfolioProblem},
        builders::{
            build_lbfgs_hager_zhang, build_lbfgs_more_thuente, build_nelder_mead,
            build_projected_gradient,
        },
        run::run_solver,
        traits::{LineSearcher, OptimizationResult, PortfolioFunction, SolverMethod, SolverOptions},
        types::Grad,
    },
    problem::input::OptimizationInput,
};

/// Optimize portfolio weights with the named solver and default options.
///
/// # Parameters
/// - `portfolio_fn`: maps weights to the portfolio outcome distribution.
/// - `input`: validated objectives, start, boxes, and budget.
/// - `method`: solver name, parsed by [`SolverMethod`]'s `FromStr`
///   (e.g. `"SLSQP"`, `"LBFGS"`, `"NelderMead"`).
///
/// # Errors
/// - [`OptError::UnsupportedMethod`](crate::optimization::errors::OptError::UnsupportedMethod)
///   for an unknown method name.
/// - See [`optimize_with`].
///
/// # Example
/// ```
/// use ndarray::array;
/// use stochastic_portfolio::prelude::*;
///
/// let a = StochasticVariable::normal(0.08, 0.2, 2_000, Some(1)).unwrap();
/// let b = StochasticVariable::normal(0.06, 0.2, 2_000, Some(2)).unwrap();
/// let assets = [a, b];
/// let portfolio = |w: &Weights| StochasticVariable::weighted_sum(w.view(), &assets);
///
/// let input = OptimizationInput::new(
///     vec![ObjectiveSpec::maximize(MetricType::Mean).unwrap()],
///     2,
///     array![0.5, 0.5],
///     vec![BoxConstraint::unit(); 2],
/// )
/// .unwrap();
///
/// let result = optimize(&portfolio, &input, "SLSQP").unwrap();
/// assert!((result.optimal_weights.sum() - 1.0).abs() < 1e-9);
/// ```
pub fn optimize<P: PortfolioFunction>(
    portfolio_fn: &P, input: &OptimizationInput, method: &str,
) -> OptResult<OptimizationResult> {
    let method: SolverMethod = method.parse()?;
    optimize_with(portfolio_fn, input, &SolverOptions::with_method(method))
}

/// Optimize portfolio weights with explicit solver options.
///
/// # Behavior
/// - Projects the initial weights onto the feasible set and evaluates the
///   objectives there once, so evaluation failures surface before any
///   solver state exists.
/// - Builds the solver selected by `opts.method` and runs it through
///   [`run_solver`].
///
/// # Errors
/// - Any [`SolverOptions::validate`] error, since options with public fields
///   can bypass [`SolverOptions::new`] (e.g. `lbfgs_mem: Some(0)` or a
///   non-positive penalty).
/// - [`OptError::ObjectiveEvaluation`](crate::optimization::errors::OptError::ObjectiveEvaluation)
///   if the portfolio function or a metric fails at any evaluated point.
/// - [`OptError::NonFiniteCost`](crate::optimization::errors::OptError::NonFiniteCost)
///   if the aggregate objective is not finite.
/// - Builder errors for tolerances rejected by argmin.
///
/// Non-convergence is not an error; it is reported through
/// [`OptimizationResult::success`].
pub fn optimize_with<P: PortfolioFunction>(
    portfolio_fn: &P, input: &OptimizationInput, opts: &SolverOptions,
) -> OptResult<OptimizationResult> {
    opts.validate()?;
    let feasible = FeasibleSet::from_input(input);
    let start = feasible.project(input.initial_weights());
    let incumbent = RefCell::new(Incumbent::new());
    let problem = PortfolioProblem::new(
        portfolio_fn,
        input.objectives(),
        feasible.clone(),
        opts.penalty,
        &incumbent,
    );
    problem.penalized_cost(&start)?;

    match opts.method {
        SolverMethod::ProjectedGradient => {
            let solver = build_projected_gradient(feasible, opts)?;
            run_solver::<_, _, Grad>(start, opts, problem, solver)
        }
        SolverMethod::Lbfgs(LineSearcher::MoreThuente) => {
            let solver = build_lbfgs_more_thuente(opts)?;
            run_solver::<_, _, Grad>(start, opts, problem, solver)
        }
        SolverMethod::Lbfgs(LineSearcher::HagerZhang) => {
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_solver::<_, _, Grad>(start, opts, problem, solver)
        }
        SolverMethod::NelderMead => {
            let solver = build_nelder_mead(&problem, &start, opts)?;
            run_solver::<_, _, ()>(start, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metrics::metric_type::MetricType,
        optimization::{
            errors::{EvaluationError, OptError},
            portfolio_optimizer::types::Weights,
            problem::{
                input::{BoxConstraint, WeightBudget},
                objective::ObjectiveSpec,
            },
        },
        stochastic::{StochasticResult, StochasticVariable},
    };
    use crate::optimization::portfolio_optimizer::traits::Tolerances;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::cell::Cell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end runs on small deterministic sample sets with closed-form
    //   optima (linear and quadratic objectives).
    // - Budget handling: projection of an off-budget start and the
    //   unconstrained (box-only) mode.
    // - Error surfacing for unknown methods and failing portfolio functions.
    //
    // They intentionally DO NOT cover:
    // - Monte-Carlo scenarios and cross-method agreement (see
    //   tests/integration_portfolio_pipeline.rs).
    // -------------------------------------------------------------------------

    /// Zero-mean, orthogonal assets with variances 0.01 and 0.04.
    fn orthogonal_assets() -> [StochasticVariable; 2] {
        [
            StochasticVariable::from_samples(vec![0.1, -0.1, 0.1, -0.1]).unwrap(),
            StochasticVariable::from_samples(vec![0.2, 0.2, -0.2, -0.2]).unwrap(),
        ]
    }

    /// Assets with means 0.2 and 0.1.
    fn trending_assets() -> [StochasticVariable; 2] {
        [
            StochasticVariable::from_samples(vec![0.1, 0.3]).unwrap(),
            StochasticVariable::from_samples(vec![0.0, 0.2]).unwrap(),
        ]
    }

    #[test]
    // Purpose
    // -------
    // Minimum variance on the simplex matches the inverse-variance weights.
    //
    // Given
    // -----
    // - Var(w₀A + w₁B) = 0.01 w₀² + 0.04 w₁² (orthogonal, zero-mean assets).
    // - Start [0.5, 0.5], unit boxes, fully invested.
    //
    // Expect
    // ------
    // - `success = true`, weights ≈ [0.8, 0.2], variance ≈ 0.008.
    fn min_variance_matches_closed_form() {
        // Arrange
        let assets = orthogonal_assets();
        let f = |w: &Weights| StochasticVariable::weighted_sum(w.view(), &assets);
        let input = OptimizationInput::new(
            vec![ObjectiveSpec::minimize(MetricType::Variance).unwrap()],
            2,
            array![0.5, 0.5],
            vec![BoxConstraint::unit(); 2],
        )
        .unwrap();

        // Act
        let result = optimize(&f, &input, "ProjectedGradient").unwrap();

        // Assert
        assert!(result.success, "{}", result.message);
        assert_abs_diff_eq!(result.optimal_weights[0], 0.8, epsilon = 1e-4);
        assert_abs_diff_eq!(result.optimal_weights[1], 0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(result.objective_value, 0.008, epsilon = 1e-8);
        assert_abs_diff_eq!(result.metric_values[0], 0.008, epsilon = 1e-8);
        assert_eq!(result.method, "ProjectedGradient");
        assert!(result.fn_evals["portfolio_count"] > 0);
    }

    #[test]
    // Purpose
    // -------
    // A start off the budget is projected; a linear objective ends at the
    // best vertex.
    //
    // Given
    // -----
    // - Maximize mean with means 0.2 / 0.1, start [0.2, 0.2] (sum 0.4).
    //
    // Expect
    // ------
    // - Weights ≈ [1, 0], summing to one.
    fn off_budget_start_reaches_best_vertex() {
        // Arrange
        let assets = trending_assets();
        let f = |w: &Weights| StochasticVariable::weighted_sum(w.view(), &assets);
        let input = OptimizationInput::new(
            vec![ObjectiveSpec::maximize(MetricType::Mean).unwrap()],
            2,
            array![0.2, 0.2],
            vec![BoxConstraint::unit(); 2],
        )
        .unwrap();

        // Act
        let result = optimize(&f, &input, "slsqp").unwrap();

        // Assert
        assert!(result.success, "{}", result.message);
        assert_abs_diff_eq!(result.optimal_weights[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.optimal_weights[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.optimal_weights.sum(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.objective_value, -0.2, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Without a budget each weight moves to its own upper bound when every
    // asset has positive mean.
    //
    // Given
    // -----
    // - Maximize mean, boxes [0, 0.4]², `WeightBudget::Unconstrained`.
    //
    // Expect
    // ------
    // - Weights ≈ [0.4, 0.4].
    fn unconstrained_budget_fills_boxes() {
        // Arrange
        let assets = trending_assets();
        let f = |w: &Weights| StochasticVariable::weighted_sum(w.view(), &assets);
        let input = OptimizationInput::with_budget(
            vec![ObjectiveSpec::maximize(MetricType::Mean).unwrap()],
            2,
            array![0.2, 0.2],
            vec![BoxConstraint::new(0.0, 0.4); 2],
            WeightBudget::Unconstrained,
        )
        .unwrap();

        // Act
        let result = optimize(&f, &input, "pg").unwrap();

        // Assert
        assert!(result.success, "{}", result.message);
        assert_abs_diff_eq!(result.optimal_weights[0], 0.4, epsilon = 1e-9);
        assert_abs_diff_eq!(result.optimal_weights[1], 0.4, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Unknown methods and failing portfolio functions are hard errors.
    //
    // Given
    // -----
    // - A valid input; the method "simplex-annealing".
    // - A portfolio function that combines mismatched sample counts.
    //
    // Expect
    // ------
    // - `UnsupportedMethod` and `ObjectiveEvaluation { Portfolio(..) }`.
    fn unsupported_method_and_evaluation_errors() {
        // Arrange
        let assets = trending_assets();
        let short = StochasticVariable::from_samples(vec![0.1, 0.2, 0.3]).unwrap();
        let good = |w: &Weights| StochasticVariable::weighted_sum(w.view(), &assets);
        let bad = |w: &Weights| -> StochasticResult<StochasticVariable> {
            assets[0].scale(w[0]).try_add(&short)
        };
        let input = OptimizationInput::new(
            vec![ObjectiveSpec::maximize(MetricType::Mean).unwrap()],
            2,
            array![0.5, 0.5],
            vec![BoxConstraint::unit(); 2],
        )
        .unwrap();

        // Act
        let method_err = optimize(&good, &input, "simplex-annealing").unwrap_err();
        let eval_err = optimize(&bad, &input, "LBFGS").unwrap_err();

        // Assert
        assert!(matches!(method_err, OptError::UnsupportedMethod { .. }));
        assert!(
            matches!(
                eval_err,
                OptError::ObjectiveEvaluation { source: EvaluationError::Portfolio(_) }
            ),
            "unexpected error {eval_err:?}"
        );
    }

    #[test]
    // Purpose
    // -------
    // Options assembled through public fields are validated before any
    // evaluation, exactly as `SolverOptions::new` would.
    //
    // Given
    // -----
    // - `SolverOptions::default()` with one field overwritten at a time:
    //   negative penalty, zero L-BFGS memory, zero iteration cap, NaN
    //   gradient tolerance, all tolerances unset.
    //
    // Expect
    // ------
    // - The matching configuration error for each.
    // - The portfolio function is never called.
    fn options_set_through_fields_are_validated() {
        // Arrange
        let assets = trending_assets();
        let calls = Cell::new(0usize);
        let f = |w: &Weights| {
            calls.set(calls.get() + 1);
            StochasticVariable::weighted_sum(w.view(), &assets)
        };
        let input = OptimizationInput::new(
            vec![ObjectiveSpec::maximize(MetricType::Mean).unwrap()],
            2,
            array![0.5, 0.5],
            vec![BoxConstraint::unit(); 2],
        )
        .unwrap();
        let lbfgs = SolverOptions::with_method(SolverMethod::Lbfgs(LineSearcher::MoreThuente));
        let tols = Tolerances::default();
        let cases = [
            SolverOptions { penalty: -1.0, ..SolverOptions::default() },
            SolverOptions { lbfgs_mem: Some(0), ..lbfgs },
            SolverOptions { tols: Tolerances { max_iter: Some(0), ..tols }, ..lbfgs },
            SolverOptions { tols: Tolerances { tol_grad: Some(f64::NAN), ..tols }, ..lbfgs },
            SolverOptions {
                tols: Tolerances { tol_grad: None, tol_cost: None, max_iter: None },
                ..lbfgs
            },
        ];

        // Act
        let errors: Vec<OptError> = cases
            .iter()
            .map(|opts| match optimize_with(&f, &input, opts) {
                Err(e) => e,
                Ok(result) => panic!("accepted invalid options {opts:?}: {}", result.message),
            })
            .collect();

        // Assert
        assert!(matches!(errors[0], OptError::InvalidPenalty { .. }));
        assert!(matches!(errors[1], OptError::InvalidLBFGSMem { mem: 0, .. }));
        assert!(matches!(errors[2], OptError::InvalidMaxIter { max_iter: 0, .. }));
        assert!(matches!(errors[3], OptError::InvalidTolGrad { .. }));
        assert_eq!(errors[4], OptError::NoTolerancesProvided);
        assert_eq!(calls.get(), 0);
    }
}
