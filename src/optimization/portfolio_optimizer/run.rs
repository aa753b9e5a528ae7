//! Execution helper that runs an `argmin` solver on a portfolio problem and
//! returns a crate-friendly [`OptimizationResult`].
use crate::optimization::{
    errors::{OptError, OptResult},
    portfolio_optimizer::{
        adapter::PortfolioProblem,
        traits::{OptimizationResult, PortfolioFunction, SolverOptions},
        types::{Cost, FnEvalMap, Weights},
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::Gradient;
use argmin::core::{Executor, IterState, Solver, State, TerminationReason, TerminationStatus};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` solver on a portfolio problem.
///
/// This is the shared runner for every [`SolverMethod`](super::traits::SolverMethod).
/// It wires up:
/// - the problem via [`PortfolioProblem`],
/// - the chosen `Solver` (projected gradient, L-BFGS, or Nelder–Mead),
/// - the starting iterate `start`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///
/// then executes the solver and normalizes the outcome.
///
/// # Type Parameters
/// - `P`: the caller's [`PortfolioFunction`].
/// - `S`: any argmin solver over `PortfolioProblem<'a, P>` whose state holds
///   [`Weights`] and [`Cost`]; `G` is its gradient slot (`Grad` or `()`).
///
/// # Outcome mapping
/// - `success` is `true` only for `SolverConverged` / `TargetCostReached`;
///   the reported weights are then `P_F(θ̂)` for the solver's best iterate.
/// - Any other termination (iteration cap, solver exit) keeps
///   `success = false` and reports the best feasible weights evaluated.
/// - argmin failures that are not evaluation errors (line-search
///   breakdowns, numerical gradient failures) are also reported as
///   `success = false` with the failure in `message`.
///
/// # Errors
/// - [`OptError::ObjectiveEvaluation`] / [`OptError::NonFiniteCost`] raised
///   while evaluating the portfolio, at any point of the run. Failures that
///   argmin's line searches turn into a solver exit are recovered from the
///   shared incumbent and returned as errors too.
pub fn run_solver<'a, P, S, G>(
    start: Weights, opts: &SolverOptions, problem: PortfolioProblem<'a, P>, solver: S,
) -> OptResult<OptimizationResult>
where
    P: PortfolioFunction,
    S: Solver<PortfolioProblem<'a, P>, IterState<Weights, G, (), (), (), Cost>> + Send + 'static,
{
    let evaluator = problem.clone();
    let fallback = evaluator.feasible_set().project(&start);

    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&start, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(start));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let outcome = optimizer.run();
    if let Some(err) = evaluator.incumbent().failure().cloned() {
        return Err(err);
    }
    let (weights, success, message, iterations, mut fn_evals) = match outcome {
        Ok(result) => {
            let mut state = result.state;
            let termination = state.get_termination_status().clone();
            let success = is_converged(&termination);
            let iterations = state.get_iter() as usize;
            let fn_evals = state.get_func_counts().clone();
            let best = state.take_best_param().or_else(|| state.take_param());
            let projected_best = best.map(|theta| evaluator.feasible_set().project(&theta));
            let weights = if success {
                projected_best.unwrap_or(fallback)
            } else {
                evaluator.incumbent().best_weights().cloned().or(projected_best).unwrap_or(fallback)
            };
            (weights, success, termination.to_string(), iterations, fn_evals)
        }
        Err(err) => {
            let err = OptError::from(err);
            if !err.is_solver_failure() {
                return Err(err);
            }
            let weights = evaluator.incumbent().best_weights().cloned().unwrap_or(fallback);
            (weights, false, format!("Solver failed: {err}"), 0, FnEvalMap::new())
        }
    };
    fn_evals.insert("portfolio_count".to_string(), evaluator.incumbent().evaluations());

    let evaluation = evaluator.evaluate(&weights)?;
    Ok(OptimizationResult {
        success,
        message,
        optimal_weights: weights,
        objective_value: evaluation.objective,
        metric_values: evaluation.metric_values,
        iterations,
        fn_evals,
        method: opts.method.name(),
    })
}

// ---- Helper Methods ----

fn is_converged(status: &TerminationStatus) -> bool {
    matches!(
        status,
        TerminationStatus::Terminated(
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached
        )
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<P: PortfolioFunction>(
    start: &Weights, problem: &PortfolioProblem<'_, P>,
) -> OptResult<()> {
    let c0 = problem.penalized_cost(start)?;
    let g0n = problem.gradient(start).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: cost(w0) = {:.6}{}",
        c0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
