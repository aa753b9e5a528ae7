//! Public API surface for portfolio optimization.
//!
//! - [`PortfolioFunction`]: what callers implement (or pass as a closure) to
//!   turn weights into a portfolio outcome.
//! - [`SolverMethod`] and [`LineSearcher`]: solver selection, parsed from
//!   strings.
//! - [`SolverOptions`] and [`Tolerances`]: validated run configuration.
//! - [`OptimizationResult`]: normalized result returned by `optimize`.
//!
//! Convention: every solver *minimizes* the aggregate objective cost
//! `Σ weightᵢ · costᵢ`; maximized metrics enter it with a negative sign.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        portfolio_optimizer::{
            types::{DEFAULT_LBFGS_MEM, DEFAULT_PENALTY, FnEvalMap, Weights},
            validation::{
                verify_lbfgs_mem, verify_max_iter, verify_penalty, verify_tol_cost,
                verify_tol_grad,
            },
        },
    },
    stochastic::{StochasticResult, StochasticVariable},
};
use std::str::FromStr;

/// Caller-supplied portfolio construction.
///
/// Maps a feasible weight vector to the combined outcome distribution of the
/// portfolio. Implementations must be deterministic: the optimizer assumes
/// that repeated calls with equal weights return equal samples.
///
/// Any `Fn(&Weights) -> StochasticResult<StochasticVariable>` closure
/// implements this trait.
pub trait PortfolioFunction {
    fn portfolio(&self, weights: &Weights) -> StochasticResult<StochasticVariable>;
}

impl<F> PortfolioFunction for F
where
    F: Fn(&Weights) -> StochasticResult<StochasticVariable>,
{
    fn portfolio(&self, weights: &Weights) -> StochasticResult<StochasticVariable> {
        self(weights)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::UnsupportedMethod {
                name: s.to_string(),
                reason: "Valid line searches are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Numerical method used to search the feasible weight set.
///
/// Variants:
/// - `ProjectedGradient`: projected-gradient descent with Armijo backtracking
///   along the projection arc. Handles box and budget constraints directly
///   and is the default.
/// - `Lbfgs`: argmin L-BFGS on the penalized projected cost.
/// - `NelderMead`: argmin derivative-free simplex on the same cost.
///
/// Parsing:
/// Case-insensitive. Accepts `"ProjectedGradient"`, `"projected-gradient"`,
/// `"pg"`, `"SLSQP"` (mapped to the projected-gradient method),
/// `"LBFGS"`, `"LBFGS-MoreThuente"`, `"LBFGS-HagerZhang"`, `"NelderMead"` and
/// `"Nelder-Mead"`. Anything else returns [`OptError::UnsupportedMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverMethod {
    #[default]
    ProjectedGradient,
    Lbfgs(LineSearcher),
    NelderMead,
}

impl SolverMethod {
    /// Stable display name reported in [`OptimizationResult::method`].
    pub fn name(&self) -> &'static str {
        match self {
            SolverMethod::ProjectedGradient => "ProjectedGradient",
            SolverMethod::Lbfgs(LineSearcher::MoreThuente) => "LBFGS-MoreThuente",
            SolverMethod::Lbfgs(LineSearcher::HagerZhang) => "LBFGS-HagerZhang",
            SolverMethod::NelderMead => "NelderMead",
        }
    }
}

impl std::fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverMethod {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "projectedgradient" | "projected-gradient" | "pg" | "slsqp" => {
                Ok(SolverMethod::ProjectedGradient)
            }
            "lbfgs" => Ok(SolverMethod::Lbfgs(LineSearcher::default())),
            "neldermead" | "nelder-mead" => Ok(SolverMethod::NelderMead),
            other => match other.strip_prefix("lbfgs-") {
                Some(line_search) => line_search.parse().map(SolverMethod::Lbfgs).map_err(|_| {
                    unsupported_method(s)
                }),
                None => Err(unsupported_method(s)),
            },
        }
    }
}

fn unsupported_method(name: &str) -> OptError {
    OptError::UnsupportedMethod {
        name: name.to_string(),
        reason: "Valid options are case insensitive 'ProjectedGradient' (alias 'SLSQP'), \
                 'LBFGS', 'LBFGS-MoreThuente', 'LBFGS-HagerZhang' or 'NelderMead'.",
    }
}

/// Numerical tolerances and iteration limits.
///
/// - `tol_grad`: projected-gradient / gradient-norm threshold. For
///   Nelder–Mead it is the standard deviation of the simplex costs.
/// - `tol_cost`: threshold on the change in cost between iterations.
/// - `max_iter`: hard cap on the number of iterations.
///
/// At least one of the three must be provided (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        let tols = Self { tol_grad, tol_cost, max_iter };
        tols.validate()?;
        Ok(tols)
    }

    /// Re-check tolerances that may have been assembled field by field.
    ///
    /// # Errors
    /// Same as [`Tolerances::new`].
    pub fn validate(&self) -> OptResult<()> {
        if self.tol_grad.is_none() && self.tol_cost.is_none() && self.max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(self.tol_cost)?;
        verify_tol_grad(self.tol_grad)?;
        verify_max_iter(self.max_iter)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-7), tol_cost: None, max_iter: Some(500) }
    }
}

/// Optimizer-level configuration.
///
/// Default:
/// - `tols`: `tol_grad = 1e-7`, `tol_cost = None`, `max_iter = 500`
/// - `method`: `ProjectedGradient`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (uses [`DEFAULT_LBFGS_MEM`])
/// - `penalty`: [`DEFAULT_PENALTY`]
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub method: SolverMethod,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
    pub penalty: f64,
}

impl SolverOptions {
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    /// - [`OptError::InvalidPenalty`] unless `penalty` is finite and `> 0`.
    pub fn new(
        tols: Tolerances, method: SolverMethod, verbose: bool, lbfgs_mem: Option<usize>,
        penalty: f64,
    ) -> OptResult<Self> {
        let opts = Self { tols, method, verbose, lbfgs_mem, penalty };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-check every option, including ones set through public fields or
    /// struct-update syntax after construction.
    ///
    /// # Errors
    /// [`Tolerances::validate`] errors, then the errors of [`SolverOptions::new`].
    pub fn validate(&self) -> OptResult<()> {
        self.tols.validate()?;
        verify_lbfgs_mem(self.lbfgs_mem)?;
        verify_penalty(self.penalty)
    }

    /// Default options with a different solver method.
    pub fn with_method(method: SolverMethod) -> Self {
        Self { method, ..Self::default() }
    }

    pub(crate) fn lbfgs_mem_or_default(&self) -> usize {
        self.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM)
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            method: SolverMethod::default(),
            verbose: false,
            lbfgs_mem: None,
            penalty: DEFAULT_PENALTY,
        }
    }
}

/// Canonical result returned by `optimize`.
///
/// - `success`: `true` only if the solver reported convergence (or reached a
///   target cost).
/// - `message`: human-readable termination status or failure diagnostic.
/// - `optimal_weights`: best feasible weights found; always inside the boxes
///   and on the budget.
/// - `objective_value`: aggregate objective cost at `optimal_weights`.
/// - `metric_values`: one metric value per objective, in input order.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: argmin counters (`cost_count`, `gradient_count`) plus
///   `portfolio_count`, the number of portfolio function calls.
/// - `method`: name of the solver that produced the result.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub success: bool,
    pub message: String,
    pub optimal_weights: Weights,
    pub objective_value: f64,
    pub metric_values: Vec<f64>,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub method: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Method and line-search parsing, including aliases and errors.
    // - Tolerance and option validation plus defaults.
    // - The closure blanket impl of `PortfolioFunction`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Method names parse case-insensitively with their aliases.
    fn solver_method_parses_aliases() {
        let cases = [
            ("SLSQP", SolverMethod::ProjectedGradient),
            ("projected-gradient", SolverMethod::ProjectedGradient),
            ("PG", SolverMethod::ProjectedGradient),
            ("lbfgs", SolverMethod::Lbfgs(LineSearcher::MoreThuente)),
            ("LBFGS-HagerZhang", SolverMethod::Lbfgs(LineSearcher::HagerZhang)),
            ("lbfgs-morethuente", SolverMethod::Lbfgs(LineSearcher::MoreThuente)),
            ("Nelder-Mead", SolverMethod::NelderMead),
        ];
        for (name, expected) in cases {
            assert_eq!(name.parse::<SolverMethod>().unwrap(), expected, "parsing {name}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Unknown names fail with `UnsupportedMethod` carrying the original text.
    fn solver_method_rejects_unknown_names() {
        for name in ["newton", "lbfgs-backtracking", ""] {
            let err = name.parse::<SolverMethod>().unwrap_err();
            assert!(
                matches!(&err, OptError::UnsupportedMethod { name: n, .. } if n == name),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Display names round-trip through the parser.
    fn solver_method_names_parse_back() {
        for method in [
            SolverMethod::ProjectedGradient,
            SolverMethod::Lbfgs(LineSearcher::HagerZhang),
            SolverMethod::Lbfgs(LineSearcher::MoreThuente),
            SolverMethod::NelderMead,
        ] {
            assert_eq!(method.to_string().parse::<SolverMethod>().unwrap(), method);
        }
    }

    #[test]
    // Purpose
    // -------
    // Option constructors enforce their rules; defaults are valid.
    fn options_validation_and_defaults() {
        assert_eq!(Tolerances::new(None, None, None).unwrap_err(), OptError::NoTolerancesProvided);
        assert!(matches!(
            Tolerances::new(None, None, Some(0)).unwrap_err(),
            OptError::InvalidMaxIter { .. }
        ));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None).unwrap_err(),
            OptError::InvalidTolGrad { .. }
        ));
        let tols = Tolerances::default();
        assert!(matches!(
            SolverOptions::new(tols, SolverMethod::default(), false, Some(0), 1.0).unwrap_err(),
            OptError::InvalidLBFGSMem { .. }
        ));
        assert!(matches!(
            SolverOptions::new(tols, SolverMethod::default(), false, None, 0.0).unwrap_err(),
            OptError::InvalidPenalty { .. }
        ));

        let defaults = SolverOptions::default();
        assert_eq!(defaults.method, SolverMethod::ProjectedGradient);
        assert_eq!(defaults.tols.max_iter, Some(500));
        assert_eq!(defaults.lbfgs_mem_or_default(), DEFAULT_LBFGS_MEM);
        assert_eq!(
            SolverOptions::with_method(SolverMethod::NelderMead).method,
            SolverMethod::NelderMead
        );
    }

    #[test]
    // Purpose
    // -------
    // Plain closures act as portfolio functions.
    fn closures_implement_portfolio_function() {
        // Arrange
        let asset = StochasticVariable::from_samples(vec![1.0, 2.0, 3.0]).unwrap();
        let f = |w: &Weights| -> StochasticResult<StochasticVariable> { Ok(asset.scale(w[0])) };

        // Act
        let portfolio = f.portfolio(&array![2.0]).unwrap();

        // Assert
        assert_eq!(portfolio.to_vec(), vec![2.0, 4.0, 6.0]);
    }
}
