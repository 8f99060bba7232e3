//! Revenue optimization on top of a [`LinearProgramSolver`].

use furniplan_solver::{LinearProgramSolver, Solution, SolutionStatus, Solver};
use serde::Serialize;

use crate::catalog::{Catalog, ProductionPlan};
use crate::compiler::compile_revenue_problem;
use crate::{AdvisorError, Result};

/// Quantities this close below an integer are treated as that integer when flooring
const ROUNDING_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The solver gave up or rejected the problem
    Failed,
}

/// Outcome of one revenue LP solve.
///
/// Never cached: every call to [`Advisor::solve_max`] builds a fresh one from the current
/// catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LpResult {
    pub status: LpStatus,
    /// Continuous optimal quantities, one per product (empty unless optimal)
    pub quantities: Vec<f64>,
    /// Optimal revenue of the continuous solution
    pub objective: f64,
    /// Dual value per resource in the minimize-negated-revenue convention, so never
    /// positive for these `<=` constraints. Use [`LpResult::shadow_price`] for display.
    pub marginals: Vec<f64>,
    /// Unused availability per resource at the optimum
    pub slack: Vec<f64>,
    /// Solver diagnostic; explains the failure when not optimal
    pub message: String,
}

impl LpResult {
    fn from_solution(solution: Solution) -> Self {
        let status = match solution.status {
            SolutionStatus::Optimal => LpStatus::Optimal,
            SolutionStatus::Infeasible => LpStatus::Infeasible,
            SolutionStatus::Unbounded => LpStatus::Unbounded,
            SolutionStatus::Error => LpStatus::Failed,
        };
        let marginals = solution
            .analysis
            .shadow_prices
            .iter()
            .map(|sp| if sp.value == 0.0 { 0.0 } else { -sp.value })
            .collect();

        Self {
            status,
            quantities: solution.values,
            objective: solution.objective_value,
            marginals,
            slack: solution.analysis.slack,
            message: solution.message,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.status == LpStatus::Optimal
    }

    /// Extra revenue per additional unit of `resource`
    pub fn shadow_price(&self, resource: usize) -> f64 {
        self.marginals.get(resource).map(|m| m.abs()).unwrap_or(0.0)
    }

    pub fn shadow_prices(&self) -> Vec<f64> {
        self.marginals.iter().map(|m| m.abs()).collect()
    }
}

/// Per-resource view of the continuous optimum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSensitivity {
    pub resource: String,
    pub consumption: f64,
    pub slack: f64,
    pub shadow_price: f64,
    /// Fully consumed at the optimum
    pub binding: bool,
}

/// Shadow price and slack of every resource at the optimum of `result`.
/// Empty unless `result` is optimal.
pub fn sensitivity(catalog: &Catalog, result: &LpResult) -> Vec<ResourceSensitivity> {
    if !result.is_feasible() {
        return Vec::new();
    }

    let consumption = catalog.matrix().consumption_f64(&result.quantities);
    catalog
        .resources()
        .iter()
        .zip(consumption)
        .enumerate()
        .map(|(i, (resource, consumed))| {
            let available = resource.availability as f64;
            let slack = available - consumed;
            ResourceSensitivity {
                resource: resource.name.clone(),
                consumption: consumed,
                slack,
                shadow_price: result.shadow_price(i),
                binding: slack.abs() <= ROUNDING_TOLERANCE * available.max(1.0),
            }
        })
        .collect()
}

/// Round a continuous optimum down to whole items.
///
/// Every coordinate is floored. A coordinate within 1e-6 below an integer
/// is raised to that integer instead, but only when the plan still fits the availability, so
/// solver round-off such as 249.9999999 does not cost a unit. The result is within
/// availability whenever the plain floor is; it is a feasible rounding, not the integer
/// optimum. Returns `None` when `result` has no solution.
pub fn to_feasible_integer_plan(catalog: &Catalog, result: &LpResult) -> Option<ProductionPlan> {
    if !result.is_feasible() {
        return None;
    }

    let mut quantities: Vec<u32> = result.quantities.iter().map(|&x| whole_units(x)).collect();
    for (j, &x) in result.quantities.iter().enumerate() {
        let snapped = whole_units(x + ROUNDING_TOLERANCE);
        if snapped == quantities[j] {
            continue;
        }
        let floored = std::mem::replace(&mut quantities[j], snapped);
        if !fits(catalog, &quantities) {
            quantities[j] = floored;
        }
    }
    Some(ProductionPlan::new(quantities))
}

fn whole_units(x: f64) -> u32 {
    x.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn fits(catalog: &Catalog, quantities: &[u32]) -> bool {
    catalog
        .matrix()
        .consumption(quantities)
        .iter()
        .zip(catalog.resources())
        .all(|(&consumed, resource)| consumed <= resource.availability)
}

/// Solves the revenue LP for a catalog
#[derive(Debug, Clone, Default)]
pub struct Advisor<S = Solver> {
    solver: S,
}

impl Advisor {
    pub fn new() -> Self {
        Self { solver: Solver::new() }
    }
}

impl<S: LinearProgramSolver> Advisor<S> {
    /// Use a different LP implementation
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Maximize revenue within availability, producing at least `minimum` of every product
    pub fn solve_max(&self, catalog: &Catalog, minimum: u32) -> LpResult {
        let problem = compile_revenue_problem(catalog, minimum);
        tracing::debug!(
            minimum,
            products = problem.num_variables(),
            resources = problem.num_constraints(),
            "solving revenue LP"
        );

        let result = LpResult::from_solution(self.solver.solve(&problem));
        if result.is_feasible() {
            tracing::debug!(objective = result.objective, "revenue LP solved");
        } else {
            tracing::info!(minimum, status = ?result.status, message = %result.message, "revenue LP has no solution");
        }
        result
    }

    /// Floored optimum for `minimum`, or the solver's reason when there is none
    pub fn integer_plan(&self, catalog: &Catalog, minimum: u32) -> Result<ProductionPlan> {
        let result = self.solve_max(catalog, minimum);
        to_feasible_integer_plan(catalog, &result).ok_or(AdvisorError::Infeasible(result.message))
    }
}
