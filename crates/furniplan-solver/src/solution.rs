/// Outcome of [`crate::Solver::solve`].
///
/// `values` and `analysis` are only filled in when `status` is [`SolutionStatus::Optimal`];
/// otherwise `objective_value` is NaN and `message` says what went wrong.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    /// One value per variable, lower bounds included
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub analysis: Analysis,
    /// Constraints broken at the lower-bound point, worst first
    pub violations: Vec<ConstraintViolation>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    /// No point satisfies the constraints and bounds
    Infeasible,
    Unbounded,
    /// Iteration limit reached or malformed problem
    Error,
}

/// Sensitivity of the optimum, one entry per constraint or variable in problem order
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub shadow_prices: Vec<ShadowPrice>,
    pub reduced_costs: Vec<ReducedCost>,
    /// `rhs - lhs` for `<=` rows, `lhs - rhs` for `>=` rows
    pub slack: Vec<f64>,
    /// Names of the constraints with (near) zero slack
    pub binding_constraints: Vec<String>,
}

/// Change of the optimal objective per unit increase of a constraint's right-hand side
#[derive(Debug, Clone)]
pub struct ShadowPrice {
    pub constraint: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct ReducedCost {
    pub variable: String,
    pub value: f64,
    /// Zero for basic variables
    pub cost: f64,
    pub basic: bool,
}

/// A constraint that cannot hold at the evaluated point
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub constraint: String,
    /// Right-hand side of the constraint
    pub limit: f64,
    /// Left-hand side at the evaluated point
    pub lhs: f64,
    /// Distance past the limit, always positive
    pub amount: f64,
    pub description: String,
}

impl Solution {
    fn without_optimum(status: SolutionStatus, violations: Vec<ConstraintViolation>, message: String) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: f64::NAN,
            analysis: Analysis::default(),
            violations,
            message,
        }
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::infeasible_with_violations(Vec::new(), message)
    }

    pub fn infeasible_with_violations(violations: Vec<ConstraintViolation>, message: impl Into<String>) -> Self {
        Self::without_optimum(SolutionStatus::Infeasible, violations, message.into())
    }

    pub fn unbounded() -> Self {
        Self::without_optimum(
            SolutionStatus::Unbounded,
            Vec::new(),
            "Objective can grow without limit".to_string(),
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::without_optimum(SolutionStatus::Error, Vec::new(), message.into())
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Shadow price of the constraint at `index`, zero when not available
    pub fn shadow_price(&self, index: usize) -> f64 {
        self.analysis
            .shadow_prices
            .get(index)
            .map(|sp| sp.value)
            .unwrap_or(0.0)
    }
}
