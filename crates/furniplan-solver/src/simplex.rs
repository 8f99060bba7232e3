use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{Analysis, ConstraintViolation, ReducedCost, ShadowPrice, Solution, SolutionStatus};
use crate::LinearProgramSolver;

/// Relative tolerance used to decide that a constraint is tight
const BINDING_TOLERANCE: f64 = 1e-6;

/// Dense two-phase simplex
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Values closer than this to zero count as zero
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl LinearProgramSolver for Solver {
    fn solve(&self, problem: &LpProblem) -> Solution {
        Solver::solve(self, problem)
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Find an optimum, or explain why there is none
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        let mut tableau = match self.build_tableau(problem) {
            Ok(t) => t,
            Err(message) => {
                tracing::debug!(%message, "rejected malformed problem");
                return Solution::error(message);
            }
        };

        // Only >= rows carry artificials, so an all-<= problem starts feasible
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau) {
                SimplexResult::Optimal => {}
                SimplexResult::IterationLimit => return self.iteration_limit(1),
                SimplexResult::Unbounded | SimplexResult::Infeasible => {
                    return self.diagnose_infeasibility(problem);
                }
            }
        }

        // Phase 2: Optimize
        match self.phase2(&mut tableau) {
            SimplexResult::Optimal => {}
            SimplexResult::Unbounded => {
                tracing::debug!("objective is unbounded");
                return Solution::unbounded();
            }
            SimplexResult::Infeasible => return self.diagnose_infeasibility(problem),
            SimplexResult::IterationLimit => return self.iteration_limit(2),
        }

        let solution = self.extract_solution(&tableau, problem);
        tracing::debug!(
            objective = solution.objective_value,
            binding = solution.analysis.binding_constraints.len(),
            "optimal solution found"
        );
        solution
    }

    fn iteration_limit(&self, phase: u8) -> Solution {
        tracing::warn!(phase, max_iterations = self.max_iterations, "simplex iteration limit reached");
        Solution::error(format!(
            "Iteration limit of {} reached in phase {}",
            self.max_iterations, phase
        ))
    }

    fn validate(&self, problem: &LpProblem) -> Result<(), String> {
        let n_vars = problem.num_variables();
        if problem.objective.coefficients.len() != n_vars {
            return Err(format!(
                "Objective has {} coefficients for {} variables",
                problem.objective.coefficients.len(),
                n_vars
            ));
        }
        if problem.lower_bounds.len() != n_vars {
            return Err(format!(
                "Got {} lower bounds for {} variables",
                problem.lower_bounds.len(),
                n_vars
            ));
        }
        for c in &problem.constraints {
            if c.coefficients.len() != n_vars {
                return Err(format!(
                    "Constraint {} has {} coefficients for {} variables",
                    c.name,
                    c.coefficients.len(),
                    n_vars
                ));
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|x| !x.is_finite()) {
                return Err(format!("Constraint {} has a non-finite coefficient", c.name));
            }
        }
        if problem.objective.coefficients.iter().any(|x| !x.is_finite())
            || problem.lower_bounds.iter().any(|x| !x.is_finite())
        {
            return Err("Objective or bounds contain a non-finite value".to_string());
        }
        Ok(())
    }

    /// Find which constraints are violated by a given point
    fn find_violations(&self, problem: &LpProblem, values: &[f64]) -> Vec<ConstraintViolation> {
        let mut violations = Vec::new();

        for c in &problem.constraints {
            let lhs = c.lhs(values);

            let violation = match c.op {
                ConstraintOp::Le if lhs > c.rhs + self.tolerance => {
                    let amt = lhs - c.rhs;
                    Some((amt, format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, amt)))
                }
                ConstraintOp::Ge if lhs < c.rhs - self.tolerance => {
                    let amt = c.rhs - lhs;
                    Some((amt, format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, amt)))
                }
                _ => None,
            };

            if let Some((amount, description)) = violation {
                violations.push(ConstraintViolation {
                    constraint: c.name.clone(),
                    limit: c.rhs,
                    lhs,
                    amount,
                    description,
                });
            }
        }

        // Worst first
        violations.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        violations
    }

    /// Explain an infeasible problem by checking the constraints at the lower-bound corner.
    /// With non-negative coefficients that corner is the cheapest point of the bounded region,
    /// so anything it violates cannot be satisfied at all.
    fn diagnose_infeasibility(&self, problem: &LpProblem) -> Solution {
        let violations = self.find_violations(problem, &problem.lower_bounds);

        let message = if violations.is_empty() {
            "No point satisfies every constraint within the variable bounds".to_string()
        } else {
            let details: Vec<&str> = violations.iter().map(|v| v.description.as_str()).collect();
            format!(
                "No point satisfies every constraint within the variable bounds: {}",
                details.join("; ")
            )
        };

        tracing::debug!(violations = violations.len(), "problem is infeasible");
        Solution::infeasible_with_violations(violations, message)
    }

    fn build_tableau(&self, problem: &LpProblem) -> Result<Tableau, String> {
        self.validate(problem)?;

        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Substitute x = lb + y so every column starts at zero, then make each RHS non-negative
        let rows: Vec<RowForm> = problem
            .constraints
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let rhs = c.rhs - c.lhs(&problem.lower_bounds);
                let negated = rhs < 0.0;
                RowForm {
                    negated,
                    op: if negated { c.op.flipped() } else { c.op },
                    rhs: rhs.abs(),
                    slack_col: n_vars + i,
                }
            })
            .collect();

        // One slack/surplus per row, one artificial per >= row
        let n_slack = n_constraints;
        let n_artificial = rows.iter().filter(|r| r.op == ConstraintOp::Ge).count();

        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective

        let mut data = vec![vec![0.0; total_cols]; total_rows];
        let mut basic_vars = vec![0; n_constraints];
        let mut artificial_idx = n_vars + n_slack;

        for (i, (c, form)) in problem.constraints.iter().zip(&rows).enumerate() {
            let sign = if form.negated { -1.0 } else { 1.0 };
            for (j, &coef) in c.coefficients.iter().enumerate() {
                data[i][j] = sign * coef;
            }
            data[i][total_cols - 1] = form.rhs;

            match form.op {
                ConstraintOp::Le => {
                    data[i][form.slack_col] = 1.0;
                    basic_vars[i] = form.slack_col;
                }
                ConstraintOp::Ge => {
                    data[i][form.slack_col] = -1.0; // surplus
                    data[i][artificial_idx] = 1.0;
                    basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        // Objective row (last row): simplex maximizes, so minimization negates the coefficients
        let obj_row = n_constraints;
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            data[obj_row][j] = if problem.objective.minimize { -coef } else { coef };
        }

        Ok(Tableau {
            data,
            basic_vars,
            n_vars,
            n_slack,
            n_artificial,
            rows,
        })
    }

    fn phase1(&self, tableau: &mut Tableau) -> SimplexResult {
        // Auxiliary objective: maximize -sum(artificials)
        let n_constraints = tableau.data.len() - 1;
        let n_cols = tableau.data[0].len();
        let art_start = tableau.art_start();

        let orig_obj = std::mem::replace(&mut tableau.data[n_constraints], vec![0.0; n_cols]);
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_constraints][j] = -1.0;
        }

        // Price out the basic artificials
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] += tableau.data[i][j];
                }
            }
        }

        match self.iterate(tableau, n_cols - 1) {
            SimplexResult::Optimal => {}
            // Unbounded in phase 1 means infeasible original
            SimplexResult::Unbounded | SimplexResult::Infeasible => return SimplexResult::Infeasible,
            SimplexResult::IterationLimit => return SimplexResult::IterationLimit,
        }

        let rhs_col = n_cols - 1;
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > self.tolerance {
                return SimplexResult::Infeasible;
            }
        }

        self.drive_out_artificials(tableau);

        // Restore original objective and price out the basis
        tableau.data[n_constraints] = orig_obj;
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[n_constraints][basic];
            if ratio.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        tracing::trace!("phase 1 found a feasible basis");
        SimplexResult::Optimal
    }

    /// Pivot zero-valued artificials out of the basis so phase 2 cannot raise them again.
    /// Rows with no usable column are redundant and keep their artificial at zero.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let art_start = tableau.art_start();
        for row in 0..tableau.basic_vars.len() {
            if tableau.basic_vars[row] < art_start {
                continue;
            }
            let col = (0..art_start).find(|&j| tableau.data[row][j].abs() > self.tolerance);
            if let Some(col) = col {
                self.pivot(tableau, row, col);
            }
        }
    }

    fn phase2(&self, tableau: &mut Tableau) -> SimplexResult {
        // Artificial columns never re-enter
        let exclude_from = tableau.art_start();
        self.iterate(tableau, exclude_from)
    }

    /// Pivot until no column below `n_cols` can improve the objective
    fn iterate(&self, tableau: &mut Tableau, n_cols: usize) -> SimplexResult {
        let rhs_col = tableau.data[0].len() - 1;
        let mut iterations = 0;
        let mut degenerate_streak = 0;

        loop {
            // Bland's rule once progress stalls, to rule out cycling
            let bland = degenerate_streak > n_cols;
            let Some(pivot_col) = self.find_pivot_column(tableau, n_cols, bland) else {
                return SimplexResult::Optimal;
            };
            if iterations == self.max_iterations {
                return SimplexResult::IterationLimit;
            }
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col, bland) else {
                return SimplexResult::Unbounded;
            };

            if tableau.data[pivot_row][rhs_col].abs() <= self.tolerance {
                degenerate_streak += 1;
            } else {
                degenerate_streak = 0;
            }

            tracing::trace!(iteration = iterations, row = pivot_row, col = pivot_col, "pivot");
            self.pivot(tableau, pivot_row, pivot_col);
            iterations += 1;
        }
    }

    fn find_pivot_column(&self, tableau: &Tableau, n_cols: usize, bland: bool) -> Option<usize> {
        let obj_row = tableau.data.len() - 1;
        let reduced = &tableau.data[obj_row][..n_cols];

        if bland {
            return reduced.iter().position(|&v| v > self.tolerance);
        }

        // Most positive reduced cost (can improve objective)
        let mut max_val = self.tolerance;
        let mut max_col = None;

        for (j, &value) in reduced.iter().enumerate() {
            if value > max_val {
                max_val = value;
                max_col = Some(j);
            }
        }

        max_col
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize, bland: bool) -> Option<usize> {
        let n_constraints = tableau.data.len() - 1;
        let rhs_col = tableau.data[0].len() - 1;

        let mut min_ratio = f64::INFINITY;
        let mut min_row: Option<usize> = None;

        for i in 0..n_constraints {
            let val = tableau.data[i][col];
            if val > self.tolerance {
                let ratio = tableau.data[i][rhs_col] / val;
                let better = match min_row {
                    None => true,
                    Some(_) if ratio < min_ratio - self.tolerance => true,
                    Some(current) if bland && ratio <= min_ratio + self.tolerance => {
                        tableau.basic_vars[i] < tableau.basic_vars[current]
                    }
                    Some(_) => false,
                };
                if better {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_rows = tableau.data.len();
        let n_cols = tableau.data[0].len();

        tableau.basic_vars[row] = col;

        let pivot_val = tableau.data[row][col];
        for j in 0..n_cols {
            tableau.data[row][j] /= pivot_val;
        }

        let pivot_row = tableau.data[row].clone();
        for i in 0..n_rows {
            if i != row {
                let factor = tableau.data[i][col];
                if factor != 0.0 {
                    for j in 0..n_cols {
                        tableau.data[i][j] -= factor * pivot_row[j];
                    }
                }
            }
        }
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem) -> Solution {
        let n_vars = problem.num_variables();
        let rhs_col = tableau.data[0].len() - 1;

        // Basic shifted values, then undo the lower-bound substitution
        let mut values = problem.lower_bounds.clone();
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < n_vars {
                values[basic] += tableau.data[i][rhs_col];
            }
        }

        let objective_value = problem.objective_at(&values);
        let analysis = self.analyze(tableau, problem, &values);

        Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            analysis,
            violations: Vec::new(),
            message: "Optimization terminated successfully".to_string(),
        }
    }

    fn analyze(&self, tableau: &Tableau, problem: &LpProblem, values: &[f64]) -> Analysis {
        let obj_row = problem.num_constraints();

        let mut shadow_prices = Vec::new();
        for (constraint, form) in problem.constraints.iter().zip(&tableau.rows) {
            let reduced = tableau.data[obj_row][form.slack_col];
            // Dual of the stored row in the internal maximization
            let stored = match form.op {
                ConstraintOp::Le => -reduced,
                ConstraintOp::Ge => reduced,
            };
            let oriented = if form.negated { -stored } else { stored };
            let value = if problem.objective.minimize { -oriented } else { oriented };
            let value = if value.abs() < self.tolerance { 0.0 } else { value };

            shadow_prices.push(ShadowPrice {
                constraint: constraint.name.clone(),
                value,
            });
        }

        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, var_name)| {
                let basic = tableau.basic_vars.contains(&j);
                ReducedCost {
                    variable: var_name.clone(),
                    value: values[j],
                    cost: if basic { 0.0 } else { tableau.data[obj_row][j] },
                    basic,
                }
            })
            .collect();

        let slack: Vec<f64> = problem.constraints.iter().map(|c| c.slack(values)).collect();

        let binding_constraints = problem
            .constraints
            .iter()
            .zip(&slack)
            .filter(|(c, s)| s.abs() <= BINDING_TOLERANCE * c.rhs.abs().max(1.0))
            .map(|(c, _)| c.name.clone())
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            slack,
            binding_constraints,
        }
    }
}

/// How a constraint was laid into the tableau
struct RowForm {
    /// Row was multiplied by -1 to make its RHS non-negative
    negated: bool,
    /// Operator after negation
    op: ConstraintOp,
    rhs: f64,
    slack_col: usize,
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    rows: Vec<RowForm>,
}

impl Tableau {
    fn art_start(&self) -> usize {
        self.n_vars + self.n_slack
    }
}

enum SimplexResult {
    Optimal,
    Unbounded,
    Infeasible,
    IterationLimit,
}
