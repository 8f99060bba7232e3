//! Property-based tests for the simplex on random packing problems
//!
//! maximize c·x subject to A·x <= b, x >= lb with A >= 0 and no all-zero column.

use furniplan_solver::*;
use proptest::prelude::*;

const EPS: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Packing {
    prices: Vec<f64>,
    rows: Vec<Vec<f64>>,
    caps: Vec<f64>,
}

impl Packing {
    fn problem(&self, lower_bound: f64) -> LpProblem {
        let variables = (0..self.prices.len()).map(|j| format!("x{}", j)).collect();
        let mut problem = LpProblem::new(variables);
        problem.set_objective(self.prices.clone(), false);
        for (i, (row, &cap)) in self.rows.iter().zip(&self.caps).enumerate() {
            problem.add_constraint(format!("c{}", i), row.clone(), ConstraintOp::Le, cap);
        }
        problem.set_uniform_lower_bound(lower_bound);
        problem
    }
}

fn packing_strategy() -> impl Strategy<Value = Packing> {
    (1usize..=5, 1usize..=4).prop_flat_map(|(vars, rows)| {
        (
            prop::collection::vec(0u32..=50, vars),
            prop::collection::vec(prop::collection::vec(0u32..=9, vars), rows),
            prop::collection::vec(0u32..=400, rows),
        )
            .prop_map(|(prices, mut rows, caps)| {
                // A column of zeros would make its variable unbounded
                let n_rows = rows.len();
                for j in 0..rows[0].len() {
                    if rows.iter().all(|r| r[j] == 0) {
                        rows[j % n_rows][j] = 1;
                    }
                }
                Packing {
                    prices: prices.into_iter().map(f64::from).collect(),
                    rows: rows
                        .into_iter()
                        .map(|r| r.into_iter().map(f64::from).collect())
                        .collect(),
                    caps: caps.into_iter().map(f64::from).collect(),
                }
            })
    })
}

fn scale(x: f64) -> f64 {
    EPS * x.abs().max(1.0)
}

#[cfg(test)]
mod primal_properties {
    use super::*;

    proptest! {
        #[test]
        fn optimum_is_feasible(packing in packing_strategy(), lb in 0u32..=10) {
            let problem = packing.problem(f64::from(lb));
            let solution = Solver::new().solve(&problem);

            let at_bounds_ok = problem.constraints.iter().all(|c| c.lhs(&problem.lower_bounds) <= c.rhs + EPS);
            prop_assert_eq!(solution.is_optimal(), at_bounds_ok, "{}", solution.message);

            if solution.is_optimal() {
                for (x, lb) in solution.values.iter().zip(&problem.lower_bounds) {
                    prop_assert!(*x >= lb - EPS);
                }
                for c in &problem.constraints {
                    prop_assert!(c.lhs(&solution.values) <= c.rhs + scale(c.rhs), "{} violated", c.name);
                }
                let objective = problem.objective_at(&solution.values);
                prop_assert!((objective - solution.objective_value).abs() <= scale(objective));
            } else {
                prop_assert_eq!(solution.status, SolutionStatus::Infeasible);
                prop_assert!(!solution.violations.is_empty());
                prop_assert!(solution.objective_value.is_nan());
            }
        }

        #[test]
        fn optimum_beats_sampled_points(packing in packing_strategy(), weights in prop::collection::vec(0.0f64..1.0, 5)) {
            let problem = packing.problem(0.0);
            let solution = Solver::new().solve(&problem);
            prop_assert!(solution.is_optimal());

            // Scale a random direction until it touches the tightest constraint
            let direction: Vec<f64> = weights.iter().take(problem.num_variables()).copied().collect();
            let step = problem
                .constraints
                .iter()
                .map(|c| {
                    let use_per_step = c.lhs(&direction);
                    if use_per_step > 0.0 { c.rhs / use_per_step } else { f64::INFINITY }
                })
                .fold(f64::INFINITY, f64::min);
            if step.is_finite() {
                let point: Vec<f64> = direction.iter().map(|d| d * step).collect();
                let value = problem.objective_at(&point);
                prop_assert!(value <= solution.objective_value + scale(value));
            }
        }
    }
}

#[cfg(test)]
mod dual_properties {
    use super::*;

    proptest! {
        #[test]
        fn shadow_prices_are_dual_feasible(packing in packing_strategy()) {
            let problem = packing.problem(0.0);
            let solution = Solver::new().solve(&problem);
            prop_assert!(solution.is_optimal());

            let duals: Vec<f64> = solution.analysis.shadow_prices.iter().map(|sp| sp.value).collect();
            prop_assert!(duals.iter().all(|&y| y >= -EPS), "duals {:?}", duals);

            // Every product is priced at least at its worth in resources
            for (j, &price) in packing.prices.iter().enumerate() {
                let worth: f64 = packing.rows.iter().zip(&duals).map(|(row, y)| row[j] * y).sum();
                prop_assert!(worth >= price - scale(price), "x{}: worth {} < price {}", j, worth, price);
            }

            let dual_objective: f64 = packing.caps.iter().zip(&duals).map(|(b, y)| b * y).sum();
            prop_assert!((dual_objective - solution.objective_value).abs() <= scale(solution.objective_value));
        }

        #[test]
        fn positive_slack_means_zero_price(packing in packing_strategy()) {
            let problem = packing.problem(0.0);
            let solution = Solver::new().solve(&problem);
            prop_assert!(solution.is_optimal());

            let analysis = &solution.analysis;
            for ((c, &slack), sp) in problem.constraints.iter().zip(&analysis.slack).zip(&analysis.shadow_prices) {
                prop_assert!(slack >= -scale(c.rhs));
                let binding = analysis.binding_constraints.contains(&c.name);
                if !binding {
                    prop_assert!(sp.value.abs() < EPS, "{} has slack {} and price {}", c.name, slack, sp.value);
                }
            }
        }
    }
}
