//! Everything the planning page shows, computed in one pass from a session snapshot.

use furniplan_solver::LinearProgramSolver;
use serde::Serialize;

use crate::advisor::{sensitivity, to_feasible_integer_plan, Advisor, ResourceSensitivity};
use crate::catalog::{Catalog, Product, ProductionPlan, Resource};
use crate::evaluate::{evaluate, Evaluation, ProductLine, ResourceStatus, ResourceUsage};
use crate::session::SessionState;

/// Quantities and revenue of a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub lines: Vec<ProductLine>,
    pub revenue: f64,
}

impl PlanSummary {
    pub fn of(plan: &ProductionPlan, catalog: &Catalog) -> Self {
        let Evaluation { lines, revenue, .. } = evaluate(plan, catalog);
        Self { lines, revenue }
    }

    pub fn quantities(&self) -> Vec<u32> {
        self.lines.iter().map(|l| l.quantity).collect()
    }
}

/// The plan with a minimum of every product, or why there is none
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub minimum: u32,
    pub plan: Option<PlanSummary>,
    pub notice: Option<String>,
}

/// How much revenue the current plan leaves on the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueGap {
    pub absolute: f64,
    /// Relative to the current revenue; absent when that is zero
    pub percent: Option<f64>,
}

impl RevenueGap {
    pub fn between(current: f64, optimal: f64) -> Self {
        let absolute = optimal - current;
        Self {
            absolute,
            percent: (current > 0.0).then(|| absolute / current * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub edit_mode: bool,
    pub products: Vec<Product>,
    pub resources: Vec<Resource>,
    pub matrix: Vec<Vec<u32>>,

    /// Consumption-vs-availability table for the current plan
    pub consumption: Vec<ResourceUsage>,
    pub current: PlanSummary,
    pub violation_count: usize,

    /// Revenue of the continuous optimum
    pub theoretical_max: Option<f64>,
    /// Floored optimum
    pub optimal: Option<PlanSummary>,
    /// Why there is no optimum
    pub optimal_notice: Option<String>,
    pub sensitivity: Vec<ResourceSensitivity>,

    /// Only computed when the unconstrained problem has an optimum
    pub recommended: Option<Recommendation>,
    pub revenue_gap: Option<RevenueGap>,
}

impl Dashboard {
    /// Recompute every view from `state`; nothing is carried over from earlier calls
    pub fn build<S: LinearProgramSolver>(state: &SessionState, advisor: &Advisor<S>) -> Self {
        let catalog = state.catalog();

        let Evaluation { usage, lines, revenue } = evaluate(state.plan(), catalog);
        let current = PlanSummary { lines, revenue };
        let violation_count = usage
            .iter()
            .filter(|u| u.status == ResourceStatus::Exceeded)
            .count();

        let optimum = advisor.solve_max(catalog, 0);
        let optimal_plan = to_feasible_integer_plan(catalog, &optimum);
        let optimal = optimal_plan.as_ref().map(|plan| PlanSummary::of(plan, catalog));
        let optimal_notice = optimal.is_none().then(|| optimum.message.clone());

        let recommended = optimal.as_ref().map(|_| {
            let minimum = state.minimum_per_product();
            let result = advisor.solve_max(catalog, minimum);
            match to_feasible_integer_plan(catalog, &result) {
                Some(plan) => Recommendation {
                    minimum,
                    plan: Some(PlanSummary::of(&plan, catalog)),
                    notice: None,
                },
                None => Recommendation {
                    minimum,
                    plan: None,
                    notice: Some(format!(
                        "Cannot produce {}+ of every product with the available resources: {}",
                        minimum, result.message
                    )),
                },
            }
        });

        let revenue_gap = optimal
            .as_ref()
            .map(|o| RevenueGap::between(current.revenue, o.revenue));

        Self {
            edit_mode: state.edit_mode(),
            products: catalog.products().to_vec(),
            resources: catalog.resources().to_vec(),
            matrix: catalog.matrix().rows().to_vec(),
            consumption: usage,
            current,
            violation_count,
            theoretical_max: optimum.is_feasible().then_some(optimum.objective),
            optimal,
            optimal_notice,
            sensitivity: sensitivity(catalog, &optimum),
            recommended,
            revenue_gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Event;

    #[test]
    fn test_default_dashboard() {
        let dashboard = Dashboard::build(&SessionState::default(), &Advisor::new());

        assert_eq!(dashboard.current.revenue, 0.0);
        assert_eq!(dashboard.violation_count, 0);
        assert_eq!(dashboard.matrix.len(), 3);
        assert!((dashboard.theoretical_max.unwrap() - 20000.0).abs() < 1e-6);

        let optimal = dashboard.optimal.as_ref().unwrap();
        assert_eq!(optimal.quantities(), vec![0, 250, 0, 0]);
        assert_eq!(optimal.revenue, 20000.0);
        assert!(dashboard.optimal_notice.is_none());
        assert_eq!(dashboard.sensitivity.len(), 3);

        let recommended = dashboard.recommended.as_ref().unwrap();
        assert_eq!(recommended.minimum, 25);
        assert!(recommended.plan.is_some());

        let gap = dashboard.revenue_gap.as_ref().unwrap();
        assert_eq!(gap.absolute, 20000.0);
        assert_eq!(gap.percent, None);
    }

    #[test]
    fn test_violations_and_gap() {
        let advisor = Advisor::new();
        let state = SessionState::default()
            .apply(&Event::SetQuantity { product: 1, quantity: 100 }, &advisor)
            .unwrap()
            .apply(&Event::SetQuantity { product: 3, quantity: 100 }, &advisor)
            .unwrap();
        let dashboard = Dashboard::build(&state, &advisor);

        // 100 tables + 100 shelves need 500 Tábua
        assert_eq!(dashboard.violation_count, 1);
        assert_eq!(dashboard.consumption[0].remaining, -250);
        assert_eq!(dashboard.current.revenue, 10000.0);

        let gap = dashboard.revenue_gap.unwrap();
        assert_eq!(gap.absolute, 10000.0);
        assert_eq!(gap.percent, Some(100.0));
    }

    #[test]
    fn test_recommendation_notice() {
        let advisor = Advisor::new();
        let state = SessionState::default()
            .apply(&Event::ToggleEditMode, &advisor)
            .unwrap()
            .apply(&Event::SetAvailability { resource: 2, amount: 200 }, &advisor)
            .unwrap();
        let dashboard = Dashboard::build(&state, &advisor);

        // 25 of each product needs 225 Painéis
        assert!(dashboard.edit_mode);
        let recommended = dashboard.recommended.unwrap();
        assert!(recommended.plan.is_none());
        let notice = recommended.notice.unwrap();
        assert!(notice.starts_with("Cannot produce 25+"), "{}", notice);
        assert!(notice.contains("Painéis"), "{}", notice);
    }
}
