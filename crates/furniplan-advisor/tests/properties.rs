//! Property-based tests for plan evaluation and the revenue LP
//!
//! Catalogs are random and may have zero entries like the furniture matrix, but every
//! product consumes some resource, so the LP always has a bounded optimum at minimum zero.

use furniplan_advisor::{
    evaluate, sensitivity, to_feasible_integer_plan, Advisor, Catalog, ConsumptionMatrix, Product, ProductionPlan,
    Resource, ResourceStatus,
};
use proptest::prelude::*;

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    (1usize..=4, 1usize..=3).prop_flat_map(|(products, resources)| {
        (
            prop::collection::vec(0u32..=200, products),
            prop::collection::vec(0u64..=600, resources),
            prop::collection::vec(prop::collection::vec(0u32..=6, products), resources),
        )
            .prop_map(|(prices, availability, rows)| {
                let products = prices
                    .into_iter()
                    .enumerate()
                    .map(|(j, price)| Product {
                        name: format!("p{}", j),
                        price: f64::from(price),
                    })
                    .collect();
                let resources = availability
                    .into_iter()
                    .enumerate()
                    .map(|(i, availability)| Resource {
                        name: format!("r{}", i),
                        availability,
                    })
                    .collect();
                let matrix = ConsumptionMatrix::new(with_nonzero_columns(rows)).unwrap();
                Catalog::new(products, resources, matrix).unwrap()
            })
    })
}

/// Give every all-zero column one unit of some resource
fn with_nonzero_columns(mut rows: Vec<Vec<u32>>) -> Vec<Vec<u32>> {
    let resources = rows.len();
    for j in 0..rows[0].len() {
        if rows.iter().all(|row| row[j] == 0) {
            rows[j % resources][j] = 1;
        }
    }
    rows
}

fn catalog_and_plan() -> impl Strategy<Value = (Catalog, ProductionPlan)> {
    catalog_strategy().prop_flat_map(|catalog| {
        let products = catalog.products().len();
        (
            Just(catalog),
            prop::collection::vec(0u32..=300, products).prop_map(ProductionPlan::new),
        )
    })
}

#[cfg(test)]
mod evaluation_properties {
    use super::*;

    proptest! {
        #[test]
        fn evaluation_matches_matrix_product((catalog, plan) in catalog_and_plan()) {
            let evaluation = evaluate(&plan, &catalog);

            for (i, usage) in evaluation.usage.iter().enumerate() {
                let expected: u64 = catalog
                    .matrix()
                    .row(i)
                    .iter()
                    .zip(plan.quantities())
                    .map(|(&a, &q)| u64::from(a) * u64::from(q))
                    .sum();
                prop_assert_eq!(usage.consumed, expected);
                prop_assert_eq!(usage.remaining, usage.available as i64 - expected as i64);
                prop_assert_eq!(usage.status == ResourceStatus::Exceeded, expected > usage.available);
            }

            let revenue: f64 = catalog
                .prices()
                .iter()
                .zip(plan.quantities())
                .map(|(p, &q)| p * f64::from(q))
                .sum();
            prop_assert!((evaluation.revenue - revenue).abs() < 1e-9);
            prop_assert_eq!(evaluation.is_feasible(), evaluation.violated().is_empty());
        }
    }
}

#[cfg(test)]
mod optimum_properties {
    use super::*;

    proptest! {
        #[test]
        fn floored_optimum_is_feasible(catalog in catalog_strategy()) {
            let result = Advisor::new().solve_max(&catalog, 0);
            prop_assert!(result.is_feasible(), "{}", result.message);

            let plan = to_feasible_integer_plan(&catalog, &result).unwrap();
            let evaluation = evaluate(&plan, &catalog);
            prop_assert!(evaluation.is_feasible(), "plan {:?} violates {:?}", plan, evaluation.violated());
            prop_assert!(evaluation.revenue <= result.objective + 1e-6 * result.objective.max(1.0));
        }

        #[test]
        fn slack_resources_have_zero_shadow_price(catalog in catalog_strategy()) {
            let result = Advisor::new().solve_max(&catalog, 0);
            prop_assert!(result.is_feasible());

            for row in sensitivity(&catalog, &result) {
                prop_assert!(row.slack >= -1e-6, "{} over-consumed by {}", row.resource, -row.slack);
                prop_assert!(row.shadow_price >= 0.0);
                if !row.binding {
                    prop_assert!(row.shadow_price.abs() < 1e-6, "{} has slack {} but price {}", row.resource, row.slack, row.shadow_price);
                }
            }
        }

        #[test]
        fn shadow_prices_price_the_optimum(catalog in catalog_strategy()) {
            let result = Advisor::new().solve_max(&catalog, 0);
            prop_assert!(result.is_feasible());

            let priced: f64 = catalog
                .availability()
                .iter()
                .zip(result.shadow_prices())
                .map(|(&b, y)| b as f64 * y)
                .sum();
            prop_assert!(
                (priced - result.objective).abs() <= 1e-6 * result.objective.max(1.0),
                "priced {} vs objective {}", priced, result.objective
            );
        }

        #[test]
        fn resolving_gives_the_same_answer(catalog in catalog_strategy(), minimum in 0u32..=20) {
            let advisor = Advisor::new();
            let first = advisor.solve_max(&catalog, minimum);
            let second = advisor.solve_max(&catalog, minimum);
            prop_assert_eq!(first.status, second.status);
            prop_assert_eq!(to_feasible_integer_plan(&catalog, &first), to_feasible_integer_plan(&catalog, &second));
        }

        #[test]
        fn minimum_is_respected_when_feasible(catalog in catalog_strategy(), minimum in 0u32..=30) {
            let result = Advisor::new().solve_max(&catalog, minimum);
            match to_feasible_integer_plan(&catalog, &result) {
                Some(plan) => {
                    prop_assert!(plan.quantities().iter().all(|&q| q >= minimum));
                    prop_assert!(evaluate(&plan, &catalog).is_feasible());
                }
                None => {
                    // Infeasible only when the minimum alone already over-consumes something
                    let at_minimum = ProductionPlan::new(vec![minimum; catalog.products().len()]);
                    prop_assert!(!evaluate(&at_minimum, &catalog).is_feasible());
                }
            }
        }
    }
}
