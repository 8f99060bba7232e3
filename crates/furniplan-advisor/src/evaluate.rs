//! Resource usage and revenue of a given production plan.

use serde::Serialize;

use crate::catalog::{Catalog, ProductionPlan};

/// Whether a resource can cover the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Ok,
    Exceeded,
}

/// One row of the consumption-vs-availability table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceUsage {
    pub resource: String,
    pub available: u64,
    pub consumed: u64,
    /// Negative when the plan needs more than is available
    pub remaining: i64,
    pub status: ResourceStatus,
}

/// Quantity and revenue of one product in a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductLine {
    pub product: String,
    pub quantity: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub usage: Vec<ResourceUsage>,
    pub lines: Vec<ProductLine>,
    pub revenue: f64,
}

impl Evaluation {
    /// `matrix · plan`
    pub fn consumption(&self) -> Vec<u64> {
        self.usage.iter().map(|u| u.consumed).collect()
    }

    pub fn remaining(&self) -> Vec<i64> {
        self.usage.iter().map(|u| u.remaining).collect()
    }

    /// Names of the resources the plan over-consumes
    pub fn violated(&self) -> Vec<&str> {
        self.usage
            .iter()
            .filter(|u| u.status == ResourceStatus::Exceeded)
            .map(|u| u.resource.as_str())
            .collect()
    }

    pub fn violation_count(&self) -> usize {
        self.usage
            .iter()
            .filter(|u| u.status == ResourceStatus::Exceeded)
            .count()
    }

    pub fn is_feasible(&self) -> bool {
        self.violation_count() == 0
    }
}

/// Consumption, remaining stock, revenue and violated resources of `plan`.
///
/// Never fails: an over-consuming plan is reported through [`ResourceStatus::Exceeded`]
/// and still gets its revenue computed. Products missing from a short plan count as zero.
pub fn evaluate(plan: &ProductionPlan, catalog: &Catalog) -> Evaluation {
    let quantities = plan.quantities();
    let consumption = catalog.matrix().consumption(quantities);

    let usage = catalog
        .resources()
        .iter()
        .zip(consumption)
        .map(|(resource, consumed)| {
            let remaining = i128::from(resource.availability) - i128::from(consumed);
            let remaining = remaining.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
            ResourceUsage {
                resource: resource.name.clone(),
                available: resource.availability,
                consumed,
                remaining,
                status: if consumed > resource.availability {
                    ResourceStatus::Exceeded
                } else {
                    ResourceStatus::Ok
                },
            }
        })
        .collect();

    let lines: Vec<ProductLine> = catalog
        .products()
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let quantity = plan.get(i).unwrap_or(0);
            ProductLine {
                product: product.name.clone(),
                quantity,
                revenue: product.price * f64::from(quantity),
            }
        })
        .collect();

    let revenue = lines.iter().map(|l| l.revenue).sum();

    Evaluation { usage, lines, revenue }
}
