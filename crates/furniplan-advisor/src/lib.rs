//! Production-mix advisor for a small furniture factory.
//!
//! Given products, resources and a fixed consumption matrix, the advisor evaluates
//! arbitrary production plans, solves the revenue-maximizing linear program (optionally
//! with a minimum production per product), rounds its solution down to a feasible
//! integer plan and reports shadow prices and slack per resource.

pub mod advisor;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod dashboard;
pub mod evaluate;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use advisor::{sensitivity, to_feasible_integer_plan, Advisor, LpResult, LpStatus, ResourceSensitivity};
pub use catalog::{Catalog, ConsumptionMatrix, Product, ProductionPlan, Resource, MAX_AVAILABILITY};
pub use compiler::compile_revenue_problem;
pub use config::{ConfigError, Parameters};
pub use dashboard::{Dashboard, PlanSummary, Recommendation, RevenueGap};
pub use evaluate::{evaluate, Evaluation, ProductLine, ResourceStatus, ResourceUsage};
pub use session::{Event, SessionState, DEFAULT_MINIMUM_PER_PRODUCT};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("Consumption matrix has no rows or no columns")]
    EmptyMatrix,
    #[error("Consumption matrix row {row} has {found} entries, expected {expected}")]
    RaggedMatrix { row: usize, expected: usize, found: usize },
    #[error("Consumption matrix is {rows}x{cols} but there are {resources} resources and {products} products")]
    DimensionMismatch {
        resources: usize,
        products: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Expected {expected} {what}, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Invalid price {price} for {product}: prices must be finite and non-negative")]
    InvalidPrice { product: String, price: f64 },
    #[error("Invalid availability {amount} for {resource}: at most {} units", catalog::MAX_AVAILABILITY)]
    InvalidAvailability { resource: String, amount: u64 },
    #[error("Unknown product #{index} (there are {count})")]
    UnknownProduct { index: usize, count: usize },
    #[error("Unknown resource #{index} (there are {count})")]
    UnknownResource { index: usize, count: usize },
    #[error("Prices and availability can only be changed in edit mode")]
    NotEditing,
    #[error("No feasible plan: {0}")]
    Infeasible(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
