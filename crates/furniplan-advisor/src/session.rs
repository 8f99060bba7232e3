//! Interactive session state and the events that change it.
//!
//! Every handler takes the current snapshot and returns a new one; the caller decides when
//! to recompute views from it.

use furniplan_solver::LinearProgramSolver;
use serde::{Deserialize, Serialize};

use crate::advisor::Advisor;
use crate::catalog::{Catalog, ProductionPlan};
use crate::{AdvisorError, Result};

/// Minimum units of every product in the recommended plan
pub const DEFAULT_MINIMUM_PER_PRODUCT: u32 = 25;

/// A user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Enter or leave price/availability editing
    ToggleEditMode,
    SetPrice { product: usize, price: f64 },
    SetAvailability { resource: usize, amount: u64 },
    SetQuantity { product: usize, quantity: u32 },
    /// Replace the plan with the floored revenue optimum
    ApplyOptimal,
    /// Replace the plan with the floored optimum under the per-product minimum
    ApplyRecommended,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    catalog: Catalog,
    plan: ProductionPlan,
    edit_mode: bool,
    minimum_per_product: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        let catalog = Catalog::furniture();
        let plan = ProductionPlan::zeros(catalog.products().len());
        Self {
            catalog,
            plan,
            edit_mode: false,
            minimum_per_product: DEFAULT_MINIMUM_PER_PRODUCT,
        }
    }
}

impl SessionState {
    pub fn new(catalog: Catalog, plan: ProductionPlan, minimum_per_product: u32) -> Result<Self> {
        catalog.check_plan(&plan)?;
        Ok(Self {
            catalog,
            plan,
            edit_mode: false,
            minimum_per_product,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn plan(&self) -> &ProductionPlan {
        &self.plan
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn minimum_per_product(&self) -> u32 {
        self.minimum_per_product
    }

    /// Handle one event and return the resulting snapshot.
    ///
    /// On error `self` is untouched and the caller keeps showing it.
    pub fn apply<S: LinearProgramSolver>(&self, event: &Event, advisor: &Advisor<S>) -> Result<SessionState> {
        tracing::debug!(?event, "applying session event");
        let mut next = self.clone();

        match *event {
            Event::ToggleEditMode => next.edit_mode = !next.edit_mode,
            Event::SetPrice { product, price } => {
                self.require_edit_mode()?;
                next.catalog.set_price(product, price)?;
            }
            Event::SetAvailability { resource, amount } => {
                self.require_edit_mode()?;
                next.catalog.set_availability(resource, amount)?;
            }
            Event::SetQuantity { product, quantity } => next.plan.set(product, quantity)?,
            Event::ApplyOptimal => next.plan = advisor.integer_plan(&self.catalog, 0)?,
            Event::ApplyRecommended => {
                next.plan = advisor.integer_plan(&self.catalog, self.minimum_per_product)?;
            }
        }

        Ok(next)
    }

    fn require_edit_mode(&self) -> Result<()> {
        if self.edit_mode {
            Ok(())
        } else {
            Err(AdvisorError::NotEditing)
        }
    }
}
