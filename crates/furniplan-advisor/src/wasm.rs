//! WASM bindings for the planning page
//!
//! The page owns a [`Session`], forwards every user action to [`Session::dispatch`] and
//! re-renders from the dashboard it returns.

use wasm_bindgen::prelude::*;

use crate::advisor::Advisor;
use crate::catalog::ProductionPlan;
use crate::config::Parameters;
use crate::dashboard::Dashboard;
use crate::evaluate::evaluate;
use crate::session::{Event, SessionState};

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// One planning session held by the page
#[wasm_bindgen]
pub struct Session {
    state: SessionState,
    advisor: Advisor,
}

#[wasm_bindgen]
impl Session {
    /// Start from the furniture defaults
    #[wasm_bindgen(constructor)]
    pub fn new() -> Session {
        Session {
            state: SessionState::default(),
            advisor: Advisor::new(),
        }
    }

    /// Start from a JSON parameter document
    #[wasm_bindgen(js_name = fromParameters)]
    pub fn from_parameters(json: &str) -> Result<Session, JsValue> {
        let state = Parameters::from_json_str(json)
            .and_then(Parameters::into_session)
            .map_err(to_js_error)?;
        Ok(Session {
            state,
            advisor: Advisor::new(),
        })
    }

    /// Every view of the current snapshot
    pub fn dashboard(&self) -> Result<JsValue, JsValue> {
        let dashboard = Dashboard::build(&self.state, &self.advisor);
        serde_wasm_bindgen::to_value(&dashboard).map_err(to_js_error)
    }

    /// Apply an event such as `{ type: "set_quantity", product: 0, quantity: 3 }` and return
    /// the new dashboard. A rejected event leaves the session unchanged.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: Event = serde_wasm_bindgen::from_value(event).map_err(to_js_error)?;
        self.state = self.state.apply(&event, &self.advisor).map_err(to_js_error)?;
        self.dashboard()
    }

    /// Evaluate a plan without touching the session
    pub fn evaluate(&self, quantities: Vec<u32>) -> Result<JsValue, JsValue> {
        let plan = ProductionPlan::new(quantities);
        self.state.catalog().check_plan(&plan).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&evaluate(&plan, self.state.catalog())).map_err(to_js_error)
    }

    #[wasm_bindgen(getter, js_name = editMode)]
    pub fn edit_mode(&self) -> bool {
        self.state.edit_mode()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
