//! Starting parameters for a session, read from JSON.
//!
//! Every field is optional; missing ones keep the furniture defaults.
//!
//! ```json
//! {
//!   "prices": [100, 80, 120, 20],
//!   "availability": [250, 600, 500],
//!   "quantities": [0, 0, 0, 0],
//!   "minimum_per_product": 25
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, ProductionPlan};
use crate::session::{SessionState, DEFAULT_MINIMUM_PER_PRODUCT};
use crate::AdvisorError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid parameters: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] AdvisorError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub prices: Option<Vec<f64>>,
    pub availability: Option<Vec<u64>>,
    pub quantities: Option<Vec<u32>>,
    pub minimum_per_product: Option<u32>,
}

impl Parameters {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parameters = Self::from_json_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded parameters");
        Ok(parameters)
    }

    /// Apply these parameters over the furniture defaults
    pub fn into_session(self) -> Result<SessionState, ConfigError> {
        let mut catalog = Catalog::furniture();
        if let Some(prices) = &self.prices {
            catalog.set_prices(prices)?;
        }
        if let Some(availability) = &self.availability {
            catalog.set_availabilities(availability)?;
        }

        let plan = match self.quantities {
            Some(quantities) => ProductionPlan::new(quantities),
            None => ProductionPlan::zeros(catalog.products().len()),
        };
        let minimum = self.minimum_per_product.unwrap_or(DEFAULT_MINIMUM_PER_PRODUCT);

        Ok(SessionState::new(catalog, plan, minimum)?)
    }
}
