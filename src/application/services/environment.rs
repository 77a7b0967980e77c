//! Environment profile service
//!
//! Handles adding named Azure environments to the profile store and reading
//! them back.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult, Outcome};
use crate::domain::{build_environment, EnvironmentParams, EnvironmentRecord};
use crate::infrastructure::traits::{Confirmer, ProfileStore};

/// Confirmation action for environment registration.
pub const ADD_ENVIRONMENT_ACTION: &str = "adding environment";

/// Service for managing environment records.
pub struct EnvironmentService {
    store: Arc<dyn ProfileStore>,
    confirmer: Arc<dyn Confirmer>,
    default_data_lake_audience: Option<String>,
}

impl EnvironmentService {
    /// Create a new environment service.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        confirmer: Arc<dyn Confirmer>,
        default_data_lake_audience: Option<String>,
    ) -> Self {
        Self {
            store,
            confirmer,
            default_data_lake_audience,
        }
    }

    /// Add or update a named environment.
    ///
    /// Returns the record as stored. Nothing is written when the caller
    /// declines.
    pub fn add(&self, params: &EnvironmentParams) -> ApplicationResult<Outcome<EnvironmentRecord>> {
        debug!("add: name={}", params.name);
        let record = build_environment(params, self.default_data_lake_audience.as_deref())?;

        if !self.confirmer.confirm(ADD_ENVIRONMENT_ACTION, &record.name)? {
            info!("adding environment declined: {}", record.name);
            return Ok(Outcome::Declined);
        }

        let stored = self.store.add_or_set_environment(record)?;
        info!("environment {} saved", stored.name);
        Ok(Outcome::Completed(stored))
    }

    /// Look up one environment by name.
    pub fn get(&self, name: &str) -> ApplicationResult<EnvironmentRecord> {
        debug!("get: name={}", name);
        self.store
            .get_environment(name)?
            .ok_or_else(|| ApplicationError::EnvironmentNotFound(name.to_string()))
    }

    /// All stored environments.
    pub fn list(&self) -> ApplicationResult<Vec<EnvironmentRecord>> {
        let environments = self.store.list_environments()?;
        debug!("list: {} environments", environments.len());
        Ok(environments)
    }
}
