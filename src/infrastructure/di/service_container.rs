//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{EnvironmentService, PolicyService};
use crate::config::Settings;
use crate::infrastructure::http::HttpRecoveryServicesClient;
use crate::infrastructure::profile_store::JsonProfileStore;
use crate::infrastructure::traits::{Confirmer, ProfileStore, RecoveryServicesClient};
use crate::infrastructure::InfraResult;

/// Container holding the boundary implementations shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Site Recovery API
    pub client: Arc<dyn RecoveryServicesClient>,

    /// Environment profile
    pub store: Arc<dyn ProfileStore>,

    /// Confirmation gate
    pub confirmer: Arc<dyn Confirmer>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings, confirmer: Arc<dyn Confirmer>) -> InfraResult<Self> {
        let client = HttpRecoveryServicesClient::new(settings.site_recovery.clone())?;
        let store = JsonProfileStore::new(settings.profile_path());
        Ok(Self::with_deps(
            settings,
            Arc::new(client),
            Arc::new(store),
            confirmer,
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        client: Arc<dyn RecoveryServicesClient>,
        store: Arc<dyn ProfileStore>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            client,
            store,
            confirmer,
        }
    }

    pub fn environment_service(&self) -> EnvironmentService {
        EnvironmentService::new(
            self.store.clone(),
            self.confirmer.clone(),
            self.settings.default_data_lake_audience(),
        )
    }

    pub fn policy_service(&self) -> PolicyService {
        PolicyService::new(self.client.clone(), self.confirmer.clone())
    }
}
