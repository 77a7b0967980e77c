//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (RecoveryServicesClient,
//! ProfileStore, Confirmer) but are themselves concrete structs, not traits.

mod environment;
mod policy;

pub use environment::{EnvironmentService, ADD_ENVIRONMENT_ACTION};
pub use policy::{PolicyService, PreparedPolicy, NEW_POLICY_ACTION};
