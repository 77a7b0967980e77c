//! Domain layer: parameter sets, validation and request payloads
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod environment;
pub mod error;
pub mod job;
pub mod parameter_set;
pub mod policy;
pub mod values;

pub use builder::{build_environment, build_policy_request};
pub use environment::{ensure_trailing_slash, Endpoint, EnvironmentParams, EnvironmentRecord};
pub use error::{ConfigurationError, DomainError, DomainResult, ValidationError};
pub use job::{JobProperties, JobRecord, JobView, OperationLocation};
pub use parameter_set::{resolve, ParameterSet, ParameterSetSpec};
pub use policy::{CreatePolicyInput, PolicyParameterSet, PolicyParams, ValidatedPolicy};
