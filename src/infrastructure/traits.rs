//! I/O boundary traits for testability
//!
//! These traits abstract the remote service, the profile store and the
//! interactive prompt, allowing services to be tested with fakes.

use dialoguer::Confirm;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, RemoteError};
use crate::domain::{CreatePolicyInput, EnvironmentRecord, JobRecord, OperationLocation};

/// Site Recovery management API.
pub trait RecoveryServicesClient: Send + Sync {
    /// Create (or replace) a replication policy.
    ///
    /// Returns the location of the asynchronous operation that was started.
    fn create_policy(
        &self,
        name: &str,
        input: &CreatePolicyInput,
    ) -> Result<OperationLocation, RemoteError>;

    /// Read the current state of a job once.
    fn get_job(&self, job_id: &str) -> Result<JobRecord, RemoteError>;
}

/// Persistent store of named environments.
pub trait ProfileStore: Send + Sync {
    /// Insert or update a named environment.
    ///
    /// The returned record is what the store actually holds and may differ
    /// from the input.
    fn add_or_set_environment(&self, record: EnvironmentRecord)
        -> ApplicationResult<EnvironmentRecord>;

    /// Look up an environment by name (case-insensitive).
    fn get_environment(&self, name: &str) -> ApplicationResult<Option<EnvironmentRecord>>;

    /// All stored environments, ordered by name.
    fn list_environments(&self) -> ApplicationResult<Vec<EnvironmentRecord>>;
}

/// Confirmation gate in front of state-changing calls.
pub trait Confirmer: Send + Sync {
    /// Ask whether `action` may be performed on `target`.
    fn confirm(&self, action: &str, target: &str) -> ApplicationResult<bool>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Interactive confirmation on the terminal.
#[derive(Debug, Default)]
pub struct PromptConfirmer;

impl Confirmer for PromptConfirmer {
    fn confirm(&self, action: &str, target: &str) -> ApplicationResult<bool> {
        Confirm::new()
            .with_prompt(format!(
                "Performing the operation \"{}\" on target \"{}\". Continue?",
                action, target
            ))
            .default(false)
            .interact()
            .map_err(|e| ApplicationError::OperationFailed {
                context: "read confirmation".to_string(),
                source: Box::new(e),
            })
    }
}

/// Confirms everything (`--yes`).
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, action: &str, target: &str) -> ApplicationResult<bool> {
        debug!("confirm: assuming yes for {} on {}", action, target);
        Ok(true)
    }
}
