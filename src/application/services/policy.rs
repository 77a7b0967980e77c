//! Replication policy service
//!
//! Resolves the parameter set, validates, builds the provider-specific
//! request and creates the policy behind the confirmation gate.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationResult, Outcome, RemoteError};
use crate::domain::{
    build_policy_request, policy, resolve, CreatePolicyInput, DomainError, JobRecord,
    ParameterSet, PolicyParameterSet, PolicyParams, ValidatedPolicy,
};
use crate::infrastructure::traits::{Confirmer, RecoveryServicesClient};

/// Confirmation action for policy creation.
pub const NEW_POLICY_ACTION: &str = "New";

/// A validated policy together with the request that will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPolicy {
    pub policy: ValidatedPolicy,
    pub request: CreatePolicyInput,
}

/// Service for creating Site Recovery replication policies.
pub struct PolicyService {
    client: Arc<dyn RecoveryServicesClient>,
    confirmer: Arc<dyn Confirmer>,
}

impl PolicyService {
    pub fn new(client: Arc<dyn RecoveryServicesClient>, confirmer: Arc<dyn Confirmer>) -> Self {
        Self { client, confirmer }
    }

    /// Resolve, validate and build the request without contacting the service.
    pub fn prepare(
        &self,
        params: &PolicyParams,
        mode: Option<PolicyParameterSet>,
    ) -> ApplicationResult<PreparedPolicy> {
        let bound = params.bound_fields();
        debug!("prepare: bound fields {:?}", bound);

        let set = resolve(&bound, mode).map_err(DomainError::from)?;
        let unused = set.spec().unused(&bound);
        if !unused.is_empty() {
            warn!(
                "ignoring fields not used by {}: {}",
                set.spec().name,
                unused.join(", ")
            );
        }

        let policy = policy::validate(params, set)?;
        let request = build_policy_request(&policy);
        debug!(
            "prepare: {} request for {}",
            request.provider_specific_input().instance_type(),
            policy.name()
        );
        Ok(PreparedPolicy { policy, request })
    }

    /// Create the policy and return the job tracking it.
    ///
    /// The job is read once; it is usually still in progress.
    pub fn create(
        &self,
        params: &PolicyParams,
        mode: Option<PolicyParameterSet>,
    ) -> ApplicationResult<Outcome<JobRecord>> {
        let prepared = self.prepare(params, mode)?;
        let name = prepared.policy.name();

        if !self.confirmer.confirm(NEW_POLICY_ACTION, name)? {
            info!("policy creation declined: {}", name);
            return Ok(Outcome::Declined);
        }

        let location = self.client.create_policy(name, &prepared.request)?;
        debug!("create: operation location {}", location.0);

        let job_id = location.job_id().ok_or_else(|| {
            RemoteError::InvalidResponse(format!("no job id in location: {}", location.0))
        })?;
        let job = self.client.get_job(job_id)?;
        info!("policy {} submitted as job {}", name, job.name);
        Ok(Outcome::Completed(job))
    }
}
