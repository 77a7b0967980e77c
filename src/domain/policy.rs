//! Site Recovery replication policy: parameters, validation and request shapes.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::error::{DomainResult, ValidationError};
use crate::domain::parameter_set::{ParameterSet, ParameterSetSpec};
use crate::domain::values::{
    Authentication, Enumerated, OnPremisesProvider, ReplicaDeletion, ReplicationFrequency,
    ReplicationMethod, ReplicationProvider, StartTime, Toggle,
};

/// Canonical field names of the `policy new` command.
pub mod field {
    pub const NAME: &str = "name";
    pub const REPLICATION_PROVIDER: &str = "replication_provider";
    pub const REPLICATION_METHOD: &str = "replication_method";
    pub const REPLICATION_FREQUENCY: &str = "replication_frequency_in_seconds";
    pub const RECOVERY_POINTS: &str = "number_of_recovery_points_to_retain";
    pub const SNAPSHOT_FREQUENCY: &str = "application_consistent_snapshot_frequency_in_hours";
    pub const COMPRESSION: &str = "compression";
    pub const REPLICATION_PORT: &str = "replication_port";
    pub const AUTHENTICATION: &str = "authentication";
    pub const REPLICATION_START_TIME: &str = "replication_start_time";
    pub const REPLICA_DELETION: &str = "replica_deletion";
    pub const RECOVERY_STORAGE_ACCOUNT: &str = "recovery_azure_storage_account_id";
    pub const ENCRYPTION: &str = "encryption";
}

use field::*;

const ENTERPRISE_TO_ENTERPRISE: ParameterSetSpec = ParameterSetSpec {
    name: "EnterpriseToEnterprise",
    required: &[
        NAME,
        REPLICATION_PROVIDER,
        REPLICATION_FREQUENCY,
        REPLICATION_PORT,
    ],
    allowed: &[
        NAME,
        REPLICATION_PROVIDER,
        REPLICATION_METHOD,
        REPLICATION_FREQUENCY,
        RECOVERY_POINTS,
        SNAPSHOT_FREQUENCY,
        COMPRESSION,
        REPLICATION_PORT,
        AUTHENTICATION,
        REPLICATION_START_TIME,
        REPLICA_DELETION,
    ],
};

const ENTERPRISE_TO_AZURE: ParameterSetSpec = ParameterSetSpec {
    name: "EnterpriseToAzure",
    required: &[NAME, REPLICATION_PROVIDER, REPLICATION_FREQUENCY],
    allowed: &[
        NAME,
        REPLICATION_PROVIDER,
        REPLICATION_FREQUENCY,
        RECOVERY_POINTS,
        SNAPSHOT_FREQUENCY,
        REPLICATION_START_TIME,
        RECOVERY_STORAGE_ACCOUNT,
        ENCRYPTION,
    ],
};

/// Parameter sets of `policy new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyParameterSet {
    /// On-premises site to Azure.
    EnterpriseToAzure,
    /// On-premises site to on-premises site.
    EnterpriseToEnterprise,
}

impl ParameterSet for PolicyParameterSet {
    const ALL: &'static [Self] = &[Self::EnterpriseToAzure, Self::EnterpriseToEnterprise];

    fn spec(self) -> &'static ParameterSetSpec {
        match self {
            Self::EnterpriseToAzure => &ENTERPRISE_TO_AZURE,
            Self::EnterpriseToEnterprise => &ENTERPRISE_TO_ENTERPRISE,
        }
    }
}

impl PolicyParameterSet {
    /// Parse the `--mode` selector: a set name or its short form.
    pub fn from_selector(selector: &str) -> DomainResult<Self> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "e2a" => Ok(Self::EnterpriseToAzure),
            "e2e" => Ok(Self::EnterpriseToEnterprise),
            other => Ok(Self::from_name(other)?),
        }
    }
}

/// Parameters of one `policy new` invocation, as supplied by the caller.
///
/// `None` means the field was not bound. Values are still unvalidated text
/// or raw integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyParams {
    pub name: Option<String>,
    pub replication_provider: Option<String>,
    pub replication_method: Option<String>,
    pub replication_frequency_in_seconds: Option<String>,
    pub number_of_recovery_points_to_retain: Option<i64>,
    pub application_consistent_snapshot_frequency_in_hours: Option<i64>,
    pub compression: Option<String>,
    pub replication_port: Option<i64>,
    pub authentication: Option<String>,
    pub replication_start_time: Option<String>,
    pub replica_deletion: Option<String>,
    pub recovery_azure_storage_account_id: Option<String>,
    pub encryption: Option<String>,
}

impl PolicyParams {
    /// Canonical names of the bound fields.
    pub fn bound_fields(&self) -> BTreeSet<&'static str> {
        let presence = [
            (NAME, self.name.is_some()),
            (REPLICATION_PROVIDER, self.replication_provider.is_some()),
            (REPLICATION_METHOD, self.replication_method.is_some()),
            (
                REPLICATION_FREQUENCY,
                self.replication_frequency_in_seconds.is_some(),
            ),
            (
                RECOVERY_POINTS,
                self.number_of_recovery_points_to_retain.is_some(),
            ),
            (
                SNAPSHOT_FREQUENCY,
                self.application_consistent_snapshot_frequency_in_hours
                    .is_some(),
            ),
            (COMPRESSION, self.compression.is_some()),
            (REPLICATION_PORT, self.replication_port.is_some()),
            (AUTHENTICATION, self.authentication.is_some()),
            (REPLICATION_START_TIME, self.replication_start_time.is_some()),
            (REPLICA_DELETION, self.replica_deletion.is_some()),
            (
                RECOVERY_STORAGE_ACCOUNT,
                self.recovery_azure_storage_account_id.is_some(),
            ),
            (ENCRYPTION, self.encryption.is_some()),
        ];
        presence
            .into_iter()
            .filter_map(|(name, bound)| bound.then_some(name))
            .collect()
    }
}

/// Fields shared by every parameter set, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPolicy {
    pub name: String,
    pub frequency: ReplicationFrequency,
    pub recovery_points: u32,
    pub snapshot_frequency_hours: u32,
    pub start_time: Option<StartTime>,
}

/// Validated on-premises-to-Azure policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseToAzurePolicy {
    pub common: CommonPolicy,
    pub recovery_storage_account_id: Option<String>,
    pub encryption: Toggle,
}

/// Validated on-premises-to-on-premises policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseToEnterprisePolicy {
    pub common: CommonPolicy,
    pub provider: OnPremisesProvider,
    pub replication_method: ReplicationMethod,
    pub compression: Toggle,
    pub replication_port: u16,
    pub authentication: Authentication,
    pub replica_deletion: ReplicaDeletion,
}

/// A policy invocation after set resolution and field validation.
///
/// Each variant carries only the fields its parameter set uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedPolicy {
    EnterpriseToAzure(EnterpriseToAzurePolicy),
    EnterpriseToEnterprise(EnterpriseToEnterprisePolicy),
}

impl ValidatedPolicy {
    pub fn name(&self) -> &str {
        match self {
            Self::EnterpriseToAzure(p) => &p.common.name,
            Self::EnterpriseToEnterprise(p) => &p.common.name,
        }
    }
}

fn parse_opt<T: Enumerated>(field: &'static str, value: Option<&str>) -> DomainResult<Option<T>> {
    Ok(value.map(|v| T::parse_field(field, v)).transpose()?)
}

fn require<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Empty { field }),
    }
}

fn non_negative(field: &'static str, value: Option<i64>) -> Result<u32, ValidationError> {
    let value = value.unwrap_or(0);
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value,
        max: i64::from(u32::MAX),
    })
}

fn port(value: Option<i64>) -> Result<u16, ValidationError> {
    let value = value.unwrap_or(0);
    if value < 0 {
        return Err(ValidationError::Negative {
            field: REPLICATION_PORT,
            value,
        });
    }
    u16::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: REPLICATION_PORT,
        value,
        max: i64::from(u16::MAX),
    })
}

/// Validate the fields the resolved parameter set uses.
///
/// Fields outside the set are not inspected.
pub fn validate(params: &PolicyParams, set: PolicyParameterSet) -> DomainResult<ValidatedPolicy> {
    let name = require(NAME, params.name.as_deref())?.to_string();
    let provider = ReplicationProvider::parse_field(
        REPLICATION_PROVIDER,
        require(REPLICATION_PROVIDER, params.replication_provider.as_deref())?,
    )?;
    let frequency = ReplicationFrequency::parse_field(
        REPLICATION_FREQUENCY,
        require(
            REPLICATION_FREQUENCY,
            params.replication_frequency_in_seconds.as_deref(),
        )?,
    )?;
    let recovery_points = non_negative(RECOVERY_POINTS, params.number_of_recovery_points_to_retain)?;
    let snapshot_frequency_hours = non_negative(
        SNAPSHOT_FREQUENCY,
        params.application_consistent_snapshot_frequency_in_hours,
    )?;
    let start_time = params
        .replication_start_time
        .as_deref()
        .map(|v| StartTime::parse_field(REPLICATION_START_TIME, v))
        .transpose()?;

    let common = CommonPolicy {
        name,
        frequency,
        recovery_points,
        snapshot_frequency_hours,
        start_time,
    };

    let incorrect_provider = || ValidationError::IncorrectReplicationProvider {
        provider: provider.to_string(),
        parameter_set: set.spec().name,
    };

    match set {
        PolicyParameterSet::EnterpriseToAzure => {
            if provider != ReplicationProvider::HyperVReplicaAzure {
                return Err(incorrect_provider().into());
            }
            Ok(ValidatedPolicy::EnterpriseToAzure(EnterpriseToAzurePolicy {
                common,
                recovery_storage_account_id: params
                    .recovery_azure_storage_account_id
                    .as_deref()
                    .map(|v| require(RECOVERY_STORAGE_ACCOUNT, Some(v)).map(str::to_string))
                    .transpose()?,
                encryption: parse_opt(ENCRYPTION, params.encryption.as_deref())?
                    .unwrap_or_default(),
            }))
        }
        PolicyParameterSet::EnterpriseToEnterprise => {
            let on_premises = provider.on_premises().ok_or_else(incorrect_provider)?;
            Ok(ValidatedPolicy::EnterpriseToEnterprise(
                EnterpriseToEnterprisePolicy {
                    common,
                    provider: on_premises,
                    replication_method: parse_opt(
                        REPLICATION_METHOD,
                        params.replication_method.as_deref(),
                    )?
                    .unwrap_or(ReplicationMethod::Offline),
                    compression: parse_opt(COMPRESSION, params.compression.as_deref())?
                        .unwrap_or_default(),
                    replication_port: port(params.replication_port)?,
                    authentication: parse_opt(AUTHENTICATION, params.authentication.as_deref())?
                        .unwrap_or_default(),
                    replica_deletion: parse_opt(
                        REPLICA_DELETION,
                        params.replica_deletion.as_deref(),
                    )?
                    .unwrap_or_default(),
                },
            ))
        }
    }
}

// ============================================================
// Request payload
// ============================================================

/// Policy input for replication to Azure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaAzurePolicyInput {
    pub application_consistent_snapshot_frequency_in_hours: u32,
    pub encryption: Toggle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_replication_start_time: Option<StartTime>,
    pub recovery_point_history_duration: u32,
    pub replication_interval: u16,
    pub storage_accounts: Vec<String>,
}

/// Policy input for Hyper-V Replica on Windows Server 2012.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaPolicyInput {
    pub allowed_authentication_type: u16,
    pub application_consistent_snapshot_frequency_in_hours: u32,
    pub compression: Toggle,
    pub initial_replication_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_replication_start_time: Option<StartTime>,
    pub recovery_points: u32,
    pub replica_deletion: ReplicaDeletion,
    pub replication_port: u16,
}

/// Policy input for Hyper-V Replica on Windows Server 2012 R2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperVReplicaBluePolicyInput {
    pub allowed_authentication_type: u16,
    pub application_consistent_snapshot_frequency_in_hours: u32,
    pub compression: Toggle,
    pub initial_replication_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_replication_start_time: Option<StartTime>,
    pub recovery_points: u32,
    pub replica_deletion: ReplicaDeletion,
    pub replication_frequency_in_seconds: u16,
    pub replication_port: u16,
}

/// Provider-specific policy input, tagged by `instanceType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "instanceType")]
pub enum ProviderSpecificInput {
    #[serde(rename = "HyperVReplicaAzure")]
    HyperVReplicaAzure(HyperVReplicaAzurePolicyInput),
    #[serde(rename = "HyperVReplica2012")]
    HyperVReplica2012(HyperVReplicaPolicyInput),
    #[serde(rename = "HyperVReplica2012R2")]
    HyperVReplica2012R2(HyperVReplicaBluePolicyInput),
}

impl ProviderSpecificInput {
    pub fn instance_type(&self) -> &'static str {
        match self {
            Self::HyperVReplicaAzure(_) => "HyperVReplicaAzure",
            Self::HyperVReplica2012(_) => "HyperVReplica2012",
            Self::HyperVReplica2012R2(_) => "HyperVReplica2012R2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyInputProperties {
    pub provider_specific_input: ProviderSpecificInput,
}

/// Body of the create-policy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePolicyInput {
    pub properties: CreatePolicyInputProperties,
}

impl CreatePolicyInput {
    pub fn new(input: ProviderSpecificInput) -> Self {
        Self {
            properties: CreatePolicyInputProperties {
                provider_specific_input: input,
            },
        }
    }

    pub fn provider_specific_input(&self) -> &ProviderSpecificInput {
        &self.properties.provider_specific_input
    }
}
