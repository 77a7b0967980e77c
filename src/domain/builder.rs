//! Request builders: validated invocations to request payloads.

use crate::domain::environment::{ensure_trailing_slash, Endpoint, EnvironmentParams, EnvironmentRecord};
use crate::domain::error::{DomainResult, ValidationError};
use crate::domain::policy::{
    CreatePolicyInput, EnterpriseToAzurePolicy, EnterpriseToEnterprisePolicy,
    HyperVReplicaAzurePolicyInput, HyperVReplicaBluePolicyInput, HyperVReplicaPolicyInput,
    ProviderSpecificInput, ValidatedPolicy,
};
use crate::domain::values::OnPremisesProvider;

/// Build the create-policy request for a validated invocation.
///
/// The payload shape follows from the variant (and, on-premises, from the
/// provider); each shape has its own field mapping.
pub fn build_policy_request(policy: &ValidatedPolicy) -> CreatePolicyInput {
    let input = match policy {
        ValidatedPolicy::EnterpriseToAzure(p) => azure_input(p),
        ValidatedPolicy::EnterpriseToEnterprise(p) => match p.provider {
            OnPremisesProvider::HyperVReplica2012 => replica_input(p),
            OnPremisesProvider::HyperVReplica2012R2 => blue_input(p),
        },
    };
    CreatePolicyInput::new(input)
}

fn azure_input(p: &EnterpriseToAzurePolicy) -> ProviderSpecificInput {
    ProviderSpecificInput::HyperVReplicaAzure(HyperVReplicaAzurePolicyInput {
        application_consistent_snapshot_frequency_in_hours: p.common.snapshot_frequency_hours,
        encryption: p.encryption,
        online_replication_start_time: p.common.start_time,
        recovery_point_history_duration: p.common.recovery_points,
        replication_interval: p.common.frequency.interval_code(),
        storage_accounts: p.recovery_storage_account_id.iter().cloned().collect(),
    })
}

fn replica_input(p: &EnterpriseToEnterprisePolicy) -> ProviderSpecificInput {
    ProviderSpecificInput::HyperVReplica2012(HyperVReplicaPolicyInput {
        allowed_authentication_type: p.authentication.allowed_authentication_type(),
        application_consistent_snapshot_frequency_in_hours: p.common.snapshot_frequency_hours,
        compression: p.compression,
        initial_replication_method: p.replication_method.initial_replication_method(),
        online_replication_start_time: p.common.start_time,
        recovery_points: p.common.recovery_points,
        replica_deletion: p.replica_deletion,
        replication_port: p.replication_port,
    })
}

fn blue_input(p: &EnterpriseToEnterprisePolicy) -> ProviderSpecificInput {
    ProviderSpecificInput::HyperVReplica2012R2(HyperVReplicaBluePolicyInput {
        allowed_authentication_type: p.authentication.allowed_authentication_type(),
        application_consistent_snapshot_frequency_in_hours: p.common.snapshot_frequency_hours,
        compression: p.compression,
        initial_replication_method: p.replication_method.initial_replication_method(),
        online_replication_start_time: p.common.start_time,
        recovery_points: p.common.recovery_points,
        replica_deletion: p.replica_deletion,
        replication_frequency_in_seconds: p.common.frequency.interval_code(),
        replication_port: p.replication_port,
    })
}

/// Build an environment record from `environment add` parameters.
///
/// The Active Directory authority gets a trailing slash. The data-lake
/// audience falls back to `default_data_lake_audience` when not supplied.
pub fn build_environment(
    params: &EnvironmentParams,
    default_data_lake_audience: Option<&str>,
) -> DomainResult<EnvironmentRecord> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }

    let mut record = EnvironmentRecord::new(name, params.enable_adfs_authentication);
    let p = params.clone();
    record.set_endpoint(Endpoint::PublishSettingsFileUrl, p.publish_settings_file_url);
    record.set_endpoint(Endpoint::ServiceManagement, p.service_endpoint);
    record.set_endpoint(Endpoint::ResourceManager, p.resource_manager_endpoint);
    record.set_endpoint(Endpoint::ManagementPortalUrl, p.management_portal_url);
    record.set_endpoint(Endpoint::StorageEndpointSuffix, p.storage_endpoint);
    record.set_endpoint(
        Endpoint::ActiveDirectory,
        p.active_directory_endpoint.as_deref().map(ensure_trailing_slash),
    );
    record.set_endpoint(
        Endpoint::ActiveDirectoryServiceEndpointResourceId,
        p.active_directory_service_endpoint_resource_id,
    );
    record.set_endpoint(Endpoint::Gallery, p.gallery_endpoint);
    record.set_endpoint(Endpoint::Graph, p.graph_endpoint);
    record.set_endpoint(Endpoint::AzureKeyVaultDnsSuffix, p.azure_key_vault_dns_suffix);
    record.set_endpoint(
        Endpoint::AzureKeyVaultServiceEndpointResourceId,
        p.azure_key_vault_service_endpoint_resource_id,
    );
    record.set_endpoint(Endpoint::TrafficManagerDnsSuffix, p.traffic_manager_dns_suffix);
    record.set_endpoint(Endpoint::SqlDatabaseDnsSuffix, p.sql_database_dns_suffix);
    record.set_endpoint(
        Endpoint::AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
        p.azure_data_lake_analytics_catalog_and_job_endpoint_suffix,
    );
    record.set_endpoint(
        Endpoint::AzureDataLakeStoreFileSystemEndpointSuffix,
        p.azure_data_lake_store_file_system_endpoint_suffix,
    );
    record.set_endpoint(Endpoint::AdTenant, p.ad_tenant);
    record.set_endpoint(Endpoint::GraphEndpointResourceId, p.graph_audience);
    record.set_endpoint(
        Endpoint::DataLakeEndpointResourceId,
        p.data_lake_audience
            .or_else(|| default_data_lake_audience.map(str::to_string))
            .filter(|v| !v.is_empty()),
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::{validate, PolicyParameterSet, PolicyParams};
    use rstest::rstest;

    fn policy(params: PolicyParams, set: PolicyParameterSet) -> CreatePolicyInput {
        build_policy_request(&validate(&params, set).unwrap())
    }

    fn e2e(provider: &str) -> PolicyParams {
        PolicyParams {
            name: Some("p".into()),
            replication_provider: Some(provider.into()),
            replication_frequency_in_seconds: Some("300".into()),
            replication_port: Some(443),
            authentication: Some("kerberos".into()),
            replication_method: Some("online".into()),
            ..Default::default()
        }
    }

    #[test]
    fn given_2012_provider_when_building_then_legacy_shape_without_frequency() {
        let request = policy(e2e("HyperVReplica2012"), PolicyParameterSet::EnterpriseToEnterprise);
        let json = serde_json::to_value(&request).unwrap();
        let input = &json["properties"]["providerSpecificInput"];
        assert_eq!(input["instanceType"], "HyperVReplica2012");
        assert_eq!(input["allowedAuthenticationType"], 1);
        assert_eq!(input["initialReplicationMethod"], "OverNetwork");
        assert_eq!(input["replicationPort"], 443);
        assert!(input.get("replicationFrequencyInSeconds").is_none());
        assert!(input.get("onlineReplicationStartTime").is_none());
    }

    #[test]
    fn given_2012r2_provider_when_building_then_blue_shape_with_frequency() {
        let request = policy(
            e2e("HyperVReplica2012R2"),
            PolicyParameterSet::EnterpriseToEnterprise,
        );
        let json = serde_json::to_value(&request).unwrap();
        let input = &json["properties"]["providerSpecificInput"];
        assert_eq!(input["instanceType"], "HyperVReplica2012R2");
        assert_eq!(input["replicationFrequencyInSeconds"], 300);
        assert_eq!(input["compression"], "Disable");
        assert_eq!(input["replicaDeletion"], "NotRequired");
    }

    #[rstest]
    #[case(OnPremisesProvider::HyperVReplica2012, "HyperVReplica2012")]
    #[case(OnPremisesProvider::HyperVReplica2012R2, "HyperVReplica2012R2")]
    fn given_on_premises_provider_when_building_then_tag_matches_provider(
        #[case] provider: OnPremisesProvider,
        #[case] expected: &str,
    ) {
        // Arrange
        let ValidatedPolicy::EnterpriseToEnterprise(mut p) = validate(
            &e2e("HyperVReplica2012R2"),
            PolicyParameterSet::EnterpriseToEnterprise,
        )
        .unwrap() else {
            panic!("expected EnterpriseToEnterprise");
        };
        p.provider = provider;

        // Act
        let request = build_policy_request(&ValidatedPolicy::EnterpriseToEnterprise(p));

        // Assert
        assert_eq!(request.provider_specific_input().instance_type(), expected);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["properties"]["providerSpecificInput"]["instanceType"], expected);
    }

    #[test]
    fn given_start_time_when_building_then_sent_as_time_span() {
        let params = PolicyParams {
            replication_start_time: Some("2:30".into()),
            ..e2e("HyperVReplica2012R2")
        };
        let request = policy(params, PolicyParameterSet::EnterpriseToEnterprise);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["properties"]["providerSpecificInput"]["onlineReplicationStartTime"],
            "02:30:00"
        );
    }

    #[test]
    fn given_environment_params_when_building_then_authority_normalized_and_audience_defaulted() {
        let params = EnvironmentParams {
            name: "AzureStack".into(),
            active_directory_endpoint: Some("https://adfs.local/adfs".into()),
            enable_adfs_authentication: true,
            ..Default::default()
        };
        let record = build_environment(&params, Some("https://datalake.example")).unwrap();
        assert!(record.on_premise);
        assert_eq!(
            record.endpoint(Endpoint::ActiveDirectory),
            Some("https://adfs.local/adfs/")
        );
        assert_eq!(
            record.endpoint(Endpoint::DataLakeEndpointResourceId),
            Some("https://datalake.example")
        );
        assert_eq!(record.endpoint(Endpoint::Graph), None);
    }

    #[test]
    fn given_explicit_audience_when_building_then_default_ignored() {
        let params = EnvironmentParams {
            name: "AzureStack".into(),
            data_lake_audience: Some("https://lake.contoso".into()),
            ..Default::default()
        };
        let record = build_environment(&params, Some("https://datalake.example")).unwrap();
        assert_eq!(
            record.endpoint(Endpoint::DataLakeEndpointResourceId),
            Some("https://lake.contoso")
        );
    }

    #[test]
    fn given_empty_default_audience_when_building_then_audience_unset() {
        let params = EnvironmentParams {
            name: "AzureStack".into(),
            ..Default::default()
        };
        let record = build_environment(&params, Some("")).unwrap();
        assert_eq!(record.endpoint(Endpoint::DataLakeEndpointResourceId), None);
    }

    #[test]
    fn given_blank_name_when_building_environment_then_rejected() {
        let params = EnvironmentParams::default();
        assert!(build_environment(&params, None).is_err());
    }
}
