//! Azure environment records: named sets of endpoint URLs and DNS suffixes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Environments shipped with the profile; they cannot be replaced.
pub const BUILTIN_ENVIRONMENTS: &[&str] = &[
    "AzureCloud",
    "AzureChinaCloud",
    "AzureUSGovernment",
    "AzureGermanCloud",
];

/// Kind of endpoint stored in an environment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    PublishSettingsFileUrl,
    ServiceManagement,
    ResourceManager,
    ManagementPortalUrl,
    Gallery,
    StorageEndpointSuffix,
    ActiveDirectory,
    ActiveDirectoryServiceEndpointResourceId,
    Graph,
    AzureKeyVaultDnsSuffix,
    AzureKeyVaultServiceEndpointResourceId,
    TrafficManagerDnsSuffix,
    SqlDatabaseDnsSuffix,
    AzureDataLakeStoreFileSystemEndpointSuffix,
    AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix,
    AdTenant,
    GraphEndpointResourceId,
    DataLakeEndpointResourceId,
}

impl Endpoint {
    /// Human-readable label used in text output.
    pub fn label(self) -> &'static str {
        match self {
            Self::PublishSettingsFileUrl => "PublishSettingsFileUrl",
            Self::ServiceManagement => "ServiceManagementUrl",
            Self::ResourceManager => "ResourceManagerUrl",
            Self::ManagementPortalUrl => "ManagementPortalUrl",
            Self::Gallery => "GalleryUrl",
            Self::StorageEndpointSuffix => "StorageEndpointSuffix",
            Self::ActiveDirectory => "ActiveDirectoryAuthority",
            Self::ActiveDirectoryServiceEndpointResourceId => {
                "ActiveDirectoryServiceEndpointResourceId"
            }
            Self::Graph => "GraphUrl",
            Self::AzureKeyVaultDnsSuffix => "AzureKeyVaultDnsSuffix",
            Self::AzureKeyVaultServiceEndpointResourceId => {
                "AzureKeyVaultServiceEndpointResourceId"
            }
            Self::TrafficManagerDnsSuffix => "TrafficManagerDnsSuffix",
            Self::SqlDatabaseDnsSuffix => "SqlDatabaseDnsSuffix",
            Self::AzureDataLakeStoreFileSystemEndpointSuffix => {
                "AzureDataLakeStoreFileSystemEndpointSuffix"
            }
            Self::AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix => {
                "AzureDataLakeAnalyticsCatalogAndJobEndpointSuffix"
            }
            Self::AdTenant => "AdTenant",
            Self::GraphEndpointResourceId => "GraphEndpointResourceId",
            Self::DataLakeEndpointResourceId => "DataLakeEndpointResourceId",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named Azure environment.
///
/// Endpoints absent from the map fall back to the client's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRecord {
    pub name: String,
    /// ADFS authentication (authority validation disabled)
    #[serde(default)]
    pub on_premise: bool,
    #[serde(default)]
    pub endpoints: BTreeMap<Endpoint, String>,
}

impl EnvironmentRecord {
    pub fn new(name: impl Into<String>, on_premise: bool) -> Self {
        Self {
            name: name.into(),
            on_premise,
            endpoints: BTreeMap::new(),
        }
    }

    /// Store `value` for `endpoint`; `None` leaves the endpoint unset.
    pub fn set_endpoint(&mut self, endpoint: Endpoint, value: Option<String>) {
        if let Some(v) = value {
            self.endpoints.insert(endpoint, v);
        }
    }

    pub fn endpoint(&self, endpoint: Endpoint) -> Option<&str> {
        self.endpoints.get(&endpoint).map(String::as_str)
    }

    pub fn is_builtin(&self) -> bool {
        is_builtin_environment(&self.name)
    }

    /// Overlay `other` onto self: endpoints set in `other` win, others are kept.
    pub fn merge(&self, other: &EnvironmentRecord) -> Self {
        let mut endpoints = self.endpoints.clone();
        for (k, v) in &other.endpoints {
            endpoints.insert(*k, v.clone());
        }
        Self {
            name: other.name.clone(),
            on_premise: other.on_premise,
            endpoints,
        }
    }
}

pub fn is_builtin_environment(name: &str) -> bool {
    BUILTIN_ENVIRONMENTS
        .iter()
        .any(|b| b.eq_ignore_ascii_case(name))
}

/// Ensure `url` ends with exactly one `/`.
///
/// Idempotent: normalizing an already normalized value returns it unchanged.
pub fn ensure_trailing_slash(url: &str) -> String {
    let mut normalized = url.trim_end_matches('/').to_string();
    normalized.push('/');
    normalized
}

/// Parameters of one `environment add` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentParams {
    pub name: String,
    pub publish_settings_file_url: Option<String>,
    pub service_endpoint: Option<String>,
    pub management_portal_url: Option<String>,
    pub storage_endpoint: Option<String>,
    pub active_directory_endpoint: Option<String>,
    pub resource_manager_endpoint: Option<String>,
    pub gallery_endpoint: Option<String>,
    pub active_directory_service_endpoint_resource_id: Option<String>,
    pub graph_endpoint: Option<String>,
    pub azure_key_vault_dns_suffix: Option<String>,
    pub azure_key_vault_service_endpoint_resource_id: Option<String>,
    pub traffic_manager_dns_suffix: Option<String>,
    pub sql_database_dns_suffix: Option<String>,
    pub azure_data_lake_store_file_system_endpoint_suffix: Option<String>,
    pub azure_data_lake_analytics_catalog_and_job_endpoint_suffix: Option<String>,
    pub enable_adfs_authentication: bool,
    pub ad_tenant: Option<String>,
    pub graph_audience: Option<String>,
    pub data_lake_audience: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://login.contoso.net", "https://login.contoso.net/")]
    #[case("https://login.contoso.net/", "https://login.contoso.net/")]
    #[case("https://login.contoso.net//", "https://login.contoso.net/")]
    #[case("", "/")]
    fn given_authority_when_normalizing_then_exactly_one_trailing_slash(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(ensure_trailing_slash(input), expected);
    }

    #[test]
    fn given_normalized_authority_when_normalizing_again_then_unchanged() {
        let once = ensure_trailing_slash("https://adfs.local/adfs");
        assert_eq!(ensure_trailing_slash(&once), once);
    }

    #[test]
    fn given_two_records_when_merging_then_new_endpoints_win_and_old_are_kept() {
        let mut stored = EnvironmentRecord::new("Stack", false);
        stored.set_endpoint(Endpoint::Graph, Some("https://graph.old/".into()));
        stored.set_endpoint(Endpoint::AdTenant, Some("contoso".into()));

        let mut update = EnvironmentRecord::new("Stack", true);
        update.set_endpoint(Endpoint::Graph, Some("https://graph.new/".into()));

        let merged = stored.merge(&update);
        assert!(merged.on_premise);
        assert_eq!(merged.endpoint(Endpoint::Graph), Some("https://graph.new/"));
        assert_eq!(merged.endpoint(Endpoint::AdTenant), Some("contoso"));
    }

    #[test]
    fn given_none_when_setting_endpoint_then_endpoint_stays_unset() {
        let mut record = EnvironmentRecord::new("Stack", false);
        record.set_endpoint(Endpoint::Gallery, None);
        assert!(record.endpoints.is_empty());
    }

    #[test]
    fn given_builtin_name_in_any_case_when_checking_then_detected() {
        assert!(is_builtin_environment("azurecloud"));
        assert!(!is_builtin_environment("AzureStack"));
    }
}
