//! Site Recovery management API over HTTPS (reqwest, blocking)

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::RemoteError;
use crate::config::SiteRecoveryConfig;
use crate::domain::{CreatePolicyInput, JobRecord, OperationLocation};
use crate::infrastructure::traits::RecoveryServicesClient;

const ASYNC_OPERATION: &str = "azure-asyncoperation";
const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

#[derive(Debug, Deserialize)]
struct ArmErrorBody {
    error: ArmError,
}

#[derive(Debug, Deserialize)]
struct ArmError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Vault coordinates resolved from settings.
#[derive(Debug, Clone)]
struct VaultTarget {
    subscription_id: String,
    resource_group: String,
    vault_name: String,
    access_token: String,
}

/// Client for one Recovery Services vault.
///
/// Vault coordinates are checked per call so that commands that never reach
/// the service work without them.
pub struct HttpRecoveryServicesClient {
    http: Client,
    config: SiteRecoveryConfig,
}

impl HttpRecoveryServicesClient {
    pub fn new(config: SiteRecoveryConfig) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("azrm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport {
                url: config.resource_manager_endpoint.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    fn target(&self) -> Result<VaultTarget, RemoteError> {
        fn required(value: &Option<String>, key: &'static str) -> Result<String, RemoteError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(RemoteError::NotConfigured(key))
        }
        Ok(VaultTarget {
            subscription_id: required(&self.config.subscription_id, "subscription_id")?,
            resource_group: required(&self.config.resource_group, "resource_group")?,
            vault_name: required(&self.config.vault_name, "vault_name")?,
            access_token: required(&self.config.access_token, "access_token")?,
        })
    }

    /// Vault-scoped resource URL. Caller-supplied names are pushed as single
    /// percent-encoded path segments.
    fn vault_url(
        &self,
        target: &VaultTarget,
        collection: &str,
        name: &str,
    ) -> Result<Url, RemoteError> {
        let endpoint = &self.config.resource_manager_endpoint;
        let invalid = |message: String| RemoteError::Transport {
            url: endpoint.clone(),
            message,
        };
        let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("endpoint cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "subscriptions",
                target.subscription_id.as_str(),
                "resourceGroups",
                target.resource_group.as_str(),
                "providers",
                "Microsoft.RecoveryServices",
                "vaults",
                target.vault_name.as_str(),
                collection,
                name,
            ]);
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &self.config.api_version);
        Ok(url)
    }

    fn transport(url: &str, e: reqwest::Error) -> RemoteError {
        RemoteError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Map a non-success response to `Rejected`, reading the ARM error body when present.
fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(rejected(status.as_u16(), &body))
}

fn rejected(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ArmErrorBody>(body) {
        Ok(parsed) => RemoteError::Rejected {
            status,
            code: parsed.error.code,
            message: parsed.error.message,
        },
        Err(_) => RemoteError::Rejected {
            status,
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

/// `Location`, falling back to `Azure-AsyncOperation`.
fn operation_location(headers: &HeaderMap) -> Option<OperationLocation> {
    headers
        .get(LOCATION)
        .or_else(|| headers.get(ASYNC_OPERATION))
        .and_then(|v| v.to_str().ok())
        .map(|v| OperationLocation(v.to_string()))
}

impl RecoveryServicesClient for HttpRecoveryServicesClient {
    #[instrument(level = "debug", skip(self, input))]
    fn create_policy(
        &self,
        name: &str,
        input: &CreatePolicyInput,
    ) -> Result<OperationLocation, RemoteError> {
        let target = self.target()?;
        let url = self.vault_url(&target, "replicationPolicies", name)?;
        let request_id = Uuid::new_v4().to_string();
        debug!("PUT {} ({})", url, request_id);

        let response = self
            .http
            .put(url.clone())
            .bearer_auth(&target.access_token)
            .header(CLIENT_REQUEST_ID, &request_id)
            .json(input)
            .send()
            .map_err(|e| Self::transport(url.as_str(), e))?;
        let response = check_status(response)?;

        operation_location(response.headers()).ok_or_else(|| {
            RemoteError::InvalidResponse(format!(
                "HTTP {} without Location header",
                response.status().as_u16()
            ))
        })
    }

    #[instrument(level = "debug", skip(self))]
    fn get_job(&self, job_id: &str) -> Result<JobRecord, RemoteError> {
        let target = self.target()?;
        let url = self.vault_url(&target, "replicationJobs", job_id)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&target.access_token)
            .header(CLIENT_REQUEST_ID, Uuid::new_v4().to_string())
            .send()
            .map_err(|e| Self::transport(url.as_str(), e))?;
        let response = check_status(response)?;

        response
            .json::<JobRecord>()
            .map_err(|e| RemoteError::InvalidResponse(format!("job {}: {}", job_id, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn configured() -> SiteRecoveryConfig {
        SiteRecoveryConfig {
            resource_manager_endpoint: "https://management.example.net/".into(),
            subscription_id: Some("sub-1".into()),
            resource_group: Some("rg-1".into()),
            vault_name: Some("vault-1".into()),
            access_token: Some("token".into()),
            ..SiteRecoveryConfig::default()
        }
    }

    #[test]
    fn given_vault_settings_when_building_url_then_contains_vault_path_and_version() {
        let client = HttpRecoveryServicesClient::new(configured()).unwrap();
        let target = client.target().unwrap();

        let url = client
            .vault_url(&target, "replicationPolicies", "p1")
            .unwrap();

        assert_eq!(
            url.as_str(),
            format!(
                "https://management.example.net/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.RecoveryServices/vaults/vault-1/replicationPolicies/p1?api-version={}",
                crate::config::DEFAULT_API_VERSION
            )
        );
    }

    #[test]
    fn given_name_with_path_and_query_characters_when_building_url_then_stays_one_segment() {
        // Arrange
        let client = HttpRecoveryServicesClient::new(configured()).unwrap();
        let target = client.target().unwrap();

        // Act
        let url = client
            .vault_url(
                &target,
                "replicationPolicies",
                "../../vaults/other/x?api-version=1999-01-01#frag",
            )
            .unwrap();

        // Assert
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 10);
        assert_eq!(segments[7], "vault-1");
        assert_eq!(segments[8], "replicationPolicies");
        assert!(!segments[9].contains('/'));
        assert!(!segments[9].contains('?'));
        assert!(url.fragment().is_none());
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![(
                "api-version".to_string(),
                crate::config::DEFAULT_API_VERSION.to_string()
            )]
        );
    }

    #[test]
    fn given_endpoint_with_base_path_when_building_url_then_path_appended() {
        let mut config = configured();
        config.resource_manager_endpoint = "https://stack.contoso.local/arm".into();
        let client = HttpRecoveryServicesClient::new(config).unwrap();
        let target = client.target().unwrap();

        let url = client.vault_url(&target, "replicationJobs", "job-1").unwrap();

        assert!(url
            .path()
            .starts_with("/arm/subscriptions/sub-1/resourceGroups/rg-1/"));
        assert!(url.path().ends_with("/vaults/vault-1/replicationJobs/job-1"));
    }

    #[test]
    fn given_unparsable_endpoint_when_building_url_then_transport_error() {
        let mut config = configured();
        config.resource_manager_endpoint = "not a url".into();
        let client = HttpRecoveryServicesClient::new(config).unwrap();
        let target = client.target().unwrap();

        let err = client
            .vault_url(&target, "replicationPolicies", "p1")
            .unwrap_err();

        assert!(matches!(err, RemoteError::Transport { .. }));
    }

    #[test]
    fn given_missing_vault_when_resolving_target_then_not_configured() {
        let mut config = configured();
        config.vault_name = Some("  ".into());
        let client = HttpRecoveryServicesClient::new(config).unwrap();

        let err = client.target().unwrap_err();

        assert!(matches!(err, RemoteError::NotConfigured("vault_name")));
    }

    #[test]
    fn given_arm_error_body_when_rejected_then_code_and_message_extracted() {
        let err = rejected(
            400,
            r#"{"error":{"code":"InvalidParameter","message":"bad port"}}"#,
        );
        match err {
            RemoteError::Rejected {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "InvalidParameter");
                assert_eq!(message, "bad port");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn given_plain_body_when_rejected_then_body_is_message() {
        let err = rejected(502, "bad gateway\n");
        assert!(matches!(
            err,
            RemoteError::Rejected { status: 502, ref code, ref message }
                if code.is_empty() && message == "bad gateway"
        ));
    }

    #[test]
    fn given_async_operation_header_only_when_reading_location_then_used() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ASYNC_OPERATION,
            HeaderValue::from_static("https://h/replicationJobs/j9?api-version=1"),
        );

        let location = operation_location(&headers).unwrap();

        assert_eq!(location.job_id(), Some("j9"));
    }
}
