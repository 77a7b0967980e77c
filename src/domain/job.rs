//! Site Recovery jobs: the asynchronous operation behind a create call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const JOBS_SEGMENT: &str = "replicationJobs/";

/// Location of an accepted asynchronous operation, as returned by create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationLocation(pub String);

impl OperationLocation {
    /// Job id embedded in the location, i.e. the segment after `replicationJobs/`.
    pub fn job_id(&self) -> Option<&str> {
        let start = self.0.find(JOBS_SEGMENT)? + JOBS_SEGMENT.len();
        let rest = &self.0[start..];
        let end = rest.find(['?', '/']).unwrap_or(rest.len());
        Some(&rest[..end]).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobTask {
    pub name: Option<String>,
    pub friendly_name: Option<String>,
    pub state: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceErrorDetails {
    pub code: Option<String>,
    pub message: Option<String>,
    pub possible_causes: Option<String>,
    pub recommended_action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobErrorDetails {
    pub service_error_details: Option<ServiceErrorDetails>,
    pub error_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobProperties {
    pub activity_id: Option<String>,
    pub scenario_name: Option<String>,
    pub friendly_name: Option<String>,
    pub state: Option<String>,
    pub state_description: Option<String>,
    pub tasks: Vec<JobTask>,
    pub errors: Vec<JobErrorDetails>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub allowed_actions: Vec<String>,
    pub target_object_id: Option<String>,
    pub target_object_name: Option<String>,
    pub target_instance_type: Option<String>,
}

/// A job as read from the replication service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub properties: JobProperties,
}

/// User-facing projection of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobView {
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub job_type: Option<String>,
    pub display_name: Option<String>,
    pub client_request_id: Option<String>,
    pub state: Option<String>,
    pub state_description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub target_object_id: Option<String>,
    pub target_object_type: Option<String>,
    pub target_object_name: Option<String>,
    pub allowed_actions: Vec<String>,
    pub tasks: Vec<String>,
    pub errors: Vec<String>,
}

impl From<JobRecord> for JobView {
    fn from(job: JobRecord) -> Self {
        let p = job.properties;
        Self {
            name: job.name,
            id: job.id,
            kind: job.kind,
            job_type: p.scenario_name,
            display_name: p.friendly_name,
            client_request_id: p.activity_id,
            state: p.state,
            state_description: p.state_description,
            start_time: p.start_time,
            end_time: p.end_time,
            target_object_id: p.target_object_id,
            target_object_type: p.target_instance_type,
            target_object_name: p.target_object_name,
            allowed_actions: p.allowed_actions,
            tasks: p
                .tasks
                .into_iter()
                .map(|t| {
                    let name = t.friendly_name.or(t.name).unwrap_or_default();
                    match t.state {
                        Some(state) => format!("{} ({})", name, state),
                        None => name,
                    }
                })
                .collect(),
            errors: p
                .errors
                .into_iter()
                .filter_map(|e| e.service_error_details)
                .map(|d| match (d.code, d.message) {
                    (Some(code), Some(message)) => format!("{}: {}", code, message),
                    (Some(code), None) => code,
                    (None, Some(message)) => message,
                    (None, None) => "unknown error".to_string(),
                })
                .collect(),
        }
    }
}
