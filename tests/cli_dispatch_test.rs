//! Tests for command dispatch through the service container

use std::sync::{Arc, Mutex};

use clap::Parser;
use tempfile::TempDir;

use azrm::application::RemoteError;
use azrm::cli::commands::{dispatch, WhatIf};
use azrm::cli::Cli;
use azrm::config::Settings;
use azrm::domain::{CreatePolicyInput, JobRecord, OperationLocation};
use azrm::exitcode;
use azrm::infrastructure::di::ServiceContainer;
use azrm::infrastructure::profile_store::JsonProfileStore;
use azrm::infrastructure::traits::{AssumeYes, RecoveryServicesClient};
use azrm::util::testing;

#[derive(Default)]
struct RecordingClient {
    created: Mutex<Vec<String>>,
}

impl RecoveryServicesClient for RecordingClient {
    fn create_policy(
        &self,
        name: &str,
        _input: &CreatePolicyInput,
    ) -> Result<OperationLocation, RemoteError> {
        self.created.lock().unwrap().push(name.to_string());
        Ok(OperationLocation(
            "https://h/vaults/v/replicationJobs/j1?api-version=1".into(),
        ))
    }

    fn get_job(&self, job_id: &str) -> Result<JobRecord, RemoteError> {
        Ok(JobRecord {
            name: job_id.to_string(),
            ..JobRecord::default()
        })
    }
}

fn container(temp: &TempDir, client: Arc<RecordingClient>, what_if: bool) -> ServiceContainer {
    testing::init_test_setup();
    let settings = Settings {
        base_dir: temp.path().to_path_buf(),
        ..Settings::default()
    };
    let store = Arc::new(JsonProfileStore::new(settings.profile_path()));
    if what_if {
        ServiceContainer::with_deps(settings, client, store, Arc::new(WhatIf))
    } else {
        ServiceContainer::with_deps(settings, client, store, Arc::new(AssumeYes))
    }
}

#[test]
fn given_policy_new_with_yes_when_dispatched_then_policy_created() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(RecordingClient::default());
    let container = container(&temp, client.clone(), false);
    let cli = Cli::try_parse_from([
        "azrm",
        "--yes",
        "--output",
        "json",
        "policy",
        "new",
        "--name",
        "p1",
        "--replication-provider",
        "HyperVReplicaAzure",
        "--replication-frequency-in-seconds",
        "900",
    ])
    .unwrap();

    dispatch(&cli, &container).unwrap();

    assert_eq!(*client.created.lock().unwrap(), vec!["p1".to_string()]);
}

#[test]
fn given_what_if_when_dispatched_then_nothing_created_and_success() {
    let temp = TempDir::new().unwrap();
    let client = Arc::new(RecordingClient::default());
    let container = container(&temp, client.clone(), true);
    let cli = Cli::try_parse_from([
        "azrm",
        "--what-if",
        "new-asr-policy",
        "--name",
        "p1",
        "--replication-provider",
        "HyperVReplica2012R2",
        "--replication-frequency-in-seconds",
        "30",
        "--replication-port",
        "8083",
    ])
    .unwrap();

    dispatch(&cli, &container).unwrap();

    assert!(client.created.lock().unwrap().is_empty());
}

#[test]
fn given_unknown_mode_when_dispatched_then_usage_exit_code() {
    let temp = TempDir::new().unwrap();
    let container = container(&temp, Arc::new(RecordingClient::default()), false);
    let cli = Cli::try_parse_from([
        "azrm",
        "policy",
        "new",
        "--mode",
        "e2x",
        "--name",
        "p1",
    ])
    .unwrap();

    let err = dispatch(&cli, &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_added_environment_when_shown_then_found() {
    let temp = TempDir::new().unwrap();
    let container = container(&temp, Arc::new(RecordingClient::default()), false);
    let add = Cli::try_parse_from([
        "azrm",
        "environment",
        "add",
        "Stack",
        "--resource-manager-endpoint",
        "https://management.local/",
    ])
    .unwrap();
    let show = Cli::try_parse_from(["azrm", "environment", "show", "stack"]).unwrap();
    let missing = Cli::try_parse_from(["azrm", "environment", "show", "other"]).unwrap();

    dispatch(&add, &container).unwrap();
    dispatch(&show, &container).unwrap();
    let err = dispatch(&missing, &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}
