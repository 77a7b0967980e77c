//! CLI argument definitions using clap
//!
//! Alternate parameter names are clap aliases; the layers below only see
//! canonical field names.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{EnvironmentParams, PolicyParams};

/// Azure environment profiles and Site Recovery replication policies
#[derive(Parser, Debug)]
#[command(name = "azrm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Confirm state-changing operations without prompting
    #[arg(short, long, global = true, conflicts_with = "what_if")]
    pub yes: bool,

    /// Show what would happen without performing it
    #[arg(long, global = true)]
    pub what_if: bool,

    /// Result format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Load settings from this file instead of the global and local config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage named Azure environments
    Environment {
        #[command(subcommand)]
        command: EnvironmentCommands,
    },

    /// Manage Site Recovery replication policies
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },

    /// Create a replication policy (same as `policy new`)
    #[command(name = "new-asr-policy", alias = "new-azure-rm-recovery-services-asr-policy")]
    NewAsrPolicy(PolicyNewArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum EnvironmentCommands {
    /// Add or update a named environment
    #[command(alias = "set")]
    Add(EnvironmentAddArgs),

    /// List stored environments
    List,

    /// Show one environment
    Show {
        /// Environment name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PolicyCommands {
    /// Create a replication policy
    New(PolicyNewArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnvironmentAddArgs {
    /// Environment name
    pub name: String,

    /// URL to download publish settings files
    #[arg(long)]
    pub publish_settings_file_url: Option<String>,

    /// Service management endpoint
    #[arg(long, visible_alias = "service-management", alias = "service-management-url")]
    pub service_endpoint: Option<String>,

    /// Management portal URL
    #[arg(long)]
    pub management_portal_url: Option<String>,

    /// Storage endpoint suffix
    #[arg(long, alias = "storage-endpoint-suffix")]
    pub storage_endpoint: Option<String>,

    /// Active Directory authority (a trailing `/` is added)
    #[arg(
        long,
        visible_alias = "ad-endpoint-url",
        aliases = ["active-directory", "active-directory-authority"]
    )]
    pub active_directory_endpoint: Option<String>,

    /// Resource manager endpoint
    #[arg(long, aliases = ["resource-manager", "resource-manager-url"])]
    pub resource_manager_endpoint: Option<String>,

    /// Gallery endpoint
    #[arg(long, aliases = ["gallery", "gallery-url"])]
    pub gallery_endpoint: Option<String>,

    /// Token audience for the service management endpoint
    #[arg(long)]
    pub active_directory_service_endpoint_resource_id: Option<String>,

    /// Graph endpoint
    #[arg(long, aliases = ["graph", "graph-url"])]
    pub graph_endpoint: Option<String>,

    /// Key Vault DNS suffix
    #[arg(long)]
    pub azure_key_vault_dns_suffix: Option<String>,

    /// Key Vault token audience
    #[arg(long)]
    pub azure_key_vault_service_endpoint_resource_id: Option<String>,

    /// Traffic Manager DNS suffix
    #[arg(long)]
    pub traffic_manager_dns_suffix: Option<String>,

    /// SQL Database DNS suffix
    #[arg(long)]
    pub sql_database_dns_suffix: Option<String>,

    /// Data Lake Store file system endpoint suffix
    #[arg(long)]
    pub azure_data_lake_store_file_system_endpoint_suffix: Option<String>,

    /// Data Lake Analytics catalog and job endpoint suffix
    #[arg(long)]
    pub azure_data_lake_analytics_catalog_and_job_endpoint_suffix: Option<String>,

    /// Authenticate against ADFS (on-premise)
    #[arg(long, visible_alias = "on-premise")]
    pub enable_adfs_authentication: bool,

    /// Default Active Directory tenant
    #[arg(long)]
    pub ad_tenant: Option<String>,

    /// Graph token audience
    #[arg(long, aliases = ["graph-endpoint-resource-id", "graph-resource-id"])]
    pub graph_audience: Option<String>,

    /// Data Lake token audience
    #[arg(long, aliases = ["data-lake-endpoint-resource-id", "data-lake-resource-id"])]
    pub data_lake_audience: Option<String>,
}

impl From<EnvironmentAddArgs> for EnvironmentParams {
    fn from(a: EnvironmentAddArgs) -> Self {
        Self {
            name: a.name,
            publish_settings_file_url: a.publish_settings_file_url,
            service_endpoint: a.service_endpoint,
            management_portal_url: a.management_portal_url,
            storage_endpoint: a.storage_endpoint,
            active_directory_endpoint: a.active_directory_endpoint,
            resource_manager_endpoint: a.resource_manager_endpoint,
            gallery_endpoint: a.gallery_endpoint,
            active_directory_service_endpoint_resource_id: a
                .active_directory_service_endpoint_resource_id,
            graph_endpoint: a.graph_endpoint,
            azure_key_vault_dns_suffix: a.azure_key_vault_dns_suffix,
            azure_key_vault_service_endpoint_resource_id: a
                .azure_key_vault_service_endpoint_resource_id,
            traffic_manager_dns_suffix: a.traffic_manager_dns_suffix,
            sql_database_dns_suffix: a.sql_database_dns_suffix,
            azure_data_lake_store_file_system_endpoint_suffix: a
                .azure_data_lake_store_file_system_endpoint_suffix,
            azure_data_lake_analytics_catalog_and_job_endpoint_suffix: a
                .azure_data_lake_analytics_catalog_and_job_endpoint_suffix,
            enable_adfs_authentication: a.enable_adfs_authentication,
            ad_tenant: a.ad_tenant,
            graph_audience: a.graph_audience,
            data_lake_audience: a.data_lake_audience,
        }
    }
}

/// Policy fields are passed through as given; values are checked by the
/// domain validator so that errors name the allowed values.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyNewArgs {
    /// Parameter set: e2a (to Azure) or e2e (site to site); inferred when omitted
    #[arg(long, value_name = "SET")]
    pub mode: Option<String>,

    /// Policy name
    #[arg(long)]
    pub name: Option<String>,

    /// HyperVReplica2012R2, HyperVReplica2012 or HyperVReplicaAzure
    #[arg(long)]
    pub replication_provider: Option<String>,

    /// Online or Offline
    #[arg(long)]
    pub replication_method: Option<String>,

    /// 30, 300 or 900
    #[arg(long)]
    pub replication_frequency_in_seconds: Option<String>,

    #[arg(long, visible_alias = "recovery-points", allow_negative_numbers = true)]
    pub number_of_recovery_points_to_retain: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub application_consistent_snapshot_frequency_in_hours: Option<i64>,

    /// Enable or Disable
    #[arg(long)]
    pub compression: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub replication_port: Option<i64>,

    /// Certificate or Kerberos
    #[arg(long)]
    pub authentication: Option<String>,

    /// Time of day to start initial replication, `[d.]hh:mm[:ss]`
    #[arg(long)]
    pub replication_start_time: Option<String>,

    /// Required or NotRequired
    #[arg(long)]
    pub replica_deletion: Option<String>,

    /// Resource id of the target storage account
    #[arg(long)]
    pub recovery_azure_storage_account_id: Option<String>,

    /// Enable or Disable
    #[arg(long)]
    pub encryption: Option<String>,
}

impl From<PolicyNewArgs> for PolicyParams {
    fn from(a: PolicyNewArgs) -> Self {
        Self {
            name: a.name,
            replication_provider: a.replication_provider,
            replication_method: a.replication_method,
            replication_frequency_in_seconds: a.replication_frequency_in_seconds,
            number_of_recovery_points_to_retain: a.number_of_recovery_points_to_retain,
            application_consistent_snapshot_frequency_in_hours: a
                .application_consistent_snapshot_frequency_in_hours,
            compression: a.compression,
            replication_port: a.replication_port,
            authentication: a.authentication,
            replication_start_time: a.replication_start_time,
            replica_deletion: a.replica_deletion,
            recovery_azure_storage_account_id: a.recovery_azure_storage_account_id,
            encryption: a.encryption,
        }
    }
}
