//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/azrm/azrm.toml`
//! 3. Local config: `<dir>/.azrm.toml` (usually the working directory)
//! 4. Environment variables: `AZRM_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Resource manager endpoint of the public Azure cloud.
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com/";

/// Site Recovery REST API version.
pub const DEFAULT_API_VERSION: &str = "2016-08-10";

/// Data Lake token audience used by the public cloud and its test rings.
pub const DEFAULT_DATA_LAKE_AUDIENCE: &str = "https://datalake.azure.net";

/// Target vault and transport settings for Site Recovery calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteRecoveryConfig {
    /// Resource manager endpoint (default: public cloud)
    pub resource_manager_endpoint: String,
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    /// Recovery Services vault name
    pub vault_name: Option<String>,
    pub api_version: String,
    /// Bearer token; acquiring one is out of scope
    pub access_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SiteRecoveryConfig {
    fn default() -> Self {
        Self {
            resource_manager_endpoint: DEFAULT_RESOURCE_MANAGER_ENDPOINT.into(),
            subscription_id: None,
            resource_group: None,
            vault_name: None,
            api_version: DEFAULT_API_VERSION.into(),
            access_token: None,
            timeout_secs: 100,
        }
    }
}

/// Defaults applied when adding environments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Data Lake audience used when `--data-lake-audience` is not given.
    /// An empty string disables the default.
    pub default_data_lake_audience: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            default_data_lake_audience: Some(DEFAULT_DATA_LAKE_AUDIENCE.into()),
        }
    }
}

/// Raw configs for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSiteRecoveryConfig {
    pub resource_manager_endpoint: Option<String>,
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    pub vault_name: Option<String>,
    pub api_version: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEnvironmentConfig {
    pub default_data_lake_audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub site_recovery: RawSiteRecoveryConfig,
    pub environment: RawEnvironmentConfig,
}

impl SiteRecoveryConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawSiteRecoveryConfig) -> Self {
        Self {
            resource_manager_endpoint: overlay
                .resource_manager_endpoint
                .clone()
                .unwrap_or_else(|| self.resource_manager_endpoint.clone()),
            subscription_id: overlay
                .subscription_id
                .clone()
                .or_else(|| self.subscription_id.clone()),
            resource_group: overlay
                .resource_group
                .clone()
                .or_else(|| self.resource_group.clone()),
            vault_name: overlay.vault_name.clone().or_else(|| self.vault_name.clone()),
            api_version: overlay
                .api_version
                .clone()
                .unwrap_or_else(|| self.api_version.clone()),
            access_token: overlay
                .access_token
                .clone()
                .or_else(|| self.access_token.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
        }
    }
}

impl EnvironmentConfig {
    pub fn merge(&self, overlay: &RawEnvironmentConfig) -> Self {
        Self {
            default_data_lake_audience: overlay
                .default_data_lake_audience
                .clone()
                .or_else(|| self.default_data_lake_audience.clone()),
        }
    }
}

/// Unified configuration for azrm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory for azrm state (default: ~/.azrm)
    pub base_dir: PathBuf,
    pub site_recovery: SiteRecoveryConfig,
    pub environment: EnvironmentConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            site_recovery: SiteRecoveryConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

/// Get the default base directory (~/.azrm).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".azrm"))
        .unwrap_or_else(|| PathBuf::from("~/.azrm"))
}

/// Get the XDG config directory for azrm.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "azrm").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("azrm.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".azrm.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Path of the environment profile file.
    pub fn profile_path(&self) -> PathBuf {
        self.base_dir.join("profile.json")
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.base_dir.to_string_lossy().as_ref());
        self.base_dir = PathBuf::from(expanded);
    }

    /// Overlay config onto self: scalars from overlay win when present.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            site_recovery: self.site_recovery.merge(&overlay.site_recovery),
            environment: self.environment.merge(&overlay.environment),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.azrm.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Load from one explicit file on top of the defaults (`--config`).
    ///
    /// Environment variables still apply.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let mut current = Self::default().merge_with(&raw);
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply AZRM_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("AZRM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;
        Ok(Self::apply_overrides_from(settings, &config))
    }

    fn apply_overrides_from(mut settings: Self, config: &Config) -> Self {
        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        let sr = &mut settings.site_recovery;
        if let Ok(val) = config.get_string("site_recovery.resource_manager_endpoint") {
            sr.resource_manager_endpoint = val;
        }
        if let Ok(val) = config.get_string("site_recovery.subscription_id") {
            sr.subscription_id = Some(val);
        }
        if let Ok(val) = config.get_string("site_recovery.resource_group") {
            sr.resource_group = Some(val);
        }
        if let Ok(val) = config.get_string("site_recovery.vault_name") {
            sr.vault_name = Some(val);
        }
        if let Ok(val) = config.get_string("site_recovery.api_version") {
            sr.api_version = val;
        }
        if let Ok(val) = config.get_string("site_recovery.access_token") {
            sr.access_token = Some(val);
        }
        if let Ok(val) = config.get_int("site_recovery.timeout_secs") {
            if let Ok(secs) = u64::try_from(val) {
                sr.timeout_secs = secs;
            }
        }
        if let Ok(val) = config.get_string("environment.default_data_lake_audience") {
            settings.environment.default_data_lake_audience = Some(val);
        }
        settings
    }

    /// Data Lake audience default, `None` when disabled.
    pub fn default_data_lake_audience(&self) -> Option<String> {
        self.environment
            .default_data_lake_audience
            .clone()
            .filter(|v| !v.trim().is_empty())
    }

    /// Show the effective configuration as TOML, with the access token masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.site_recovery.access_token.is_some() {
            shown.site_recovery.access_token = Some("********".into());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# azrm configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/azrm/azrm.toml
#   Local:  ./.azrm.toml
#   Env:    AZRM_* environment variables, e.g. AZRM_SITE_RECOVERY__VAULT_NAME

# Base directory for azrm state (environment profile: base_dir/profile.json)
# base_dir = "~/.azrm"

[site_recovery]
# resource_manager_endpoint = "https://management.azure.com/"
# subscription_id = "00000000-0000-0000-0000-000000000000"
# resource_group = "recovery-rg"
# vault_name = "recovery-vault"
# api_version = "2016-08-10"
# Prefer AZRM_SITE_RECOVERY__ACCESS_TOKEN over storing a token here
# access_token = "eyJ..."
# timeout_secs = 100

[environment]
# Data Lake audience used when --data-lake-audience is not given ("" disables)
# default_data_lake_audience = "https://datalake.azure.net"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_points_at_public_cloud() {
        let settings = Settings::default();
        assert!(settings.base_dir.to_string_lossy().contains(".azrm"));
        assert_eq!(
            settings.site_recovery.resource_manager_endpoint,
            DEFAULT_RESOURCE_MANAGER_ENDPOINT
        );
        assert_eq!(settings.site_recovery.api_version, DEFAULT_API_VERSION);
        assert_eq!(
            settings.default_data_lake_audience().as_deref(),
            Some(DEFAULT_DATA_LAKE_AUDIENCE)
        );
    }

    #[test]
    fn given_overlay_when_merging_then_specified_values_win() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
[site_recovery]
vault_name = "vault-a"
timeout_secs = 30
"#,
        )
        .unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.site_recovery.vault_name.as_deref(), Some("vault-a"));
        assert_eq!(merged.site_recovery.timeout_secs, 30);
        assert_eq!(merged.site_recovery.api_version, DEFAULT_API_VERSION);
        assert_eq!(merged.base_dir, base.base_dir);
    }

    #[test]
    fn given_empty_audience_when_reading_default_then_disabled() {
        let mut settings = Settings::default();
        settings.environment.default_data_lake_audience = Some(String::new());
        assert_eq!(settings.default_data_lake_audience(), None);
    }

    #[test]
    fn given_tilde_in_base_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            base_dir: PathBuf::from("~/.azrm"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let base = settings.base_dir.to_string_lossy();
        assert!(base.starts_with(&home), "base_dir should start with home: {}", base);
        assert!(!base.contains('~'));
    }

    #[test]
    fn given_config_source_when_applying_overrides_then_values_replace() {
        let config = Config::builder()
            .set_override("site_recovery.vault_name", "from-env")
            .unwrap()
            .set_override("site_recovery.timeout_secs", 5)
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::apply_overrides_from(Settings::default(), &config);

        assert_eq!(settings.site_recovery.vault_name.as_deref(), Some("from-env"));
        assert_eq!(settings.site_recovery.timeout_secs, 5);
    }

    #[test]
    fn given_token_when_showing_config_then_masked() {
        let mut settings = Settings::default();
        settings.site_recovery.access_token = Some("secret-token".into());
        let shown = settings.to_toml().unwrap();
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.base_dir.is_none());
    }
}
