//! JSON-file backed environment profile

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::EnvironmentRecord;
use crate::infrastructure::traits::ProfileStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    environments: Vec<EnvironmentRecord>,
}

/// Stores environments in a single JSON file.
///
/// A missing file is an empty profile. Writes go through a sibling temp file
/// and a rename.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> ApplicationResult<ProfileFile> {
        if !self.path.exists() {
            return Ok(ProfileFile::default());
        }
        let content = fs::read_to_string(&self.path).with_path_context("read profile", &self.path)?;
        if content.trim().is_empty() {
            return Ok(ProfileFile::default());
        }
        serde_json::from_str(&content).with_path_context("parse profile", &self.path)
    }

    fn write(&self, profile: &ProfileFile) -> ApplicationResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_path_context("create profile directory", parent)?;
        }
        let content =
            serde_json::to_string_pretty(profile).with_path_context("serialize profile", &self.path)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).with_path_context("write profile", &tmp)?;
        fs::rename(&tmp, &self.path).with_path_context("replace profile", &self.path)?;
        Ok(())
    }
}

impl ProfileStore for JsonProfileStore {
    #[instrument(level = "debug", skip(self, record), fields(name = %record.name))]
    fn add_or_set_environment(
        &self,
        record: EnvironmentRecord,
    ) -> ApplicationResult<EnvironmentRecord> {
        if record.is_builtin() {
            return Err(ApplicationError::BuiltinEnvironment(record.name));
        }

        let mut profile = self.read()?;
        let existing = profile
            .environments
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(&record.name));
        let stored = match existing {
            Some(idx) => {
                debug!("updating existing environment {}", profile.environments[idx].name);
                let merged = profile.environments[idx].merge(&record);
                profile.environments[idx] = merged.clone();
                merged
            }
            None => {
                debug!("adding new environment {}", record.name);
                profile.environments.push(record.clone());
                record
            }
        };
        profile
            .environments
            .sort_by_key(|e| e.name.to_ascii_lowercase());

        self.write(&profile)?;
        Ok(stored)
    }

    fn get_environment(&self, name: &str) -> ApplicationResult<Option<EnvironmentRecord>> {
        Ok(self
            .read()?
            .environments
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name)))
    }

    fn list_environments(&self) -> ApplicationResult<Vec<EnvironmentRecord>> {
        let mut environments = self.read()?.environments;
        environments.sort_by_key(|e| e.name.to_ascii_lowercase());
        Ok(environments)
    }
}
