use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::repository_entry::RepositoryEntry;
use crate::domain::value_objects::path_resolver::PathResolver;

/// Current configuration document version
pub const CONFIG_VERSION: &str = "1.0";

/// File name of the configuration document at the project root
pub const CONFIG_FILE_NAME: &str = "project-repos.json";

/// Default scan depth used by `init`
pub const DEFAULT_SCAN_DEPTH: usize = 3;

/// Default remote preferred by discovery and the reachability check
pub const DEFAULT_REMOTE: &str = "origin";

/// The repository-set configuration document (`project-repos.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub version: String,

    pub repositories: Vec<RepositoryEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, GroupConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettings>,
}

/// Display metadata for a repository group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Project-wide settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[validate(length(min = 1, message = "defaultRemote must not be empty"))]
    pub default_remote: String,

    #[validate(range(min = 1, max = 32, message = "scanDepth must be between 1 and 32"))]
    pub scan_depth: usize,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            default_remote: DEFAULT_REMOTE.to_string(),
            scan_depth: DEFAULT_SCAN_DEPTH,
        }
    }
}

impl ProjectConfig {
    /// Create a configuration at the current version
    pub fn new(repositories: Vec<RepositoryEntry>) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            repositories,
            groups: None,
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Settings, falling back to defaults when the section is absent
    pub fn effective_settings(&self) -> ProjectSettings {
        self.settings.clone().unwrap_or_default()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RepositoryEntry> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Look up an entry by path, comparing normalized forms
    pub fn find_by_path(&self, path: &str) -> Option<&RepositoryEntry> {
        let wanted = PathResolver::normalize(path);
        self.repositories
            .iter()
            .find(|r| r.normalized_path() == wanted)
    }

    /// Entries selected by an optional `--filter`, in configuration order
    pub fn select(&self, filter: Option<&str>) -> Vec<RepositoryEntry> {
        match filter {
            Some(filter) => self
                .repositories
                .iter()
                .filter(|r| r.matches_filter(filter))
                .cloned()
                .collect(),
            None => self.repositories.clone(),
        }
    }
}
