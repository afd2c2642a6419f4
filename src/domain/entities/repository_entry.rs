use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::value_objects::path_resolver::PathResolver;

/// Branch recorded when discovery could not determine one
pub const FALLBACK_BRANCH: &str = "main";

/// One configured repository inside the project tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEntry {
    /// Unique identifier
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// Path relative to the project root, always with `/` separators
    #[validate(length(min = 1, message = "path must not be empty"))]
    pub path: String,

    /// Remote URL, written as `null` when absent
    #[serde(default)]
    #[validate(length(min = 1, message = "remote must not be empty when present"))]
    pub remote: Option<String>,

    #[validate(length(min = 1, message = "defaultBranch must not be empty"))]
    pub default_branch: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Path of the immediately enclosing repository, written as `null` when top-level
    #[serde(default)]
    pub parent: Option<String>,
}

impl RepositoryEntry {
    /// Create a top-level entry without a remote
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: PathResolver::normalize(&path.into()),
            remote: None,
            default_branch: default_branch.into(),
            description: None,
            tags: None,
            group: None,
            parent: None,
        }
    }

    /// Build the persisted entry for a freshly discovered repository
    pub fn from_discovered(repo: &DiscoveredRepo, fallback_branch: &str) -> Self {
        Self {
            name: repo.name.clone(),
            path: repo.path.clone(),
            remote: repo.remote.clone(),
            default_branch: repo
                .branch
                .clone()
                .unwrap_or_else(|| fallback_branch.to_string()),
            description: None,
            tags: None,
            group: None,
            parent: repo.parent.clone(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(PathResolver::normalize(&parent.into()));
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Path in persisted normal form
    pub fn normalized_path(&self) -> String {
        PathResolver::normalize(&self.path)
    }

    /// Parent path in persisted normal form
    pub fn normalized_parent(&self) -> Option<String> {
        self.parent.as_deref().map(PathResolver::normalize)
    }

    /// Whether `filter` selects this entry: a substring of the name or path, or the exact group
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.name.contains(filter)
            || self.path.contains(filter)
            || self.group.as_deref() == Some(filter)
    }
}

/// Scan-time shape of a repository before it is written into a [`RepositoryEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredRepo {
    /// Normalized path relative to the scan root (`"."` for the root itself)
    pub path: String,
    pub name: String,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub has_remote: bool,
    /// Path of the nearest enclosing discovered repository
    pub parent: Option<String>,
}

impl DiscoveredRepo {
    pub fn new(path: impl Into<String>, name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            remote: None,
            branch: None,
            has_remote: false,
            parent,
        }
    }
}
