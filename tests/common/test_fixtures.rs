//! Project tree fixtures
//!
//! Repositories are marked with an empty `.git` directory, which is all discovery and
//! [`super::mock_services::FakeGit`] look at.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use nestrepo::domain::entities::project_config::{ProjectConfig, CONFIG_FILE_NAME};
use nestrepo::domain::entities::repository_entry::RepositoryEntry;

pub struct ProjectTree {
    temp_dir: TempDir,
}

impl ProjectTree {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn config_path(&self) -> PathBuf {
        self.path(CONFIG_FILE_NAME)
    }

    /// Mark `relative` as a repository
    pub fn with_repo(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.path(relative).join(".git")).unwrap();
        self
    }

    pub fn with_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
        self
    }

    /// Write `project-repos.json` as-is, bypassing validation
    pub fn with_raw_config(self, json: &str) -> Self {
        std::fs::write(self.config_path(), json).unwrap();
        self
    }

    pub fn with_config(self, config: &ProjectConfig) -> Self {
        let json = serde_json::to_string_pretty(config).unwrap();
        self.with_raw_config(&json)
    }

    pub fn read_config(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.config_path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

/// `backend` with a repository nested under `vendor/lib`, plus `frontend`
pub fn nested_project() -> ProjectTree {
    ProjectTree::new()
        .with_repo("backend")
        .with_repo("backend/vendor/lib")
        .with_repo("frontend")
        .with_dir("docs")
        .with_repo("node_modules/left-pad")
}

/// Configuration matching [`nested_project`]
pub fn nested_config() -> ProjectConfig {
    ProjectConfig::new(vec![
        RepositoryEntry::new("backend", "backend", "main").with_group("server"),
        RepositoryEntry::new("backend-vendor-lib", "backend/vendor/lib", "main")
            .with_parent("backend"),
        RepositoryEntry::new("frontend", "frontend", "main").with_group("web"),
    ])
}
