use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::services::repo_discovery::{DiscoveryError, DiscoveryOptions};
use crate::application::services::repo_manager::RepoManager;
use crate::domain::entities::project_config::{ProjectConfig, ProjectSettings};
use crate::domain::entities::repository_entry::{DiscoveredRepo, RepositoryEntry, FALLBACK_BRANCH};
use crate::infrastructure::filesystem::config_store::{ConfigError, ConfigStore};

#[derive(Debug, Error)]
pub enum InitProjectError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InitProjectError {
    pub fn recommendation(&self) -> String {
        match self {
            Self::Discovery(e) => e.recommendation(),
            Self::Config(e) => e.recommendation(),
        }
    }
}

/// Settings for scanning the project and writing a fresh configuration
#[derive(Debug, Clone)]
pub struct InitProjectConfig {
    /// Scan depth; falls back to `settings.scanDepth` of an existing configuration
    pub max_depth: Option<usize>,

    pub exclude: Vec<String>,

    pub nested: bool,
}

impl Default for InitProjectConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            exclude: Vec::new(),
            nested: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InitProjectResult {
    pub config: ProjectConfig,
    pub config_path: PathBuf,
    pub discovered: Vec<DiscoveredRepo>,
    /// An earlier configuration was overwritten
    pub replaced_existing: bool,
}

/// Scan the project tree and rewrite `project-repos.json` as a whole
pub struct InitProjectUseCase {
    config: InitProjectConfig,
}

impl InitProjectUseCase {
    pub fn new(config: InitProjectConfig) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        manager: &RepoManager,
        store: &ConfigStore,
    ) -> Result<InitProjectResult, InitProjectError> {
        let previous = self.load_previous(store).await;
        let replaced_existing = store.exists();

        let settings = previous
            .as_ref()
            .and_then(|p| p.settings.clone())
            .unwrap_or_default();
        let max_depth = self.config.max_depth.unwrap_or(settings.scan_depth);

        let options = DiscoveryOptions::default()
            .with_max_depth(max_depth)
            .with_exclude(self.config.exclude.clone())
            .with_nested(self.config.nested)
            .with_preferred_remote(settings.default_remote.clone());
        let discovered = manager.discover(&options).await?;

        let repositories = discovered
            .iter()
            .map(|repo| {
                let entry = RepositoryEntry::from_discovered(repo, FALLBACK_BRANCH);
                match &previous {
                    Some(previous) => carry_metadata(entry, previous),
                    None => entry,
                }
            })
            .collect();

        let mut config = ProjectConfig::new(repositories).with_settings(ProjectSettings {
            scan_depth: max_depth,
            ..settings
        });
        config.groups = previous.and_then(|p| p.groups);

        store.save(&config).await?;
        info!(
            count = config.repositories.len(),
            path = %store.path().display(),
            "project initialized"
        );

        Ok(InitProjectResult {
            config,
            config_path: store.path().to_path_buf(),
            discovered,
            replaced_existing,
        })
    }

    /// The configuration being replaced, if it can still be read
    async fn load_previous(&self, store: &ConfigStore) -> Option<ProjectConfig> {
        if !store.exists() {
            return None;
        }
        match store.load().await {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(error = %e, "existing configuration ignored");
                None
            }
        }
    }
}

/// Keep user-maintained metadata of an entry that is still at the same path
fn carry_metadata(mut entry: RepositoryEntry, previous: &ProjectConfig) -> RepositoryEntry {
    if let Some(old) = previous.find_by_path(&entry.path) {
        entry.description = old.description.clone();
        entry.tags = old.tags.clone();
        entry.group = old.group.clone();
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::git_operations::MockGitOperations;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn mock_git() -> MockGitOperations {
        let mut git = MockGitOperations::new();
        git.expect_is_git_repo()
            .returning(|path: &Path| path.join(".git").exists());
        git.expect_current_branch()
            .returning(|_: &Path| Ok(None));
        git.expect_remotes().returning(|_: &Path| Ok(vec![]));
        git
    }

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for repo in ["backend", "backend/vendor/lib", "frontend"] {
            std::fs::create_dir_all(temp_dir.path().join(repo).join(".git")).unwrap();
        }
        temp_dir
    }

    #[tokio::test]
    async fn test_init_writes_discovered_repositories() {
        let temp_dir = tree();
        let manager = RepoManager::new(temp_dir.path(), Arc::new(mock_git()));
        let store = ConfigStore::new(temp_dir.path());

        let result = InitProjectUseCase::new(InitProjectConfig::default())
            .execute(&manager, &store)
            .await
            .unwrap();

        assert!(!result.replaced_existing);
        assert_eq!(result.config.repositories.len(), 3);
        let lib = result.config.find_by_name("backend-vendor-lib").unwrap();
        assert_eq!(lib.parent.as_deref(), Some("backend"));
        assert_eq!(lib.default_branch, "main");
        assert_eq!(lib.remote, None);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, result.config);
        assert_eq!(loaded.effective_settings().scan_depth, 3);
    }

    #[tokio::test]
    async fn test_init_without_nesting() {
        let temp_dir = tree();
        let manager = RepoManager::new(temp_dir.path(), Arc::new(mock_git()));
        let store = ConfigStore::new(temp_dir.path());

        let result = InitProjectUseCase::new(InitProjectConfig {
            nested: false,
            ..Default::default()
        })
        .execute(&manager, &store)
        .await
        .unwrap();

        let paths: Vec<_> = result.config.repositories.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["backend", "frontend"]);
    }

    #[tokio::test]
    async fn test_reinit_keeps_metadata_and_settings() {
        let temp_dir = tree();
        let store = ConfigStore::new(temp_dir.path());
        let previous = ProjectConfig::new(vec![
            RepositoryEntry::new("backend", "backend", "main").with_group("server"),
        ])
        .with_settings(ProjectSettings {
            default_remote: "upstream".to_string(),
            scan_depth: 1,
        });
        store.save(&previous).await.unwrap();

        let manager = RepoManager::new(temp_dir.path(), Arc::new(mock_git()));
        let result = InitProjectUseCase::new(InitProjectConfig::default())
            .execute(&manager, &store)
            .await
            .unwrap();

        assert!(result.replaced_existing);
        // scanDepth 1 stops above backend/vendor/lib
        assert_eq!(result.config.repositories.len(), 2);
        assert_eq!(
            result.config.find_by_name("backend").unwrap().group.as_deref(),
            Some("server")
        );
        assert_eq!(result.config.effective_settings().default_remote, "upstream");
    }
}
