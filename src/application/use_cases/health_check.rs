use crate::application::services::repo_manager::{RepoManager, RepoOperation};
use crate::application::use_cases::batch_operation::{run_batch, BatchOutcome, BatchSelection};
use crate::common::result::NestrepoResult;
use crate::domain::entities::project_config::ProjectConfig;

#[derive(Debug, Clone, Default)]
pub struct HealthCheckConfig {
    pub filter: Option<String>,

    /// Also probe the preferred remote (bounded by the probe timeout)
    pub check_remote: bool,

    pub timeout_secs: Option<u64>,
}

/// Per-repository health: path, git metadata, default branch, parent link, optionally remote
pub struct HealthCheckUseCase {
    config: HealthCheckConfig,
}

impl HealthCheckUseCase {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        manager: &RepoManager,
        project: &ProjectConfig,
    ) -> NestrepoResult<BatchOutcome> {
        let selection = BatchSelection {
            filter: self.config.filter.clone(),
            timeout_secs: self.config.timeout_secs,
        };
        let operation = RepoOperation::Health {
            check_remote: self.config.check_remote,
        };
        run_batch(manager, project, operation, &selection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::repo_manager::OperationReport;
    use crate::domain::entities::operation_results::{CheckStatus, HealthCheckKind};
    use crate::domain::entities::repository_entry::RepositoryEntry;
    use crate::infrastructure::git::git_operations::MockGitOperations;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn project_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for repo in ["core", "core/plugins/auth"] {
            std::fs::create_dir_all(temp_dir.path().join(repo).join(".git")).unwrap();
        }
        temp_dir
    }

    fn project_config() -> ProjectConfig {
        ProjectConfig::new(vec![
            RepositoryEntry::new("core", "core", "main"),
            RepositoryEntry::new("core-plugins-auth", "core/plugins/auth", "main")
                .with_parent("core"),
        ])
    }

    #[tokio::test]
    async fn test_filtered_child_still_checks_parent_link() {
        let temp_dir = project_tree();
        let mut git = MockGitOperations::new();
        git.expect_is_git_repo()
            .returning(|path: &Path| path.join(".git").exists());
        git.expect_branch_exists()
            .returning(|_: &Path, _: &str| Ok(true));
        let manager = RepoManager::new(temp_dir.path(), Arc::new(git));

        let outcome = HealthCheckUseCase::new(HealthCheckConfig {
            filter: Some("auth".to_string()),
            ..Default::default()
        })
        .execute(&manager, &project_config())
        .await
        .unwrap();

        let OperationReport::Health(report) = &outcome.report else {
            panic!("Expected health report");
        };
        assert_eq!(report.results.len(), 1);
        let parent_link = report.results[0].check(HealthCheckKind::ParentLink).unwrap();
        assert_eq!(parent_link.status, CheckStatus::Passed);
        assert!(report.results[0].check(HealthCheckKind::RemoteReachable).is_none());
        assert_eq!(outcome.exit_code(), 0);
    }
}
