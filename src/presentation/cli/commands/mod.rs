pub mod exec;
pub mod health;
pub mod init;
pub mod status;

pub use exec::ExecCommand;
pub use health::HealthCommand;
pub use init::InitCommand;
pub use status::StatusCommand;

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::OutputFormat;
use crate::application::services::repo_manager::RepoManager;
use crate::application::use_cases::batch_operation::BatchOutcome;
use crate::domain::entities::project_config::ProjectConfig;
use crate::common::error::NestrepoError;
use crate::common::result::NestrepoResult;
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::git::GitOperations;
use crate::presentation::ui::DisplayHelper;

/// Everything a command handler needs from the global flags
pub struct CommandContext {
    pub project_root: PathBuf,
    pub config_path: PathBuf,
    pub output: OutputFormat,
    pub display: DisplayHelper,
    pub git: Arc<dyn GitOperations>,
}

impl CommandContext {
    pub fn store(&self) -> ConfigStore {
        ConfigStore::with_path(self.config_path.clone())
    }

    pub fn manager(&self) -> RepoManager {
        RepoManager::new(self.project_root.clone(), Arc::clone(&self.git))
    }

    pub fn is_text(&self) -> bool {
        self.output == OutputFormat::Text
    }

    /// Load the project configuration; nothing is touched when this fails
    pub async fn load_config(&self) -> NestrepoResult<ProjectConfig> {
        Ok(self.store().load().await?)
    }

    /// Error line, its fix, and every violation of a rejected configuration
    pub fn report_error(&self, error: &NestrepoError) {
        self.display.failure(&error.to_string(), &error.recommendation());
        self.display.violations(error.violations());
    }

    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print the closing summary (or the whole outcome as JSON) and return the exit code
    pub fn finish(&self, outcome: &BatchOutcome) -> anyhow::Result<i32> {
        if !self.is_text() {
            self.print_json(outcome)?;
            return Ok(outcome.exit_code());
        }

        if let (true, Some(filter)) = (outcome.matched_nothing(), &outcome.filter) {
            self.display.warning(&format!(
                "No repository matches '{}' ({} configured)",
                filter, outcome.configured
            ));
            return Ok(outcome.exit_code());
        }
        self.display.print_summary(outcome.operation, &outcome.summary);
        Ok(outcome.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::git::GitCli;
    use tempfile::TempDir;

    fn context(root: &std::path::Path) -> CommandContext {
        CommandContext {
            project_root: root.to_path_buf(),
            config_path: root.join("project-repos.json"),
            output: OutputFormat::Text,
            display: DisplayHelper::new(false, false),
            git: Arc::new(GitCli::new()),
        }
    }

    #[tokio::test]
    async fn test_load_config_reports_missing_file_as_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let error = context(temp_dir.path()).load_config().await.unwrap_err();

        assert!(matches!(error, NestrepoError::Config(_)));
        assert!(error.recommendation().contains("repo init"));
        assert!(error.violations().is_empty());
    }

    #[tokio::test]
    async fn test_load_config_carries_violations() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("project-repos.json"),
            r#"{"version": "1.0", "repositories": [{"name": "a", "path": "a"}]}"#,
        )
        .unwrap();

        let error = context(temp_dir.path()).load_config().await.unwrap_err();
        assert_eq!(error.violations().len(), 1);
    }
}
