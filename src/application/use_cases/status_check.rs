use crate::application::services::repo_manager::{RepoManager, RepoOperation};
use crate::application::use_cases::batch_operation::{run_batch, BatchOutcome, BatchSelection};
use crate::common::result::NestrepoResult;
use crate::domain::entities::project_config::ProjectConfig;

/// Status check settings
#[derive(Debug, Clone, Default)]
pub struct StatusCheckConfig {
    /// Only repositories matching this filter (all when `None`)
    pub filter: Option<String>,

    pub timeout_secs: Option<u64>,
}

/// Working-tree status across the configured repositories
pub struct StatusCheckUseCase {
    config: StatusCheckConfig,
}

impl StatusCheckUseCase {
    pub fn new(config: StatusCheckConfig) -> Self {
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
        run_batch(manager, project, RepoOperation::Status, &selection).await
    }
}
