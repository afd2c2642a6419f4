use serde::Serialize;
use tracing::warn;

use crate::application::services::repo_manager::{OperationReport, RepoManager, RepoOperation};
use crate::common::result::{async_helpers, NestrepoResult};
use crate::domain::entities::operation_results::BatchSummary;
use crate::domain::entities::project_config::ProjectConfig;

/// Which repositories a batch targets and how long it may run
#[derive(Debug, Clone, Default)]
pub struct BatchSelection {
    pub filter: Option<String>,
    /// Whole-batch limit; individual repositories are never cancelled mid-command
    pub timeout_secs: Option<u64>,
}

/// Result of one batch over the selected repositories
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub operation: &'static str,
    pub filter: Option<String>,
    pub configured: usize,
    pub report: OperationReport,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    /// A filter was given and selected nothing
    pub fn matched_nothing(&self) -> bool {
        self.filter.is_some() && self.summary.total == 0
    }

    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}

/// Select entries from `config` and run `operation` over them in configuration order
pub async fn run_batch(
    manager: &RepoManager,
    config: &ProjectConfig,
    operation: RepoOperation,
    selection: &BatchSelection,
) -> NestrepoResult<BatchOutcome> {
    let repos = config.select(selection.filter.as_deref());
    if let (Some(filter), true) = (&selection.filter, repos.is_empty()) {
        warn!(filter = %filter, "filter matched no repositories");
    }

    let report = async_helpers::with_optional_timeout(
        async { Ok(manager.run(&operation, &repos, config).await) },
        selection.timeout_secs,
    )
    .await?;

    let summary = report.summary();
    Ok(BatchOutcome {
        operation: operation.name(),
        filter: selection.filter.clone(),
        configured: config.repositories.len(),
        report,
        summary,
    })
}
