use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use crate::application::services::repo_manager::OperationReport;
use crate::application::use_cases::status_check::{StatusCheckConfig, StatusCheckUseCase};
use crate::domain::entities::operation_results::{GitStatusSummary, RepoStatus};

/// Handler for `repo status`
pub struct StatusCommand {
    pub filter: Option<String>,
    pub timeout: Option<u64>,
    pub verbose: bool,
}

impl StatusCommand {
    pub async fn execute(&self, context: &CommandContext) -> Result<i32> {
        let project = match context.load_config().await {
            Ok(project) => project,
            Err(e) => {
                context.report_error(&e);
                return Ok(1);
            }
        };

        let use_case = StatusCheckUseCase::new(StatusCheckConfig {
            filter: self.filter.clone(),
            timeout_secs: self.timeout,
        });
        let outcome = match use_case.execute(&context.manager(), &project).await {
            Ok(outcome) => outcome,
            Err(e) => {
                context.report_error(&e);
                return Ok(1);
            }
        };

        if let (true, OperationReport::Status(report)) = (context.is_text(), &outcome.report) {
            for result in &report.results {
                self.print_repo(context, result);
            }
        }
        context.finish(&outcome)
    }

    fn print_repo(&self, context: &CommandContext, result: &RepoStatus) {
        let display = &context.display;
        let label = format!("{} ({})", display.format_repo(&result.name), result.path);

        let Some(status) = &result.status else {
            if let Some(error) = &result.error {
                display.failure(&format!("{}: {}", label, error.message), &error.recommendation);
            }
            return;
        };

        let mut line = label;
        if let Some(branch) = &status.branch {
            line.push_str(&format!(" on {}", display.format_branch(branch)));
        } else {
            line.push_str(&format!(" {}", "(detached)".dimmed()));
        }
        if status.is_out_of_sync() {
            line.push_str(&format!(" ↑{} ↓{}", status.ahead, status.behind));
        }

        if status.is_clean() {
            display.success(&format!("{} {}", line, "clean".green()));
        } else {
            display.warning(&format!("{} {}", line, describe_changes(status).yellow()));
        }

        if self.verbose {
            match &status.upstream {
                Some(upstream) => display.print_indented(&format!("upstream: {}", upstream), 1),
                None => display.print_indented("upstream: none", 1),
            }
        }
    }
}

/// e.g. "2 modified, 1 untracked"
fn describe_changes(status: &GitStatusSummary) -> String {
    [
        (status.modified, "modified"),
        (status.added, "added"),
        (status.deleted, "deleted"),
        (status.untracked, "untracked"),
        (status.conflicted, "conflicted"),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {}", count, label))
    .collect::<Vec<_>>()
    .join(", ")
}
