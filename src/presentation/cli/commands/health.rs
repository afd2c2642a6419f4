use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use crate::application::services::repo_manager::OperationReport;
use crate::application::use_cases::health_check::{HealthCheckConfig, HealthCheckUseCase};
use crate::domain::entities::operation_results::{CheckStatus, HealthCheckResult};

/// Handler for `repo health`
pub struct HealthCommand {
    pub filter: Option<String>,
    pub check_remote: bool,
    pub timeout: Option<u64>,
}

impl HealthCommand {
    pub async fn execute(&self, context: &CommandContext) -> Result<i32> {
        let project = match context.load_config().await {
            Ok(project) => project,
            Err(e) => {
                context.report_error(&e);
                return Ok(1);
            }
        };

        let use_case = HealthCheckUseCase::new(HealthCheckConfig {
            filter: self.filter.clone(),
            check_remote: self.check_remote,
            timeout_secs: self.timeout,
        });
        let outcome = match use_case.execute(&context.manager(), &project).await {
            Ok(outcome) => outcome,
            Err(e) => {
                context.report_error(&e);
                return Ok(1);
            }
        };

        if let (true, OperationReport::Health(report)) = (context.is_text(), &outcome.report) {
            for result in &report.results {
                print_result(context, result);
            }
        }
        context.finish(&outcome)
    }
}

fn print_result(context: &CommandContext, result: &HealthCheckResult) {
    let display = &context.display;
    let label = format!("{} ({})", display.format_repo(&result.name), result.path);
    if result.is_healthy() {
        display.success(&label);
    } else {
        display.error(&label);
    }

    for check in &result.checks {
        let mark = match check.status {
            CheckStatus::Passed => "pass".green(),
            CheckStatus::Failed => "FAIL".red().bold(),
            CheckStatus::Skipped => "skip".dimmed(),
        };
        display.print_indented(
            &format!("{} {:<18} {}", mark, check.kind.label(), check.message),
            1,
        );
        if let Some(recommendation) = &check.recommendation {
            display.print_indented(&format!("fix: {}", recommendation), 3);
        }
    }
}
