use anyhow::Result;

use super::CommandContext;
use crate::application::services::repo_manager::OperationReport;
use crate::application::use_cases::exec_command::{ExecCommandConfig, ExecCommandUseCase};
use crate::domain::entities::operation_results::{ExecReport, ExecResult};

/// Handler for `repo exec`
pub struct ExecCommand {
    pub command: String,
    pub filter: Option<String>,
    pub timeout: Option<u64>,
}

impl ExecCommand {
    pub async fn execute(&self, context: &CommandContext) -> Result<i32> {
        let project = match context.load_config().await {
            Ok(project) => project,
            Err(e) => {
                context.report_error(&e);
                return Ok(1);
            }
        };

        let use_case = ExecCommandUseCase::new(
            ExecCommandConfig::new(self.command.clone())
                .with_filter(self.filter.clone())
                .with_timeout(self.timeout),
        );
        let outcome = match use_case.execute(&context.manager(), &project).await {
            Ok(outcome) => outcome,
            Err(e) => {
                context.display.failure(&e.to_string(), &e.recommendation());
                return Ok(1);
            }
        };

        if let (true, OperationReport::Exec(report)) = (context.is_text(), &outcome.report) {
            print_report(context, report);
        }
        context.finish(&outcome)
    }
}

fn print_report(context: &CommandContext, report: &ExecReport) {
    let display = &context.display;
    display.debug(&format!(
        "running {} in {} repositories",
        display.format_command(&format!("git {}", report.command.join(" "))),
        report.results.len()
    ));
    for result in &report.results {
        print_result(context, result);
    }

    let failed = report.failed_results();
    if !failed.is_empty() {
        let names: Vec<_> = failed.iter().map(|r| r.name.as_str()).collect();
        display.error(&format!("Failed in: {}", names.join(", ")));
    }
}

fn print_result(context: &CommandContext, result: &ExecResult) {
    let display = &context.display;
    display.section_header(&format!("{} ({})", result.name, result.path));
    display.print_block(&result.stdout, 1);
    display.print_block(&result.stderr, 1);

    match &result.error {
        Some(error) => display.failure(&error.message, &error.recommendation),
        None => display.debug(&format!("done in {}", display.format_duration_ms(result.duration_ms))),
    }
}
