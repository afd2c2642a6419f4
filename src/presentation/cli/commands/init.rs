use anyhow::Result;

use super::CommandContext;
use crate::application::use_cases::init_project::{
    InitProjectConfig, InitProjectError, InitProjectResult, InitProjectUseCase,
};

/// Handler for `repo init`
pub struct InitCommand {
    pub yes: bool,
    pub max_depth: Option<usize>,
    pub exclude: Vec<String>,
    pub nested: bool,
}

impl InitCommand {
    pub async fn execute(&self, context: &CommandContext) -> Result<i32> {
        let store = context.store();
        let display = &context.display;

        if store.exists() && !self.yes {
            let question = format!(
                "{} already exists. Overwrite it?",
                display.format_path(&store.path().display().to_string())
            );
            if !display.confirm(&question)? {
                if context.is_text() {
                    display.warning("Initialization cancelled; pass --yes to overwrite");
                } else {
                    display.failure("Initialization cancelled", "Pass --yes to overwrite");
                }
                return Ok(1);
            }
        }

        let use_case = InitProjectUseCase::new(InitProjectConfig {
            max_depth: self.max_depth,
            exclude: self.exclude.clone(),
            nested: self.nested,
        });
        match use_case.execute(&context.manager(), &store).await {
            Ok(result) => {
                if context.is_text() {
                    print_result(context, &result);
                } else {
                    context.print_json(&result.config)?;
                }
                Ok(0)
            }
            Err(InitProjectError::Config(e)) => {
                context.report_error(&e.into());
                Ok(1)
            }
            Err(e) => {
                display.failure(&e.to_string(), &e.recommendation());
                Ok(1)
            }
        }
    }
}

fn print_result(context: &CommandContext, result: &InitProjectResult) {
    let display = &context.display;
    for entry in &result.config.repositories {
        let mut line = format!("{} ({})", display.format_repo(&entry.name), entry.path);
        if let Some(parent) = &entry.parent {
            line.push_str(&format!(" inside {}", parent));
        }
        if let Some(remote) = &entry.remote {
            line.push_str(&format!(" -> {}", remote));
        }
        display.print_indented(&line, 1);
    }

    let path = display.format_path(&result.config_path.display().to_string());
    if result.config.repositories.is_empty() {
        display.warning(&format!("No repositories found; wrote an empty {}", path));
    } else {
        display.success(&format!(
            "Wrote {} repositories to {}",
            result.config.repositories.len(),
            path
        ));
    }
    if result.replaced_existing {
        display.info("The previous configuration was replaced");
    }
}
