use thiserror::Error;

use crate::application::services::repo_manager::{RepoManager, RepoOperation};
use crate::application::use_cases::batch_operation::{run_batch, BatchOutcome, BatchSelection};
use crate::common::error::NestrepoError;
use crate::domain::entities::project_config::ProjectConfig;

#[derive(Debug, Error)]
pub enum ExecCommandError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Command could not be parsed: {0}")]
    InvalidQuoting(#[from] shell_words::ParseError),

    #[error(transparent)]
    Batch(#[from] NestrepoError),
}

impl ExecCommandError {
    pub fn recommendation(&self) -> String {
        match self {
            Self::EmptyCommand => "Pass a git command, e.g. `repo exec \"fetch --all\"`".to_string(),
            Self::InvalidQuoting(_) => "Balance the quotes in the command".to_string(),
            Self::Batch(e) => e.recommendation(),
        }
    }
}

/// Settings for running one git command across repositories
#[derive(Debug, Clone, Default)]
pub struct ExecCommandConfig {
    /// Git command line, with or without the leading `git`
    pub command: String,

    pub filter: Option<String>,

    pub timeout_secs: Option<u64>,
}

impl ExecCommandConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Split a command line with shell quoting rules, dropping a leading `git`
pub fn parse_command(command: &str) -> Result<Vec<String>, ExecCommandError> {
    let mut args = shell_words::split(command)?;
    if args.first().map(String::as_str) == Some("git") {
        args.remove(0);
    }
    if args.is_empty() {
        return Err(ExecCommandError::EmptyCommand);
    }
    Ok(args)
}

/// Runs one git command in every selected repository
pub struct ExecCommandUseCase {
    config: ExecCommandConfig,
}

impl ExecCommandUseCase {
    pub fn new(config: ExecCommandConfig) -> Self {
        Self { config }
    }

    /// The command is parsed before any repository is touched
    pub async fn execute(
        &self,
        manager: &RepoManager,
        project: &ProjectConfig,
    ) -> Result<BatchOutcome, ExecCommandError> {
        let args = parse_command(&self.config.command)?;
        let selection = BatchSelection {
            filter: self.config.filter.clone(),
            timeout_secs: self.config.timeout_secs,
        };
        Ok(run_batch(manager, project, RepoOperation::Exec { args }, &selection).await?)
    }
}
