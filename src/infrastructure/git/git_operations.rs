use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::operation_results::GitStatusSummary;

/// Captured output of a raw git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Process exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl RawOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Git operations against a single repository directory.
///
/// Implementations never retry. A non-zero exit from [`GitOperations::exec_raw`] is data,
/// not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitOperations: Send + Sync {
    /// Whether `path` holds git metadata; never fails
    fn is_git_repo(&self, path: &Path) -> bool;

    /// Branch, upstream divergence and change counts
    async fn status(&self, path: &Path) -> Result<GitStatusSummary, GitError>;

    /// Checked-out branch, `None` when HEAD is detached
    async fn current_branch(&self, path: &Path) -> Result<Option<String>, GitError>;

    /// Configured remote names
    async fn remotes(&self, path: &Path) -> Result<Vec<String>, GitError>;

    /// URL of `remote_name`, `None` when the remote has no URL configured
    async fn remote_url(&self, path: &Path, remote_name: &str) -> Result<Option<String>, GitError>;

    /// Whether `branch` exists locally or on any remote-tracking ref
    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool, GitError>;

    /// Bounded-time probe of `remote_name`; a timeout counts as unreachable
    async fn is_remote_reachable(&self, path: &Path, remote_name: &str) -> Result<bool, GitError>;

    /// Run git with `args` inside `path`, capturing everything
    async fn exec_raw(&self, path: &Path, args: &[String]) -> Result<RawOutput, GitError>;
}

/// Errors that can occur during git operations
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Not a git repository: {path}")]
    NotAGitRepo { path: String },

    #[error("Command failed: {command} (exit code {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("Failed to run '{executable}': {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
}

impl GitError {
    /// Create a not-a-repository error
    pub fn not_a_git_repo(path: &Path) -> Self {
        Self::NotAGitRepo {
            path: path.display().to_string(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into().trim().to_string(),
        }
    }

    pub fn timeout(command: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            timeout_secs,
        }
    }

    pub fn recommendation(&self) -> String {
        match self {
            Self::NotAGitRepo { .. } => {
                "Run `git init` there, or re-run `repo init` to rebuild the repository list"
                    .to_string()
            }
            Self::CommandFailed { stderr, .. } if stderr.contains("Permission denied") => {
                "Check file permissions and credentials for this repository".to_string()
            }
            Self::CommandFailed { command, .. } => {
                format!("Run `{}` inside the repository to see the full error", command)
            }
            Self::Timeout { .. } => {
                "Check network connectivity or raise NESTREPO_REMOTE_TIMEOUT".to_string()
            }
            Self::Spawn { .. } => {
                "Install git or point NESTREPO_GIT at the git executable".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_trims_stderr() {
        let error = GitError::command_failed("git status", 128, "fatal: bad object\n");
        assert_eq!(
            error.to_string(),
            "Command failed: git status (exit code 128): fatal: bad object"
        );
        assert!(error.recommendation().contains("git status"));
    }

    #[test]
    fn test_permission_denied_recommendation() {
        let error = GitError::command_failed("git fetch", 1, "Permission denied (publickey)");
        assert!(error.recommendation().contains("permissions"));
    }

    #[test]
    fn test_raw_output_success() {
        let output = RawOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 3,
        };
        assert!(output.success());
    }
}
