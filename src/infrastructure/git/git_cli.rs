use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use super::git_operations::{GitError, GitOperations, RawOutput};
use super::status_parser::parse_porcelain_v2;
use crate::domain::entities::operation_results::GitStatusSummary;

/// Default bound on the remote reachability probe
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// [`GitOperations`] implemented by shelling out to the `git` client
#[derive(Debug, Clone)]
pub struct GitCli {
    git_executable: String,
    probe_timeout_secs: u64,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom git executable
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.git_executable = executable.into();
        self
    }

    pub fn with_probe_timeout(mut self, timeout_secs: u64) -> Self {
        self.probe_timeout_secs = timeout_secs;
        self
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.git_executable, args.join(" "))
    }

    /// Run git in `working_dir`, killing it if `timeout_secs` elapses
    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: &Path,
        timeout_secs: Option<u64>,
    ) -> Result<std::process::Output, GitError> {
        debug!(command = %self.describe(args), dir = %working_dir.display(), "running git");

        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args)
            .current_dir(working_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let spawn_error = |source| GitError::Spawn {
            executable: self.git_executable.clone(),
            source,
        };

        match timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), cmd.output()).await {
                    Ok(output) => output.map_err(spawn_error),
                    Err(_) => Err(GitError::timeout(self.describe(args), secs)),
                }
            }
            None => cmd.output().await.map_err(spawn_error),
        }
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<String, GitError> {
        let output = self
            .execute_git_command(args, working_dir, None)
            .await?;

        if !output.status.success() {
            return Err(GitError::command_failed(
                self.describe(args),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Like [`Self::execute_git_command_checked`], but exit code 1 means "nothing found"
    async fn execute_git_query(
        &self,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<Option<String>, GitError> {
        let output = self
            .execute_git_command(args, working_dir, None)
            .await?;

        match output.status.code() {
            Some(0) => Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            )),
            Some(1) => Ok(None),
            code => Err(GitError::command_failed(
                self.describe(args),
                code.unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            )),
        }
    }

    fn ensure_repo(&self, path: &Path) -> Result<(), GitError> {
        if self.is_git_repo(path) {
            Ok(())
        } else {
            Err(GitError::not_a_git_repo(path))
        }
    }
}

#[async_trait]
impl GitOperations for GitCli {
    fn is_git_repo(&self, path: &Path) -> bool {
        // `.git` is a file for worktrees and submodules
        path.join(".git").exists()
    }

    async fn status(&self, path: &Path) -> Result<GitStatusSummary, GitError> {
        self.ensure_repo(path)?;
        let output = self
            .execute_git_command_checked(&["status", "--porcelain=v2", "--branch"], path)
            .await?;
        Ok(parse_porcelain_v2(&output))
    }

    async fn current_branch(&self, path: &Path) -> Result<Option<String>, GitError> {
        self.ensure_repo(path)?;
        let branch = self
            .execute_git_query(&["symbolic-ref", "--quiet", "--short", "HEAD"], path)
            .await?;
        Ok(branch.filter(|b| !b.is_empty()))
    }

    async fn remotes(&self, path: &Path) -> Result<Vec<String>, GitError> {
        self.ensure_repo(path)?;
        let output = self.execute_git_command_checked(&["remote"], path).await?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn remote_url(&self, path: &Path, remote_name: &str) -> Result<Option<String>, GitError> {
        self.ensure_repo(path)?;
        let key = format!("remote.{}.url", remote_name);
        let url = self.execute_git_query(&["config", "--get", &key], path).await?;
        Ok(url.filter(|u| !u.is_empty()))
    }

    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool, GitError> {
        self.ensure_repo(path)?;
        let local = format!("refs/heads/{}", branch);
        let remote = format!("refs/remotes/*/{}", branch);
        let refs = self
            .execute_git_command_checked(
                &["for-each-ref", "--format=%(refname)", &local, &remote],
                path,
            )
            .await?;
        if !refs.is_empty() {
            return Ok(true);
        }

        // An unborn branch has no ref yet but is still the checked-out one
        Ok(self.current_branch(path).await?.as_deref() == Some(branch))
    }

    async fn is_remote_reachable(&self, path: &Path, remote_name: &str) -> Result<bool, GitError> {
        self.ensure_repo(path)?;
        let args = ["ls-remote", "--heads", remote_name];
        match self
            .execute_git_command(&args, path, Some(self.probe_timeout_secs))
            .await
        {
            Ok(output) if output.status.success() => Ok(true),
            Ok(output) => {
                warn!(
                    remote = remote_name,
                    dir = %path.display(),
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "remote probe failed"
                );
                Ok(false)
            }
            Err(GitError::Timeout { timeout_secs, .. }) => {
                warn!(
                    remote = remote_name,
                    dir = %path.display(),
                    timeout_secs,
                    "remote probe timed out"
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn exec_raw(&self, path: &Path, args: &[String]) -> Result<RawOutput, GitError> {
        self.ensure_repo(path)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let started = Instant::now();
        let output = self
            .execute_git_command(&args, path, None)
            .await?;

        Ok(RawOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
