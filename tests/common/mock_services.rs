//! Mock services for testing
//!
//! [`FakeGit`] answers every [`GitOperations`] call from scripted data and records the
//! calls it received, so suites can check both results and isolation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use nestrepo::domain::entities::operation_results::GitStatusSummary;
use nestrepo::infrastructure::git::{GitError, GitOperations, RawOutput};

/// Scripted git service; repositories are matched by the end of their path
#[derive(Clone, Default)]
pub struct FakeGit {
    /// Path suffixes whose every command fails with a permission error
    failing: Arc<Mutex<Vec<String>>>,
    /// Path suffix -> status returned by `status`
    statuses: Arc<Mutex<HashMap<String, GitStatusSummary>>>,
    /// Path suffix -> (remote name, url)
    remotes: Arc<Mutex<HashMap<String, (String, String)>>>,
    /// Remote urls that answer the reachability probe
    reachable: Arc<Mutex<Vec<String>>>,
    /// Path suffix -> exit code returned by `exec_raw`
    exit_codes: Arc<Mutex<HashMap<String, i32>>>,
    /// "<operation> <path>" for every call
    call_history: Arc<Mutex<Vec<String>>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_in(self, suffix: &str) -> Self {
        self.failing.lock().unwrap().push(suffix.to_string());
        self
    }

    pub fn with_status(self, suffix: &str, status: GitStatusSummary) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(suffix.to_string(), status);
        self
    }

    pub fn with_remote(self, suffix: &str, name: &str, url: &str) -> Self {
        self.remotes
            .lock()
            .unwrap()
            .insert(suffix.to_string(), (name.to_string(), url.to_string()));
        self
    }

    pub fn reachable(self, url: &str) -> Self {
        self.reachable.lock().unwrap().push(url.to_string());
        self
    }

    pub fn with_exit_code(self, suffix: &str, exit_code: i32) -> Self {
        self.exit_codes
            .lock()
            .unwrap()
            .insert(suffix.to_string(), exit_code);
        self
    }

    /// Get call history for verification
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    /// Calls of one operation, in order
    pub fn calls_of(&self, operation: &str) -> Vec<String> {
        let prefix = format!("{} ", operation);
        self.get_call_history()
            .into_iter()
            .filter(|call| call.starts_with(&prefix))
            .collect()
    }

    fn record(&self, operation: &str, path: &Path) {
        self.call_history
            .lock()
            .unwrap()
            .push(format!("{} {}", operation, path.display()));
    }

    fn lookup<T: Clone>(map: &Mutex<HashMap<String, T>>, path: &Path) -> Option<T> {
        map.lock()
            .unwrap()
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix.as_str()))
            .map(|(_, value)| value.clone())
    }

    fn check_failing(&self, command: &str, path: &Path) -> Result<(), GitError> {
        let failing = self.failing.lock().unwrap();
        if failing.iter().any(|suffix| path.ends_with(suffix.as_str())) {
            return Err(GitError::command_failed(
                format!("git {}", command),
                128,
                "fatal: Permission denied",
            ));
        }
        Ok(())
    }

    fn ensure_repo(&self, path: &Path) -> Result<(), GitError> {
        if !self.is_git_repo(path) {
            return Err(GitError::not_a_git_repo(path));
        }
        Ok(())
    }
}

#[async_trait]
impl GitOperations for FakeGit {
    fn is_git_repo(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    async fn status(&self, path: &Path) -> Result<GitStatusSummary, GitError> {
        self.record("status", path);
        self.ensure_repo(path)?;
        self.check_failing("status", path)?;
        Ok(Self::lookup(&self.statuses, path).unwrap_or_else(|| GitStatusSummary {
            branch: Some("main".to_string()),
            ..Default::default()
        }))
    }

    async fn current_branch(&self, path: &Path) -> Result<Option<String>, GitError> {
        self.record("current_branch", path);
        self.ensure_repo(path)?;
        self.check_failing("symbolic-ref", path)?;
        Ok(Some("main".to_string()))
    }

    async fn remotes(&self, path: &Path) -> Result<Vec<String>, GitError> {
        self.record("remotes", path);
        self.ensure_repo(path)?;
        self.check_failing("remote", path)?;
        Ok(Self::lookup(&self.remotes, path)
            .map(|(name, _)| vec![name])
            .unwrap_or_default())
    }

    async fn remote_url(&self, path: &Path, remote_name: &str) -> Result<Option<String>, GitError> {
        self.record("remote_url", path);
        self.ensure_repo(path)?;
        Ok(Self::lookup(&self.remotes, path)
            .filter(|(name, _)| name == remote_name)
            .map(|(_, url)| url))
    }

    async fn branch_exists(&self, path: &Path, branch: &str) -> Result<bool, GitError> {
        self.record("branch_exists", path);
        self.ensure_repo(path)?;
        self.check_failing("for-each-ref", path)?;
        Ok(branch == "main")
    }

    async fn is_remote_reachable(&self, path: &Path, remote_name: &str) -> Result<bool, GitError> {
        self.record("is_remote_reachable", path);
        self.ensure_repo(path)?;
        let url = match Self::lookup(&self.remotes, path) {
            Some((name, url)) if name == remote_name => url,
            _ => return Ok(false),
        };
        Ok(self.reachable.lock().unwrap().contains(&url))
    }

    async fn exec_raw(&self, path: &Path, args: &[String]) -> Result<RawOutput, GitError> {
        self.record("exec_raw", path);
        self.ensure_repo(path)?;
        self.check_failing(&args.join(" "), path)?;
        let exit_code = Self::lookup(&self.exit_codes, path).unwrap_or(0);
        Ok(RawOutput {
            exit_code,
            stdout: format!("ran {}\n", args.join(" ")),
            stderr: if exit_code == 0 {
                String::new()
            } else {
                "error: scripted failure\n".to_string()
            },
            duration_ms: 1,
        })
    }
}
