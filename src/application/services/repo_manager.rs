use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::repo_discovery::{DiscoveryError, DiscoveryOptions, RepoScanner};
use crate::common::error::NestrepoError;
use crate::domain::entities::operation_results::{
    BatchSummary, ExecReport, ExecResult, HealthCheck, HealthCheckKind, HealthCheckResult,
    HealthReport, RepoFailure, RepoStatus, StatusReport,
};
use crate::domain::entities::project_config::ProjectConfig;
use crate::domain::entities::repository_entry::{DiscoveredRepo, RepositoryEntry};
use crate::domain::value_objects::path_resolver::PathResolver;
use crate::infrastructure::git::{GitError, GitOperations};

/// The closed set of batch operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOperation {
    Status,
    Exec { args: Vec<String> },
    Health { check_remote: bool },
}

impl RepoOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Exec { .. } => "exec",
            Self::Health { .. } => "health",
        }
    }
}

/// Report produced by [`RepoManager::run`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationReport {
    Status(StatusReport),
    Exec(ExecReport),
    Health(HealthReport),
}

impl OperationReport {
    pub fn summary(&self) -> BatchSummary {
        match self {
            Self::Status(report) => report.summary(),
            Self::Exec(report) => report.summary(),
            Self::Health(report) => report.summary(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.summary().exit_code()
    }
}

/// Discovery and sequential, failure-isolated batch operations over a project tree
pub struct RepoManager {
    project_root: PathBuf,
    git: Arc<dyn GitOperations>,
}

impl RepoManager {
    pub fn new(project_root: impl Into<PathBuf>, git: Arc<dyn GitOperations>) -> Self {
        Self {
            project_root: project_root.into(),
            git,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Scan the project tree, then enrich each candidate with its branch and remote
    pub async fn discover(
        &self,
        options: &DiscoveryOptions,
    ) -> Result<Vec<DiscoveredRepo>, DiscoveryError> {
        let scanner = RepoScanner::new(&self.project_root, self.git.as_ref(), options)?;
        let root = scanner.root().to_path_buf();
        let mut repos = scanner.scan();
        info!(count = repos.len(), root = %root.display(), "discovery finished");

        for repo in repos.iter_mut() {
            let path = PathResolver::to_absolute(&repo.path, &root);
            self.enrich(repo, &path, &options.preferred_remote).await;
        }

        Ok(repos)
    }

    async fn enrich(&self, repo: &mut DiscoveredRepo, path: &Path, preferred_remote: &str) {
        match self.git.current_branch(path).await {
            Ok(branch) => repo.branch = branch,
            Err(e) => warn!(path = %repo.path, error = %e, "could not read current branch"),
        }

        let remotes = match self.git.remotes(path).await {
            Ok(remotes) => remotes,
            Err(e) => {
                warn!(path = %repo.path, error = %e, "could not list remotes");
                return;
            }
        };
        repo.has_remote = !remotes.is_empty();

        let chosen = remotes
            .iter()
            .find(|r| r.as_str() == preferred_remote)
            .or_else(|| remotes.first());
        if let Some(remote) = chosen {
            match self.git.remote_url(path, remote).await {
                Ok(url) => repo.remote = url,
                Err(e) => warn!(path = %repo.path, remote = %remote, error = %e, "could not read remote url"),
            }
        }
    }

    /// Dispatch one operation over `repos`
    pub async fn run(
        &self,
        operation: &RepoOperation,
        repos: &[RepositoryEntry],
        config: &ProjectConfig,
    ) -> OperationReport {
        debug!(operation = operation.name(), count = repos.len(), "running batch");
        match operation {
            RepoOperation::Status => OperationReport::Status(self.status_all(repos).await),
            RepoOperation::Exec { args } => OperationReport::Exec(self.exec_all(repos, args).await),
            RepoOperation::Health { check_remote } => {
                OperationReport::Health(self.health_all(repos, config, *check_remote).await)
            }
        }
    }

    /// Status of every repository, one result per input in input order
    pub async fn status_all(&self, repos: &[RepositoryEntry]) -> StatusReport {
        let mut report = StatusReport::default();
        for entry in repos {
            let result = match self.resolve_existing(entry) {
                Ok(path) => match self.git.status(&path).await {
                    Ok(status) => RepoStatus::ok(&entry.name, &entry.path, status),
                    Err(e) => RepoStatus::failed(&entry.name, &entry.path, repo_failure(e)),
                },
                Err(failure) => RepoStatus::failed(&entry.name, &entry.path, failure),
            };
            if let Some(error) = &result.error {
                warn!(repo = %entry.name, error = %error.message, "status failed");
            }
            report.results.push(result);
        }
        report
    }

    /// Run git with `args` in every repository; a failure never stops the batch
    pub async fn exec_all(&self, repos: &[RepositoryEntry], args: &[String]) -> ExecReport {
        let mut report = ExecReport::new(args.to_vec());
        for entry in repos {
            let result = ExecResult::new(&entry.name, &entry.path);
            let result = match self.resolve_existing(entry) {
                Ok(path) => match self.git.exec_raw(&path, args).await {
                    Ok(output) => result.with_output(
                        output.exit_code,
                        output.stdout,
                        output.stderr,
                        output.duration_ms,
                    ),
                    Err(e) => result.with_error(repo_failure(e)),
                },
                Err(failure) => result.with_error(failure),
            };
            if let Some(error) = &result.error {
                warn!(repo = %entry.name, error = %error.message, "exec failed");
            }
            report.add_result(result);
        }
        report
    }

    /// Health of every repository; `config` supplies the parent entries
    pub async fn health_all(
        &self,
        repos: &[RepositoryEntry],
        config: &ProjectConfig,
        check_remote: bool,
    ) -> HealthReport {
        let preferred_remote = config.effective_settings().default_remote;
        let mut report = HealthReport::default();
        for entry in repos {
            let result = self
                .check_health(entry, config, check_remote, &preferred_remote)
                .await;
            if let Some(error) = &result.error {
                warn!(repo = %entry.name, error = %error.message, "health check failed");
            }
            report.results.push(result);
        }
        report
    }

    async fn check_health(
        &self,
        entry: &RepositoryEntry,
        config: &ProjectConfig,
        check_remote: bool,
        preferred_remote: &str,
    ) -> HealthCheckResult {
        let mut result = HealthCheckResult::new(&entry.name, &entry.path);
        let repo_path = self.check_location(entry, &mut result);

        match &repo_path {
            Some(path) => {
                self.check_default_branch(entry, path, &mut result).await;
            }
            None => result.push(HealthCheck::skipped(
                HealthCheckKind::DefaultBranch,
                "repository unavailable",
            )),
        }

        if let Some(parent) = entry.normalized_parent() {
            result.push(self.check_parent_link(&parent, config));
        }

        if check_remote {
            match &repo_path {
                Some(path) => {
                    let check = self.check_remote(entry, path, preferred_remote).await;
                    result.push(check);
                }
                None => result.push(HealthCheck::skipped(
                    HealthCheckKind::RemoteReachable,
                    "repository unavailable",
                )),
            }
        }

        result.finalize()
    }

    /// Path and git validity checks; returns the path only when both pass
    fn check_location(
        &self,
        entry: &RepositoryEntry,
        result: &mut HealthCheckResult,
    ) -> Option<PathBuf> {
        let path = match PathResolver::resolve(&entry.path, &self.project_root) {
            Ok(path) => path,
            Err(e) => {
                result.push(HealthCheck::failed(
                    HealthCheckKind::PathExists,
                    e.to_string(),
                    e.recommendation(),
                ));
                result.push(HealthCheck::skipped(HealthCheckKind::GitRepository, "path unavailable"));
                return None;
            }
        };

        if !path.is_dir() {
            result.push(HealthCheck::failed(
                HealthCheckKind::PathExists,
                format!("path '{}' does not exist", entry.path),
                missing_path_recommendation(),
            ));
            result.push(HealthCheck::skipped(HealthCheckKind::GitRepository, "path unavailable"));
            return None;
        }
        result.push(HealthCheck::passed(HealthCheckKind::PathExists, "path exists"));

        if !self.git.is_git_repo(&path) {
            let error = GitError::not_a_git_repo(&path);
            result.push(HealthCheck::failed(
                HealthCheckKind::GitRepository,
                format!("'{}' is not a git repository", entry.path),
                error.recommendation(),
            ));
            return None;
        }
        result.push(HealthCheck::passed(HealthCheckKind::GitRepository, "valid git repository"));

        Some(path)
    }

    async fn check_default_branch(
        &self,
        entry: &RepositoryEntry,
        path: &Path,
        result: &mut HealthCheckResult,
    ) {
        let branch = &entry.default_branch;
        let check = match self.git.branch_exists(path, branch).await {
            Ok(true) => HealthCheck::passed(
                HealthCheckKind::DefaultBranch,
                format!("branch '{}' exists", branch),
            ),
            Ok(false) => HealthCheck::failed(
                HealthCheckKind::DefaultBranch,
                format!("default branch '{}' not found", branch),
                format!(
                    "Create or fetch '{}', or update defaultBranch in project-repos.json",
                    branch
                ),
            ),
            Err(e) => HealthCheck::failed(
                HealthCheckKind::DefaultBranch,
                format!("could not check branch '{}': {}", branch, e),
                e.recommendation(),
            ),
        };
        result.push(check);
    }

    /// The parent entry must exist in the configuration and be a live repository
    fn check_parent_link(&self, parent: &str, config: &ProjectConfig) -> HealthCheck {
        let Some(parent_entry) = config.find_by_path(parent) else {
            return HealthCheck::failed(
                HealthCheckKind::ParentLink,
                format!("parent '{}' is not a configured repository", parent),
                "Re-run `repo init` or fix `parent` in project-repos.json",
            );
        };

        let live = PathResolver::resolve(&parent_entry.path, &self.project_root)
            .map(|path| path.is_dir() && self.git.is_git_repo(&path))
            .unwrap_or(false);
        if live {
            HealthCheck::passed(
                HealthCheckKind::ParentLink,
                format!("parent '{}' is a live repository", parent),
            )
        } else {
            HealthCheck::failed(
                HealthCheckKind::ParentLink,
                format!("parent '{}' is not a git repository on disk", parent),
                format!("Restore the '{}' repository or re-run `repo init`", parent_entry.name),
            )
        }
    }

    async fn check_remote(
        &self,
        entry: &RepositoryEntry,
        path: &Path,
        preferred_remote: &str,
    ) -> HealthCheck {
        let remotes = match self.git.remotes(path).await {
            Ok(remotes) => remotes,
            Err(e) => {
                return HealthCheck::failed(
                    HealthCheckKind::RemoteReachable,
                    format!("could not list remotes: {}", e),
                    e.recommendation(),
                )
            }
        };

        let Some(remote) = remotes
            .iter()
            .find(|r| r.as_str() == preferred_remote)
            .or_else(|| remotes.first())
        else {
            return if entry.remote.is_some() {
                HealthCheck::failed(
                    HealthCheckKind::RemoteReachable,
                    "remote is configured in project-repos.json but not in the repository",
                    "Add it with `git remote add`",
                )
            } else {
                HealthCheck::skipped(HealthCheckKind::RemoteReachable, "no remote configured")
            };
        };

        match self.git.is_remote_reachable(path, remote).await {
            Ok(true) => HealthCheck::passed(
                HealthCheckKind::RemoteReachable,
                format!("remote '{}' is reachable", remote),
            ),
            Ok(false) => HealthCheck::failed(
                HealthCheckKind::RemoteReachable,
                format!("remote '{}' is unreachable", remote),
                "Check network access and credentials for the remote",
            ),
            Err(e) => HealthCheck::failed(
                HealthCheckKind::RemoteReachable,
                format!("could not probe remote '{}': {}", remote, e),
                e.recommendation(),
            ),
        }
    }

    /// Resolve an entry to an existing directory, or the failure to record
    fn resolve_existing(&self, entry: &RepositoryEntry) -> Result<PathBuf, RepoFailure> {
        let path = PathResolver::resolve(&entry.path, &self.project_root)
            .map_err(repo_failure)?;
        if !path.is_dir() {
            return Err(RepoFailure::new(
                format!("path '{}' does not exist", entry.path),
                missing_path_recommendation(),
            ));
        }
        Ok(path)
    }
}

/// Per-repository failure slot for any layer error
fn repo_failure(error: impl Into<NestrepoError>) -> RepoFailure {
    let error = error.into();
    RepoFailure::new(error.to_string(), error.recommendation())
}

fn missing_path_recommendation() -> &'static str {
    "Clone the repository to that path, or re-run `repo init` to refresh the configuration"
}
