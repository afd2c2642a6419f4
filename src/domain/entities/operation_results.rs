use serde::Serialize;

/// Working-tree summary of one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatusSummary {
    /// Current branch, `None` when HEAD is detached
    pub branch: Option<String>,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub untracked: usize,
    pub conflicted: usize,
}

impl GitStatusSummary {
    /// No pending changes of any kind
    pub fn is_clean(&self) -> bool {
        self.modified == 0
            && self.added == 0
            && self.deleted == 0
            && self.untracked == 0
            && self.conflicted == 0
    }

    /// Whether the branch has diverged from its upstream
    pub fn is_out_of_sync(&self) -> bool {
        self.ahead > 0 || self.behind > 0
    }
}

/// Failure recorded in a repository's result slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFailure {
    pub message: String,
    pub recommendation: String,
}

impl RepoFailure {
    pub fn new(message: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// Success/failure tally for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchSummary {
    pub fn tally(outcomes: impl IntoIterator<Item = bool>) -> Self {
        let mut summary = Self::default();
        for succeeded in outcomes {
            summary.total += 1;
            if succeeded {
                summary.success_count += 1;
            } else {
                summary.failure_count += 1;
            }
        }
        summary
    }

    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }

    /// Process exit code: 0 only if every targeted repository succeeded
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Status of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoStatus {
    pub name: String,
    pub path: String,
    pub status: Option<GitStatusSummary>,
    pub error: Option<RepoFailure>,
}

impl RepoStatus {
    pub fn ok(name: impl Into<String>, path: impl Into<String>, status: GitStatusSummary) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            status: Some(status),
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, path: impl Into<String>, error: RepoFailure) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            status: None,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of running a git command in one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    pub name: String,
    pub path: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
    pub error: Option<RepoFailure>,
}

impl ExecResult {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 0,
            error: None,
        }
    }

    /// Record captured output; a non-zero exit code also fills the error slot
    pub fn with_output(
        mut self,
        exit_code: i32,
        stdout: String,
        stderr: String,
        duration_ms: u64,
    ) -> Self {
        if exit_code != 0 {
            let detail = stderr.lines().next().unwrap_or("").trim();
            let message = if detail.is_empty() {
                format!("git exited with code {}", exit_code)
            } else {
                format!("git exited with code {}: {}", exit_code, detail)
            };
            self.error = Some(RepoFailure::new(
                message,
                "Inspect the captured stderr and rerun the command in this repository",
            ));
        }
        self.exit_code = Some(exit_code);
        self.stdout = stdout;
        self.stderr = stderr;
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: RepoFailure) -> Self {
        self.error = Some(error);
        self
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.exit_code == Some(0)
    }
}

/// Individual health checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthCheckKind {
    PathExists,
    GitRepository,
    DefaultBranch,
    ParentLink,
    RemoteReachable,
}

impl HealthCheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PathExists => "path exists",
            Self::GitRepository => "git repository",
            Self::DefaultBranch => "default branch",
            Self::ParentLink => "parent link",
            Self::RemoteReachable => "remote reachable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

/// One evaluated health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub kind: HealthCheckKind,
    pub status: CheckStatus,
    pub message: String,
    pub recommendation: Option<String>,
}

impl HealthCheck {
    pub fn passed(kind: HealthCheckKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: CheckStatus::Passed,
            message: message.into(),
            recommendation: None,
        }
    }

    pub fn failed(
        kind: HealthCheckKind,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            status: CheckStatus::Failed,
            message: message.into(),
            recommendation: Some(recommendation.into()),
        }
    }

    pub fn skipped(kind: HealthCheckKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            status: CheckStatus::Skipped,
            message: reason.into(),
            recommendation: None,
        }
    }
}

/// Health of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub name: String,
    pub path: String,
    pub checks: Vec<HealthCheck>,
    pub error: Option<RepoFailure>,
}

impl HealthCheckResult {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            checks: Vec::new(),
            error: None,
        }
    }

    pub fn push(&mut self, check: HealthCheck) {
        self.checks.push(check);
    }

    /// Fill the error slot from the failed checks, if any
    pub fn finalize(mut self) -> Self {
        let failed: Vec<&HealthCheck> = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
            .collect();

        if let Some(first) = failed.first() {
            let message = failed
                .iter()
                .map(|c| c.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            let recommendation = first.recommendation.clone().unwrap_or_default();
            self.error = Some(RepoFailure::new(message, recommendation));
        }
        self
    }

    pub fn check(&self, kind: HealthCheckKind) -> Option<&HealthCheck> {
        self.checks.iter().find(|c| c.kind == kind)
    }

    pub fn is_healthy(&self) -> bool {
        self.error.is_none() && self.checks.iter().all(|c| c.status != CheckStatus::Failed)
    }
}

/// Per-repository status results, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub results: Vec<RepoStatus>,
}

impl StatusReport {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::tally(self.results.iter().map(RepoStatus::succeeded))
    }
}

/// Per-repository exec results plus the aggregate counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecReport {
    pub command: Vec<String>,
    pub results: Vec<ExecResult>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl ExecReport {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            ..Default::default()
        }
    }

    pub fn add_result(&mut self, result: ExecResult) {
        if result.succeeded() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.results.push(result);
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.results.len(),
            success_count: self.success_count,
            failure_count: self.failure_count,
        }
    }

    pub fn failed_results(&self) -> Vec<&ExecResult> {
        self.results.iter().filter(|r| !r.succeeded()).collect()
    }
}

/// Per-repository health results, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub results: Vec<HealthCheckResult>,
}

impl HealthReport {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::tally(self.results.iter().map(HealthCheckResult::is_healthy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_summary_clean() {
        let mut status = GitStatusSummary::default();
        assert!(status.is_clean());
        status.untracked = 1;
        assert!(!status.is_clean());
        assert!(!status.is_out_of_sync());
        status.behind = 2;
        assert!(status.is_out_of_sync());
    }

    #[test]
    fn test_exec_result_non_zero_exit_is_failure() {
        let ok = ExecResult::new("a", "a").with_output(0, "done".into(), String::new(), 5);
        assert!(ok.succeeded());
        assert!(ok.error.is_none());

        let failed = ExecResult::new("b", "b").with_output(
            128,
            String::new(),
            "fatal: not something we can merge\nmore".into(),
            5,
        );
        assert!(!failed.succeeded());
        assert_eq!(failed.exit_code, Some(128));
        assert_eq!(
            failed.error.unwrap().message,
            "git exited with code 128: fatal: not something we can merge"
        );
    }

    #[test]
    fn test_exec_report_counts() {
        let mut report = ExecReport::new(vec!["status".into()]);
        report.add_result(ExecResult::new("a", "a").with_output(0, String::new(), String::new(), 1));
        report.add_result(ExecResult::new("b", "b").with_output(1, String::new(), String::new(), 1));
        report.add_result(ExecResult::new("c", "c").with_error(RepoFailure::new("spawn", "install git")));

        assert_eq!(report.success_count, 1);
        assert_eq!(report.failure_count, 2);
        assert_eq!(report.summary().exit_code(), 1);
        assert_eq!(report.failed_results().len(), 2);
    }

    #[test]
    fn test_health_finalize_collects_failures() {
        let mut result = HealthCheckResult::new("lib", "backend/vendor/lib");
        result.push(HealthCheck::passed(HealthCheckKind::PathExists, "exists"));
        result.push(HealthCheck::failed(
            HealthCheckKind::DefaultBranch,
            "branch 'main' not found",
            "create the branch",
        ));
        result.push(HealthCheck::failed(
            HealthCheckKind::ParentLink,
            "parent 'backend' missing",
            "re-run init",
        ));
        let result = result.finalize();

        assert!(!result.is_healthy());
        let error = result.error.unwrap();
        assert_eq!(error.message, "branch 'main' not found; parent 'backend' missing");
        assert_eq!(error.recommendation, "create the branch");
    }

    #[test]
    fn test_batch_summary_tally() {
        let summary = BatchSummary::tally([true, false, true]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert!(!summary.is_success());

        let empty = BatchSummary::tally(Vec::<bool>::new());
        assert_eq!(empty.exit_code(), 0);
    }
}
