use thiserror::Error;

use crate::application::services::config_validator::Violation;
use crate::domain::value_objects::path_resolver::PathError;
use crate::infrastructure::filesystem::config_store::ConfigError;
use crate::infrastructure::git::git_operations::GitError;

#[derive(Error, Debug)]
pub enum NestrepoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Operation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl NestrepoError {
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Human-actionable advice, distinct from the error message
    pub fn recommendation(&self) -> String {
        match self {
            Self::Config(e) => e.recommendation(),
            Self::Git(e) => e.recommendation(),
            Self::Path(e) => e.recommendation(),
            Self::Timeout { .. } => {
                "Raise --timeout or narrow the selection with --filter".to_string()
            }
        }
    }

    /// Violations behind a rejected configuration, empty for every other error
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Config(e) => e.violations(),
            _ => &[],
        }
    }
}
