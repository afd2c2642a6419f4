use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::application::services::config_validator::{ConfigValidator, Violation};
use crate::domain::entities::project_config::{ProjectConfig, CONFIG_FILE_NAME};

/// Coarse category of a [`ConfigError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Missing,
    Malformed,
    Invalid,
    Io,
}

/// Configuration load/save errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .path.display())]
    Missing { path: PathBuf },

    #[error("Configuration file {} is not valid JSON: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Configuration file {} is invalid: {}", .path.display(), summarize(.violations))]
    Invalid {
        path: PathBuf,
        violations: Vec<Violation>,
    },

    #[error("Configuration file {} could not be accessed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
        [] => "no details".to_string(),
    }
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::Missing { .. } => ConfigErrorKind::Missing,
            Self::Malformed { .. } => ConfigErrorKind::Malformed,
            Self::Invalid { .. } => ConfigErrorKind::Invalid,
            Self::Io { .. } => ConfigErrorKind::Io,
        }
    }

    /// Every violation for [`ConfigError::Invalid`], empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Invalid { violations, .. } => violations,
            _ => &[],
        }
    }

    pub fn recommendation(&self) -> String {
        match self {
            Self::Missing { .. } => {
                "Run `nestrepo repo init` to scan the project and create it".to_string()
            }
            Self::Malformed { .. } => {
                "Fix the JSON syntax, or re-run `nestrepo repo init` to regenerate the file"
                    .to_string()
            }
            Self::Invalid { violations, .. } => violations
                .first()
                .map(|v| v.recommendation().to_string())
                .unwrap_or_else(|| "Fix the listed problems".to_string()),
            Self::Io { .. } => "Check the file's permissions".to_string(),
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads, validates and persists `project-repos.json`
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store for the default file name under `project_root`
    pub fn new(project_root: &Path) -> Self {
        Self {
            config_path: project_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Store for an explicit file path
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Read, parse and validate the configuration.
    ///
    /// Distinguishes a missing file from malformed JSON; shape and relational problems are
    /// reported together as [`ConfigError::Invalid`].
    pub async fn load(&self) -> Result<ProjectConfig, ConfigError> {
        let path = &self.config_path;
        debug!(path = %path.display(), "loading configuration");

        let contents = match async_fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing { path: path.clone() });
            }
            Err(e) => return Err(ConfigError::io(path, e)),
        };

        let raw: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let violations = ConfigValidator::check_schema(&raw);
        if !violations.is_empty() {
            return Err(ConfigError::Invalid {
                path: path.clone(),
                violations,
            });
        }

        let config: ProjectConfig =
            serde_json::from_value(raw).map_err(|e| ConfigError::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        self.validate(&config)?;
        debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Run every check, failing with all violations found
    pub fn validate(&self, config: &ProjectConfig) -> Result<(), ConfigError> {
        let violations = ConfigValidator::validate(config);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                path: self.config_path.clone(),
                violations,
            })
        }
    }

    /// Validate, then write through a temporary file and rename over the target
    pub async fn save(&self, config: &ProjectConfig) -> Result<(), ConfigError> {
        self.validate(config)?;

        let path = &self.config_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::io(parent, e))?;
        }

        let mut contents = serde_json::to_string_pretty(config).map_err(|e| {
            ConfigError::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        contents.push('\n');

        let temp_path = path.with_extension("json.tmp");
        async_fs::write(&temp_path, contents)
            .await
            .map_err(|e| ConfigError::io(&temp_path, e))?;

        if let Err(e) = async_fs::rename(&temp_path, path).await {
            let _ = async_fs::remove_file(&temp_path).await;
            return Err(ConfigError::io(path, e));
        }

        info!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "configuration saved"
        );
        Ok(())
    }
}
