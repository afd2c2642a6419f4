pub mod config_validator;
pub mod repo_discovery;
pub mod repo_manager;

pub use config_validator::{ConfigValidator, Violation, ViolationKind};
pub use repo_discovery::{DiscoveryError, DiscoveryOptions, RepoScanner};
pub use repo_manager::{OperationReport, RepoManager, RepoOperation};
