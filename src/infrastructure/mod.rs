/// Infrastructure layer modules
///
/// Concrete implementations for external system interactions:
/// - Git operations by shelling out to the `git` client
/// - Configuration file storage
pub mod filesystem;
pub mod git;

pub use filesystem::{ConfigError, ConfigErrorKind, ConfigStore};
pub use git::{GitCli, GitError, GitOperations, RawOutput};
