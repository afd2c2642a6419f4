pub mod git_cli;
pub mod git_operations;
pub mod status_parser;

pub use git_cli::GitCli;
pub use git_operations::{GitError, GitOperations, RawOutput};
