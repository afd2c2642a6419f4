//! # nestrepo - Nested Git Repository Manager
//!
//! `nestrepo` finds the git repositories nested inside a project tree, records them in a
//! `project-repos.json` file at the project root, and runs status, command and health
//! batches over them. One repository failing never stops the rest of a batch.
//!
//! ## Quick Start
//!
//! 1. Scan the project and write the configuration:
//!
//! ```bash
//! nestrepo repo init
//! ```
//!
//! 2. Check every repository:
//!
//! ```bash
//! nestrepo repo status
//! nestrepo repo health --check-remote
//! nestrepo repo exec "fetch --all" --filter backend
//! ```
//!
//! The configuration looks like this:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "repositories": [
//!     { "name": "backend", "path": "backend", "remote": null,
//!       "defaultBranch": "main", "parent": null },
//!     { "name": "backend-vendor-lib", "path": "backend/vendor/lib", "remote": null,
//!       "defaultBranch": "main", "parent": "backend" }
//!   ]
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: configuration entities, operation results and path rules
//! - [`application`]: discovery, validation, batch execution and the use cases
//! - [`infrastructure`]: the `git` client and the configuration file store
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: shared error type and result helpers
//!
//! ## Error Handling
//!
//! - [`common::error::NestrepoError`]: crate-wide error with a recommendation per variant
//! - [`common::result::NestrepoResult`]: Type alias for `Result<T, NestrepoError>`
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nestrepo::application::services::repo_manager::RepoManager;
//! use nestrepo::application::use_cases::status_check::{StatusCheckConfig, StatusCheckUseCase};
//! use nestrepo::infrastructure::filesystem::ConfigStore;
//! use nestrepo::infrastructure::git::GitCli;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let root = std::path::Path::new(".");
//! let config = ConfigStore::new(root).load().await?;
//! let manager = RepoManager::new(root, Arc::new(GitCli::new()));
//!
//! let outcome = StatusCheckUseCase::new(StatusCheckConfig::default())
//!     .execute(&manager, &config)
//!     .await?;
//! println!("{} of {} repositories ok", outcome.summary.success_count, outcome.summary.total);
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::NestrepoError;
pub use crate::common::result::NestrepoResult as Result;
