use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::domain::entities::project_config::{DEFAULT_REMOTE, DEFAULT_SCAN_DEPTH};
use crate::domain::entities::repository_entry::DiscoveredRepo;
use crate::domain::value_objects::path_resolver::PathResolver;
use crate::infrastructure::git::GitOperations;

/// Directory names never descended into: dependency caches, build outputs, VCS internals
pub const BUILTIN_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "jspm_packages",
    "target",
    "build",
    "dist",
    "out",
    "coverage",
    "__pycache__",
    "venv",
    ".venv",
    ".tox",
    ".gradle",
    ".git",
    ".hg",
    ".svn",
];

/// Options for a discovery scan
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Deepest directory level inspected; the root is level 0
    pub max_depth: usize,

    /// Directory names (or root-relative paths) to skip
    pub exclude: Vec<String>,

    /// Keep scanning inside a discovered repository
    pub nested: bool,

    /// Remote whose URL is recorded when a repository has several
    pub preferred_remote: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_SCAN_DEPTH,
            exclude: Vec::new(),
            nested: true,
            preferred_remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl DiscoveryOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_preferred_remote(mut self, remote: impl Into<String>) -> Self {
        self.preferred_remote = remote.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Project root is not a directory: {}", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("Failed to resolve project root {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    pub fn recommendation(&self) -> String {
        match self {
            Self::RootNotADirectory(_) => {
                "Run from the project directory or pass it with -C <dir>".to_string()
            }
            Self::RootUnreadable { .. } => "Check that the directory exists and is readable".to_string(),
        }
    }
}

/// Depth-bounded, symlink-safe walk recording every git repository found.
///
/// A repository boundary does not end the walk when scanning nested repositories; it only
/// changes the parent recorded for repositories found below it.
pub struct RepoScanner<'a> {
    root: PathBuf,
    git: &'a dyn GitOperations,
    options: &'a DiscoveryOptions,
    visited: HashSet<PathBuf>,
    found: Vec<DiscoveredRepo>,
}

impl<'a> RepoScanner<'a> {
    pub fn new(
        root: &Path,
        git: &'a dyn GitOperations,
        options: &'a DiscoveryOptions,
    ) -> Result<Self, DiscoveryError> {
        let root = root
            .canonicalize()
            .map_err(|source| DiscoveryError::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })?;
        if !root.is_dir() {
            return Err(DiscoveryError::RootNotADirectory(root));
        }

        Ok(Self {
            root,
            git,
            options,
            visited: HashSet::new(),
            found: Vec::new(),
        })
    }

    /// Canonical project root the scan started from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree; results are in traversal order with unique names assigned
    pub fn scan(mut self) -> Vec<DiscoveredRepo> {
        let root = self.root.clone();
        self.visit(&root, 0, None);

        let mut found = self.found;
        assign_unique_names(&mut found, &self.root);
        found
    }

    fn visit(&mut self, dir: &Path, depth: usize, parent: Option<String>) {
        let canonical = match dir.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };
        if !self.visited.insert(canonical) {
            debug!(dir = %dir.display(), "skipping already visited directory");
            return;
        }

        let mut parent = parent;
        if self.git.is_git_repo(dir) {
            let relative = match PathResolver::to_relative(dir, &self.root) {
                Ok(relative) => relative,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping repository outside root");
                    return;
                }
            };
            debug!(path = %relative, parent = ?parent, "found repository");
            self.found
                .push(DiscoveredRepo::new(relative.clone(), String::new(), parent.clone()));

            if !self.options.nested {
                return;
            }
            parent = Some(relative);
        }

        if depth >= self.options.max_depth {
            return;
        }

        for child in self.child_directories(dir) {
            self.visit(&child, depth + 1, parent.clone());
        }
    }

    fn child_directories(&self, dir: &Path) -> Vec<PathBuf> {
        let (mut children, links): (Vec<DirEntry>, Vec<DirEntry>) = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| !self.is_skipped(entry.path()))
            .partition(|entry| !entry.path_is_symlink());

        // Real directories claim their canonical path before any alias can
        children.extend(
            links
                .into_iter()
                .filter(|entry| self.follows_outside_root(entry.path())),
        );
        children.into_iter().map(|entry| entry.into_path()).collect()
    }

    /// A link into the project tree is skipped: its target is walked under its real path
    fn follows_outside_root(&self, link: &Path) -> bool {
        match link.canonicalize() {
            Ok(target) if target.starts_with(&self.root) => {
                debug!(
                    link = %link.display(),
                    target = %target.display(),
                    "skipping symlink into the project tree"
                );
                false
            }
            Ok(_) => true,
            Err(e) => {
                debug!(link = %link.display(), error = %e, "skipping dangling symlink");
                false
            }
        }
    }

    fn is_skipped(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return true;
        };

        if name.starts_with('.') {
            debug!(dir = %path.display(), "skipping hidden directory");
            return true;
        }
        if BUILTIN_SKIP_DIRS.contains(&&*name) {
            debug!(dir = %path.display(), "skipping built-in excluded directory");
            return true;
        }

        let relative = PathResolver::to_relative(path, &self.root).unwrap_or_default();
        let excluded = self.options.exclude.iter().any(|pattern| {
            let pattern = PathResolver::normalize(pattern);
            pattern.as_str() == &*name || pattern == relative
        });
        if excluded {
            debug!(dir = %path.display(), "skipping excluded directory");
        }
        excluded
    }
}

/// Name derived from a repository path: segments joined with `-`, the root takes its
/// directory name
pub fn derive_name(path: &str, root: &Path) -> String {
    let segments = PathResolver::segments(path);
    if segments.is_empty() {
        return root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
    }
    segments.join("-")
}

/// Fill in names, suffixing `-2`, `-3`, … on collision
pub fn assign_unique_names(repos: &mut [DiscoveredRepo], root: &Path) {
    let mut used = HashSet::new();
    for repo in repos.iter_mut() {
        let base = derive_name(&repo.path, root);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        used.insert(candidate.clone());
        repo.name = candidate;
    }
}
