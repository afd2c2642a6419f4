use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
use thiserror::Error;

/// Errors raised by path arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path cannot be empty")]
    Empty,

    #[error("Path contains null bytes")]
    ContainsNullBytes,

    #[error("Path '{path}' escapes project root '{root}'")]
    EscapesRoot { path: String, root: String },

    #[error("Cannot express '{path}' relative to '{base}'")]
    NotRelativizable { path: String, base: String },
}

impl PathError {
    /// Human-actionable advice for this error
    pub fn recommendation(&self) -> String {
        match self {
            Self::Empty | Self::ContainsNullBytes => {
                "Fix the repository path in project-repos.json".to_string()
            }
            Self::EscapesRoot { .. } => {
                "Repository paths must stay inside the project root; re-run `repo init` to rebuild them"
                    .to_string()
            }
            Self::NotRelativizable { .. } => {
                "Use absolute paths for both the project root and the repository".to_string()
            }
        }
    }
}

/// Pure path arithmetic over the persisted forward-slash form.
///
/// Nothing here touches the filesystem. Persisted paths always use `/`; the
/// platform-native form is produced by [`PathResolver::to_native`] only when a path is
/// handed to the OS or to git.
pub struct PathResolver;

impl PathResolver {
    /// Collapse `.`/`..` segments and rewrite separators to `/`.
    ///
    /// An empty relative result becomes `"."`. Leading `..` segments of relative paths are
    /// kept; `..` at the root of an absolute path is dropped.
    pub fn normalize(path: &str) -> String {
        let unified = path.replace('\\', "/");
        let (prefix, rest) = Self::split_prefix(&unified);
        let is_absolute = prefix.is_some();

        let mut segments: Vec<&str> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => match segments.last() {
                    Some(last) if *last != ".." => {
                        segments.pop();
                    }
                    _ if is_absolute => {}
                    _ => segments.push(".."),
                },
                other => segments.push(other),
            }
        }

        match prefix {
            Some(prefix) => format!("{}{}", prefix, segments.join("/")),
            None if segments.is_empty() => ".".to_string(),
            None => segments.join("/"),
        }
    }

    /// Whether the path is absolute in either POSIX or Windows drive form
    pub fn is_absolute(path: &str) -> bool {
        let unified = path.replace('\\', "/");
        Self::split_prefix(&unified).0.is_some()
    }

    /// Normalized segments; the project root `"."` has none
    pub fn segments(path: &str) -> Vec<String> {
        let normalized = Self::normalize(path);
        let (prefix, rest) = Self::split_prefix(&normalized);
        let mut segments: Vec<String> = prefix.map(|p| vec![p.to_string()]).unwrap_or_default();
        segments.extend(
            rest.split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .map(str::to_string),
        );
        segments
    }

    /// Platform-native form of a normalized path
    pub fn to_native(path: &str) -> PathBuf {
        PathBuf::from(Self::normalize(path).replace('/', MAIN_SEPARATOR_STR))
    }

    /// Normalized persisted form of an OS path
    pub fn from_native(path: &Path) -> String {
        Self::normalize(&path.to_string_lossy())
    }

    /// Resolve a configured repository path against the project root.
    ///
    /// Absolute paths must already lie under the root; relative paths are joined with it.
    /// Either way the result may not escape the root.
    pub fn resolve(repo_path: &str, project_root: &Path) -> Result<PathBuf, PathError> {
        if repo_path.is_empty() {
            return Err(PathError::Empty);
        }
        if repo_path.contains('\0') {
            return Err(PathError::ContainsNullBytes);
        }

        let root = Self::from_native(project_root);
        let candidate = if Self::is_absolute(repo_path) {
            Self::normalize(repo_path)
        } else {
            Self::normalize(&format!("{}/{}", root, repo_path))
        };

        if !Self::contains(&root, &candidate) {
            return Err(PathError::EscapesRoot {
                path: repo_path.to_string(),
                root,
            });
        }

        Ok(Self::to_native(&candidate))
    }

    /// Express `absolute_path` relative to `base_path` in persisted form
    pub fn to_relative(absolute_path: &Path, base_path: &Path) -> Result<String, PathError> {
        let path = Self::from_native(absolute_path);
        let base = Self::from_native(base_path);

        pathdiff::diff_paths(Self::to_native(&path), Self::to_native(&base))
            .map(|relative| Self::normalize(&relative.to_string_lossy()))
            .ok_or(PathError::NotRelativizable { path, base })
    }

    /// Inverse of [`PathResolver::to_relative`]
    pub fn to_absolute(relative_path: &str, base_path: &Path) -> PathBuf {
        if Self::is_absolute(relative_path) {
            return Self::to_native(relative_path);
        }
        let base = Self::from_native(base_path);
        Self::to_native(&format!("{}/{}", base, relative_path))
    }

    /// True if one path's segments are a prefix of the other's. Equal paths overlap.
    pub fn overlaps(path_a: &str, path_b: &str) -> bool {
        let a = Self::segments(path_a);
        let b = Self::segments(path_b);
        if a.len() <= b.len() {
            b.starts_with(&a)
        } else {
            a.starts_with(&b)
        }
    }

    /// True if `ancestor` strictly encloses `path`
    pub fn is_ancestor(ancestor: &str, path: &str) -> bool {
        let a = Self::segments(ancestor);
        let p = Self::segments(path);
        p.len() > a.len() && p.starts_with(&a)
    }

    /// `ancestor` equals or encloses `path` without `path` climbing out through `..`
    fn contains(ancestor: &str, path: &str) -> bool {
        let a = Self::segments(ancestor);
        let p = Self::segments(path);
        p.starts_with(&a) && !p[a.len()..].iter().any(|s| s == "..")
    }

    /// Split a `/`-separated path into its absolute prefix (`/` or `C:/`) and remainder
    fn split_prefix(path: &str) -> (Option<&str>, &str) {
        if let Some(rest) = path.strip_prefix('/') {
            return (Some("/"), rest);
        }
        let bytes = path.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            if bytes.len() == 2 {
                return (Some(&path[..2]), "");
            }
            if bytes[2] == b'/' {
                return (Some(&path[..3]), &path[3..]);
            }
        }
        (None, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_segments() {
        assert_eq!(PathResolver::normalize("a/./b/../c"), "a/c");
        assert_eq!(PathResolver::normalize("a\\b\\c"), "a/b/c");
        assert_eq!(PathResolver::normalize("./"), ".");
        assert_eq!(PathResolver::normalize(""), ".");
        assert_eq!(PathResolver::normalize("a//b/"), "a/b");
        assert_eq!(PathResolver::normalize("../x"), "../x");
        assert_eq!(PathResolver::normalize("a/../../x"), "../x");
    }

    #[test]
    fn test_normalize_absolute() {
        assert_eq!(PathResolver::normalize("/proj/./a/../b"), "/proj/b");
        assert_eq!(PathResolver::normalize("/../a"), "/a");
        assert_eq!(PathResolver::normalize("/"), "/");
        assert_eq!(PathResolver::normalize("C:\\proj\\a"), "C:/proj/a");
    }

    #[test]
    fn test_segments() {
        assert!(PathResolver::segments(".").is_empty());
        assert_eq!(PathResolver::segments("a/b"), vec!["a", "b"]);
        assert_eq!(PathResolver::segments("/a"), vec!["/", "a"]);
    }

    #[test]
    fn test_resolve_relative() {
        let root = Path::new("/proj");
        let resolved = PathResolver::resolve("backend/vendor/lib", root).unwrap();
        assert_eq!(PathResolver::from_native(&resolved), "/proj/backend/vendor/lib");

        let resolved = PathResolver::resolve(".", root).unwrap();
        assert_eq!(PathResolver::from_native(&resolved), "/proj");
    }

    #[test]
    fn test_resolve_absolute_inside_root() {
        let resolved = PathResolver::resolve("/proj/frontend", Path::new("/proj")).unwrap();
        assert_eq!(PathResolver::from_native(&resolved), "/proj/frontend");
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let root = Path::new("/proj");
        assert!(matches!(
            PathResolver::resolve("../other", root),
            Err(PathError::EscapesRoot { .. })
        ));
        assert!(matches!(
            PathResolver::resolve("/elsewhere/repo", root),
            Err(PathError::EscapesRoot { .. })
        ));
        assert!(matches!(
            PathResolver::resolve("a/../../b", root),
            Err(PathError::EscapesRoot { .. })
        ));
        // A sibling sharing a string prefix is still outside
        assert!(matches!(
            PathResolver::resolve("/project/a", root),
            Err(PathError::EscapesRoot { .. })
        ));
        assert_eq!(PathResolver::resolve("", root), Err(PathError::Empty));
    }

    #[test]
    fn test_resolve_relative_root() {
        assert!(PathResolver::resolve("a", Path::new(".")).is_ok());
        assert!(PathResolver::resolve("../a", Path::new(".")).is_err());
    }

    #[test]
    fn test_to_relative_and_back() {
        let base = Path::new("/proj");
        let rel = PathResolver::to_relative(Path::new("/proj/backend/vendor/lib"), base).unwrap();
        assert_eq!(rel, "backend/vendor/lib");

        let same = PathResolver::to_relative(Path::new("/proj"), base).unwrap();
        assert_eq!(same, ".");

        let abs = PathResolver::to_absolute(&rel, base);
        assert_eq!(PathResolver::from_native(&abs), "/proj/backend/vendor/lib");
    }

    #[test]
    fn test_to_relative_requires_compatible_paths() {
        let result = PathResolver::to_relative(Path::new("relative/path"), Path::new("/proj"));
        assert!(matches!(result, Err(PathError::NotRelativizable { .. })));
    }

    #[test]
    fn test_overlaps() {
        assert!(PathResolver::overlaps("backend", "backend/vendor/lib"));
        assert!(PathResolver::overlaps("backend/vendor/lib", "backend"));
        assert!(PathResolver::overlaps("backend", "./backend/"));
        assert!(PathResolver::overlaps(".", "frontend"));
        assert!(!PathResolver::overlaps("backend", "backend-api"));
        assert!(!PathResolver::overlaps("backend", "frontend"));
    }

    #[test]
    fn test_is_ancestor() {
        assert!(PathResolver::is_ancestor("backend", "backend/lib"));
        assert!(PathResolver::is_ancestor(".", "backend"));
        assert!(!PathResolver::is_ancestor("backend", "backend"));
        assert!(!PathResolver::is_ancestor("backend/lib", "backend"));
    }
}
