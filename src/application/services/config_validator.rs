use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

use crate::domain::entities::project_config::ProjectConfig;
use crate::domain::value_objects::path_resolver::PathResolver;

/// Category of a configuration violation, in the order checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    Schema,
    DuplicateName,
    DuplicatePath,
    Overlap,
    MissingParent,
    Cycle,
}

/// One problem found in a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    /// Entry the violation is attached to (name when known, otherwise `repositories[i]`)
    pub entry: Option<String>,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>, entry: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            entry,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self.kind {
            ViolationKind::Schema => "Fix the field in project-repos.json",
            ViolationKind::DuplicateName => "Give every repository a unique name",
            ViolationKind::DuplicatePath => "Remove the repeated entry",
            ViolationKind::Overlap => {
                "Set `parent` on the nested repository to the enclosing repository's path"
            }
            ViolationKind::MissingParent => {
                "Point `parent` at an existing entry's path, or set it to null"
            }
            ViolationKind::Cycle => "Break the loop by making one of the entries top-level",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(f, "{}: {}", entry, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnStack,
    Done,
}

/// Structural and relational checks over a repository-set configuration
pub struct ConfigValidator;

impl ConfigValidator {
    /// Check field presence and JSON types of the raw document.
    ///
    /// Runs before typed decoding so every shape problem is reported together.
    pub fn check_schema(raw: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        let schema = |message: String, entry: Option<String>| {
            Violation::new(ViolationKind::Schema, message, entry)
        };

        let Some(root) = raw.as_object() else {
            violations.push(schema("document must be a JSON object".to_string(), None));
            return violations;
        };

        match root.get("version") {
            Some(Value::String(_)) => {}
            Some(_) => violations.push(schema("version must be a string".to_string(), None)),
            None => violations.push(schema("version is required".to_string(), None)),
        }

        match root.get("repositories") {
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    Self::check_entry_schema(index, entry, &mut violations);
                }
            }
            Some(_) => violations.push(schema("repositories must be an array".to_string(), None)),
            None => violations.push(schema("repositories is required".to_string(), None)),
        }

        match root.get("groups") {
            None | Some(Value::Null) => {}
            Some(Value::Object(groups)) => {
                for (name, group) in groups {
                    let label = Some(format!("groups.{}", name));
                    let Some(group) = group.as_object() else {
                        violations.push(schema("group must be an object".to_string(), label));
                        continue;
                    };
                    for field in ["description", "color"] {
                        if !matches!(group.get(field), None | Some(Value::Null | Value::String(_))) {
                            violations
                                .push(schema(format!("{} must be a string", field), label.clone()));
                        }
                    }
                }
            }
            Some(_) => violations.push(schema("groups must be an object".to_string(), None)),
        }

        match root.get("settings") {
            None | Some(Value::Null) => {}
            Some(Value::Object(settings)) => {
                let label = Some("settings".to_string());
                if !matches!(settings.get("defaultRemote"), Some(Value::String(_))) {
                    violations.push(schema(
                        "defaultRemote is required and must be a string".to_string(),
                        label.clone(),
                    ));
                }
                if !settings.get("scanDepth").map_or(false, Value::is_u64) {
                    violations.push(schema(
                        "scanDepth is required and must be a non-negative integer".to_string(),
                        label,
                    ));
                }
            }
            Some(_) => violations.push(schema("settings must be an object".to_string(), None)),
        }

        violations
    }

    fn check_entry_schema(index: usize, entry: &Value, violations: &mut Vec<Violation>) {
        let Some(fields) = entry.as_object() else {
            violations.push(Violation::new(
                ViolationKind::Schema,
                "entry must be an object",
                Some(format!("repositories[{}]", index)),
            ));
            return;
        };

        let label = fields
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("repositories[{}]", index));
        let mut push = |message: String| {
            violations.push(Violation::new(ViolationKind::Schema, message, Some(label.clone())));
        };

        for field in ["name", "path", "defaultBranch"] {
            match fields.get(field) {
                Some(Value::String(_)) => {}
                Some(_) => push(format!("{} must be a string", field)),
                None => push(format!("{} is required", field)),
            }
        }
        for field in ["remote", "parent", "description", "group"] {
            if !matches!(fields.get(field), None | Some(Value::Null | Value::String(_))) {
                push(format!("{} must be a string or null", field));
            }
        }
        match fields.get("tags") {
            None | Some(Value::Null) => {}
            Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => {}
            Some(_) => push("tags must be an array of strings".to_string()),
        }
    }

    /// Run every check over a decoded configuration and return all violations found.
    ///
    /// Order: field rules, name uniqueness, path uniqueness and overlap, parent existence,
    /// parent cycles.
    pub fn validate(config: &ProjectConfig) -> Vec<Violation> {
        let mut violations = Vec::new();
        Self::check_fields(config, &mut violations);
        Self::check_unique_names(config, &mut violations);
        Self::check_paths(config, &mut violations);
        Self::check_parents_exist(config, &mut violations);
        Self::check_cycles(config, &mut violations);
        violations
    }

    fn check_fields(config: &ProjectConfig, violations: &mut Vec<Violation>) {
        if config.version.trim().is_empty() {
            violations.push(Violation::new(
                ViolationKind::Schema,
                "version must not be empty",
                None,
            ));
        }

        for (index, entry) in config.repositories.iter().enumerate() {
            let label = if entry.name.is_empty() {
                format!("repositories[{}]", index)
            } else {
                entry.name.clone()
            };

            if let Err(errors) = entry.validate() {
                Self::push_field_errors(&errors, &label, violations);
            }

            if !entry.path.is_empty() {
                let normalized = entry.normalized_path();
                let climbs_out =
                    PathResolver::segments(&normalized).first().map(String::as_str) == Some("..");
                if PathResolver::is_absolute(&normalized) || climbs_out {
                    violations.push(Violation::new(
                        ViolationKind::Schema,
                        format!("path '{}' must be relative to the project root", entry.path),
                        Some(label.clone()),
                    ));
                }
            }
        }

        if let Some(settings) = &config.settings {
            if let Err(errors) = settings.validate() {
                Self::push_field_errors(&errors, "settings", violations);
            }
        }
    }

    fn push_field_errors(errors: &ValidationErrors, label: &str, violations: &mut Vec<Violation>) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, field_errors) in fields {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                violations.push(Violation::new(
                    ViolationKind::Schema,
                    message,
                    Some(label.to_string()),
                ));
            }
        }
    }

    fn check_unique_names(config: &ProjectConfig, violations: &mut Vec<Violation>) {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, entry) in config.repositories.iter().enumerate() {
            if entry.name.is_empty() {
                continue;
            }
            if let Some(first) = seen.get(entry.name.as_str()) {
                violations.push(Violation::new(
                    ViolationKind::DuplicateName,
                    format!(
                        "name '{}' is already used by repositories[{}]",
                        entry.name, first
                    ),
                    Some(format!("repositories[{}]", index)),
                ));
            } else {
                seen.insert(&entry.name, index);
            }
        }
    }

    fn check_paths(config: &ProjectConfig, violations: &mut Vec<Violation>) {
        let entries: Vec<(String, Option<String>, &str)> = config
            .repositories
            .iter()
            .map(|r| (r.normalized_path(), r.normalized_parent(), r.name.as_str()))
            .collect();
        let parents: HashMap<&str, Option<&str>> = entries
            .iter()
            .rev()
            .map(|(path, parent, _)| (path.as_str(), parent.as_deref()))
            .collect();

        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (path_a, _, name_a) = &entries[i];
                let (path_b, _, name_b) = &entries[j];

                if path_a == path_b {
                    violations.push(Violation::new(
                        ViolationKind::DuplicatePath,
                        format!("path '{}' is also used by '{}'", path_b, name_a),
                        Some(name_b.to_string()),
                    ));
                    continue;
                }
                if !PathResolver::overlaps(path_a, path_b) {
                    continue;
                }

                let (wider, narrower, narrower_name) = if PathResolver::is_ancestor(path_a, path_b)
                {
                    (path_a, path_b, name_b)
                } else {
                    (path_b, path_a, name_a)
                };
                if !Self::has_ancestor(&parents, narrower, wider) {
                    violations.push(Violation::new(
                        ViolationKind::Overlap,
                        format!(
                            "path '{}' is inside '{}' but does not declare it as a parent",
                            narrower, wider
                        ),
                        Some(narrower_name.to_string()),
                    ));
                }
            }
        }
    }

    /// Whether `ancestor` appears on the parent chain of `path`
    fn has_ancestor(parents: &HashMap<&str, Option<&str>>, path: &str, ancestor: &str) -> bool {
        let mut current = parents.get(path).copied().flatten();
        // Bounded by the entry count so a parent cycle cannot loop forever
        for _ in 0..parents.len() {
            match current {
                Some(p) if p == ancestor => return true,
                Some(p) => current = parents.get(p).copied().flatten(),
                None => return false,
            }
        }
        false
    }

    fn check_parents_exist(config: &ProjectConfig, violations: &mut Vec<Violation>) {
        for entry in &config.repositories {
            let Some(parent) = entry.normalized_parent() else {
                continue;
            };
            if config.find_by_path(&parent).is_none() {
                violations.push(Violation::new(
                    ViolationKind::MissingParent,
                    format!("parent '{}' does not match any repository path", parent),
                    Some(entry.name.clone()),
                ));
            }
        }
    }

    fn check_cycles(config: &ProjectConfig, violations: &mut Vec<Violation>) {
        let paths: Vec<String> = config
            .repositories
            .iter()
            .map(|r| r.normalized_path())
            .collect();
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for (index, path) in paths.iter().enumerate() {
            index_of.entry(path.as_str()).or_insert(index);
        }
        let next: Vec<Option<usize>> = config
            .repositories
            .iter()
            .map(|r| {
                r.normalized_parent()
                    .and_then(|p| index_of.get(p.as_str()).copied())
            })
            .collect();

        let mut state = vec![VisitState::Unvisited; next.len()];
        for start in 0..next.len() {
            if state[start] != VisitState::Unvisited {
                continue;
            }

            let mut stack: Vec<usize> = Vec::new();
            let mut current = Some(start);
            while let Some(node) = current {
                match state[node] {
                    VisitState::Done => break,
                    VisitState::OnStack => {
                        let begin = stack.iter().position(|&n| n == node).unwrap_or(0);
                        let members: Vec<&str> =
                            stack[begin..].iter().map(|&n| paths[n].as_str()).collect();
                        violations.push(Violation::new(
                            ViolationKind::Cycle,
                            format!(
                                "parent references form a cycle: {} -> {}",
                                members.join(" -> "),
                                paths[node]
                            ),
                            Some(config.repositories[node].name.clone()),
                        ));
                        break;
                    }
                    VisitState::Unvisited => {
                        state[node] = VisitState::OnStack;
                        stack.push(node);
                        current = next[node];
                    }
                }
            }

            for node in stack {
                state[node] = VisitState::Done;
            }
        }
    }
}
