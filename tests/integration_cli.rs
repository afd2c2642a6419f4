//! End-to-end runs of the `nestrepo` binary.
//!
//! `NESTREPO_GIT` points at a binary that does not exist, so every git invocation fails
//! to spawn and the results do not depend on a local git installation.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::test_fixtures::{nested_config, nested_project, ProjectTree};

const MISSING_GIT: &str = "nestrepo-test-missing-git";

fn nestrepo(tree: &ProjectTree) -> Command {
    let mut cmd = Command::cargo_bin("nestrepo").unwrap();
    cmd.arg("--no-color")
        .arg("-C")
        .arg(tree.root())
        .env("NESTREPO_GIT", MISSING_GIT)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_includes_build_metadata() {
    Command::cargo_bin("nestrepo")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nestrepo 0.1.0 ("));
}

#[test]
fn test_status_without_configuration_suggests_init() {
    let tree = nested_project();

    nestrepo(&tree)
        .args(["repo", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repo init"));
}

#[test]
fn test_init_writes_nested_configuration() {
    let tree = nested_project();

    nestrepo(&tree)
        .args(["repo", "init", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 repositories"));

    let raw = tree.read_config();
    let paths: Vec<_> = raw["repositories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["backend", "backend/vendor/lib", "frontend"]);
    assert_eq!(raw["repositories"][1]["parent"], "backend");
}

#[test]
fn test_init_without_nesting_and_with_exclusions() {
    let tree = nested_project().with_repo("scratch");

    nestrepo(&tree)
        .args(["repo", "init", "-y", "--no-nested", "--exclude", "scratch"])
        .assert()
        .success();

    let raw = tree.read_config();
    assert_eq!(raw["repositories"].as_array().unwrap().len(), 2);
}

#[test]
fn test_init_keeps_existing_configuration_when_not_confirmed() {
    let tree = nested_project().with_config(&nested_config());
    let before = tree.read_config();

    nestrepo(&tree)
        .args(["repo", "init"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--yes"));

    assert_eq!(tree.read_config(), before);
}

#[test]
fn test_init_json_keeps_prompt_off_stdout() {
    let tree = nested_project().with_config(&nested_config());
    let before = tree.read_config();

    nestrepo(&tree)
        .args(["--output", "json", "repo", "init"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Overwrite it?"))
        .stderr(predicate::str::contains("--yes"));

    assert_eq!(tree.read_config(), before);
}

#[test]
fn test_exec_rejects_empty_command() {
    let tree = nested_project().with_config(&nested_config());

    nestrepo(&tree)
        .args(["repo", "exec", "git"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Command is empty"));
}

#[test]
fn test_status_json_reports_every_failure() {
    let tree = nested_project().with_config(&nested_config());

    let output = nestrepo(&tree)
        .args(["--output", "json", "repo", "status"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["operation"], "status");
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["failureCount"], 3);
    let message = report["report"]["results"][0]["error"]["message"]
        .as_str()
        .unwrap();
    assert!(message.contains(MISSING_GIT));
}

#[test]
fn test_filter_matching_nothing_succeeds_with_warning() {
    let tree = nested_project().with_config(&nested_config());

    nestrepo(&tree)
        .args(["repo", "health", "--filter", "no-such-repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repository matches 'no-such-repo'"));
}

#[test]
fn test_invalid_configuration_lists_violations() {
    let tree = nested_project().with_raw_config(
        r#"{
          "version": "1.0",
          "repositories": [
            { "name": "backend", "path": "backend", "remote": null, "defaultBranch": "main", "parent": null },
            { "name": "lib", "path": "backend/vendor/lib", "remote": null, "defaultBranch": "main", "parent": "missing" }
          ]
        }"#,
    );

    nestrepo(&tree)
        .args(["repo", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing"))
        .stderr(predicate::str::contains("fix:"));
}

#[test]
fn test_max_depth_out_of_range_is_a_usage_error() {
    let tree = nested_project();

    nestrepo(&tree)
        .args(["repo", "init", "-y", "--max-depth", "40"])
        .assert()
        .code(2);
}
