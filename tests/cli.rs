// ABOUTME: Integration tests for the dockership CLI.
// ABOUTME: Covers --help output and failures that happen before any runtime is contacted.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const CONFIG: &str = r#"
environments:
  production:
    endpoints:
      - unix:///nonexistent/docker.sock
projects:
  web: {}
"#;

fn dockership_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dockership"))
}

fn project_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("dockership.yml"), CONFIG).unwrap();
    dir
}

#[test]
fn help_shows_commands() {
    dockership_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn deploy_requires_revision() {
    let dir = project_dir();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["deploy", "web", "-e", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--revision"));
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["status", "-e", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn unknown_environment_is_reported() {
    let dir = project_dir();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["clean", "web", "-e", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown environment: staging"));
}

#[test]
fn unknown_project_is_reported() {
    let dir = project_dir();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["deploy", "api", "-e", "production", "-r", "abc1234"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown project: api"));
}

#[test]
fn invalid_revision_is_reported() {
    let dir = project_dir();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["deploy", "web", "-e", "production", "-r", "feature/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid character in revision"));
}

#[test]
fn explicit_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yml");
    fs::write(&path, "projects: {}").unwrap();

    dockership_cmd()
        .arg("--config")
        .arg(&path)
        .args(["status", "-e", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one project is required"));
}

#[test]
fn json_errors_are_structured() {
    let dir = project_dir();
    dockership_cmd()
        .current_dir(dir.path())
        .args(["--json", "clean", "web", "-e", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""event":"error""#));
}
