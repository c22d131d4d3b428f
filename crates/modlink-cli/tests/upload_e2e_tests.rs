//! End-to-end tests for the modlink binary
//!
//! These run the real executable against fixture directories. None of them
//! needs a database: they either use `--dry-run` or fail before connecting.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNUSED_DATABASE_URL: &str = "postgres://modlink@127.0.0.1:1/unused";

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn module_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.html", "2");
    write(dir.path(), "c.html", "3");
    write(dir.path(), "a.html", "1");
    write(dir.path(), "module.yml", "module:\n  name: A\n  description: B\n");
    dir
}

fn modlink() -> Command {
    let mut cmd = Command::cargo_bin("modlink").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("MODLINK_CONFIG")
        .env("LOG_LEVEL", "error")
        .env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// Dry Run
// ============================================================================

#[test]
fn test_dry_run_prints_chain_in_name_order() {
    let dir = module_fixture();

    modlink()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("module 'A' would be stored with 3 fragment(s)"))
        .stdout(predicate::str::contains("a.html -> b.html -> c.html"));
}

#[test]
fn test_dry_run_verbose_prints_progress() {
    let dir = module_fixture();

    modlink()
        .arg(dir.path())
        .args(["--dry-run", "--verbose", "-s", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ordered 3 fragment(s)"))
        .stdout(predicate::str::contains("Reading module descriptor"))
        .stdout(predicate::str::contains("subscription plan 2"));
}

#[test]
fn test_dry_run_quiet_by_default() {
    let dir = module_fixture();

    modlink()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ordered").not());
}

#[test]
fn test_dry_run_with_separate_metadata_dir() {
    let content = TempDir::new().unwrap();
    write(content.path(), "only.html", "x");
    let meta = TempDir::new().unwrap();
    write(meta.path(), "nested/module.yaml", "module: {name: Solo, description: One}");

    modlink()
        .arg(content.path())
        .arg("--module")
        .arg(meta.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("module 'Solo' would be stored with 1 fragment(s)"));
}

// ============================================================================
// Descriptor Errors
// ============================================================================

#[test]
fn test_missing_descriptor_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.html", "1");

    modlink()
        .arg(dir.path())
        .args(["--database-url", UNUSED_DATABASE_URL])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No module descriptor"));
}

#[test]
fn test_two_descriptors_fail() {
    let dir = module_fixture();
    write(dir.path(), "extra.yaml", "module:\n  name: C\n  description: D\n");

    modlink()
        .arg(dir.path())
        .args(["--database-url", UNUSED_DATABASE_URL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Multiple module descriptors"));
}

#[test]
fn test_missing_module_key_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.html", "1");
    write(dir.path(), "module.yml", "course:\n  name: A\n");

    modlink()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Field 'module' missing"));
}

#[test]
fn test_disallowed_key_fails() {
    let dir = module_fixture();
    write(
        dir.path(),
        "module.yml",
        "module:\n  name: A\n  description: B\n  price: 10\n",
    );

    modlink()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid field 'module.price'"));
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_missing_config_section_fails_before_upload() {
    let dir = module_fixture();
    let config_dir = TempDir::new().unwrap();
    write(config_dir.path(), "database.ini", "[mysql]\nhost=localhost\n");

    modlink()
        .arg(dir.path())
        .arg("--config")
        .arg(config_dir.path().join("database.ini"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section postgresql not found"));
}

#[test]
fn test_missing_path_argument() {
    modlink().assert().failure().code(2);
}

#[test]
fn test_markdown_help() {
    modlink()
        .arg("--markdown-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("modlink"));
}
