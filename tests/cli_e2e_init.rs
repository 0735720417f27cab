//! End-to-end tests for the `codekit init` command.

mod common;

use common::CatalogFixture;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_init_prints_exports_and_writes_config() {
    let fixture = CatalogFixture::new();

    fixture
        .command()
        .arg("init")
        .arg(fixture.catalog_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("export CODEKIT_TEMPLATES_ROOT="))
        .stdout(predicate::str::contains("export CODEKIT_PACKAGES_ROOT="))
        .stdout(predicate::str::contains("Wrote default configuration"));

    let config_path = fixture.home().join(".codekit.json");
    let content = fs::read_to_string(&config_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["internalScopes"][0], "@repo");
    assert_eq!(parsed["defaultPackageManager"], "pnpm");
}

#[test]
fn test_init_keeps_existing_config_without_force() {
    let fixture = CatalogFixture::new();
    let config_path = fixture.home().join(".codekit.json");
    fs::write(&config_path, r#"{"internalScopes": ["@acme"]}"#).unwrap();

    fixture
        .command()
        .arg("init")
        .arg(fixture.catalog_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Keeping existing"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("@acme"));
}

#[test]
fn test_init_force_overwrites_config() {
    let fixture = CatalogFixture::new();
    let config_path = fixture.home().join(".codekit.json");
    fs::write(&config_path, r#"{"internalScopes": ["@acme"]}"#).unwrap();

    fixture
        .command()
        .arg("init")
        .arg(fixture.catalog_root())
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("@repo"));
}

#[test]
fn test_init_warns_on_missing_catalog_directories() {
    let fixture = CatalogFixture::new();
    let bare = fixture.home().join("bare-catalog");
    fs::create_dir_all(&bare).unwrap();

    fixture
        .command()
        .arg("init")
        .arg(&bare)
        .assert()
        .success()
        .stdout(predicate::str::contains("no apps/ directory"))
        .stdout(predicate::str::contains("no packages/ directory"));
}

#[test]
fn test_init_fails_for_missing_root() {
    let fixture = CatalogFixture::new();

    fixture
        .command()
        .args(["init", "/nonexistent/catalog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Catalog root does not exist"));
}
