//! Integration tests for the apiful CLI.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn apiful_cmd() -> Command {
    Command::cargo_bin("apiful").unwrap()
}

#[test]
fn cli_shows_help() {
    apiful_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("infer"));
}

#[test]
fn infer_prints_typescript() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{ "id": 1, "name": "Rex" }"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"{ "id": 2, "tag": "dog" }"#).unwrap();

    apiful_cmd()
        .current_dir(dir.path())
        .args(["infer", "a.json", "b.json", "--type-name", "Pet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export interface Pet {"))
        .stdout(predicate::str::contains("  id?: number"))
        .stdout(predicate::str::contains("  tag?: string"));
}

#[test]
fn infer_prints_json_schema() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{ "id": 1 }"#).unwrap();

    apiful_cmd()
        .current_dir(dir.path())
        .args(["infer", "a.json", "--strict", "--json-schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"required\""))
        .stdout(predicate::str::contains("\"id\""));
}

#[test]
fn infer_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{ nope").unwrap();

    apiful_cmd()
        .current_dir(dir.path())
        .args(["infer", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.json"));
}

#[test]
fn generate_fails_without_config() {
    let dir = TempDir::new().unwrap();

    apiful_cmd()
        .args(["generate", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("apiful.toml"));
}

#[test]
fn generate_fails_without_schemas() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("apiful.toml"),
        "[services.petStore]\nurl = \"https://petstore.example\"\n",
    )
    .unwrap();

    apiful_cmd()
        .args(["generate", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No services with a schema are configured"))
        .stderr(predicate::str::contains("EmptyRegistry").not());

    assert!(!dir.path().join("apiful.d.ts").exists());
}

#[test]
fn generate_writes_declarations() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("apiful.toml"),
        "[services.petStore]\nschema = \"pets.json\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("pets.json"),
        r#"{ "openapi": "3.1.0", "paths": {} }"#,
    )
    .unwrap();

    // `cat` echoes the document back, which is enough to exercise the pipeline.
    apiful_cmd()
        .args(["generate", "--compiler", "cat", "--definition", "types/", "--cwd"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let content = fs::read_to_string(dir.path().join("types/apiful.d.ts")).unwrap();
    assert!(content.contains("    petStore: PetStorePaths"));
    assert!(content.contains("declare module 'apiful/__petStore__' {"));
    assert!(content.contains("\"openapi\":\"3.1.0\""));
}
