use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    let raw = fs::read_to_string(path).expect("read output");
    serde_json::from_str(&raw).expect("output is JSON")
}

#[test]
fn merge_yaml_documents_into_json() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("merged.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(fixture("fixtures/base.yaml"))
        .arg(fixture("fixtures/overlay.yaml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote"));

    assert_eq!(
        read_json(&out),
        json!({
            "name": "proxy-rules",
            "version": [2, 3],
            "settings": {
                "mode": "rule",
                "dns": {
                    "enable": true,
                    "servers": ["1.1.1.1", "8.8.8.8", "9.9.9.9"]
                },
                "log-level": "info"
            },
            "payload": [
                "DOMAIN,example.com",
                "DOMAIN-SUFFIX,google.com",
                "DOMAIN-KEYWORD,youtube"
            ]
        })
    );
}

#[test]
fn merge_writes_yaml_and_keeps_base_key_order() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("merged.yaml");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(fixture("fixtures/base.yaml"))
        .arg(fixture("fixtures/overlay.yaml"))
        .arg("-o")
        .arg(&out)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&out).expect("read output");
    let name = text.find("name:").expect("name key");
    let settings = text.find("settings:").expect("settings key");
    let payload = text.find("payload:").expect("payload key");
    assert!(name < settings && settings < payload);
    assert!(text.contains("log-level: info"));
}

#[test]
fn merge_honors_explicit_formats() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("base.txt");
    let overlay = dir.path().join("overlay.txt");
    fs::write(&base, "{\"tags\": [1, 2]}").expect("write base");
    fs::write(&overlay, "tags: [2, 3]\n").expect("write overlay");
    let out = dir.path().join("out.data");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(&base)
        .arg(&overlay)
        .arg("--base-format")
        .arg("json")
        .arg("--overlay-format")
        .arg("yaml")
        .arg("--to")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(read_json(&out), json!({"tags": [1, 2, 3]}));
}

#[test]
fn merge_refuses_to_overwrite_an_input() {
    let dir = tempdir().expect("tempdir");
    let base = dir.path().join("base.yaml");
    fs::copy(fixture("fixtures/base.yaml"), &base).expect("copy base");
    let before = fs::read_to_string(&base).expect("read base");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(&base)
        .arg(fixture("fixtures/overlay.yaml"))
        .arg("--output")
        .arg(&base)
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source file"));

    assert_eq!(fs::read_to_string(&base).expect("read base"), before);
}

#[test]
fn malformed_input_fails_without_output() {
    let dir = tempdir().expect("tempdir");
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"rules\": [").expect("write broken");
    let out = dir.path().join("out.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(fixture("fixtures/rules_a.json"))
        .arg(&broken)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));

    assert!(!out.exists());
}

#[test]
fn unknown_output_extension_needs_to_flag() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("merged.txt");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ruleset-convert"));
    cmd.arg("merge")
        .arg(fixture("fixtures/base.yaml"))
        .arg(fixture("fixtures/overlay.yaml"))
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot infer output format"));
}
