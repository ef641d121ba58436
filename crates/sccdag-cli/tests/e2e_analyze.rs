//! E2E tests for `sccdag sample` and `sccdag analyze`.
//!
//! Round-trips sample graphs through the filesystem and checks pretty, text
//! and JSON output plus the error paths.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn sccdag_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sccdag"));
    cmd.current_dir(dir);
    cmd.env("SCCDAG_LOG", "error");
    cmd.env_remove("SCCDAG_FORMAT");
    cmd
}

fn write_sample(dir: &Path, name: &str, file: &str) {
    let output = sccdag_cmd(dir)
        .args(["sample", name])
        .output()
        .expect("sample should not crash");
    assert!(
        output.status.success(),
        "sample failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    std::fs::write(dir.join(file), &output.stdout).expect("write sample");
}

fn analyze_json(dir: &Path, args: &[&str]) -> Value {
    let output = sccdag_cmd(dir)
        .arg("analyze")
        .args(args)
        .arg("--json")
        .output()
        .expect("analyze should not crash");
    assert!(
        output.status.success(),
        "analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

#[test]
fn sample_prints_a_loadable_document() {
    let dir = TempDir::new().unwrap();
    let output = sccdag_cmd(dir.path())
        .args(["sample", "cyclic"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let doc: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(doc["vertices"], 4);
    assert_eq!(doc["edges"].as_array().unwrap().len(), 4);
    assert_eq!(doc["labels"]["0"], "A");
}

#[test]
fn sample_rejects_unknown_name() {
    let dir = TempDir::new().unwrap();
    sccdag_cmd(dir.path())
        .args(["sample", "tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tree"));
}

#[test]
fn analyze_pretty_reports_each_stage() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path(), "cyclic", "cyclic.json");

    sccdag_cmd(dir.path())
        .args(["analyze", "cyclic.json", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset: cyclic"))
        .stdout(predicate::str::contains("Strongly connected components (2)"))
        .stdout(predicate::str::contains("Condensation (weight policy: first-seen)"))
        .stdout(predicate::str::contains("Critical path"))
        .stdout(predicate::str::contains("Summary"));
}

#[test]
fn analyze_json_has_datasets_and_summary() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path(), "simple-dag", "simple.json");
    write_sample(dir.path(), "cyclic", "cyclic.json");

    let json = analyze_json(dir.path(), &["simple.json", "cyclic.json"]);
    assert_eq!(json["builtin_samples"], false);

    let summary = json["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0]["dataset"], "simple");
    assert_eq!(summary[0]["is_dag"], true);
    assert_eq!(summary[0]["sccs"], 6);
    assert_eq!(summary[1]["dataset"], "cyclic");
    assert_eq!(summary[1]["is_dag"], false);
    assert_eq!(summary[1]["sccs"], 2);

    let simple = &json["datasets"][0];
    assert!(simple["cycle"].is_null());
    assert_eq!(simple["critical_path"]["length"], 11);
}

#[test]
fn analyze_reads_the_data_directory_by_default() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write_sample(dir.path(), "complex-dag", "data/complex.json");
    std::fs::write(data.join("broken.json"), "{ not json").unwrap();

    let json = analyze_json(dir.path(), &[]);
    assert_eq!(json["builtin_samples"], false);
    let summary = json["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0]["dataset"], "complex");
    assert_eq!(json["datasets"][0]["critical_path"]["length"], 17);
}

#[test]
fn analyze_falls_back_to_builtin_samples() {
    let dir = TempDir::new().unwrap();
    let json = analyze_json(dir.path(), &[]);
    assert_eq!(json["builtin_samples"], true);
    let names: Vec<&str> = json["summary"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["dataset"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["simple-dag", "cyclic", "complex-dag"]);
}

#[test]
fn analyze_text_output_is_line_oriented() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path(), "cyclic", "cyclic.json");

    sccdag_cmd(dir.path())
        .args(["analyze", "cyclic.json", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dataset=cyclic vertices=4 edges=4 sccs=2 dag=no"));
}

#[test]
fn config_file_sets_weight_policy_and_flags_override_it() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path(), "cyclic", "cyclic.json");
    std::fs::write(
        dir.path().join("sccdag.toml"),
        "[condensation]\nweight_policy = \"max\"\n",
    )
    .unwrap();

    let json = analyze_json(dir.path(), &["cyclic.json"]);
    assert_eq!(json["datasets"][0]["condensation"]["policy"], "max");

    let json = analyze_json(dir.path(), &["cyclic.json", "--weight-policy", "sum"]);
    assert_eq!(json["datasets"][0]["condensation"]["policy"], "sum");
}

#[test]
fn no_critical_path_flag_skips_the_search() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path(), "simple-dag", "simple.json");

    let json = analyze_json(dir.path(), &["simple.json", "--no-critical-path"]);
    assert!(json["datasets"][0]["critical_path"].is_null());
    assert!(json["datasets"][0]["shortest_paths"].is_object());
}

#[test]
fn bad_weight_policy_fails() {
    let dir = TempDir::new().unwrap();
    sccdag_cmd(dir.path())
        .args(["analyze", "--weight-policy", "avg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("avg"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    sccdag_cmd(dir.path())
        .args(["analyze", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn json_errors_are_structured() {
    let dir = TempDir::new().unwrap();
    let output = sccdag_cmd(dir.path())
        .args(["analyze", "--config", "absent.toml", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stderr).expect("valid JSON error");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("absent.toml")
    );
}
