use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("outputs"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netweave"));
}

#[test]
fn test_plan_reference_topology() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args(["plan", "--cluster-name", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.0.2.0/24"))
        .stdout(predicate::str::contains("10.0.12.0/24"))
        .stdout(predicate::str::contains("demo-nat-3"))
        .stdout(predicate::str::contains("demo-public-1, demo-public-2, demo-public-3"));
}

#[test]
fn test_plan_json_emits_create_actions() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args(["plan", "--cluster-name", "demo", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"action_type\": \"create\""))
        .stdout(predicate::str::contains("\"resource_type\": \"nat-gateway\""));
}

#[test]
fn test_plan_honors_zone_flag() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args(["plan", "--cluster-name", "demo", "--zones", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo-public-2"))
        .stdout(predicate::str::contains("demo-public-3").not());
}

#[test]
fn test_validate_rejects_narrow_cidr() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args([
        "validate",
        "--cluster-name",
        "demo",
        "--vpc-cidr",
        "10.0.0.0/20",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_validate_reports_environment_shortfall() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args([
        "validate",
        "--cluster-name",
        "demo",
        "--zones",
        "5",
        "--available-zones",
        "us-east-1a,us-east-1b",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Environment error"));
}

#[test]
fn test_plan_fails_on_zone_shortfall() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args([
        "plan",
        "--cluster-name",
        "demo",
        "--zones",
        "5",
        "--available-zones",
        "us-east-1a,us-east-1b",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("only 2"));
}

#[test]
fn test_plan_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("netweave.json"),
        r#"{"cluster_name": "filedemo", "zone_count": 2}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.current_dir(dir.path())
        .args(["plan", "--file", "netweave.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("filedemo-public-2"));
}

#[test]
fn test_unknown_region_is_rejected() {
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.args(["plan", "--cluster-name", "demo", "--region", "mars-north-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown region"));
}

#[test]
fn test_outputs_require_applied_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("netweave").unwrap();
    cmd.current_dir(dir.path())
        .args(["outputs", "--cluster-name", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not fully applied"));
}
