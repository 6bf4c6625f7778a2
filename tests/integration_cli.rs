/// Integration tests for the monitorgen binary
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const SHOP_YAML: &str = "\
name: Shop
backend_language: python
monitoring_rules:
  - kind: track
    metric: page views
  - kind: track
    metric: response times for all api endpoints
  - kind: alert
    condition: error rate is above 5%
    channel: Slack
  - kind: log
    metric: all API requests
    service: X
    duration: 90 days
";

#[test]
fn test_generate_command_writes_files() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("shop.yaml");
    fs::write(&app, SHOP_YAML).unwrap();
    let out = dir.path().join("monitoring");

    Command::cargo_bin("monitorgen")
        .unwrap()
        .arg("generate")
        .arg("--app")
        .arg(&app)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 8 files"))
        .stdout(predicate::str::contains("instrumentation/metrics.py"));

    assert!(out.join("instrumentation/middleware.py").is_file());
    assert!(out.join("prometheus/alerts.yml").is_file());
}

#[test]
fn test_plan_command_prints_classification() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("shop.yaml");
    fs::write(&app, SHOP_YAML).unwrap();

    Command::cargo_bin("monitorgen")
        .unwrap()
        .args(["plan", "--app"])
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains("[custom  ] page views"))
        .stdout(predicate::str::contains("[standard] response times for all api endpoints"))
        .stdout(predicate::str::contains("ErrorRateIsAbove5"))
        .stdout(predicate::str::contains("Log retention: 90d"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_generate_with_json_app_and_config() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("shop.json");
    fs::write(
        &app,
        r#"{"name": "shop", "backend_language": "node", "monitoring_rules": [{"kind": "track", "metric": "active users"}]}"#,
    )
    .unwrap();
    let config = dir.path().join("monitorgen.yml");
    fs::write(&config, "grafana:\n  port: 3300\n").unwrap();
    let out = dir.path().join("out");

    Command::cargo_bin("monitorgen")
        .unwrap()
        .arg("generate")
        .arg("--app")
        .arg(&app)
        .arg("--out")
        .arg(&out)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let compose = fs::read_to_string(out.join("docker-compose.monitoring.yml")).unwrap();
    assert!(compose.contains("3300:3300"));
    let metrics = fs::read_to_string(out.join("instrumentation/metrics.ts")).unwrap();
    assert!(metrics.contains("new Gauge({"));
}

#[test]
fn test_missing_app_file_fails() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("monitorgen")
        .unwrap()
        .arg("generate")
        .arg("--app")
        .arg(dir.path().join("missing.yaml"))
        .arg("--out")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read application description"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("shop.yaml");
    fs::write(&app, SHOP_YAML).unwrap();
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "prometheus:\n  rate_window: soon\n").unwrap();

    Command::cargo_bin("monitorgen")
        .unwrap()
        .args(["plan", "--app"])
        .arg(&app)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_no_command_fails() {
    Command::cargo_bin("monitorgen")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("No command provided"));
}
