/// Integration tests for artifact generation
///
/// This test module covers:
/// - The full artifact set for a mixed rule list
/// - Standard-only rule lists
/// - Alert routing presence
/// - Determinism of the output
/// - Every instrumentation language
use monitorgen::config::GeneratorConfig;
use monitorgen::model::{Application, MonitoringRule};
use monitorgen::{MonitoringGenerator, generate};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn shop() -> Application {
    Application::new("Shop", "go")
        .with_rule(MonitoringRule::track("page views"))
        .with_rule(MonitoringRule::alert("error rate is above 5%").with_channel("Slack"))
        .with_rule(
            MonitoringRule::log("all API requests")
                .with_service("X")
                .with_duration("90 days"),
        )
}

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("{}: {}", file, e))
}

/// Every file under `dir`, relative and sorted.
fn list_files(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                files.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    let mut files = Vec::new();
    walk(dir, dir, &mut files);
    files.sort();
    files
}

#[test]
fn test_mixed_rules_produce_full_artifact_set() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().expect("Failed to create temporary directory");

    let report = generate(&shop(), dir.path()).expect("generation failed");
    assert_eq!(report.files_written(), 8);
    assert!(report.warnings().is_empty(), "{:?}", report.warnings());

    assert_eq!(
        list_files(dir.path()),
        vec![
            "docker-compose.monitoring.yml",
            "grafana/dashboards/app.json",
            "grafana/provisioning/dashboards/dashboards.yml",
            "grafana/provisioning/datasources/prometheus.yml",
            "instrumentation/metrics.go",
            "instrumentation/middleware.go",
            "prometheus/alerts.yml",
            "prometheus/prometheus.yml",
        ]
    );

    let dashboard: serde_json::Value =
        serde_json::from_str(&read(dir.path(), "grafana/dashboards/app.json")).unwrap();
    let panels = dashboard["panels"].as_array().unwrap();
    let page_views = panels
        .iter()
        .find(|panel| panel["title"] == "page views")
        .expect("page views panel");
    assert_eq!(
        page_views["targets"][0]["expr"],
        "sum(shop_page_views{job=\"shop\"})"
    );

    let prometheus: serde_yaml::Value =
        serde_yaml::from_str(&read(dir.path(), "prometheus/prometheus.yml")).unwrap();
    assert_eq!(
        prometheus["alerting"]["alertmanagers"][0]["static_configs"][0]["targets"][0],
        "alertmanager:9093"
    );

    let metrics = read(dir.path(), "instrumentation/metrics.go");
    assert!(metrics.contains("ShopPageViews = promauto.NewGauge(prometheus.GaugeOpts{"));
    assert_eq!(metrics.matches("\"shop_page_views\"").count(), 1);

    let alerts: serde_yaml::Value =
        serde_yaml::from_str(&read(dir.path(), "prometheus/alerts.yml")).unwrap();
    let rules = alerts["groups"][0]["rules"].as_sequence().unwrap();
    let user_alert = rules
        .iter()
        .find(|rule| rule["alert"] == "ErrorRateIsAbove5")
        .expect("user alert");
    assert!(user_alert["expr"].as_str().unwrap().ends_with("> 0.05"));
    assert_eq!(user_alert["labels"]["channel"], "slack");

    let compose = read(dir.path(), "docker-compose.monitoring.yml");
    assert!(compose.contains("--storage.tsdb.retention.time=90d"));
    assert!(compose.contains("alertmanager:"));
    assert!(compose.contains("all API requests (service: X) (retention: 90d)"));
}

#[test]
fn test_standard_rules_only() {
    let dir = tempdir().unwrap();
    let app = Application::new("Shop", "go")
        .with_rule(MonitoringRule::track("response times for all api endpoints"))
        .with_rule(MonitoringRule::track("error rates per endpoint"));
    generate(&app, dir.path()).unwrap();

    let metrics = read(dir.path(), "instrumentation/metrics.go");
    assert!(!metrics.contains("response_times"));
    assert!(!metrics.contains("error_rates"));
    assert_eq!(metrics.matches("promauto.New").count(), 2);

    let dashboard: serde_json::Value =
        serde_json::from_str(&read(dir.path(), "grafana/dashboards/app.json")).unwrap();
    let queries: Vec<&str> = dashboard["panels"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|panel| panel["targets"].as_array().unwrap().iter())
        .map(|target| target["expr"].as_str().unwrap())
        .collect();
    assert!(queries.iter().any(|q| q.contains("http_request_duration_seconds_bucket")));
    assert!(queries.iter().any(|q| q.contains("http_requests_total")));
    for query in &queries {
        assert!(!query.contains("response times"));
        assert!(!query.contains("error rates per endpoint"));
    }
}

#[test]
fn test_alert_routing_presence_follows_alert_rules() {
    for (rules, expected) in [
        (vec![], false),
        (vec![MonitoringRule::track("page views")], false),
        (vec![MonitoringRule::alert("latency above 2")], true),
    ] {
        let dir = tempdir().unwrap();
        let mut app = Application::new("Shop", "go");
        app.monitoring_rules = rules;
        generate(&app, dir.path()).unwrap();

        let prometheus = read(dir.path(), "prometheus/prometheus.yml");
        let compose = read(dir.path(), "docker-compose.monitoring.yml");
        assert_eq!(prometheus.contains("alertmanagers:"), expected);
        assert_eq!(compose.contains("prom/alertmanager"), expected);
    }
}

#[test]
fn test_output_is_deterministic() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let app = shop()
        .with_service("orders", Some(9001))
        .with_rule(MonitoringRule::track("orders placed").with_service("orders"))
        .with_rule(MonitoringRule::alert("queue depth is bad"));

    let report = generate(&app, first.path()).unwrap();
    generate(&app, second.path()).unwrap();

    for file in report.files() {
        let a = fs::read(first.path().join(file)).unwrap();
        let b = fs::read(second.path().join(file)).unwrap();
        assert_eq!(a, b, "{} differs between runs", file.display());
    }
}

#[test]
fn test_no_duplicate_instruments_for_every_language() {
    for (language, extension) in [("go", "go"), ("express", "ts"), ("fastapi", "py")] {
        let dir = tempdir().unwrap();
        let app = Application::new("Shop", language)
            .with_rule(MonitoringRule::track("page views"))
            .with_rule(MonitoringRule::track("Page Views"))
            .with_rule(MonitoringRule::track("number of signups"))
            .with_rule(MonitoringRule::track("latency"));
        let report = generate(&app, dir.path()).unwrap();
        assert_eq!(report.files_written(), 8);

        let metrics = read(dir.path(), &format!("instrumentation/metrics.{}", extension));
        let mut seen = HashSet::new();
        for name in [
            "\"http_requests_total\"",
            "\"http_request_duration_seconds\"",
            "\"shop_page_views\"",
            "\"shop_number_of_signups_total\"",
        ] {
            assert_eq!(metrics.matches(name).count(), 1, "{} in {}", name, extension);
            assert!(seen.insert(name));
        }
        assert!(dir
            .path()
            .join(format!("instrumentation/middleware.{}", extension))
            .is_file());
    }
}

#[test]
fn test_unknown_language_falls_back_with_warning() {
    let dir = tempdir().unwrap();
    let report = generate(&Application::new("Shop", "haskell"), dir.path()).unwrap();
    assert_eq!(report.files_written(), 8);
    assert_eq!(report.warnings().len(), 1);
    assert!(dir.path().join("instrumentation/metrics.go").is_file());
}

#[test]
fn test_placeholder_alert_is_reported() {
    let dir = tempdir().unwrap();
    let app = Application::new("Shop", "go").with_rule(MonitoringRule::alert("latency is bad"));
    let report = generate(&app, dir.path()).unwrap();
    assert_eq!(report.warnings().len(), 1);

    let alerts = read(dir.path(), "prometheus/alerts.yml");
    assert!(alerts.contains("threshold: manual"));
}

#[test]
fn test_custom_config_flows_into_artifacts() {
    let dir = tempdir().unwrap();
    let mut config = GeneratorConfig::default();
    config.prometheus.scrape_interval = "30s".to_string();
    config.prometheus.port = 9191;
    config.instrumentation.namespace = Some("acme".to_string());

    let app = Application::new("Shop", "go").with_rule(MonitoringRule::track("page views"));
    MonitoringGenerator::with_config(config)
        .generate(&app, dir.path())
        .unwrap();

    assert!(read(dir.path(), "prometheus/prometheus.yml").contains("scrape_interval: 30s"));
    assert!(read(dir.path(), "docker-compose.monitoring.yml").contains("9191:9191"));
    assert!(read(dir.path(), "grafana/provisioning/datasources/prometheus.yml")
        .contains("http://prometheus:9191"));
    assert!(read(dir.path(), "instrumentation/metrics.go").contains("\"acme_page_views\""));
}
