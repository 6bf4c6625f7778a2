//! Docker Compose definition of the monitoring stack.
//!
//! Prometheus and Grafana are always deployed. Alertmanager is added only when
//! the plan routes user alerts, using the same predicate as the scrape config.

use crate::error::{GeneratorError, GeneratorResult};
use crate::monitoring::dashboard::DASHBOARDS_MOUNT_PATH;
use crate::monitoring::plan::{LogDirective, MonitoringPlan};
use crate::monitoring::scrape::{ALERTMANAGER_HOST, CONFIG_MOUNT_PATH, RULES_MOUNT_PATH};
use serde::Serialize;
use std::collections::BTreeMap;

/// Project-local network shared by the stack and the scraped services.
pub const NETWORK_NAME: &str = "monitoring";

#[derive(Debug, Serialize)]
pub struct ComposeFile {
    pub services: BTreeMap<String, ComposeService>,
    pub networks: BTreeMap<String, Network>,
    pub volumes: BTreeMap<String, NamedVolume>,
}

#[derive(Debug, Serialize)]
pub struct ComposeService {
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    pub networks: Vec<String>,
    pub restart: String,
}

#[derive(Debug, Serialize)]
pub struct Network {
    pub driver: String,
}

#[derive(Debug, Serialize)]
pub struct NamedVolume {}

fn log_label(log: &LogDirective) -> String {
    let mut label = log.description.clone();
    if !log.service.is_empty() {
        label.push_str(&format!(" (service: {})", log.service));
    }
    if let Some(retention) = &log.retention {
        label.push_str(&format!(" (retention: {})", retention));
    }
    label
}

fn service(image: &str, port: u16) -> ComposeService {
    ComposeService {
        image: image.to_string(),
        command: Vec::new(),
        ports: vec![format!("{}:{}", port, port)],
        volumes: Vec::new(),
        environment: BTreeMap::new(),
        labels: BTreeMap::new(),
        depends_on: Vec::new(),
        networks: vec![NETWORK_NAME.to_string()],
        restart: "unless-stopped".to_string(),
    }
}

pub fn compose_document(plan: &MonitoringPlan) -> ComposeFile {
    let config = &plan.config;
    let mut services = BTreeMap::new();

    let mut prometheus = service(&config.prometheus.image, config.prometheus.port);
    prometheus.command = vec![
        format!("--config.file={}", CONFIG_MOUNT_PATH),
        "--storage.tsdb.path=/prometheus".to_string(),
        format!("--storage.tsdb.retention.time={}", plan.retention),
        format!("--web.listen-address=:{}", config.prometheus.port),
    ];
    prometheus.volumes = vec![
        format!("./prometheus/prometheus.yml:{}:ro", CONFIG_MOUNT_PATH),
        format!("./prometheus/alerts.yml:{}:ro", RULES_MOUNT_PATH),
        "prometheus-data:/prometheus".to_string(),
    ];
    prometheus.labels = plan
        .logs
        .iter()
        .enumerate()
        .map(|(index, log)| (format!("monitoring.log.{}", index + 1), log_label(log)))
        .collect();

    let mut grafana = service(&config.grafana.image, config.grafana.port);
    grafana.volumes = vec![
        "./grafana/provisioning:/etc/grafana/provisioning:ro".to_string(),
        format!("./grafana/dashboards:{}:ro", DASHBOARDS_MOUNT_PATH),
        "grafana-data:/var/lib/grafana".to_string(),
    ];
    grafana.environment = BTreeMap::from([
        (
            "GF_SECURITY_ADMIN_PASSWORD".to_string(),
            config.grafana.admin_password.clone(),
        ),
        ("GF_SERVER_HTTP_PORT".to_string(), config.grafana.port.to_string()),
        ("GF_USERS_ALLOW_SIGN_UP".to_string(), "false".to_string()),
    ]);
    grafana.depends_on = vec!["prometheus".to_string()];

    if plan.has_alerts() {
        let mut alertmanager = service(&config.alerting.image, config.alerting.port);
        alertmanager.command = vec![
            "--config.file=/etc/alertmanager/alertmanager.yml".to_string(),
            "--storage.path=/alertmanager".to_string(),
            format!("--web.listen-address=:{}", config.alerting.port),
        ];
        prometheus.depends_on = vec![ALERTMANAGER_HOST.to_string()];
        services.insert(ALERTMANAGER_HOST.to_string(), alertmanager);
    }
    services.insert("prometheus".to_string(), prometheus);
    services.insert("grafana".to_string(), grafana);

    ComposeFile {
        services,
        networks: BTreeMap::from([(
            NETWORK_NAME.to_string(),
            Network {
                driver: "bridge".to_string(),
            },
        )]),
        volumes: BTreeMap::from([
            ("grafana-data".to_string(), NamedVolume {}),
            ("prometheus-data".to_string(), NamedVolume {}),
        ]),
    }
}

pub fn render_compose(plan: &MonitoringPlan) -> GeneratorResult<String> {
    let yaml = serde_yaml::to_string(&compose_document(plan))
        .map_err(|e| GeneratorError::serialize("docker-compose.monitoring.yml", e))?;

    let addresses: Vec<String> = plan.targets.iter().map(|t| t.address()).collect();
    Ok(format!(
        "# Monitoring stack for {}.\n# Attach the scraped services ({}) to the '{}' network.\n{}",
        plan.app_name,
        addresses.join(", "),
        NETWORK_NAME,
        yaml
    ))
}
