//! Prometheus server configuration.

use crate::error::{GeneratorError, GeneratorResult};
use crate::monitoring::plan::MonitoringPlan;
use serde::Serialize;
use std::collections::BTreeMap;

/// Where the compose stack mounts the rule file inside the Prometheus container.
pub const RULES_MOUNT_PATH: &str = "/etc/prometheus/alerts.yml";
/// Where the compose stack mounts this file inside the Prometheus container.
pub const CONFIG_MOUNT_PATH: &str = "/etc/prometheus/prometheus.yml";
/// Compose service name of Alertmanager, also its hostname.
pub const ALERTMANAGER_HOST: &str = "alertmanager";

#[derive(Debug, Serialize)]
pub struct PrometheusFile {
    pub global: GlobalSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerting: Option<AlertingSection>,
    pub rule_files: Vec<String>,
    pub scrape_configs: Vec<ScrapeConfig>,
}

#[derive(Debug, Serialize)]
pub struct GlobalSection {
    pub scrape_interval: String,
    pub evaluation_interval: String,
    pub external_labels: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct AlertingSection {
    pub alertmanagers: Vec<StaticTargets>,
}

#[derive(Debug, Serialize)]
pub struct StaticTargets {
    pub static_configs: Vec<StaticConfig>,
}

#[derive(Debug, Serialize)]
pub struct StaticConfig {
    pub targets: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeConfig {
    pub job_name: String,
    pub metrics_path: String,
    pub static_configs: Vec<StaticConfig>,
}

/// Builds the typed document. The alerting block exists only when the plan
/// routes user alerts.
pub fn scrape_document(plan: &MonitoringPlan) -> PrometheusFile {
    let prometheus = &plan.config.prometheus;

    let mut scrape_configs = vec![ScrapeConfig {
        job_name: "prometheus".to_string(),
        metrics_path: "/metrics".to_string(),
        static_configs: vec![StaticConfig {
            targets: vec![format!("localhost:{}", prometheus.port)],
            labels: BTreeMap::new(),
        }],
    }];
    scrape_configs.extend(plan.targets.iter().map(|target| ScrapeConfig {
        job_name: target.job.clone(),
        metrics_path: prometheus.metrics_path.clone(),
        static_configs: vec![StaticConfig {
            targets: vec![target.address()],
            labels: BTreeMap::from([
                ("app".to_string(), plan.app_slug.clone()),
                ("service".to_string(), target.name.clone()),
            ]),
        }],
    }));

    let alerting = plan.has_alerts().then(|| AlertingSection {
        alertmanagers: vec![StaticTargets {
            static_configs: vec![StaticConfig {
                targets: vec![format!("{}:{}", ALERTMANAGER_HOST, plan.config.alerting.port)],
                labels: BTreeMap::new(),
            }],
        }],
    });

    PrometheusFile {
        global: GlobalSection {
            scrape_interval: prometheus.scrape_interval.clone(),
            evaluation_interval: prometheus.evaluation_interval.clone(),
            external_labels: BTreeMap::from([("app".to_string(), plan.app_slug.clone())]),
        },
        alerting,
        rule_files: vec![RULES_MOUNT_PATH.to_string()],
        scrape_configs,
    }
}

pub fn render_scrape_config(plan: &MonitoringPlan) -> GeneratorResult<String> {
    serde_yaml::to_string(&scrape_document(plan))
        .map_err(|e| GeneratorError::serialize("prometheus.yml", e))
}
