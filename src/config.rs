//! Generator configuration.
//!
//! Every knob has a default matching what the generated stack expects out of
//! the box, so `GeneratorConfig::default()` is what most callers want. A
//! configuration file may override any subset of the fields.

use crate::error::{GeneratorError, GeneratorResult};
use crate::monitoring::naming::duration_millis;
use crate::model::Application;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub prometheus: PrometheusConfig,
    pub grafana: GrafanaConfig,
    pub alerting: AlertingConfig,
    pub instrumentation: InstrumentationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrometheusConfig {
    pub image: String,
    pub port: u16,
    pub scrape_interval: String,
    pub evaluation_interval: String,
    pub metrics_path: String,
    /// Used when no `log` rule asks for a longer retention.
    pub default_retention: String,
    /// Range selector used in every rate() expression.
    pub rate_window: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrafanaConfig {
    pub image: String,
    pub port: u16,
    pub admin_password: String,
    pub dashboard_folder: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingConfig {
    pub image: String,
    pub port: u16,
    /// `for` duration of user alerts that do not carry their own.
    pub default_for: String,
    pub error_rate_threshold: f64,
    pub latency_threshold_seconds: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    /// Prefix for custom metric names. Derived from the application name when unset.
    pub namespace: Option<String>,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            image: "prom/prometheus:v2.53.0".to_string(),
            port: 9090,
            scrape_interval: "15s".to_string(),
            evaluation_interval: "15s".to_string(),
            metrics_path: "/metrics".to_string(),
            default_retention: "15d".to_string(),
            rate_window: "5m".to_string(),
        }
    }
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            image: "grafana/grafana:11.1.0".to_string(),
            port: 3000,
            admin_password: "admin".to_string(),
            dashboard_folder: "Application".to_string(),
            refresh: "30s".to_string(),
        }
    }
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            image: "prom/alertmanager:v0.27.0".to_string(),
            port: 9093,
            default_for: "5m".to_string(),
            error_rate_threshold: 0.05,
            latency_threshold_seconds: 1.0,
        }
    }
}

impl GeneratorConfig {
    /// Returns every problem found, or `Ok` when the configuration is usable.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.prometheus.port == 0 {
            errors.push("prometheus.port must be greater than 0".to_string());
        }
        if self.grafana.port == 0 {
            errors.push("grafana.port must be greater than 0".to_string());
        }
        if self.alerting.port == 0 {
            errors.push("alerting.port must be greater than 0".to_string());
        }
        for (field, value) in [
            ("prometheus.scrape_interval", &self.prometheus.scrape_interval),
            (
                "prometheus.evaluation_interval",
                &self.prometheus.evaluation_interval,
            ),
            ("prometheus.default_retention", &self.prometheus.default_retention),
            ("prometheus.rate_window", &self.prometheus.rate_window),
            ("alerting.default_for", &self.alerting.default_for),
        ] {
            if !is_prometheus_duration(value) {
                errors.push(format!("{} is not a Prometheus duration: '{}'", field, value));
            }
        }
        if !self.prometheus.metrics_path.starts_with('/') {
            errors.push("prometheus.metrics_path must start with '/'".to_string());
        }
        if !(0.0..=1.0).contains(&self.alerting.error_rate_threshold) {
            errors.push("alerting.error_rate_threshold must be between 0 and 1".to_string());
        }
        let latency = self.alerting.latency_threshold_seconds;
        if !(latency.is_finite() && latency > 0.0) {
            errors.push("alerting.latency_threshold_seconds must be positive".to_string());
        }
        if let Some(namespace) = &self.instrumentation.namespace {
            let valid = namespace
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase())
                && namespace
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                errors.push(format!(
                    "instrumentation.namespace must be lower_snake_case: '{}'",
                    namespace
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// `15s`, `5m`, `90d`: digits followed by one Prometheus time unit.
fn is_prometheus_duration(value: &str) -> bool {
    duration_millis(value).is_some()
}

/// Reads a JSON or YAML document, picking the format from the extension.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path, what: &str) -> GeneratorResult<T> {
    let content = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .map_err(|e| GeneratorError::Config(format!("{}: {}", path.display(), e))),
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| GeneratorError::Config(format!("{}: {}", path.display(), e))),
        other => Err(GeneratorError::Config(format!(
            "unsupported {} extension '{}' for {}",
            what,
            other,
            path.display()
        ))),
    }
}

/// Load configuration from file path by extension (json/yaml)
pub fn load_config_from_path(path: &Path) -> GeneratorResult<GeneratorConfig> {
    let config: GeneratorConfig = read_document(path, "config")?;
    config
        .validate()
        .map_err(|errors| GeneratorError::Config(errors.join("; ")))?;
    Ok(config)
}

/// Load an application description from a `.json`, `.yaml` or `.yml` file.
pub fn load_application_from_path(path: &Path) -> GeneratorResult<Application> {
    read_document(path, "application")
}
