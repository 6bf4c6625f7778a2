#![allow(clippy::needless_doctest_main)]
//! # monitorgen
//!
//! Monitorgen turns the monitoring intents of an application description
//! (`track`, `alert` and `log` rules) into a consistent observability stack:
//! Prometheus scrape and alert configuration, a Grafana dashboard with its
//! provisioning, a Docker Compose file for the stack, and instrumentation
//! code for the application's backend.
//!
//! All artifacts are derived from a single [`MonitoringPlan`], so an alert
//! and the panel showing the same metric always query the same series, and
//! the instrumentation declares exactly the instruments those queries read.
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! monitorgen = "0.3"
//! ```
//!
//! ## Features
//!
//! - Classification of tracking intents into framework metrics and business metrics
//! - PromQL synthesis for request rate, error ratio and p95 latency
//! - Alert rules with thresholds read from plain-language conditions
//! - Grafana dashboard, datasource and provider provisioning
//! - Prometheus, Grafana and Alertmanager as a Compose stack
//! - Go, TypeScript and Python instrumentation
//! - Deterministic output: the same input always yields byte-identical files
//!
//! ## Basic Usage
//!
//! ```rust
//! use monitorgen::prelude::*;
//!
//! fn main() {
//!     let app = Application::new("Shop", "go")
//!         .with_rule(MonitoringRule::track("page views"))
//!         .with_rule(MonitoringRule::alert("error rate is above 5%").with_channel("Slack"))
//!         .with_rule(
//!             MonitoringRule::log("all API requests")
//!                 .with_service("api")
//!                 .with_duration("90 days"),
//!         );
//!
//!     let output = tempfile::tempdir().unwrap();
//!     let report = generate(&app, output.path()).unwrap();
//!     assert_eq!(report.files_written(), 8);
//!     for warning in report.warnings() {
//!         eprintln!("warning: {}", warning);
//!     }
//! }
//! ```
//!
//! A custom configuration is passed through [`MonitoringGenerator::with_config`]:
//!
//! ```rust
//! use monitorgen::config::GeneratorConfig;
//! use monitorgen::model::Application;
//! use monitorgen::MonitoringGenerator;
//!
//! let mut config = GeneratorConfig::default();
//! config.prometheus.scrape_interval = "30s".to_string();
//!
//! let generator = MonitoringGenerator::with_config(config);
//! let plan = generator.plan(&Application::new("Shop", "python")).unwrap();
//! assert_eq!(plan.targets[0].address(), "shop:8000");
//! ```
//!
//! ## Output
//!
//! ```text
//! prometheus/prometheus.yml
//! prometheus/alerts.yml
//! grafana/provisioning/datasources/prometheus.yml
//! grafana/provisioning/dashboards/dashboards.yml
//! grafana/dashboards/app.json
//! docker-compose.monitoring.yml
//! instrumentation/metrics.<go|ts|py>
//! instrumentation/middleware.<go|ts|py>
//! ```
//!
//! ## CLI
//!
//! ```bash
//! monitorgen generate --app shop.yaml --out monitoring
//! monitorgen generate --app shop.json --out monitoring --config monitorgen.yaml --verbose
//! monitorgen plan --app shop.yaml
//! ```
//!
//! ### License
//!
//! MIT

pub mod config;
pub mod error;
pub mod model;
pub mod monitoring;

pub use error::{GeneratorError, GeneratorResult};
pub use monitoring::generator::{GenerationReport, MonitoringGenerator, generate};
pub use monitoring::plan::MonitoringPlan;

pub mod prelude {
    pub use crate::config::GeneratorConfig;
    pub use crate::error::{GeneratorError, GeneratorResult};
    pub use crate::model::{Application, BackendLanguage, MonitoringRule, RuleKind};
    pub use crate::monitoring::generator::{GenerationReport, MonitoringGenerator, generate};
    pub use crate::monitoring::plan::MonitoringPlan;
}
