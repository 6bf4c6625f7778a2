//! Scrape target derivation.
//!
//! One target per service when the application declares a service topology,
//! otherwise a single target for the backend. The job name doubles as the
//! hostname, so it is a DNS-safe slug.

use crate::model::{Application, BackendLanguage};
use crate::monitoring::naming::{escape_double_quoted, kebab};
use crate::monitoring::scrape::ALERTMANAGER_HOST;
use log::debug;
use std::collections::HashSet;

/// Job names and hostnames owned by the monitoring stack itself.
pub const RESERVED_JOBS: [&str; 3] = ["prometheus", "grafana", ALERTMANAGER_HOST];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    /// Name as written in the application description.
    pub name: String,
    /// Prometheus job name and hostname.
    pub job: String,
    pub port: u16,
}

impl ScrapeTarget {
    /// `<job>:<port>`
    pub fn address(&self) -> String {
        format!("{}:{}", self.job, self.port)
    }
}

fn unique_job(base: String, fallback: &str, taken: &mut HashSet<String>) -> String {
    let base = if base.is_empty() { fallback.to_string() } else { base };
    let mut job = base.clone();
    let mut suffix = 2;
    while taken.contains(&job) {
        job = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    taken.insert(job.clone());
    job
}

/// Derives the scrape targets of an application.
///
/// Ports fall back from the service's own port, to the backend port, to the
/// default port of the backend language.
pub fn scrape_targets(app: &Application, language: BackendLanguage) -> Vec<ScrapeTarget> {
    let backend_port = app.backend_port.unwrap_or_else(|| language.default_port());
    let mut taken: HashSet<String> = RESERVED_JOBS.iter().map(|job| job.to_string()).collect();

    let services = app
        .architecture
        .as_ref()
        .map(|architecture| architecture.services.as_slice())
        .unwrap_or_default();

    let targets: Vec<ScrapeTarget> = if services.is_empty() {
        vec![ScrapeTarget {
            name: app.name.clone(),
            job: unique_job(kebab(&app.name), "app", &mut taken),
            port: backend_port,
        }]
    } else {
        services
            .iter()
            .enumerate()
            .map(|(index, service)| ScrapeTarget {
                name: service.name.clone(),
                job: unique_job(
                    kebab(&service.name),
                    &format!("service-{}", index + 1),
                    &mut taken,
                ),
                port: service.port.unwrap_or(backend_port),
            })
            .collect()
    };

    for target in &targets {
        debug!("Scrape target '{}' at {}", target.name, target.address());
    }
    targets
}

/// Label matcher selecting every target, e.g. `job="shop"` or `job=~"a|b"`.
pub fn job_selector(targets: &[ScrapeTarget]) -> String {
    match targets {
        [single] => format!("job=\"{}\"", escape_double_quoted(&single.job)),
        _ => {
            let jobs: Vec<&str> = targets.iter().map(|t| t.job.as_str()).collect();
            format!("job=~\"{}\"", jobs.join("|"))
        }
    }
}

/// Selector narrowed to the target a rule names, if any.
pub fn selector_for_service(targets: &[ScrapeTarget], service: &str) -> Option<String> {
    let wanted = kebab(service);
    if wanted.is_empty() {
        return None;
    }
    targets
        .iter()
        .find(|target| target.job == wanted || kebab(&target.name) == wanted)
        .map(|target| job_selector(std::slice::from_ref(target)))
}
