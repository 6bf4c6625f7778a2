//! Generation entry point.
//!
//! Everything is rendered in memory first, then written in a fixed order.
//! A failed write aborts the run with the offending path; files written
//! before it are left in place.

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::model::Application;
use crate::monitoring::alerts::render_alert_rules;
use crate::monitoring::compose::render_compose;
use crate::monitoring::dashboard::{
    render_dashboard, render_dashboard_provisioning, render_datasource_provisioning,
};
use crate::monitoring::instrumentation::template_for;
use crate::monitoring::plan::MonitoringPlan;
use crate::monitoring::scrape::render_scrape_config;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const SCRAPE_CONFIG_FILE: &str = "prometheus/prometheus.yml";
pub const ALERT_RULES_FILE: &str = "prometheus/alerts.yml";
pub const DATASOURCE_FILE: &str = "grafana/provisioning/datasources/prometheus.yml";
pub const DASHBOARD_PROVIDER_FILE: &str = "grafana/provisioning/dashboards/dashboards.yml";
pub const DASHBOARD_FILE: &str = "grafana/dashboards/app.json";
pub const COMPOSE_FILE: &str = "docker-compose.monitoring.yml";

/// A rendered file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    output_dir: PathBuf,
    files: Vec<PathBuf>,
    warnings: Vec<String>,
}

impl GenerationReport {
    /// Number of files written.
    pub fn files_written(&self) -> usize {
        self.files.len()
    }

    /// Written paths, relative to [`output_dir`](Self::output_dir), in write order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Soft problems resolved with a fallback.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonitoringGenerator {
    config: GeneratorConfig,
}

impl MonitoringGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Classifies and synthesizes without rendering anything.
    pub fn plan(&self, app: &Application) -> GeneratorResult<MonitoringPlan> {
        self.config
            .validate()
            .map_err(|errors| GeneratorError::Config(errors.join("; ")))?;
        Ok(MonitoringPlan::build(app, &self.config))
    }

    /// Renders every artifact of a plan, in write order.
    pub fn render(&self, plan: &MonitoringPlan) -> GeneratorResult<Vec<Artifact>> {
        let template = template_for(plan.language);
        let extension = template.extension();

        let artifacts = vec![
            Artifact::new(SCRAPE_CONFIG_FILE, render_scrape_config(plan)?),
            Artifact::new(ALERT_RULES_FILE, render_alert_rules(plan)?),
            Artifact::new(DATASOURCE_FILE, render_datasource_provisioning(plan)?),
            Artifact::new(DASHBOARD_PROVIDER_FILE, render_dashboard_provisioning(plan)?),
            Artifact::new(DASHBOARD_FILE, render_dashboard(plan)?),
            Artifact::new(COMPOSE_FILE, render_compose(plan)?),
            Artifact::new(
                format!("instrumentation/metrics.{}", extension),
                template.emit_metrics(plan),
            ),
            Artifact::new(
                format!("instrumentation/middleware.{}", extension),
                template.emit_middleware(plan),
            ),
        ];
        debug!("Rendered {} artifacts for '{}'", artifacts.len(), plan.app_name);
        Ok(artifacts)
    }

    /// Plans, renders and writes the full artifact set under `output_dir`.
    pub fn generate(
        &self,
        app: &Application,
        output_dir: impl AsRef<Path>,
    ) -> GeneratorResult<GenerationReport> {
        let output_dir = output_dir.as_ref();
        let plan = self.plan(app)?;
        let artifacts = self.render(&plan)?;

        let mut files = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            write_artifact(output_dir, artifact)?;
            files.push(artifact.path.clone());
        }

        info!(
            "Generated {} files for '{}' in {} ({} warning(s))",
            files.len(),
            plan.app_name,
            output_dir.display(),
            plan.warnings.len()
        );

        Ok(GenerationReport {
            output_dir: output_dir.to_path_buf(),
            files,
            warnings: plan.warnings,
        })
    }
}

fn write_artifact(output_dir: &Path, artifact: &Artifact) -> GeneratorResult<()> {
    let path = output_dir.join(&artifact.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GeneratorError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, &artifact.contents).map_err(|source| GeneratorError::WriteFile {
        path: path.clone(),
        source,
    })?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Generates with the default configuration.
///
/// ```no_run
/// use monitorgen::model::{Application, MonitoringRule};
///
/// let app = Application::new("Shop", "go")
///     .with_rule(MonitoringRule::track("page views"))
///     .with_rule(MonitoringRule::alert("error rate is above 5%").with_channel("Slack"));
/// let report = monitorgen::generate(&app, "monitoring").unwrap();
/// assert_eq!(report.files_written(), 8);
/// ```
pub fn generate(
    app: &Application,
    output_dir: impl AsRef<Path>,
) -> GeneratorResult<GenerationReport> {
    MonitoringGenerator::new().generate(app, output_dir)
}
