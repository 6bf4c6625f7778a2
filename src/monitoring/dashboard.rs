//! Grafana dashboard and provisioning files.
//!
//! The dashboard reads exactly the expressions recorded in the plan, so a
//! panel and the alert watching the same metric always agree.

use crate::error::{GeneratorError, GeneratorResult};
use crate::monitoring::catalog::{BASELINE_PANELS, StandardMetric};
use crate::monitoring::plan::MonitoringPlan;
use serde::Serialize;

/// uid of the provisioned Prometheus datasource.
pub const DATASOURCE_UID: &str = "prometheus";
/// Where the compose stack mounts dashboard JSON inside the Grafana container.
pub const DASHBOARDS_MOUNT_PATH: &str = "/var/lib/grafana/dashboards";

const SCHEMA_VERSION: u32 = 39;
const MAX_UID_LEN: usize = 40;
const BASELINE_WIDTH: u32 = 8;
const CUSTOM_WIDTH: u32 = 12;
const PANEL_HEIGHT: u32 = 8;
const GRID_WIDTH: u32 = 24;

#[derive(Debug, Clone, Serialize)]
pub struct DatasourceRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub uid: String,
}

impl DatasourceRef {
    fn prometheus() -> Self {
        DatasourceRef {
            kind: "prometheus".to_string(),
            uid: DATASOURCE_UID.to_string(),
        }
    }
}

/// Dashboard document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub uid: String,
    pub title: String,
    pub tags: Vec<String>,
    pub timezone: String,
    pub schema_version: u32,
    pub version: u32,
    pub editable: bool,
    pub refresh: String,
    pub time: TimeRange,
    pub annotations: Annotations,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct Annotations {
    pub list: Vec<AnnotationQuery>,
}

/// Marks alert firings on every panel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationQuery {
    pub name: String,
    pub datasource: DatasourceRef,
    pub enable: bool,
    pub expr: String,
    pub icon_color: String,
    pub title_format: String,
    pub tag_keys: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub datasource: DatasourceRef,
    pub grid_pos: GridPos,
    pub field_config: FieldConfig,
    pub targets: Vec<PanelTarget>,
}

#[derive(Debug, Serialize)]
pub struct GridPos {
    pub h: u32,
    pub w: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Serialize)]
pub struct FieldConfig {
    pub defaults: FieldDefaults,
}

#[derive(Debug, Serialize)]
pub struct FieldDefaults {
    pub unit: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelTarget {
    pub ref_id: String,
    pub datasource: DatasourceRef,
    pub expr: String,
    pub legend_format: String,
}

fn ref_id(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{}{}", letter, index / 26)
    }
}

/// Stable dashboard uid: the app slug, cut to Grafana's 40 character limit.
pub fn dashboard_uid(plan: &MonitoringPlan) -> String {
    plan.app_slug.chars().take(MAX_UID_LEN).collect()
}

fn panel(
    id: u32,
    title: &str,
    description: String,
    unit: &str,
    grid_pos: GridPos,
    targets: Vec<PanelTarget>,
) -> Panel {
    Panel {
        id,
        kind: "timeseries".to_string(),
        title: title.to_string(),
        description,
        datasource: DatasourceRef::prometheus(),
        grid_pos,
        field_config: FieldConfig {
            defaults: FieldDefaults {
                unit: unit.to_string(),
            },
        },
        targets,
    }
}

fn baseline_panel(plan: &MonitoringPlan, metric: &StandardMetric, id: u32, x: u32) -> Panel {
    let mut expressions = vec![(plan.standard_expression(metric), "{{job}}".to_string())];
    let mut covered = Vec::new();
    for tracking in plan.standard.iter().filter(|t| t.metric == metric) {
        covered.push(tracking.description.as_str());
        if !expressions.iter().any(|(expr, _)| *expr == tracking.expression) {
            expressions.push((tracking.expression.clone(), tracking.description.clone()));
        }
    }

    let mut description = format!(
        "Baseline {} from the request middleware.",
        metric.title.to_lowercase()
    );
    if !covered.is_empty() {
        description.push_str(&format!(" Tracks: {}.", covered.join("; ")));
    }

    let targets = expressions
        .into_iter()
        .enumerate()
        .map(|(index, (expr, legend_format))| PanelTarget {
            ref_id: ref_id(index),
            datasource: DatasourceRef::prometheus(),
            expr,
            legend_format,
        })
        .collect();

    panel(
        id,
        metric.title,
        description,
        metric.unit,
        GridPos {
            h: PANEL_HEIGHT,
            w: BASELINE_WIDTH,
            x,
            y: 0,
        },
        targets,
    )
}

pub fn dashboard_document(plan: &MonitoringPlan) -> Dashboard {
    let mut panels: Vec<Panel> = BASELINE_PANELS
        .iter()
        .zip(0u32..)
        .map(|(metric, index)| baseline_panel(plan, metric, index + 1, index * BASELINE_WIDTH))
        .collect();

    let per_row = GRID_WIDTH / CUSTOM_WIDTH;
    for (index, custom) in (0u32..).zip(plan.custom.iter()) {
        let title = custom
            .descriptions
            .first()
            .cloned()
            .unwrap_or_else(|| custom.metric.name.clone());
        panels.push(panel(
            panels.len() as u32 + 1,
            &title,
            format!("{} ({})", custom.metric.name, custom.metric.kind),
            "short",
            GridPos {
                h: PANEL_HEIGHT,
                w: CUSTOM_WIDTH,
                x: (index % per_row) * CUSTOM_WIDTH,
                y: PANEL_HEIGHT * (1 + index / per_row),
            },
            vec![PanelTarget {
                ref_id: ref_id(0),
                datasource: DatasourceRef::prometheus(),
                expr: custom.expression.clone(),
                legend_format: "{{job}}".to_string(),
            }],
        ));
    }

    let alert_names: Vec<&str> = plan.alerts.iter().map(|a| a.identifier.as_str()).collect();

    Dashboard {
        uid: dashboard_uid(plan),
        title: format!("{} Monitoring", plan.app_name),
        tags: vec!["monitorgen".to_string(), plan.app_slug.clone()],
        timezone: "browser".to_string(),
        schema_version: SCHEMA_VERSION,
        version: 1,
        editable: true,
        refresh: plan.config.grafana.refresh.clone(),
        time: TimeRange {
            from: "now-6h".to_string(),
            to: "now".to_string(),
        },
        annotations: Annotations {
            list: vec![AnnotationQuery {
                name: "Alerts".to_string(),
                datasource: DatasourceRef::prometheus(),
                enable: true,
                expr: format!(
                    "ALERTS{{alertname=~\"{}\",alertstate=\"firing\"}}",
                    alert_names.join("|")
                ),
                icon_color: "red".to_string(),
                title_format: "{{alertname}}".to_string(),
                tag_keys: "severity".to_string(),
            }],
        },
        panels,
    }
}

pub fn render_dashboard(plan: &MonitoringPlan) -> GeneratorResult<String> {
    serde_json::to_string_pretty(&dashboard_document(plan))
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|e| GeneratorError::serialize("app.json", e))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceProvisioning {
    pub api_version: u32,
    pub datasources: Vec<Datasource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub uid: String,
    pub access: String,
    pub url: String,
    pub is_default: bool,
    pub editable: bool,
}

pub fn render_datasource_provisioning(plan: &MonitoringPlan) -> GeneratorResult<String> {
    let document = DatasourceProvisioning {
        api_version: 1,
        datasources: vec![Datasource {
            name: "Prometheus".to_string(),
            kind: "prometheus".to_string(),
            uid: DATASOURCE_UID.to_string(),
            access: "proxy".to_string(),
            url: format!("http://prometheus:{}", plan.config.prometheus.port),
            is_default: true,
            editable: false,
        }],
    };
    serde_yaml::to_string(&document)
        .map_err(|e| GeneratorError::serialize("datasources/prometheus.yml", e))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProvisioning {
    pub api_version: u32,
    pub providers: Vec<DashboardProvider>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProvider {
    pub name: String,
    pub folder: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub disable_deletion: bool,
    pub allow_ui_updates: bool,
    pub options: ProviderOptions,
}

#[derive(Debug, Serialize)]
pub struct ProviderOptions {
    pub path: String,
}

pub fn render_dashboard_provisioning(plan: &MonitoringPlan) -> GeneratorResult<String> {
    let document = DashboardProvisioning {
        api_version: 1,
        providers: vec![DashboardProvider {
            name: plan.app_slug.clone(),
            folder: plan.config.grafana.dashboard_folder.clone(),
            kind: "file".to_string(),
            disable_deletion: false,
            allow_ui_updates: true,
            options: ProviderOptions {
                path: DASHBOARDS_MOUNT_PATH.to_string(),
            },
        }],
    };
    serde_yaml::to_string(&document)
        .map_err(|e| GeneratorError::serialize("dashboards/dashboards.yml", e))
}
