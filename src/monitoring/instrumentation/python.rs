//! Python instrumentation with `prometheus_client`, as ASGI middleware.

use super::{InstrumentationTemplate, baseline_coverage, comment_text, quoted};
use crate::model::BackendLanguage;
use crate::monitoring::catalog::{InstrumentKind, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL};
use crate::monitoring::plan::{InstrumentSpec, MonitoringPlan};

pub struct PythonTemplate;

fn constant_name(metric: &str) -> String {
    metric.to_ascii_uppercase()
}

fn class_name(kind: InstrumentKind) -> &'static str {
    match kind {
        InstrumentKind::Counter => "Counter",
        InstrumentKind::Gauge => "Gauge",
        InstrumentKind::Histogram => "Histogram",
    }
}

fn declaration(instrument: &InstrumentSpec) -> String {
    let mut arguments = vec![quoted(&instrument.name), quoted(&instrument.help)];
    if !instrument.labels.is_empty() {
        let labels: Vec<String> = instrument.labels.iter().map(|l| quoted(l)).collect();
        arguments.push(format!("[{}]", labels.join(", ")));
    }
    format!(
        "{} = {}(\n{}\n)",
        constant_name(&instrument.name),
        class_name(instrument.kind),
        arguments
            .iter()
            .map(|argument| format!("    {},", argument))
            .collect::<Vec<_>>()
            .join("\n")
    )
}

impl InstrumentationTemplate for PythonTemplate {
    fn language(&self) -> BackendLanguage {
        BackendLanguage::Python
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn emit_metrics(&self, plan: &MonitoringPlan) -> String {
        let instruments = plan.instruments();

        let mut classes: Vec<&str> = instruments
            .iter()
            .map(|instrument| class_name(instrument.kind))
            .collect();
        classes.sort_unstable();
        classes.dedup();

        let mut out = vec![
            format!(
                "\"\"\"Prometheus instruments for {}. Generated by monitorgen.\"\"\"",
                comment_text(&plan.app_name).replace('"', "'")
            ),
            String::new(),
            format!("from prometheus_client import {}", classes.join(", ")),
            String::new(),
        ];

        let coverage = baseline_coverage(plan);
        if !coverage.is_empty() {
            out.push("# Covered by the baseline request instruments:".to_string());
            out.extend(coverage.iter().map(|line| format!("#   - {}", line)));
        }

        for instrument in &instruments {
            out.push(String::new());
            out.push(declaration(instrument));
        }
        out.push(String::new());
        out.join("\n")
    }

    fn emit_middleware(&self, plan: &MonitoringPlan) -> String {
        format!(
            r#""""Request metrics middleware for {app}. Generated by monitorgen.

Register with ``app.middleware("http")(metrics_middleware)`` and route
{path} to ``metrics_endpoint``.
"""

import time

from prometheus_client import CONTENT_TYPE_LATEST, generate_latest
from starlette.requests import Request
from starlette.responses import Response

from .metrics import {duration}, {requests}


async def metrics_middleware(request: Request, call_next):
    """Records {requests_name} and {duration_name} for every request."""
    start = time.perf_counter()
    status = "500"
    try:
        response = await call_next(request)
        status = str(response.status_code)
        return response
    finally:
        route = getattr(request.scope.get("route"), "path", request.url.path)
        labels = (request.method, route, status)
        {requests}.labels(*labels).inc()
        {duration}.labels(*labels).observe(time.perf_counter() - start)


async def metrics_endpoint() -> Response:
    return Response(generate_latest(), media_type=CONTENT_TYPE_LATEST)
"#,
            app = comment_text(&plan.app_name).replace('"', "'"),
            path = plan.config.prometheus.metrics_path,
            requests_name = REQUESTS_TOTAL,
            duration_name = REQUEST_DURATION_SECONDS,
            requests = constant_name(REQUESTS_TOTAL),
            duration = constant_name(REQUEST_DURATION_SECONDS),
        )
    }
}
