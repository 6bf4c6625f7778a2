//! TypeScript instrumentation with `prom-client` and Express.

use super::{InstrumentationTemplate, baseline_coverage, comment_text, quoted};
use crate::model::BackendLanguage;
use crate::monitoring::catalog::{InstrumentKind, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL};
use crate::monitoring::naming::camel_case;
use crate::monitoring::plan::{InstrumentSpec, MonitoringPlan};

pub struct NodeTemplate;

fn class_name(kind: InstrumentKind) -> &'static str {
    match kind {
        InstrumentKind::Counter => "Counter",
        InstrumentKind::Gauge => "Gauge",
        InstrumentKind::Histogram => "Histogram",
    }
}

fn declaration(instrument: &InstrumentSpec) -> String {
    let mut lines = vec![
        format!(
            "export const {} = new {}({{",
            camel_case(&instrument.name),
            class_name(instrument.kind)
        ),
        format!("  name: {},", quoted(&instrument.name)),
        format!("  help: {},", quoted(&instrument.help)),
    ];
    if !instrument.labels.is_empty() {
        let labels: Vec<String> = instrument.labels.iter().map(|l| quoted(l)).collect();
        lines.push(format!("  labelNames: [{}] as const,", labels.join(", ")));
    }
    lines.push("  registers: [register],".to_string());
    lines.push("});".to_string());
    lines.join("\n")
}

impl InstrumentationTemplate for NodeTemplate {
    fn language(&self) -> BackendLanguage {
        BackendLanguage::Node
    }

    fn extension(&self) -> &'static str {
        "ts"
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
                "// Generated by monitorgen for {}. Do not edit by hand.",
                comment_text(&plan.app_name)
            ),
            format!(
                "import {{ {}, Registry, collectDefaultMetrics }} from \"prom-client\";",
                classes.join(", ")
            ),
            String::new(),
            "export const register = new Registry();".to_string(),
            "collectDefaultMetrics({ register });".to_string(),
            String::new(),
        ];

        let coverage = baseline_coverage(plan);
        if !coverage.is_empty() {
            out.push("// Covered by the baseline request instruments:".to_string());
            out.extend(coverage.iter().map(|line| format!("//   - {}", line)));
            out.push(String::new());
        }

        for instrument in &instruments {
            out.push(declaration(instrument));
            out.push(String::new());
        }
        out.join("\n")
    }

    fn emit_middleware(&self, plan: &MonitoringPlan) -> String {
        format!(
            r#"// Generated by monitorgen for {app}. Do not edit by hand.
import type {{ NextFunction, Request, Response }} from "express";
import {{ {duration}, {requests}, register }} from "./metrics";

// Records {requests_name} and {duration_name} for every request.
export function metricsMiddleware(req: Request, res: Response, next: NextFunction): void {{
  const stopTimer = {duration}.startTimer();
  res.on("finish", () => {{
    const labels = {{
      method: req.method,
      route: req.route?.path ?? req.path,
      status: String(res.statusCode),
    }};
    {requests}.inc(labels);
    stopTimer(labels);
  }});
  next();
}}

// Serves the registry. Mount it at {path}.
export async function metricsHandler(_req: Request, res: Response): Promise<void> {{
  res.set("Content-Type", register.contentType);
  res.end(await register.metrics());
}}
"#,
            app = comment_text(&plan.app_name),
            requests_name = REQUESTS_TOTAL,
            duration_name = REQUEST_DURATION_SECONDS,
            requests = camel_case(REQUESTS_TOTAL),
            duration = camel_case(REQUEST_DURATION_SECONDS),
            path = plan.config.prometheus.metrics_path,
        )
    }
}
