//! Go instrumentation with `prometheus/client_golang`.

use super::{InstrumentationTemplate, baseline_coverage, comment_text, quoted};
use crate::model::BackendLanguage;
use crate::monitoring::catalog::{InstrumentKind, REQUEST_DURATION_SECONDS, REQUESTS_TOTAL};
use crate::monitoring::naming::pascal_case;
use crate::monitoring::plan::{InstrumentSpec, MonitoringPlan};

pub struct GoTemplate;

fn label_list(labels: &[&str]) -> String {
    let names: Vec<String> = labels.iter().map(|label| quoted(label)).collect();
    format!("[]string{{{}}}", names.join(", "))
}

fn declaration(instrument: &InstrumentSpec) -> String {
    let identifier = pascal_case(&instrument.name);
    let vec = !instrument.labels.is_empty();
    let (constructor, opts) = match instrument.kind {
        InstrumentKind::Counter => ("NewCounter", "CounterOpts"),
        InstrumentKind::Gauge => ("NewGauge", "GaugeOpts"),
        InstrumentKind::Histogram => ("NewHistogram", "HistogramOpts"),
    };

    let mut fields = vec![
        ("Name", quoted(&instrument.name)),
        ("Help", quoted(&instrument.help)),
    ];
    if instrument.kind == InstrumentKind::Histogram {
        fields.push(("Buckets", "prometheus.DefBuckets".to_string()));
    }
    let width = fields.iter().map(|(key, _)| key.len()).max().unwrap_or(0) + 1;
    let body: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            format!("\t\t{:<width$} {},", format!("{}:", key), value, width = width)
        })
        .collect();

    if vec {
        format!(
            "\t{} = promauto.{}Vec(prometheus.{}{{\n{}\n\t}}, {})",
            identifier,
            constructor,
            opts,
            body.join("\n"),
            label_list(instrument.labels)
        )
    } else {
        format!(
            "\t{} = promauto.{}(prometheus.{}{{\n{}\n\t}})",
            identifier,
            constructor,
            opts,
            body.join("\n")
        )
    }
}

fn usage_hint(instrument: &InstrumentSpec) -> &'static str {
    match instrument.kind {
        InstrumentKind::Counter => "Inc() or Add(n) on every occurrence.",
        InstrumentKind::Gauge => "Set(v) with the current value.",
        InstrumentKind::Histogram => "Observe(v) for every sample.",
    }
}

impl InstrumentationTemplate for GoTemplate {
    fn language(&self) -> BackendLanguage {
        BackendLanguage::Go
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn emit_metrics(&self, plan: &MonitoringPlan) -> String {
        let mut out = vec![
            format!(
                "// Code generated by monitorgen for {}. DO NOT EDIT.",
                comment_text(&plan.app_name)
            ),
            String::new(),
            "package metrics".to_string(),
            String::new(),
            "import (".to_string(),
            "\t\"github.com/prometheus/client_golang/prometheus\"".to_string(),
            "\t\"github.com/prometheus/client_golang/prometheus/promauto\"".to_string(),
            ")".to_string(),
            String::new(),
        ];

        let coverage = baseline_coverage(plan);
        if !coverage.is_empty() {
            out.push("// Covered by the baseline request instruments:".to_string());
            out.extend(coverage.iter().map(|line| format!("//   - {}", line)));
            out.push(String::new());
        }

        out.push("var (".to_string());
        let instruments = plan.instruments();
        for (index, instrument) in instruments.iter().enumerate() {
            if index > 0 {
                out.push(String::new());
            }
            if instrument.labels.is_empty() {
                out.push(format!("\t// {}", comment_text(&instrument.help)));
                out.push(format!("\t// Call {}", usage_hint(instrument)));
            }
            out.push(declaration(instrument));
        }
        out.push(")".to_string());
        out.push(String::new());
        out.join("\n")
    }

    fn emit_middleware(&self, plan: &MonitoringPlan) -> String {
        let requests = pascal_case(REQUESTS_TOTAL);
        let duration = pascal_case(REQUEST_DURATION_SECONDS);
        format!(
            r#"// Code generated by monitorgen for {app}. DO NOT EDIT.

package metrics

import (
	"net/http"
	"strconv"
	"time"

	"github.com/prometheus/client_golang/prometheus/promhttp"
)

type statusRecorder struct {{
	http.ResponseWriter
	status int
}}

func (r *statusRecorder) WriteHeader(status int) {{
	r.status = status
	r.ResponseWriter.WriteHeader(status)
}}

// Middleware records {requests_name} and {duration_name} for every request.
func Middleware(next http.Handler) http.Handler {{
	return http.HandlerFunc(func(w http.ResponseWriter, r *http.Request) {{
		start := time.Now()
		recorder := &statusRecorder{{ResponseWriter: w, status: http.StatusOK}}
		next.ServeHTTP(recorder, r)

		status := strconv.Itoa(recorder.status)
		{requests}.WithLabelValues(r.Method, r.URL.Path, status).Inc()
		{duration}.WithLabelValues(r.Method, r.URL.Path, status).Observe(time.Since(start).Seconds())
	}})
}}

// MetricsHandler serves the registry. Mount it at {path}.
func MetricsHandler() http.Handler {{
	return promhttp.Handler()
}}
"#,
            app = comment_text(&plan.app_name),
            requests_name = REQUESTS_TOTAL,
            duration_name = REQUEST_DURATION_SECONDS,
            requests = requests,
            duration = duration,
            path = plan.config.prometheus.metrics_path,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::model::{Application, MonitoringRule};

    fn plan() -> MonitoringPlan {
        let app = Application::new("Shop", "go")
            .with_rule(MonitoringRule::track("page views"))
            .with_rule(MonitoringRule::track("number of signups"));
        MonitoringPlan::build(&app, &GeneratorConfig::default())
    }

    #[test]
    fn test_go_metrics_declarations() {
        let source = GoTemplate.emit_metrics(&plan());
        assert!(source.contains("package metrics"));
        assert!(source.contains(
            "\tHttpRequestsTotal = promauto.NewCounterVec(prometheus.CounterOpts{"
        ));
        assert!(source.contains("\t\tBuckets: prometheus.DefBuckets,"));
        assert!(source.contains("\tShopPageViews = promauto.NewGauge(prometheus.GaugeOpts{"));
        assert!(source.contains(
            "\tShopNumberOfSignupsTotal = promauto.NewCounter(prometheus.CounterOpts{"
        ));
        assert!(source.contains("[]string{\"method\", \"route\", \"status\"}"));
        assert_eq!(source.matches("promauto.New").count(), 4);
    }

    #[test]
    fn test_go_middleware_uses_declared_identifiers() {
        let source = GoTemplate.emit_middleware(&plan());
        assert!(source.contains("func Middleware(next http.Handler) http.Handler {"));
        assert!(source.contains("func MetricsHandler() http.Handler {"));
        assert!(source.contains("HttpRequestsTotal.WithLabelValues"));
        assert!(source.contains("HttpRequestDurationSeconds.WithLabelValues"));
        assert!(source.contains("Mount it at /metrics."));
    }
}
