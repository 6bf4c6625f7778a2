//! Canonical metric table.
//!
//! The generated middleware always records two instruments: a request counter
//! and a request duration histogram. Every "standard" metric is an expression
//! over those two, so tracking intents that match one of the entries below
//! never need new instrumentation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the baseline request counter.
pub const REQUESTS_TOTAL: &str = "http_requests_total";
/// Name of the baseline request duration histogram.
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
/// Labels recorded by the middleware on both baseline instruments.
pub const BASELINE_LABELS: &[&str] = &["method", "route", "status"];

/// Instrument kinds the generated code can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    Counter,
    Gauge,
    Histogram,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentKind::Counter => write!(f, "counter"),
            InstrumentKind::Gauge => write!(f, "gauge"),
            InstrumentKind::Histogram => write!(f, "histogram"),
        }
    }
}

/// A framework-level metric derived from the baseline instruments.
#[derive(Debug)]
pub struct StandardMetric {
    pub name: &'static str,
    pub title: &'static str,
    /// Lowercase phrases matched at word starts, in priority order.
    pub recognition_phrases: &'static [&'static str],
    /// PromQL with `{selector}` and `{window}` placeholders.
    pub expression: &'static str,
    /// The baseline instrument the expression reads.
    pub instrument: InstrumentKind,
    /// Grafana unit of the expression's result.
    pub unit: &'static str,
}

impl StandardMetric {
    /// Renders the expression for a job selector such as `job="shop"`.
    pub fn render(&self, selector: &str, window: &str) -> String {
        self.expression
            .replace("{selector}", selector)
            .replace("{window}", window)
    }
}

impl PartialEq for StandardMetric {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for StandardMetric {}

pub static REQUEST_DURATION: StandardMetric = StandardMetric {
    name: "request_duration",
    title: "Latency (p95)",
    recognition_phrases: &[
        "response time",
        "latency",
        "request duration",
        "slow request",
        "p95",
        "p99",
    ],
    expression: "histogram_quantile(0.95, sum by (le) (rate(http_request_duration_seconds_bucket{{selector}}[{window}])))",
    instrument: InstrumentKind::Histogram,
    unit: "s",
};

pub static ERROR_RATE: StandardMetric = StandardMetric {
    name: "error_rate",
    title: "Error Rate",
    recognition_phrases: &[
        "error rate",
        "errors",
        "error",
        "failure rate",
        "failed request",
        "5xx",
    ],
    expression: "sum(rate(http_requests_total{{selector},status=~\"5..\"}[{window}])) / sum(rate(http_requests_total{{selector}}[{window}]))",
    instrument: InstrumentKind::Counter,
    unit: "percentunit",
};

pub static REQUEST_RATE: StandardMetric = StandardMetric {
    name: "request_rate",
    title: "Request Rate",
    recognition_phrases: &[
        "request rate",
        "requests per second",
        "rps",
        "throughput",
        "traffic",
        "api request",
        "request count",
    ],
    expression: "sum(rate(http_requests_total{{selector}}[{window}]))",
    instrument: InstrumentKind::Counter,
    unit: "reqps",
};

/// Evaluation order matters: "slow error responses" reads as latency.
pub static STANDARD_METRICS: [&StandardMetric; 3] = [&REQUEST_DURATION, &ERROR_RATE, &REQUEST_RATE];

/// Order of the baseline dashboard panels.
pub static BASELINE_PANELS: [&StandardMetric; 3] = [&REQUEST_RATE, &ERROR_RATE, &REQUEST_DURATION];

/// Vocabulary that marks a custom metric as a running tally.
pub static TALLY_PHRASES: &[&str] = &[
    "count",
    "total",
    "number of",
    "tally",
    "occurrences",
    "how many",
    "signups",
    "sign ups",
    "orders",
    "purchases",
    "clicks",
    "downloads",
    "sent",
    "processed",
    "created",
];

/// Lowercases and collapses the text to single-space separated alphanumeric
/// tokens, with a leading space so phrases can be matched at word starts.
pub(crate) fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len() + 1);
    for token in text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        normalized.push(' ');
        normalized.push_str(&token.to_ascii_lowercase());
    }
    normalized
}

/// True when one of `phrases` starts at a word boundary in `text`.
///
/// Only the start is anchored so plurals match: "response time" matches
/// "response times".
pub fn mentions(text: &str, phrases: &[&str]) -> bool {
    let normalized = normalize(text);
    phrases
        .iter()
        .any(|phrase| normalized.contains(&format!(" {}", phrase)))
}

/// First canonical metric whose phrases appear in `description`.
pub fn lookup(description: &str) -> Option<&'static StandardMetric> {
    STANDARD_METRICS
        .iter()
        .copied()
        .find(|metric| mentions(description, metric.recognition_phrases))
}

/// True when the description is already covered by the baseline middleware.
pub fn is_standard_metric(description: &str) -> bool {
    lookup(description).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_standard_metric() {
        assert!(is_standard_metric("response times for all api endpoints"));
        assert!(is_standard_metric("Response Time"));
        assert!(is_standard_metric("error rates per endpoint"));
        assert!(is_standard_metric("API throughput"));
        assert!(!is_standard_metric("page views"));
        assert!(!is_standard_metric("active users"));
        assert!(!is_standard_metric(""));
    }

    #[test]
    fn test_lookup_respects_table_order() {
        assert_eq!(lookup("latency of failed requests"), Some(&REQUEST_DURATION));
        assert_eq!(lookup("error rate"), Some(&ERROR_RATE));
        assert_eq!(lookup("requests per second"), Some(&REQUEST_RATE));
    }

    #[test]
    fn test_mentions_anchors_word_start() {
        assert!(mentions("number of orders", &["orders"]));
        assert!(!mentions("corpses", &["rps"]));
        assert!(mentions("p95 response", &["p95"]));
        assert!(!mentions("terror", &["error"]));
    }

    #[test]
    fn test_render_expressions() {
        assert_eq!(
            REQUEST_RATE.render("job=\"shop\"", "5m"),
            "sum(rate(http_requests_total{job=\"shop\"}[5m]))"
        );
        assert_eq!(
            ERROR_RATE.render("job=\"shop\"", "1m"),
            "sum(rate(http_requests_total{job=\"shop\",status=~\"5..\"}[1m])) / sum(rate(http_requests_total{job=\"shop\"}[1m]))"
        );
        assert!(REQUEST_DURATION
            .render("job=\"shop\"", "5m")
            .contains("http_request_duration_seconds_bucket{job=\"shop\"}[5m]"));
    }
}
