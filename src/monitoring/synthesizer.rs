//! Query expression synthesis.
//!
//! Turns tracking descriptions and alert conditions into PromQL. Everything an
//! emitter writes into a query comes from here; emitters never build
//! expressions themselves.

use crate::monitoring::catalog::{self, InstrumentKind, StandardMetric, TALLY_PHRASES};
use crate::monitoring::naming::{slugify, to_prometheus_duration};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// Standalone numeric literal, optionally followed by a percent marker,
    /// and whatever word is glued to its end. Digits glued to a preceding
    /// word ("p95") never match.
    static ref NUMBER: Regex = Regex::new(
        r"(?i)(?:^|[^a-z0-9_.])(\d+(?:\.\d+)?)(\s*(?:%|percent\b))?([a-z_]*)"
    )
    .expect("valid number pattern");

    /// Comparison keywords. The earliest match in the text decides the operator.
    static ref COMPARISON: Regex = Regex::new(
        r"(?i)(?P<gt>\b(?:above|exceeds?|over|greater\s+than|more\s+than|higher\s+than)\b|>)|(?P<lt>\b(?:below|under|less\s+than|lower\s+than)\b|<)"
    )
    .expect("valid comparison pattern");

    /// `for 10 minutes`, `for 2h`
    static ref FOR_CLAUSE: Regex =
        Regex::new(r"(?i)\bfor\s+(\d+\s*[a-z]+)").expect("valid duration pattern");
}

/// Where the expressions of one generation run point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprScope {
    /// Prefix for custom metric names.
    pub namespace: String,
    /// Label matcher for the scrape targets, e.g. `job="shop"`.
    pub selector: String,
    /// Range used by rate().
    pub window: String,
}

/// A custom business metric backed by its own instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMetric {
    pub name: String,
    pub kind: InstrumentKind,
    /// The tracking text the metric came from.
    pub description: String,
}

impl CustomMetric {
    pub fn expression(&self, selector: &str, window: &str) -> String {
        match self.kind {
            InstrumentKind::Counter => {
                format!("sum(rate({}{{{}}}[{}]))", self.name, selector, window)
            }
            InstrumentKind::Gauge | InstrumentKind::Histogram => {
                format!("sum({}{{{}}})", self.name, selector)
            }
        }
    }
}

/// Synthesized query for a tracking rule.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingExpr {
    Standard {
        metric: &'static StandardMetric,
        expression: String,
    },
    Custom {
        metric: CustomMetric,
        expression: String,
    },
}

impl TrackingExpr {
    pub fn expression(&self) -> &str {
        match self {
            TrackingExpr::Standard { expression, .. } | TrackingExpr::Custom { expression, .. } => {
                expression
            }
        }
    }
}

/// Picks Counter for running tallies and Gauge for point-in-time quantities.
///
/// Only explicit tally vocabulary yields a counter. Anything else ("active
/// users", "page views", "queue depth") is read as a current value.
pub fn instrument_kind(description: &str) -> InstrumentKind {
    if catalog::mentions(description, TALLY_PHRASES) {
        InstrumentKind::Counter
    } else {
        InstrumentKind::Gauge
    }
}

/// Metric name for a custom tracking description, e.g. `shop_page_views`.
///
/// Counters get the conventional `_total` suffix. Descriptions without any
/// usable characters fall back to `<namespace>_custom_metric`.
pub fn custom_metric(description: &str, namespace: &str) -> CustomMetric {
    let kind = instrument_kind(description);
    let slug = slugify(description);
    let mut name = if slug.is_empty() {
        format!("{}_custom_metric", namespace)
    } else {
        format!("{}_{}", namespace, slug)
    };
    if kind == InstrumentKind::Counter && !name.ends_with("_total") {
        name.push_str("_total");
    }
    CustomMetric {
        name,
        kind,
        description: description.trim().to_string(),
    }
}

/// Canonical query of a standard metric within `scope`.
pub fn standard_tracking(metric: &'static StandardMetric, scope: &ExprScope) -> TrackingExpr {
    TrackingExpr::Standard {
        metric,
        expression: metric.render(&scope.selector, &scope.window),
    }
}

/// Query of the custom metric backing `description` within `scope`.
pub fn custom_tracking(description: &str, scope: &ExprScope) -> TrackingExpr {
    let metric = custom_metric(description, &scope.namespace);
    let expression = metric.expression(&scope.selector, &scope.window);
    TrackingExpr::Custom { metric, expression }
}

/// Query for a tracking description: the canonical expression when the
/// description names a standard metric, a new custom metric otherwise.
pub fn tracking_expression(description: &str, scope: &ExprScope) -> TrackingExpr {
    match catalog::lookup(description) {
        Some(metric) => standard_tracking(metric, scope),
        None => custom_tracking(description, scope),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::GreaterThan => write!(f, ">"),
            Comparison::LessThan => write!(f, "<"),
        }
    }
}

/// Result of reading an alert condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionExpr {
    Threshold {
        operator: Comparison,
        threshold: f64,
        /// The literal was a percentage and has been divided by 100.
        is_ratio: bool,
    },
    /// No comparison keyword or no number; the rule needs a human.
    Placeholder { reason: String },
}

impl ConditionExpr {
    /// Applies the comparison to `expression`.
    ///
    /// Placeholders compare against `NaN`, which is valid PromQL and never
    /// fires, so the rule file still loads while the rule waits for review.
    pub fn apply(&self, expression: &str) -> String {
        match self {
            ConditionExpr::Threshold {
                operator,
                threshold,
                ..
            } => format!("({}) {} {}", expression, operator, threshold),
            ConditionExpr::Placeholder { .. } => format!("({}) > NaN", expression),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ConditionExpr::Placeholder { .. })
    }
}

fn find_comparison(condition: &str) -> Option<Comparison> {
    let captures = COMPARISON.captures(condition)?;
    if captures.name("gt").is_some() {
        Some(Comparison::GreaterThan)
    } else {
        Some(Comparison::LessThan)
    }
}

/// Suffixes that keep a glued number a threshold ("2s", "500ms"). Anything
/// else ("5xx", "2fa") makes the number part of a word.
fn is_unit_suffix(suffix: &str) -> bool {
    matches!(
        suffix.to_ascii_lowercase().as_str(),
        "" | "s" | "ms" | "m" | "h" | "d"
    )
}

/// Reads the comparison and threshold out of an alert condition.
///
/// Percentages become ratios and milliseconds become seconds.
///
/// ```
/// use monitorgen::monitoring::synthesizer::{condition_expression, ConditionExpr, Comparison};
///
/// assert_eq!(
///     condition_expression("error rate is above 5%"),
///     ConditionExpr::Threshold { operator: Comparison::GreaterThan, threshold: 0.05, is_ratio: true }
/// );
/// ```
pub fn condition_expression(condition: &str) -> ConditionExpr {
    let Some(operator) = find_comparison(condition) else {
        return ConditionExpr::Placeholder {
            reason: format!("no comparison keyword in '{}'", condition.trim()),
        };
    };
    let Some(captures) = NUMBER
        .captures_iter(condition)
        .find(|captures| is_unit_suffix(captures.get(3).map_or("", |m| m.as_str())))
    else {
        return ConditionExpr::Placeholder {
            reason: format!("no numeric threshold in '{}'", condition.trim()),
        };
    };
    let literal: f64 = match captures[1].parse() {
        Ok(value) => value,
        Err(_) => {
            return ConditionExpr::Placeholder {
                reason: format!("unreadable threshold '{}'", &captures[1]),
            };
        }
    };
    let is_ratio = captures.get(2).is_some();
    let threshold = if is_ratio {
        literal / 100.0
    } else if captures[3].eq_ignore_ascii_case("ms") {
        literal / 1000.0
    } else {
        literal
    };
    ConditionExpr::Threshold {
        operator,
        threshold,
        is_ratio,
    }
}

/// `for` duration written into the condition itself, e.g. "... for 10 minutes".
pub fn condition_for_duration(condition: &str) -> Option<String> {
    FOR_CLAUSE
        .captures(condition)
        .and_then(|captures| to_prometheus_duration(&captures[1]))
}
