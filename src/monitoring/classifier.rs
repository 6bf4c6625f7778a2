//! Splits monitoring rules into standard tracking, custom tracking, alerts and
//! log directives.
//!
//! Classification is an ordered list of predicates evaluated first-match-wins:
//!
//! 1. `alert` rules are alerts, whatever their text says.
//! 2. `log` rules are log directives. They never produce instrumentation.
//! 3. `track` rules matching a canonical metric are standard.
//! 4. Any other `track` rule is custom.
//!
//! Classification cannot fail. An empty rule list classifies to nothing and
//! the baseline artifacts are still generated from it.

use crate::model::{MonitoringRule, RuleKind};
use crate::monitoring::catalog::{self, StandardMetric};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    /// Covered by the baseline middleware.
    Standard(&'static StandardMetric),
    /// A business metric that needs its own instrument.
    Custom,
    Alert,
    Log,
}

impl RuleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RuleCategory::Standard(_) => "standard",
            RuleCategory::Custom => "custom",
            RuleCategory::Alert => "alert",
            RuleCategory::Log => "log",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedRule<'a> {
    pub rule: &'a MonitoringRule,
    pub category: RuleCategory,
}

type Predicate = fn(&MonitoringRule) -> Option<RuleCategory>;

fn is_alert(rule: &MonitoringRule) -> Option<RuleCategory> {
    (rule.kind == RuleKind::Alert).then_some(RuleCategory::Alert)
}

fn is_log(rule: &MonitoringRule) -> Option<RuleCategory> {
    (rule.kind == RuleKind::Log).then_some(RuleCategory::Log)
}

fn is_standard(rule: &MonitoringRule) -> Option<RuleCategory> {
    if rule.kind != RuleKind::Track {
        return None;
    }
    catalog::lookup(rule.text()).map(RuleCategory::Standard)
}

fn is_custom(_rule: &MonitoringRule) -> Option<RuleCategory> {
    Some(RuleCategory::Custom)
}

const CLASSIFICATION_ORDER: &[(&str, Predicate)] = &[
    ("alert", is_alert),
    ("log", is_log),
    ("standard", is_standard),
    ("custom", is_custom),
];

/// Classifies a single rule.
pub fn classify_rule(rule: &MonitoringRule) -> RuleCategory {
    for (name, predicate) in CLASSIFICATION_ORDER {
        if let Some(category) = predicate(rule) {
            debug!("Rule '{}' ({}) matched '{}' predicate", rule.text(), rule.kind, name);
            return category;
        }
    }
    RuleCategory::Custom
}

/// Classifies every rule, preserving input order.
pub fn classify(rules: &[MonitoringRule]) -> Vec<ClassifiedRule<'_>> {
    rules
        .iter()
        .map(|rule| ClassifiedRule {
            rule,
            category: classify_rule(rule),
        })
        .collect()
}
