//! Prometheus alerting rule file.
//!
//! One group per application. The three default rules come first, then one
//! rule per `alert` intent in input order.

use crate::error::{GeneratorError, GeneratorResult};
use crate::monitoring::naming::slugify;
use crate::monitoring::plan::{AlertDefinition, AlertOrigin, MonitoringPlan};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rule file document
#[derive(Debug, Serialize)]
pub struct RuleFile {
    pub groups: Vec<RuleGroup>,
}

/// Rule group
#[derive(Debug, Serialize)]
pub struct RuleGroup {
    pub name: String,
    pub rules: Vec<AlertingRule>,
}

/// A single alerting rule
#[derive(Debug, Serialize)]
pub struct AlertingRule {
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for")]
    pub for_duration: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl AlertingRule {
    fn from_definition(definition: &AlertDefinition, app_slug: &str) -> Self {
        let mut labels = BTreeMap::from([
            ("severity".to_string(), definition.severity.to_string()),
            ("app".to_string(), app_slug.to_string()),
        ]);
        let mut annotations = BTreeMap::from([
            ("summary".to_string(), definition.summary.clone()),
            ("description".to_string(), definition.description.clone()),
        ]);

        if definition.origin == AlertOrigin::Default {
            labels.insert("origin".to_string(), "default".to_string());
        }
        if let Some(channel) = &definition.channel {
            let slug = slugify(channel);
            if !slug.is_empty() {
                labels.insert("channel".to_string(), slug);
            }
            annotations.insert("channel".to_string(), channel.clone());
        }
        if definition.needs_threshold {
            labels.insert("threshold".to_string(), "manual".to_string());
        }

        AlertingRule {
            alert: definition.identifier.clone(),
            expr: definition.expression.clone(),
            for_duration: definition.for_duration.clone(),
            labels,
            annotations,
        }
    }
}

/// `<slug>-alerts`
pub fn group_name(plan: &MonitoringPlan) -> String {
    format!("{}-alerts", plan.app_slug)
}

pub fn rule_document(plan: &MonitoringPlan) -> RuleFile {
    RuleFile {
        groups: vec![RuleGroup {
            name: group_name(plan),
            rules: plan
                .alerts
                .iter()
                .map(|definition| AlertingRule::from_definition(definition, &plan.app_slug))
                .collect(),
        }],
    }
}

pub fn render_alert_rules(plan: &MonitoringPlan) -> GeneratorResult<String> {
    serde_yaml::to_string(&rule_document(plan))
        .map_err(|e| GeneratorError::serialize("alerts.yml", e))
}
