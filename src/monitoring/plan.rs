//! The monitoring plan.
//!
//! A plan is built once per generation run from the application's rules and
//! then handed by reference to every emitter. Metric names, expressions, alert
//! identifiers and scrape addresses are all decided here, so the generated
//! files cannot disagree with each other.

use crate::config::GeneratorConfig;
use crate::model::{Application, BackendLanguage, MonitoringRule};
use crate::monitoring::catalog::{
    self, BASELINE_LABELS, ERROR_RATE, InstrumentKind, REQUEST_DURATION, REQUEST_DURATION_SECONDS,
    REQUESTS_TOTAL, StandardMetric,
};
use crate::monitoring::classifier::{RuleCategory, classify};
use crate::monitoring::naming::{
    duration_millis, kebab, sanitize, slugify, to_prometheus_duration,
};
use crate::monitoring::synthesizer::{
    ConditionExpr, CustomMetric, ExprScope, TrackingExpr, condition_expression,
    condition_for_duration, custom_tracking, standard_tracking,
};
use crate::monitoring::targets::{ScrapeTarget, job_selector, scrape_targets, selector_for_service};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;

/// A tracking rule already covered by the baseline middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardTracking {
    pub description: String,
    pub metric: &'static StandardMetric,
    pub expression: String,
}

/// A custom metric and every tracking rule that asked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomTracking {
    pub metric: CustomMetric,
    pub expression: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// What an alert's expression is computed from.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertBinding {
    Standard(&'static StandardMetric),
    Custom(String),
    /// No recognizable topic: the alert watches target liveness instead.
    Liveness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOrigin {
    Default,
    User,
}

/// One alerting rule as it will appear in the rule file.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDefinition {
    /// PascalCase, unique within the plan.
    pub identifier: String,
    pub expression: String,
    pub for_duration: String,
    pub severity: Severity,
    pub summary: String,
    pub description: String,
    pub channel: Option<String>,
    pub binding: AlertBinding,
    pub origin: AlertOrigin,
    /// The threshold could not be read and must be filled in by hand.
    pub needs_threshold: bool,
}

/// A `log` rule. Logs do not produce instrumentation; they only shape the
/// deployed stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    pub description: String,
    pub service: String,
    pub retention: Option<String>,
}

/// An instrument the generated code declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSpec {
    pub name: String,
    pub help: String,
    pub kind: InstrumentKind,
    pub labels: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringPlan {
    pub app_name: String,
    /// kebab-case application slug for uids, group and network names.
    pub app_slug: String,
    pub language: BackendLanguage,
    pub targets: Vec<ScrapeTarget>,
    pub scope: ExprScope,
    pub standard: Vec<StandardTracking>,
    pub custom: Vec<CustomTracking>,
    pub alerts: Vec<AlertDefinition>,
    pub logs: Vec<LogDirective>,
    /// Prometheus TSDB retention.
    pub retention: String,
    /// Soft problems resolved with a fallback.
    pub warnings: Vec<String>,
    pub config: GeneratorConfig,
}

const CRITICAL_WORDS: &[&str] = &["critical", "urgent", "pagerduty", "sev1", "immediately"];

fn namespace_for(app: &Application, config: &GeneratorConfig) -> String {
    if let Some(namespace) = &config.instrumentation.namespace {
        return namespace.clone();
    }
    let slug = slugify(&app.name);
    match slug.chars().next() {
        None => "app".to_string(),
        Some(first) if first.is_ascii_digit() => format!("app_{}", slug),
        Some(_) => slug,
    }
}

fn unique_identifier(base: String, taken: &mut HashSet<String>) -> String {
    let mut identifier = base.clone();
    let mut suffix = 2;
    while taken.contains(&identifier) {
        identifier = format!("{}{}", base, suffix);
        suffix += 1;
    }
    taken.insert(identifier.clone());
    identifier
}

impl MonitoringPlan {
    /// Classifies and synthesizes everything the emitters need.
    pub fn build(app: &Application, config: &GeneratorConfig) -> Self {
        let mut warnings = Vec::new();

        let language = match BackendLanguage::detect(&app.backend_language) {
            Some(language) => language,
            None => {
                let fallback = BackendLanguage::default();
                let message = format!(
                    "Unrecognized backend language '{}', generating {} instrumentation",
                    app.backend_language, fallback
                );
                warn!("{}", message);
                warnings.push(message);
                fallback
            }
        };

        let targets = scrape_targets(app, language);
        let scope = ExprScope {
            namespace: namespace_for(app, config),
            selector: job_selector(&targets),
            window: config.prometheus.rate_window.clone(),
        };
        let app_slug = match kebab(&app.name) {
            slug if slug.is_empty() => "app".to_string(),
            slug => slug,
        };

        let mut plan = MonitoringPlan {
            app_name: app.name.clone(),
            app_slug,
            language,
            targets,
            scope,
            standard: Vec::new(),
            custom: Vec::new(),
            alerts: Vec::new(),
            logs: Vec::new(),
            retention: config.prometheus.default_retention.clone(),
            warnings,
            config: config.clone(),
        };

        let classified = classify(&app.monitoring_rules);
        for entry in &classified {
            match entry.category {
                RuleCategory::Standard(metric) => plan.add_tracking(entry.rule, Some(metric)),
                RuleCategory::Custom => plan.add_tracking(entry.rule, None),
                RuleCategory::Log => plan.add_log(entry.rule),
                RuleCategory::Alert => {}
            }
        }

        // Alerts last: they may bind to custom metrics declared by any track rule.
        plan.add_default_alerts();
        let mut taken: HashSet<String> =
            plan.alerts.iter().map(|a| a.identifier.clone()).collect();
        for entry in classified
            .iter()
            .filter(|entry| entry.category == RuleCategory::Alert)
        {
            plan.add_user_alert(entry.rule, &mut taken);
        }

        plan.retention = plan.longest_log_retention();

        info!(
            "Planned monitoring for '{}': {} target(s), {} standard, {} custom, {} alert(s), {} log rule(s)",
            plan.app_name,
            plan.targets.len(),
            plan.standard.len(),
            plan.custom.len(),
            plan.alerts.len(),
            plan.logs.len()
        );
        plan
    }

    fn scope_for(&self, rule: &MonitoringRule) -> ExprScope {
        match selector_for_service(&self.targets, &rule.service) {
            Some(selector) => ExprScope {
                selector,
                ..self.scope.clone()
            },
            None => self.scope.clone(),
        }
    }

    fn add_tracking(&mut self, rule: &MonitoringRule, standard: Option<&'static StandardMetric>) {
        let description = rule.text().trim().to_string();
        let scope = self.scope_for(rule);
        let tracking = match standard {
            Some(metric) => standard_tracking(metric, &scope),
            None => custom_tracking(&description, &scope),
        };
        match tracking {
            TrackingExpr::Standard { metric, expression } => {
                debug!("'{}' is covered by standard metric {}", description, metric.name);
                self.standard.push(StandardTracking {
                    description,
                    metric,
                    expression,
                });
            }
            TrackingExpr::Custom { metric, expression } => {
                if metric.name == REQUESTS_TOTAL || metric.name == REQUEST_DURATION_SECONDS {
                    let message = format!(
                        "Custom metric '{}' clashes with a baseline instrument; '{}' is tracked by the baseline panels",
                        metric.name, description
                    );
                    warn!("{}", message);
                    self.warnings.push(message);
                    return;
                }
                if let Some(existing) = self
                    .custom
                    .iter_mut()
                    .find(|custom| custom.metric.name == metric.name)
                {
                    debug!("'{}' reuses custom metric {}", description, metric.name);
                    existing.descriptions.push(description);
                    return;
                }
                self.custom.push(CustomTracking {
                    metric,
                    expression,
                    descriptions: vec![description],
                });
            }
        }
    }

    fn add_log(&mut self, rule: &MonitoringRule) {
        let retention = if rule.duration.trim().is_empty() {
            None
        } else {
            let parsed = to_prometheus_duration(&rule.duration);
            if parsed.is_none() {
                let message = format!(
                    "Could not read retention '{}' of log rule '{}'",
                    rule.duration,
                    rule.text()
                );
                warn!("{}", message);
                self.warnings.push(message);
            }
            parsed
        };
        self.logs.push(LogDirective {
            description: rule.text().trim().to_string(),
            service: rule.service.trim().to_string(),
            retention,
        });
    }

    fn longest_log_retention(&self) -> String {
        self.logs
            .iter()
            .filter_map(|log| log.retention.as_ref())
            .filter_map(|retention| duration_millis(retention).map(|ms| (ms, retention)))
            .max_by_key(|(ms, _)| *ms)
            .map(|(_, retention)| retention.clone())
            .unwrap_or_else(|| self.config.prometheus.default_retention.clone())
    }

    /// Canonical expression over every scrape target.
    pub fn standard_expression(&self, metric: &StandardMetric) -> String {
        metric.render(&self.scope.selector, &self.scope.window)
    }

    /// `up{<selector>}`
    pub fn liveness_expression(&self) -> String {
        format!("up{{{}}}", self.scope.selector)
    }

    fn add_default_alerts(&mut self) {
        let alerting = &self.config.alerting;
        let error_threshold = alerting.error_rate_threshold;
        let latency_threshold = alerting.latency_threshold_seconds;
        let default_for = alerting.default_for.clone();

        let defaults = vec![
            AlertDefinition {
                identifier: "HighErrorRate".to_string(),
                expression: format!(
                    "({}) > {}",
                    self.standard_expression(&ERROR_RATE),
                    error_threshold
                ),
                for_duration: default_for.clone(),
                severity: Severity::Critical,
                summary: "High error rate".to_string(),
                description: format!(
                    "5xx responses make up more than {} of requests to {}.",
                    error_threshold, self.app_name
                ),
                channel: None,
                binding: AlertBinding::Standard(&ERROR_RATE),
                origin: AlertOrigin::Default,
                needs_threshold: false,
            },
            AlertDefinition {
                identifier: "HighLatency".to_string(),
                expression: format!(
                    "({}) > {}",
                    self.standard_expression(&REQUEST_DURATION),
                    latency_threshold
                ),
                for_duration: default_for,
                severity: Severity::Warning,
                summary: "High request latency".to_string(),
                description: format!(
                    "95th percentile latency of {} is above {}s.",
                    self.app_name, latency_threshold
                ),
                channel: None,
                binding: AlertBinding::Standard(&REQUEST_DURATION),
                origin: AlertOrigin::Default,
                needs_threshold: false,
            },
            AlertDefinition {
                identifier: "TargetDown".to_string(),
                expression: format!("{} == 0", self.liveness_expression()),
                for_duration: "1m".to_string(),
                severity: Severity::Critical,
                summary: "Scrape target down".to_string(),
                description: "{{ $labels.instance }} of job {{ $labels.job }} has been unreachable for more than 1 minute.".to_string(),
                channel: None,
                binding: AlertBinding::Liveness,
                origin: AlertOrigin::Default,
                needs_threshold: false,
            },
        ];
        self.alerts.extend(defaults);
    }

    fn bind_alert(&self, text: &str, scope: &ExprScope) -> (AlertBinding, String) {
        if let Some(metric) = catalog::lookup(text) {
            return (
                AlertBinding::Standard(metric),
                metric.render(&scope.selector, &scope.window),
            );
        }
        for custom in &self.custom {
            let phrases: Vec<String> = custom
                .descriptions
                .iter()
                .map(|description| catalog::normalize(description).trim_start().to_string())
                .filter(|phrase| !phrase.is_empty())
                .collect();
            let phrases: Vec<&str> = phrases.iter().map(String::as_str).collect();
            if catalog::mentions(text, &phrases) {
                return (
                    AlertBinding::Custom(custom.metric.name.clone()),
                    custom.metric.expression(&scope.selector, &scope.window),
                );
            }
        }
        (AlertBinding::Liveness, format!("up{{{}}}", scope.selector))
    }

    fn add_user_alert(&mut self, rule: &MonitoringRule, taken: &mut HashSet<String>) {
        let text = rule.text().trim().to_string();
        let scope = self.scope_for(rule);
        let (binding, base) = self.bind_alert(&format!("{} {}", text, rule.metric), &scope);
        let condition = condition_expression(&text);

        let mut description = format!("Generated from \"{}\".", text);
        let expression = match (&binding, &condition) {
            (AlertBinding::Liveness, _) => {
                let message = format!(
                    "Alert '{}' names no known metric; bound to the liveness check of the scrape targets",
                    text
                );
                warn!("{}", message);
                self.warnings.push(message);
                description.push_str(
                    " No metric could be recognized, so this alert fires when a target stops responding. Review before deploying.",
                );
                format!("{} == 0", base)
            }
            (_, ConditionExpr::Placeholder { reason }) => {
                let message = format!("Alert '{}' needs a manual threshold: {}", text, reason);
                warn!("{}", message);
                self.warnings.push(message);
                description.push_str(
                    " MANUAL THRESHOLD REQUIRED: replace NaN with the intended value.",
                );
                condition.apply(&base)
            }
            (
                _,
                ConditionExpr::Threshold {
                    threshold,
                    is_ratio,
                    ..
                },
            ) => {
                if *is_ratio {
                    description.push_str(&format!(" Threshold {} as a 0-1 ratio.", threshold));
                }
                condition.apply(&base)
            }
        };

        let for_duration = self.alert_for_duration(rule, &text);
        let severity = if catalog::mentions(&format!("{} {}", text, rule.channel), CRITICAL_WORDS) {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let channel = Some(rule.channel.trim())
            .filter(|channel| !channel.is_empty())
            .map(str::to_string);
        let identifier = unique_identifier(sanitize(&text), taken);
        debug!("Alert {} => {}", identifier, expression);

        self.alerts.push(AlertDefinition {
            identifier,
            expression,
            for_duration,
            severity,
            summary: text,
            description,
            channel,
            needs_threshold: binding != AlertBinding::Liveness && condition.is_placeholder(),
            binding,
            origin: AlertOrigin::User,
        });
    }

    fn alert_for_duration(&mut self, rule: &MonitoringRule, text: &str) -> String {
        if !rule.duration.trim().is_empty() {
            match to_prometheus_duration(&rule.duration) {
                Some(duration) => return duration,
                None => {
                    let message = format!(
                        "Could not read duration '{}' of alert '{}', using {}",
                        rule.duration, text, self.config.alerting.default_for
                    );
                    warn!("{}", message);
                    self.warnings.push(message);
                }
            }
        }
        condition_for_duration(text).unwrap_or_else(|| self.config.alerting.default_for.clone())
    }

    /// Whether any rule was classified as an alert. Decides both the
    /// Alertmanager block of the scrape config and the Alertmanager service.
    pub fn has_alerts(&self) -> bool {
        self.alerts
            .iter()
            .any(|alert| alert.origin == AlertOrigin::User)
    }

    /// Every instrument the generated code declares: the two baseline
    /// instruments, then one per distinct custom metric.
    pub fn instruments(&self) -> Vec<InstrumentSpec> {
        let mut instruments = vec![
            InstrumentSpec {
                name: REQUESTS_TOTAL.to_string(),
                help: "Total number of HTTP requests.".to_string(),
                kind: InstrumentKind::Counter,
                labels: BASELINE_LABELS,
            },
            InstrumentSpec {
                name: REQUEST_DURATION_SECONDS.to_string(),
                help: "HTTP request latency in seconds.".to_string(),
                kind: InstrumentKind::Histogram,
                labels: BASELINE_LABELS,
            },
        ];
        instruments.extend(self.custom.iter().map(|custom| InstrumentSpec {
            name: custom.metric.name.clone(),
            help: custom.descriptions.join("; "),
            kind: custom.metric.kind,
            labels: &[],
        }));
        instruments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::catalog::REQUEST_RATE;

    fn scenario() -> Application {
        Application::new("Shop", "go")
            .with_rule(MonitoringRule::track("page views"))
            .with_rule(MonitoringRule::alert("error rate is above 5%").with_channel("Slack"))
            .with_rule(
                MonitoringRule::log("all API requests")
                    .with_service("X")
                    .with_duration("90 days"),
            )
    }

    #[test]
    fn test_scenario_plan() {
        let plan = MonitoringPlan::build(&scenario(), &GeneratorConfig::default());

        assert_eq!(plan.language, BackendLanguage::Go);
        assert_eq!(plan.targets[0].address(), "shop:8080");
        assert_eq!(plan.custom.len(), 1);
        assert_eq!(plan.custom[0].metric.name, "shop_page_views");
        assert_eq!(plan.custom[0].metric.kind, InstrumentKind::Gauge);
        assert!(plan.has_alerts());
        assert_eq!(plan.retention, "90d");
        assert!(plan.warnings.is_empty(), "{:?}", plan.warnings);

        let user_alert = plan.alerts.last().unwrap();
        assert_eq!(user_alert.identifier, "ErrorRateIsAbove5");
        assert_eq!(user_alert.channel.as_deref(), Some("Slack"));
        assert!(user_alert.expression.ends_with("> 0.05"));
        assert_eq!(user_alert.binding, AlertBinding::Standard(&ERROR_RATE));
    }

    #[test]
    fn test_status_class_in_condition_is_not_the_threshold() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("5xx responses exceed 2%"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());

        let alert = plan.alerts.last().unwrap();
        assert_eq!(alert.binding, AlertBinding::Standard(&ERROR_RATE));
        assert!(alert.expression.ends_with("> 0.02"), "{}", alert.expression);
        assert!(!alert.needs_threshold);
    }

    #[test]
    fn test_standard_tracking_uses_classified_metric() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::track("p95 latency"))
            .with_rule(MonitoringRule::track("requests per second"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let classified = classify(&app.monitoring_rules);

        assert_eq!(plan.standard.len(), 2);
        for (tracking, entry) in plan.standard.iter().zip(&classified) {
            assert_eq!(entry.category, RuleCategory::Standard(tracking.metric));
            assert_eq!(tracking.expression, plan.standard_expression(tracking.metric));
        }
    }

    #[test]
    fn test_empty_rules_still_have_defaults() {
        let plan = MonitoringPlan::build(&Application::new("shop", "go"), &GeneratorConfig::default());
        assert!(!plan.has_alerts());
        assert_eq!(plan.alerts.len(), 3);
        assert_eq!(plan.instruments().len(), 2);
        assert_eq!(plan.retention, "15d");
    }

    #[test]
    fn test_standard_rules_add_no_instruments() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::track("response times for all api endpoints"))
            .with_rule(MonitoringRule::track("error rates per endpoint"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        assert_eq!(plan.standard.len(), 2);
        assert!(plan.custom.is_empty());
        assert_eq!(plan.instruments().len(), 2);
    }

    #[test]
    fn test_duplicate_custom_metrics_are_merged() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::track("Active users"))
            .with_rule(MonitoringRule::track("active-users"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        assert_eq!(plan.custom.len(), 1);
        assert_eq!(plan.custom[0].descriptions, vec!["Active users", "active-users"]);

        let names: HashSet<String> = plan.instruments().into_iter().map(|i| i.name).collect();
        assert_eq!(names.len(), plan.instruments().len());
    }

    #[test]
    fn test_alert_identifiers_are_unique() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("high error rate above 5%"))
            .with_rule(MonitoringRule::alert("high-error-rate above 5%"))
            .with_rule(MonitoringRule::alert("Target down"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let identifiers: Vec<&str> = plan.alerts.iter().map(|a| a.identifier.as_str()).collect();
        assert_eq!(
            identifiers,
            vec![
                "HighErrorRate",
                "HighLatency",
                "TargetDown",
                "HighErrorRateAbove5",
                "HighErrorRateAbove52",
                "TargetDown2",
            ]
        );
    }

    #[test]
    fn test_unrecognized_alert_binds_to_liveness() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("queue depth above 100"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let alert = plan.alerts.last().unwrap();
        assert_eq!(alert.binding, AlertBinding::Liveness);
        assert_eq!(alert.expression, "up{job=\"shop\"} == 0");
        assert!(!alert.needs_threshold);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_alert_binds_to_custom_metric() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::track("active users"))
            .with_rule(MonitoringRule::alert("active users drops below 10"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let alert = plan.alerts.last().unwrap();
        assert_eq!(alert.binding, AlertBinding::Custom("shop_active_users".to_string()));
        assert_eq!(alert.expression, "(sum(shop_active_users{job=\"shop\"})) < 10");
    }

    #[test]
    fn test_placeholder_threshold_is_flagged() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("latency is too high"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let alert = plan.alerts.last().unwrap();
        assert!(alert.needs_threshold);
        assert!(alert.expression.ends_with("> NaN"));
        assert!(alert.description.contains("MANUAL THRESHOLD REQUIRED"));
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_alert_for_duration_sources() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("error rate above 5%").with_duration("15 minutes"))
            .with_rule(MonitoringRule::alert("latency above 2 for 10 minutes"))
            .with_rule(MonitoringRule::alert("traffic above 1000"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        let durations: Vec<&str> = plan.alerts[3..]
            .iter()
            .map(|a| a.for_duration.as_str())
            .collect();
        assert_eq!(durations, vec!["15m", "10m", "5m"]);
        assert_eq!(plan.alerts[5].binding, AlertBinding::Standard(&REQUEST_RATE));
    }

    #[test]
    fn test_service_scoped_rules() {
        let app = Application::new("shop", "go")
            .with_service("orders", Some(9001))
            .with_service("payments", Some(9002))
            .with_rule(MonitoringRule::track("checkouts count").with_service("payments"))
            .with_rule(MonitoringRule::alert("latency above 2").with_service("orders"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        assert_eq!(plan.scope.selector, "job=~\"orders|payments\"");
        assert!(plan.custom[0].expression.contains("job=\"payments\""));
        assert!(plan.alerts[3].expression.contains("job=\"orders\""));
    }

    #[test]
    fn test_unknown_language_falls_back_to_go() {
        let plan = MonitoringPlan::build(&Application::new("shop", "cobol"), &GeneratorConfig::default());
        assert_eq!(plan.language, BackendLanguage::Go);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_critical_severity() {
        let app = Application::new("shop", "go")
            .with_rule(MonitoringRule::alert("error rate above 10%").with_channel("PagerDuty"))
            .with_rule(MonitoringRule::alert("page views above 1000"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());
        assert_eq!(plan.alerts[3].severity, Severity::Critical);
        assert_eq!(plan.alerts[4].severity, Severity::Warning);
    }

    #[test]
    fn test_namespace() {
        let mut config = GeneratorConfig::default();
        assert_eq!(namespace_for(&Application::new("9 Lives", "go"), &config), "app_9_lives");
        assert_eq!(namespace_for(&Application::new("", "go"), &config), "app");
        config.instrumentation.namespace = Some("acme".to_string());
        assert_eq!(namespace_for(&Application::new("Shop", "go"), &config), "acme");
    }
}
