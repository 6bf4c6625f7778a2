//! Application model consumed by the generator.
//!
//! These types mirror the intermediate representation produced upstream by the
//! DSL front end. They are plain data: the generator never mutates them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a monitoring rule asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Track,
    Alert,
    Log,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Track => write!(f, "track"),
            RuleKind::Alert => write!(f, "alert"),
            RuleKind::Log => write!(f, "log"),
        }
    }
}

/// A single monitoring intent, e.g. `alert "error rate is above 5%" -> Slack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringRule {
    pub kind: RuleKind,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub duration: String,
}

impl MonitoringRule {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            metric: String::new(),
            condition: String::new(),
            channel: String::new(),
            service: String::new(),
            duration: String::new(),
        }
    }

    /// `track "<metric>"`
    pub fn track(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            ..Self::new(RuleKind::Track)
        }
    }

    /// `alert "<condition>"`
    pub fn alert(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            ..Self::new(RuleKind::Alert)
        }
    }

    /// `log "<what>"`
    pub fn log(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            ..Self::new(RuleKind::Log)
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// The human text that best describes the rule, whichever field carries it.
    pub fn text(&self) -> &str {
        match self.kind {
            RuleKind::Alert if !self.condition.trim().is_empty() => &self.condition,
            RuleKind::Alert => &self.metric,
            _ if !self.metric.trim().is_empty() => &self.metric,
            _ => &self.condition,
        }
    }
}

/// A deployable service in a microservice topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub services: Vec<Service>,
}

/// The part of the application description this generator reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(default)]
    pub backend_language: String,
    #[serde(default)]
    pub backend_port: Option<u16>,
    #[serde(default)]
    pub architecture: Option<Architecture>,
    #[serde(default)]
    pub monitoring_rules: Vec<MonitoringRule>,
}

impl Application {
    pub fn new(name: impl Into<String>, backend_language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend_language: backend_language.into(),
            ..Default::default()
        }
    }

    pub fn with_rule(mut self, rule: MonitoringRule) -> Self {
        self.monitoring_rules.push(rule);
        self
    }

    pub fn with_service(mut self, name: impl Into<String>, port: Option<u16>) -> Self {
        self.architecture
            .get_or_insert_with(Architecture::default)
            .services
            .push(Service {
                name: name.into(),
                port,
            });
        self
    }
}

/// Backend languages with an instrumentation template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BackendLanguage {
    #[default]
    Go,
    Node,
    Python,
}

impl BackendLanguage {
    /// Ordered keyword table; the first language with a matching keyword wins.
    const KEYWORDS: &'static [(BackendLanguage, &'static [&'static str])] = &[
        (BackendLanguage::Go, &["golang", "go", "gin", "echo", "fiber"]),
        (
            BackendLanguage::Node,
            &["node", "typescript", "javascript", "express", "nest", "ts", "js"],
        ),
        (
            BackendLanguage::Python,
            &["python", "fastapi", "flask", "django", "py"],
        ),
    ];

    /// Matches a free-form backend description such as `"Node.js (Express)"`.
    ///
    /// Keywords are compared against whole alphanumeric tokens so that
    /// `"django"` does not read as Go.
    pub fn detect(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        Self::KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| tokens.contains(k)))
            .map(|(language, _)| *language)
    }

    pub fn default_port(self) -> u16 {
        match self {
            BackendLanguage::Go => 8080,
            BackendLanguage::Node => 3000,
            BackendLanguage::Python => 8000,
        }
    }
}

impl fmt::Display for BackendLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendLanguage::Go => write!(f, "go"),
            BackendLanguage::Node => write!(f, "node"),
            BackendLanguage::Python => write!(f, "python"),
        }
    }
}
