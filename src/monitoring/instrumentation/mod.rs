//! Instrumentation source templates.
//!
//! Every template declares the instruments listed by
//! [`MonitoringPlan::instruments`] and nothing else, so the generated code
//! exposes exactly the series the dashboard and alert rules query.

mod go;
mod node;
mod python;

pub use go::GoTemplate;
pub use node::NodeTemplate;
pub use python::PythonTemplate;

use crate::model::BackendLanguage;
use crate::monitoring::plan::MonitoringPlan;

/// One backend language's metrics and middleware files.
pub trait InstrumentationTemplate {
    fn language(&self) -> BackendLanguage;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Instrument declarations.
    fn emit_metrics(&self, plan: &MonitoringPlan) -> String;

    /// Request middleware recording the baseline instruments, and the
    /// handler exposing them.
    fn emit_middleware(&self, plan: &MonitoringPlan) -> String;
}

pub fn template_for(language: BackendLanguage) -> Box<dyn InstrumentationTemplate> {
    match language {
        BackendLanguage::Go => Box::new(GoTemplate),
        BackendLanguage::Node => Box::new(NodeTemplate),
        BackendLanguage::Python => Box::new(PythonTemplate),
    }
}

/// Double-quoted string literal, valid in Go, TypeScript and Python.
pub(crate) fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Text is embedded in line comments; keep it on one line.
pub(crate) fn comment_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One line per tracking rule the baseline already covers.
pub(crate) fn baseline_coverage(plan: &MonitoringPlan) -> Vec<String> {
    plan.standard
        .iter()
        .map(|tracking| {
            format!(
                "{} ({})",
                comment_text(&tracking.description),
                tracking.metric.name
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::model::{Application, MonitoringRule};

    #[test]
    fn test_template_for_language() {
        assert_eq!(template_for(BackendLanguage::Go).extension(), "go");
        assert_eq!(template_for(BackendLanguage::Node).extension(), "ts");
        assert_eq!(template_for(BackendLanguage::Python).extension(), "py");
        assert_eq!(
            template_for(BackendLanguage::Python).language(),
            BackendLanguage::Python
        );
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("page views"), "\"page views\"");
        assert_eq!(quoted("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn test_comment_text_is_single_line() {
        assert_eq!(comment_text("active\nusers  now"), "active users now");
    }

    #[test]
    fn test_every_template_declares_the_same_instruments() {
        let app = Application::new("Shop", "go")
            .with_rule(MonitoringRule::track("page views"))
            .with_rule(MonitoringRule::track("orders placed"))
            .with_rule(MonitoringRule::track("response time"));
        let plan = MonitoringPlan::build(&app, &GeneratorConfig::default());

        for language in [BackendLanguage::Go, BackendLanguage::Node, BackendLanguage::Python] {
            let metrics = template_for(language).emit_metrics(&plan);
            for instrument in plan.instruments() {
                assert!(
                    metrics.contains(&quoted(&instrument.name)),
                    "{} missing from {} metrics",
                    instrument.name,
                    language
                );
            }
            assert!(metrics.contains("response time (request_duration)"));
        }
    }
}
