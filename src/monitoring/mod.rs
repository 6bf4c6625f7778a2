//! Monitoring artifact generation.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`classifier`] sorts the rules into standard, custom, alert and log.
//! 2. [`synthesizer`] turns descriptions and conditions into PromQL.
//! 3. [`plan`] fixes every name, expression and target in a
//!    [`MonitoringPlan`].
//! 4. The emitters ([`scrape`], [`alerts`], [`dashboard`], [`compose`],
//!    [`instrumentation`]) render that plan.
//! 5. [`generator`] writes the result to disk.

pub mod alerts;
pub mod catalog;
pub mod classifier;
pub mod compose;
pub mod dashboard;
pub mod generator;
pub mod instrumentation;
pub mod naming;
pub mod plan;
pub mod scrape;
pub mod synthesizer;
pub mod targets;

pub use catalog::{InstrumentKind, StandardMetric, is_standard_metric};
pub use classifier::{ClassifiedRule, RuleCategory, classify};
pub use generator::{Artifact, GenerationReport, MonitoringGenerator, generate};
pub use instrumentation::{InstrumentationTemplate, template_for};
pub use naming::sanitize;
pub use plan::{AlertDefinition, MonitoringPlan, Severity};
pub use synthesizer::{ConditionExpr, condition_expression, tracking_expression};
