use super::{load_application, load_config};
use crate::error::CliResult;
use clap::ArgMatches;
use monitorgen::MonitoringGenerator;
use monitorgen::monitoring::classify;

/// Prints classification and synthesized expressions without writing files.
pub fn handle_plan_command(matches: &ArgMatches) -> CliResult<()> {
    let app = load_application(matches)?;
    let config = load_config(matches)?;
    let plan = MonitoringGenerator::with_config(config).plan(&app)?;

    println!("Application: {} ({})", plan.app_name, plan.language);
    println!("Scrape targets:");
    for target in &plan.targets {
        println!("  {:<20} {}", target.job, target.address());
    }

    println!("Rules:");
    for entry in classify(&app.monitoring_rules) {
        println!("  [{:<8}] {}", entry.category.label(), entry.rule.text());
    }

    if !plan.standard.is_empty() {
        println!("Standard metrics:");
        for tracking in &plan.standard {
            println!("  {} => {}", tracking.description, tracking.expression);
        }
    }
    if !plan.custom.is_empty() {
        println!("Custom metrics:");
        for custom in &plan.custom {
            println!(
                "  {} ({}) => {}",
                custom.metric.name, custom.metric.kind, custom.expression
            );
        }
    }

    println!("Alerts:");
    for alert in &plan.alerts {
        println!(
            "  {} [{}, for {}] {}",
            alert.identifier, alert.severity, alert.for_duration, alert.expression
        );
    }

    if !plan.logs.is_empty() {
        println!("Log retention: {}", plan.retention);
    }
    for warning in &plan.warnings {
        println!("Warning: {}", warning);
    }
    Ok(())
}
