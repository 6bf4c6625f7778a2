use super::{load_application, load_config, required};
use crate::error::CliResult;
use clap::ArgMatches;
use log::info;
use monitorgen::MonitoringGenerator;

pub fn handle_generate_command(matches: &ArgMatches) -> CliResult<()> {
    let app = load_application(matches)?;
    let config = load_config(matches)?;
    let out = required(matches, "out")?;

    info!("Generating monitoring for '{}' into {}", app.name, out);
    let report = MonitoringGenerator::with_config(config).generate(&app, out)?;

    println!(
        "Generated {} files in {}",
        report.files_written(),
        report.output_dir().display()
    );
    for file in report.files() {
        println!("  {}", file.display());
    }
    if !report.warnings().is_empty() {
        println!("Warnings:");
        for warning in report.warnings() {
            println!("  - {}", warning);
        }
    }
    Ok(())
}
