pub mod generate;
pub mod plan;

pub use generate::handle_generate_command;
pub use plan::handle_plan_command;

use crate::error::{CliError, CliResult};
use clap::ArgMatches;
use monitorgen::config::{GeneratorConfig, load_application_from_path, load_config_from_path};
use monitorgen::model::Application;
use std::path::Path;

pub(crate) fn required<'a>(matches: &'a ArgMatches, name: &str) -> CliResult<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| CliError::MissingArgument(name.to_string()))
}

pub(crate) fn load_application(matches: &ArgMatches) -> CliResult<Application> {
    let path = required(matches, "app")?;
    load_application_from_path(Path::new(path)).map_err(|err| CliError::InputError {
        path: path.to_string(),
        message: err.to_string(),
    })
}

pub(crate) fn load_config(matches: &ArgMatches) -> CliResult<GeneratorConfig> {
    match matches.value_of("config") {
        Some(path) => Ok(load_config_from_path(Path::new(path))?),
        None => Ok(GeneratorConfig::default()),
    }
}
