use clap::{App, Arg, ArgMatches, SubCommand};
use simplelog::{Config, LevelFilter, TermLogger, TerminalMode};

mod commands;
mod error;

use commands::*;
use error::{CliError, CliResult};

fn app_arg() -> Arg<'static> {
    Arg::new("app")
        .short('a')
        .long("app")
        .value_name("FILE")
        .help("Application description (.json, .yaml or .yml)")
        .takes_value(true)
        .required(true)
}

fn config_arg() -> Arg<'static> {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Generator configuration (.json, .yaml or .yml)")
        .takes_value(true)
}

fn cli() -> App<'static> {
    App::new("monitorgen")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Kenny (Miller) Song")
        .about("Generates monitoring configuration and instrumentation from monitoring rules")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Enables debug logging"),
        )
        .subcommand(
            SubCommand::with_name("generate")
                .about("Write the monitoring stack and instrumentation")
                .arg(app_arg())
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .value_name("DIR")
                        .help("Output directory")
                        .takes_value(true)
                        .required(true),
                )
                .arg(config_arg()),
        )
        .subcommand(
            SubCommand::with_name("plan")
                .about("Print the classification and queries without writing files")
                .arg(app_arg())
                .arg(config_arg()),
        )
}

fn init_logging(matches: &ArgMatches) -> CliResult<()> {
    let level = if matches.is_present("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr)
        .map_err(|e| CliError::LoggerError(e.to_string()))
}

fn run(matches: &ArgMatches) -> CliResult<()> {
    init_logging(matches)?;
    match matches.subcommand() {
        Some(("generate", sub_matches)) => handle_generate_command(sub_matches),
        Some(("plan", sub_matches)) => handle_plan_command(sub_matches),
        Some((cmd, _)) => Err(CliError::UnknownCommand(cmd.to_string())),
        None => Err(CliError::NoCommand),
    }
}

fn main() {
    let matches = cli().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
