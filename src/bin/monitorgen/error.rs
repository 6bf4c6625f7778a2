//! CLI Error types and handling
//!
//! This module defines error types specific to CLI operations.

use monitorgen::GeneratorError;
use std::fmt;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    UnknownCommand(String),
    NoCommand,
    MissingArgument(String),
    /// The application description could not be read.
    InputError {
        path: String,
        message: String,
    },
    ConfigurationError(String),
    GenerationError(GeneratorError),
    LoggerError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnknownCommand(cmd) => {
                write!(f, "Unknown command '{}'. Use --help to see available commands", cmd)
            }
            CliError::NoCommand => {
                write!(f, "No command provided. Use --help to see available commands")
            }
            CliError::MissingArgument(arg) => {
                write!(f, "Missing required argument --{}", arg)
            }
            CliError::InputError { path, message } => {
                write!(f, "Could not read application description {}: {}", path, message)
            }
            CliError::ConfigurationError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CliError::GenerationError(err) => {
                write!(f, "Generation failed: {}", err)
            }
            CliError::LoggerError(msg) => {
                write!(f, "Could not initialize logging: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::GenerationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeneratorError> for CliError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Config(msg) => CliError::ConfigurationError(msg),
            other => CliError::GenerationError(other),
        }
    }
}
