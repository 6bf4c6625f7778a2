//! Error types for the monitoring generator.
//!
//! Only failures that leave the output tree unusable are errors. Soft problems
//! (an alert without a threshold, an unknown backend language) are resolved
//! with a fallback and surface as warnings on the
//! [`GenerationReport`](crate::monitoring::generator::GenerationReport).
//!
//! # Examples
//! ```
//! use monitorgen::error::GeneratorError;
//!
//! let error = GeneratorError::Config("scrape interval must not be empty".to_string());
//! assert_eq!(
//!     format!("{}", error),
//!     "Configuration error: scrape interval must not be empty"
//! );
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// An output directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated artifact could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A typed document could not be rendered to YAML or JSON.
    #[error("Failed to render {artifact}: {message}")]
    Serialize { artifact: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    pub(crate) fn serialize(artifact: &str, err: impl std::fmt::Display) -> Self {
        GeneratorError::Serialize {
            artifact: artifact.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_write_error_keeps_path_and_source() {
        let err = GeneratorError::WriteFile {
            path: PathBuf::from("out/prometheus/alerts.yml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write out/prometheus/alerts.yml: denied"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::Other, "an I/O error");
        let err: GeneratorError = io_error.into();
        assert_eq!(err.to_string(), "IO error: an I/O error");
    }

    #[test]
    fn test_serialize_error_display() {
        let err = GeneratorError::serialize("grafana/dashboards/app.json", "bad float");
        assert_eq!(
            err.to_string(),
            "Failed to render grafana/dashboards/app.json: bad float"
        );
    }
}
