/*!
 * Error types for the subclean application.
 *
 * The cleaning pipeline itself cannot fail; these errors cover reading
 * subtitles and loading configuration, using the thiserror crate for
 * ergonomic error definitions. The controller and binary wrap them in
 * anyhow with context.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading subtitle data
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestamp(String),

    /// The content held no usable cue
    #[error("No valid subtitle entries were found in the SRT content")]
    NoEntries,

    /// The subtitle file could not be read
    #[error("Failed to read subtitle file {path:?}: {message}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error message
        message: String,
    },
}

/// Errors in configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file is not valid JSON for `Config`
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value is present but not acceptable
    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
