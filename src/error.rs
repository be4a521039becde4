//! Error types for card-edge-footprint configuration.
//!
//! Layout errors live in [`crate::layout::error`]; this module covers
//! everything that can go wrong before a layout is attempted.

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::error::LayoutError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

impl From<LayoutError> for ConfigError {
    fn from(error: LayoutError) -> Self {
        Self::ValidationError {
            message: error.to_string(),
        }
    }
}
