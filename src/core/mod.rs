use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command::RegistrationError;

/// Error types for the cmdtree process wiring.
///
/// Covers configuration loading and command registration at startup.
/// Errors of a single invocation are [`CommandError`](crate::command::CommandError)s
/// and never reach this type.
#[derive(Error, Debug)]
pub enum CmdTreeError {
    /// Configuration could not be created or is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Command tree construction failed
    #[error("command registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// A background service stopped
    #[error("service '{service}' is unavailable: {details}")]
    ServiceUnavailable {
        /// Name of the service
        service: String,
        /// What went wrong
        details: String,
    },
}

/// A specialized `Result` type for cmdtree operations.
pub type Result<T> = std::result::Result<T, CmdTreeError>;

impl CmdTreeError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        CmdTreeError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }
}
