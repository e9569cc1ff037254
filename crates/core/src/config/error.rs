//! Error types for configuration loading.
//!
//! Every variant carries the path of the file it concerns so the CLI can
//! point at the offending file.

use crate::parser::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid nested INI.
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    /// The file parsed but does not match the project schema.
    #[error("Invalid project configuration in {path}: {reason}")]
    Deserialize { path: PathBuf, reason: String },

    /// Failed to walk directory structure.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Invalid configuration structure or missing required sections.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Path of the file or directory the error concerns.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConfigError::FileRead { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Deserialize { path, .. }
            | ConfigError::DirectoryWalk { path, .. }
            | ConfigError::InvalidConfig { path, .. } => path,
        }
    }
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
