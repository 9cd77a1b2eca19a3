//! Error types for argument parsing and configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

/// A `key=value` override expression could not be parsed.
///
/// Raised while parsing command-line arguments, before any file is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("override '{expr}' is missing '=' (expected key=value)")]
    MissingSeparator { expr: String },

    #[error("override '{expr}' has an empty key segment")]
    EmptyKey { expr: String },

    #[error("override '{expr}' has no value")]
    MissingValue { expr: String },

    #[error("override '{expr}' contains whitespace; quote the value and remove the spaces")]
    Whitespace { expr: String },

    #[error("override '{expr}' has unbalanced brackets")]
    Unbalanced { expr: String },

    #[error("override '{expr}' has an empty list element")]
    EmptyElement { expr: String },
}

/// The configuration could not be loaded or an override could not be merged.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The base file parsed but does not match the settings schema.
    #[error("configuration file {path} is invalid: {message}")]
    Schema { path: PathBuf, message: String },

    /// An override could not be merged, or left the settings invalid.
    #[error("cannot apply override '{key}': {reason}")]
    Override { key: String, reason: String },
}

impl ConfigError {
    /// Returns `true` for errors caused by a command-line override rather than
    /// the base file.
    pub fn is_override(&self) -> bool {
        matches!(self, ConfigError::Override { .. })
    }
}
