//! Start-up and session errors for the composition root.

use std::io;
use std::path::PathBuf;

use agents::AgentBuildError;
use models::ModelInitError;
use settings::{ConfigError, UsageError};
use thiserror::Error;

use crate::exit_codes;

/// The process-wide logger could not be initialised.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    /// The directory holding the log file could not be created.
    #[error("cannot create log directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be opened for appending.
    #[error("cannot open log file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `log_level` is not a valid filter directive.
    #[error("invalid log filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    /// The OTLP span exporter could not be built.
    #[error("cannot build OTLP exporter for '{endpoint}': {message}")]
    Exporter { endpoint: String, message: String },

    /// A global subscriber was already installed in this process.
    #[error("tracing subscriber already installed: {message}")]
    AlreadyInstalled { message: String },
}

/// Any failure before the interactive loop starts. Each variant is fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerInitError),

    #[error(transparent)]
    Model(#[from] ModelInitError),

    #[error(transparent)]
    Agent(#[from] AgentBuildError),
}

impl StartupError {
    /// Non-zero process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => exit_codes::USAGE,
            Self::Config(_) => exit_codes::CONFIG,
            Self::Logger(_) => exit_codes::LOGGER,
            Self::Model(_) => exit_codes::MODEL,
            Self::Agent(_) => exit_codes::AGENT,
        }
    }

    /// Short label of the stage that failed, used in the diagnostic line.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Usage(_) => "usage",
            Self::Config(_) => "config",
            Self::Logger(_) => "logger",
            Self::Model(_) => "model registry",
            Self::Agent(_) => "agent factory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let errors = [
            StartupError::from(UsageError::EmptyKey {
                expr: "=1".to_string(),
            }),
            StartupError::from(ConfigError::Schema {
                path: PathBuf::from("c.toml"),
                message: "bad".to_string(),
            }),
            StartupError::from(LoggerInitError::AlreadyInstalled {
                message: "twice".to_string(),
            }),
            StartupError::from(ModelInitError::Duplicate {
                model: "A".to_string(),
            }),
            StartupError::from(AgentBuildError::MissingAgent {
                agent: "planning_agent".to_string(),
            }),
        ];
        let mut codes: Vec<i32> = errors.iter().map(StartupError::exit_code).collect();
        assert!(codes.iter().all(|code| *code != exit_codes::OK));
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn display_is_transparent() {
        let err = StartupError::from(AgentBuildError::MissingAgent {
            agent: "browser_use_agent".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "agent 'browser_use_agent' is not configured in [agents]"
        );
        assert_eq!(err.stage(), "agent factory");
    }
}
