//! Agent tree construction errors.

use thiserror::Error;

/// The agent tree could not be built from the configuration and registry.
#[derive(Debug, Error)]
pub enum AgentBuildError {
    #[error("agent '{agent}' is not configured in [agents]")]
    MissingAgent { agent: String },

    #[error("agent entry '{agent}' has an invalid name")]
    InvalidName { agent: String },

    #[error("agent '{agent}' uses model '{model}', which is not registered")]
    UnknownModel { agent: String, model: String },

    #[error("agent '{agent}' must allow at least one step")]
    NoSteps { agent: String },
}
