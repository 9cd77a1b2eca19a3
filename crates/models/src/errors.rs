//! Model registration errors.

use thiserror::Error;

/// A configured model entry could not be turned into a client.
///
/// Every variant names the offending `[models]` entry. Registration errors are
/// fatal: the process exits before any agent is built.
#[derive(Debug, Error)]
pub enum ModelInitError {
    #[error("model entry '{model}' has an invalid name")]
    InvalidName { model: String },

    #[error("model '{model}' is registered twice")]
    Duplicate { model: String },

    #[error("model '{model}': environment variable {var} holding the API key is not set")]
    MissingApiKey { model: String, var: String },

    #[error("model '{model}': invalid proxy '{proxy}': {message}")]
    InvalidProxy {
        model: String,
        proxy: String,
        message: String,
    },

    #[error("model '{model}': failed to build HTTP client: {message}")]
    Client { model: String, message: String },
}

impl ModelInitError {
    /// Name of the model entry that failed.
    pub fn model(&self) -> &str {
        match self {
            ModelInitError::InvalidName { model }
            | ModelInitError::Duplicate { model }
            | ModelInitError::MissingApiKey { model, .. }
            | ModelInitError::InvalidProxy { model, .. }
            | ModelInitError::Client { model, .. } => model,
        }
    }
}
