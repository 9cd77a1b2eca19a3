//! Task-level error types for the TaskHive domain.
//!
//! [`TaskExecutionError`] is the only error kind the interactive session
//! recovers from: it is returned by [`crate::Agent::run`], reported, and the
//! session continues. Start-up errors (configuration, logging, model
//! registration, tree construction) are defined in their respective crates
//! and are always fatal.

use thiserror::Error;

use crate::{AgentName, ModelName};

// ---------------------------------------------------------------------------
// Model call errors
// ---------------------------------------------------------------------------

/// Errors produced by a [`crate::ModelClient`] while serving one request.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("request to model '{model}' failed: {message}")]
    Transport {
        model: ModelName,
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("model '{model}' returned status {status}: {body}")]
    Status {
        model: ModelName,
        status: u16,
        /// Response body, as returned by the backend.
        body: String,
    },

    /// The backend answered but the payload had no usable completion.
    #[error("model '{model}' returned an unusable response: {message}")]
    InvalidResponse {
        model: ModelName,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Task execution errors
// ---------------------------------------------------------------------------

/// Errors surfaced by a single dispatched task.
///
/// None of these invalidate the configuration, the model registry, or the
/// agent tree; the next task runs against the same state.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    /// A model call made on behalf of the task failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A coordinator ran out of planning rounds without a final answer.
    #[error("agent '{agent}' reached its limit of {max_steps} steps without a final answer")]
    StepLimit { agent: AgentName, max_steps: u32 },

    /// A coordinator delegated to a name that is not one of its children.
    #[error("agent '{agent}' has no subordinate named '{requested}'")]
    UnknownAgent { agent: AgentName, requested: String },

    /// The task panicked; the panic was contained at the dispatch boundary.
    #[error("task panicked: {message}")]
    Panicked { message: String },

    /// Any other agent-reported failure.
    #[error("agent '{agent}' failed: {message}")]
    Agent { agent: AgentName, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelName {
        ModelName::new("gpt").expect("model name")
    }

    #[test]
    fn model_error_is_transparent_in_task_error() {
        let err: TaskExecutionError = ModelError::Status {
            model: model(),
            status: 429,
            body: "slow down".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "model 'gpt' returned status 429: slow down");
    }

    #[test]
    fn step_limit_names_agent() {
        let err = TaskExecutionError::StepLimit {
            agent: AgentName::new("planning_agent").expect("name"),
            max_steps: 3,
        };
        assert!(err.to_string().contains("planning_agent"));
        assert!(err.to_string().contains('3'));
    }
}
