//! Shared value types for the TaskHive domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. a [`Task`] is never blank) and flow
//! through the dispatch path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TaskId;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// A unit of work entered by the user and handed to the root agent.
///
/// The text is trimmed on construction and is never empty. Tasks are not
/// persisted; one exists for the duration of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    text: String,
}

impl Task {
    /// Creates a [`Task`] with a fresh [`TaskId`].
    ///
    /// Returns `None` if `text` is empty after trimming.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                id: TaskId::new_random(),
                text: trimmed.to_string(),
            })
        }
    }

    /// Creates a sub-task that a coordinator hands to one of its children.
    ///
    /// The sub-task gets its own [`TaskId`]; blank text is rejected.
    pub fn subtask(&self, text: impl Into<String>) -> Option<Self> {
        Self::new(text)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

// ---------------------------------------------------------------------------

/// The successful result of running a [`Task`] against an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput(String);

impl TaskOutput {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Agent roles
// ---------------------------------------------------------------------------

/// Capability role of a node in the agent tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Receives the user's task and delegates to its children.
    Coordinator,
    /// A leaf with a fixed capability (analysis, browser automation, research).
    Specialist,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Coordinator => write!(f, "coordinator"),
            AgentRole::Specialist => write!(f, "specialist"),
        }
    }
}

// ---------------------------------------------------------------------------
// Model conversation messages
// ---------------------------------------------------------------------------

/// Author of a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One message of a model conversation.
///
/// Serialises to the `{"role": ..., "content": ...}` shape used by
/// chat-completions APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_text_is_trimmed() {
        let task = Task::new("  compute \n").expect("task");
        assert_eq!(task.text(), "compute");
    }

    #[test]
    fn blank_task_is_rejected() {
        assert!(Task::new("").is_none());
        assert!(Task::new(" \t ").is_none());
    }

    #[test]
    fn subtask_gets_fresh_id() {
        let task = Task::new("parent").expect("task");
        let sub = task.subtask("child").expect("subtask");
        assert_ne!(task.id(), sub.id());
        assert_eq!(sub.text(), "child");
    }

    #[test]
    fn agent_role_display() {
        assert_eq!(AgentRole::Coordinator.to_string(), "coordinator");
        assert_eq!(AgentRole::Specialist.to_string(), "specialist");
    }
}
