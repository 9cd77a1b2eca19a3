//! Core domain for TaskHive.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, port trait, and task-level error type used by the agent tree and the
//! interactive session. Infrastructure crates implement the traits defined
//! here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* an agent or a model backend must offer; the `models` and
//! `agents` crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`AgentName`, `ModelName`, `SessionId`, `TaskId`) |
//! | [`types`] | Shared value types (`Task`, `TaskOutput`, `AgentRole`, `ChatMessage`, etc.) |
//! | [`errors`] | Task execution and model call errors |
//! | [`agent`] | The [`Agent`] port |
//! | [`model`] | The [`ModelClient`] port |
//! | [`tree`] | Text rendering of an agent tree |

pub mod agent;
pub mod errors;
pub mod identifiers;
pub mod model;
pub mod tree;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use agent::Agent;
pub use errors::{ModelError, TaskExecutionError};
pub use identifiers::{AgentName, ModelName, SessionId, TaskId};
pub use model::ModelClient;
pub use tree::render_tree;
pub use types::{AgentRole, ChatMessage, MessageRole, Task, TaskOutput, Timestamp};
