//! TaskHive model backends.
//!
//! Implements the [`hive::ModelClient`] port and owns the [`ModelRegistry`]
//! that maps logical model names from the `[models]` configuration table to
//! clients.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing,
//! and proxy routing live here. The `agents` crate sees only
//! [`hive::ModelClient`].
//!
//! ## Providers
//!
//! | `provider` | Client | Notes |
//! |------------|--------|-------|
//! | `openai` | [`OpenAiClient`] | Any OpenAI-compatible chat-completions endpoint |
//! | `echo` | [`EchoClient`] | Local, no network; replies with the last user message |

pub mod echo;
pub mod errors;
pub mod openai;
pub mod registry;

pub use echo::EchoClient;
pub use errors::ModelInitError;
pub use openai::OpenAiClient;
pub use registry::ModelRegistry;
