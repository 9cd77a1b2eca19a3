//! The model backend port.

use async_trait::async_trait;

use crate::{ChatMessage, ModelError, ModelName};

/// An invocable model backend held by the model registry.
///
/// Implementations live in the `models` crate. Agents hold `Arc`s to the
/// clients they use; the registry keeps ownership of the full set.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Logical name under which the client is registered.
    fn name(&self) -> &ModelName;

    /// Sends one conversation and returns the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError>;
}
