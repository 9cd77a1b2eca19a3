//! Local echo backend.

use async_trait::async_trait;
use hive::{ChatMessage, MessageRole, ModelClient, ModelError, ModelName};

/// Answers every conversation with its last user message.
///
/// Needs no network or credentials, so it backs offline runs and tests.
#[derive(Debug, Clone)]
pub struct EchoClient {
    name: ModelName,
}

impl EchoClient {
    pub fn new(name: ModelName) -> Self {
        Self { name }
    }
}

#[async_trait]
impl ModelClient for EchoClient {
    fn name(&self) -> &ModelName {
        &self.name
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        Ok(messages
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_last_user_message() {
        let client = EchoClient::new(ModelName::new("echo").expect("name"));
        let reply = client
            .complete(&[
                ChatMessage::system("be brief"),
                ChatMessage::user("first"),
                ChatMessage::assistant("ack"),
                ChatMessage::user("second"),
            ])
            .await
            .expect("complete");
        assert_eq!(reply, "second");
    }

    #[tokio::test]
    async fn empty_conversation_yields_empty_reply() {
        let client = EchoClient::new(ModelName::new("echo").expect("name"));
        assert_eq!(client.complete(&[]).await.expect("complete"), "");
    }
}
