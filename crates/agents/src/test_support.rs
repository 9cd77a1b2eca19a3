//! Test-only model client with scripted replies.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use hive::{ChatMessage, ModelClient, ModelError, ModelName};

/// Returns queued replies in order and records every conversation it receives.
///
/// `Err(message)` entries become [`ModelError::Transport`]. Once the queue is
/// empty every call fails.
pub struct ScriptedModel {
    name: ModelName,
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new(name: &str, replies: Vec<Result<String, String>>) -> Self {
        Self {
            name: ModelName::new(name).expect("model name"),
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    fn name(&self) -> &ModelName {
        &self.name
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(messages.to_vec());
        let next = self.replies.lock().expect("replies lock").pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ModelError::Transport {
                model: self.name.clone(),
                message,
            }),
            None => Err(ModelError::Transport {
                model: self.name.clone(),
                message: "script exhausted".to_string(),
            }),
        }
    }
}
