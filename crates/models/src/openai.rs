//! OpenAI-compatible chat-completions backend.
//!
//! Works against any server exposing `POST {api_base}/chat/completions` with
//! the OpenAI request/response shape (OpenAI, vLLM, LiteLLM, Ollama's
//! compatibility endpoint).

use std::time::Duration;

use async_trait::async_trait;
use hive::{ChatMessage, ModelClient, ModelError, ModelName};
use serde::{Deserialize, Serialize};
use settings::ModelSettings;
use tracing::{debug, instrument};

use crate::ModelInitError;

/// Used when a model entry has no `api_base`.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    name: ModelName,
    model_id: String,
    endpoint: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Builds a client for one `[models]` entry.
    ///
    /// The API key is read from `api_key_env` now, so a missing key fails
    /// start-up instead of the first task. `proxy` routes all traffic through
    /// the given URL.
    pub fn new(
        name: ModelName,
        settings: &ModelSettings,
        proxy: Option<&str>,
    ) -> Result<Self, ModelInitError> {
        let api_key = match &settings.api_key_env {
            Some(var) => Some(std::env::var(var).map_err(|_| ModelInitError::MissingApiKey {
                model: name.to_string(),
                var: var.clone(),
            })?),
            None => None,
        };

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(settings.timeout_secs));
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|err| ModelInitError::InvalidProxy {
                model: name.to_string(),
                proxy: proxy.to_string(),
                message: err.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build().map_err(|err| ModelInitError::Client {
            model: name.to_string(),
            message: err.to_string(),
        })?;

        let api_base = settings.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        Ok(Self {
            model_id: settings
                .model_id
                .clone()
                .unwrap_or_else(|| name.to_string()),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key,
            http,
            name,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &ModelName {
        &self.name
    }

    #[instrument(skip(self, messages), fields(model = %self.name, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let mut request = self.http.post(&self.endpoint).json(&ChatRequest {
            model: &self.model_id,
            messages,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|err| ModelError::Transport {
            model: self.name.clone(),
            message: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                model: self.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|err| ModelError::InvalidResponse {
                    model: self.name.clone(),
                    message: err.to_string(),
                })?;
        debug!(choices = parsed.choices.len(), "chat completion received");

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::InvalidResponse {
                model: self.name.clone(),
                message: "response contained no message content".to_string(),
            })
    }
}
