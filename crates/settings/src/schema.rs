//! Typed settings schema.
//!
//! The configuration tree is deserialised into [`Settings`] once, after every
//! override has been merged. Unknown keys are rejected
//! so a misspelt override fails loudly instead of being ignored.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the coordinating root agent in the `[agents]` table.
pub const ROOT_AGENT: &str = "planning_agent";

/// Names of the specialists the root agent must be able to delegate to, in
/// banner order.
pub const SPECIALIST_AGENTS: [&str; 3] = [
    "deep_analyzer_agent",
    "browser_use_agent",
    "deep_researcher_agent",
];

/// Fully resolved process configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Run label; also names the log directory under `workdir`.
    pub tag: String,

    pub workdir: PathBuf,

    /// Explicit log destination. Derived from `workdir` and `tag` when unset.
    pub log_path: Option<PathBuf>,

    /// `tracing` filter directive. `RUST_LOG` takes precedence when set.
    pub log_level: String,

    /// Route every HTTP model client through `local_proxy`.
    pub use_local_proxy: bool,

    pub local_proxy: String,

    /// OTLP collector endpoint (e.g. `http://localhost:4317`). Span export is
    /// disabled when unset.
    pub otlp_endpoint: Option<String>,

    pub models: BTreeMap<String, ModelSettings>,

    pub agents: BTreeMap<String, AgentSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag: "session".to_string(),
            workdir: PathBuf::from("workdir"),
            log_path: None,
            log_level: "info".to_string(),
            use_local_proxy: false,
            local_proxy: "http://127.0.0.1:7890".to_string(),
            otlp_endpoint: None,
            models: BTreeMap::new(),
            agents: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Log destination: `log_path` if set, otherwise `<workdir>/<tag>/log.txt`.
    pub fn log_path(&self) -> PathBuf {
        match &self.log_path {
            Some(path) => path.clone(),
            None => self.workdir.join(&self.tag).join("log.txt"),
        }
    }

    /// Proxy URL to route model traffic through, if enabled.
    pub fn proxy(&self) -> Option<&str> {
        self.use_local_proxy.then_some(self.local_proxy.as_str())
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Backend family of a configured model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-compatible chat-completions endpoint over HTTP.
    Openai,
    /// Local client that answers with the last user message.
    Echo,
}

/// One entry of the `[models]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSettings {
    pub provider: ProviderKind,

    /// Identifier sent to the backend. Defaults to the entry name.
    #[serde(default)]
    pub model_id: Option<String>,

    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// One entry of the `[agents]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSettings {
    /// Name of a `[models]` entry.
    pub model: String,

    #[serde(default)]
    pub description: String,

    /// System instructions sent with every model call.
    #[serde(default)]
    pub instructions: String,

    /// Planning rounds a coordinator may use per task. Ignored by specialists.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

fn default_max_steps() -> u32 {
    8
}
