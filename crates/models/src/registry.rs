//! The model registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use hive::{ModelClient, ModelName};
use settings::{ModelSettings, ProviderKind, Settings};
use tracing::{debug, info};

use crate::{EchoClient, ModelInitError, OpenAiClient};

/// Logical model name → invocable client.
///
/// Populated once from configuration; shared read-only behind an `Arc` after
/// agent construction. Agents hold clones of the client `Arc`s they use, never
/// the registry itself.
#[derive(Default)]
pub struct ModelRegistry {
    clients: BTreeMap<ModelName, Arc<dyn ModelClient>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every `[models]` entry, routing HTTP clients through the local
    /// proxy when `use_local_proxy` is set.
    pub fn init(settings: &Settings) -> Result<Self, ModelInitError> {
        Self::from_entries(&settings.models, settings.proxy())
    }

    pub fn from_entries(
        entries: &BTreeMap<String, ModelSettings>,
        proxy: Option<&str>,
    ) -> Result<Self, ModelInitError> {
        let mut registry = Self::new();
        if let Some(proxy) = proxy {
            info!(proxy, "routing model traffic through local proxy");
        }
        for (raw_name, entry) in entries {
            let name = ModelName::new(raw_name.as_str()).ok_or_else(|| {
                ModelInitError::InvalidName {
                    model: raw_name.clone(),
                }
            })?;
            let client: Arc<dyn ModelClient> = match entry.provider {
                ProviderKind::Openai => Arc::new(OpenAiClient::new(name, entry, proxy)?),
                ProviderKind::Echo => Arc::new(EchoClient::new(name)),
            };
            registry.register(client)?;
        }
        Ok(registry)
    }

    /// Adds one client under its own name.
    pub fn register(&mut self, client: Arc<dyn ModelClient>) -> Result<(), ModelInitError> {
        let name = client.name().clone();
        if self.clients.contains_key(&name) {
            return Err(ModelInitError::Duplicate {
                model: name.to_string(),
            });
        }
        debug!(model = %name, "registered model");
        self.clients.insert(name, client);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ModelClient>> {
        let name = ModelName::new(name)?;
        self.clients.get(&name).cloned()
    }

    /// Registered names in sorted order.
    pub fn registered_names(&self) -> Vec<&ModelName> {
        self.clients.keys().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.registered_names())
            .finish()
    }
}
