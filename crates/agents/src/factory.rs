//! Builds the agent tree from settings and the model registry.

use std::sync::Arc;

use hive::{Agent, AgentName, ModelClient};
use models::ModelRegistry;
use settings::{AgentSettings, Settings, ROOT_AGENT, SPECIALIST_AGENTS};
use tracing::info;

use crate::{AgentBuildError, CoordinatorAgent, SpecialistAgent};

/// Constructs the fixed agent tree: the coordinating root with the required
/// specialists, followed by any further `[agents]` entries as extra
/// specialists in name order.
pub struct AgentFactory<'a> {
    settings: &'a Settings,
    registry: &'a ModelRegistry,
}

impl<'a> AgentFactory<'a> {
    pub fn new(settings: &'a Settings, registry: &'a ModelRegistry) -> Self {
        Self { settings, registry }
    }

    /// Builds the tree and returns its root.
    pub async fn create(&self) -> Result<Arc<dyn Agent>, AgentBuildError> {
        let root_settings = self.entry(ROOT_AGENT)?;

        let mut children: Vec<Arc<dyn Agent>> = Vec::new();
        for name in SPECIALIST_AGENTS {
            children.push(self.specialist(name, self.entry(name)?)?);
        }
        for (name, entry) in &self.settings.agents {
            if name == ROOT_AGENT || SPECIALIST_AGENTS.contains(&name.as_str()) {
                continue;
            }
            children.push(self.specialist(name, entry)?);
        }

        if root_settings.max_steps == 0 {
            return Err(AgentBuildError::NoSteps {
                agent: ROOT_AGENT.to_string(),
            });
        }
        let root = CoordinatorAgent::new(
            agent_name(ROOT_AGENT)?,
            root_settings.description.as_str(),
            &root_settings.instructions,
            root_settings.max_steps,
            self.model_for(ROOT_AGENT, root_settings)?,
            children,
        );
        info!(
            root = ROOT_AGENT,
            children = root.children().len(),
            "agent tree built"
        );
        Ok(Arc::new(root))
    }

    fn entry(&self, name: &str) -> Result<&'a AgentSettings, AgentBuildError> {
        self.settings
            .agents
            .get(name)
            .ok_or_else(|| AgentBuildError::MissingAgent {
                agent: name.to_string(),
            })
    }

    fn specialist(
        &self,
        name: &str,
        entry: &AgentSettings,
    ) -> Result<Arc<dyn Agent>, AgentBuildError> {
        Ok(Arc::new(SpecialistAgent::new(
            agent_name(name)?,
            entry.description.as_str(),
            entry.instructions.as_str(),
            self.model_for(name, entry)?,
        )))
    }

    fn model_for(
        &self,
        agent: &str,
        entry: &AgentSettings,
    ) -> Result<Arc<dyn ModelClient>, AgentBuildError> {
        self.registry
            .get(&entry.model)
            .ok_or_else(|| AgentBuildError::UnknownModel {
                agent: agent.to_string(),
                model: entry.model.clone(),
            })
    }
}

fn agent_name(name: &str) -> Result<AgentName, AgentBuildError> {
    AgentName::new(name).ok_or_else(|| AgentBuildError::InvalidName {
        agent: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use hive::{AgentRole, Task};
    use models::EchoClient;

    fn agent_entry(model: &str) -> AgentSettings {
        AgentSettings {
            model: model.to_string(),
            description: String::new(),
            instructions: String::new(),
            max_steps: 3,
        }
    }

    fn settings_with(extra: &[&str]) -> Settings {
        let mut agents = BTreeMap::new();
        agents.insert(ROOT_AGENT.to_string(), agent_entry("echo"));
        for name in SPECIALIST_AGENTS.iter().chain(extra) {
            agents.insert(name.to_string(), agent_entry("echo"));
        }
        Settings {
            agents,
            ..Settings::default()
        }
    }

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry
            .register(Arc::new(EchoClient::new(
                hive::ModelName::new("echo").expect("name"),
            )))
            .expect("register");
        registry
    }

    fn child_names(root: &dyn Agent) -> Vec<String> {
        root.children()
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    }

    #[tokio::test]
    async fn builds_root_with_required_specialists() {
        let settings = settings_with(&[]);
        let registry = registry();
        let root = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .expect("create");

        assert_eq!(root.name().as_str(), ROOT_AGENT);
        assert_eq!(root.role(), AgentRole::Coordinator);
        assert_eq!(child_names(root.as_ref()), SPECIALIST_AGENTS);
        assert!(root
            .children()
            .iter()
            .all(|child| child.role() == AgentRole::Specialist));
    }

    #[tokio::test]
    async fn extra_agents_follow_required_ones() {
        let settings = settings_with(&["code_agent"]);
        let registry = registry();
        let root = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .expect("create");
        assert_eq!(
            child_names(root.as_ref()).last().map(String::as_str),
            Some("code_agent")
        );
        assert_eq!(root.children().len(), 4);
    }

    #[tokio::test]
    async fn missing_specialist_fails() {
        let mut settings = settings_with(&[]);
        settings.agents.remove("browser_use_agent");
        let registry = registry();
        let err = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .err()
            .expect("missing");
        assert!(matches!(err, AgentBuildError::MissingAgent { agent } if agent == "browser_use_agent"));
    }

    #[tokio::test]
    async fn unregistered_model_fails() {
        let mut settings = settings_with(&[]);
        settings
            .agents
            .insert("deep_analyzer_agent".to_string(), agent_entry("missing"));
        let registry = registry();
        let err = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .err()
            .expect("unknown model");
        assert!(matches!(
            err,
            AgentBuildError::UnknownModel { ref agent, ref model }
                if agent == "deep_analyzer_agent" && model == "missing"
        ));
    }

    #[tokio::test]
    async fn zero_steps_fails() {
        let mut settings = settings_with(&[]);
        if let Some(root) = settings.agents.get_mut(ROOT_AGENT) {
            root.max_steps = 0;
        }
        let registry = registry();
        let err = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .err()
            .expect("no steps");
        assert!(matches!(err, AgentBuildError::NoSteps { .. }));
    }

    #[tokio::test]
    async fn echo_tree_answers_with_task_text() {
        let settings = settings_with(&[]);
        let registry = registry();
        let root = AgentFactory::new(&settings, &registry)
            .create()
            .await
            .expect("create");
        let out = root
            .run(&Task::new("compute").expect("task"))
            .await
            .expect("run");
        assert_eq!(out.as_str(), "compute");
    }
}
