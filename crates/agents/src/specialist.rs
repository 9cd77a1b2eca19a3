//! Specialist agents: leaves of the tree with one fixed capability.

use std::sync::Arc;

use async_trait::async_trait;
use hive::{
    Agent, AgentName, AgentRole, ChatMessage, ModelClient, ModelName, Task, TaskExecutionError,
    TaskOutput,
};
use tracing::{debug, instrument};

/// A leaf agent that answers a task with a single model call.
pub struct SpecialistAgent {
    name: AgentName,
    description: String,
    instructions: String,
    model: Arc<dyn ModelClient>,
}

impl SpecialistAgent {
    pub fn new(
        name: AgentName,
        description: impl Into<String>,
        instructions: impl Into<String>,
        model: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            name,
            description: description.into(),
            instructions: instructions.into(),
            model,
        }
    }
}

#[async_trait]
impl Agent for SpecialistAgent {
    fn name(&self) -> &AgentName {
        &self.name
    }

    fn role(&self) -> AgentRole {
        AgentRole::Specialist
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn model(&self) -> Option<&ModelName> {
        Some(self.model.name())
    }

    fn children(&self) -> &[Arc<dyn Agent>] {
        &[]
    }

    #[instrument(skip_all, fields(agent = %self.name, task_id = %task.id()))]
    async fn run(&self, task: &Task) -> Result<TaskOutput, TaskExecutionError> {
        let mut messages = Vec::with_capacity(2);
        if !self.instructions.is_empty() {
            messages.push(ChatMessage::system(self.instructions.as_str()));
        }
        messages.push(ChatMessage::user(task.text()));

        let reply = self.model.complete(&messages).await?;
        debug!(chars = reply.len(), "specialist finished");
        Ok(TaskOutput::new(reply))
    }
}
