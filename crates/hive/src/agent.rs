//! The agent port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{AgentName, AgentRole, ModelName, Task, TaskExecutionError, TaskOutput};

/// A node in the agent tree.
///
/// The tree is built once at start-up and never mutated afterwards. Parents own
/// their children; every agent only borrows model clients from the registry.
///
/// [`Agent::run`] returns a typed result instead of unwinding: the dispatcher
/// pattern-matches on it and keeps the session alive on `Err`.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &AgentName;

    fn role(&self) -> AgentRole;

    /// One-line capability summary shown to coordinators and in the tree view.
    fn description(&self) -> &str;

    /// Model this agent calls, if any.
    fn model(&self) -> Option<&ModelName>;

    fn children(&self) -> &[Arc<dyn Agent>];

    /// Looks up a direct child by name.
    fn child(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.children()
            .iter()
            .find(|child| child.name().as_str() == name)
            .cloned()
    }

    async fn run(&self, task: &Task) -> Result<TaskOutput, TaskExecutionError>;
}
