//! The coordinating root agent.
//!
//! Each planning round asks the coordinator's model for one JSON decision:
//!
//! ```text
//! {"delegate": "deep_researcher_agent", "task": "find recent papers on X"}
//! {"final_answer": "..."}
//! ```
//!
//! A delegation runs the named child and feeds its output (or failure) back as
//! the next user message. A reply that is not a decision object is taken as the
//! final answer.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use hive::{
    Agent, AgentName, AgentRole, ChatMessage, ModelClient, ModelName, Task, TaskExecutionError,
    TaskOutput,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// One parsed planning reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Delegate { agent: String, task: String },
    Final(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecision {
    Delegate { delegate: String, task: String },
    Final { final_answer: String },
}

/// Interprets a model reply. Never fails: anything that is not a decision
/// object is a final answer.
pub fn parse_decision(reply: &str) -> Decision {
    let body = strip_code_fence(reply.trim());
    match serde_json::from_str::<RawDecision>(body) {
        Ok(RawDecision::Delegate { delegate, task }) => Decision::Delegate {
            agent: delegate,
            task,
        },
        Ok(RawDecision::Final { final_answer }) => Decision::Final(final_answer),
        Err(_) => Decision::Final(reply.trim().to_string()),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Root of the agent tree; delegates to its specialist children.
pub struct CoordinatorAgent {
    name: AgentName,
    description: String,
    system_prompt: String,
    max_steps: u32,
    model: Arc<dyn ModelClient>,
    children: Vec<Arc<dyn Agent>>,
}

impl CoordinatorAgent {
    pub fn new(
        name: AgentName,
        description: impl Into<String>,
        instructions: &str,
        max_steps: u32,
        model: Arc<dyn ModelClient>,
        children: Vec<Arc<dyn Agent>>,
    ) -> Self {
        let system_prompt = system_prompt(instructions, &children);
        Self {
            name,
            description: description.into(),
            system_prompt,
            max_steps,
            model,
            children,
        }
    }
}

fn system_prompt(instructions: &str, children: &[Arc<dyn Agent>]) -> String {
    let mut prompt = String::new();
    if !instructions.is_empty() {
        prompt.push_str(instructions);
        prompt.push_str("\n\n");
    }
    prompt.push_str("You coordinate the following agents:\n");
    for child in children {
        let _ = writeln!(prompt, "- {}: {}", child.name(), child.description());
    }
    prompt.push_str(
        "\nReply with exactly one JSON object per turn: \
         {\"delegate\": \"<agent name>\", \"task\": \"<instructions for the agent>\"} \
         to hand work to an agent, or {\"final_answer\": \"<answer>\"} when the task is complete.",
    );
    prompt
}

#[async_trait]
impl Agent for CoordinatorAgent {
    fn name(&self) -> &AgentName {
        &self.name
    }

    fn role(&self) -> AgentRole {
        AgentRole::Coordinator
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn model(&self) -> Option<&ModelName> {
        Some(self.model.name())
    }

    fn children(&self) -> &[Arc<dyn Agent>] {
        &self.children
    }

    #[instrument(skip_all, fields(agent = %self.name, task_id = %task.id()))]
    async fn run(&self, task: &Task) -> Result<TaskOutput, TaskExecutionError> {
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(task.text()),
        ];

        for step in 1..=self.max_steps {
            let reply = self.model.complete(&messages).await?;
            match parse_decision(&reply) {
                Decision::Final(answer) => {
                    info!(step, "coordinator produced final answer");
                    return Ok(TaskOutput::new(answer));
                }
                Decision::Delegate { agent, task: text } => {
                    let child =
                        self.child(&agent)
                            .ok_or_else(|| TaskExecutionError::UnknownAgent {
                                agent: self.name.clone(),
                                requested: agent.clone(),
                            })?;
                    let subtask = task.subtask(text).ok_or_else(|| TaskExecutionError::Agent {
                        agent: self.name.clone(),
                        message: format!("delegation to '{agent}' had an empty task"),
                    })?;
                    info!(step, delegate = %agent, subtask_id = %subtask.id(), "delegating");

                    let observation = match child.run(&subtask).await {
                        Ok(output) => format!("Result from {agent}:\n{output}"),
                        Err(err) => {
                            warn!(delegate = %agent, error = %err, "delegated task failed");
                            format!("{agent} failed: {err}")
                        }
                    };
                    messages.push(ChatMessage::assistant(reply));
                    messages.push(ChatMessage::user(observation));
                }
            }
        }

        Err(TaskExecutionError::StepLimit {
            agent: self.name.clone(),
            max_steps: self.max_steps,
        })
    }
}
