//! Interactive dispatch loop.
//!
//! ```text
//! AwaitingInput --task--> Dispatching --> Reporting --> AwaitingInput
//!       |  ^
//!       |  +-- empty line (re-prompt)
//!       +-- quit token / end of input --> Terminated
//! ```
//!
//! Exactly one task is in flight at a time. The task runs on its own tokio
//! task so that a panic inside an agent surfaces as
//! [`TaskExecutionError::Panicked`] instead of unwinding through the loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use hive::{Agent, SessionId, Task, TaskExecutionError, TaskOutput};
use tokio::task::JoinError;
use tracing::{error, info, info_span, Instrument};

/// Case-insensitive commands that end the session.
pub const QUIT_TOKENS: [&str; 3] = ["quit", "exit", "q"];

const PROMPT: &str = "> ";
const BANNER_RULE_WIDTH: usize = 60;
const TASK_RULE_WIDTH: usize = 50;

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Empty,
    Run(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if QUIT_TOKENS
            .iter()
            .any(|token| text.eq_ignore_ascii_case(token))
        {
            Self::Quit
        } else if text.is_empty() {
            Self::Empty
        } else {
            Self::Run(text.to_string())
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
}

/// Outcome counts for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// What [`Dispatcher::run`] returns once the loop terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub end: SessionEnd,
    pub summary: SessionSummary,
}

/// Reads tasks from `input`, runs them against the root agent, and writes the
/// framed results to `output`.
pub struct Dispatcher<R, W> {
    root: Arc<dyn Agent>,
    session_id: SessionId,
    input: Option<R>,
    output: W,
    summary: SessionSummary,
}

impl<R, W> Dispatcher<R, W>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    pub fn new(root: Arc<dyn Agent>, input: R, output: W) -> Self {
        Self {
            root,
            session_id: SessionId::new_random(),
            input: Some(input),
            output,
            summary: SessionSummary::default(),
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Runs until a quit token or end of input.
    ///
    /// Task failures are reported and counted; only I/O errors on the
    /// interactive surface end the loop early.
    pub async fn run(&mut self) -> io::Result<SessionReport> {
        info!(session_id = %self.session_id, root = %self.root.name(), "interactive session started");
        self.print_banner()?;

        let end = loop {
            write!(self.output, "\n{PROMPT}")?;
            self.output.flush()?;

            let Some(line) = self.read_line().await? else {
                writeln!(self.output, "\nGoodbye!")?;
                break SessionEnd::EndOfInput;
            };

            match Command::parse(&line) {
                Command::Quit => {
                    writeln!(self.output, "Goodbye!")?;
                    break SessionEnd::Quit;
                }
                Command::Empty => {
                    writeln!(self.output, "Please enter a task.")?;
                }
                Command::Run(text) => {
                    self.dispatch(text).await?;
                    writeln!(self.output, "\nEnter your next task (or 'quit' to exit):")?;
                }
            }
        };
        self.output.flush()?;

        info!(
            session_id = %self.session_id,
            succeeded = self.summary.succeeded,
            failed = self.summary.failed,
            end = ?end,
            "interactive session ended"
        );
        Ok(SessionReport {
            session_id: self.session_id,
            end,
            summary: self.summary,
        })
    }

    fn print_banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(BANNER_RULE_WIDTH);
        let agents: Vec<&str> = self
            .root
            .children()
            .iter()
            .map(|child| child.name().as_str())
            .collect();
        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "TaskHive - Hierarchical Agent Interactive Mode")?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "Available agents: {}", agents.join(", "))?;
        writeln!(self.output, "Enter your task (or 'quit' to exit):")?;
        Ok(())
    }

    /// Reads one line off the runtime. `None` at end of input.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let Some(mut input) = self.input.take() else {
            return Ok(None);
        };
        let (input, result) = tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            let result = input
                .read_line(&mut line)
                .map(|read| (read > 0).then_some(line));
            (input, result)
        })
        .await
        .map_err(io::Error::other)?;
        self.input = Some(input);
        result
    }

    /// Frames, runs, and reports one task.
    async fn dispatch(&mut self, text: String) -> io::Result<()> {
        let Some(task) = Task::new(text) else {
            return Ok(());
        };
        let rule = "-".repeat(TASK_RULE_WIDTH);
        writeln!(self.output, "\nProcessing task: {}", task.text())?;
        writeln!(self.output, "{rule}")?;
        self.output.flush()?;

        let span = info_span!("task", session_id = %self.session_id, task_id = %task.id());
        let outcome = run_isolated(Arc::clone(&self.root), task)
            .instrument(span.clone())
            .await;

        match outcome {
            Ok(output) => {
                self.summary.succeeded += 1;
                writeln!(self.output, "{rule}")?;
                writeln!(self.output, "Final Result: {output}")?;
                span.in_scope(|| info!(result = %output, "task finished"));
            }
            Err(err) => {
                self.summary.failed += 1;
                writeln!(self.output, "Error processing task: {err}")?;
                span.in_scope(|| error!(error = %err, "error processing task"));
            }
        }
        Ok(())
    }
}

/// Runs `task` on its own tokio task; a panic becomes a task error.
async fn run_isolated(
    root: Arc<dyn Agent>,
    task: Task,
) -> Result<TaskOutput, TaskExecutionError> {
    let handle = tokio::spawn(async move { root.run(&task).await }.in_current_span());
    match handle.await {
        Ok(result) => result,
        Err(err) => Err(TaskExecutionError::Panicked {
            message: panic_message(err),
        }),
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use hive::{AgentName, AgentRole, ModelName};

    use super::*;

    /// Root agent stub: "boom" fails, "panic" panics, anything else maps
    /// through a fixed answer table or echoes.
    struct StubAgent {
        name: AgentName,
        calls: AtomicUsize,
    }

    impl StubAgent {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                name: AgentName::new("planning_agent").expect("name"),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Agent for StubAgent {
        fn name(&self) -> &AgentName {
            &self.name
        }

        fn role(&self) -> AgentRole {
            AgentRole::Coordinator
        }

        fn description(&self) -> &str {
            "stub"
        }

        fn model(&self) -> Option<&ModelName> {
            None
        }

        fn children(&self) -> &[Arc<dyn Agent>] {
            &[]
        }

        async fn run(&self, task: &Task) -> Result<TaskOutput, TaskExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match task.text() {
                "compute" => Ok(TaskOutput::new("42")),
                "status" => Ok(TaskOutput::new("ok")),
                "boom" => Err(TaskExecutionError::Agent {
                    agent: self.name.clone(),
                    message: "kaboom".to_string(),
                }),
                "panic" => panic!("agent exploded"),
                other => Ok(TaskOutput::new(other)),
            }
        }
    }

    async fn session(input: &str) -> (SessionReport, String, Arc<StubAgent>) {
        let stub = StubAgent::new();
        let mut dispatcher = Dispatcher::new(
            stub.clone(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        );
        let report = dispatcher.run().await.expect("session io");
        let output = String::from_utf8(dispatcher.output().clone()).expect("utf8");
        (report, output, stub)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  Quit  "), Command::Quit);
        assert_eq!(Command::parse("EXIT"), Command::Quit);
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse(" \t "), Command::Empty);
        assert_eq!(Command::parse(" quitter "), Command::Run("quitter".to_string()));
    }

    #[tokio::test]
    async fn reports_final_result() {
        let (report, output, stub) = session("compute\nquit\n").await;
        assert!(output.contains("Processing task: compute"));
        assert!(output.contains(&"-".repeat(TASK_RULE_WIDTH)));
        assert!(output.contains("Final Result: 42"));
        assert!(output.trim_end().ends_with("Goodbye!"));
        assert_eq!(report.end, SessionEnd::Quit);
        assert_eq!(report.summary, SessionSummary { succeeded: 1, failed: 0 });
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn failure_does_not_end_session() {
        let (report, output, stub) = session("boom\nstatus\nquit\n").await;
        let error_at = output.find("Error processing task:").expect("error line");
        let result_at = output.find("Final Result: ok").expect("result line");
        assert!(error_at < result_at);
        assert!(output.contains("kaboom"));
        assert_eq!(report.summary, SessionSummary { succeeded: 1, failed: 1 });
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn panic_is_contained() {
        let (report, output, _) = session("panic\nstatus\nq\n").await;
        assert!(output.contains("Error processing task: task panicked: agent exploded"));
        assert!(output.contains("Final Result: ok"));
        assert_eq!(report.summary.failed, 1);
    }

    #[tokio::test]
    async fn quit_tokens_end_without_dispatch() {
        for input in ["quit\n", "  Quit \n", "EXIT\n", "q\n", "\tq\t\n"] {
            let (report, output, stub) = session(input).await;
            assert_eq!(report.end, SessionEnd::Quit, "input {input:?}");
            assert_eq!(stub.calls(), 0);
            assert_eq!(output.matches(PROMPT).count(), 1);
            assert!(output.trim_end().ends_with("Goodbye!"));
        }
    }

    #[tokio::test]
    async fn blank_lines_reprompt_without_dispatch() {
        let (report, output, stub) = session("\n   \n\t\nquit\n").await;
        assert_eq!(stub.calls(), 0);
        assert_eq!(output.matches("Please enter a task.").count(), 3);
        assert_eq!(report.summary, SessionSummary::default());
    }

    #[tokio::test]
    async fn end_of_input_terminates() {
        let (report, output, stub) = session("compute\n").await;
        assert_eq!(report.end, SessionEnd::EndOfInput);
        assert_eq!(stub.calls(), 1);
        assert!(output.contains("Enter your next task (or 'quit' to exit):"));
        assert!(output.trim_end().ends_with("Goodbye!"));
    }

    #[tokio::test]
    async fn banner_comes_first() {
        let (_, output, _) = session("q\n").await;
        let banner = output
            .find("TaskHive - Hierarchical Agent Interactive Mode")
            .expect("banner");
        assert!(banner < output.find(PROMPT).expect("prompt"));
        assert!(output.contains("Enter your task (or 'quit' to exit):"));
    }
}
