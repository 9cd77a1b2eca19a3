//! Ordered start-up pipeline.
//!
//! | Stage | Needs | Produces |
//! |-------|-------|----------|
//! | [`Stage::Config`] | parsed [`Cli`] | resolved, frozen [`Config`] |
//! | [`Stage::Logger`] | `Config` | installed subscriber ([`LogGuard`]) |
//! | [`Stage::Models`] | `Config`, logger | [`ModelRegistry`] |
//! | [`Stage::Agents`] | `Config`, `ModelRegistry` | root [`Agent`] |
//!
//! Each stage runs only after the previous one succeeded. The first failure is
//! returned as a [`StartupError`] and no partially built [`Session`] escapes.

use std::path::Path;
use std::sync::Arc;

use agents::AgentFactory;
use hive::{render_tree, Agent, Timestamp};
use models::ModelRegistry;
use settings::Config;
use tracing::{error, info};

use crate::args::Cli;
use crate::errors::StartupError;
use crate::logging::{self, Install, LogGuard};

/// One step of the start-up pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Config,
    Logger,
    Models,
    Agents,
}

/// Records when a stage completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageMarker {
    pub stage: Stage,
    pub completed_at: Timestamp,
}

impl StageMarker {
    fn now(stage: Stage) -> Self {
        Self {
            stage,
            completed_at: Timestamp::now(),
        }
    }
}

/// Everything the interactive loop needs, fully built and read-only.
///
/// Dropping the session flushes and closes the log.
pub struct Session {
    config: Arc<Config>,
    registry: Arc<ModelRegistry>,
    root: Arc<dyn Agent>,
    stages: Vec<StageMarker>,
    log: LogGuard,
}

impl Session {
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// The coordinating root agent every task is dispatched to.
    pub fn root(&self) -> Arc<dyn Agent> {
        Arc::clone(&self.root)
    }

    /// Completed stages in the order they ran.
    pub fn stages(&self) -> &[StageMarker] {
        &self.stages
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config.path())
            .field("registry", &self.registry)
            .field("root", self.root.name())
            .field("stages", &self.stages)
            .field("log", &self.log)
            .finish()
    }
}

/// Runs every start-up stage in order.
pub async fn initialize(cli: &Cli, install: Install) -> Result<Session, StartupError> {
    let mut stages = Vec::with_capacity(4);

    let config = Config::init(&cli.config, &cli.cfg_options)?;
    stages.push(StageMarker::now(Stage::Config));

    let log = logging::init(config.settings(), install)?;
    stages.push(StageMarker::now(Stage::Logger));
    info!(path = %log.path().display(), "logger initialized");
    info!(
        config = %config.path().display(),
        overrides = cli.cfg_options.len(),
        "config:\n{}",
        config.pretty_text()
    );

    let registry = ModelRegistry::init(config.settings())
        .inspect_err(|err| error!(error = %err, "model registry init failed"))?;
    stages.push(StageMarker::now(Stage::Models));
    let names: Vec<&str> = registry
        .registered_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    info!(models = %names.join(", "), "registered models");

    let root = AgentFactory::new(config.settings(), &registry)
        .create()
        .await
        .inspect_err(|err| error!(error = %err, "agent construction failed"))?;
    stages.push(StageMarker::now(Stage::Agents));
    info!("agent tree:\n{}", render_tree(root.as_ref()));

    Ok(Session {
        config: Arc::new(config),
        registry: Arc::new(registry),
        root,
        stages,
        log,
    })
}
