//! Command-line surface.

use std::error::Error as _;
use std::path::PathBuf;

use clap::Parser;
use settings::{parse_override, Override, UsageError};

use crate::errors::StartupError;

#[derive(Debug, Parser)]
#[command(
    name = "taskhive",
    version,
    about = "Hierarchical multi-agent task executor (interactive mode)"
)]
pub struct Cli {
    /// Configuration file path.
    #[arg(long, value_name = "PATH", default_value_os_t = settings::default_config_path())]
    pub config: PathBuf,

    /// Override settings in the loaded config. Each `key=value` pair is merged
    /// into the file in order. List values look like `key="[a,b]"` or
    /// `key=a,b`; nested tuples like `key="[(a,b),(c,d)]"`. No whitespace is
    /// allowed inside a pair.
    #[arg(
        long = "cfg-options",
        value_name = "KEY=VALUE",
        num_args = 1..,
        value_parser = parse_override
    )]
    pub cfg_options: Vec<Override>,
}

/// Recovers a malformed `--cfg-options` expression from a clap error so it is
/// reported like any other start-up failure. Help, version, and unknown-flag
/// errors stay with clap.
pub fn usage_error(err: &clap::Error) -> Option<StartupError> {
    err.source()
        .and_then(|source| source.downcast_ref::<UsageError>())
        .cloned()
        .map(StartupError::Usage)
}
