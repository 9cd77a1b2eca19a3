//! TaskHive composition root.
//!
//! The `taskhive` binary is a thin wrapper over this library:
//!
//! 1. **Parse arguments** ([`args`]): config path and `key=value` overrides.
//! 2. **Start up** ([`startup`]): config, then logging ([`logging`]), then the
//!    model registry, then the agent tree. Any failure exits with the code
//!    from [`exit_codes`] before a prompt is shown.
//! 3. **Interact** ([`dispatcher`]): read a task, run it against the root
//!    agent, report the result or the error, and repeat until quit.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`args`] | Clap argument surface ([`Cli`]) |
//! | [`logging`] | Subscriber installation ([`LogGuard`]) |
//! | [`startup`] | Ordered pipeline producing a [`Session`] |
//! | [`dispatcher`] | The interactive loop ([`Dispatcher`]) |
//! | [`errors`] | [`StartupError`], [`LoggerInitError`] |
//! | [`exit_codes`] | Stable process exit codes |

pub mod args;
pub mod dispatcher;
pub mod errors;
pub mod exit_codes;
pub mod logging;
pub mod startup;

use std::io::{self, BufReader};

use anyhow::Context;
use tracing::error;

pub use args::{usage_error, Cli};
pub use dispatcher::{Command, Dispatcher, SessionEnd, SessionReport, SessionSummary};
pub use errors::{LoggerInitError, StartupError};
pub use logging::{Install, LogGuard};
pub use startup::{initialize, Session, Stage, StageMarker};

/// Prints the diagnostic for a fatal start-up error and returns its exit code.
pub fn startup_failed(err: &StartupError) -> i32 {
    eprintln!("taskhive: {} failed: {err}", err.stage());
    err.exit_code()
}

/// Runs the whole program on the process's stdin and stdout and returns the
/// exit code.
pub async fn run(cli: Cli) -> i32 {
    let session = match initialize(&cli, Install::Global).await {
        Ok(session) => session,
        Err(err) => return startup_failed(&err),
    };

    let mut dispatcher = Dispatcher::new(session.root(), BufReader::new(io::stdin()), io::stdout());
    let outcome = dispatcher
        .run()
        .await
        .context("interactive session I/O failed");
    match outcome {
        Ok(_) => exit_codes::OK,
        Err(err) => {
            error!(error = %format!("{err:#}"), "session aborted");
            eprintln!("taskhive: {err:#}");
            exit_codes::SESSION
        }
    }
}
