//! `taskhive` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let code = match Cli::try_parse() {
        Ok(cli) => cli::run(cli).await,
        Err(err) => match cli::usage_error(&err) {
            Some(usage) => cli::startup_failed(&usage),
            None => err.exit(),
        },
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
