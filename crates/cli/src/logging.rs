//! Process-wide logging.
//!
//! Every crate in the workspace emits `tracing` spans and events; this module
//! installs the one subscriber that receives them:
//!
//! - an `EnvFilter` built from `RUST_LOG`, falling back to `log_level`;
//! - a plain-text `fmt` layer appending to the configured log file through a
//!   `tracing-appender` non-blocking writer;
//! - an OpenTelemetry layer exporting spans over OTLP when `otlp_endpoint` is set.
//!
//! The interactive surface (banner, prompts, results) is written to stdout by
//! the dispatcher and never goes through this module.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::TracerProvider;
use settings::Settings;
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::LoggerInitError;

/// How the subscriber is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Install {
    /// Process-wide default for the binary. A second global install fails.
    Global,
    /// Default for the current thread only, until the returned guard drops.
    Scoped,
}

/// Keeps the logger alive. Dropping it flushes the file writer and shuts the
/// span exporter down.
pub struct LogGuard {
    path: PathBuf,
    _writer: WorkerGuard,
    _scope: Option<DefaultGuard>,
    tracer_provider: Option<TracerProvider>,
}

impl LogGuard {
    /// File the log is appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("path", &self.path)
            .field("otlp", &self.tracer_provider.is_some())
            .finish()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down span exporter: {err}");
            }
        }
    }
}

/// Initialises logging from resolved settings.
///
/// Creates the log directory when missing and opens the file in append mode.
pub fn init(settings: &Settings, install: Install) -> Result<LogGuard, LoggerInitError> {
    let path = settings.log_path();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| LoggerInitError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggerInitError::Open {
            path: path.clone(),
            source,
        })?;
    let (writer, writer_guard) = tracing_appender::non_blocking(file);

    let filter = env_filter(&settings.log_level)?;

    let tracer_provider = match settings.otlp_endpoint.as_deref() {
        Some(endpoint) => Some(tracer_provider(endpoint)?),
        None => None,
    };
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer("taskhive"))
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(otel_layer);

    let scope = match install {
        Install::Global => {
            subscriber
                .try_init()
                .map_err(|err| LoggerInitError::AlreadyInstalled {
                    message: err.to_string(),
                })?;
            None
        }
        Install::Scoped => Some(subscriber.set_default()),
    };

    Ok(LogGuard {
        path,
        _writer: writer_guard,
        _scope: scope,
        tracer_provider,
    })
}

fn env_filter(log_level: &str) -> Result<EnvFilter, LoggerInitError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level).map_err(|err| LoggerInitError::Filter {
            directive: log_level.to_string(),
            message: err.to_string(),
        }),
    }
}

/// Must be called inside a tokio runtime: the batch processor runs on it.
fn tracer_provider(endpoint: &str) -> Result<TracerProvider, LoggerInitError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|err| LoggerInitError::Exporter {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        })?;
    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            workdir: dir.to_path_buf(),
            tag: "run".to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn creates_log_directory_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = settings_in(dir.path());

        let guard = init(&settings, Install::Scoped).expect("init");
        assert_eq!(guard.path(), dir.path().join("run").join("log.txt"));
        tracing::error!("hello from the test");
        drop(guard);

        let contents = fs::read_to_string(dir.path().join("run/log.txt")).expect("read log");
        assert!(contents.contains("hello from the test"));
    }

    #[test]
    fn appends_to_existing_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("existing.log");
        fs::write(&log, "earlier line\n").expect("seed");
        let settings = Settings {
            log_path: Some(log.clone()),
            ..Settings::default()
        };

        drop(init(&settings, Install::Scoped).expect("init"));
        let contents = fs::read_to_string(&log).expect("read log");
        assert!(contents.starts_with("earlier line\n"));
    }

    #[test]
    fn uncreatable_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").expect("seed");
        let settings = Settings {
            log_path: Some(blocker.join("nested").join("log.txt")),
            ..Settings::default()
        };

        let err = init(&settings, Install::Scoped).expect_err("must fail");
        assert!(matches!(err, LoggerInitError::CreateDir { .. }));
    }
}
