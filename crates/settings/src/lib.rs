//! TaskHive configuration.
//!
//! A [`Config`] is built exactly once at start-up: the base TOML file is read,
//! `key=value` overrides are merged in argument order (later keys win), and the
//! result is checked against the typed [`Settings`] schema. After
//! [`Config::init`] returns, the configuration is never mutated again.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`overrides`] | `key=value` expression grammar ([`Override`], [`OverrideValue`]) |
//! | [`merge`] | The total merge function over value shapes |
//! | [`schema`] | [`Settings`], [`ModelSettings`], [`AgentSettings`] |
//! | [`errors`] | [`UsageError`], [`ConfigError`] |

pub mod errors;
pub mod merge;
pub mod overrides;
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value};
use tracing::debug;

pub use errors::{ConfigError, UsageError};
pub use merge::{apply_overrides, Shape};
pub use overrides::{parse_override, Override, OverrideValue};
pub use schema::{
    AgentSettings, ModelSettings, ProviderKind, Settings, ROOT_AGENT, SPECIALIST_AGENTS,
};

/// Environment variable naming the install root.
pub const HOME_ENV: &str = "TASKHIVE_HOME";

/// Config file location relative to the install root.
pub const DEFAULT_CONFIG_FILE: &str = "configs/config.toml";

/// Default `--config` value: `$TASKHIVE_HOME/configs/config.toml`, or
/// `configs/config.toml` under the working directory when unset.
pub fn default_config_path() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home).join(DEFAULT_CONFIG_FILE),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// The resolved, read-only configuration.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    tree: Table,
    settings: Settings,
}

impl Config {
    /// Loads `path` and applies `overrides` in order.
    pub fn init(path: &Path, overrides: &[Override]) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tree: Table = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = tree.clone();

        apply_overrides(&mut tree, overrides)?;
        for ov in overrides {
            debug!(key = ov.key(), "applied configuration override");
        }

        // Validated once, after every override has been merged.
        let settings = match settings_from(&tree) {
            Ok(settings) => settings,
            Err(message) if overrides.is_empty() || settings_from(&base).is_err() => {
                return Err(ConfigError::Schema {
                    path: path.to_path_buf(),
                    message,
                });
            }
            Err(reason) => {
                return Err(ConfigError::Override {
                    key: override_keys(overrides),
                    reason,
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            tree,
            settings,
        })
    }

    /// File the configuration was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Looks up a dotted key (`agents.planning_agent.model`).
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.tree.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// The merged tree rendered as TOML, for the start-up log.
    pub fn pretty_text(&self) -> String {
        toml::to_string_pretty(&self.tree)
            .unwrap_or_else(|err| format!("<configuration could not be rendered: {err}>"))
    }
}

/// Distinct override keys in first-appearance order, comma separated.
fn override_keys(overrides: &[Override]) -> String {
    let mut keys: Vec<&str> = Vec::new();
    for ov in overrides {
        if !keys.contains(&ov.key()) {
            keys.push(ov.key());
        }
    }
    keys.join(", ")
}

fn settings_from(tree: &Table) -> Result<Settings, String> {
    Settings::deserialize(Value::Table(tree.clone())).map_err(|err| err.to_string())
}
