//! Subscriber bootstrap driven by environment configuration.
//!
//! Responsibilities:
//! - Declare the logging stack's own configuration (`LEVEL`, `JSON`).
//! - Install a global subscriber with either the pretty console formatter or
//!   machine-readable JSON output.
//!
//! Invariants:
//! - `RUST_LOG`, when set, wins over the configured level.
//! - The global subscriber can be installed at most once per process.

use groundwork_config::{self as config, Field, Schema, Settings};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::format::PrettyFormatter;

/// Logging stack configuration, populated from `LEVEL` and `JSON`
/// environment variables (optionally prefixed).
///
/// `Default` yields the zero values; the declared defaults (`info`, `true`)
/// are injected by the loading pipeline. Note that because default injection
/// fills zero-valued fields, an explicit `JSON=false` is indistinguishable
/// from an unset variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Settings for LogConfig {
    fn schema() -> Schema<Self> {
        Schema::new(vec![
            Field::new("Level", "LEVEL", |c: &mut Self| &mut c.level).with_default("info"),
            Field::new("Json", "JSON", |c: &mut Self| &mut c.json).with_default("true"),
        ])
    }
}

impl LogConfig {
    /// Load from the environment with the given prefix (e.g. `LOG_`).
    pub fn from_env(prefix: &str) -> Result<Self, config::ConfigError> {
        let mut log_config = LogConfig::default();
        config::load(&mut log_config, [config::with_prefix(prefix)])?;
        Ok(log_config)
    }
}

/// Errors from subscriber installation.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid log level {level:?}")]
    InvalidLevel { level: String },

    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

fn parse_level(level: &str) -> Result<Level, InitError> {
    level.parse().map_err(|_| InitError::InvalidLevel {
        level: level.to_string(),
    })
}

fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the pretty console subscriber as the global default.
pub fn try_init_pretty(level: &str) -> Result<(), InitError> {
    let level = parse_level(level)?;
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().event_format(PrettyFormatter))
        .try_init()?;
    Ok(())
}

/// Install the JSON subscriber as the global default.
pub fn try_init_json(level: &str) -> Result<(), InitError> {
    let level = parse_level(level)?;
    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(fmt::layer().json())
        .try_init()?;
    Ok(())
}

/// Install the subscriber selected by `config`: JSON output when
/// `config.json`, the pretty console formatter otherwise.
pub fn try_init_from(config: &LogConfig) -> Result<(), InitError> {
    if config.json {
        try_init_json(&config.level)
    } else {
        try_init_pretty(&config.level)
    }
}

/// Like [`try_init_from`], but panics on failure. Intended for `main`.
pub fn init_from(config: &LogConfig) {
    try_init_from(config).expect("failed to initialize logging");
}

/// Like [`try_init_pretty`], but panics on failure. Intended for `main`.
pub fn init_pretty(level: &str) {
    try_init_pretty(level).expect("failed to initialize logging");
}

/// Like [`try_init_json`], but panics on failure. Intended for `main`.
pub fn init_json(level: &str) {
    try_init_json(level).expect("failed to initialize logging");
}
