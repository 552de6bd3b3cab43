//! Console and JSON log output for application bootstrap.
//!
//! This crate renders structured `tracing` events as human-readable,
//! colorized console lines (or machine-readable JSON), and declares the
//! logging stack's own environment configuration on top of
//! `groundwork-config`.
//!
//! ```no_run
//! use groundwork_logging::LogConfig;
//!
//! let log_config = LogConfig::from_env("APP_").expect("invalid logging configuration");
//! groundwork_logging::init_from(&log_config);
//! tracing::info!(port = 8080, "server started");
//! ```

mod format;
mod setup;

pub use format::PrettyFormatter;
pub use setup::{
    InitError, LogConfig, init_from, init_json, init_pretty, try_init_from, try_init_json,
    try_init_pretty,
};
