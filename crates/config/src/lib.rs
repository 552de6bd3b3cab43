//! Declarative configuration loading for application bootstrap.
//!
//! This crate merges an optional `.env` file, process environment variables,
//! declared default literals, and required-field validation into a single
//! typed configuration value. A configuration type declares its field table
//! once via [`Settings`]; [`load`] then runs the fixed pipeline: env file,
//! decode, default injection, validation.
//!
//! ```no_run
//! use groundwork_config::{self as config, Field, Schema, Settings};
//!
//! #[derive(Debug, Default)]
//! struct ServerSettings {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Settings for ServerSettings {
//!     fn schema() -> Schema<Self> {
//!         Schema::new(vec![
//!             Field::new("Host", "HOST", |s: &mut Self| &mut s.host).required(),
//!             Field::new("Port", "PORT", |s: &mut Self| &mut s.port).with_default("8080"),
//!         ])
//!     }
//! }
//!
//! fn main() -> Result<(), config::ConfigError> {
//!     let mut settings = ServerSettings::default();
//!     config::load(&mut settings, [config::with_prefix("APP_")])?;
//!     println!("listening on {}:{}", settings.host, settings.port);
//!     Ok(())
//! }
//! ```

mod loader;
mod schema;

pub use loader::{
    ConfigError, LoadOptions, Opt, ValidationErrors, Violation, load, skip_env_file,
    skip_validation, with_prefix,
};
pub use schema::{Access, Field, Schema, Settings};
