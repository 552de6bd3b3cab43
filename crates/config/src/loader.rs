//! Environment-driven configuration loading pipeline.
//!
//! Responsibilities:
//! - Merge an optional `.env` file, process environment variables, declared
//!   default literals, and required-field validation into one typed value.
//! - Provide the functional options that tune a single [`load`] call.
//!
//! Does NOT handle:
//! - Field registration (see `schema.rs`).
//! - Subscriber or log output setup (see the `groundwork-logging` crate).
//!
//! Invariants:
//! - Pipeline order is fixed: env file, decode, default injection, validation.
//! - Variables already present in the process environment win over `.env`
//!   entries (dotenvy does not override).
//! - A missing `.env` file is logged at debug level and is not an error.
//! - On error the destination may be partially populated and must be treated
//!   as unusable.

use std::fmt;

use thiserror::Error;

use crate::schema::{Schema, Settings};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The field registration itself is malformed. Returned before any
    /// pipeline step executes.
    #[error("invalid configuration schema: {0}")]
    Schema(String),

    /// A `.env` file exists but could not be read or parsed.
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// An environment value could not be parsed into the declared field type.
    #[error("failed to parse {var}={value:?} for field {field}: {message}")]
    Decode {
        field: &'static str,
        var: String,
        value: String,
        message: String,
    },

    /// A declared default literal could not be parsed into the field type.
    #[error("failed to parse default {literal:?} for field {field}: {message}")]
    Default {
        field: &'static str,
        literal: &'static str,
        message: String,
    },

    /// One or more required fields were left at their zero value.
    #[error("{0}")]
    Validation(ValidationErrors),
}

/// Aggregate of every unmet constraint, collected before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Every violated constraint, in schema order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation failed for {} required field(s):",
            self.violations.len()
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{} (set {})", violation.field, violation.var)?;
        }
        Ok(())
    }
}

/// A single required field that was still unset after decode and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The struct field name.
    pub field: &'static str,
    /// The prefixed environment variable that would satisfy the constraint.
    pub var: String,
}

/// Per-call settings, rebuilt from the supplied options on every [`load`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub(crate) prefix: String,
    pub(crate) skip_env_file: bool,
    pub(crate) skip_validation: bool,
}

/// A single functional option for [`load`].
///
/// Options are applied in call order to a freshly defaulted [`LoadOptions`];
/// later options overwrite earlier ones for the same setting.
pub struct Opt(Box<dyn FnOnce(&mut LoadOptions)>);

impl Opt {
    fn new(mutate: impl FnOnce(&mut LoadOptions) + 'static) -> Self {
        Opt(Box::new(mutate))
    }

    pub(crate) fn apply(self, options: &mut LoadOptions) {
        (self.0)(options)
    }
}

/// Prepend `prefix` to every declared env name during decoding and
/// validation reporting. The empty string means no prefix.
pub fn with_prefix(prefix: impl Into<String>) -> Opt {
    let prefix = prefix.into();
    Opt::new(move |options| options.prefix = prefix)
}

/// Do not look for a `.env` file in the working directory.
pub fn skip_env_file() -> Opt {
    Opt::new(|options| options.skip_env_file = true)
}

/// Do not check required-field constraints.
pub fn skip_validation() -> Opt {
    Opt::new(|options| options.skip_validation = true)
}

/// Populate `dest` from the environment according to its [`Schema`].
///
/// The pipeline runs in a fixed order: inject `.env` entries into the
/// process environment (unless skipped), decode prefixed environment
/// variables into the fields, fill still-unset fields from their declared
/// defaults, then check required-field constraints (unless skipped). The
/// first failing step aborts the call; `dest` may be partially populated
/// when an error is returned.
pub fn load<T: Settings>(
    dest: &mut T,
    opts: impl IntoIterator<Item = Opt>,
) -> Result<(), ConfigError> {
    let schema = T::schema();
    schema.check_shape().map_err(ConfigError::Schema)?;

    let mut options = LoadOptions::default();
    for opt in opts {
        opt.apply(&mut options);
    }

    if !options.skip_env_file {
        load_env_file()?;
    }

    decode(dest, &schema, &options.prefix)?;
    inject_defaults(dest, &schema)?;

    if !options.skip_validation {
        validate(dest, &schema, &options.prefix)?;
    }

    Ok(())
}

/// Inject `.env` entries into the process environment. A missing file is
/// not an error; anything else aborts the pipeline.
fn load_env_file() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Ok(())
        }
        Err(err) if err.not_found() => {
            tracing::debug!("no .env file found, continuing without one");
            Ok(())
        }
        Err(err) => Err(ConfigError::EnvFile(err)),
    }
}

fn decode<T>(dest: &mut T, schema: &Schema<T>, prefix: &str) -> Result<(), ConfigError> {
    for field in schema.fields() {
        let var = format!("{prefix}{}", field.env);
        match std::env::var(&var) {
            Ok(raw) => {
                (field.assign)(dest, &raw).map_err(|message| ConfigError::Decode {
                    field: field.name,
                    var: var.clone(),
                    value: raw,
                    message,
                })?;
            }
            Err(std::env::VarError::NotPresent) => {}
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::Decode {
                    field: field.name,
                    var,
                    value: String::new(),
                    message: "failed to parse value: not valid unicode".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn inject_defaults<T>(dest: &mut T, schema: &Schema<T>) -> Result<(), ConfigError> {
    for field in schema.fields() {
        let Some(literal) = field.default else {
            continue;
        };
        if !(field.is_unset)(dest) {
            continue;
        }
        (field.assign)(dest, literal).map_err(|message| ConfigError::Default {
            field: field.name,
            literal,
            message,
        })?;
    }
    Ok(())
}

fn validate<T>(dest: &mut T, schema: &Schema<T>, prefix: &str) -> Result<(), ConfigError> {
    let mut violations = Vec::new();
    for field in schema.fields() {
        if field.required && (field.is_unset)(dest) {
            violations.push(Violation {
                field: field.name,
                var: format!("{prefix}{}", field.env),
            });
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(ValidationErrors { violations }))
    }
}
