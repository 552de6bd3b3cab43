//! Field registration for configuration types.
//!
//! Responsibilities:
//! - Describe, per configuration type, how each struct field maps to an
//!   environment variable, an optional default literal, and a required flag.
//! - Validate the shape of a registration before the loader executes any step.
//!
//! Does NOT handle:
//! - Reading the environment or applying precedence (see `loader.rs`).
//!
//! Invariants:
//! - Field and env names within one schema are non-empty; env names are unique.
//! - `assign` parses with the field type's `FromStr`; unset detection compares
//!   against the field type's `Default` value.

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

/// Mutable accessor from a configuration struct to one of its fields.
pub type Access<T, V> = for<'a> fn(&'a mut T) -> &'a mut V;

type AssignFn<T> = Box<dyn Fn(&mut T, &str) -> Result<(), String> + Send + Sync>;
type IsUnsetFn<T> = Box<dyn Fn(&mut T) -> bool + Send + Sync>;

/// Declares how a configuration type is populated from the environment.
///
/// The destination struct keeps plain typed fields; the schema carries the
/// per-field metadata (env name, default literal, required flag) that a
/// tag-based system would attach to the fields themselves.
pub trait Settings: Default {
    /// The field registration for this type, consulted on every `load` call.
    fn schema() -> Schema<Self>
    where
        Self: Sized;
}

/// One field declaration: metadata plus the typed plumbing to parse a raw
/// string into the field and to test whether the field is still unset.
pub struct Field<T> {
    pub(crate) name: &'static str,
    pub(crate) env: &'static str,
    pub(crate) default: Option<&'static str>,
    pub(crate) required: bool,
    pub(crate) assign: AssignFn<T>,
    pub(crate) is_unset: IsUnsetFn<T>,
}

impl<T: 'static> Field<T> {
    /// Declare a field. `name` is the struct field name used in error
    /// messages; `env` is the unprefixed environment variable name.
    pub fn new<V>(name: &'static str, env: &'static str, access: Access<T, V>) -> Self
    where
        V: FromStr + Default + PartialEq + 'static,
        V::Err: Display,
    {
        Field {
            name,
            env,
            default: None,
            required: false,
            assign: Box::new(move |dest, raw| {
                let value = raw.parse::<V>().map_err(|e| e.to_string())?;
                *access(dest) = value;
                Ok(())
            }),
            is_unset: Box::new(move |dest| *access(dest) == V::default()),
        }
    }

    /// Literal injected when the field is still at its zero value after
    /// decoding. Parsed with the same `FromStr` as environment values.
    pub fn with_default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    /// Fail validation when the field is still at its zero value after
    /// decoding and default injection.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The struct field name, as used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The unprefixed environment variable name.
    pub fn env(&self) -> &'static str {
        self.env
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("env", &self.env)
            .field("default", &self.default)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Ordered field registration for one configuration type.
#[derive(Debug)]
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Schema<T> {
    pub fn new(fields: Vec<Field<T>>) -> Self {
        Schema { fields }
    }

    pub(crate) fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Shape check run before any pipeline step.
    pub(crate) fn check_shape(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("schema declares no fields".to_string());
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(format!("field for env {:?} has an empty name", field.env));
            }
            if field.env.is_empty() {
                return Err(format!("field {} has an empty env name", field.name));
            }
            if !seen.insert(field.env) {
                return Err(format!("duplicate env name {:?}", field.env));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Sample {
        host: String,
        port: u16,
    }

    fn host_field() -> Field<Sample> {
        Field::new("Host", "HOST", |s: &mut Sample| &mut s.host)
    }

    #[test]
    fn assign_parses_into_the_field() {
        let field = Field::new("Port", "PORT", |s: &mut Sample| &mut s.port);
        let mut sample = Sample::default();
        (field.assign)(&mut sample, "8089").unwrap();
        assert_eq!(sample.port, 8089);
    }

    #[test]
    fn assign_reports_parse_failures() {
        let field = Field::new("Port", "PORT", |s: &mut Sample| &mut s.port);
        let mut sample = Sample::default();
        let err = (field.assign)(&mut sample, "not-a-port").unwrap_err();
        assert!(!err.is_empty());
        assert_eq!(sample.port, 0);
    }

    #[test]
    fn is_unset_tracks_the_zero_value() {
        let field = host_field();
        let mut sample = Sample::default();
        assert!((field.is_unset)(&mut sample));
        sample.host = "localhost".to_string();
        assert!(!(field.is_unset)(&mut sample));
    }

    #[test]
    fn empty_schema_fails_the_shape_check() {
        let schema: Schema<Sample> = Schema::new(vec![]);
        let err = schema.check_shape().unwrap_err();
        assert!(err.contains("no fields"));
    }

    #[test]
    fn duplicate_env_names_fail_the_shape_check() {
        let schema = Schema::new(vec![host_field(), host_field()]);
        let err = schema.check_shape().unwrap_err();
        assert!(err.contains("duplicate"));
        assert!(err.contains("HOST"));
    }

    #[test]
    fn empty_env_name_fails_the_shape_check() {
        let schema = Schema::new(vec![Field::new("Host", "", |s: &mut Sample| &mut s.host)]);
        assert!(schema.check_shape().is_err());
    }
}
