//! Property-based tests for decode precedence and prefix routing.
//!
//! These properties mutate the process environment, so each test function is
//! `#[serial]` and uses the `GWPROP_` variable-name family.

use groundwork_config::{self as config, Field, Schema, Settings};
use proptest::prelude::*;
use serial_test::serial;

fn set_var(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) }
}

fn remove_var(key: &str) {
    unsafe { std::env::remove_var(key) }
}

#[derive(Debug, Default)]
struct PropSettings {
    name: String,
    port: u16,
}

impl Settings for PropSettings {
    fn schema() -> Schema<Self> {
        Schema::new(vec![
            Field::new("Name", "GWPROP_NAME", |s: &mut Self| &mut s.name)
                .with_default("fallback"),
            Field::new("Port", "GWPROP_PORT", |s: &mut Self| &mut s.port).with_default("8080"),
        ])
    }
}

proptest! {
    /// Environment values always reach the fields verbatim, regardless of
    /// the declared defaults.
    #[test]
    #[serial]
    fn env_values_reach_the_fields(name in "[a-z0-9]{1,16}", port in 1u16..=u16::MAX) {
        set_var("GWPROP_NAME", &name);
        set_var("GWPROP_PORT", &port.to_string());

        let mut settings = PropSettings::default();
        let result = config::load(&mut settings, [config::skip_env_file()]);

        remove_var("GWPROP_NAME");
        remove_var("GWPROP_PORT");

        prop_assert!(result.is_ok());
        prop_assert_eq!(settings.name, name);
        prop_assert_eq!(settings.port, port);
    }

    /// A prefix routes decoding to the prefixed variable name.
    #[test]
    #[serial]
    fn prefixes_route_to_the_prefixed_variable(prefix in "[A-Z]{2,8}_") {
        let var = format!("{prefix}GWPROP_PORT");
        set_var(&var, "4242");
        remove_var("GWPROP_PORT");

        let mut settings = PropSettings::default();
        let result = config::load(
            &mut settings,
            [config::with_prefix(prefix.clone()), config::skip_env_file()],
        );

        remove_var(&var);

        prop_assert!(result.is_ok());
        prop_assert_eq!(settings.port, 4242);
        // The prefixed name variable was never set, so the default applies.
        prop_assert_eq!(settings.name, "fallback");
    }

    /// With nothing set under the prefix, every field falls back to its
    /// declared default.
    #[test]
    #[serial]
    fn absent_values_fall_back_to_defaults(prefix in "[A-Z]{2,8}_ABSENT_") {
        let mut settings = PropSettings::default();
        let result = config::load(
            &mut settings,
            [config::with_prefix(prefix), config::skip_env_file()],
        );

        prop_assert!(result.is_ok());
        prop_assert_eq!(settings.name, "fallback");
        prop_assert_eq!(settings.port, 8080);
    }
}
