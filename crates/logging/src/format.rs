//! Human-readable rendering of structured log events.
//!
//! Responsibilities:
//! - Render each event as one colorized console line while keeping the
//!   structured key/value payload readable (pretty-printed JSON).
//! - Rewrite error-valued fields to their display text before rendering.
//!
//! Does NOT handle:
//! - Subscriber composition or level filtering (see `setup.rs`).
//!
//! Invariants:
//! - Colors are emitted only when the destination writer supports ANSI.
//! - The implicit `message` field never appears in the JSON block.

use std::fmt;

use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter producing `[HH:MM:SS.mmm] LEVEL: message file:line {fields}`.
///
/// The level token is colorized by severity, the message cyan, and the
/// source location green. Event fields other than the message are rendered
/// as a pretty-printed JSON object after the location.
#[derive(Debug, Default, Clone)]
pub struct PrettyFormatter;

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let ansi = writer.has_ansi_escapes();

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let timestamp = chrono::Local::now().format("[%H:%M:%S%.3f]");
        write!(writer, "{timestamp} ")?;

        let level = *event.metadata().level();
        let token = format!("{level}:");
        if ansi {
            write!(writer, "{} ", paint_level(level, &token))?;
        } else {
            write!(writer, "{token} ")?;
        }

        let message = visitor.message.unwrap_or_default();
        if ansi {
            write!(writer, "{}", message.cyan())?;
        } else {
            write!(writer, "{message}")?;
        }

        if let (Some(file), Some(line)) = (event.metadata().file(), event.metadata().line()) {
            let location = format!("{file}:{line}");
            if ansi {
                write!(writer, " {}", location.green())?;
            } else {
                write!(writer, " {location}")?;
            }
        }

        if !visitor.fields.is_empty() {
            let rendered = serde_json::to_string_pretty(&Value::Object(visitor.fields))
                .map_err(|_| fmt::Error)?;
            write!(writer, " {rendered}")?;
        }

        writeln!(writer)
    }
}

fn paint_level(level: Level, token: &str) -> ColoredString {
    if level == Level::ERROR {
        token.red()
    } else if level == Level::WARN {
        token.yellow()
    } else if level == Level::INFO {
        token.blue()
    } else {
        token.magenta()
    }
}

/// Collects event fields into a JSON map, splitting out the implicit
/// `message` field and flattening error values to their display text.
#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name().to_string(), value.into());
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields
            .insert(field.name().to_string(), value.to_string().into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}").into());
        }
    }
}
