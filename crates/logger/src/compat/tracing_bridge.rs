//! Bridge from tracing to a [`Logger`]

use crate::{Data, Datum, Level, Logger, Message};
use std::fmt;
use std::marker::PhantomData;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, registry::LookupSpan};

/// Data key holding the tracing target of a bridged event
pub const TARGET_KEY: &str = "target";

/// Data key marking events that were warnings in tracing
pub const LOG_LEVEL_KEY: &str = "log_level";

/// A tracing layer that forwards events to a [`Logger`].
///
/// Levels map like the `log` bridge: `WARN` becomes `info` with
/// `log_level = "warn"`, `DEBUG` is `debug.1` and `TRACE` is `debug.2`.
/// Event fields other than `message` become data entries, and the names of
/// the enclosing spans, outermost first, prefix the message.
pub struct TracingBridge<S> {
    logger: Logger,
    _subscriber: PhantomData<fn(S)>,
}

impl<S> TracingBridge<S> {
    /// Create a layer emitting through `logger`
    pub const fn new(logger: Logger) -> Self {
        Self {
            logger,
            _subscriber: PhantomData,
        }
    }
}

impl<S> Layer<S> for TracingBridge<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let (level, debug_level) = map_level(*metadata.level());

        if !self.logger.is_enabled(level, debug_level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let spans: Vec<&str> = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name()).collect())
            .unwrap_or_default();

        let text = if spans.is_empty() {
            visitor.message
        } else {
            format!("{}: {}", spans.join("::"), visitor.message)
        };

        let mut data = visitor.data.with(TARGET_KEY, metadata.target());
        if *metadata.level() == tracing::Level::WARN {
            data.insert(LOG_LEVEL_KEY, "warn");
        }

        let mut message = Message::new(level, text).with_data(data);
        message.debug_level = debug_level;

        self.logger.log(message);
    }
}

const fn map_level(level: tracing::Level) -> (Level, u32) {
    match level {
        tracing::Level::ERROR => (Level::Error, 0),
        tracing::Level::DEBUG => (Level::Debug, 1),
        tracing::Level::TRACE => (Level::Debug, 2),
        _ => (Level::Info, 0),
    }
}

/// Splits event fields into the message text and data entries
#[derive(Default)]
struct FieldVisitor {
    message: String,
    data: Data,
}

impl FieldVisitor {
    fn record(&mut self, field: &Field, value: impl Into<Datum>) {
        self.data.insert(field.name(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.record(field, value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.record(field, format!("{value:?}"));
        }
    }
}

/// Install a registry with a [`TracingBridge`] as the global subscriber.
///
/// # Example
/// ```no_run
/// use ember_logger::Logger;
/// use ember_logger::compat::init_tracing_bridge;
///
/// init_tracing_bridge(Logger::default_logger("app")).expect("Failed to set tracing bridge");
/// tracing::info!(user = "ada", "signed in");
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_bridge(logger: Logger) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::registry().with(TracingBridge::new(logger));
    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CaptureBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn with_bridge(debug_level: u32, f: impl FnOnce()) -> CaptureBackend {
        let capture = CaptureBackend::new();
        let logger = Logger::new("app", Arc::new(capture.clone())).with_debug_level(debug_level);
        let subscriber = tracing_subscriber::registry().with(TracingBridge::new(logger));

        tracing::subscriber::with_default(subscriber, f);
        capture
    }

    #[test]
    fn test_fields_become_data() {
        let capture = with_bridge(0, || {
            tracing::info!(user = "ada", attempts = 3_u64, admin = false, "signed in {}", "now");
        });

        let record = &capture.records()[0];
        assert_eq!(record.message, "signed in now");
        assert_eq!(record.full_level(), "info");
        assert_eq!(record.data.get("user"), Some(&json!("ada")));
        assert_eq!(record.data.get("attempts"), Some(&json!(3)));
        assert_eq!(record.data.get("admin"), Some(&json!(false)));
        assert!(record.data.contains_key(TARGET_KEY));
    }

    #[test]
    fn test_level_mapping_and_threshold() {
        let capture = with_bridge(1, || {
            tracing::error!("e");
            tracing::warn!("w");
            tracing::debug!("d");
            tracing::trace!("t");
        });

        let levels: Vec<_> = capture.records().iter().map(|r| r.full_level()).collect();
        assert_eq!(levels, ["error", "info", "debug.1"]);
        assert_eq!(
            capture.records()[1].data.get(LOG_LEVEL_KEY),
            Some(&json!("warn"))
        );
    }

    #[test]
    fn test_spans_prefix_message() {
        let capture = with_bridge(0, || {
            let outer = tracing::info_span!("request");
            let _outer = outer.enter();
            let inner = tracing::info_span!("db");
            let _inner = inner.enter();
            tracing::info!("query done");
        });

        assert_eq!(capture.messages(), ["request::db: query done"]);
    }
}
