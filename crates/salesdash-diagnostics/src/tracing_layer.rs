//! Tracing layer that forwards events to the host over a channel.
//!
//! The terminal host cannot print log lines while the prompt is active, so
//! events are captured here and shown on demand.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// One captured tracing event.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DiagnosticEvent {
    /// Event target, e.g. `health` or `conversation`.
    pub target: String,
    /// Log level (INFO, DEBUG, WARN, ERROR)
    pub level: String,
    pub message: String,
    /// Structured fields other than `message`.
    pub fields: BTreeMap<String, Value>,
    /// Names of the enclosing spans, outermost first.
    pub spans: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Sends every event it sees to an unbounded channel.
pub struct DiagnosticEventLayer {
    sender: mpsc::UnboundedSender<DiagnosticEvent>,
}

impl DiagnosticEventLayer {
    pub fn new(sender: mpsc::UnboundedSender<DiagnosticEvent>) -> Self {
        Self { sender }
    }

    /// Creates a layer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DiagnosticEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for DiagnosticEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let spans = ctx
            .event_scope(event)
            .map(|scope| {
                scope
                    .from_root()
                    .map(|span| span.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let diagnostic = DiagnosticEvent {
            target: event.metadata().target().to_string(),
            level: event.metadata().level().to_string(),
            message,
            fields,
            spans,
            timestamp: Utc::now(),
        };

        // Receiver gone means nobody is listening any more.
        let _ = self.sender.send(diagnostic);
    }
}

struct FieldVisitor<'a>(&'a mut BTreeMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(
            field.name().to_string(),
            serde_json::json!(format!("{:?}", value)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_event_is_forwarded_with_fields() {
        let (layer, mut rx) = DiagnosticEventLayer::channel();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("poll");
            let _guard = span.enter();
            tracing::warn!(target: "health", seq = 3u64, "Poll failed");
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.target, "health");
        assert_eq!(event.level, "WARN");
        assert_eq!(event.message, "Poll failed");
        assert_eq!(event.fields.get("seq"), Some(&serde_json::json!(3)));
        assert_eq!(event.spans, vec!["poll"]);
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (layer, rx) = DiagnosticEventLayer::channel();
        drop(rx);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("nobody listening");
        });
    }
}
