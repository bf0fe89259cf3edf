//! Engine events.
//!
//! The pipeline reports each state transition to an injected
//! [`EventSink`]. Sinks are owned by the pipeline, never global.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The transitions the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// A link-only payload got content from the fetch chain.
    #[serde(rename = "payload.fetched")]
    Fetched,
    /// A markup payload was turned into a structured one.
    #[serde(rename = "payload.extracted")]
    Extracted,
    /// A structured payload produced child payloads.
    #[serde(rename = "payload.expanded")]
    Expanded,
    /// A terminal payload was appended to the results.
    #[serde(rename = "payload.completed")]
    Completed,
}

impl EventKind {
    /// Dotted event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetched => "payload.fetched",
            Self::Extracted => "payload.extracted",
            Self::Expanded => "payload.expanded",
            Self::Completed => "payload.completed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One engine transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEvent {
    /// What happened.
    pub kind: EventKind,
    /// The run this event belongs to.
    pub run_id: Uuid,
    /// Locator of the payload's link.
    pub href: String,
    /// Kind-specific details.
    pub data: serde_json::Value,
}

impl PipelineEvent {
    /// Creates an event with no details.
    #[must_use]
    pub fn new(kind: EventKind, run_id: Uuid, href: impl Into<String>) -> Self {
        Self {
            kind,
            run_id,
            href: href.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Attaches details.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_dotted_kind() {
        let event = PipelineEvent::new(EventKind::Expanded, Uuid::nil(), "https://example.test/list")
            .with_data(serde_json::json!({"children": 3}));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["kind"], "payload.expanded");
        assert_eq!(value["href"], "https://example.test/list");
        assert_eq!(value["data"]["children"], 3);
        assert_eq!(EventKind::Completed.to_string(), "payload.completed");
    }
}
