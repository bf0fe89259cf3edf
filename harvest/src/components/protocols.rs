//! Capability traits for pipeline collaborators.
//!
//! These traits define the contracts the engine depends on, allowing fetch
//! strategies, extractors and expanders to be swapped by configuration.

use async_trait::async_trait;

use crate::core::content_type::{is_markup_content_type, is_structured_content_type};
use crate::core::Payload;
use crate::errors::{HarvestError, ValidationError};

/// Produces raw content for a link from one particular source.
///
/// A fetcher reports "not found" by returning a payload without content;
/// only hard failures (I/O faults, transport errors) are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the content behind `payload.link()`.
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError>;
}

/// Turns raw markup into structured content.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Extracts a structured payload from a markup payload.
    ///
    /// The result carries a schema tag and may already be complete when
    /// the page type has nothing left to expand.
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError>;
}

/// Turns structured content into zero or more new payloads.
pub trait Expander: Send + Sync {
    /// Expands a structured payload.
    ///
    /// Each returned payload is link-only, structured, or terminal.
    fn expand(&self, payload: &Payload) -> Result<Vec<Payload>, HarvestError>;
}

/// Returns the markup of a payload, rejecting anything else.
pub fn require_markup<'a>(component: &str, payload: &'a Payload) -> Result<&'a str, ValidationError> {
    let content_type = payload.content_type().unwrap_or_default();
    if !is_markup_content_type(content_type) {
        return Err(ValidationError::new(
            component,
            payload.link().href(),
            format!(
                "payload must have a markup content type (generic or vendor specific), received: {content_type:?}"
            ),
        ));
    }
    match payload.content() {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(ValidationError::new(
            component,
            payload.link().href(),
            "payload content is empty",
        )),
    }
}

/// Returns the structured content of a payload, rejecting anything else.
pub fn require_structured<'a>(
    component: &str,
    payload: &'a Payload,
) -> Result<&'a str, ValidationError> {
    let content_type = payload.content_type().unwrap_or_default();
    if !is_structured_content_type(content_type) {
        return Err(ValidationError::new(
            component,
            payload.link().href(),
            format!("payload must have a structured content type, received: {content_type:?}"),
        ));
    }
    match payload.content() {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(ValidationError::new(
            component,
            payload.link().href(),
            "payload does not contain structured content",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Link;

    fn link() -> Link {
        Link::external("https://example.test/a", "item")
    }

    #[test]
    fn test_require_markup() {
        let payload = Payload::fetched(link(), "<p>hi</p>", "text/html");
        assert_eq!(require_markup("Test", &payload).unwrap(), "<p>hi</p>");

        let empty = Payload::fetched(link(), "", "text/html");
        let err = require_markup("Test", &empty).unwrap_err();
        assert!(err.message.contains("empty"));

        let wrong = Payload::extracted(link(), "{}", "application/json");
        let err = require_markup("Test", &wrong).unwrap_err();
        assert_eq!(err.component, "Test");
        assert!(err.message.contains("markup"));
    }

    #[test]
    fn test_require_structured() {
        let payload = Payload::extracted(link(), "{}", "application/json");
        assert_eq!(require_structured("Test", &payload).unwrap(), "{}");

        let link_only = Payload::new(link());
        assert!(require_structured("Test", &link_only).is_err());
    }
}
