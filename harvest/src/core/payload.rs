//! Payloads: units of work moving through the engine.

use super::content_type::ContentKind;
use super::link::Link;
use crate::errors::PipelineStateError;
use serde::{Deserialize, Serialize};

/// A unit of work carrying a link and, progressively, its content.
///
/// Payloads are never mutated: every transition builds a new payload for
/// the same link. The logical state is derived from
/// `(content, content_type, is_complete)`; see [`Payload::state`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default)]
    is_complete: bool,
}

/// The engine's view of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadState<'a> {
    /// Requires no further processing.
    Terminal,
    /// Needs fetching.
    LinkOnly,
    /// Holds markup waiting for an extractor.
    Markup {
        /// The raw markup.
        content: &'a str,
        /// The markup content type.
        content_type: &'a str,
    },
    /// Holds structured data waiting for an expander.
    Structured {
        /// The serialized structured data.
        content: &'a str,
        /// The schema tag.
        schema: &'a str,
    },
}

impl Payload {
    /// Creates a link-only payload.
    #[must_use]
    pub fn new(link: Link) -> Self {
        Self {
            link,
            content: None,
            content_type: None,
            is_complete: false,
        }
    }

    /// Creates a payload holding freshly fetched markup.
    #[must_use]
    pub fn fetched(link: Link, content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            link,
            content: Some(content.into()),
            content_type: Some(content_type.into()),
            is_complete: false,
        }
    }

    /// Creates a payload holding structured data that still needs expanding.
    #[must_use]
    pub fn extracted(link: Link, content: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            link,
            content: Some(content.into()),
            content_type: Some(schema.into()),
            is_complete: false,
        }
    }

    /// Creates a terminal payload.
    #[must_use]
    pub fn complete(link: Link, content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            link,
            content: Some(content.into()),
            content_type: Some(content_type.into()),
            is_complete: true,
        }
    }

    /// Creates a payload from raw parts without any checks.
    ///
    /// Combinations the engine cannot classify fail later with
    /// [`PipelineStateError`].
    #[must_use]
    pub fn from_parts(
        link: Link,
        content: Option<String>,
        content_type: Option<String>,
        is_complete: bool,
    ) -> Self {
        Self {
            link,
            content,
            content_type,
            is_complete,
        }
    }

    /// The payload's link.
    #[must_use]
    pub fn link(&self) -> &Link {
        &self.link
    }

    /// The payload's content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The payload's content type, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the payload needs no further processing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Whether the payload carries non-empty content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Consumes the payload, returning its link.
    #[must_use]
    pub fn into_link(self) -> Link {
        self.link
    }

    /// Classifies the payload, in fixed priority order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineStateError`] for a combination matching no state,
    /// e.g. content present with no content type.
    pub fn state(&self) -> Result<PayloadState<'_>, PipelineStateError> {
        if self.is_complete {
            return Ok(PayloadState::Terminal);
        }

        let Some(content) = self.content.as_deref() else {
            return Ok(PayloadState::LinkOnly);
        };

        match (ContentKind::classify(self.content_type()), self.content_type()) {
            (Some(ContentKind::Markup), Some(content_type)) => Ok(PayloadState::Markup {
                content,
                content_type,
            }),
            (Some(ContentKind::Structured), Some(schema)) => {
                Ok(PayloadState::Structured { content, schema })
            }
            _ => Err(self.state_error()),
        }
    }

    fn state_error(&self) -> PipelineStateError {
        PipelineStateError {
            href: self.link.href().to_string(),
            has_content: self.content.is_some(),
            content_type: self.content_type.clone(),
            is_complete: self.is_complete,
        }
    }
}
