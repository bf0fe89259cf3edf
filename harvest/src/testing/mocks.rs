//! Mock collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::components::{require_markup, Expander, Extractor, Fetcher};
use crate::core::Payload;
use crate::errors::{HarvestError, ValidationError};

/// Wraps a fetcher and records every locator it was asked for.
pub struct RecordingFetcher {
    inner: Arc<dyn Fetcher>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Fetcher>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Locators requested so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// How many times `href` was requested.
    #[must_use]
    pub fn call_count(&self, href: &str) -> usize {
        self.calls.lock().iter().filter(|h| *h == href).count()
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        self.calls.lock().push(payload.link().href().to_string());
        self.inner.fetch(payload).await
    }
}

/// Never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFetcher;

#[async_trait]
impl Fetcher for EmptyFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        Ok(Payload::new(payload.link().clone()))
    }
}

/// Always fails with a network error.
#[derive(Debug, Clone)]
pub struct FailingFetcher {
    message: String,
}

impl FailingFetcher {
    /// Creates a fetcher failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        Err(HarvestError::network(payload.link().href(), self.message.clone()))
    }
}

/// Copies markup verbatim into a structured payload with a fixed schema.
#[derive(Debug)]
pub struct StaticExtractor {
    schema: String,
    complete: bool,
}

impl StaticExtractor {
    /// An extractor producing structured payloads tagged `schema`.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            complete: false,
        }
    }

    /// An extractor producing terminal payloads tagged `schema`.
    #[must_use]
    pub fn terminal(schema: impl Into<String>) -> Self {
        Self {
            complete: true,
            ..Self::new(schema)
        }
    }
}

#[async_trait]
impl Extractor for StaticExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let markup = require_markup("StaticExtractor", payload)?;

        let link = payload.link().clone();
        Ok(if self.complete {
            Payload::complete(link, markup, self.schema.clone())
        } else {
            Payload::extracted(link, markup, self.schema.clone())
        })
    }
}

/// Rejects every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingExtractor;

#[async_trait]
impl Extractor for FailingExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        Err(ValidationError::new("FailingExtractor", payload.link().href(), "rejected").into())
    }
}

/// Expands payloads into fixed children, keyed by locator.
///
/// Locators without an entry expand into nothing.
#[derive(Debug, Default)]
pub struct StaticExpander {
    children: HashMap<String, Vec<Payload>>,
}

impl StaticExpander {
    /// Creates an expander with no children.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the children of `href`.
    #[must_use]
    pub fn with_children(mut self, href: impl Into<String>, children: Vec<Payload>) -> Self {
        self.children.insert(href.into(), children);
        self
    }
}

impl Expander for StaticExpander {
    fn expand(&self, payload: &Payload) -> Result<Vec<Payload>, HarvestError> {
        Ok(self
            .children
            .get(payload.link().href())
            .cloned()
            .unwrap_or_default())
    }
}
