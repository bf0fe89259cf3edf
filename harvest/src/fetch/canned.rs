//! Serves canned markup from memory.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::info;

use crate::components::Fetcher;
use crate::core::content_type::markup_type_for;
use crate::core::Payload;
use crate::errors::HarvestError;

/// A fetcher answering from a fixed locator-to-markup table.
///
/// Unknown locators come back without content. Requests are recorded so
/// tests can assert on the order pages were visited in.
#[derive(Debug, Default)]
pub struct CannedResponseFetcher {
    responses: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl CannedResponseFetcher {
    /// Creates a fetcher with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher from a locator-to-markup table.
    #[must_use]
    pub fn from_responses<I, K, V>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            responses: responses
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Adds a canned response.
    #[must_use]
    pub fn with_response(mut self, href: impl Into<String>, markup: impl Into<String>) -> Self {
        self.responses.insert(href.into(), markup.into());
        self
    }

    /// Number of canned responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether there are no canned responses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Locators requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Fetcher for CannedResponseFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let link = payload.link();
        info!(url = %link.href(), "Fetching canned content");
        self.requests.lock().push(link.href().to_string());

        Ok(match self.responses.get(link.href()) {
            Some(html) => Payload::fetched(link.clone(), html.clone(), markup_type_for(link.content_type())),
            None => Payload::new(link.clone()),
        })
    }
}
