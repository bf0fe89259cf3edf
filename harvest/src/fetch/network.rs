//! Fetches markup over HTTP.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use super::MARKUP_EXTENSION;
use crate::artifacts::ArtifactStore;
use crate::components::Fetcher;
use crate::config::PipelineConfig;
use crate::core::content_type::markup_type_for;
use crate::core::Payload;
use crate::errors::{ConfigurationError, HarvestError};

/// HTTP fetch strategy built on `reqwest`.
///
/// A non-success status is "no content"; transport failures are errors.
/// Successful bodies are optionally written to the markup store.
#[derive(Debug, Clone)]
pub struct NetworkFetcher {
    client: reqwest::Client,
    store: ArtifactStore,
    write_content: bool,
    write_backup: bool,
    scrape_delay: Duration,
}

impl NetworkFetcher {
    /// Builds the fetcher from pipeline settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the timeout is unusable or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .timeout(config.network.timeout()?)
            .user_agent(config.network.user_agent.clone())
            .build()
            .map_err(|e| {
                ConfigurationError::new(format!("Failed to create HTTP client: {e}"))
                    .with_field("network")
            })?;

        Ok(Self {
            client,
            store: ArtifactStore::new(&config.html_root_dir),
            write_content: config.write_content,
            write_backup: config.write_backup,
            scrape_delay: config.scrape_delay(),
        })
    }

    async fn persist(&self, href: &str, html: &str) -> Result<(), HarvestError> {
        if self.write_backup {
            self.store.backup_if_exists(href, MARKUP_EXTENSION, None).await?;
        }
        self.store.write(href, MARKUP_EXTENSION, None, html).await?;
        Ok(())
    }
}

#[async_trait]
impl Fetcher for NetworkFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let link = payload.link();
        let href = link.href();
        info!(url = %href, "Fetching content from the network");

        let response = self
            .client
            .get(href)
            .send()
            .await
            .map_err(|e| HarvestError::network(href, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %href, status = %status, "Network fetch returned no content");
            return Ok(Payload::new(link.clone()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| HarvestError::network(href, e.to_string()))?;

        if self.write_content {
            self.persist(href, &html).await?;
        }

        if !self.scrape_delay.is_zero() {
            tokio::time::sleep(self.scrape_delay).await;
        }

        Ok(Payload::fetched(link.clone(), html, markup_type_for(link.content_type())))
    }
}
