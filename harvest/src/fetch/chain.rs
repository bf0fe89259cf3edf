//! Ordered fallback across fetch strategies.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CannedResponseFetcher, FetchStrategyKind, PersistentStoreFetcher};
use crate::components::Fetcher;
use crate::config::PipelineConfig;
use crate::core::Payload;
use crate::errors::{ConfigurationError, FetchExhaustedError, HarvestError};

/// Tries each configured strategy in order until one yields content.
///
/// Empty content counts as "not found", the same as absent content.
#[derive(Clone, Default)]
pub struct FetchChain {
    strategies: Vec<(FetchStrategyKind, Arc<dyn Fetcher>)>,
}

impl FetchChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy.
    #[must_use]
    pub fn with_strategy(mut self, kind: FetchStrategyKind, fetcher: Arc<dyn Fetcher>) -> Self {
        self.strategies.push((kind, fetcher));
        self
    }

    /// Builds the chain described by `config.fetch_sequence`.
    ///
    /// A strategy listed twice is only kept the first time, so no
    /// strategy runs more than once per payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the sequence is empty or
    /// names a strategy that cannot be built.
    pub fn from_config(
        config: &PipelineConfig,
        canned: Arc<CannedResponseFetcher>,
    ) -> Result<Self, ConfigurationError> {
        if config.fetch_sequence.is_empty() {
            return Err(ConfigurationError::new("Fetch sequence cannot be empty.")
                .with_field("fetch_sequence"));
        }

        let mut chain = Self::new();
        for &kind in &config.fetch_sequence {
            if chain.contains(kind) {
                warn!(strategy = %kind, "Ignoring repeated fetch strategy");
                continue;
            }
            let fetcher: Arc<dyn Fetcher> = match kind {
                FetchStrategyKind::PersistentStore => {
                    Arc::new(PersistentStoreFetcher::new(&config.html_root_dir))
                }
                FetchStrategyKind::Network => network_fetcher(config)?,
                FetchStrategyKind::CannedResponse => canned.clone(),
            };
            chain = chain.with_strategy(kind, fetcher);
        }

        info!(sequence = ?chain.sequence(), "Built fetch chain");
        Ok(chain)
    }

    /// The strategy kinds, in the order they are tried.
    #[must_use]
    pub fn sequence(&self) -> Vec<FetchStrategyKind> {
        self.strategies.iter().map(|(kind, _)| *kind).collect()
    }

    /// Whether the chain includes `kind`.
    #[must_use]
    pub fn contains(&self, kind: FetchStrategyKind) -> bool {
        self.strategies.iter().any(|(k, _)| *k == kind)
    }

    /// Number of strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the chain has no strategies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Fetches content for a link-only payload.
    ///
    /// # Errors
    ///
    /// Propagates the first strategy error, or returns
    /// [`FetchExhaustedError`] when no strategy produced content.
    pub async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let href = payload.link().href();
        let mut attempted = Vec::with_capacity(self.strategies.len());

        for (kind, fetcher) in &self.strategies {
            attempted.push(kind.to_string());
            let fetched = fetcher.fetch(payload).await?;
            if fetched.has_content() {
                debug!(url = %href, strategy = %kind, "Fetch strategy produced content");
                return Ok(fetched);
            }
            debug!(url = %href, strategy = %kind, "Fetch strategy found nothing");
        }

        warn!(url = %href, attempted = ?attempted, "All fetch strategies exhausted");
        Err(FetchExhaustedError::new(href, attempted).into())
    }
}

#[cfg(feature = "network")]
fn network_fetcher(config: &PipelineConfig) -> Result<Arc<dyn Fetcher>, ConfigurationError> {
    Ok(Arc::new(super::NetworkFetcher::from_config(config)?))
}

#[cfg(not(feature = "network"))]
fn network_fetcher(_config: &PipelineConfig) -> Result<Arc<dyn Fetcher>, ConfigurationError> {
    Err(ConfigurationError::new(
        "The network fetch strategy requires the `network` feature.",
    )
    .with_field("fetch_sequence"))
}

impl fmt::Debug for FetchChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchChain")
            .field("sequence", &self.sequence())
            .finish()
    }
}
