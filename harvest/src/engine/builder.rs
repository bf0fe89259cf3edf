//! Pipeline builder with eager validation.

use std::sync::Arc;

use tracing::info;

use super::Pipeline;
use crate::artifacts::ArtifactStore;
use crate::components::{ComponentSettings, ExpanderRegistry, ExtractorRegistry};
use crate::config::PipelineConfig;
use crate::errors::ConfigurationError;
use crate::events::{EventSink, NoOpEventSink};
use crate::fetch::{CannedResponseFetcher, FetchChain};

/// Wires a [`Pipeline`] together.
///
/// Registries default to the built-in collaborators and the event sink to
/// [`NoOpEventSink`]. Everything is validated in [`build`](Self::build),
/// before any payload is handled.
pub struct PipelineBuilder {
    config: PipelineConfig,
    extractors: Option<ExtractorRegistry>,
    expanders: Option<ExpanderRegistry>,
    canned: Arc<CannedResponseFetcher>,
    fetch_chain: Option<FetchChain>,
    events: Arc<dyn EventSink>,
}

impl PipelineBuilder {
    /// Starts a builder for `config`.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            extractors: None,
            expanders: None,
            canned: Arc::new(CannedResponseFetcher::new()),
            fetch_chain: None,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Uses `registry` instead of the built-in extractors.
    #[must_use]
    pub fn extractors(mut self, registry: ExtractorRegistry) -> Self {
        self.extractors = Some(registry);
        self
    }

    /// Uses `registry` instead of the built-in expanders.
    #[must_use]
    pub fn expanders(mut self, registry: ExpanderRegistry) -> Self {
        self.expanders = Some(registry);
        self
    }

    /// Markup served by the canned-response strategy.
    #[must_use]
    pub fn canned_responses(mut self, fetcher: Arc<CannedResponseFetcher>) -> Self {
        self.canned = fetcher;
        self
    }

    /// Uses a prebuilt chain instead of one derived from the configuration.
    #[must_use]
    pub fn fetch_chain(mut self, chain: FetchChain) -> Self {
        self.fetch_chain = Some(chain);
        self
    }

    /// Sink receiving engine events.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Validates everything and builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the configuration is invalid,
    /// a mapped component is not registered, or the fetch chain cannot be
    /// built.
    pub fn build(self) -> Result<Pipeline, ConfigurationError> {
        let config = self.config;
        config.validate()?;

        let mut extractors = self.extractors.unwrap_or_else(ExtractorRegistry::builtin);
        let mut expanders = self.expanders.unwrap_or_else(ExpanderRegistry::builtin);
        extractors.validate_mapping(&config.extractor_map)?;
        expanders.validate_mapping(&config.expander_map)?;

        let mut settings = ComponentSettings::new();
        if !config.structured_root_dir.trim().is_empty() {
            settings = settings.with_structured_store(ArtifactStore::new(&config.structured_root_dir));
        }
        extractors.set_settings(settings.clone());
        expanders.set_settings(settings);

        let fetch_chain = match self.fetch_chain {
            Some(chain) => chain,
            None => FetchChain::from_config(&config, self.canned)?,
        };

        info!(
            fetch_sequence = ?fetch_chain.sequence(),
            extractors = config.extractor_map.len(),
            expanders = config.expander_map.len(),
            "Built pipeline"
        );

        Ok(Pipeline::from_parts(config, extractors, expanders, fetch_chain, self.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchStrategyKind;
    use crate::sites::demo;

    #[test]
    fn test_builds_demo_pipeline() {
        let pipeline = PipelineBuilder::new(demo::config())
            .canned_responses(Arc::new(demo::canned_fetcher()))
            .build()
            .unwrap();
        assert_eq!(pipeline.fetch_chain().sequence(), vec![FetchStrategyKind::CannedResponse]);
    }

    #[test]
    fn test_rejects_unregistered_extractor() {
        let config = demo::config().with_extractor("mystery", "harvest::sites::Nope");
        let err = PipelineBuilder::new(config).build().err().unwrap();
        assert!(err.message.contains("harvest::sites::Nope"));
        assert_eq!(err.field.as_deref(), Some("extractor_map"));
    }

    #[test]
    fn test_rejects_empty_expander_map() {
        let mut config = demo::config();
        config.expander_map.clear();
        let err = PipelineBuilder::new(config).build().err().unwrap();
        assert_eq!(err.field.as_deref(), Some("expander_map"));
    }
}
