//! The payload state machine.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::PipelineBuilder;
use crate::components::{ExpanderRegistry, ExtractorRegistry};
use crate::config::PipelineConfig;
use crate::core::{Link, Payload, PayloadState, REL_EXTERNAL};
use crate::errors::{ConfigurationError, HarvestError};
use crate::events::{EventKind, EventSink, PipelineEvent};
use crate::fetch::FetchChain;
use crate::utils::generate_run_id;

/// Drives payloads through fetch, extract and expand until every branch
/// ends in a terminal record.
///
/// Results come back in depth-first, left-to-right order of the expansion
/// tree. The first collaborator error aborts the whole call.
pub struct Pipeline {
    config: PipelineConfig,
    extractors: ExtractorRegistry,
    expanders: ExpanderRegistry,
    fetch_chain: FetchChain,
    events: Arc<dyn EventSink>,
}

impl Pipeline {
    /// Builds a pipeline with the built-in collaborators.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if `config` is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigurationError> {
        PipelineBuilder::new(config).build()
    }

    /// Starts a [`PipelineBuilder`].
    #[must_use]
    pub fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    pub(super) fn from_parts(
        config: PipelineConfig,
        extractors: ExtractorRegistry,
        expanders: ExpanderRegistry,
        fetch_chain: FetchChain,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            extractors,
            expanders,
            fetch_chain,
            events,
        }
    }

    /// The configuration the pipeline was built from.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The fetch chain used for link-only payloads.
    #[must_use]
    pub fn fetch_chain(&self) -> &FetchChain {
        &self.fetch_chain
    }

    /// Harvests everything reachable from `link`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while handling any payload.
    pub async fn run(&self, link: Link) -> Result<Vec<Payload>, HarvestError> {
        self.handle(Payload::new(link)).await
    }

    /// Harvests everything reachable from an external entry locator.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while handling any payload.
    pub async fn run_from(
        &self,
        href: impl Into<String>,
        page_type: impl Into<String>,
    ) -> Result<Vec<Payload>, HarvestError> {
        self.run(Link::new(href, REL_EXTERNAL, page_type)).await
    }

    /// Drives `payload` and everything derived from it to terminal records.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while handling any payload.
    pub async fn handle(&self, payload: Payload) -> Result<Vec<Payload>, HarvestError> {
        let run_id = generate_run_id();
        let span = info_span!("harvest.run", run_id = %run_id, url = %payload.link().href());
        async move {
            info!("Starting harvest");
            let results = self.drain(payload, run_id).await?;
            info!(results = results.len(), "Harvest finished");
            Ok(results)
        }
        .instrument(span)
        .await
    }

    // Worklist in place of recursion. Children go on the stack in reverse
    // so the first child is handled next, keeping depth-first order.
    async fn drain(&self, root: Payload, run_id: Uuid) -> Result<Vec<Payload>, HarvestError> {
        let mut results = Vec::new();
        let mut stack = vec![root];

        while let Some(payload) = stack.pop() {
            let href = payload.link().href().to_string();
            match payload.state()? {
                PayloadState::Terminal => {
                    debug!(url = %href, "Payload complete");
                    self.emit(
                        PipelineEvent::new(EventKind::Completed, run_id, &href)
                            .with_data(json!({ "content_type": payload.content_type() })),
                    );
                    results.push(payload);
                }
                PayloadState::LinkOnly => {
                    let fetched = self.fetch_chain.fetch(&payload).await?;
                    self.emit(
                        PipelineEvent::new(EventKind::Fetched, run_id, &href)
                            .with_data(json!({ "content_type": fetched.content_type() })),
                    );
                    stack.push(fetched);
                }
                PayloadState::Markup { .. } => {
                    let page_type = payload.link().content_type();
                    let extractor = self.extractors.resolve(page_type, &self.config.extractor_map)?;
                    let extracted = extractor.extract(&payload).await?;
                    self.emit(
                        PipelineEvent::new(EventKind::Extracted, run_id, &href).with_data(json!({
                            "page_type": page_type,
                            "schema": extracted.content_type(),
                            "is_complete": extracted.is_complete(),
                        })),
                    );
                    stack.push(extracted);
                }
                PayloadState::Structured { schema, .. } => {
                    let expander = self.expanders.resolve(schema, &self.config.expander_map)?;
                    let children = expander.expand(&payload)?;
                    debug!(url = %href, schema = %schema, children = children.len(), "Expanded payload");
                    self.emit(
                        PipelineEvent::new(EventKind::Expanded, run_id, &href)
                            .with_data(json!({ "schema": schema, "children": children.len() })),
                    );
                    stack.extend(children.into_iter().rev());
                }
            }
        }

        Ok(results)
    }

    fn emit(&self, event: PipelineEvent) {
        self.events.emit(&event);
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("extractors", &self.extractors)
            .field("expanders", &self.expanders)
            .field("fetch_chain", &self.fetch_chain)
            .finish_non_exhaustive()
    }
}
