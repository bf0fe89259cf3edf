//! # Harvest
//!
//! Recursive harvesting of recipe catalogs.
//!
//! A harvest starts from one entry link and keeps going until every branch
//! ends in a terminal record:
//!
//! - **Fetch**: link-only payloads get markup from an ordered chain of
//!   strategies (persistent store, network, canned responses)
//! - **Extract**: markup is turned into structured content by an extractor
//!   chosen by the link's page-type tag
//! - **Expand**: structured content fans out into new payloads through an
//!   expander chosen by its schema tag
//!
//! Results come back in depth-first order of the expansion tree.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use harvest::prelude::*;
//!
//! let config = PipelineConfig::load_from_file("config/iba.json")?;
//! let pipeline = Pipeline::new(config)?;
//! let records = pipeline
//!     .run_from("https://iba-world.com/cocktails/all-cocktails/", "iba-all-cocktails")
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod artifacts;
pub mod components;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod events;
pub mod fetch;
pub mod sites;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::artifacts::{build_raw_filename, sanitize_locator, ArtifactStore};
    pub use crate::components::{
        ComponentRegistry, ComponentSettings, Expander, ExpanderRegistry, Extractor,
        ExtractorRegistry, Fetcher,
    };
    pub use crate::config::{NetworkConfig, PipelineConfig};
    pub use crate::core::{ContentKind, Link, Payload, PayloadState};
    pub use crate::engine::{Pipeline, PipelineBuilder};
    pub use crate::errors::{
        ConfigurationError, FetchExhaustedError, HarvestError, PipelineStateError,
        ResolutionError, Result, ValidationError,
    };
    pub use crate::events::{
        CollectingEventSink, EventKind, EventSink, LoggingEventSink, NoOpEventSink,
        PipelineEvent,
    };
    pub use crate::fetch::{
        CannedResponseFetcher, FetchChain, FetchStrategyKind, PersistentStoreFetcher,
    };
    #[cfg(feature = "network")]
    pub use crate::fetch::NetworkFetcher;
}
