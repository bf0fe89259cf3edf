//! Pluggable collaborators and the registry that builds them.
//!
//! This module provides:
//! - Capability traits for fetching, extracting and expanding
//! - A tag-driven component registry
//! - Input validation helpers shared by collaborators

mod protocols;
mod registry;

pub use protocols::{require_markup, require_structured, Expander, Extractor, Fetcher};
pub use registry::{
    Capability, ComponentFactory, ComponentRegistry, ComponentSettings, ExpanderRegistry,
    ExtractorRegistry,
};

#[cfg(test)]
pub(crate) use protocols::MockFetcher;
