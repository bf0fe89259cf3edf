//! Testing utilities for harvest pipelines.
//!
//! This module provides:
//! - Recording and failing collaborators
//! - Markup fixtures and helpers to seed a persistent store

mod fixtures;
mod mocks;

pub use fixtures::{
    fixture_config, listing_markup, recipe_markup, seed_store, LISTING_PAGE_TYPE,
};
pub use mocks::{
    EmptyFetcher, FailingExtractor, FailingFetcher, RecordingFetcher, StaticExpander,
    StaticExtractor,
};
