//! Built-in collaborators for the cocktail catalogs we harvest.
//!
//! This module provides:
//! - Extractors and an expander for the IBA cocktail catalog
//! - An extractor for the Wikipedia list of cocktails
//! - The offline demo catalog with its own extractors and expander
//! - The record types those collaborators exchange
//! - Registries pre-populated with every built-in collaborator

pub mod demo;
pub mod iba;
pub mod records;
pub mod wikipedia;

use scraper::{ElementRef, Selector};
use tracing::info;

use crate::artifacts::ArtifactStore;
use crate::components::{require_structured, ExpanderRegistry, ExtractorRegistry};
use crate::core::{Link, Payload};
use crate::errors::{HarvestError, ValidationError};
use records::CocktailListing;

/// Extension of structured artifacts.
pub const STRUCTURED_EXTENSION: &str = "json";

impl ExtractorRegistry {
    /// A registry holding every built-in extractor.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with(iba::LIST_EXTRACTOR, |settings| {
                Box::new(iba::IbaCocktailListExtractor::new(settings.structured_store.clone()))
            })
            .with(iba::COCKTAIL_EXTRACTOR, |settings| {
                Box::new(iba::IbaCocktailExtractor::new(settings.structured_store.clone()))
            })
            .with(wikipedia::LIST_EXTRACTOR, |settings| {
                Box::new(wikipedia::WikipediaCocktailListExtractor::new(
                    settings.structured_store.clone(),
                ))
            })
            .with(demo::LISTING_EXTRACTOR, |settings| {
                Box::new(demo::DemoListingExtractor::new(settings.structured_store.clone()))
            })
            .with(demo::COCKTAIL_EXTRACTOR, |settings| {
                Box::new(demo::DemoCocktailExtractor::new(settings.structured_store.clone()))
            })
    }
}

impl ExpanderRegistry {
    /// A registry holding every built-in expander.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with(iba::LIST_EXPANDER, |_| Box::new(iba::IbaCocktailListExpander))
            .with(demo::LISTING_EXPANDER, |_| Box::new(demo::DemoListingExpander))
    }
}

/// Parses a CSS selector, reporting a bad one against `component`.
pub(crate) fn selector(component: &str, href: &str, css: &str) -> Result<Selector, ValidationError> {
    Selector::parse(css).map_err(|e| {
        ValidationError::new(component, href, format!("invalid selector {css:?}: {e}"))
    })
}

/// Concatenated text of an element, trimmed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Writes a serialized record through to the structured store, if any.
pub(crate) async fn write_through(
    store: Option<&ArtifactStore>,
    href: &str,
    tag: &str,
    json: &str,
) -> Result<(), HarvestError> {
    if let Some(store) = store {
        let path = store.write(href, STRUCTURED_EXTENSION, Some(tag), json).await?;
        info!(path = %path.display(), "Wrote extracted record");
    }
    Ok(())
}

/// Expands a listing into one link per cocktail, then the next page.
///
/// Children keep page order; the pagination link always comes last so a
/// page's cocktails are harvested before the following page.
pub(crate) fn expand_listing(
    component: &str,
    payload: &Payload,
    cocktail_page_type: &str,
    listing_page_type: &str,
) -> Result<Vec<Payload>, HarvestError> {
    let json = require_structured(component, payload)?;
    let listing: CocktailListing = serde_json::from_str(json).map_err(|e| {
        ValidationError::new(component, payload.link().href(), format!("malformed listing: {e}"))
    })?;

    info!(
        url = %payload.link().href(),
        cocktails = listing.cocktails.len(),
        has_next = listing.links.next.is_some(),
        "Expanding cocktail listing"
    );

    let mut children: Vec<Payload> = listing
        .cocktails
        .into_iter()
        .map(|c| Payload::new(Link::external(c.url, cocktail_page_type)))
        .collect();
    if let Some(next) = listing.links.next {
        children.push(Payload::new(Link::next(next, listing_page_type)));
    }
    Ok(children)
}
