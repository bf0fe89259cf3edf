//! An offline demo catalog.
//!
//! Three listing pages and five recipes, served by the canned-response
//! fetch strategy, so a whole harvest can run without network access.

use async_trait::async_trait;
use scraper::Html;
use tracing::info;

use super::records::{CocktailListing, CocktailRecord, CocktailSummary, ListingLinks};
use super::{expand_listing, selector, text_of, write_through};
use crate::artifacts::ArtifactStore;
use crate::components::{require_markup, Expander, Extractor};
use crate::config::PipelineConfig;
use crate::core::content_type::vendor_schema;
use crate::core::Payload;
use crate::errors::{HarvestError, ValidationError};
use crate::fetch::{CannedResponseFetcher, FetchStrategyKind};

/// Entry locator of the demo catalog.
pub const ENTRY_URL: &str = "https://www.example.com/all-cocktails";

/// Page-type tag of listing pages.
pub const LISTING_PAGE_TYPE: &str = "demo-all-cocktails";
/// Page-type tag of recipe pages.
pub const COCKTAIL_PAGE_TYPE: &str = "demo-cocktail";

/// Registry identifier of [`DemoListingExtractor`].
pub const LISTING_EXTRACTOR: &str = "harvest::sites::demo::DemoListingExtractor";
/// Registry identifier of [`DemoCocktailExtractor`].
pub const COCKTAIL_EXTRACTOR: &str = "harvest::sites::demo::DemoCocktailExtractor";
/// Registry identifier of [`DemoListingExpander`].
pub const LISTING_EXPANDER: &str = "harvest::sites::demo::DemoListingExpander";

const ALL_COCKTAILS: &str = r#"<html><body>
<div class="cocktails">
<ul>
  <li class="cocktail"><a href="https://www.example.com/manhattan">Manhattan</a></li>
  <li class="cocktail"><a href="https://www.example.com/margarita">Margarita</a></li>
  <li class="cocktail"><a href="https://www.example.com/negroni">Negroni</a></li>
</ul>
</div>
<div class="nav">
  <a class="next" href="https://www.example.com/all-cocktails/page/2">Next</a>
</div>
</body></html>"#;

const ALL_COCKTAILS_PAGE_2: &str = r#"<html><body>
<div class="cocktails">
<ul>
  <li class="cocktail"><a href="https://www.example.com/old-fashioned">Old Fashioned</a></li>
</ul>
</div>
<div class="nav">
  <a class="next" href="https://www.example.com/all-cocktails/page/3">Next</a>
</div>
</body></html>"#;

const ALL_COCKTAILS_PAGE_3: &str = r#"<html><body>
<div class="cocktails">
<ul>
  <li class="cocktail"><a href="https://www.example.com/paper-plane">Paper Plane</a></li>
</ul>
</div>
<div class="nav"></div>
</body></html>"#;

const MANHATTAN: &str = r#"<html><body>
<div class="cocktail">
<h2>Manhattan</h2>
<ul class="ingredients">
  <li>1 1/2 oz Bourbon</li>
  <li>3/4 oz Sweet Vermouth</li>
  <li>2 dashes Angostura Bitters</li>
</ul>
<ul class="instructions">
  <li>Pour all ingredients into mixing glass with ice cubes.</li>
  <li>Stir well.</li>
  <li>Strain into a chilled cocktail glass.</li>
</ul>
<p class="garnish">Garnish with cocktail cherry.</p>
</div>
</body></html>"#;

const MARGARITA: &str = r#"<html><body>
<div class="cocktail">
<h2>Margarita</h2>
<ul class="ingredients">
  <li>50 ml Tequila 100% Agave</li>
  <li>20 ml Triple Sec</li>
  <li>15 ml Freshly Squeezed Lime Juice</li>
</ul>
<ul class="instructions">
  <li>Add all ingredients into a shaker with ice.</li>
  <li>Shake and strain into a chilled cocktail glass.</li>
</ul>
<p class="garnish">Half salt rim (optional).</p>
</div>
</body></html>"#;

const NEGRONI: &str = r#"<html><body>
<div class="cocktail">
<h2>Negroni</h2>
<ul class="ingredients">
  <li>1 oz Gin</li>
  <li>1 oz Campari</li>
  <li>1 oz Sweet Vermouth</li>
</ul>
<ul class="instructions">
  <li>Pour all ingredients directly into chilled old fashioned glass filled with ice.</li>
  <li>Stir gently.</li>
</ul>
<p class="garnish">Garnish with half orange slice.</p>
</div>
</body></html>"#;

const OLD_FASHIONED: &str = r#"<html><body>
<div class="cocktail">
<h2>Old Fashioned</h2>
<ul class="ingredients">
  <li>2 oz Bourbon or Rye</li>
  <li>1 Sugar Cube</li>
  <li>Few Dashes Angostura Bitters</li>
  <li>Few Dashes Plain Water</li>
</ul>
<ul class="instructions">
  <li>Place sugar cube in old fashioned glass and saturate with bitters, add a few dashes of plain water. Muddle until dissolved. Fill the glass with ice cubes and add whiskey.</li>
  <li>Stir gently.</li>
</ul>
<p class="garnish">Garnish with orange slice or zest, and a cocktail cherry.</p>
</div>
</body></html>"#;

const PAPER_PLANE: &str = r#"<html><body>
<div class="cocktail">
<h2>Paper Plane</h2>
<ul class="ingredients">
  <li>1 oz Bourbon</li>
  <li>1 oz Amaro Nonino</li>
  <li>1 oz Aperol</li>
  <li>1 oz Lemon Juice</li>
</ul>
<ul class="instructions">
  <li>Pour all ingredients into cocktail shaker, shake well with ice.</li>
  <li>Strain into chilled cocktail glass.</li>
</ul>
<p class="garnish">N/A</p>
</div>
</body></html>"#;

/// Every page of the demo catalog, keyed by locator.
#[must_use]
pub fn catalog() -> Vec<(&'static str, &'static str)> {
    vec![
        (ENTRY_URL, ALL_COCKTAILS),
        ("https://www.example.com/all-cocktails/page/2", ALL_COCKTAILS_PAGE_2),
        ("https://www.example.com/all-cocktails/page/3", ALL_COCKTAILS_PAGE_3),
        ("https://www.example.com/manhattan", MANHATTAN),
        ("https://www.example.com/margarita", MARGARITA),
        ("https://www.example.com/negroni", NEGRONI),
        ("https://www.example.com/old-fashioned", OLD_FASHIONED),
        ("https://www.example.com/paper-plane", PAPER_PLANE),
    ]
}

/// A canned-response fetcher serving the demo catalog.
#[must_use]
pub fn canned_fetcher() -> CannedResponseFetcher {
    CannedResponseFetcher::from_responses(catalog())
}

/// A configuration that harvests the demo catalog from memory.
#[must_use]
pub fn config() -> PipelineConfig {
    PipelineConfig::new()
        .with_structured_root_dir("")
        .with_fetch_sequence([FetchStrategyKind::CannedResponse])
        .with_extractor(LISTING_PAGE_TYPE, LISTING_EXTRACTOR)
        .with_extractor(COCKTAIL_PAGE_TYPE, COCKTAIL_EXTRACTOR)
        .with_expander(vendor_schema(LISTING_PAGE_TYPE), LISTING_EXPANDER)
}

/// Extracts the cocktail links and pagination of a demo listing page.
#[derive(Debug, Clone, Default)]
pub struct DemoListingExtractor {
    store: Option<ArtifactStore>,
}

impl DemoListingExtractor {
    const NAME: &'static str = "DemoListingExtractor";

    /// Creates the extractor, writing through to `store` when given.
    #[must_use]
    pub fn new(store: Option<ArtifactStore>) -> Self {
        Self { store }
    }

    fn parse(href: &str, html: &str) -> Result<CocktailListing, ValidationError> {
        let document = Html::parse_document(html);
        let entry = selector(Self::NAME, href, "li.cocktail a")?;
        let next = selector(Self::NAME, href, "div.nav a.next")?;

        let cocktails = document
            .select(&entry)
            .filter_map(|a| {
                a.value().attr("href").map(|url| CocktailSummary {
                    name: text_of(a),
                    url: url.to_string(),
                    category: None,
                    picture_url: None,
                })
            })
            .collect();
        let next = document
            .select(&next)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        Ok(CocktailListing {
            cocktails,
            links: ListingLinks { next },
        })
    }
}

#[async_trait]
impl Extractor for DemoListingExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let html = require_markup(Self::NAME, payload)?;
        let href = payload.link().href();
        info!(url = %href, "Extracting demo listing page");

        let listing = Self::parse(href, html)?;
        let json = serde_json::to_string(&listing)?;
        write_through(self.store.as_ref(), href, LISTING_PAGE_TYPE, &json).await?;

        Ok(Payload::extracted(
            payload.link().clone(),
            json,
            vendor_schema(LISTING_PAGE_TYPE),
        ))
    }
}

/// Extracts a demo recipe page into a terminal record.
#[derive(Debug, Clone, Default)]
pub struct DemoCocktailExtractor {
    store: Option<ArtifactStore>,
}

impl DemoCocktailExtractor {
    const NAME: &'static str = "DemoCocktailExtractor";

    /// Creates the extractor, writing through to `store` when given.
    #[must_use]
    pub fn new(store: Option<ArtifactStore>) -> Self {
        Self { store }
    }

    fn parse(href: &str, html: &str) -> Result<CocktailRecord, ValidationError> {
        let document = Html::parse_document(html);
        let name = selector(Self::NAME, href, "div.cocktail h2")?;
        let ingredient = selector(Self::NAME, href, "ul.ingredients li")?;
        let instruction = selector(Self::NAME, href, "ul.instructions li")?;
        let garnish = selector(Self::NAME, href, "p.garnish")?;

        Ok(CocktailRecord {
            name: document.select(&name).next().map(text_of),
            ingredients: document.select(&ingredient).map(text_of).collect(),
            instructions: document.select(&instruction).map(text_of).collect(),
            garnishes: document.select(&garnish).map(text_of).collect(),
        })
    }
}

#[async_trait]
impl Extractor for DemoCocktailExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let html = require_markup(Self::NAME, payload)?;
        let href = payload.link().href();
        info!(url = %href, "Extracting demo cocktail page");

        let record = Self::parse(href, html)?;
        let json = serde_json::to_string(&record)?;
        write_through(self.store.as_ref(), href, COCKTAIL_PAGE_TYPE, &json).await?;

        Ok(Payload::complete(
            payload.link().clone(),
            json,
            vendor_schema(COCKTAIL_PAGE_TYPE),
        ))
    }
}

/// Turns a demo listing into recipe links plus the next page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoListingExpander;

impl Expander for DemoListingExpander {
    fn expand(&self, payload: &Payload) -> Result<Vec<Payload>, HarvestError> {
        expand_listing("DemoListingExpander", payload, COCKTAIL_PAGE_TYPE, LISTING_PAGE_TYPE)
    }
}
