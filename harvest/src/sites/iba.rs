//! Collaborators for the IBA cocktail catalog (iba-world.com).
//!
//! Listing pages (`iba-all-cocktails`) show cocktail cards and a pagination
//! link; cocktail pages (`iba-cocktail`) hold the recipe in
//! `div.elementor-shortcode` blocks.

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, warn};

use super::records::{CocktailListing, CocktailRecord, CocktailSummary, ListingLinks};
use super::{expand_listing, selector, text_of, write_through};
use crate::artifacts::ArtifactStore;
use crate::components::{require_markup, Expander, Extractor};
use crate::core::content_type::vendor_schema;
use crate::core::Payload;
use crate::errors::{HarvestError, ValidationError};

/// Page-type tag of listing pages.
pub const LIST_PAGE_TYPE: &str = "iba-all-cocktails";
/// Page-type tag of cocktail pages.
pub const COCKTAIL_PAGE_TYPE: &str = "iba-cocktail";

/// Registry identifier of [`IbaCocktailListExtractor`].
pub const LIST_EXTRACTOR: &str = "harvest::sites::iba::IbaCocktailListExtractor";
/// Registry identifier of [`IbaCocktailExtractor`].
pub const COCKTAIL_EXTRACTOR: &str = "harvest::sites::iba::IbaCocktailExtractor";
/// Registry identifier of [`IbaCocktailListExpander`].
pub const LIST_EXPANDER: &str = "harvest::sites::iba::IbaCocktailListExpander";

/// Schema tag of extracted listings.
#[must_use]
pub fn list_schema() -> String {
    vendor_schema(LIST_PAGE_TYPE)
}

/// Schema tag of extracted cocktails.
#[must_use]
pub fn cocktail_schema() -> String {
    vendor_schema(COCKTAIL_PAGE_TYPE)
}

/// Extracts cocktail cards and the next-page link from a listing page.
#[derive(Debug, Clone, Default)]
pub struct IbaCocktailListExtractor {
    store: Option<ArtifactStore>,
}

impl IbaCocktailListExtractor {
    const NAME: &'static str = "IbaCocktailListExtractor";

    /// Creates the extractor, writing through to `store` when given.
    #[must_use]
    pub fn new(store: Option<ArtifactStore>) -> Self {
        Self { store }
    }

    fn parse(href: &str, html: &str) -> Result<CocktailListing, ValidationError> {
        let document = Html::parse_document(html);
        let card = selector(Self::NAME, href, "div.cocktail")?;
        let heading = selector(Self::NAME, href, "h2")?;
        let anchor = selector(Self::NAME, href, "a")?;
        let category = selector(Self::NAME, href, "div.cocktail-category")?;
        let image = selector(Self::NAME, href, "img")?;
        let next = selector(Self::NAME, href, "a.next")?;

        let mut cocktails = Vec::new();
        for element in document.select(&card) {
            let Some(name) = element.select(&heading).next().map(text_of) else {
                warn!(url = %href, "Skipping cocktail card without a name");
                continue;
            };
            let Some(url) = element
                .select(&anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                warn!(url = %href, cocktail = %name, "Skipping cocktail card without a link");
                continue;
            };

            cocktails.push(CocktailSummary {
                name,
                url: url.to_string(),
                category: element.select(&category).next().map(text_of),
                picture_url: element
                    .select(&image)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .map(str::to_string),
            });
        }

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
impl Extractor for IbaCocktailListExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let html = require_markup(Self::NAME, payload)?;
        let href = payload.link().href();
        info!(url = %href, "Extracting IBA cocktail list page");

        let listing = Self::parse(href, html)?;
        let json = serde_json::to_string(&listing)?;
        write_through(self.store.as_ref(), href, LIST_PAGE_TYPE, &json).await?;

        Ok(Payload::extracted(payload.link().clone(), json, list_schema()))
    }
}

/// Extracts the recipe from a cocktail page. Cocktail pages are leaves.
#[derive(Debug, Clone, Default)]
pub struct IbaCocktailExtractor {
    store: Option<ArtifactStore>,
}

impl IbaCocktailExtractor {
    const NAME: &'static str = "IbaCocktailExtractor";

    /// Creates the extractor, writing through to `store` when given.
    #[must_use]
    pub fn new(store: Option<ArtifactStore>) -> Self {
        Self { store }
    }

    fn parse(href: &str, html: &str) -> Result<CocktailRecord, ValidationError> {
        let document = Html::parse_document(html);
        let block = selector(Self::NAME, href, "div.elementor-shortcode")?;
        let list = selector(Self::NAME, href, "ul")?;
        let item = selector(Self::NAME, href, "li")?;
        let paragraph = selector(Self::NAME, href, "p")?;

        let mut record = CocktailRecord::default();
        for element in document.select(&block) {
            if let Some(ul) = element.select(&list).next() {
                record.ingredients.extend(ul.select(&item).map(text_of));
            }

            let paragraphs: Vec<String> = element.select(&paragraph).map(text_of).collect();
            if paragraphs.is_empty() {
                continue;
            }
            // The first block of paragraphs is the method; later ones are garnish.
            if record.instructions.is_empty() {
                record.instructions = paragraphs;
            } else {
                record.garnishes.extend(paragraphs);
            }
        }
        Ok(record)
    }
}

#[async_trait]
impl Extractor for IbaCocktailExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let html = require_markup(Self::NAME, payload)?;
        let href = payload.link().href();
        info!(url = %href, "Extracting IBA cocktail page");

        let record = Self::parse(href, html)?;
        let json = serde_json::to_string(&record)?;
        write_through(self.store.as_ref(), href, COCKTAIL_PAGE_TYPE, &json).await?;

        Ok(Payload::complete(payload.link().clone(), json, cocktail_schema()))
    }
}

/// Turns an extracted listing into cocktail links plus the next page.
#[derive(Debug, Clone, Copy, Default)]
pub struct IbaCocktailListExpander;

impl Expander for IbaCocktailListExpander {
    fn expand(&self, payload: &Payload) -> Result<Vec<Payload>, HarvestError> {
        expand_listing("IbaCocktailListExpander", payload, COCKTAIL_PAGE_TYPE, LIST_PAGE_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Link, PayloadState};
    use pretty_assertions::assert_eq;

    const LIST_PAGE: &str = r#"
        <html><body>
        <div class="cocktail">
          <a href="https://iba-world.com/iba-cocktail/aviation/">
            <img src="https://iba-world.com/img/aviation.jpg">
            <h2>Aviation</h2>
          </a>
          <div class="cocktail-category"> The Unforgettables </div>
        </div>
        <div class="cocktail">
          <a href="https://iba-world.com/iba-cocktail/bellini/"><h2>Bellini</h2></a>
        </div>
        <a class="next" href="https://iba-world.com/cocktails/all-cocktails/page/2/">Next</a>
        </body></html>
    "#;

    const COCKTAIL_PAGE: &str = r#"
        <html><body>
        <div class="elementor-shortcode"><ul><li>45 ml Gin</li><li>15 ml Maraschino</li></ul></div>
        <div class="elementor-shortcode"><p>Shake and strain.</p></div>
        <div class="elementor-shortcode"><p>Maraschino cherry.</p></div>
        </body></html>
    "#;

    fn list_payload(html: &str) -> Payload {
        Payload::fetched(
            Link::external("https://iba-world.com/cocktails/all-cocktails/", LIST_PAGE_TYPE),
            html,
            "text/html",
        )
    }

    #[tokio::test]
    async fn test_list_extraction() {
        let extracted = IbaCocktailListExtractor::default()
            .extract(&list_payload(LIST_PAGE))
            .await
            .unwrap();
        assert!(matches!(extracted.state().unwrap(), PayloadState::Structured { .. }));
        assert_eq!(extracted.content_type(), Some("application/vnd.harvest.iba-all-cocktails+json"));

        let listing: CocktailListing = serde_json::from_str(extracted.content().unwrap()).unwrap();
        assert_eq!(
            listing.cocktails[0],
            CocktailSummary {
                name: "Aviation".to_string(),
                url: "https://iba-world.com/iba-cocktail/aviation/".to_string(),
                category: Some("The Unforgettables".to_string()),
                picture_url: Some("https://iba-world.com/img/aviation.jpg".to_string()),
            }
        );
        assert_eq!(listing.cocktails[1].category, None);
        assert_eq!(
            listing.links.next.as_deref(),
            Some("https://iba-world.com/cocktails/all-cocktails/page/2/")
        );
    }

    #[tokio::test]
    async fn test_list_extraction_requires_markup() {
        let payload = Payload::extracted(
            Link::external("https://iba-world.com/cocktails/all-cocktails/", LIST_PAGE_TYPE),
            "{}",
            "application/json",
        );
        let err = IbaCocktailListExtractor::default().extract(&payload).await.unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[tokio::test]
    async fn test_incomplete_cards_are_skipped() {
        let html = r#"
            <div class="cocktail"><h2>Orphan</h2></div>
            <div class="cocktail"><a href="https://iba-world.com/iba-cocktail/nameless/"></a></div>
            <div class="cocktail"><a href="https://iba-world.com/iba-cocktail/bellini/"><h2>Bellini</h2></a></div>
        "#;
        let extracted = IbaCocktailListExtractor::default()
            .extract(&list_payload(html))
            .await
            .unwrap();

        let listing: CocktailListing = serde_json::from_str(extracted.content().unwrap()).unwrap();
        let names: Vec<&str> = listing.cocktails.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bellini"]);
    }

    #[tokio::test]
    async fn test_cocktail_extraction_is_terminal() {
        let payload = Payload::fetched(
            Link::external("https://iba-world.com/iba-cocktail/aviation/", COCKTAIL_PAGE_TYPE),
            COCKTAIL_PAGE,
            "text/html",
        );
        let extracted = IbaCocktailExtractor::default().extract(&payload).await.unwrap();
        assert!(extracted.is_complete());

        let record: CocktailRecord = serde_json::from_str(extracted.content().unwrap()).unwrap();
        assert_eq!(record.ingredients, vec!["45 ml Gin", "15 ml Maraschino"]);
        assert_eq!(record.instructions, vec!["Shake and strain."]);
        assert_eq!(record.garnishes, vec!["Maraschino cherry."]);
    }

    #[tokio::test]
    async fn test_write_through_uses_page_type_tag() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = IbaCocktailListExtractor::new(Some(ArtifactStore::new(dir.path())));
        extractor.extract(&list_payload(LIST_PAGE)).await.unwrap();

        let written = dir.path().join("iba-world-com-cocktails-all-cocktails.iba-all-cocktails.json");
        let listing: CocktailListing =
            serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
        assert_eq!(listing.cocktails.len(), 2);
    }

    #[tokio::test]
    async fn test_list_round_through_expander() {
        let extracted = IbaCocktailListExtractor::default()
            .extract(&list_payload(LIST_PAGE))
            .await
            .unwrap();
        let children = IbaCocktailListExpander.expand(&extracted).unwrap();

        assert_eq!(children.len(), 3);
        assert_eq!(children[0].link().content_type(), COCKTAIL_PAGE_TYPE);
        assert_eq!(children[2].link().rel(), "next");
        assert_eq!(children[2].link().content_type(), LIST_PAGE_TYPE);
    }
}
