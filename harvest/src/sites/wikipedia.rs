//! Collaborators for the Wikipedia list of cocktails.
//!
//! The list page nests nothing: headings and lists follow each other as
//! siblings, so the category of a list is whatever headings preceded it.
//! The extractor walks the content in document order and keeps that
//! heading stack itself. The page is a leaf; its output is complete.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::records::{CategorizedCocktail, CocktailIndex};
use super::{selector, write_through};
use crate::artifacts::ArtifactStore;
use crate::components::{require_markup, Extractor};
use crate::core::content_type::vendor_schema;
use crate::core::Payload;
use crate::errors::{HarvestError, ValidationError};

/// Entry locator of the list page.
pub const ENTRY_URL: &str = "https://en.wikipedia.org/wiki/List_of_cocktails";

/// Page-type tag of the list page.
pub const LIST_PAGE_TYPE: &str = "text/vnd.wikipedia.cocktail-list+html";

/// Write-through tag and schema name of the extracted list.
pub const LIST_TAG: &str = "wikipedia-all-cocktails";

/// Registry identifier of [`WikipediaCocktailListExtractor`].
pub const LIST_EXTRACTOR: &str = "harvest::sites::wikipedia::WikipediaCocktailListExtractor";

const ORIGIN: &str = "https://en.wikipedia.org";

/// Heading of the first section that no longer lists cocktails.
const LAST_SECTION: &str = "Historical classes of cocktails";

/// Linked ingredients that sit in the same lists as the cocktails.
const INGREDIENTS_TO_IGNORE: [&str; 5] = ["cachaça", "Port wine", "Sherry", "Vermouth", "advocaat"];

/// Schema tag of the extracted list.
#[must_use]
pub fn list_schema() -> String {
    vendor_schema(LIST_TAG)
}

/// Extracts every cocktail on the list page with its heading path.
#[derive(Debug, Clone, Default)]
pub struct WikipediaCocktailListExtractor {
    store: Option<ArtifactStore>,
}

impl WikipediaCocktailListExtractor {
    const NAME: &'static str = "WikipediaCocktailListExtractor";

    /// Creates the extractor, writing through to `store` when given.
    #[must_use]
    pub fn new(store: Option<ArtifactStore>) -> Self {
        Self { store }
    }

    fn parse(href: &str, html: &str) -> Result<CocktailIndex, ValidationError> {
        let document = Html::parse_document(html);
        let content = selector(Self::NAME, href, "div.mw-parser-output")?;
        let anchor = selector(Self::NAME, href, "a")?;

        // Outermost content blocks only; nested ones are walked with their parent.
        let roots: Vec<ElementRef<'_>> = document
            .select(&content)
            .filter(|root| {
                !root
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|ancestor| content.matches(&ancestor))
            })
            .collect();
        if roots.is_empty() {
            return Err(ValidationError::new(Self::NAME, href, "page has no article content"));
        }

        let mut category: Vec<String> = Vec::new();
        let mut cocktails: Vec<CategorizedCocktail> = Vec::new();
        let mut stack: Vec<ElementRef<'_>> = Vec::new();
        for root in roots.into_iter().rev() {
            push_children(&mut stack, root);
        }

        while let Some(element) = stack.pop() {
            let name = element.value().name();
            if let Some(level) = heading_level(name) {
                let heading = normalized_text(element);
                if heading == LAST_SECTION {
                    debug!(url = %href, "Reached the end of the cocktail sections");
                    break;
                }
                // A level-n heading sits n-1 deep; h1 and h2 both start over.
                category.truncate(level.saturating_sub(2));
                category.push(heading);
            } else if name == "ul" || name == "ol" {
                cocktails.extend(list_entries(element, &anchor, &category));
            } else {
                push_children(&mut stack, element);
            }
        }

        cocktails.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(CocktailIndex { cocktails })
    }
}

#[async_trait]
impl Extractor for WikipediaCocktailListExtractor {
    async fn extract(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let html = require_markup(Self::NAME, payload)?;
        let href = payload.link().href();
        info!(url = %href, "Extracting Wikipedia cocktail list page");

        let index = Self::parse(href, html)?;
        info!(url = %href, cocktails = index.cocktails.len(), "Parsed Wikipedia cocktail list");
        let json = serde_json::to_string(&index)?;
        write_through(self.store.as_ref(), href, LIST_TAG, &json).await?;

        Ok(Payload::complete(payload.link().clone(), json, list_schema()))
    }
}

/// Pushes the element children of `element` so they pop in document order.
fn push_children<'a>(stack: &mut Vec<ElementRef<'a>>, element: ElementRef<'a>) {
    let children: Vec<ElementRef<'a>> = element.children().filter_map(ElementRef::wrap).collect();
    stack.extend(children.into_iter().rev());
}

fn heading_level(name: &str) -> Option<usize> {
    name.strip_prefix('h')
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|level| (1..=6).contains(level))
}

fn normalized_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{ORIGIN}{href}")
    }
}

/// Entries from the anchors of a list's own items. Galleries hold no entries.
fn list_entries(list: ElementRef<'_>, anchor: &Selector, category: &[String]) -> Vec<CategorizedCocktail> {
    if list.value().classes().any(|class| class == "gallery") {
        return Vec::new();
    }

    let mut entries = Vec::new();
    let items = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li");
    for item in items {
        for link in item.select(anchor) {
            let name = normalized_text(link);
            if INGREDIENTS_TO_IGNORE.contains(&name.as_str()) {
                continue;
            }
            let Some(target) = link.value().attr("href") else {
                debug!(name = %name, "Skipping anchor without a target");
                continue;
            };
            entries.push(CategorizedCocktail {
                name,
                url: absolute_url(target),
                category: category.to_vec(),
            });
        }
    }
    entries
}
