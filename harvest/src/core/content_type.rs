//! Classification of content type tags.
//!
//! Tags are not strict MIME types: page-type tags such as
//! `text/vnd.wikipedia.cocktail-list+html` double as markup kinds, and
//! schema tags such as `application/vnd.harvest.iba-cocktail+json` double
//! as structured kinds.

use serde::{Deserialize, Serialize};

/// Generic markup content type.
pub const TEXT_HTML: &str = "text/html";

/// Generic structured content type.
pub const APPLICATION_JSON: &str = "application/json";

/// The broad kind of content a tag describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Raw markup waiting for an extractor.
    Markup,
    /// Structured data waiting for an expander.
    Structured,
}

impl ContentKind {
    /// Classifies a content type tag, returning `None` for unknown kinds.
    #[must_use]
    pub fn classify(content_type: Option<&str>) -> Option<Self> {
        let content_type = content_type?;
        if is_markup_content_type(content_type) {
            Some(Self::Markup)
        } else if is_structured_content_type(content_type) {
            Some(Self::Structured)
        } else {
            None
        }
    }
}

/// Whether the tag names markup (generic or vendor specific HTML).
#[must_use]
pub fn is_markup_content_type(content_type: &str) -> bool {
    content_type.starts_with(TEXT_HTML)
        || content_type.starts_with("application/xhtml")
        || (content_type.starts_with("text") && content_type.ends_with("+html"))
}

/// Whether the tag names structured data (generic or vendor specific JSON).
#[must_use]
pub fn is_structured_content_type(content_type: &str) -> bool {
    content_type.starts_with(APPLICATION_JSON)
        || (content_type.starts_with("application/vnd") && content_type.ends_with("+json"))
}

/// Builds the vendor schema tag used by the built-in extractors.
#[must_use]
pub fn vendor_schema(name: &str) -> String {
    format!("application/vnd.harvest.{name}+json")
}

/// Content type a freshly fetched page carries.
///
/// Page-type tags that already name a markup kind are kept so extractors
/// can tell vendor markup apart; anything else becomes `text/html`.
#[must_use]
pub fn markup_type_for(page_type: &str) -> String {
    if is_markup_content_type(page_type) {
        page_type.to_string()
    } else {
        TEXT_HTML.to_string()
    }
}
