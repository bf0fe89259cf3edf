//! Links to remote or local content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relation tag for entry points and discovered items.
pub const REL_EXTERNAL: &str = "external";

/// Relation tag for pagination links.
pub const REL_NEXT: &str = "next";

/// A locator plus the page-type tag describing what it points to.
///
/// Links are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    href: String,
    rel: String,
    content_type: String,
}

impl Link {
    /// Creates a new link.
    #[must_use]
    pub fn new(
        href: impl Into<String>,
        rel: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates an `external` link.
    #[must_use]
    pub fn external(href: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::new(href, REL_EXTERNAL, content_type)
    }

    /// Creates a `next` (pagination) link.
    #[must_use]
    pub fn next(href: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::new(href, REL_NEXT, content_type)
    }

    /// The locator.
    #[must_use]
    pub fn href(&self) -> &str {
        &self.href
    }

    /// The relation tag.
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// The page-type tag.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, rel={})", self.href, self.content_type, self.rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_constructors() {
        let link = Link::external("https://example.test/list", "list");
        assert_eq!(link.href(), "https://example.test/list");
        assert_eq!(link.rel(), REL_EXTERNAL);
        assert_eq!(link.content_type(), "list");

        let next = Link::next("https://example.test/list/page/2", "list");
        assert_eq!(next.rel(), REL_NEXT);
    }

    #[test]
    fn test_link_serde() {
        let link = Link::external("https://example.test/a", "item");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["href"], "https://example.test/a");
        assert_eq!(json["rel"], "external");

        let back: Link = serde_json::from_value(json).unwrap();
        assert_eq!(back, link);
    }
}
