//! Structured records produced by the built-in extractors.

use serde::{Deserialize, Serialize};

/// One cocktail card on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailSummary {
    /// Display name.
    pub name: String,
    /// Locator of the cocktail's own page.
    pub url: String,
    /// Catalog category, when the listing shows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Thumbnail locator, when the listing shows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

/// Pagination links of a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingLinks {
    /// The following listing page.
    #[serde(default)]
    pub next: Option<String>,
}

/// A parsed listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailListing {
    /// Cocktails in page order.
    pub cocktails: Vec<CocktailSummary>,
    /// Pagination.
    #[serde(default)]
    pub links: ListingLinks,
}

/// A parsed cocktail recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailRecord {
    /// Cocktail name, when the page states it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ingredient lines.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Method steps.
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Garnish lines.
    #[serde(default)]
    pub garnishes: Vec<String>,
}

/// One entry of an index page that groups cocktails under headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedCocktail {
    /// Display name.
    pub name: String,
    /// Locator of the cocktail's own page.
    pub url: String,
    /// Enclosing headings, outermost first.
    #[serde(default)]
    pub category: Vec<String>,
}

/// A parsed cocktail index, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailIndex {
    /// Entries sorted by name.
    pub cocktails: Vec<CategorizedCocktail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_tolerates_missing_links() {
        let listing: CocktailListing =
            serde_json::from_str(r#"{"cocktails":[{"name":"Negroni","url":"https://example.test/negroni"}]}"#).unwrap();
        assert_eq!(listing.cocktails[0].category, None);
        assert_eq!(listing.links.next, None);
    }

    #[test]
    fn test_record_omits_absent_name() {
        let record = CocktailRecord {
            ingredients: vec!["1 oz Gin".to_string()],
            ..CocktailRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["ingredients"][0], "1 oz Gin");
    }
}
