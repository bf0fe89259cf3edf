//! Markup fixtures and persistent-store seeding.
//!
//! Fixtures use the demo catalog's markup so they can be harvested with the
//! built-in demo collaborators.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::artifacts::build_raw_filename;
use crate::config::PipelineConfig;
use crate::core::content_type::vendor_schema;
use crate::fetch::{FetchStrategyKind, MARKUP_EXTENSION};
use crate::sites::demo;

/// Page-type tag used for fixture entry links.
pub const LISTING_PAGE_TYPE: &str = "list";

/// A listing page of `(name, href)` entries with an optional next page.
#[must_use]
pub fn listing_markup(entries: &[(&str, &str)], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><div class=\"cocktails\"><ul>");
    for (name, href) in entries {
        let _ = write!(html, "<li class=\"cocktail\"><a href=\"{href}\">{name}</a></li>");
    }
    html.push_str("</ul></div><div class=\"nav\">");
    if let Some(next) = next {
        let _ = write!(html, "<a class=\"next\" href=\"{next}\">Next</a>");
    }
    html.push_str("</div></body></html>");
    html
}

/// A recipe page named `name` with the given ingredients.
#[must_use]
pub fn recipe_markup(name: &str, ingredients: &[&str]) -> String {
    let mut html = format!("<html><body><div class=\"cocktail\"><h2>{name}</h2><ul class=\"ingredients\">");
    for ingredient in ingredients {
        let _ = write!(html, "<li>{ingredient}</li>");
    }
    html.push_str("</ul><ul class=\"instructions\"><li>Stir.</li></ul></div></body></html>");
    html
}

/// Writes `markup` where the persistent-store strategy will look for `href`.
///
/// # Errors
///
/// Returns any I/O error raised while writing.
pub fn seed_store(root: &Path, href: &str, markup: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    let path = root.join(build_raw_filename(href, MARKUP_EXTENSION, None, None));
    std::fs::write(&path, markup)?;
    Ok(path)
}

/// A configuration reading fixtures from `html_root_dir` with the demo
/// collaborators, entry pages tagged [`LISTING_PAGE_TYPE`].
#[must_use]
pub fn fixture_config(html_root_dir: &Path) -> PipelineConfig {
    PipelineConfig::new()
        .with_html_root_dir(html_root_dir.to_string_lossy())
        .with_structured_root_dir("")
        .with_fetch_sequence([FetchStrategyKind::PersistentStore])
        .with_extractor(LISTING_PAGE_TYPE, demo::LISTING_EXTRACTOR)
        .with_extractor(demo::LISTING_PAGE_TYPE, demo::LISTING_EXTRACTOR)
        .with_extractor(demo::COCKTAIL_PAGE_TYPE, demo::COCKTAIL_EXTRACTOR)
        .with_expander(vendor_schema(demo::LISTING_PAGE_TYPE), demo::LISTING_EXPANDER)
}
