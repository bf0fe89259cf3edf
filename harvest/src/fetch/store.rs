//! Reads previously stored markup.

use async_trait::async_trait;
use tracing::info;

use super::MARKUP_EXTENSION;
use crate::artifacts::ArtifactStore;
use crate::components::Fetcher;
use crate::core::content_type::markup_type_for;
use crate::core::Payload;
use crate::errors::HarvestError;

/// Loads markup from the storage root instead of the network.
///
/// A missing file is reported as "no content", not as an error.
#[derive(Debug, Clone)]
pub struct PersistentStoreFetcher {
    store: ArtifactStore,
}

impl PersistentStoreFetcher {
    /// Creates a fetcher reading from `html_root_dir`.
    #[must_use]
    pub fn new(html_root_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            store: ArtifactStore::new(html_root_dir),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }
}

#[async_trait]
impl Fetcher for PersistentStoreFetcher {
    async fn fetch(&self, payload: &Payload) -> Result<Payload, HarvestError> {
        let link = payload.link();
        info!(url = %link.href(), "Fetching content from persistent store");

        match self.store.read(link.href(), MARKUP_EXTENSION, None).await? {
            Some(html) => Ok(Payload::fetched(
                link.clone(),
                html,
                markup_type_for(link.content_type()),
            )),
            None => Ok(Payload::new(link.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Link;

    #[tokio::test]
    async fn test_reads_stored_markup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("example-test-list.html"), "<ul></ul>").unwrap();

        let fetcher = PersistentStoreFetcher::new(dir.path());
        let payload = Payload::new(Link::external("https://example.test/list/", "list"));
        let fetched = fetcher.fetch(&payload).await.unwrap();

        assert_eq!(fetched.content(), Some("<ul></ul>"));
        assert_eq!(fetched.content_type(), Some("text/html"));
        assert_eq!(fetched.link(), payload.link());
    }

    #[tokio::test]
    async fn test_missing_file_is_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = PersistentStoreFetcher::new(dir.path());
        let payload = Payload::new(Link::external("https://example.test/missing", "list"));

        let fetched = fetcher.fetch(&payload).await.unwrap();
        assert_eq!(fetched.content(), None);
        assert!(!fetched.is_complete());
    }

    #[tokio::test]
    async fn test_keeps_vendor_markup_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("example-test-wiki.html"), "<div></div>").unwrap();

        let fetcher = PersistentStoreFetcher::new(dir.path());
        let payload = Payload::new(Link::external(
            "https://example.test/wiki",
            "text/vnd.wikipedia.cocktail-list+html",
        ));
        let fetched = fetcher.fetch(&payload).await.unwrap();
        assert_eq!(fetched.content_type(), Some("text/vnd.wikipedia.cocktail-list+html"));
    }
}
