//! Fetch strategies and the chain that tries them in order.
//!
//! This module provides:
//! - The closed set of fetch strategy tags
//! - A persistent-store reader, a network fetcher and a canned-response fetcher
//! - The fallback chain used by the engine for link-only payloads

mod canned;
mod chain;
#[cfg(feature = "network")]
mod network;
mod store;

pub use canned::CannedResponseFetcher;
pub use chain::FetchChain;
#[cfg(feature = "network")]
pub use network::NetworkFetcher;
pub use store::PersistentStoreFetcher;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup file extension used by the fetch strategies.
pub const MARKUP_EXTENSION: &str = "html";

/// The recognized fetch strategy tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchStrategyKind {
    /// Reads previously stored markup.
    #[serde(rename = "persistent-store", alias = "file")]
    PersistentStore,
    /// Fetches over HTTP.
    #[serde(rename = "network", alias = "web")]
    Network,
    /// Serves canned markup, for tests and demos.
    #[serde(rename = "canned-response", alias = "mock")]
    CannedResponse,
}

impl FetchStrategyKind {
    /// The configuration tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersistentStore => "persistent-store",
            Self::Network => "network",
            Self::CannedResponse => "canned-response",
        }
    }
}

impl fmt::Display for FetchStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_tags() {
        let kinds: Vec<FetchStrategyKind> =
            serde_json::from_str(r#"["persistent-store", "network", "canned-response", "file", "web"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                FetchStrategyKind::PersistentStore,
                FetchStrategyKind::Network,
                FetchStrategyKind::CannedResponse,
                FetchStrategyKind::PersistentStore,
                FetchStrategyKind::Network,
            ]
        );
        assert_eq!(serde_json::to_string(&FetchStrategyKind::CannedResponse).unwrap(), r#""canned-response""#);
        assert_eq!(FetchStrategyKind::Network.to_string(), "network");
    }

    #[test]
    fn test_unknown_strategy_tag() {
        assert!(serde_json::from_str::<FetchStrategyKind>(r#""ftp""#).is_err());
    }
}
