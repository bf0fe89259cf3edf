//! Pipeline configuration.
//!
//! A `PipelineConfig` is loaded once at startup and read-only thereafter.

use crate::errors::{ConfigurationError, HarvestError};
use crate::fetch::FetchStrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Configuration for the harvesting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Directory where fetched markup is stored.
    #[serde(default = "default_html_root_dir")]
    pub html_root_dir: String,
    /// Directory where extracted structured records are stored.
    #[serde(default = "default_structured_root_dir", alias = "json_root_dir")]
    pub structured_root_dir: String,
    /// Fetch strategies to try, in order, for link-only payloads.
    #[serde(default = "default_fetch_sequence", alias = "read_sequence")]
    pub fetch_sequence: Vec<FetchStrategyKind>,
    /// Whether the network strategy persists what it fetched.
    #[serde(default = "default_true")]
    pub write_content: bool,
    /// Whether the network strategy backs up files before overwriting.
    #[serde(default)]
    pub write_backup: bool,
    /// Politeness delay after each successful network fetch.
    #[serde(default)]
    pub scrape_delay_ms: u64,
    /// Page-type tag to extractor identifier.
    #[serde(default, alias = "parser_map")]
    pub extractor_map: HashMap<String, String>,
    /// Schema tag to expander identifier.
    #[serde(default, alias = "transformer_map")]
    pub expander_map: HashMap<String, String>,
    /// HTTP client settings for the network strategy.
    #[serde(default)]
    pub network: NetworkConfig,
}

fn default_html_root_dir() -> String {
    "./data/html".to_string()
}

fn default_structured_root_dir() -> String {
    "./data/json".to_string()
}

fn default_fetch_sequence() -> Vec<FetchStrategyKind> {
    vec![FetchStrategyKind::PersistentStore]
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            html_root_dir: default_html_root_dir(),
            structured_root_dir: default_structured_root_dir(),
            fetch_sequence: default_fetch_sequence(),
            write_content: true,
            write_backup: false,
            scrape_delay_ms: 0,
            extractor_map: HashMap::new(),
            expander_map: HashMap::new(),
            network: NetworkConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Unknown fetch strategy tags are rejected while parsing.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            ConfigurationError::new(format!("failed to parse {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Loaded pipeline configuration");
        Ok(config)
    }

    /// Sets the markup storage root.
    #[must_use]
    pub fn with_html_root_dir(mut self, dir: impl Into<String>) -> Self {
        self.html_root_dir = dir.into();
        self
    }

    /// Sets the structured storage root.
    #[must_use]
    pub fn with_structured_root_dir(mut self, dir: impl Into<String>) -> Self {
        self.structured_root_dir = dir.into();
        self
    }

    /// Sets the fetch sequence.
    #[must_use]
    pub fn with_fetch_sequence(mut self, sequence: impl IntoIterator<Item = FetchStrategyKind>) -> Self {
        self.fetch_sequence = sequence.into_iter().collect();
        self
    }

    /// Maps a page-type tag to an extractor identifier.
    #[must_use]
    pub fn with_extractor(mut self, page_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.extractor_map.insert(page_type.into(), identifier.into());
        self
    }

    /// Maps a schema tag to an expander identifier.
    #[must_use]
    pub fn with_expander(mut self, schema: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.expander_map.insert(schema.into(), identifier.into());
        self
    }

    /// Gets the politeness delay as Duration.
    #[must_use]
    pub fn scrape_delay(&self) -> Duration {
        Duration::from_millis(self.scrape_delay_ms)
    }

    /// Checks the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`ConfigurationError`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.fetch_sequence.is_empty() {
            return Err(ConfigurationError::new("Fetch sequence cannot be empty.")
                .with_field("fetch_sequence"));
        }
        if self.extractor_map.is_empty() {
            return Err(ConfigurationError::new("Extractor map cannot be empty.")
                .with_field("extractor_map"));
        }
        if self.expander_map.is_empty() {
            return Err(ConfigurationError::new("Expander map cannot be empty.")
                .with_field("expander_map"));
        }
        if self.html_root_dir.trim().is_empty() {
            return Err(ConfigurationError::new("HTML root directory must be specified.")
                .with_field("html_root_dir"));
        }
        self.network.timeout()?;
        Ok(())
    }
}

/// HTTP client settings for the network fetch strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> f64 {
    10.0
}

fn default_user_agent() -> String {
    concat!("harvest/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl NetworkConfig {
    /// Gets timeout as Duration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] unless the timeout is a positive
    /// number of seconds that fits in a [`Duration`].
    pub fn timeout(&self) -> Result<Duration, ConfigurationError> {
        let invalid = || {
            ConfigurationError::new(format!(
                "Network timeout must be a positive number of seconds, got {}.",
                self.timeout_seconds
            ))
            .with_field("network.timeout_seconds")
        };
        if self.timeout_seconds.is_nan() || self.timeout_seconds <= 0.0 {
            return Err(invalid());
        }
        Duration::try_from_secs_f64(self.timeout_seconds).map_err(|_| invalid())
    }
}
