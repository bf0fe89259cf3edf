//! Error types for the harvest pipeline.
//!
//! Every failure is fatal for the current run: the engine never recovers
//! locally, it propagates the first error up to the caller of `run`.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// A convenience alias for `Result<T, HarvestError>`.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// The main error type for harvest operations.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The pipeline configuration is invalid.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A tag could not be resolved to a component.
    #[error("{0}")]
    Resolution(#[from] ResolutionError),

    /// No fetch strategy produced content for a link.
    #[error("{0}")]
    FetchExhausted(#[from] FetchExhaustedError),

    /// A collaborator received a payload it cannot handle.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The engine could not classify a payload.
    #[error("{0}")]
    PipelineState(#[from] PipelineStateError),

    /// A transport-level failure while fetching a locator.
    #[error("Network error for {locator}: {message}")]
    Network {
        /// The locator being fetched.
        locator: String,
        /// The underlying failure.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvestError {
    /// Creates a network error.
    #[must_use]
    pub fn network(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::Resolution(_) => "ResolutionError",
            Self::FetchExhausted(_) => "FetchExhaustedError",
            Self::Validation(_) => "ValidationError",
            Self::PipelineState(_) => "PipelineStateError",
            Self::Network { .. } => "NetworkError",
            Self::Serialization(_) => "SerializationError",
            Self::Io(_) => "IoError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error raised when a `PipelineConfig` fails validation.
#[derive(Debug, Clone, Error, Serialize)]
#[error("Invalid configuration: {message}")]
pub struct ConfigurationError {
    /// The error message.
    pub message: String,
    /// The offending field, if known.
    pub field: Option<String>,
}

impl ConfigurationError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    /// Sets the offending field.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Errors raised by the component registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The tag has no entry in the configured mapping.
    #[error("Unexpected {capability} tag: {tag}")]
    UnmappedTag {
        /// The capability being resolved (e.g. "extractor").
        capability: String,
        /// The tag that was looked up.
        tag: String,
    },

    /// The mapping names an identifier nothing registered.
    #[error("No {capability} registered as '{identifier}' (mapped from tag: {tag})")]
    UnregisteredComponent {
        /// The capability being resolved.
        capability: String,
        /// The tag that was looked up.
        tag: String,
        /// The identifier the tag mapped to.
        identifier: String,
    },
}

impl ResolutionError {
    /// Creates an unmapped tag error.
    #[must_use]
    pub fn unmapped(capability: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnmappedTag {
            capability: capability.into(),
            tag: tag.into(),
        }
    }

    /// Creates an unregistered component error.
    #[must_use]
    pub fn unregistered(
        capability: impl Into<String>,
        tag: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self::UnregisteredComponent {
            capability: capability.into(),
            tag: tag.into(),
            identifier: identifier.into(),
        }
    }

    /// The tag that failed to resolve.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::UnmappedTag { tag, .. } | Self::UnregisteredComponent { tag, .. } => tag,
        }
    }
}

/// Error raised when every fetch strategy came back without content.
#[derive(Debug, Clone, Error)]
#[error("Unable to fetch content for {href} from any source in the fetch sequence ({})", .attempted.join(", "))]
pub struct FetchExhaustedError {
    /// The locator of the link.
    pub href: String,
    /// The strategies that were tried, in order.
    pub attempted: Vec<String>,
}

impl FetchExhaustedError {
    /// Creates a new fetch exhausted error.
    #[must_use]
    pub fn new(href: impl Into<String>, attempted: Vec<String>) -> Self {
        Self {
            href: href.into(),
            attempted,
        }
    }
}

/// Error raised by a collaborator handed a payload it cannot process.
#[derive(Debug, Clone, Error)]
#[error("{component} rejected payload for {href}: {message}")]
pub struct ValidationError {
    /// The rejecting component.
    pub component: String,
    /// The locator of the payload's link.
    pub href: String,
    /// What was wrong.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(
        component: impl Into<String>,
        href: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            href: href.into(),
            message: message.into(),
        }
    }
}

/// Error raised when a payload matches none of the engine's states.
#[derive(Debug, Clone, Error)]
#[error(
    "Unexpected payload for {href}: has_content={has_content}, content_type={content_type:?}, is_complete={is_complete}"
)]
pub struct PipelineStateError {
    /// The locator of the payload's link.
    pub href: String,
    /// Whether the payload carried content.
    pub has_content: bool,
    /// The payload's content type, if any.
    pub content_type: Option<String>,
    /// The payload's completion flag.
    pub is_complete: bool,
}
