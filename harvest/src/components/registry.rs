//! Component registry resolving string tags to collaborator instances.

use super::protocols::{Expander, Extractor};
use crate::artifacts::ArtifactStore;
use crate::errors::{ConfigurationError, ResolutionError};
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// Names the capability a registry resolves, for logs and errors.
pub trait Capability {
    /// Human readable capability name.
    const NAME: &'static str;
}

impl Capability for dyn Extractor {
    const NAME: &'static str = "extractor";
}

impl Capability for dyn Expander {
    const NAME: &'static str = "expander";
}

/// Capabilities handed to every factory at construction time.
#[derive(Debug, Clone, Default)]
pub struct ComponentSettings {
    /// Where extractors write structured records, if anywhere.
    pub structured_store: Option<ArtifactStore>,
}

impl ComponentSettings {
    /// Creates settings with no write-through store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the structured write-through store.
    #[must_use]
    pub fn with_structured_store(mut self, store: ArtifactStore) -> Self {
        self.structured_store = Some(store);
        self
    }
}

/// Factory function type for creating components.
pub type ComponentFactory<C> = Box<dyn Fn(&ComponentSettings) -> Box<C> + Send + Sync>;

/// Init-time table from identifiers to component factories.
///
/// Every call to [`resolve`](Self::resolve) constructs a fresh instance.
pub struct ComponentRegistry<C: ?Sized + Capability> {
    factories: HashMap<String, ComponentFactory<C>>,
    settings: ComponentSettings,
}

/// Registry of extractors.
pub type ExtractorRegistry = ComponentRegistry<dyn Extractor>;

/// Registry of expanders.
pub type ExpanderRegistry = ComponentRegistry<dyn Expander>;

impl<C: ?Sized + Capability> Default for ComponentRegistry<C> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            settings: ComponentSettings::default(),
        }
    }
}

impl<C: ?Sized + Capability> ComponentRegistry<C> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a fully-qualified identifier.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn(&ComponentSettings) -> Box<C> + Send + Sync + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(factory));
    }

    /// Registers a factory, builder style.
    #[must_use]
    pub fn with<F>(mut self, identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ComponentSettings) -> Box<C> + Send + Sync + 'static,
    {
        self.register(identifier, factory);
        self
    }

    /// Replaces the settings passed to factories.
    pub fn set_settings(&mut self, settings: ComponentSettings) {
        self.settings = settings;
    }

    /// The settings passed to factories.
    #[must_use]
    pub fn settings(&self) -> &ComponentSettings {
        &self.settings
    }

    /// Whether an identifier is registered.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Resolves `tag` through `mapping` and constructs a new component.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnmappedTag`] if `tag` is not in
    /// `mapping`, or [`ResolutionError::UnregisteredComponent`] if the
    /// mapped identifier has no factory.
    pub fn resolve(
        &self,
        tag: &str,
        mapping: &HashMap<String, String>,
    ) -> Result<Box<C>, ResolutionError> {
        let identifier = mapping
            .get(tag)
            .ok_or_else(|| ResolutionError::unmapped(C::NAME, tag))?;

        info!(
            capability = C::NAME,
            tag = %tag,
            identifier = %identifier,
            "Building component"
        );

        let factory = self
            .factories
            .get(identifier)
            .ok_or_else(|| ResolutionError::unregistered(C::NAME, tag, identifier))?;
        Ok(factory(&self.settings))
    }

    /// Checks that every identifier in `mapping` is registered.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the first unknown identifier
    /// (in tag order).
    pub fn validate_mapping(&self, mapping: &HashMap<String, String>) -> Result<(), ConfigurationError> {
        let mut tags: Vec<&String> = mapping.keys().collect();
        tags.sort();

        for tag in tags {
            let identifier = &mapping[tag];
            if !self.contains(identifier) {
                return Err(ConfigurationError::new(format!(
                    "{} '{}' mapped from tag '{}' is not registered",
                    C::NAME,
                    identifier,
                    tag
                ))
                .with_field(format!("{}_map", C::NAME)));
            }
        }
        Ok(())
    }
}

impl<C: ?Sized + Capability> fmt::Debug for ComponentRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("capability", &C::NAME)
            .field("identifiers", &self.identifiers())
            .field("settings", &self.settings)
            .finish()
    }
}
