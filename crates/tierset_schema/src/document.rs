//! Declarative schema descriptions.
//!
//! A [`SchemaDocument`] lists purposes and entity types as plain data, so a
//! schema can be kept in a configuration file and loaded at startup. Applying
//! a document goes through the same [`SchemaBuilder`] calls as hand-written
//! registration code, with the same validation.
//!
//! With the `serde` feature enabled the document (de)serializes as:
//!
//! ```json
//! {
//!   "purposes": [{ "name": "Profile", "description": "Profile settings" }],
//!   "entity_types": [{
//!     "name": "Org",
//!     "purposes": [{
//!       "name": "Profile",
//!       "settings": [{ "name": "Theme", "default": "Light" }],
//!       "inheritability": { "type": "Inherit" }
//!     }]
//!   }]
//! }
//! ```

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tierset_foundation::Result;
use tracing::debug;

use crate::builder::SchemaBuilder;
use crate::definition::EntityPurposeDefinition;
use crate::schema::SettingsSchema;

/// A purpose to register.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PurposeDocument {
    /// Purpose name.
    pub name: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl PurposeDocument {
    /// Creates a purpose entry.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An entity type to register, with its purposes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityTypeDocument {
    /// Entity type name.
    pub name: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Purpose definitions, as passed to
    /// [`SchemaBuilder::register_entity_type`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub purposes: Vec<EntityPurposeDefinition>,
}

impl EntityTypeDocument {
    /// Creates an entity type entry with no purposes.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            purposes: Vec::new(),
        }
    }

    /// Adds a purpose definition.
    #[must_use]
    pub fn with_purpose(mut self, purpose: EntityPurposeDefinition) -> Self {
        self.purposes.push(purpose);
        self
    }
}

/// A whole schema as data.
///
/// Entity types are registered in document order, so parents must be listed
/// before their children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaDocument {
    /// Purposes, registered first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub purposes: Vec<PurposeDocument>,
    /// Entity types, registered after all purposes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entity_types: Vec<EntityTypeDocument>,
}

impl SchemaDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a purpose.
    #[must_use]
    pub fn with_purpose(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.purposes.push(PurposeDocument::new(name, description));
        self
    }

    /// Adds an entity type.
    #[must_use]
    pub fn with_entity_type(mut self, entity_type: EntityTypeDocument) -> Self {
        self.entity_types.push(entity_type);
        self
    }

    /// Registers everything in the document with `builder`.
    ///
    /// Stops at the first failing registration; entries registered before it
    /// stay registered.
    ///
    /// # Errors
    ///
    /// Any error [`SchemaBuilder::register_purpose`] or
    /// [`SchemaBuilder::register_entity_type`] reports.
    pub fn apply(&self, builder: &SchemaBuilder) -> Result<()> {
        for purpose in &self.purposes {
            builder.register_purpose(&purpose.name, &purpose.description)?;
        }
        for entity_type in &self.entity_types {
            builder.register_entity_type(
                &entity_type.name,
                &entity_type.description,
                entity_type.purposes.iter().cloned(),
            )?;
        }
        debug!(
            purposes = self.purposes.len(),
            entity_types = self.entity_types.len(),
            "applied schema document"
        );
        Ok(())
    }

    /// Applies the document to a fresh builder and freezes it.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn build(&self) -> Result<Arc<SettingsSchema>> {
        let builder = SchemaBuilder::new();
        self.apply(&builder)?;
        Ok(builder.build())
    }
}
