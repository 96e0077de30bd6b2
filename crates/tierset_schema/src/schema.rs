//! The frozen, read-only settings schema.
//!
//! Produced once by [`SchemaBuilder::build`](crate::SchemaBuilder::build) and
//! shared behind an `Arc`. Every lookup trims its arguments; lookups of unknown
//! names return `None` or nothing rather than an error.

use std::sync::Arc;

use im::OrdMap;

use crate::definition::{EntityPurposeDefinition, EntityTypeInfo, PurposeInfo, SettingDefinition};
use crate::source::DefinitionSource;

/// Effective schema of one setting within one entity type's purpose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingSchema {
    pub(crate) source: DefinitionSource,
    pub(crate) inheritable: bool,
    pub(crate) definition: Arc<SettingDefinition>,
}

impl SettingSchema {
    /// Where the definition comes from.
    #[must_use]
    pub fn source(&self) -> &DefinitionSource {
        &self.source
    }

    /// Whether child entity types may inherit this setting.
    #[must_use]
    pub fn is_inheritable(&self) -> bool {
        self.inheritable
    }

    /// The setting definition (shared with the defining entity type).
    #[must_use]
    pub fn definition(&self) -> &SettingDefinition {
        &self.definition
    }

    /// The setting name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Returns true if the entity type defines this setting itself.
    #[must_use]
    pub fn is_own(&self) -> bool {
        self.source.is_own()
    }
}

/// Effective schema of one purpose within one entity type.
#[derive(Clone, Debug)]
pub struct EntityPurposeSchema {
    pub(crate) info: PurposeInfo,
    pub(crate) definition: EntityPurposeDefinition,
    pub(crate) source: DefinitionSource,
    pub(crate) settings: OrdMap<String, SettingSchema>,
}

impl EntityPurposeSchema {
    /// The globally registered purpose info.
    #[must_use]
    pub fn info(&self) -> &PurposeInfo {
        &self.info
    }

    /// The definition as registered, with names trimmed and inheritance
    /// policies made explicit.
    #[must_use]
    pub fn definition(&self) -> &EntityPurposeDefinition {
        &self.definition
    }

    /// The entity type that declared this purpose.
    #[must_use]
    pub fn source(&self) -> &DefinitionSource {
        &self.source
    }

    /// The parent entity type settings are inherited from, if any.
    #[must_use]
    pub fn parent_entity_type(&self) -> Option<&str> {
        self.definition.parent_entity_type.as_deref()
    }

    /// All effective settings, own and inherited, ordered by name.
    pub fn settings(&self) -> impl Iterator<Item = &SettingSchema> {
        self.settings.values()
    }

    /// One effective setting by name.
    #[must_use]
    pub fn setting(&self, name: &str) -> Option<&SettingSchema> {
        self.settings.get(name.trim())
    }

    /// Number of effective settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Returns true if the purpose has no effective settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Schema of one entity type.
#[derive(Clone, Debug)]
pub struct EntityTypeSchema {
    pub(crate) info: EntityTypeInfo,
    pub(crate) purposes: OrdMap<String, EntityPurposeSchema>,
}

impl EntityTypeSchema {
    /// Name and description.
    #[must_use]
    pub fn info(&self) -> &EntityTypeInfo {
        &self.info
    }

    /// The entity type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Purposes exposed by this entity type, ordered by name.
    pub fn purposes(&self) -> impl Iterator<Item = &PurposeInfo> {
        self.purposes.values().map(EntityPurposeSchema::info)
    }

    /// One purpose by name.
    #[must_use]
    pub fn purpose(&self, name: &str) -> Option<&EntityPurposeSchema> {
        self.purposes.get(name.trim())
    }

    /// Effective settings of `purpose`: all of them when `name` is `None` or
    /// blank, else at most the one named. Unknown purposes yield nothing.
    #[must_use]
    pub fn settings(&self, purpose: &str, name: Option<&str>) -> Vec<&SettingSchema> {
        let Some(purpose) = self.purpose(purpose) else {
            return Vec::new();
        };
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => purpose.setting(name).into_iter().collect(),
            None => purpose.settings().collect(),
        }
    }

    /// One effective setting of `purpose` by name.
    #[must_use]
    pub fn setting(&self, purpose: &str, name: &str) -> Option<&SettingSchema> {
        self.purpose(purpose)?.setting(name)
    }
}

/// The complete, immutable settings schema.
#[derive(Clone, Debug)]
pub struct SettingsSchema {
    pub(crate) purposes: OrdMap<String, PurposeInfo>,
    pub(crate) entity_types: OrdMap<String, Arc<EntityTypeSchema>>,
}

impl SettingsSchema {
    /// All registered purposes, ordered by name.
    pub fn purposes(&self) -> impl Iterator<Item = &PurposeInfo> {
        self.purposes.values()
    }

    /// One registered purpose by name.
    #[must_use]
    pub fn purpose(&self, name: &str) -> Option<&PurposeInfo> {
        self.purposes.get(name.trim())
    }

    /// All registered entity types, ordered by name.
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityTypeInfo> {
        self.entity_types.values().map(|t| t.info())
    }

    /// One entity type by name; `None` if it is unknown or `name` is blank.
    #[must_use]
    pub fn entity_type(&self, name: &str) -> Option<&EntityTypeSchema> {
        self.entity_types.get(name.trim()).map(Arc::as_ref)
    }
}
