//! Validating, single-use schema builder.
//!
//! Purposes are registered first, then entity types in dependency order: a
//! purpose may only name a parent entity type that is already registered, so
//! the inheritance graph is acyclic by construction.
//!
//! Each entity type registration is validated completely before anything is
//! added to the builder, so a failed call leaves the builder unchanged.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use im::OrdMap;
use tierset_foundation::{
    Element, Error, Result, normalize_description, normalize_name, optional_name,
};
use tracing::{debug, trace};

use crate::definition::{
    EntityPurposeDefinition, EntityTypeInfo, PurposeInfo, PurposeSettingsInheritance,
    SettingDefinition,
};
use crate::schema::{EntityPurposeSchema, EntityTypeSchema, SettingSchema, SettingsSchema};
use crate::source::DefinitionSource;

#[derive(Debug, Default)]
struct BuilderState {
    purposes: OrdMap<String, PurposeInfo>,
    entity_types: OrdMap<String, Arc<EntityTypeSchema>>,
    frozen: Option<Arc<SettingsSchema>>,
}

impl BuilderState {
    fn ensure_open(&self) -> Result<()> {
        if self.frozen.is_some() {
            return Err(Error::invalid_state(
                "schema has already been built; no further registration is permitted",
            ));
        }
        Ok(())
    }
}

/// Accumulates purposes and entity types and freezes them into a
/// [`SettingsSchema`].
///
/// All methods take `&self`; registration and the freeze are serialized by an
/// internal lock, so a builder may be shared between threads.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    state: Mutex<BuilderState>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BuilderState> {
        // State is only written after validation succeeds, so a poisoned
        // guard still holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a purpose that entity types may then expose.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `name` is blank
    /// - `DuplicateName` if the purpose is already registered
    /// - `InvalidState` if the schema has been built
    pub fn register_purpose(&self, name: &str, description: &str) -> Result<&Self> {
        let mut state = self.lock();
        state.ensure_open()?;

        let name = normalize_name(name, "name")?;
        if state.purposes.contains_key(&name) {
            return Err(Error::duplicate_name(Element::Purpose, name));
        }

        debug!(purpose = %name, "registered purpose");
        let info = PurposeInfo::new(name.clone(), normalize_description(description));
        state.purposes.insert(name, info);
        Ok(self)
    }

    /// Registers an entity type with all of its purposes and settings.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a name is blank
    /// - `DuplicateName` if the entity type, a purpose within it, or a setting
    ///   within a purpose is duplicated
    /// - `UnknownPurpose` if a purpose was not registered, or the parent entity
    ///   type does not expose it
    /// - `UnknownEntityType` if a parent entity type is not registered
    /// - `UnknownSetting` if an allow-list names a setting that does not exist
    /// - `NotInheritable` if the parent purpose, or an explicitly named parent
    ///   setting, may not be inherited
    /// - `InvalidState` if the schema has been built
    pub fn register_entity_type(
        &self,
        name: &str,
        description: &str,
        purposes: impl IntoIterator<Item = EntityPurposeDefinition>,
    ) -> Result<&Self> {
        let mut state = self.lock();
        state.ensure_open()?;

        let name = normalize_name(name, "name")?;
        if state.entity_types.contains_key(&name) {
            return Err(Error::duplicate_name(Element::EntityType, name));
        }

        let mut compiled = OrdMap::new();
        for definition in purposes {
            let purpose = compile_purpose(&state, &name, &definition, &compiled)?;
            compiled.insert(purpose.info.name.clone(), purpose);
        }

        debug!(
            entity_type = %name,
            purposes = compiled.len(),
            "registered entity type"
        );
        let schema = EntityTypeSchema {
            info: EntityTypeInfo::new(name.clone(), normalize_description(description)),
            purposes: compiled,
        };
        state.entity_types.insert(name, Arc::new(schema));
        Ok(self)
    }

    /// Freezes the builder and returns the schema.
    ///
    /// Every call returns the same `Arc`; after the first call all
    /// registration fails with `InvalidState`.
    pub fn build(&self) -> Arc<SettingsSchema> {
        let mut state = self.lock();
        if let Some(schema) = &state.frozen {
            return Arc::clone(schema);
        }

        let schema = Arc::new(SettingsSchema {
            purposes: state.purposes.clone(),
            entity_types: state.entity_types.clone(),
        });
        debug!(
            purposes = schema.purposes.len(),
            entity_types = schema.entity_types.len(),
            "schema frozen"
        );
        state.frozen = Some(Arc::clone(&schema));
        schema
    }

    /// Returns true once [`build`](Self::build) has been called.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.lock().frozen.is_some()
    }
}

/// Validates one purpose definition of entity type `entity_type` and computes
/// its effective settings table.
fn compile_purpose(
    state: &BuilderState,
    entity_type: &str,
    definition: &EntityPurposeDefinition,
    compiled: &OrdMap<String, EntityPurposeSchema>,
) -> Result<EntityPurposeSchema> {
    let purpose = normalize_name(&definition.name, "purpose.name")?;
    if compiled.contains_key(&purpose) {
        return Err(Error::duplicate_name(Element::EntityTypePurpose, purpose));
    }
    let info = state
        .purposes
        .get(&purpose)
        .cloned()
        .ok_or_else(|| Error::unknown_purpose(purpose.clone()))?;

    let settings = normalize_settings(&definition.settings)?;
    let inheritance = definition.effective_inheritance();
    let inheritability = definition.effective_inheritability();
    let parent_entity_type = optional_name(definition.parent_entity_type.as_deref());

    let parent = match &parent_entity_type {
        Some(parent) => Some(parent_purpose(state, parent, &purpose)?),
        None => None,
    };

    let own = DefinitionSource::own(entity_type);
    let mut table: OrdMap<String, SettingSchema> = settings
        .iter()
        .cloned()
        .map(|setting| {
            let schema = SettingSchema {
                source: own.clone(),
                inheritable: false,
                definition: Arc::new(setting),
            };
            (schema.definition.name.clone(), schema)
        })
        .collect();

    if let (Some(parent), Some(parent_name)) = (parent, &parent_entity_type) {
        merge_inherited(&mut table, parent, parent_name, &purpose, &inheritance)?;
    }

    apply_inheritability(&mut table, &inheritability, &purpose, entity_type)?;

    Ok(EntityPurposeSchema {
        info,
        definition: EntityPurposeDefinition {
            name: purpose,
            parent_entity_type,
            inheritance: Some(inheritance),
            inheritability: Some(inheritability),
            settings,
        },
        source: own,
        settings: table,
    })
}

/// Trims setting names and descriptions and rejects duplicates, naming the
/// duplicate whose first occurrence comes earliest.
fn normalize_settings(settings: &[SettingDefinition]) -> Result<Vec<SettingDefinition>> {
    let normalized = settings
        .iter()
        .map(|setting| {
            Ok(SettingDefinition {
                name: normalize_name(&setting.name, "setting.name")?,
                description: normalize_description(&setting.description),
                default_value: setting.default_value.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let duplicates: HashSet<&str> = normalized
        .iter()
        .filter(|s| !seen.insert(s.name.as_str()))
        .map(|s| s.name.as_str())
        .collect();
    if let Some(first) = normalized
        .iter()
        .find(|s| duplicates.contains(s.name.as_str()))
    {
        return Err(Error::duplicate_name(Element::Setting, first.name.clone()));
    }

    Ok(normalized)
}

/// Looks up the purpose `purpose` on the parent entity type and checks that it
/// can be inherited from at all.
fn parent_purpose<'a>(
    state: &'a BuilderState,
    parent: &str,
    purpose: &str,
) -> Result<&'a EntityPurposeSchema> {
    let parent_schema = state
        .entity_types
        .get(parent)
        .ok_or_else(|| Error::unknown_entity_type(parent))?;
    let parent_purpose = parent_schema
        .purpose(purpose)
        .ok_or_else(|| Error::purpose_not_on_entity_type(purpose, parent))?;

    if parent_purpose.definition.effective_inheritability().admits_nothing() {
        return Err(Error::purpose_not_inheritable(purpose, parent));
    }
    Ok(parent_purpose)
}

/// Adds the parent's inheritable settings that this entity type does not
/// define itself and that its inheritance policy admits.
///
/// An allow-list is strict: each named setting must exist upstream and be
/// inheritable. Every other policy silently skips what it cannot take.
fn merge_inherited(
    table: &mut OrdMap<String, SettingSchema>,
    parent: &EntityPurposeSchema,
    parent_name: &str,
    purpose: &str,
    inheritance: &PurposeSettingsInheritance,
) -> Result<()> {
    if inheritance.is_explicit() {
        for name in &inheritance.applicable_settings {
            let upstream = parent
                .setting(name)
                .ok_or_else(|| Error::unknown_setting(name.clone(), purpose, parent_name))?;
            if !upstream.inheritable {
                return Err(Error::setting_not_inheritable(
                    name.clone(),
                    purpose,
                    parent_name,
                ));
            }
        }
    }

    for upstream in parent.settings() {
        let name = upstream.name();
        if !upstream.inheritable || table.contains_key(name) || !inheritance.admits(name) {
            continue;
        }
        trace!(setting = name, parent = parent_name, "inherited setting");
        table.insert(
            name.to_string(),
            SettingSchema {
                source: DefinitionSource::inherited(parent_name, &upstream.source),
                inheritable: false,
                definition: Arc::clone(&upstream.definition),
            },
        );
    }
    Ok(())
}

/// Marks which entries of the effective table children may inherit.
fn apply_inheritability(
    table: &mut OrdMap<String, SettingSchema>,
    inheritability: &PurposeSettingsInheritance,
    purpose: &str,
    entity_type: &str,
) -> Result<()> {
    if inheritability.is_explicit() {
        if let Some(missing) = inheritability
            .applicable_settings
            .iter()
            .find(|name| !table.contains_key(name.as_str()))
        {
            return Err(Error::unknown_setting(missing.clone(), purpose, entity_type));
        }
    }

    let names: Vec<String> = table.keys().cloned().collect();
    for name in names {
        if let Some(setting) = table.get_mut(&name) {
            setting.inheritable = inheritability.admits(&name);
        }
    }
    Ok(())
}
