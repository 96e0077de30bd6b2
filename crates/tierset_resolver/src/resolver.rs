//! Effective setting resolution.
//!
//! For one setting of one entity the resolver takes, in order:
//!
//! 1. a stored `User` row for the entity, which always wins;
//! 2. for a setting the entity type defines itself, the schema default (or
//!    nothing when none is declared);
//! 3. for an inherited setting, whatever resolving the same setting on the
//!    parent entity yields, flagged `Parent` and chained to the parent's own
//!    provenance.
//!
//! Inheritance always walks to the entity type the schema names as the
//! setting's source; there is no "nearest ancestor with a value" search.
//! Stored `Default` rows are governed by [`StoredDefaultPolicy`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tierset_foundation::{
    EntityIdentifier, Error, ErrorContext, Result, Setting, SettingValueSource, ValueSourceFlags,
    normalize_name, optional_name,
};
use tierset_schema::{EntityTypeSchema, SettingSchema, SettingsSchema};
use tracing::{trace, trace_span, warn};

use crate::config::{ResolverConfig, StoredDefaultPolicy};
use crate::effective::EffectiveSettings;
use crate::relationship::EntityRelationshipResolver;
use crate::store::SettingStore;

// =============================================================================
// Resolver
// =============================================================================

/// Resolves effective setting values against a frozen schema.
///
/// Holds no mutable state; one resolver can serve any number of threads when
/// its collaborators are `Sync`.
#[derive(Clone, Debug)]
pub struct Resolver<S, R> {
    schema: Arc<SettingsSchema>,
    store: S,
    relationships: R,
    config: ResolverConfig,
}

impl<S, R> Resolver<S, R> {
    /// Creates a resolver with the default configuration.
    #[must_use]
    pub fn new(schema: Arc<SettingsSchema>, store: S, relationships: R) -> Self {
        Self {
            schema,
            store,
            relationships,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The schema being resolved against.
    #[must_use]
    pub fn schema(&self) -> &Arc<SettingsSchema> {
        &self.schema
    }

    /// The setting store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The relationship resolver.
    #[must_use]
    pub fn relationships(&self) -> &R {
        &self.relationships
    }

    /// The configuration in force.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl<S: SettingStore, R: EntityRelationshipResolver> Resolver<S, R> {
    /// Resolves one setting of `entity`.
    ///
    /// Returns `None` when nothing is stored, no default is declared, and no
    /// value is inherited.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the entity type, identifier, purpose or name is blank
    /// - `UnknownEntityType` if the schema has no such entity type
    /// - `UnknownSetting` if the setting is not in the entity type's
    ///   effective table for `purpose`
    /// - `Collaborator` errors from the store or relationship resolver
    ///
    /// Errors carry an [`ErrorContext`] naming the entity, purpose, setting,
    /// and the parent entities walked before the failure.
    pub fn resolve_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        let entity = entity.validated()?;
        let purpose = normalize_name(purpose, "purpose")?;
        let name = normalize_name(name, "name")?;

        self.resolve_one(&entity, &purpose, &name)
            .map_err(|err| in_context(err, &entity, &purpose, Some(&name)))
    }

    /// Resolves every setting `purpose` declares for `entity`.
    ///
    /// The store is queried once for the whole purpose; each value is the
    /// same as [`resolve_setting`](Self::resolve_setting) would return. An
    /// unknown purpose yields an empty map.
    ///
    /// # Errors
    ///
    /// As for [`resolve_setting`](Self::resolve_setting), except that unknown
    /// settings cannot occur.
    pub fn resolve_settings(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
    ) -> Result<BTreeMap<String, Option<Setting>>> {
        Ok(self.resolve_effective(entity, purpose)?.into_map())
    }

    /// Resolves every setting `purpose` declares for `entity`, keeping the
    /// stored rows alongside the resolved values.
    ///
    /// # Errors
    ///
    /// See [`resolve_settings`](Self::resolve_settings).
    pub fn resolve_effective(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
    ) -> Result<EffectiveSettings> {
        let entity = entity.validated()?;
        let purpose = normalize_name(purpose, "purpose")?;

        let span = trace_span!("resolve_settings", entity = %entity, purpose = %purpose);
        let _guard = span.enter();

        let entity_type = self
            .entity_type(&entity)
            .map_err(|err| in_context(err, &entity, &purpose, None))?;
        let Some(purpose_schema) = entity_type.purpose(&purpose) else {
            trace!("entity type does not expose purpose");
            return Ok(EffectiveSettings::new(
                entity,
                purpose,
                BTreeMap::new(),
                BTreeMap::new(),
            ));
        };

        let stored = self
            .stored_rows(&entity, &purpose)
            .map_err(|err| in_context(err, &entity, &purpose, None))?;

        let mut resolved = BTreeMap::new();
        for setting in purpose_schema.settings() {
            let row = stored.get(setting.name()).cloned();
            let value = self
                .resolve_with(&entity, &purpose, setting, row)
                .map_err(|err| in_context(err, &entity, &purpose, Some(setting.name())))?;
            resolved.insert(setting.name().to_string(), value);
        }
        trace!(settings = resolved.len(), "resolved purpose");

        Ok(EffectiveSettings::new(entity, purpose, resolved, stored))
    }

    fn entity_type(&self, entity: &EntityIdentifier) -> Result<&EntityTypeSchema> {
        self.schema
            .entity_type(&entity.entity_type)
            .ok_or_else(|| Error::unknown_entity_type(entity.entity_type.clone()))
    }

    /// Stored rows of one purpose keyed by trimmed name. The first row wins
    /// when a store returns several for one name.
    fn stored_rows(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
    ) -> Result<BTreeMap<String, Setting>> {
        let mut rows = BTreeMap::new();
        for row in self.store.get_settings(entity, purpose)? {
            rows.entry(row.name.trim().to_string()).or_insert(row);
        }
        Ok(rows)
    }

    /// Resolves one setting of an already-normalized entity.
    fn resolve_one(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        let span = trace_span!("resolve_setting", entity = %entity, purpose, setting = name);
        let _guard = span.enter();

        let entity_type = self.entity_type(entity)?;
        let setting = entity_type
            .setting(purpose, name)
            .ok_or_else(|| Error::unknown_setting(name, purpose, entity_type.name()))?;

        let stored = self.store.get_setting(entity, purpose, name)?;
        self.resolve_with(entity, purpose, setting, stored)
    }

    /// Resolves one setting given its schema entry and stored row.
    ///
    /// Shared by the single and bulk paths so both produce identical results.
    fn resolve_with(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        setting: &SettingSchema,
        stored: Option<Setting>,
    ) -> Result<Option<Setting>> {
        if let Some(found) = stored.and_then(|row| self.accept_stored(entity, row)) {
            return Ok(Some(found));
        }

        if setting.is_own() {
            let default = setting.definition().default_value.as_ref().map(|value| {
                Setting::new(
                    purpose,
                    setting.name(),
                    value.clone(),
                    SettingValueSource::default_value(entity.clone()),
                )
            });
            trace!(
                setting = setting.name(),
                has_default = default.is_some(),
                "own setting"
            );
            return Ok(default);
        }

        self.inherit(entity, purpose, setting)
    }

    /// Applies the stored-row rules, returning the row to use, if any.
    fn accept_stored(&self, entity: &EntityIdentifier, mut row: Setting) -> Option<Setting> {
        let flags = row.source_type();

        if flags.contains(ValueSourceFlags::USER) {
            trace!(setting = %row.name, "stored user value");
            if self.config.stamp_user_values {
                row.value_source = SettingValueSource::user(entity.clone());
            }
            return Some(row);
        }

        if flags.contains(ValueSourceFlags::DEFAULT) {
            return match self.config.stored_default_policy {
                StoredDefaultPolicy::StoredAuthoritative => {
                    trace!(setting = %row.name, "stored default value");
                    row.value_source = SettingValueSource::default_value(entity.clone());
                    Some(row)
                }
                StoredDefaultPolicy::SchemaAuthoritative => {
                    warn!(
                        entity = %entity,
                        setting = %row.name,
                        value = %row.value,
                        "ignoring stale stored default"
                    );
                    None
                }
            };
        }

        warn!(
            entity = %entity,
            setting = %row.name,
            source = %flags,
            "ignoring stored row with unexpected source"
        );
        None
    }

    /// Resolves an inherited setting on the parent entity.
    fn inherit(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        setting: &SettingSchema,
    ) -> Result<Option<Setting>> {
        let parent_type = setting.source().entity_type.as_str();
        let parent_id = self
            .relationships
            .get_entity_parent(entity, parent_type, Some(purpose))?;
        let Some(parent_id) = optional_name(parent_id.as_deref()) else {
            trace!(setting = setting.name(), parent_type, "no parent entity");
            return Ok(None);
        };

        let parent = EntityIdentifier::new(parent_type, parent_id);
        trace!(setting = setting.name(), parent = %parent, "resolving from parent");

        let resolved = self
            .resolve_one(&parent, purpose, setting.name())
            .map_err(|err| via(err, &parent))?;

        Ok(resolved.map(|mut found| {
            found.value_source = SettingValueSource::inherited(parent, found.value_source);
            found
        }))
    }
}

/// Attaches the top-level call's entity, purpose and setting to `err`,
/// keeping any inheritance hops already recorded.
fn in_context(
    mut err: Error,
    entity: &EntityIdentifier,
    purpose: &str,
    setting: Option<&str>,
) -> Error {
    let previous = err.context.take().unwrap_or_default();
    err.context = Some(ErrorContext {
        entity: Some(entity.clone()),
        purpose: Some(purpose.to_string()),
        setting: setting.map(str::to_string).or(previous.setting),
        chain: previous.chain,
    });
    err
}

/// Records that `err` was raised while resolving on `hop`.
///
/// Errors unwind innermost first, so each hop goes to the front.
fn via(mut err: Error, hop: &EntityIdentifier) -> Error {
    err.context
        .get_or_insert_with(ErrorContext::new)
        .chain
        .insert(0, hop.clone());
    err
}

// =============================================================================
// Schema Extension
// =============================================================================

/// Creates resolvers straight from a shared schema.
pub trait SchemaResolverExt {
    /// Returns a resolver over this schema with the default configuration.
    fn resolver<S, R>(&self, store: S, relationships: R) -> Resolver<S, R>
    where
        S: SettingStore,
        R: EntityRelationshipResolver;
}

impl SchemaResolverExt for Arc<SettingsSchema> {
    fn resolver<S, R>(&self, store: S, relationships: R) -> Resolver<S, R>
    where
        S: SettingStore,
        R: EntityRelationshipResolver,
    {
        Resolver::new(Arc::clone(self), store, relationships)
    }
}
