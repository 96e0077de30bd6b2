//! Resolved settings of one purpose of one entity, as a name-keyed bag.

use std::collections::BTreeMap;
use std::collections::btree_map;

use tierset_foundation::{EntityIdentifier, Setting, SettingValueSource};

/// Every effective setting of one purpose for one entity.
///
/// Produced by [`Resolver::resolve_effective`](crate::Resolver::resolve_effective).
/// Each declared setting maps to its resolved value, or `None` when nothing is
/// stored, declared, or inherited for it. The raw rows the store returned for
/// the entity are kept alongside so callers can tell overrides from defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveSettings {
    entity: EntityIdentifier,
    purpose: String,
    resolved: BTreeMap<String, Option<Setting>>,
    stored: BTreeMap<String, Setting>,
}

impl EffectiveSettings {
    pub(crate) fn new(
        entity: EntityIdentifier,
        purpose: String,
        resolved: BTreeMap<String, Option<Setting>>,
        stored: BTreeMap<String, Setting>,
    ) -> Self {
        Self {
            entity,
            purpose,
            resolved,
            stored,
        }
    }

    /// The entity the settings were resolved for.
    #[must_use]
    pub fn entity(&self) -> &EntityIdentifier {
        &self.entity
    }

    /// The purpose the settings belong to.
    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Returns true if `name` is a declared setting of the purpose.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolved.contains_key(name.trim())
    }

    /// The resolved setting, if `name` is declared and has a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.resolved.get(name.trim()).and_then(Option::as_ref)
    }

    /// The resolved value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|s| s.value.as_str())
    }

    /// Where the resolved value came from.
    #[must_use]
    pub fn source(&self, name: &str) -> Option<&SettingValueSource> {
        self.get(name).map(|s| &s.value_source)
    }

    /// The row the store holds for this entity, whether or not it was used.
    #[must_use]
    pub fn stored(&self, name: &str) -> Option<&Setting> {
        self.stored.get(name.trim())
    }

    /// Returns true if the resolved value was set by a user on this entity.
    #[must_use]
    pub fn is_overridden(&self, name: &str) -> bool {
        self.get(name).is_some_and(Setting::is_user_value)
    }

    /// Declared setting names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolved.keys().map(String::as_str)
    }

    /// Declared settings with their resolved values, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Setting>)> {
        self.resolved
            .iter()
            .map(|(name, setting)| (name.as_str(), setting.as_ref()))
    }

    /// Number of declared settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns true if the purpose declares no settings (or is unknown).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Consumes the bag, returning the name to resolved value map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, Option<Setting>> {
        self.resolved
    }
}

impl IntoIterator for EffectiveSettings {
    type Item = (String, Option<Setting>);
    type IntoIter = btree_map::IntoIter<String, Option<Setting>>;

    fn into_iter(self) -> Self::IntoIter {
        self.resolved.into_iter()
    }
}
