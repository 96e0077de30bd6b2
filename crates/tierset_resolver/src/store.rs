//! Setting storage.
//!
//! The resolver reads stored values through [`SettingStore`] and never writes.
//! Stores return rows tagged either `User` (a value someone set on the entity)
//! or `Default` (a cached copy of a schema default).

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use tierset_foundation::{EntityIdentifier, Result, Setting};

/// Read access to stored setting values.
///
/// Implementations may do I/O and report failures as
/// [`ErrorKind::Collaborator`](tierset_foundation::ErrorKind::Collaborator).
/// Identifiers, purposes and names passed in are already trimmed.
pub trait SettingStore {
    /// Returns the stored row for one setting of `entity`, if any.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn get_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>>;

    /// Returns every stored row for `purpose` of `entity`.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn get_settings(&self, entity: &EntityIdentifier, purpose: &str) -> Result<Vec<Setting>>;
}

impl<T: SettingStore + ?Sized> SettingStore for &T {
    fn get_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        (**self).get_setting(entity, purpose, name)
    }

    fn get_settings(&self, entity: &EntityIdentifier, purpose: &str) -> Result<Vec<Setting>> {
        (**self).get_settings(entity, purpose)
    }
}

impl<T: SettingStore + ?Sized> SettingStore for Arc<T> {
    fn get_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        (**self).get_setting(entity, purpose, name)
    }

    fn get_settings(&self, entity: &EntityIdentifier, purpose: &str) -> Result<Vec<Setting>> {
        (**self).get_settings(entity, purpose)
    }
}

type Rows = BTreeMap<String, Setting>;

/// Thread-safe in-memory [`SettingStore`].
///
/// Keys are trimmed on the way in, so lookups match regardless of padding.
#[derive(Debug, Default)]
pub struct MemorySettingStore {
    rows: RwLock<HashMap<(EntityIdentifier, String), Rows>>,
}

impl MemorySettingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(entity: &EntityIdentifier, purpose: &str) -> (EntityIdentifier, String) {
        (entity.normalized(), purpose.trim().to_string())
    }

    /// Stores `setting` for `entity`, replacing any row with the same purpose
    /// and name. Returns the replaced row.
    pub fn insert(&self, entity: &EntityIdentifier, mut setting: Setting) -> Option<Setting> {
        setting.purpose = setting.purpose.trim().to_string();
        setting.name = setting.name.trim().to_string();

        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.entry(Self::key(entity, &setting.purpose))
            .or_default()
            .insert(setting.name.clone(), setting)
    }

    /// Stores a user value.
    pub fn set_user_value(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
        value: impl Into<String>,
    ) -> Option<Setting> {
        self.insert(entity, Setting::stored_user(purpose, name, value))
    }

    /// Stores a cached default value.
    pub fn set_cached_default(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
        value: impl Into<String>,
    ) -> Option<Setting> {
        self.insert(entity, Setting::stored_default(purpose, name, value))
    }

    /// Removes one row, returning it.
    pub fn remove(&self, entity: &EntityIdentifier, purpose: &str, name: &str) -> Option<Setting> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let key = Self::key(entity, purpose);
        let purpose_rows = rows.get_mut(&key)?;
        let removed = purpose_rows.remove(name.trim());
        if purpose_rows.is_empty() {
            rows.remove(&key);
        }
        removed
    }

    /// Removes every row.
    pub fn clear(&self) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Total number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingStore for MemorySettingStore {
    fn get_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .get(&Self::key(entity, purpose))
            .and_then(|purpose_rows| purpose_rows.get(name.trim()))
            .cloned())
    }

    fn get_settings(&self, entity: &EntityIdentifier, purpose: &str) -> Result<Vec<Setting>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .get(&Self::key(entity, purpose))
            .map(|purpose_rows| purpose_rows.values().cloned().collect())
            .unwrap_or_default())
    }
}
