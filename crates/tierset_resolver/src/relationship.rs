//! Parent lookup between concrete entities.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tierset_foundation::{EntityIdentifier, Result, optional_name};

/// Maps a child entity to its parent entity of a given type.
pub trait EntityRelationshipResolver {
    /// Returns the identifier of `entity`'s parent of type `parent_type`, or
    /// `None` when there is no such parent.
    ///
    /// `purpose` is the purpose being resolved, for implementations whose
    /// hierarchy differs per purpose.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the resolver propagates them unchanged.
    fn get_entity_parent(
        &self,
        entity: &EntityIdentifier,
        parent_type: &str,
        purpose: Option<&str>,
    ) -> Result<Option<String>>;
}

impl<T: EntityRelationshipResolver + ?Sized> EntityRelationshipResolver for &T {
    fn get_entity_parent(
        &self,
        entity: &EntityIdentifier,
        parent_type: &str,
        purpose: Option<&str>,
    ) -> Result<Option<String>> {
        (**self).get_entity_parent(entity, parent_type, purpose)
    }
}

impl<T: EntityRelationshipResolver + ?Sized> EntityRelationshipResolver for Arc<T> {
    fn get_entity_parent(
        &self,
        entity: &EntityIdentifier,
        parent_type: &str,
        purpose: Option<&str>,
    ) -> Result<Option<String>> {
        (**self).get_entity_parent(entity, parent_type, purpose)
    }
}

/// (child, parent type, purpose scope)
type LinkKey = (EntityIdentifier, String, Option<String>);

/// Thread-safe in-memory [`EntityRelationshipResolver`].
///
/// Links may be scoped to one purpose; a scoped link takes precedence over an
/// unscoped link for the same child and parent type.
#[derive(Debug, Default)]
pub struct MemoryRelationshipResolver {
    links: RwLock<HashMap<LinkKey, String>>,
}

impl MemoryRelationshipResolver {
    /// Creates a resolver with no links.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(child: &EntityIdentifier, parent_type: &str, purpose: Option<&str>) -> LinkKey {
        (
            child.normalized(),
            parent_type.trim().to_string(),
            optional_name(purpose),
        )
    }

    fn insert(&self, child: &EntityIdentifier, parent: &EntityIdentifier, purpose: Option<&str>) {
        let parent = parent.normalized();
        let key = Self::key(child, &parent.entity_type, purpose);
        self.links
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, parent.identifier);
    }

    /// Makes `parent` the parent of `child` for every purpose.
    pub fn link(&self, child: &EntityIdentifier, parent: &EntityIdentifier) -> &Self {
        self.insert(child, parent, None);
        self
    }

    /// Makes `parent` the parent of `child` for `purpose` only.
    pub fn link_for_purpose(
        &self,
        child: &EntityIdentifier,
        parent: &EntityIdentifier,
        purpose: &str,
    ) -> &Self {
        self.insert(child, parent, Some(purpose));
        self
    }

    /// Removes every link of `child` to a parent of `parent_type`, scoped or not.
    pub fn unlink(&self, child: &EntityIdentifier, parent_type: &str) {
        let child = child.normalized();
        let parent_type = parent_type.trim();
        self.links
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(c, t, _), _| !(c == &child && t == parent_type));
    }

    /// Removes every link.
    pub fn clear(&self) {
        self.links
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EntityRelationshipResolver for MemoryRelationshipResolver {
    fn get_entity_parent(
        &self,
        entity: &EntityIdentifier,
        parent_type: &str,
        purpose: Option<&str>,
    ) -> Result<Option<String>> {
        let links = self.links.read().unwrap_or_else(PoisonError::into_inner);
        let scoped = optional_name(purpose)
            .and_then(|p| links.get(&Self::key(entity, parent_type, Some(&p))));
        Ok(scoped
            .or_else(|| links.get(&Self::key(entity, parent_type, None)))
            .cloned())
    }
}
