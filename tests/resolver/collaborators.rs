//! Integration tests for the store and relationship collaborators
//!
//! Tests custom implementations, purpose-scoped links, and error propagation.

use std::cell::Cell;

use tierset_foundation::{EntityIdentifier, Error, ErrorKind, Result, Setting};
use tierset_resolver::{
    EntityRelationshipResolver, MemoryRelationshipResolver, MemorySettingStore, Resolver,
    SettingStore,
};

use crate::fixtures::{acme, eng, team, links, schema};

/// Counts store calls.
#[derive(Default)]
struct CountingStore {
    inner: MemorySettingStore,
    single: Cell<usize>,
    bulk: Cell<usize>,
}

impl SettingStore for CountingStore {
    fn get_setting(
        &self,
        entity: &EntityIdentifier,
        purpose: &str,
        name: &str,
    ) -> Result<Option<Setting>> {
        self.single.set(self.single.get() + 1);
        self.inner.get_setting(entity, purpose, name)
    }

    fn get_settings(&self, entity: &EntityIdentifier, purpose: &str) -> Result<Vec<Setting>> {
        self.bulk.set(self.bulk.get() + 1);
        self.inner.get_settings(entity, purpose)
    }
}

/// Relationship resolver backed by a remote service that is down.
struct Unreachable;

impl EntityRelationshipResolver for Unreachable {
    fn get_entity_parent(
        &self,
        _entity: &EntityIdentifier,
        _parent_type: &str,
        _purpose: Option<&str>,
    ) -> Result<Option<String>> {
        Err(Error::collaborator("directory service unreachable"))
    }
}

// =============================================================================
// Store Access
// =============================================================================

#[test]
fn bulk_fetches_own_rows_once() {
    crate::init_tracing();
    let store = CountingStore::default();
    let resolver = Resolver::new(schema(), &store, links());

    // Org settings are all own settings: one bulk call, no single calls.
    resolver.resolve_settings(&acme(), "Profile").unwrap();
    assert_eq!(store.bulk.get(), 1);
    assert_eq!(store.single.get(), 0);
}

#[test]
fn inheritance_queries_each_level_once() {
    let store = CountingStore::default();
    let resolver = Resolver::new(schema(), &store, links());

    resolver.resolve_setting(&team(), "Profile", "Theme").unwrap();
    // Team, Dept, Org.
    assert_eq!(store.single.get(), 3);
}

// =============================================================================
// Relationships
// =============================================================================

#[test]
fn purpose_scoped_parent_is_used() {
    let store = MemorySettingStore::new();
    let other = EntityIdentifier::new("Org", "other");
    store.set_user_value(&acme(), "Alerts", "Email", "acme");
    store.set_user_value(&other, "Alerts", "Email", "other");

    let links = MemoryRelationshipResolver::new();
    links
        .link(&eng(), &acme())
        .link_for_purpose(&eng(), &other, "Alerts");
    let resolver = Resolver::new(schema(), store, links);

    let email = resolver
        .resolve_setting(&eng(), "Alerts", "Email")
        .unwrap()
        .unwrap();
    assert_eq!(email.value, "other");
    assert_eq!(email.value_source.entity, Some(other));

    let theme = resolver
        .resolve_setting(&eng(), "Profile", "Theme")
        .unwrap()
        .unwrap();
    assert_eq!(theme.value_source.entity, Some(acme()));
}

#[test]
fn relationship_failure_propagates() {
    let resolver = Resolver::new(schema(), MemorySettingStore::new(), Unreachable);

    // Own settings never consult the relationship resolver.
    assert!(resolver.resolve_setting(&eng(), "Profile", "Budget").is_ok());

    let err = resolver.resolve_setting(&eng(), "Profile", "Theme").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Collaborator("directory service unreachable".to_string())
    );
    let context = err.context.unwrap();
    assert_eq!(context.entity, Some(eng()));
    assert!(context.chain.is_empty());
}
