//! Worked scenarios
//!
//! Org/Dept schemas resolved against small in-memory stores.

use std::sync::Arc;

use tierset::foundation::{EntityIdentifier, ErrorKind, ValueSourceFlags};
use tierset::resolver::{MemoryRelationshipResolver, MemorySettingStore, SchemaResolverExt};
use tierset::schema::{
    EntityPurposeDefinition, PurposeSettingsInheritance, SchemaBuilder, SettingDefinition,
};

fn org_profile() -> EntityPurposeDefinition {
    EntityPurposeDefinition::new("Profile")
        .with_setting(SettingDefinition::new("Theme", "UI theme").with_default("Light"))
        .with_inheritability(PurposeSettingsInheritance::inherit_all())
}

fn org_builder() -> SchemaBuilder {
    let builder = SchemaBuilder::new();
    builder
        .register_purpose("Profile", "Profile settings")
        .unwrap()
        .register_entity_type("Org", "Organization", [org_profile()])
        .unwrap();
    builder
}

fn acme() -> EntityIdentifier {
    EntityIdentifier::new("Org", "acme")
}

fn eng() -> EntityIdentifier {
    EntityIdentifier::new("Dept", "eng")
}

// =============================================================================
// Defaults and Stored Values
// =============================================================================

#[test]
fn default_for_empty_store() {
    crate::init_tracing();
    let schema = org_builder().build();
    let resolver = schema.resolver(MemorySettingStore::new(), MemoryRelationshipResolver::new());

    let theme = resolver
        .resolve_setting(&acme(), "Profile", "Theme")
        .unwrap()
        .unwrap();
    assert_eq!(theme.value, "Light");
    assert_eq!(theme.source_type(), ValueSourceFlags::DEFAULT);
}

#[test]
fn stored_user_value_returned() {
    let schema = org_builder().build();
    let store = MemorySettingStore::new();
    store.set_user_value(&acme(), "Profile", "Theme", "Dark");
    let resolver = schema.resolver(store, MemoryRelationshipResolver::new());

    let theme = resolver
        .resolve_setting(&acme(), "Profile", "Theme")
        .unwrap()
        .unwrap();
    assert_eq!(theme.value, "Dark");
    assert_eq!(theme.source_type(), ValueSourceFlags::USER);
    assert_eq!(theme.value_source.entity, Some(acme()));
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn department_inherits_organization_default() {
    let builder = org_builder();
    builder
        .register_entity_type(
            "Dept",
            "Department",
            [EntityPurposeDefinition::new("Profile").with_parent("Org")],
        )
        .unwrap();
    let schema = builder.build();

    let links = MemoryRelationshipResolver::new();
    links.link(&eng(), &acme());
    let resolver = schema.resolver(Arc::new(MemorySettingStore::new()), links);

    let theme = resolver
        .resolve_setting(&eng(), "Profile", "Theme")
        .unwrap()
        .unwrap();
    assert_eq!(theme.value, "Light");
    assert_eq!(
        theme.source_type(),
        ValueSourceFlags::PARENT | ValueSourceFlags::DEFAULT
    );
    assert_eq!(theme.value_source.entity, Some(acme()));
}

#[test]
fn explicit_inheritance_of_missing_setting_fails() {
    let builder = org_builder();
    let err = builder
        .register_entity_type(
            "Dept",
            "Department",
            [EntityPurposeDefinition::new("Profile")
                .with_parent("Org")
                .with_inheritance(PurposeSettingsInheritance::inherit_only([
                    "NonExistentSetting",
                ]))],
        )
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownSetting { ref setting, .. } if setting == "NonExistentSetting"
    ));
}

// =============================================================================
// Unknown Names
// =============================================================================

#[test]
fn undeclared_setting_errors() {
    let schema = org_builder().build();
    let resolver = schema.resolver(MemorySettingStore::new(), MemoryRelationshipResolver::new());

    let err = resolver
        .resolve_setting(&EntityIdentifier::new("Team", "core"), "Profile", "Font")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownEntityType("Team".to_string()));

    let err = resolver
        .resolve_setting(&acme(), "Profile", "Font")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownSetting { .. }));
}
