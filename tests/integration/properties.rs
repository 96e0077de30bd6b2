//! Resolution properties
//!
//! Precedence, fallback, inheritance gating and provenance, checked over a
//! Grandparent <- Parent <- Child chain.

use std::sync::Arc;

use proptest::prelude::*;
use tierset::foundation::{EntityIdentifier, ErrorKind, SettingValueSource, ValueSourceFlags};
use tierset::resolver::{
    MemoryRelationshipResolver, MemorySettingStore, Resolver, ResolverConfig, SchemaResolverExt,
};
use tierset::schema::{
    EntityPurposeDefinition, PurposeSettingsInheritance, SchemaBuilder, SettingDefinition,
    SettingsSchema,
};

const PURPOSE: &str = "Prefs";

/// Grandparent declares A (default), B (no default), C (default, kept).
/// Parent adds D and re-exports everything. Child takes everything.
fn chain_schema() -> Arc<SettingsSchema> {
    let builder = SchemaBuilder::new();
    builder
        .register_purpose(PURPOSE, "")
        .unwrap()
        .register_entity_type(
            "Grandparent",
            "",
            [EntityPurposeDefinition::new(PURPOSE)
                .with_setting(SettingDefinition::new("A", "").with_default("a0"))
                .with_setting(SettingDefinition::new("B", ""))
                .with_setting(SettingDefinition::new("C", "").with_default("c0"))
                .with_inheritability(PurposeSettingsInheritance::inherit_all_except(["C"]))],
        )
        .unwrap()
        .register_entity_type(
            "Parent",
            "",
            [EntityPurposeDefinition::new(PURPOSE)
                .with_parent("Grandparent")
                .with_setting(SettingDefinition::new("D", "").with_default("d0"))
                .with_inheritability(PurposeSettingsInheritance::inherit_all())],
        )
        .unwrap()
        .register_entity_type(
            "Child",
            "",
            [EntityPurposeDefinition::new(PURPOSE).with_parent("Parent")],
        )
        .unwrap();
    builder.build()
}

fn grandparent() -> EntityIdentifier {
    EntityIdentifier::new("Grandparent", "g")
}

fn parent() -> EntityIdentifier {
    EntityIdentifier::new("Parent", "p")
}

fn child() -> EntityIdentifier {
    EntityIdentifier::new("Child", "c")
}

fn chain_links() -> MemoryRelationshipResolver {
    let links = MemoryRelationshipResolver::new();
    links.link(&child(), &parent()).link(&parent(), &grandparent());
    links
}

fn chain_resolver(
    store: MemorySettingStore,
) -> Resolver<MemorySettingStore, MemoryRelationshipResolver> {
    crate::init_tracing();
    chain_schema().resolver(store, chain_links())
}

// =============================================================================
// Precedence and Fallback
// =============================================================================

#[test]
fn user_value_overrides_default_and_parent() {
    let store = MemorySettingStore::new();
    store.set_user_value(&grandparent(), PURPOSE, "A", "from-grandparent");
    store.set_user_value(&child(), PURPOSE, "A", "from-child");
    store.set_user_value(&parent(), PURPOSE, "D", "from-parent");
    let resolver = chain_resolver(store);

    let a = resolver.resolve_setting(&child(), PURPOSE, "A").unwrap().unwrap();
    assert_eq!(a.value, "from-child");
    assert_eq!(a.source_type(), ValueSourceFlags::USER);

    let d = resolver.resolve_setting(&parent(), PURPOSE, "D").unwrap().unwrap();
    assert_eq!(d.value, "from-parent");
    assert_eq!(d.source_type(), ValueSourceFlags::USER);
}

#[test]
fn default_is_used_when_nothing_stored() {
    let resolver = chain_resolver(MemorySettingStore::new());
    let a = resolver
        .resolve_setting(&grandparent(), PURPOSE, "A")
        .unwrap()
        .unwrap();
    assert_eq!(a.value, "a0");
    assert_eq!(a.source_type(), ValueSourceFlags::DEFAULT);
}

#[test]
fn own_setting_without_default_is_none() {
    let resolver = chain_resolver(MemorySettingStore::new());
    assert!(resolver
        .resolve_setting(&grandparent(), PURPOSE, "B")
        .unwrap()
        .is_none());
}

// =============================================================================
// Inheritance
// =============================================================================

#[test]
fn inherited_value_matches_parent_resolution() {
    let store = MemorySettingStore::new();
    store.set_user_value(&grandparent(), PURPOSE, "B", "b1");
    let resolver = chain_resolver(store);

    for name in ["A", "B", "D"] {
        let at_parent = resolver.resolve_setting(&parent(), PURPOSE, name).unwrap();
        let at_child = resolver.resolve_setting(&child(), PURPOSE, name).unwrap();
        let (at_parent, at_child) = (at_parent.unwrap(), at_child.unwrap());

        assert_eq!(at_child.value, at_parent.value);
        assert!(at_child.source_type().contains(ValueSourceFlags::PARENT));
        let own_bits = at_parent.source_type().bits()
            & (ValueSourceFlags::DEFAULT | ValueSourceFlags::USER).bits();
        assert_eq!(
            at_child.source_type().bits() & own_bits,
            own_bits,
            "child of {name} lost the parent's source bits"
        );
        assert_eq!(at_child.value_source.entity, Some(parent()));
        assert_eq!(at_child.value_source.source.as_deref(), Some(&at_parent.value_source));
    }
}

#[test]
fn non_inheritable_setting_is_absent_downstream() {
    let schema = chain_schema();
    for entity_type in ["Parent", "Child"] {
        assert!(schema
            .entity_type(entity_type)
            .unwrap()
            .setting(PURPOSE, "C")
            .is_none());
    }

    let builder = SchemaBuilder::new();
    builder
        .register_purpose(PURPOSE, "")
        .unwrap()
        .register_entity_type(
            "Grandparent",
            "",
            [EntityPurposeDefinition::new(PURPOSE)
                .with_setting(SettingDefinition::new("A", ""))
                .with_setting(SettingDefinition::new("C", ""))
                .with_inheritability(PurposeSettingsInheritance::inherit_only(["A"]))],
        )
        .unwrap();
    let err = builder
        .register_entity_type(
            "Parent",
            "",
            [EntityPurposeDefinition::new(PURPOSE)
                .with_parent("Grandparent")
                .with_inheritance(PurposeSettingsInheritance::inherit_only(["C"]))],
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotInheritable { .. }));
}

#[test]
fn strictness_depends_on_explicit_list() {
    let register = |inheritance: PurposeSettingsInheritance| {
        let builder = SchemaBuilder::new();
        builder
            .register_purpose(PURPOSE, "")
            .unwrap()
            .register_entity_type(
                "Grandparent",
                "",
                [EntityPurposeDefinition::new(PURPOSE)
                    .with_setting(SettingDefinition::new("A", ""))
                    .with_inheritability(PurposeSettingsInheritance::inherit_all())],
            )
            .unwrap();
        builder
            .register_entity_type(
                "Parent",
                "",
                [EntityPurposeDefinition::new(PURPOSE)
                    .with_parent("Grandparent")
                    .with_inheritance(inheritance)],
            )
            .map(|_| ())
    };

    let err = register(PurposeSettingsInheritance::inherit_only(["Ghost"])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownSetting { .. }));

    register(PurposeSettingsInheritance::inherit_all_except(["Ghost"])).unwrap();
    register(PurposeSettingsInheritance::inherit_all()).unwrap();
}

#[test]
fn build_is_idempotent_then_frozen() {
    let builder = SchemaBuilder::new();
    builder.register_purpose(PURPOSE, "").unwrap();
    let first = builder.build();
    assert!(Arc::ptr_eq(&first, &builder.build()));
    assert!(matches!(
        builder.register_purpose("Other", "").unwrap_err().kind,
        ErrorKind::InvalidState(_)
    ));
}

#[test]
fn provenance_depth_through_three_levels() {
    let store = MemorySettingStore::new();
    store.set_user_value(&grandparent(), PURPOSE, "A", "chosen");
    let resolver = chain_resolver(store);

    let a = resolver.resolve_setting(&child(), PURPOSE, "A").unwrap().unwrap();
    assert_eq!(a.value, "chosen");
    assert_eq!(a.source_type(), ValueSourceFlags::PARENT | ValueSourceFlags::USER);
    assert_eq!(a.value_source.depth(), 2);
    assert_eq!(a.value_source.origin(), Some(&grandparent()));

    let expected = SettingValueSource::inherited(
        parent(),
        SettingValueSource::inherited(grandparent(), SettingValueSource::user(grandparent())),
    );
    assert_eq!(a.value_source, expected);
}

// =============================================================================
// Bulk / Single Consistency
// =============================================================================

const NAMES: [&str; 5] = ["A", "B", "C", "D", "E"];

fn row_strategy() -> impl Strategy<Value = (usize, usize, bool, String)> {
    (0usize..3, 0usize..NAMES.len(), any::<bool>(), "[a-z]{1,8}")
}

proptest! {
    #[test]
    fn bulk_and_single_resolution_agree(
        rows in prop::collection::vec(row_strategy(), 0..24),
        trust_cache in any::<bool>(),
        linked in any::<bool>(),
    ) {
        let entities = [grandparent(), parent(), child()];
        let store = MemorySettingStore::new();
        for (entity, name, user, value) in rows {
            if user {
                store.set_user_value(&entities[entity], PURPOSE, NAMES[name], value);
            } else {
                store.set_cached_default(&entities[entity], PURPOSE, NAMES[name], value);
            }
        }

        let links = if linked {
            chain_links()
        } else {
            MemoryRelationshipResolver::new()
        };
        let config = if trust_cache {
            ResolverConfig::cache_trusting()
        } else {
            ResolverConfig::default()
        };
        let resolver = chain_schema().resolver(store, links).with_config(config);

        for entity in &entities {
            let bulk = resolver.resolve_settings(entity, PURPOSE).unwrap();
            for (name, from_bulk) in &bulk {
                let single = resolver.resolve_setting(entity, PURPOSE, name).unwrap();
                prop_assert_eq!(
                    single.as_ref().map(|s| (&s.value, s.source_type())),
                    from_bulk.as_ref().map(|s| (&s.value, s.source_type()))
                );
            }
        }
    }
}
