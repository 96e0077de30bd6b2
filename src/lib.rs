//! Tierset - Hierarchical settings resolution
//!
//! This crate re-exports all layers of the tierset system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tierset_resolver   - Resolver, collaborator traits, EffectiveSettings
//! Layer 1: tierset_schema     - Definitions, SchemaBuilder, frozen SettingsSchema
//! Layer 0: tierset_foundation - Core types (EntityIdentifier, Setting, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use tierset::foundation::{EntityIdentifier, ValueSourceFlags};
//! use tierset::resolver::{MemoryRelationshipResolver, MemorySettingStore, SchemaResolverExt};
//! use tierset::schema::{
//!     EntityPurposeDefinition, PurposeSettingsInheritance, SchemaBuilder, SettingDefinition,
//! };
//!
//! let builder = SchemaBuilder::new();
//! builder
//!     .register_purpose("Profile", "Profile settings")?
//!     .register_entity_type(
//!         "Org",
//!         "Organization",
//!         [EntityPurposeDefinition::new("Profile")
//!             .with_setting(SettingDefinition::new("Theme", "UI theme").with_default("Light"))
//!             .with_inheritability(PurposeSettingsInheritance::inherit_all())],
//!     )?
//!     .register_entity_type(
//!         "Dept",
//!         "Department",
//!         [EntityPurposeDefinition::new("Profile").with_parent("Org")],
//!     )?;
//! let schema = builder.build();
//!
//! let acme = EntityIdentifier::new("Org", "acme");
//! let eng = EntityIdentifier::new("Dept", "eng");
//! let links = MemoryRelationshipResolver::new();
//! links.link(&eng, &acme);
//!
//! let resolver = schema.resolver(MemorySettingStore::new(), links);
//! let theme = resolver.resolve_setting(&eng, "Profile", "Theme")?.unwrap();
//! assert_eq!(theme.value, "Light");
//! assert_eq!(theme.source_type(), ValueSourceFlags::PARENT | ValueSourceFlags::DEFAULT);
//! # Ok::<(), tierset::foundation::Error>(())
//! ```

pub use tierset_foundation as foundation;
pub use tierset_resolver as resolver;
pub use tierset_schema as schema;
