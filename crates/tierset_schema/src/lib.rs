//! Schema layer for tierset.
//!
//! This crate provides:
//! - Definitions ([`SettingDefinition`], [`EntityPurposeDefinition`],
//!   [`PurposeSettingsInheritance`]) describing settings and inheritance policy
//! - [`SchemaBuilder`] - Validates registrations and computes effective
//!   settings tables across inheritance chains
//! - [`SettingsSchema`] - The frozen, shareable result of a build
//! - [`DefinitionSource`] - Where each effective setting was defined
//! - [`SchemaDocument`] - A schema described as data

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod definition;
pub mod document;
pub mod schema;
pub mod source;

pub use builder::SchemaBuilder;
pub use definition::{
    EntityPurposeDefinition, EntityTypeInfo, InheritanceType, PurposeInfo,
    PurposeSettingsInheritance, SettingDefinition,
};
pub use document::{EntityTypeDocument, PurposeDocument, SchemaDocument};
pub use schema::{EntityPurposeSchema, EntityTypeSchema, SettingSchema, SettingsSchema};
pub use source::{DefinitionSource, DefinitionSourceKind};
