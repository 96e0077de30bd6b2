//! Resolution layer for tierset.
//!
//! This crate provides:
//! - [`Resolver`] - Computes effective values from a [`SettingsSchema`](tierset_schema::SettingsSchema),
//!   a [`SettingStore`] and an [`EntityRelationshipResolver`]
//! - [`ResolverConfig`] - Policy knobs, notably [`StoredDefaultPolicy`]
//! - [`EffectiveSettings`] - All resolved settings of one purpose as a bag
//! - [`MemorySettingStore`] / [`MemoryRelationshipResolver`] - In-memory collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod effective;
pub mod relationship;
pub mod resolver;
pub mod store;

pub use config::{ResolverConfig, StoredDefaultPolicy};
pub use effective::EffectiveSettings;
pub use relationship::{EntityRelationshipResolver, MemoryRelationshipResolver};
pub use resolver::{Resolver, SchemaResolverExt};
pub use store::{MemorySettingStore, SettingStore};
