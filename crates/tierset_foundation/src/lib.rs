//! Core types for tierset.
//!
//! This crate provides:
//! - [`EntityIdentifier`] - Addresses one concrete entity (type + identifier)
//! - [`Setting`] - A resolved setting value with its provenance
//! - [`SettingValueSource`] - Provenance chain of a resolved value
//! - [`ValueSourceFlags`] - Where a value came from (default, parent, user)
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod name;
pub mod setting;

pub use entity::EntityIdentifier;
pub use error::{Element, Error, ErrorContext, ErrorKind, Result};
pub use name::{normalize_description, normalize_name, optional_name};
pub use setting::{Setting, SettingValueSource, ValueSourceFlags};
