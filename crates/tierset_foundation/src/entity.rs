//! Entity identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies one concrete entity, e.g. type `User` with identifier `u123`.
///
/// Equality and hashing ignore leading and trailing whitespace on both parts,
/// so `" User "/"u123"` and `"User"/"u123"` address the same entity.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityIdentifier {
    /// Name of the entity type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub entity_type: String,
    /// Identifier of the entity within its type.
    pub identifier: String,
}

impl EntityIdentifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Returns true if either part is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_type.trim().is_empty() || self.identifier.trim().is_empty()
    }

    /// Returns a copy with both parts trimmed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            entity_type: self.entity_type.trim().to_string(),
            identifier: self.identifier.trim().to_string(),
        }
    }

    /// Validates that both parts are present and returns the trimmed identifier.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the type or the identifier is blank.
    pub fn validated(&self) -> Result<Self> {
        if self.entity_type.trim().is_empty() {
            return Err(Error::invalid_argument(
                "entity.type",
                "value cannot be empty or whitespace",
            ));
        }
        if self.identifier.trim().is_empty() {
            return Err(Error::invalid_argument(
                "entity.identifier",
                "value cannot be empty or whitespace",
            ));
        }
        Ok(self.normalized())
    }
}

impl PartialEq for EntityIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type.trim() == other.entity_type.trim()
            && self.identifier.trim() == other.identifier.trim()
    }
}

impl Eq for EntityIdentifier {}

impl Hash for EntityIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity_type.trim().hash(state);
        self.identifier.trim().hash(state);
    }
}

impl fmt::Debug for EntityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EntityIdentifier({:?}, {:?})",
            self.entity_type, self.identifier
        )
    }
}

impl fmt::Display for EntityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}",
            self.entity_type.trim(),
            self.identifier.trim()
        )
    }
}

impl<T: Into<String>, I: Into<String>> From<(T, I)> for EntityIdentifier {
    fn from((entity_type, identifier): (T, I)) -> Self {
        Self::new(entity_type, identifier)
    }
}
