//! Provenance of setting definitions.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a definition belongs to an entity type or came from its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DefinitionSourceKind {
    /// Defined by the entity type itself.
    EntityType,
    /// Inherited from a parent entity type.
    ParentEntityType,
}

/// Where a setting (or purpose) definition comes from.
///
/// An inherited definition links to the parent's own source when the parent
/// inherited it in turn, so the chain has one `ParentEntityType` link per
/// inheritance hop.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefinitionSource {
    /// See [`DefinitionSourceKind`].
    pub kind: DefinitionSourceKind,
    /// The defining entity type, or the parent it was inherited from.
    pub entity_type: String,
    /// The parent's source when the parent itself inherited the definition.
    pub source: Option<Arc<DefinitionSource>>,
}

impl DefinitionSource {
    /// Defined by `entity_type` itself.
    #[must_use]
    pub fn own(entity_type: impl Into<String>) -> Self {
        Self {
            kind: DefinitionSourceKind::EntityType,
            entity_type: entity_type.into(),
            source: None,
        }
    }

    /// Inherited from `parent`, whose entry carried `parent_source`.
    #[must_use]
    pub fn inherited(parent: impl Into<String>, parent_source: &DefinitionSource) -> Self {
        Self {
            kind: DefinitionSourceKind::ParentEntityType,
            entity_type: parent.into(),
            source: match parent_source.kind {
                DefinitionSourceKind::EntityType => None,
                DefinitionSourceKind::ParentEntityType => Some(Arc::new(parent_source.clone())),
            },
        }
    }

    /// Returns true if the definition belongs to the entity type itself.
    #[must_use]
    pub fn is_own(&self) -> bool {
        self.kind == DefinitionSourceKind::EntityType
    }

    /// Number of inheritance hops (0 for own definitions).
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.is_own() {
            return 0;
        }
        let mut depth = 1;
        let mut current = self;
        while let Some(next) = &current.source {
            depth += 1;
            current = next;
        }
        depth
    }

    /// The entity type that actually declared the definition.
    #[must_use]
    pub fn origin(&self) -> &str {
        let mut current = self;
        while let Some(next) = &current.source {
            current = next;
        }
        &current.entity_type
    }
}

impl fmt::Display for DefinitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DefinitionSourceKind::EntityType => write!(f, "own ({})", self.entity_type),
            DefinitionSourceKind::ParentEntityType => {
                write!(f, "inherited from {}", self.entity_type)?;
                let mut current = self;
                while let Some(next) = &current.source {
                    write!(f, " <- {}", next.entity_type)?;
                    current = next;
                }
                Ok(())
            }
        }
    }
}
