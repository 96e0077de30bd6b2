//! Resolved settings and the provenance of their values.
//!
//! Values are opaque strings at this layer. A [`Setting`] carries a
//! [`SettingValueSource`], which is a linked chain: an inherited value points
//! at the value source of the parent entity it was taken from, and so on up
//! to the entity whose stored value or schema default supplied it.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityIdentifier;

/// Bit set describing where a value came from.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ValueSourceFlags(u8);

impl ValueSourceFlags {
    /// Value is the default declared by the setting definition.
    pub const DEFAULT: Self = Self(1);
    /// Value was obtained from a parent entity.
    pub const PARENT: Self = Self(2);
    /// Value was specified by a user and stored.
    pub const USER: Self = Self(4);

    /// No flags set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds flags from raw bits, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every flag in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the flags with `other` added.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for ValueSourceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ValueSourceFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ValueSourceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::PARENT, "Parent"),
            (Self::DEFAULT, "Default"),
            (Self::USER, "User"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

impl fmt::Debug for ValueSourceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueSourceFlags({self})")
    }
}

/// Describes where an effective setting value came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingValueSource {
    /// How the value was obtained.
    pub source_type: ValueSourceFlags,
    /// The entity the value was obtained from.
    ///
    /// Stores may leave this unset; the resolver stamps it.
    pub entity: Option<EntityIdentifier>,
    /// For inherited values, the value source of the parent entity.
    pub source: Option<Box<SettingValueSource>>,
}

impl SettingValueSource {
    /// Creates a value source with no parent link.
    #[must_use]
    pub fn new(source_type: ValueSourceFlags, entity: Option<EntityIdentifier>) -> Self {
        Self {
            source_type,
            entity,
            source: None,
        }
    }

    /// A value stored by a user for `entity`.
    #[must_use]
    pub fn user(entity: EntityIdentifier) -> Self {
        Self::new(ValueSourceFlags::USER, Some(entity))
    }

    /// A schema default applied to `entity`.
    #[must_use]
    pub fn default_value(entity: EntityIdentifier) -> Self {
        Self::new(ValueSourceFlags::DEFAULT, Some(entity))
    }

    /// A value taken from `parent_entity`, whose own resolution produced `parent`.
    ///
    /// The result is flagged `Parent` plus the parent's `Default` or `User`
    /// flag, and keeps the parent's whole chain as its source.
    #[must_use]
    pub fn inherited(parent_entity: EntityIdentifier, parent: SettingValueSource) -> Self {
        let mut source_type = ValueSourceFlags::PARENT;
        if parent.source_type.contains(ValueSourceFlags::DEFAULT) {
            source_type |= ValueSourceFlags::DEFAULT;
        } else if parent.source_type.contains(ValueSourceFlags::USER) {
            source_type |= ValueSourceFlags::USER;
        }

        Self {
            source_type,
            entity: Some(parent_entity),
            source: Some(Box::new(parent)),
        }
    }

    /// Returns true if the value was inherited from a parent entity.
    #[must_use]
    pub fn is_inherited(&self) -> bool {
        self.source_type.contains(ValueSourceFlags::PARENT)
    }

    /// Number of parent links below this source.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(next) = &current.source {
            depth += 1;
            current = next;
        }
        depth
    }

    /// The innermost source of the chain.
    #[must_use]
    pub fn root(&self) -> &SettingValueSource {
        let mut current = self;
        while let Some(next) = &current.source {
            current = next;
        }
        current
    }

    /// The entity that ultimately supplied the value.
    #[must_use]
    pub fn origin(&self) -> Option<&EntityIdentifier> {
        self.root().entity.as_ref()
    }
}

/// An effective (or stored) setting value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Setting {
    /// Purpose the setting belongs to.
    pub purpose: String,
    /// Name of the setting.
    pub name: String,
    /// The value, opaque to tierset.
    pub value: String,
    /// Where the value came from.
    pub value_source: SettingValueSource,
}

impl Setting {
    /// Creates a new setting.
    #[must_use]
    pub fn new(
        purpose: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        value_source: SettingValueSource,
    ) -> Self {
        Self {
            purpose: purpose.into(),
            name: name.into(),
            value: value.into(),
            value_source,
        }
    }

    /// Creates a stored user value, as a store would return it.
    #[must_use]
    pub fn stored_user(
        purpose: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            purpose,
            name,
            value,
            SettingValueSource::new(ValueSourceFlags::USER, None),
        )
    }

    /// Creates a stored cached default, as a store would return it.
    #[must_use]
    pub fn stored_default(
        purpose: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            purpose,
            name,
            value,
            SettingValueSource::new(ValueSourceFlags::DEFAULT, None),
        )
    }

    /// Returns the flags of the value source.
    #[must_use]
    pub fn source_type(&self) -> ValueSourceFlags {
        self.value_source.source_type
    }

    /// Returns true if the value was set by a user on this very entity.
    #[must_use]
    pub fn is_user_value(&self) -> bool {
        self.source_type() == ValueSourceFlags::USER
    }
}
