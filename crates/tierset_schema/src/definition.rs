//! Declarative definitions fed to the [`SchemaBuilder`](crate::SchemaBuilder).
//!
//! Definitions are plain values. Nothing here is validated; the builder trims
//! and checks every name when the definition is registered.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name and description of a globally registered purpose.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PurposeInfo {
    /// Purpose name, unique across the schema.
    pub name: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl PurposeInfo {
    /// Creates purpose info.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Name and description of a registered entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityTypeInfo {
    /// Entity type name, unique across the schema.
    pub name: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl EntityTypeInfo {
    /// Creates entity type info.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Definition of one setting within a purpose.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingDefinition {
    /// Setting name, unique within its purpose.
    pub name: String,
    /// Human-readable description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Default value, if one is declared.
    #[cfg_attr(feature = "serde", serde(default, rename = "default"))]
    pub default_value: Option<String>,
}

impl SettingDefinition {
    /// Creates a setting definition with no default value.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_value: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns true if a default value is declared.
    #[must_use]
    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }
}

/// Whether the named settings are inherited or excluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InheritanceType {
    /// Settings are not inheritable, or should not be inherited.
    DoNotInherit,
    /// Settings are inheritable, or should be inherited.
    Inherit,
}

/// Inheritance policy of a purpose.
///
/// The same policy type is used on both sides of a parent/child link. On the
/// parent side (`inheritability`) it says which settings children may take;
/// on the child side (`inheritance`) it says which inheritable settings the
/// child takes.
///
/// | type           | applicable settings | admits                      |
/// |----------------|---------------------|-----------------------------|
/// | `Inherit`      | empty               | every setting               |
/// | `Inherit`      | non-empty           | only the named settings     |
/// | `DoNotInherit` | empty               | nothing                     |
/// | `DoNotInherit` | non-empty           | every setting but the named |
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PurposeSettingsInheritance {
    /// See [`InheritanceType`].
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub inheritance_type: InheritanceType,
    /// Settings the policy applies to; empty means none named.
    #[cfg_attr(feature = "serde", serde(default, rename = "settings"))]
    pub applicable_settings: BTreeSet<String>,
}

impl PurposeSettingsInheritance {
    /// Creates a policy, trimming every applicable setting name.
    #[must_use]
    pub fn new<I, S>(inheritance_type: InheritanceType, applicable_settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inheritance_type,
            applicable_settings: applicable_settings
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Admits every setting.
    #[must_use]
    pub fn inherit_all() -> Self {
        Self::new(InheritanceType::Inherit, Vec::<String>::new())
    }

    /// Admits only the named settings.
    #[must_use]
    pub fn inherit_only<I, S>(settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(InheritanceType::Inherit, settings)
    }

    /// Admits nothing.
    #[must_use]
    pub fn inherit_none() -> Self {
        Self::new(InheritanceType::DoNotInherit, Vec::<String>::new())
    }

    /// Admits every setting except the named ones.
    #[must_use]
    pub fn inherit_all_except<I, S>(settings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(InheritanceType::DoNotInherit, settings)
    }

    /// Returns the policy with every name trimmed and blank names dropped.
    ///
    /// Policies built from a struct literal or deserialized skip [`new`](Self::new).
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(self.inheritance_type, &self.applicable_settings)
    }

    /// Returns true if the policy admits the setting `name`.
    #[must_use]
    pub fn admits(&self, name: &str) -> bool {
        let named = self.applicable_settings.contains(name);
        match self.inheritance_type {
            InheritanceType::Inherit => self.applicable_settings.is_empty() || named,
            InheritanceType::DoNotInherit => !self.applicable_settings.is_empty() && !named,
        }
    }

    /// Returns true for an allow-list (`Inherit` with named settings).
    ///
    /// Allow-lists are strict: every name must exist.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.inheritance_type == InheritanceType::Inherit && !self.applicable_settings.is_empty()
    }

    /// Returns true if the policy admits no setting at all.
    #[must_use]
    pub fn admits_nothing(&self) -> bool {
        self.inheritance_type == InheritanceType::DoNotInherit
            && self.applicable_settings.is_empty()
    }
}

/// One purpose as declared by an entity type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityPurposeDefinition {
    /// Purpose name; must be registered globally first.
    pub name: String,
    /// Entity type this purpose inherits settings from.
    #[cfg_attr(feature = "serde", serde(default, rename = "parent"))]
    pub parent_entity_type: Option<String>,
    /// Which inheritable parent settings this entity type takes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inheritance: Option<PurposeSettingsInheritance>,
    /// Which settings of this entity type children may inherit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inheritability: Option<PurposeSettingsInheritance>,
    /// Settings declared by this entity type itself.
    #[cfg_attr(feature = "serde", serde(default))]
    pub settings: Vec<SettingDefinition>,
}

impl EntityPurposeDefinition {
    /// Creates a purpose definition with no parent and no settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_entity_type: None,
            inheritance: None,
            inheritability: None,
            settings: Vec::new(),
        }
    }

    /// Sets the parent entity type.
    #[must_use]
    pub fn with_parent(mut self, entity_type: impl Into<String>) -> Self {
        self.parent_entity_type = Some(entity_type.into());
        self
    }

    /// Sets the inheritance policy towards the parent.
    #[must_use]
    pub fn with_inheritance(mut self, inheritance: PurposeSettingsInheritance) -> Self {
        self.inheritance = Some(inheritance);
        self
    }

    /// Sets the inheritability policy towards children.
    #[must_use]
    pub fn with_inheritability(mut self, inheritability: PurposeSettingsInheritance) -> Self {
        self.inheritability = Some(inheritability);
        self
    }

    /// Adds a setting.
    #[must_use]
    pub fn with_setting(mut self, setting: SettingDefinition) -> Self {
        self.settings.push(setting);
        self
    }

    /// Adds several settings.
    #[must_use]
    pub fn with_settings(mut self, settings: impl IntoIterator<Item = SettingDefinition>) -> Self {
        self.settings.extend(settings);
        self
    }

    /// The inheritance policy in force: the declared one, else inherit
    /// everything when a parent is named, else nothing.
    #[must_use]
    pub fn effective_inheritance(&self) -> PurposeSettingsInheritance {
        match (&self.inheritance, &self.parent_entity_type) {
            (Some(inheritance), _) => inheritance.normalized(),
            (None, Some(_)) => PurposeSettingsInheritance::inherit_all(),
            (None, None) => PurposeSettingsInheritance::inherit_none(),
        }
    }

    /// The inheritability policy in force: the declared one, else nothing.
    #[must_use]
    pub fn effective_inheritability(&self) -> PurposeSettingsInheritance {
        self.inheritability
            .as_ref()
            .map_or_else(
                PurposeSettingsInheritance::inherit_none,
                PurposeSettingsInheritance::normalized,
            )
    }
}
