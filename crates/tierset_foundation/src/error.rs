//! Error types for the tierset system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityIdentifier;

/// Convenience alias used throughout tierset.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for tierset operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        })
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(element: Element, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName {
            element,
            name: name.into(),
        })
    }

    /// Creates an unknown purpose error for a purpose that was never registered.
    #[must_use]
    pub fn unknown_purpose(purpose: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownPurpose {
            purpose: purpose.into(),
            entity_type: None,
        })
    }

    /// Creates an unknown purpose error for a purpose missing from an entity type.
    #[must_use]
    pub fn purpose_not_on_entity_type(
        purpose: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownPurpose {
            purpose: purpose.into(),
            entity_type: Some(entity_type.into()),
        })
    }

    /// Creates an unknown entity type error.
    #[must_use]
    pub fn unknown_entity_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownEntityType(name.into()))
    }

    /// Creates an unknown setting error.
    #[must_use]
    pub fn unknown_setting(
        setting: impl Into<String>,
        purpose: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownSetting {
            setting: setting.into(),
            purpose: purpose.into(),
            entity_type: entity_type.into(),
        })
    }

    /// Creates a not-inheritable error for a whole purpose.
    #[must_use]
    pub fn purpose_not_inheritable(
        purpose: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::NotInheritable {
            purpose: purpose.into(),
            entity_type: entity_type.into(),
            setting: None,
        })
    }

    /// Creates a not-inheritable error for one setting.
    #[must_use]
    pub fn setting_not_inheritable(
        setting: impl Into<String>,
        purpose: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::NotInheritable {
            purpose: purpose.into(),
            entity_type: entity_type.into(),
            setting: Some(setting.into()),
        })
    }

    /// Creates an invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState(message.into()))
    }

    /// Creates an error reported by a store or relationship resolver.
    #[must_use]
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Collaborator(message.into()))
    }
}

/// The kind of schema element a name belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    /// A globally registered purpose.
    Purpose,
    /// A registered entity type.
    EntityType,
    /// A purpose declared twice on one entity type.
    EntityTypePurpose,
    /// A setting within a purpose.
    Setting,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purpose => write!(f, "purpose"),
            Self::EntityType => write!(f, "entity type"),
            Self::EntityTypePurpose => write!(f, "entity type purpose"),
            Self::Setting => write!(f, "setting"),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required argument was blank or malformed.
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: String,
        /// What was wrong with it.
        message: String,
    },

    /// A name was registered twice.
    #[error("duplicate {element} name: '{name}'")]
    DuplicateName {
        /// What kind of element the name belongs to.
        element: Element,
        /// The duplicated name.
        name: String,
    },

    /// Purpose was not registered, or is missing from an entity type.
    #[error("unknown purpose '{purpose}'{}", .entity_type.as_ref().map(|t| format!(" on entity type '{t}'")).unwrap_or_default())]
    UnknownPurpose {
        /// The purpose name.
        purpose: String,
        /// The entity type that was expected to carry it, if any.
        entity_type: Option<String>,
    },

    /// Entity type was not registered.
    #[error("unknown entity type '{0}'")]
    UnknownEntityType(String),

    /// Setting is not part of the effective schema of a purpose.
    #[error("unknown setting '{setting}' in purpose '{purpose}' of entity type '{entity_type}'")]
    UnknownSetting {
        /// The setting name.
        setting: String,
        /// The purpose that was searched.
        purpose: String,
        /// The entity type that was searched.
        entity_type: String,
    },

    /// Purpose or setting exists upstream but may not be inherited.
    #[error("{} of purpose '{purpose}' of entity type '{entity_type}' is not inheritable", .setting.as_ref().map(|s| format!("setting '{s}'")).unwrap_or_else(|| "settings".to_string()))]
    NotInheritable {
        /// The purpose name.
        purpose: String,
        /// The entity type that owns the purpose.
        entity_type: String,
        /// The setting, when a single setting was refused.
        setting: Option<String>,
    },

    /// Mutation attempted after the schema was frozen.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A store or relationship resolver reported a failure.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

/// Context about where an error occurred.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Entity being resolved.
    pub entity: Option<EntityIdentifier>,
    /// Purpose being resolved.
    pub purpose: Option<String>,
    /// Setting being resolved.
    pub setting: Option<String>,
    /// Entities walked through on the way to the failure, outermost first.
    pub chain: Vec<EntityIdentifier>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityIdentifier) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Sets the setting name.
    #[must_use]
    pub fn with_setting(mut self, setting: impl Into<String>) -> Self {
        self.setting = Some(setting.into());
        self
    }

    /// Adds an inheritance hop.
    #[must_use]
    pub fn with_hop(mut self, entity: EntityIdentifier) -> Self {
        self.chain.push(entity);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(entity) = &self.entity {
            parts.push(format!("entity {entity}"));
        }
        if let Some(purpose) = &self.purpose {
            parts.push(format!("purpose '{purpose}'"));
        }
        if let Some(setting) = &self.setting {
            parts.push(format!("setting '{setting}'"));
        }
        write!(f, "{}", parts.join(", "))?;
        if !self.chain.is_empty() {
            let hops: Vec<String> = self.chain.iter().map(ToString::to_string).collect();
            write!(f, " via {}", hops.join(" -> "))?;
        }
        Ok(())
    }
}
