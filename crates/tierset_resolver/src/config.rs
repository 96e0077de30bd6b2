//! Configuration for the resolver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a stored row tagged `Default` is treated.
///
/// Such a row is a cached copy of a schema default from some earlier time;
/// the schema may have changed since.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StoredDefaultPolicy {
    /// Ignore the stored row and resolve as if nothing were stored.
    #[default]
    SchemaAuthoritative,
    /// Return the stored row as the entity's `Default` value.
    StoredAuthoritative,
}

/// Configuration for a [`Resolver`](crate::Resolver).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResolverConfig {
    /// Treatment of stored `Default` rows.
    pub stored_default_policy: StoredDefaultPolicy,

    /// Replace the value source of a stored `User` row with
    /// `{User, <resolved entity>}`. When off, the row's own value source is
    /// returned verbatim.
    pub stamp_user_values: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stored_default_policy: StoredDefaultPolicy::SchemaAuthoritative,
            stamp_user_values: true,
        }
    }
}

impl ResolverConfig {
    /// Schema defaults always win over cached defaults; user values are
    /// stamped. Same as [`Default`].
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Cached defaults in the store are trusted.
    #[must_use]
    pub fn cache_trusting() -> Self {
        Self {
            stored_default_policy: StoredDefaultPolicy::StoredAuthoritative,
            ..Self::default()
        }
    }

    /// Builder method to set the stored-default policy.
    #[must_use]
    pub fn with_stored_default_policy(mut self, policy: StoredDefaultPolicy) -> Self {
        self.stored_default_policy = policy;
        self
    }

    /// Builder method to enable/disable stamping of user values.
    #[must_use]
    pub fn with_stamp_user_values(mut self, stamp: bool) -> Self {
        self.stamp_user_values = stamp;
        self
    }
}
