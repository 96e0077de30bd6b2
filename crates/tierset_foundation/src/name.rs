//! Name normalization shared by the schema and the resolver.
//!
//! Every name in tierset (purpose, entity type, setting) is compared after
//! trimming surrounding whitespace, and may never be blank.

use crate::error::{Error, Result};

/// Trims `name` and rejects it if nothing is left.
///
/// `argument` names the offending parameter in the error.
///
/// # Errors
///
/// Returns `InvalidArgument` if `name` is empty or whitespace only.
pub fn normalize_name(name: &str, argument: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_argument(
            argument,
            "value cannot be empty or whitespace",
        ));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional name, mapping blank values to `None`.
#[must_use]
pub fn optional_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
}

/// Trims a description. Descriptions may be empty.
#[must_use]
pub fn normalize_description(description: &str) -> String {
    description.trim().to_string()
}
