//! Validation for user-supplied names that become path segments

use crate::{Error, Result};

/// Validate a plugin or board identifier.
///
/// Accepts non-empty ASCII alphanumerics, `-` and `_`. Anything else could
/// escape the directory it is joined onto (`..`, separators) or produce a
/// name that cannot be an executable or crate name.
pub fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidIdentifier {
        kind: kind.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value.starts_with('-') {
        return Err(invalid("must not start with '-'"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "must contain only alphanumeric characters, hyphens, or underscores",
        ));
    }

    Ok(())
}
