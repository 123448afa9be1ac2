//! Attribute validation helpers.
//!
//! Patterns are checked client-side only; the remote API applies its own
//! rules on top.

use regex::Regex;

use crate::error::ProviderError;

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Roles are lowercase words such as `admin`, `manager` or `member`.
pub const ROLE_PATTERN: &str = r"^[a-z0-9]+$";

pub const ALARMS_PATTERN: &str = r"^(ALARMS_SETTING_ALL|ALARMS_SETTING_CRITICAL|ALARMS_SETTING_ALL_BUT_UNREACHABLE|ALARMS_SETTING_UNREACHABLE)$";

/// Fail with a validation error naming `attribute` unless `value` matches.
pub fn require_match(attribute: &str, pattern: &str, value: &str) -> Result<(), ProviderError> {
    let re = Regex::new(pattern)
        .map_err(|e| ProviderError::Validation(format!("{attribute}: bad pattern: {e}")))?;
    if re.is_match(value) {
        Ok(())
    } else {
        Err(ProviderError::Validation(format!(
            "{attribute}: {value:?} does not match {pattern}"
        )))
    }
}

pub fn require_non_empty(attribute: &str, value: &str) -> Result<(), ProviderError> {
    if value.is_empty() {
        return Err(ProviderError::Validation(format!("{attribute} must not be empty")));
    }
    Ok(())
}
