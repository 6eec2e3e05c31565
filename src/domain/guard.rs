//! Field-level guards used by every entity constructor and `update` method.
//!
//! Guards are pure: they either hand back the (normalised) value or fail with
//! [`DomainError::Validation`] naming the offending field.

use crate::domain::error::DomainError;

/// Maximum length of a name, in characters.
pub const NAME_MAX_LEN: usize = 200;

/// Maximum length of a description, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// Trims `value` and rejects it when nothing is left.
pub fn require_non_blank(value: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Rejects zero, negative and (for floating point) NaN values.
///
/// Works for any numeric type whose `Default` is zero.
pub fn require_positive<T>(value: T, field: &'static str) -> Result<T, DomainError>
where
    T: PartialOrd + Default + Copy,
{
    if value > T::default() {
        Ok(value)
    } else {
        Err(DomainError::validation(field, "must be > 0"))
    }
}

/// Rejects strings longer than `max` characters.
pub fn require_max_len(
    value: String,
    max: usize,
    field: &'static str,
) -> Result<String, DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(value)
}

/// Name rule shared by all root entities: non-blank, trimmed, bounded.
pub fn name(value: &str, field: &'static str) -> Result<String, DomainError> {
    require_max_len(require_non_blank(value, field)?, NAME_MAX_LEN, field)
}

/// Description rule shared by all root entities: trimmed, may be empty, bounded.
pub fn description(value: &str, field: &'static str) -> Result<String, DomainError> {
    require_max_len(value.trim().to_string(), DESCRIPTION_MAX_LEN, field)
}
