//! Single-field business checks shared by the catalog rules.

use chrono::{DateTime, Utc};

/// Validation error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field_name} cannot be empty")]
    Empty { field_name: &'static str },

    #[error("{field_name} must be greater than 0")]
    NotPositive { field_name: &'static str },

    #[error("{field_name} cannot be negative")]
    Negative { field_name: &'static str },

    #[error("{field_name} must be in the future")]
    NotInFuture { field_name: &'static str },
}

/// Validate a string is non-empty after trimming.
pub fn require_non_empty(value: &str, field_name: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field_name });
    }
    Ok(())
}

/// Validate a count is strictly greater than zero.
pub fn require_positive(value: i32, field_name: &'static str) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { field_name });
    }
    Ok(())
}

/// Validate an amount is zero or more. NaN is rejected as well.
pub fn require_non_negative(value: f64, field_name: &'static str) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::Negative { field_name });
    }
    Ok(())
}

/// Validate a timestamp lies strictly after `now`.
pub fn require_future(
    value: DateTime<Utc>,
    now: DateTime<Utc>,
    field_name: &'static str,
) -> Result<(), ValidationError> {
    if value <= now {
        return Err(ValidationError::NotInFuture { field_name });
    }
    Ok(())
}
