//! Unified error type for the domain layer.
//!
//! Domain errors come from building vocabulary values out of untrusted input
//! (sort specifications, page requests). Business-rule failures live in the
//! engine, where store state is available.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value is outside its allowed range
    #[error("{0}")]
    Validation(String),

    /// A string does not name any known variant
    #[error("{0}")]
    Parse(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for SortDirection {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "asc" => Ok(Self::Asc),
    ///             _ => Err(DomainError::parse(format!("Unknown sort direction: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Returns the human-readable message without the variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) | Self::Parse(msg) => msg,
        }
    }
}
