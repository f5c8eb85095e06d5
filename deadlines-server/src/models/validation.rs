//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of the fields required to add a deadline is absent or empty
    MissingData,

    /// The target deadline id is absent, null, empty or zero
    MissingId,

    /// The id is present but is not an integer
    InvalidId { value: String },

    /// A date field is not an ISO `YYYY-MM-DD` date
    InvalidDate { field: &'static str, value: String },

    /// The body or query string could not be decoded into the expected fields
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingData => write!(f, "Missing data"),
            Self::MissingId => write!(f, "Missing deadline ID"),
            Self::InvalidId { value } => write!(f, "Invalid deadline ID: '{}'", value),
            Self::InvalidDate { field, value } => {
                write!(f, "Invalid {}: '{}' is not a YYYY-MM-DD date", field, value)
            }
            Self::Malformed { reason } => write!(f, "Malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
