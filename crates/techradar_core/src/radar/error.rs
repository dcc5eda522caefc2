//! Validation error taxonomy for radar submissions and lookup queries.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Umbrella message shared by every top-level structural failure.
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid or empty entries data";
/// Prefix of every per-entry structural or reference failure.
pub const INVALID_ENTRY_STRUCTURE_PREFIX: &str = "Invalid entry structure";
/// Message for inputs with no usable content after normalization.
pub const MISSING_INPUT_MESSAGE: &str = "Missing input";

/// Rejection reason for a submission or query.
///
/// Display strings are part of the observable contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing usable remained after normalization.
    MissingInput,
    /// Top-level payload shape is wrong (entries absent/empty, bad
    /// quadrants/rings/title).
    InvalidPayload,
    /// One entry is malformed or references an unknown quadrant/ring.
    InvalidEntryStructure(String),
}

impl ValidationError {
    pub(crate) fn entry(detail: impl Into<String>) -> Self {
        Self::InvalidEntryStructure(detail.into())
    }

    /// Stable machine-readable kind, used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput => "missing_input",
            Self::InvalidPayload => "invalid_payload",
            Self::InvalidEntryStructure(_) => "invalid_entry_structure",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput => write!(f, "{MISSING_INPUT_MESSAGE}"),
            Self::InvalidPayload => write!(f, "{INVALID_PAYLOAD_MESSAGE}"),
            Self::InvalidEntryStructure(detail) => {
                write!(f, "{INVALID_ENTRY_STRUCTURE_PREFIX}: {detail}")
            }
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_strings_match_contract() {
        assert_eq!(ValidationError::MissingInput.to_string(), "Missing input");
        assert_eq!(
            ValidationError::InvalidPayload.to_string(),
            "Invalid or empty entries data"
        );
        assert_eq!(
            ValidationError::entry("unknown quadrant '99'").to_string(),
            "Invalid entry structure: unknown quadrant '99'"
        );
    }
}
