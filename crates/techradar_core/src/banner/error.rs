//! Rejection reasons for banner requests.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected banner request. Display strings are part of the observable
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerError {
    /// Missing `message`, empty `pages` or a mistyped optional field.
    InvalidBanner,
    /// `index` absent or not an integer.
    InvalidIndex,
    /// `show` absent or not a boolean.
    InvalidVisibility,
    /// Toggle or delete before any banner document exists.
    MessagesNotFound,
    IndexOutOfRange,
}

impl BannerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBanner => "invalid_banner",
            Self::InvalidIndex => "invalid_banner_index",
            Self::InvalidVisibility => "invalid_banner_visibility",
            Self::MessagesNotFound => "messages_not_found",
            Self::IndexOutOfRange => "banner_index_out_of_range",
        }
    }
}

impl Display for BannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InvalidBanner => "Invalid banner data",
            Self::InvalidIndex => "Invalid banner index",
            Self::InvalidVisibility => "Invalid banner visibility",
            Self::MessagesNotFound => "Messages file not found",
            Self::IndexOutOfRange => "Banner index out of range",
        };
        f.write_str(message)
    }
}

impl Error for BannerError {}
