//! Caller-facing service error.

use crate::address_book::directory::DirectoryError;
use crate::banner::error::BannerError;
use crate::radar::error::ValidationError;
use crate::repo::radar_repo::RepoError;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message exposed for failures whose cause must not leak to callers.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Service error for radar, banner and address-book use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Rejected input; nothing was written.
    Validation(ValidationError),
    /// Rejected banner request; nothing was written.
    Banner(BannerError),
    /// Persistence gateway failed to load or save.
    Storage(RepoError),
    /// Directory collaborator failed.
    Upstream(DirectoryError),
}

impl ServiceError {
    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Banner(_) => 400,
            Self::Storage(_) | Self::Upstream(_) => 500,
        }
    }

    /// Stable user-visible message.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Banner(err) => err.to_string(),
            Self::Storage(_) | Self::Upstream(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Structured `{"error": "<message>"}` body.
    pub fn error_body(&self) -> Value {
        json!({ "error": self.public_message() })
    }

    /// Short kind for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::Banner(err) => err.code(),
            Self::Storage(RepoError::Conflict { .. }) => "storage_conflict",
            Self::Storage(_) => "storage_error",
            Self::Upstream(_) => "upstream_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Banner(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::Upstream(err) => write!(f, "upstream error: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Banner(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Upstream(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BannerError> for ServiceError {
    fn from(value: BannerError) -> Self {
        Self::Banner(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<DirectoryError> for ServiceError {
    fn from(value: DirectoryError) -> Self {
        Self::Upstream(value)
    }
}
