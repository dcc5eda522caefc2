//! Username/email classification of lookup tokens.

use crate::model::profile::IdentifierKind;

/// Classifies one normalized token.
///
/// A token is an email when it has exactly one `@`, at least one character
/// on each side, and a `.` after the `@`. Everything else is a username.
pub fn classify(token: &str) -> IdentifierKind {
    let mut parts = token.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return IdentifierKind::Username,
    };

    if !local.is_empty() && !domain.is_empty() && domain.contains('.') {
        IdentifierKind::Email
    } else {
        IdentifierKind::Username
    }
}

/// Lowercases a token for directory keys.
pub fn normalize_identifier(token: &str) -> String {
    token.trim().to_lowercase()
}
