//! Address-book identifier and profile model.

use serde::{Deserialize, Serialize};

const GITHUB_PROFILE_BASE_URL: &str = "https://github.com/";

/// Classification of one address-book lookup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Username,
    Email,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Organisation member record assembled from directory data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "accountID")]
    pub account_id: Option<String>,
    pub avatar_url: Option<String>,
    pub url: Option<String>,
    pub fullname: Option<String>,
}

impl UserProfile {
    /// Builds a profile from whichever side of the username/email pair is
    /// known, deriving `url` and `fullname`.
    pub fn from_pair(username: Option<String>, email: Option<String>) -> Self {
        let url = username.as_deref().map(github_profile_url);
        let fullname = email.as_deref().and_then(fullname_from_email);
        Self {
            username,
            email,
            account_id: None,
            avatar_url: None,
            url,
            fullname,
        }
    }
}

/// Returns the GitHub profile URL for one username.
pub fn github_profile_url(username: &str) -> String {
    format!("{GITHUB_PROFILE_BASE_URL}{username}")
}

/// Derives a display name from an organisation email address.
///
/// `john.smith@ons.gov.uk` -> `john smith`. Only the first two dot-separated
/// parts of the local part are used.
pub fn fullname_from_email(email: &str) -> Option<String> {
    let lowered = email.trim().to_lowercase();
    let local = lowered.split('@').next().unwrap_or_default();
    if local.is_empty() {
        return None;
    }
    let name = local.split('.').take(2).collect::<Vec<_>>().join(" ");
    Some(name)
}
