//! Directory lookup contract and map-backed implementation.
//!
//! # Responsibility
//! - Define how address-book tokens resolve to member profiles.
//! - Provide an in-process directory over username <-> email maps.
//!
//! # Invariants
//! - Directory keys are lowercase; callers pass normalized identifiers.
//! - A lookup miss is `Ok(None)`, never an error.

use crate::model::profile::{IdentifierKind, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Failure of the directory collaborator itself.
#[derive(Debug)]
pub enum DirectoryError {
    Unavailable(String),
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(details) => write!(f, "directory unavailable: {details}"),
            Self::Read { path, source } => {
                write!(f, "failed to read address book `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid address book `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(_) => None,
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Resolves one identifier to at most one member profile.
pub trait DirectoryLookup {
    fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<UserProfile>, DirectoryError>;
}

impl<D: DirectoryLookup + ?Sized> DirectoryLookup for &D {
    fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<UserProfile>, DirectoryError> {
        (**self).resolve(identifier, kind)
    }
}

/// On-disk address book shape: two lookup dictionaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBookData {
    #[serde(default)]
    pub email_to_username: HashMap<String, String>,
    #[serde(default)]
    pub username_to_email: HashMap<String, String>,
}

/// Directory backed by in-memory username/email maps.
#[derive(Debug, Clone, Default)]
pub struct MapDirectory {
    email_to_username: HashMap<String, String>,
    username_to_email: HashMap<String, String>,
}

impl MapDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory, lowercasing every key.
    pub fn from_data(data: AddressBookData) -> Self {
        let lower = |map: HashMap<String, String>| {
            map.into_iter()
                .map(|(key, value)| (key.trim().to_lowercase(), value))
                .collect()
        };
        Self {
            email_to_username: lower(data.email_to_username),
            username_to_email: lower(data.username_to_email),
        }
    }

    /// Loads an address book JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data: AddressBookData =
            serde_json::from_slice(&bytes).map_err(|source| DirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_data(data))
    }

    /// Registers one member under both keys.
    pub fn insert(&mut self, username: &str, email: &str) {
        let username = username.trim().to_lowercase();
        let email = email.trim().to_lowercase();
        self.email_to_username
            .insert(email.clone(), username.clone());
        self.username_to_email.insert(username, email);
    }

    pub fn len(&self) -> usize {
        self.username_to_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.username_to_email.is_empty() && self.email_to_username.is_empty()
    }
}

impl DirectoryLookup for MapDirectory {
    fn resolve(
        &self,
        identifier: &str,
        kind: IdentifierKind,
    ) -> Result<Option<UserProfile>, DirectoryError> {
        let profile = match kind {
            IdentifierKind::Username => self.username_to_email.get(identifier).map(|email| {
                UserProfile::from_pair(Some(identifier.to_string()), Some(email.clone()))
            }),
            IdentifierKind::Email => self.email_to_username.get(identifier).map(|username| {
                UserProfile::from_pair(Some(username.clone()), Some(identifier.to_string()))
            }),
        };
        Ok(profile)
    }
}
