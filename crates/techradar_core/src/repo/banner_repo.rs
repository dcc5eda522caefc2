//! Banner document persistence.
//!
//! # Invariants
//! - A missing document is a normal state (no banners yet), not an error.
//! - The first save creates the document; later saves need the loaded
//!   revision.

use crate::model::banner::BannerDocument;
use crate::repo::document_rows::DocumentRows;
use crate::repo::radar_repo::{RepoError, RepoResult, Revision};
use rusqlite::Connection;
use std::sync::Mutex;

/// Loaded banner document together with its revision token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBanners {
    pub document: BannerDocument,
    pub revision: Revision,
}

/// Persistence gateway for the banner document.
pub trait BannerStore {
    /// `None` when no banner document was ever written.
    fn load(&self) -> RepoResult<Option<StoredBanners>>;
    /// Writes the whole document. `expected_revision` is `None` only when
    /// creating it.
    fn save(
        &self,
        document: &BannerDocument,
        expected_revision: Option<Revision>,
    ) -> RepoResult<Revision>;
}

/// SQLite-backed banner store over one `documents` row.
pub struct SqliteBannerStore<'conn> {
    rows: DocumentRows<'conn>,
}

impl<'conn> SqliteBannerStore<'conn> {
    pub fn new(conn: &'conn Connection, doc_key: impl Into<String>) -> Self {
        Self {
            rows: DocumentRows::new(conn, doc_key.into()),
        }
    }
}

impl BannerStore for SqliteBannerStore<'_> {
    fn load(&self) -> RepoResult<Option<StoredBanners>> {
        self.rows
            .fetch()?
            .map(|(body, revision)| {
                Ok(StoredBanners {
                    document: decode(&body)?,
                    revision,
                })
            })
            .transpose()
    }

    fn save(
        &self,
        document: &BannerDocument,
        expected_revision: Option<Revision>,
    ) -> RepoResult<Revision> {
        let body = encode(document)?;
        match expected_revision {
            Some(expected) => self.rows.update(&body, expected),
            None => self.rows.insert(&body),
        }
    }
}

/// In-process banner store.
#[derive(Debug, Default)]
pub struct MemoryBannerStore {
    slot: Mutex<Option<(String, Revision)>>,
}

impl MemoryBannerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BannerStore for MemoryBannerStore {
    fn load(&self) -> RepoResult<Option<StoredBanners>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| RepoError::InvalidData("memory store lock poisoned".to_string()))?;
        slot.as_ref()
            .map(|(body, revision)| {
                Ok(StoredBanners {
                    document: decode(body)?,
                    revision: *revision,
                })
            })
            .transpose()
    }

    fn save(
        &self,
        document: &BannerDocument,
        expected_revision: Option<Revision>,
    ) -> RepoResult<Revision> {
        let body = encode(document)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| RepoError::InvalidData("memory store lock poisoned".to_string()))?;

        let next = match (slot.as_ref(), expected_revision) {
            (None, None) => 1,
            (Some(_), None) => return Err(RepoError::AlreadyExists("memory".to_string())),
            (None, Some(_)) => return Err(RepoError::NotFound("memory".to_string())),
            (Some((_, actual)), Some(expected)) if *actual != expected => {
                return Err(RepoError::Conflict {
                    expected,
                    actual: *actual,
                })
            }
            (Some((_, actual)), Some(_)) => actual + 1,
        };
        *slot = Some((body, next));
        Ok(next)
    }
}

fn encode(document: &BannerDocument) -> RepoResult<String> {
    serde_json::to_string(document).map_err(RepoError::Serialization)
}

fn decode(body: &str) -> RepoResult<BannerDocument> {
    serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!("banner document is not valid JSON: {err}"))
    })
}
