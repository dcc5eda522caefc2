//! Radar document persistence contracts and implementations.
//!
//! # Responsibility
//! - Load and save the whole radar document as one unit.
//! - Guard read-modify-write cycles with a revision token.
//!
//! # Invariants
//! - `save` succeeds only when `expected_revision` equals the stored revision;
//!   every successful save increments the revision by one.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::radar::{DatasetError, RadarDataset, RadarDocument};
use crate::repo::document_rows::DocumentRows;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Optimistic-concurrency token of a stored document.
pub type Revision = i64;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence gateway error.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No document stored under this key.
    NotFound(String),
    /// Seeding a key that already holds a document.
    AlreadyExists(String),
    /// Another writer saved first.
    Conflict {
        expected: Revision,
        actual: Revision,
    },
    InvalidData(String),
    Serialization(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "document not found: {key}"),
            Self::AlreadyExists(key) => write!(f, "document already exists: {key}"),
            Self::Conflict { expected, actual } => write!(
                f,
                "document revision conflict: expected {expected}, found {actual}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<DatasetError> for RepoError {
    fn from(value: DatasetError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Loaded dataset together with its revision token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRadar {
    pub dataset: RadarDataset,
    pub revision: Revision,
}

/// Persistence gateway for the radar document.
pub trait RadarStore {
    fn load(&self) -> RepoResult<StoredRadar>;
    /// Replaces the whole document; returns the new revision.
    fn save(&self, dataset: &RadarDataset, expected_revision: Revision) -> RepoResult<Revision>;
}

/// SQLite-backed radar store over one `documents` row.
pub struct SqliteRadarStore<'conn> {
    rows: DocumentRows<'conn>,
}

impl<'conn> SqliteRadarStore<'conn> {
    pub fn new(conn: &'conn Connection, doc_key: impl Into<String>) -> Self {
        Self {
            rows: DocumentRows::new(conn, doc_key.into()),
        }
    }

    pub fn doc_key(&self) -> &str {
        self.rows.doc_key()
    }

    /// Writes the initial document for this key.
    ///
    /// # Errors
    /// - `AlreadyExists` when the key already holds a document.
    pub fn seed(&self, dataset: &RadarDataset) -> RepoResult<Revision> {
        self.rows.insert(&encode(dataset)?)
    }
}

impl RadarStore for SqliteRadarStore<'_> {
    fn load(&self) -> RepoResult<StoredRadar> {
        let (body, revision) = self
            .rows
            .fetch()?
            .ok_or_else(|| RepoError::NotFound(self.rows.doc_key().to_string()))?;
        Ok(StoredRadar {
            dataset: decode(&body)?,
            revision,
        })
    }

    fn save(&self, dataset: &RadarDataset, expected_revision: Revision) -> RepoResult<Revision> {
        self.rows.update(&encode(dataset)?, expected_revision)
    }
}

/// In-process radar store. Holds the serialized document so saves go
/// through the same encode/decode path as durable stores.
#[derive(Debug, Default)]
pub struct MemoryRadarStore {
    slot: Mutex<Option<(String, Revision)>>,
}

impl MemoryRadarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `dataset` at revision 1.
    pub fn seeded(dataset: &RadarDataset) -> RepoResult<Self> {
        let body = encode(dataset)?;
        Ok(Self {
            slot: Mutex::new(Some((body, 1))),
        })
    }

    /// Current revision, `None` when nothing is stored.
    pub fn revision(&self) -> Option<Revision> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|(_, revision)| *revision))
    }
}

impl RadarStore for MemoryRadarStore {
    fn load(&self) -> RepoResult<StoredRadar> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| RepoError::InvalidData("memory store lock poisoned".to_string()))?;
        let (body, revision) = slot
            .as_ref()
            .ok_or_else(|| RepoError::NotFound("memory".to_string()))?;
        Ok(StoredRadar {
            dataset: decode(body)?,
            revision: *revision,
        })
    }

    fn save(&self, dataset: &RadarDataset, expected_revision: Revision) -> RepoResult<Revision> {
        let body = encode(dataset)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| RepoError::InvalidData("memory store lock poisoned".to_string()))?;
        let actual = match slot.as_ref() {
            Some((_, revision)) => *revision,
            None => return Err(RepoError::NotFound("memory".to_string())),
        };
        if actual != expected_revision {
            return Err(RepoError::Conflict {
                expected: expected_revision,
                actual,
            });
        }

        let next = actual + 1;
        *slot = Some((body, next));
        Ok(next)
    }
}

fn encode(dataset: &RadarDataset) -> RepoResult<String> {
    serde_json::to_string(&dataset.to_document()).map_err(RepoError::Serialization)
}

fn decode(body: &str) -> RepoResult<RadarDataset> {
    let document: RadarDocument = serde_json::from_str(body)
        .map_err(|err| RepoError::InvalidData(format!("radar document is not valid JSON: {err}")))?;
    Ok(RadarDataset::from_document(document)?)
}

#[cfg(test)]
mod tests {
    use super::{MemoryRadarStore, RadarStore, RepoError};
    use crate::model::radar::{Entry, Quadrant, RadarDataset, Ring, TimelineEvent};

    fn dataset() -> RadarDataset {
        RadarDataset::from_parts(
            "Radar".to_string(),
            vec![Quadrant::new("1", "Languages")],
            vec![Ring::new("adopt", "ADOPT", "#008a00")],
            vec![Entry::new("rust", "1", vec![TimelineEvent::new("adopt", "2024-01")])],
        )
        .expect("valid dataset")
    }

    #[test]
    fn memory_store_bumps_revision_and_detects_conflicts() {
        let store = MemoryRadarStore::seeded(&dataset()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.dataset, dataset());

        assert_eq!(store.save(&loaded.dataset, 1).unwrap(), 2);
        let err = store.save(&loaded.dataset, 1).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Conflict {
                expected: 1,
                actual: 2
            }
        ));
        assert_eq!(store.revision(), Some(2));
    }

    #[test]
    fn empty_memory_store_is_not_found() {
        let store = MemoryRadarStore::new();
        assert!(matches!(store.load().unwrap_err(), RepoError::NotFound(_)));
        assert!(matches!(
            store.save(&dataset(), 1).unwrap_err(),
            RepoError::NotFound(_)
        ));
    }
}
