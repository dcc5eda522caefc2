//! Row-level access to the `documents` table shared by the document stores.
//!
//! # Invariants
//! - Updates are conditional on the caller's revision; a stale revision
//!   changes nothing.
//! - Every successful update increments `revision` by one and stamps
//!   `updated_at` in milliseconds.

use crate::repo::radar_repo::{RepoError, RepoResult, Revision};
use rusqlite::{params, Connection, OptionalExtension};

/// Key-scoped view of one document row.
pub(crate) struct DocumentRows<'conn> {
    conn: &'conn Connection,
    doc_key: String,
}

impl<'conn> DocumentRows<'conn> {
    pub(crate) fn new(conn: &'conn Connection, doc_key: String) -> Self {
        Self { conn, doc_key }
    }

    pub(crate) fn doc_key(&self) -> &str {
        &self.doc_key
    }

    /// Body and revision, `None` when no row exists for the key.
    pub(crate) fn fetch(&self) -> RepoResult<Option<(String, Revision)>> {
        let row = self
            .conn
            .query_row(
                "SELECT body, revision FROM documents WHERE doc_key = ?1;",
                [self.doc_key.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Revision>(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// Inserts the first revision.
    ///
    /// # Errors
    /// - `AlreadyExists` when the key already holds a row.
    pub(crate) fn insert(&self, body: &str) -> RepoResult<Revision> {
        let inserted = self.conn.execute(
            "INSERT INTO documents (doc_key, body, revision)
             VALUES (?1, ?2, 1)
             ON CONFLICT(doc_key) DO NOTHING;",
            params![self.doc_key.as_str(), body],
        )?;
        if inserted == 0 {
            return Err(RepoError::AlreadyExists(self.doc_key.clone()));
        }
        Ok(1)
    }

    /// Replaces the body when the stored revision equals `expected`.
    ///
    /// # Errors
    /// - `Conflict` when another writer moved the revision.
    /// - `NotFound` when the row disappeared.
    pub(crate) fn update(&self, body: &str, expected: Revision) -> RepoResult<Revision> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?1,
                revision = revision + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE doc_key = ?2 AND revision = ?3;",
            params![body, self.doc_key.as_str(), expected],
        )?;
        if changed == 1 {
            return Ok(expected + 1);
        }

        match self.current_revision()? {
            Some(actual) => Err(RepoError::Conflict { expected, actual }),
            None => Err(RepoError::NotFound(self.doc_key.clone())),
        }
    }

    fn current_revision(&self) -> RepoResult<Option<Revision>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM documents WHERE doc_key = ?1;",
                [self.doc_key.as_str()],
                |row| row.get::<_, Revision>(0),
            )
            .optional()?;
        Ok(revision)
    }
}
