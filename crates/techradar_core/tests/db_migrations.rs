use rusqlite::{params, Connection};
use techradar_core::db::migrations::{latest_version, schema_version};
use techradar_core::db::{open_db, open_db_in_memory, DbError};
use techradar_core::{
    Entry, Quadrant, RadarDataset, RadarStore, Ring, SqliteRadarStore, TimelineEvent,
};

const DOC_KEY: &str = "onsRadarSkeleton.json";

fn dataset() -> RadarDataset {
    RadarDataset::from_parts(
        "ONS Tech Radar".to_string(),
        vec![Quadrant::new("1", "Languages")],
        vec![Ring::new("adopt", "ADOPT", "#008a00")],
        vec![Entry::new("rust", "1", vec![TimelineEvent::new("adopt", "2025-03")])],
    )
    .expect("fixture dataset is valid")
}

#[test]
fn bare_insert_gets_first_revision_and_timestamp() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO documents (doc_key, body) VALUES (?1, ?2);",
        params![DOC_KEY, r#"{"entries": []}"#],
    )
    .unwrap();

    let (revision, updated_at): (i64, i64) = conn
        .query_row(
            "SELECT revision, updated_at FROM documents WHERE doc_key = ?1;",
            [DOC_KEY],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(revision, 1);
    assert!(updated_at > 0);
}

#[test]
fn revision_below_one_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO documents (doc_key, body, revision) VALUES (?1, ?2, 0);",
            params![DOC_KEY, "{}"],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK constraint failed"));
}

#[test]
fn document_bodies_must_be_json_objects() {
    let conn = open_db_in_memory().unwrap();
    for body in ["not json", "[1, 2]", "\"text\""] {
        let err = conn
            .execute(
                "INSERT INTO documents (doc_key, body) VALUES (?1, ?2);",
                params![DOC_KEY, body],
            )
            .unwrap_err();
        assert!(
            err.to_string().contains("document body must be a JSON object"),
            "body {body}: {err}"
        );
    }

    SqliteRadarStore::new(&conn, DOC_KEY).seed(&dataset()).unwrap();
    let err = conn
        .execute(
            "UPDATE documents SET body = 'truncated{' WHERE doc_key = ?1;",
            [DOC_KEY],
        )
        .unwrap_err();
    assert!(err.to_string().contains("document body must be a JSON object"));
}

#[test]
fn seeded_document_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("radar.db");

    {
        let conn = open_db(&path).unwrap();
        SqliteRadarStore::new(&conn, DOC_KEY).seed(&dataset()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let stored = SqliteRadarStore::new(&conn, DOC_KEY).load().unwrap();
    assert_eq!(stored.revision, 1);
    assert_eq!(stored.dataset, dataset());
}

#[test]
fn version_one_database_gains_the_body_guard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE documents (
                doc_key TEXT PRIMARY KEY NOT NULL,
                body TEXT NOT NULL,
                revision INTEGER NOT NULL DEFAULT 1 CHECK (revision >= 1),
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
            );
            INSERT INTO documents (doc_key, body) VALUES ('onsRadarSkeleton.json', '{\"title\": \"Old\"}');
            PRAGMA user_version = 1;",
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    let stored = SqliteRadarStore::new(&conn, DOC_KEY).load().unwrap();
    assert_eq!(stored.dataset.title(), "Old");
    assert!(conn
        .execute(
            "UPDATE documents SET body = 'oops' WHERE doc_key = ?1;",
            [DOC_KEY],
        )
        .is_err());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}
