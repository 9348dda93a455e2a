//! Durable tiers: SQLite primary records and secondary query index, plus a
//! filesystem blob store for oversized evidence text.
//!
//! Primary records are keyed `{setId}_{effectiveTime}` and hold the snapshot
//! as JSON. Evidence text stays inline below [`INLINE_EVIDENCE_LIMIT`] bytes;
//! above it the text moves to `<blob_dir>/<doc_id>.evidence.txt` and the row
//! carries an overflow flag instead. All writes are `INSERT OR REPLACE`, so
//! racing writers of the same record are idempotent.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use rxguard_core::LabelSnapshot;
use tracing::{debug, info};

use crate::error::StoreError;

/// Evidence text larger than this many bytes goes to the overflow blob store.
pub const INLINE_EVIDENCE_LIMIT: usize = 900_000;

/// SQLite-backed primary store and query index, with filesystem overflow.
pub struct DurableStore {
    conn: Mutex<Connection>,
    blob_dir: PathBuf,
}

impl DurableStore {
    /// Open or create the durable tiers under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir)?;
        let blob_dir = data_dir.join("evidence");
        fs::create_dir_all(&blob_dir)?;

        let conn = Connection::open(data_dir.join("labels.db"))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS label_records (
                doc_id            TEXT PRIMARY KEY,
                snapshot_json     TEXT NOT NULL,
                evidence_overflow INTEGER NOT NULL DEFAULT 0,
                resolved_at       TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS query_index (
                query_key TEXT PRIMARY KEY,
                doc_id    TEXT NOT NULL
            );
            "#,
        )?;

        info!(data_dir = %data_dir.display(), "opened durable label store");
        Ok(Self {
            conn: Mutex::new(conn),
            blob_dir,
        })
    }

    /// Write a snapshot to the primary store, spilling oversized evidence
    /// text to the blob store first.
    pub fn put_snapshot(&self, snapshot: &LabelSnapshot) -> Result<(), StoreError> {
        let doc_id = snapshot.doc_id();
        let overflow = snapshot.evidence_text.len() > INLINE_EVIDENCE_LIMIT;

        if overflow {
            fs::write(self.blob_path(&doc_id), &snapshot.evidence_text)?;
            debug!(doc_id = %doc_id, bytes = snapshot.evidence_text.len(), "evidence spilled to blob store");
        }

        let mut stored = snapshot.clone();
        if overflow {
            stored.evidence_text.clear();
        }
        let json = serde_json::to_string(&stored)?;

        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO label_records (doc_id, snapshot_json, evidence_overflow, resolved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![doc_id, json, overflow as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load a snapshot by primary key, re-reading overflowed evidence text
    /// from the blob store.
    pub fn get_snapshot(&self, doc_id: &str) -> Result<Option<LabelSnapshot>, StoreError> {
        let row: Option<(String, bool)> = {
            let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
            conn.query_row(
                "SELECT snapshot_json, evidence_overflow FROM label_records WHERE doc_id = ?1",
                params![doc_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
        };
        let Some((json, overflow)) = row else {
            return Ok(None);
        };

        let mut snapshot: LabelSnapshot = serde_json::from_str(&json)?;
        if overflow {
            snapshot.evidence_text = fs::read_to_string(self.blob_path(doc_id))?;
        }
        Ok(Some(snapshot))
    }

    /// Point a normalized query key at a primary record.
    pub fn index_query(&self, query_key: &str, doc_id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO query_index (query_key, doc_id) VALUES (?1, ?2)",
            params![query_key, doc_id],
        )?;
        Ok(())
    }

    /// Look up the primary-record key for a normalized query key.
    pub fn lookup_query(&self, query_key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let doc_id = conn
            .query_row(
                "SELECT doc_id FROM query_index WHERE query_key = ?1",
                params![query_key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(doc_id)
    }

    fn blob_path(&self, doc_id: &str) -> PathBuf {
        self.blob_dir.join(format!("{doc_id}.evidence.txt"))
    }
}
