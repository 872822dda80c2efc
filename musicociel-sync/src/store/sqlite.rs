//! SQLite-backed document store
//!
//! Ids are stored as BLOBs so range scans compare raw UTF-8 bytes, which
//! keeps the `\u{0}` namespace separator sorting below every printable id.

use super::{DocumentStore, RowRef, StoredDocument};
use crate::error::StoreError;
use crate::record::{hex_digest, StoreRecord};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id BLOB PRIMARY KEY,
    generation INTEGER NOT NULL,
    rev TEXT NOT NULL,
    deleted INTEGER NOT NULL DEFAULT 0,
    body TEXT NOT NULL
);
";

pub struct SqliteStore {
    conn: Connection,
}

struct Current {
    generation: i64,
    rev: String,
    deleted: bool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        debug!(path = %path.display(), "opened document store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore { conn })
    }
}

fn next_generation(record: &StoreRecord, current: Option<&Current>) -> Result<i64, StoreError> {
    let conflict = || StoreError::Conflict {
        id: record.id.clone(),
    };
    match (current, record.rev.as_deref()) {
        (None, None) => Ok(1),
        (None, Some(_)) => Err(conflict()),
        (Some(cur), None) if cur.deleted => Ok(cur.generation + 1),
        (Some(_), None) => Err(conflict()),
        (Some(cur), Some(rev)) if rev == cur.rev => Ok(cur.generation + 1),
        (Some(_), Some(_)) => Err(conflict()),
    }
}

impl DocumentStore for SqliteStore {
    fn put(&mut self, record: &StoreRecord) -> Result<String, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current = tx
            .query_row(
                "SELECT generation, rev, deleted FROM documents WHERE id = ?1",
                params![record.id.as_bytes()],
                |row| {
                    Ok(Current {
                        generation: row.get(0)?,
                        rev: row.get(1)?,
                        deleted: row.get(2)?,
                    })
                },
            )
            .optional()?;

        let generation = next_generation(record, current.as_ref())?;
        let body = serde_json::to_string(&record.body)?;
        let previous = current.as_ref().map(|c| c.rev.as_str()).unwrap_or("");
        let seed = format!("{previous}\n{}\n{body}", record.deleted);
        let rev = format!("{generation}-{}", &hex_digest(seed.as_bytes())[..32]);

        tx.execute(
            "INSERT INTO documents (id, generation, rev, deleted, body)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                generation = excluded.generation,
                rev = excluded.rev,
                deleted = excluded.deleted,
                body = excluded.body",
            params![record.id.as_bytes(), generation, rev, record.deleted, body],
        )?;
        tx.commit()?;
        Ok(rev)
    }

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT rev, deleted, body FROM documents WHERE id = ?1",
                params![id.as_bytes()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((rev, deleted, body)) = row else {
            return Ok(None);
        };
        Ok(Some(StoredDocument {
            id: id.to_string(),
            rev,
            deleted,
            body: serde_json::from_str(&body)?,
        }))
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<RowRef>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, rev FROM documents
             WHERE id >= ?1 AND id <= ?2 AND deleted = 0
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![start.as_bytes(), end.as_bytes()], |row| {
                Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, rev)| {
                let id = String::from_utf8(id)
                    .map_err(|err| StoreError::Corrupt(format!("non UTF-8 id: {err}")))?;
                Ok(RowRef { id, rev })
            })
            .collect()
    }
}
