//! Store records derived from songs
//!
//! A song is stored under `<namespace>\u{0}<digest>` where `<digest>` is the
//! SHA-256 of the song's canonical JSON. The id depends only on the decoded
//! song, so the same song read from two paths (or two formats) lands on the
//! same record, and an edited song lands on a new one.

use musicociel_babel::Song;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

pub const DEFAULT_NAMESPACE: &str = "song";

/// Value of the `type` field of every song record.
pub const SONG_TYPE: &str = "song";

/// The reserved key range song records live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Namespace {
            prefix: prefix.into(),
        }
    }

    /// First key of the range: `<prefix>\u{0}`.
    pub fn start_key(&self) -> String {
        format!("{}\u{0}", self.prefix)
    }

    /// Last key of the range: `<prefix>\u{0}\u{ffff}`.
    pub fn end_key(&self) -> String {
        format!("{}\u{0}\u{ffff}", self.prefix)
    }

    pub fn key(&self, rest: &str) -> String {
        format!("{}{rest}", self.start_key())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Namespace::new(DEFAULT_NAMESPACE)
    }
}

/// A document as written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    pub id: String,
    /// Revision the write is based on; `None` creates the document.
    pub rev: Option<String>,
    pub deleted: bool,
    pub body: Value,
}

impl StoreRecord {
    /// A deletion marker for `id`, valid only against revision `rev`.
    pub fn tombstone(id: &str, rev: &str) -> Self {
        StoreRecord {
            id: id.to_string(),
            rev: Some(rev.to_string()),
            deleted: true,
            body: json!({ "type": SONG_TYPE }),
        }
    }
}

/// Derives the id of `song` inside `namespace`.
pub fn song_id(song: &Song, namespace: &Namespace) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(song)?;
    Ok(namespace.key(&hex_digest(&canonical)))
}

/// Builds the record that persists `song`.
pub fn to_store_record(song: &Song, namespace: &Namespace) -> Result<StoreRecord, serde_json::Error> {
    let mut body = serde_json::to_value(song)?;
    if let Value::Object(fields) = &mut body {
        fields.insert("type".to_string(), Value::String(SONG_TYPE.to_string()));
    }
    Ok(StoreRecord {
        id: song_id(song, namespace)?,
        rev: None,
        deleted: false,
        body,
    })
}

pub(crate) fn hex_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
