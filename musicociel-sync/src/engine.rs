//! The sync engine
//!
//! A run imports every input file as a song record, then (when asked)
//! deletes the namespace's records that no input produced:
//!
//!     patterns ──collect──▶ files ──load_song──▶ Song ──record──▶ put
//!                                                                  │
//!     scan namespace ◀── session ids (prune only) ◀────────────────┘
//!       └─▶ tombstone every row not in the session
//!
//! Ids are content hashes, so a conflict on create means the song is already
//! stored and counts as a skip. Tombstones carry the revision seen by the
//! scan, so a record updated concurrently survives and is reported instead.

use crate::collect::collect_files;
use crate::error::{StoreError, SyncError};
use crate::record::{to_store_record, Namespace, StoreRecord};
use crate::store::DocumentStore;
use musicociel_babel::{load_song, FormatRegistry, TransformConfig};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Forces the input format; `None` or `"auto"` detects it per file.
    pub input_format: Option<String>,
    pub transform: TransformConfig,
    /// Delete records of the namespace that this run did not import.
    pub prune_others: bool,
    pub namespace: Namespace,
}

/// A record the prune pass could not delete.
#[derive(Debug)]
pub struct PruneFailure {
    pub id: String,
    pub error: StoreError,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    /// Records written by this run.
    pub imported: usize,
    /// Inputs whose record already existed.
    pub conflicted: usize,
    pub pruned: usize,
    pub prune_failures: Vec<PruneFailure>,
}

impl SyncReport {
    pub fn prune_failed(&self) -> usize {
        self.prune_failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.prune_failures.is_empty()
    }
}

pub struct Synchronizer<'a, S: DocumentStore> {
    registry: &'a FormatRegistry,
    store: S,
    options: SyncOptions,
}

impl<'a, S: DocumentStore> Synchronizer<'a, S> {
    pub fn new(registry: &'a FormatRegistry, store: S, options: SyncOptions) -> Self {
        Synchronizer {
            registry,
            store,
            options,
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Expands `patterns` and syncs the files they match.
    pub fn sync<P: AsRef<str>>(&mut self, patterns: &[P]) -> Result<SyncReport, SyncError> {
        let files = collect_files(patterns)?;
        self.sync_files(&files)
    }

    /// Imports `files` in order, then prunes when enabled.
    ///
    /// Stops at the first read, decode or non-conflict store error; records
    /// written before it stay written and no pruning happens.
    pub fn sync_files(&mut self, files: &[PathBuf]) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let mut session = self.options.prune_others.then(HashSet::new);

        for path in files {
            let id = self.import_file(path, &mut report)?;
            if let Some(session) = session.as_mut() {
                session.insert(id);
            }
        }

        if let Some(session) = session {
            self.prune(&session, &mut report)?;
        }

        info!(
            imported = report.imported,
            conflicted = report.conflicted,
            pruned = report.pruned,
            prune_failed = report.prune_failed(),
            "sync finished"
        );
        Ok(report)
    }

    fn import_file(&mut self, path: &Path, report: &mut SyncReport) -> Result<String, SyncError> {
        info!(path = %path.display(), "importing");
        let source = fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path.to_string_lossy();
        let song = load_song(
            self.registry,
            &source,
            Some(filename.as_ref()),
            self.options.input_format.as_deref(),
            &self.options.transform,
        )
        .map_err(|source| SyncError::Convert {
            path: path.to_path_buf(),
            source,
        })?;
        let record =
            to_store_record(&song, &self.options.namespace).map_err(|source| SyncError::Record {
                path: path.to_path_buf(),
                source,
            })?;

        match self.store.put(&record) {
            Ok(rev) => {
                report.imported += 1;
                debug!(id = ?record.id, %rev, "stored");
            }
            Err(StoreError::Conflict { .. }) => {
                report.conflicted += 1;
                warn!(path = %path.display(), id = ?record.id, "already stored, skipping");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(record.id)
    }

    fn prune(&mut self, keep: &HashSet<String>, report: &mut SyncReport) -> Result<(), SyncError> {
        let namespace = &self.options.namespace;
        let rows = self.store.scan(&namespace.start_key(), &namespace.end_key())?;

        for row in rows.into_iter().filter(|row| !keep.contains(&row.id)) {
            info!(id = ?row.id, "deleting");
            match self.store.put(&StoreRecord::tombstone(&row.id, &row.rev)) {
                Ok(_) => report.pruned += 1,
                Err(error @ StoreError::Conflict { .. }) => {
                    warn!(id = ?row.id, %error, "could not delete");
                    report.prune_failures.push(PruneFailure { id: row.id, error });
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

/// Runs one sync of `patterns` into `store`.
pub fn sync<S: DocumentStore, P: AsRef<str>>(
    registry: &FormatRegistry,
    store: S,
    patterns: &[P],
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    Synchronizer::new(registry, store, options).sync(patterns)
}
