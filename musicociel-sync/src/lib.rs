//! Song library synchronization
//!
//!     Pushes song files into a revisioned document store. Each song becomes
//!     one record whose id is derived from its content, so re-running a sync
//!     over unchanged files writes nothing. With pruning enabled the run also
//!     deletes records of the namespace that none of its inputs produced.
//!
//!     .
//!     ├── error.rs        # StoreError, SyncError
//!     ├── record.rs       # ids, namespaces, song → record
//!     ├── store           # DocumentStore trait, SQLite implementation
//!     ├── collect.rs      # glob patterns → files
//!     └── engine.rs       # import loop and prune pass
//!
//!     Files are processed one at a time, in pattern order. Decoding and
//!     transformation go through `musicociel_babel::load_song`.

pub mod collect;
pub mod engine;
pub mod error;
pub mod record;
pub mod store;

pub use collect::collect_files;
pub use engine::{sync, PruneFailure, SyncOptions, SyncReport, Synchronizer};
pub use error::{StoreError, SyncError};
pub use record::{song_id, to_store_record, Namespace, StoreRecord, DEFAULT_NAMESPACE};
pub use store::{DocumentStore, RowRef, SqliteStore, StoredDocument};
