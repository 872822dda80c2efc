use musicociel_babel::{FormatRegistry, TransformConfig};
use musicociel_sync::{
    song_id, DocumentStore, Namespace, RowRef, SqliteStore, StoreError, StoreRecord,
    StoredDocument, SyncError, SyncOptions, Synchronizer,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_song(dir: &Path, name: &str, title: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("{{title: {title}}}\n\n[C]la [G]la [Am]la\n")).unwrap();
    path
}

fn babel_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../musicociel-babel/tests/fixtures")
        .join(name)
}

fn options(prune_others: bool) -> SyncOptions {
    SyncOptions {
        prune_others,
        ..Default::default()
    }
}

fn song_ids(store: &SqliteStore) -> Vec<RowRef> {
    let namespace = Namespace::default();
    store
        .scan(&namespace.start_key(), &namespace.end_key())
        .unwrap()
}

fn run(
    store: &mut SqliteStore,
    files: &[PathBuf],
    prune_others: bool,
) -> Result<musicociel_sync::SyncReport, SyncError> {
    let registry = FormatRegistry::with_defaults();
    Synchronizer::new(&registry, store, options(prune_others)).sync_files(files)
}

#[test]
fn resyncing_unchanged_files_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_song(dir.path(), "a.cho", "A"),
        write_song(dir.path(), "b.cho", "B"),
    ];
    let mut store = SqliteStore::open_in_memory().unwrap();

    let first = run(&mut store, &files, false).unwrap();
    assert_eq!((first.imported, first.conflicted), (2, 0));
    let before = song_ids(&store);

    let second = run(&mut store, &files, false).unwrap();
    assert_eq!((second.imported, second.conflicted), (0, 2));
    assert_eq!(song_ids(&store), before);
}

#[test]
fn same_song_in_two_formats_shares_a_record() {
    let dir = TempDir::new().unwrap();
    let cho = dir.path().join("grace.cho");
    let txt = dir.path().join("grace.txt");
    fs::copy(babel_fixture("amazing-grace.cho"), &cho).unwrap();
    fs::copy(babel_fixture("amazing-grace.txt"), &txt).unwrap();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let report = run(&mut store, &[cho, txt], false).unwrap();

    assert_eq!((report.imported, report.conflicted), (1, 1));
    assert_eq!(song_ids(&store).len(), 1);
}

#[test]
fn ids_follow_the_transformed_song() {
    let dir = TempDir::new().unwrap();
    let file = write_song(dir.path(), "a.cho", "A");
    let registry = FormatRegistry::with_defaults();
    let source = fs::read_to_string(&file).unwrap();
    let song = registry.decode(&source, Some("a.cho"), None).unwrap();
    let expected = song_id(&song, &Namespace::default()).unwrap();

    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &[file.clone()], false).unwrap();
    assert_eq!(song_ids(&store)[0].id, expected);

    let transposed = SyncOptions {
        transform: TransformConfig {
            transpose_semitones: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let report = Synchronizer::new(&registry, &mut store, transposed)
        .sync_files(&[file])
        .unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(song_ids(&store).len(), 2);
}

#[test]
fn prune_deletes_only_records_without_a_file() {
    let dir = TempDir::new().unwrap();
    let a = write_song(dir.path(), "a.cho", "A");
    let b = write_song(dir.path(), "b.cho", "B");
    let c = write_song(dir.path(), "c.cho", "C");
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &[a.clone(), b, c.clone()], false).unwrap();
    let before = song_ids(&store);
    assert_eq!(before.len(), 3);

    let report = run(&mut store, &[a, c], true).unwrap();

    assert_eq!(report.imported, 0);
    assert_eq!(report.conflicted, 2);
    assert_eq!(report.pruned, 1);
    assert!(report.is_success());

    let after = song_ids(&store);
    assert_eq!(after.len(), 2);
    for row in &after {
        assert!(before.contains(row), "surviving records keep their revision");
    }
    let deleted: Vec<_> = before.iter().filter(|row| !after.contains(row)).collect();
    assert_eq!(deleted.len(), 1);
    assert!(store.get(&deleted[0].id).unwrap().unwrap().deleted);
}

#[test]
fn empty_run_with_prune_clears_only_the_namespace() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_song(dir.path(), "a.cho", "A"),
        write_song(dir.path(), "b.cho", "B"),
    ];
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &files, false).unwrap();
    for id in ["songbook", "settings\u{0}theme"] {
        store
            .put(&StoreRecord {
                id: id.to_string(),
                rev: None,
                deleted: false,
                body: json!({ "type": "other" }),
            })
            .unwrap();
    }

    let report = run(&mut store, &[], true).unwrap();

    assert_eq!(report.pruned, 2);
    assert!(song_ids(&store).is_empty());
    assert!(!store.get("songbook").unwrap().unwrap().deleted);
    assert!(!store.get("settings\u{0}theme").unwrap().unwrap().deleted);
}

#[test]
fn without_prune_nothing_is_deleted() {
    let dir = TempDir::new().unwrap();
    let a = write_song(dir.path(), "a.cho", "A");
    let b = write_song(dir.path(), "b.cho", "B");
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &[a.clone(), b], false).unwrap();

    let report = run(&mut store, &[a], false).unwrap();

    assert_eq!(report.pruned, 0);
    assert_eq!(song_ids(&store).len(), 2);
}

/// Edits `victim` right before the prune pass tries to delete it, as another
/// writer sharing the store would.
struct ConcurrentEditor {
    inner: SqliteStore,
    victim: String,
    edited: bool,
}

impl DocumentStore for ConcurrentEditor {
    fn put(&mut self, record: &StoreRecord) -> Result<String, StoreError> {
        if record.deleted && record.id == self.victim && !self.edited {
            self.edited = true;
            let current = self.inner.get(&self.victim)?.expect("victim exists");
            let mut body = current.body;
            body["title"] = json!("Edited elsewhere");
            self.inner.put(&StoreRecord {
                id: current.id,
                rev: Some(current.rev),
                deleted: false,
                body,
            })?;
        }
        self.inner.put(record)
    }

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.inner.get(id)
    }

    fn scan(&self, start: &str, end: &str) -> Result<Vec<RowRef>, StoreError> {
        self.inner.scan(start, end)
    }
}

#[test]
fn prune_spares_records_changed_after_the_scan() {
    let dir = TempDir::new().unwrap();
    let a = write_song(dir.path(), "a.cho", "A");
    let b = write_song(dir.path(), "b.cho", "B");
    let c = write_song(dir.path(), "c.cho", "C");
    let mut inner = SqliteStore::open_in_memory().unwrap();
    run(&mut inner, &[a.clone(), b.clone(), c], false).unwrap();

    let registry = FormatRegistry::with_defaults();
    let b_song = registry
        .decode(&fs::read_to_string(&b).unwrap(), Some("b.cho"), None)
        .unwrap();
    let victim = song_id(&b_song, &Namespace::default()).unwrap();
    let store = ConcurrentEditor {
        inner,
        victim: victim.clone(),
        edited: false,
    };

    let mut sync = Synchronizer::new(&registry, store, options(true));
    let report = sync.sync_files(&[a]).unwrap();

    assert_eq!(report.pruned, 1);
    assert_eq!(report.prune_failed(), 1);
    assert_eq!(report.prune_failures[0].id, victim);
    assert!(report.prune_failures[0].error.is_conflict());

    let store = sync.into_store();
    let survivor = store.get(&victim).unwrap().unwrap();
    assert!(!survivor.deleted);
    assert_eq!(survivor.body["title"], "Edited elsewhere");
}

/// Fails every write with a non-conflict error.
#[derive(Default)]
struct BrokenStore {
    puts: usize,
}

impl DocumentStore for BrokenStore {
    fn put(&mut self, _record: &StoreRecord) -> Result<String, StoreError> {
        self.puts += 1;
        Err(StoreError::Corrupt("disk on fire".to_string()))
    }

    fn get(&self, _id: &str) -> Result<Option<StoredDocument>, StoreError> {
        Ok(None)
    }

    fn scan(&self, _start: &str, _end: &str) -> Result<Vec<RowRef>, StoreError> {
        Ok(Vec::new())
    }
}

#[test]
fn store_failures_other_than_conflicts_abort_the_run() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_song(dir.path(), "a.cho", "A"),
        write_song(dir.path(), "b.cho", "B"),
    ];
    let registry = FormatRegistry::with_defaults();
    let mut store = BrokenStore::default();

    let err = Synchronizer::new(&registry, &mut store, options(true))
        .sync_files(&files)
        .unwrap_err();

    assert!(matches!(err, SyncError::Store(StoreError::Corrupt(_))));
    assert_eq!(store.puts, 1);
}

#[test]
fn undecodable_files_abort_before_pruning() {
    let dir = TempDir::new().unwrap();
    let a = write_song(dir.path(), "a.cho", "A");
    let b = write_song(dir.path(), "b.cho", "B");
    let mut store = SqliteStore::open_in_memory().unwrap();
    run(&mut store, &[a.clone(), b], false).unwrap();

    let broken = dir.path().join("broken.cho");
    fs::write(&broken, "{title: Broken\n[C]la\n").unwrap();
    let err = run(&mut store, &[a, broken.clone()], true).unwrap_err();

    match err {
        SyncError::Convert { path, .. } => assert_eq!(path, broken),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(song_ids(&store).len(), 2);
}

#[test]
fn patterns_expand_into_files() {
    let dir = TempDir::new().unwrap();
    write_song(dir.path(), "a.cho", "A");
    write_song(dir.path(), "b.cho", "B");
    let registry = FormatRegistry::with_defaults();
    let mut store = SqliteStore::open_in_memory().unwrap();

    let pattern = format!("{}/*.cho", dir.path().display());
    let report = musicociel_sync::sync(&registry, &mut store, &[pattern], options(false)).unwrap();

    assert_eq!(report.imported, 2);
}
