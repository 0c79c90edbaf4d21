//! File-based record store for persistent storage.
//!
//! Directory layout:
//!
//! ```text
//! <store_path>/
//! ├─ LOCK                 # Advisory lock for single-process access
//! ├─ entries.jsonl        # One JSON entry per line
//! └─ entries.jsonl.tmp    # Transient, during a rewrite
//! ```

use crate::error::{StoreError, StoreResult};
use crate::store::{self, FieldUpdate, RecordStore, UpsertOutcome};
use fs2::FileExt;
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use usercache_core::{Entry, Filter, TenantId};

const LOCK_FILE: &str = "LOCK";
const ENTRIES_FILE: &str = "entries.jsonl";
const ENTRIES_TEMP: &str = "entries.jsonl.tmp";

/// A file-backed record store.
///
/// Entries are held in memory and the entries file is rewritten atomically
/// (temp file, `sync_all`, rename) after every mutation. A mutation is only
/// visible once its rewrite has succeeded, so a failed write leaves both the
/// file and the in-memory view unchanged.
///
/// # Locking
///
/// The store holds an exclusive advisory lock on `LOCK` for its lifetime.
/// Opening the same directory twice fails with [`StoreError::Locked`].
///
/// # Example
///
/// ```no_run
/// use usercache_storage::{FileStore, RecordStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("usercache")).unwrap();
/// println!("{} tenants", store.distinct_tenants().unwrap().len());
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Vec<Entry>>,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - Another process holds the lock (returns [`StoreError::Locked`])
    /// - The entries file contains an undecodable line
    pub fn open(path: &Path) -> StoreResult<Self> {
        fs::create_dir_all(path)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked {
                path: path.to_path_buf(),
            });
        }

        let entries = Self::load(&path.join(ENTRIES_FILE))?;
        debug!(path = %path.display(), entries = entries.len(), "opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            _lock_file: lock_file,
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn load(file: &Path) -> StoreResult<Vec<Entry>> {
        if !file.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(file)?);
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| StoreError::Corrupted {
                line: index + 1,
                message: e.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn persist(&self, entries: &[Entry]) -> StoreResult<()> {
        let temp = self.path.join(ENTRIES_TEMP);
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            for entry in entries {
                serde_json::to_writer(&mut writer, entry)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp, self.path.join(ENTRIES_FILE))?;
        Ok(())
    }

    /// Applies `f` to a copy of the entries and publishes it once persisted.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Entry>) -> T) -> StoreResult<T> {
        let mut current = self.entries.write();
        let mut next = current.clone();
        let result = f(&mut next);
        self.persist(&next)?;
        *current = next;
        Ok(result)
    }
}

impl RecordStore for FileStore {
    fn insert(&self, entry: Entry) -> StoreResult<()> {
        self.mutate(|entries| entries.push(entry))
    }

    fn insert_many(&self, new_entries: Vec<Entry>) -> StoreResult<usize> {
        let count = new_entries.len();
        self.mutate(|entries| entries.extend(new_entries))?;
        Ok(count)
    }

    fn upsert(&self, filter: &Filter, replacement: Entry) -> StoreResult<UpsertOutcome> {
        self.mutate(|entries| store::upsert_in(entries, filter, replacement))
    }

    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Entry>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    fn update_all(&self, filter: &Filter, update: FieldUpdate) -> StoreResult<usize> {
        self.mutate(|entries| store::update_in(entries, filter, update))
    }

    fn delete_all(&self, filter: &Filter) -> StoreResult<usize> {
        self.mutate(|entries| store::delete_in(entries, filter))
    }

    fn find_and_mark(&self, filter: &Filter, read_ts: f64) -> StoreResult<Vec<Entry>> {
        self.mutate(|entries| store::mark_in(entries, filter, read_ts))
    }

    fn distinct_tenants(&self) -> StoreResult<Vec<TenantId>> {
        Ok(store::tenants_in(&self.entries.read()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use usercache_core::{document_filter, message_filter, MessageKind, TimeField, TimeQuery};

    #[test]
    fn file_reopen_preserves_entries() {
        let dir = tempdir().unwrap();
        let user = TenantId::new();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store
                .upsert(
                    &document_filter(user, "config"),
                    Entry::document(user, "config", json!({"interval": 30}), 1.0),
                )
                .unwrap();
            store
                .insert(Entry::message(user, MessageKind::SensorData, "loc", json!([1, 2]), 2.0))
                .unwrap();
            store
                .update_all(&message_filter(user, &[], None), FieldUpdate::SetReadTs(3.0))
                .unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        let messages = store.find_all(&message_filter(user, &[], None)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].metadata.read_ts, Some(3.0));
        assert_eq!(store.distinct_tenants().unwrap(), vec![user]);
    }

    #[test]
    fn file_second_open_is_locked() {
        let dir = tempdir().unwrap();
        let _first = FileStore::open(dir.path()).unwrap();

        let second = FileStore::open(dir.path());
        assert!(matches!(second, Err(StoreError::Locked { .. })));
    }

    #[test]
    fn file_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        drop(FileStore::open(dir.path()).unwrap());
        assert!(FileStore::open(dir.path()).is_ok());
    }

    #[test]
    fn file_corrupt_line_is_reported() {
        let dir = tempdir().unwrap();
        let user = TenantId::new();
        let good = serde_json::to_string(&Entry::document(user, "k", json!(1), 1.0)).unwrap();
        fs::write(
            dir.path().join(ENTRIES_FILE),
            format!("{good}\n\n{{not json\n"),
        )
        .unwrap();

        let err = FileStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { line: 3, .. }));
    }

    #[test]
    fn file_delete_is_durable() {
        let dir = tempdir().unwrap();
        let user = TenantId::new();

        {
            let store = FileStore::open(dir.path()).unwrap();
            for ts in [1.0, 2.0, 3.0] {
                store
                    .insert(Entry::message(user, MessageKind::Message, "k", json!(ts), ts))
                    .unwrap();
            }
            assert_eq!(
                store.delete_all(&message_filter(user, &[], None)).unwrap(),
                3
            );
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.is_empty());
        assert!(!dir.path().join(ENTRIES_TEMP).exists());
    }

    #[test]
    fn file_reopen_keeps_exact_timestamps() {
        let dir = tempdir().unwrap();
        let user = TenantId::new();
        let write_ts = 1772975636.7101467;
        let read_ts = 1797027325.2008545;

        {
            let store = FileStore::open(dir.path()).unwrap();
            store
                .insert(Entry::message(user, MessageKind::SensorData, "k", json!({}), write_ts))
                .unwrap();
            let claimed = store
                .find_and_mark(&message_filter(user, &[], None), read_ts)
                .unwrap();
            assert_eq!(claimed.len(), 1);
        }

        let store = FileStore::open(dir.path()).unwrap();
        let loaded = store.find_all(&message_filter(user, &[], None)).unwrap();
        assert_eq!(loaded[0].metadata.write_ts, write_ts);
        assert_eq!(loaded[0].metadata.read_ts, Some(read_ts));

        let window = TimeQuery::new(TimeField::ReadTs, Some(read_ts), read_ts + 0.5).unwrap();
        assert_eq!(
            store
                .delete_all(&message_filter(user, &[], Some(&window)))
                .unwrap(),
            1
        );
    }
}
