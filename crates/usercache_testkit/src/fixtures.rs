//! Test fixtures and store helpers.

use serde_json::{json, Value};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use usercache_core::{Entry, ManualClock, MessageKind, TenantId};
use usercache_storage::{FileStore, InMemoryStore, RecordStore};

/// A fixed, realistic start time (2015-07-02T16:55:37Z).
pub const EPOCH: f64 = 1_435_856_237.0;

/// Creates an empty shared in-memory store.
pub fn memory_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

/// Creates a manual clock frozen at [`EPOCH`].
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(EPOCH))
}

/// A file store in a temporary directory that is removed on drop.
pub struct TempFileStore {
    store: Arc<FileStore>,
    dir: TempDir,
}

impl TempFileStore {
    /// Creates a store in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::open(dir.path()).expect("Failed to open file store");
        Self {
            store: Arc::new(store),
            dir,
        }
    }

    /// Returns a shared handle to the store.
    pub fn shared(&self) -> Arc<FileStore> {
        Arc::clone(&self.store)
    }

    /// Returns the store directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Closes and reopens the store, as a process restart would.
    ///
    /// Panics if another handle from [`TempFileStore::shared`] is still alive.
    pub fn reopen(self) -> Self {
        let Self { store, dir } = self;
        drop(store);
        let store = FileStore::open(dir.path()).expect("Failed to reopen file store");
        Self {
            store: Arc::new(store),
            dir,
        }
    }
}

impl Default for TempFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TempFileStore {
    type Target = FileStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// A location fix in the shape the phone sends.
pub fn location_payload(ts: f64) -> Value {
    json!({
        "mLat": 37.3910,
        "mLng": -122.0865,
        "mAccuracy": 12.5,
        "time": ts,
    })
}

/// Builds an unread `message` entry with a location payload.
pub fn message(user: TenantId, key: &str, write_ts: f64) -> Entry {
    Entry::message(user, MessageKind::Message, key, location_payload(write_ts), write_ts)
}

/// Inserts one unread message per `(key, write_ts)` pair.
pub fn seed_messages<S: RecordStore + ?Sized>(store: &S, user: TenantId, items: &[(&str, f64)]) {
    let entries = items
        .iter()
        .map(|(key, ts)| message(user, key, *ts))
        .collect();
    store
        .insert_many(entries)
        .expect("Failed to seed messages");
}
