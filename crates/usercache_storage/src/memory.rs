//! In-memory record store for testing.

use crate::error::{StoreError, StoreResult};
use crate::store::{self, FieldUpdate, RecordStore, UpsertOutcome};
use parking_lot::{Mutex, RwLock};
use usercache_core::{Entry, Filter, TenantId};

/// An in-memory record store.
///
/// This store keeps all entries in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral caches that don't need persistence
///
/// # Thread Safety
///
/// Each primitive holds the lock for its whole duration, so every primitive
/// is atomic. Nothing is atomic across two calls.
///
/// # Failure Injection
///
/// [`InMemoryStore::fail_after`] makes the store report
/// [`StoreError::Unavailable`] once a budget of successful calls is spent,
/// which lets tests exercise partially applied multi-step operations.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use usercache_core::{tenant_filter, Entry, MessageKind, TenantId};
/// use usercache_storage::{InMemoryStore, RecordStore};
///
/// let store = InMemoryStore::new();
/// let user = TenantId::new();
/// store.insert(Entry::message(user, MessageKind::Message, "k", json!(1), 1.0)).unwrap();
/// assert_eq!(store.count(&tenant_filter(user)).unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<Vec<Entry>>,
    /// Remaining successful calls before the store goes unavailable.
    budget: Mutex<Option<usize>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-existing entries.
    #[must_use]
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            budget: Mutex::new(None),
        }
    }

    /// Returns a copy of every entry, across all tenants.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.read().clone()
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

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Lets `calls` more calls succeed, then fails every call after them.
    ///
    /// `None` restores normal operation.
    pub fn fail_after(&self, calls: Option<usize>) {
        *self.budget.lock() = calls;
    }

    fn check_available(&self) -> StoreResult<()> {
        let mut budget = self.budget.lock();
        match budget.as_mut() {
            None => Ok(()),
            Some(0) => Err(StoreError::Unavailable(
                "in-memory store is offline".to_string(),
            )),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
        }
    }
}

impl RecordStore for InMemoryStore {
    fn insert(&self, entry: Entry) -> StoreResult<()> {
        self.check_available()?;
        self.entries.write().push(entry);
        Ok(())
    }

    fn insert_many(&self, entries: Vec<Entry>) -> StoreResult<usize> {
        self.check_available()?;
        let count = entries.len();
        self.entries.write().extend(entries);
        Ok(count)
    }

    fn upsert(&self, filter: &Filter, replacement: Entry) -> StoreResult<UpsertOutcome> {
        self.check_available()?;
        let mut entries = self.entries.write();
        Ok(store::upsert_in(&mut entries, filter, replacement))
    }

    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Entry>> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect())
    }

    fn update_all(&self, filter: &Filter, update: FieldUpdate) -> StoreResult<usize> {
        self.check_available()?;
        let mut entries = self.entries.write();
        Ok(store::update_in(&mut entries, filter, update))
    }

    fn delete_all(&self, filter: &Filter) -> StoreResult<usize> {
        self.check_available()?;
        let mut entries = self.entries.write();
        Ok(store::delete_in(&mut entries, filter))
    }

    fn find_and_mark(&self, filter: &Filter, read_ts: f64) -> StoreResult<Vec<Entry>> {
        self.check_available()?;
        let mut entries = self.entries.write();
        Ok(store::mark_in(&mut entries, filter, read_ts))
    }

    fn distinct_tenants(&self) -> StoreResult<Vec<TenantId>> {
        self.check_available()?;
        Ok(store::tenants_in(&self.entries.read()))
    }

    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|entry| filter.matches(entry))
            .count())
    }
}
