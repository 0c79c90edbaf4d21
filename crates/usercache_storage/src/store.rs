//! Record store trait definition.

use crate::error::StoreResult;
use std::collections::HashSet;
use usercache_core::{Entry, Filter, TenantId};

/// The only field mutation a store applies to existing entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldUpdate {
    /// Sets `metadata.read_ts`.
    SetReadTs(f64),
}

impl FieldUpdate {
    /// Applies the update to an entry in place.
    pub fn apply(&self, entry: &mut Entry) {
        match self {
            FieldUpdate::SetReadTs(ts) => entry.metadata.read_ts = Some(*ts),
        }
    }
}

/// What an [`RecordStore::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry matched; the replacement was inserted.
    Inserted,
    /// An existing entry was replaced.
    Replaced,
}

/// A tenant-partitioned document store.
///
/// Stores evaluate filters and apply mutations. They do not interpret record
/// classes; the user cache owns those semantics.
///
/// # Invariants
///
/// - Each method is atomic with respect to concurrent callers
/// - `upsert` never leaves two entries matching its filter
/// - `find_all` returns entries in insertion order
/// - No method retries; failures are returned as-is
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait RecordStore: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert(&self, entry: Entry) -> StoreResult<()>;

    /// Appends several entries, returning how many were stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn insert_many(&self, entries: Vec<Entry>) -> StoreResult<usize> {
        let count = entries.len();
        for entry in entries {
            self.insert(entry)?;
        }
        Ok(count)
    }

    /// Replaces the entry matching `filter`, or inserts `replacement` if none does.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. On error the prior
    /// entry is retained.
    fn upsert(&self, filter: &Filter, replacement: Entry) -> StoreResult<UpsertOutcome>;

    /// Returns every entry matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Entry>>;

    /// Applies `update` to every entry matching `filter`, returning the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn update_all(&self, filter: &Filter, update: FieldUpdate) -> StoreResult<usize>;

    /// Removes every entry matching `filter`, returning the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete_all(&self, filter: &Filter) -> StoreResult<usize>;

    /// Sets `read_ts` on every entry matching `filter` and returns the
    /// post-update entries, as one atomic step.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. On error no entry is
    /// marked.
    fn find_and_mark(&self, filter: &Filter, read_ts: f64) -> StoreResult<Vec<Entry>>;

    /// Returns every tenant with at least one entry, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn distinct_tenants(&self) -> StoreResult<Vec<TenantId>>;

    /// Returns the distinct keys of entries matching `filter`, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn distinct_keys(&self, filter: &Filter) -> StoreResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .find_all(filter)?
            .into_iter()
            .map(|entry| entry.metadata.key)
            .filter(|key| seen.insert(key.clone()))
            .collect())
    }

    /// Returns how many entries match `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        Ok(self.find_all(filter)?.len())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn insert(&self, entry: Entry) -> StoreResult<()> {
        (**self).insert(entry)
    }

    fn insert_many(&self, entries: Vec<Entry>) -> StoreResult<usize> {
        (**self).insert_many(entries)
    }

    fn upsert(&self, filter: &Filter, replacement: Entry) -> StoreResult<UpsertOutcome> {
        (**self).upsert(filter, replacement)
    }

    fn find_all(&self, filter: &Filter) -> StoreResult<Vec<Entry>> {
        (**self).find_all(filter)
    }

    fn update_all(&self, filter: &Filter, update: FieldUpdate) -> StoreResult<usize> {
        (**self).update_all(filter, update)
    }

    fn delete_all(&self, filter: &Filter) -> StoreResult<usize> {
        (**self).delete_all(filter)
    }

    fn find_and_mark(&self, filter: &Filter, read_ts: f64) -> StoreResult<Vec<Entry>> {
        (**self).find_and_mark(filter, read_ts)
    }

    fn distinct_tenants(&self) -> StoreResult<Vec<TenantId>> {
        (**self).distinct_tenants()
    }

    fn distinct_keys(&self, filter: &Filter) -> StoreResult<Vec<String>> {
        (**self).distinct_keys(filter)
    }

    fn count(&self, filter: &Filter) -> StoreResult<usize> {
        (**self).count(filter)
    }
}

// Shared entry-list primitives. Both stores run these under their write lock.

pub(crate) fn upsert_in(
    entries: &mut Vec<Entry>,
    filter: &Filter,
    replacement: Entry,
) -> UpsertOutcome {
    let matched: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .map(|(index, _)| index)
        .collect();

    let Some((&first, duplicates)) = matched.split_first() else {
        entries.push(replacement);
        return UpsertOutcome::Inserted;
    };

    // Collapse any duplicates that slipped in through direct inserts.
    entries[first] = replacement;
    for &index in duplicates.iter().rev() {
        entries.remove(index);
    }
    UpsertOutcome::Replaced
}

pub(crate) fn update_in(entries: &mut [Entry], filter: &Filter, update: FieldUpdate) -> usize {
    let mut count = 0;
    for entry in entries.iter_mut().filter(|entry| filter.matches(entry)) {
        update.apply(entry);
        count += 1;
    }
    count
}

pub(crate) fn mark_in(entries: &mut [Entry], filter: &Filter, read_ts: f64) -> Vec<Entry> {
    let update = FieldUpdate::SetReadTs(read_ts);
    entries
        .iter_mut()
        .filter(|entry| filter.matches(entry))
        .map(|entry| {
            update.apply(entry);
            entry.clone()
        })
        .collect()
}

pub(crate) fn delete_in(entries: &mut Vec<Entry>, filter: &Filter) -> usize {
    let before = entries.len();
    entries.retain(|entry| !filter.matches(entry));
    before - entries.len()
}

pub(crate) fn tenants_in(entries: &[Entry]) -> Vec<TenantId> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| entry.user_id)
        .filter(|user| seen.insert(*user))
        .collect()
}
