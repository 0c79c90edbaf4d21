//! The phone → server append path.

use crate::error::{CacheError, CacheResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use usercache_core::{Clock, Entry, MessageKind, SystemClock, TenantId};
use usercache_storage::RecordStore;

/// Appends message-class entries for one tenant.
///
/// Messages are immutable once stored apart from their `read_ts`, which only
/// [`crate::UserCache::get_message`] sets.
pub struct MessageIngest<S: RecordStore> {
    user_id: TenantId,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore> MessageIngest<S> {
    /// Creates an ingest handle for `user_id`.
    pub fn new(user_id: TenantId, store: Arc<S>) -> Self {
        Self {
            user_id,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to stamp `write_ts`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Stores one message stamped with the current time and returns it.
    ///
    /// # Errors
    ///
    /// Returns a store error if the insert fails.
    pub fn push(
        &self,
        kind: MessageKind,
        key: &str,
        data: Value,
        plugin: Option<&str>,
    ) -> CacheResult<Entry> {
        let mut entry = Entry::message(self.user_id, kind, key, data, self.clock.now());
        if let Some(plugin) = plugin {
            entry = entry.with_plugin(plugin);
        }

        self.store.insert(entry.clone())?;
        debug!(user = %self.user_id, key, kind = %entry.record_type(), "pushed message");
        Ok(entry)
    }

    /// Stores a batch of pre-built entries, keeping their `write_ts`.
    ///
    /// The whole batch is rejected if any entry is a document, belongs to
    /// another tenant, has already been claimed, or has a non-finite
    /// `write_ts`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidEntry`] for a rejected batch, or a store
    /// error if the insert fails.
    pub fn push_batch(&self, entries: Vec<Entry>) -> CacheResult<usize> {
        for entry in &entries {
            self.validate(entry)?;
        }

        let count = self.store.insert_many(entries)?;
        debug!(user = %self.user_id, count, "pushed message batch");
        Ok(count)
    }

    fn validate(&self, entry: &Entry) -> CacheResult<()> {
        if entry.user_id != self.user_id {
            return Err(CacheError::InvalidEntry(format!(
                "entry for tenant {} pushed as tenant {}",
                entry.user_id, self.user_id
            )));
        }
        if !entry.record_type().is_message_class() {
            return Err(CacheError::InvalidEntry(format!(
                "document {:?} cannot be pushed as a message",
                entry.key()
            )));
        }
        if entry.is_read() {
            return Err(CacheError::InvalidEntry(format!(
                "message {:?} already carries a read_ts",
                entry.key()
            )));
        }
        if !entry.metadata.write_ts.is_finite() {
            return Err(CacheError::InvalidEntry(format!(
                "message {:?} has write_ts {}",
                entry.key(),
                entry.metadata.write_ts
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use usercache_core::{ManualClock, RecordType};
    use usercache_storage::InMemoryStore;

    fn ingest() -> (Arc<InMemoryStore>, MessageIngest<InMemoryStore>, TenantId) {
        let store = Arc::new(InMemoryStore::new());
        let user = TenantId::new();
        let ingest = MessageIngest::new(user, Arc::clone(&store))
            .with_clock(Arc::new(ManualClock::new(1_435_856_237.0)));
        (store, ingest, user)
    }

    #[test]
    fn push_stamps_write_ts_and_plugin() {
        let (store, ingest, _) = ingest();
        let entry = ingest
            .push(
                MessageKind::SensorData,
                "background/location",
                json!({"mLat": 45.64, "mLng": 21.35}),
                Some("data"),
            )
            .unwrap();

        assert_eq!(entry.metadata.write_ts, 1_435_856_237.0);
        assert_eq!(entry.record_type(), RecordType::SensorData);
        assert_eq!(entry.metadata.plugin.as_deref(), Some("data"));
        assert_eq!(store.snapshot(), vec![entry]);
    }

    #[test]
    fn push_batch_keeps_client_timestamps() {
        let (store, ingest, user) = ingest();
        let batch = vec![
            Entry::message(user, MessageKind::Message, "a", json!(1), 10.0),
            Entry::message(user, MessageKind::RwDocument, "b", json!(2), 20.0),
        ];

        assert_eq!(ingest.push_batch(batch).unwrap(), 2);
        let stamps: Vec<f64> = store
            .snapshot()
            .iter()
            .map(|entry| entry.metadata.write_ts)
            .collect();
        assert_eq!(stamps, vec![10.0, 20.0]);
    }

    #[test]
    fn push_batch_rejects_documents_whole_batch() {
        let (store, ingest, user) = ingest();
        let batch = vec![
            Entry::message(user, MessageKind::Message, "a", json!(1), 10.0),
            Entry::document(user, "config", json!({}), 11.0),
        ];

        let err = ingest.push_batch(batch).unwrap_err();
        assert!(matches!(err, CacheError::InvalidEntry(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn push_batch_rejects_foreign_tenant() {
        let (_, ingest, _) = ingest();
        let stranger = TenantId::new();
        let batch = vec![Entry::message(stranger, MessageKind::Message, "a", json!(1), 1.0)];
        assert!(ingest.push_batch(batch).unwrap_err().is_client_error());
    }

    #[test]
    fn push_batch_rejects_claimed_entries() {
        let (_, ingest, user) = ingest();
        let mut entry = Entry::message(user, MessageKind::Message, "a", json!(1), 1.0);
        entry.metadata.read_ts = Some(2.0);
        assert!(ingest.push_batch(vec![entry]).is_err());
    }
}
