//! Per-tenant user cache.

use crate::config::{CacheConfig, ClaimMode};
use crate::error::CacheResult;
use crate::ingest::MessageIngest;
use crate::tenants::TenantEnumerator;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use usercache_core::{
    document_filter, message_filter, tenant_filter, type_filter, Clock, Entry, RecordType,
    SystemClock, TenantId, TimeQuery,
};
use usercache_storage::{FieldUpdate, RecordStore};

/// The user cache for one tenant.
///
/// All operations are scoped to the tenant fixed at construction; no filter
/// built here can reach another tenant's entries. The cache holds no locks
/// across store calls, so concurrent callers are serialized only by the
/// atomicity of each store primitive.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use std::sync::Arc;
/// use usercache_core::TenantId;
/// use usercache_service::UserCache;
/// use usercache_storage::InMemoryStore;
///
/// let cache = UserCache::new(TenantId::new(), Arc::new(InMemoryStore::new()));
/// cache.put_document("config/sync_config", json!({"interval": 60}))?;
/// cache.put_document("config/sync_config", json!({"interval": 30}))?;
///
/// let doc = cache.get_document("config/sync_config")?.unwrap();
/// assert_eq!(doc.data, json!({"interval": 30}));
/// # Ok::<(), usercache_service::CacheError>(())
/// ```
pub struct UserCache<S: RecordStore> {
    user_id: TenantId,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl<S: RecordStore> UserCache<S> {
    /// Creates a cache for `user_id` with the default configuration.
    pub fn new(user_id: TenantId, store: Arc<S>) -> Self {
        Self::with_config(user_id, store, CacheConfig::default())
    }

    /// Creates a cache with an explicit configuration.
    pub fn with_config(user_id: TenantId, store: Arc<S>, config: CacheConfig) -> Self {
        Self {
            user_id,
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replaces the clock used to stamp `write_ts` and `read_ts`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the tenant this cache is scoped to.
    pub fn user_id(&self) -> TenantId {
        self.user_id
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns an ingest handle for this tenant sharing the store and clock.
    pub fn ingest(&self) -> MessageIngest<S> {
        MessageIngest::new(self.user_id, Arc::clone(&self.store)).with_clock(Arc::clone(&self.clock))
    }

    /// Stores `value` as the document for `key` (server → phone).
    ///
    /// After return exactly one document exists for `(user, key)` and it
    /// holds `value`. The first write for a key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a store error if the upsert fails; the previous value is then
    /// retained.
    pub fn put_document(&self, key: &str, value: Value) -> CacheResult<()> {
        let filter = document_filter(self.user_id, key);
        let document = Entry::document(self.user_id, key, value, self.clock.now());

        let outcome = self.store.upsert(&filter, document)?;
        debug!(user = %self.user_id, key, ?outcome, "stored document");
        Ok(())
    }

    /// Returns the current document for `key` without marking it.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn get_document(&self, key: &str) -> CacheResult<Option<Entry>> {
        let mut found = self.store.find_all(&document_filter(self.user_id, key))?;
        Ok(found.pop())
    }

    /// Claims and returns message-class entries (phone → server).
    ///
    /// Every returned entry has `read_ts` set to this call's time. With no
    /// keys and no window every outstanding entry for the tenant is returned,
    /// including entries claimed by earlier reads. Nothing matching is an
    /// empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns a store error if marking or fetching fails. In
    /// [`ClaimMode::TwoPhase`] a failed fetch can leave entries marked but
    /// undelivered.
    pub fn get_message(
        &self,
        keys: Option<&[String]>,
        time: Option<&TimeQuery>,
    ) -> CacheResult<Vec<Entry>> {
        let read_ts = self.clock.now();
        let filter = message_filter(self.user_id, keys.unwrap_or(&[]), time);

        let messages = match self.config.claim_mode {
            ClaimMode::Atomic => self.store.find_and_mark(&filter, read_ts)?,
            ClaimMode::TwoPhase => {
                let marked = self
                    .store
                    .update_all(&filter, FieldUpdate::SetReadTs(read_ts))?;
                debug!(user = %self.user_id, marked, "updated read timestamp");
                self.store.find_all(&filter)?
            }
        };

        debug!(
            user = %self.user_id,
            found = messages.len(),
            ?filter,
            "claimed messages"
        );
        Ok(messages)
    }

    /// Deletes processed message-class entries matching the window and keys.
    ///
    /// Deletion is unconditional: nothing checks that the entries were read.
    /// Callers sequence read-then-clear themselves, passing an equal or
    /// narrower filter than the read they processed. Returns the number of
    /// entries removed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the delete fails.
    pub fn clear_processed_messages(
        &self,
        time: &TimeQuery,
        keys: Option<&[String]>,
    ) -> CacheResult<usize> {
        let filter = message_filter(self.user_id, keys.unwrap_or(&[]), Some(time));
        debug!(user = %self.user_id, ?filter, "about to delete messages");

        let deleted = self.store.delete_all(&filter)?;
        info!(user = %self.user_id, deleted, "cleared processed messages");
        Ok(deleted)
    }

    /// Returns the keys of this tenant's documents.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn document_keys(&self) -> CacheResult<Vec<String>> {
        let filter = tenant_filter(self.user_id).and(type_filter(&[RecordType::Document]));
        Ok(self.store.distinct_keys(&filter)?)
    }

    /// Returns the distinct keys of this tenant's outstanding messages.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn message_keys(&self) -> CacheResult<Vec<String>> {
        Ok(self
            .store
            .distinct_keys(&message_filter(self.user_id, &[], None))?)
    }

    /// Returns how many message-class entries have not been cleared yet.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn outstanding_count(&self) -> CacheResult<usize> {
        Ok(self.store.count(&message_filter(self.user_id, &[], None))?)
    }

    /// Returns how many message-class entries have never been claimed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn unread_count(&self) -> CacheResult<usize> {
        Ok(self
            .store
            .find_all(&message_filter(self.user_id, &[], None))?
            .iter()
            .filter(|entry| !entry.is_read())
            .count())
    }

    /// Lists every tenant with entries in `store`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn get_uuid_list(store: Arc<S>) -> CacheResult<Vec<TenantId>> {
        TenantEnumerator::new(store).uuid_list()
    }
}

impl<S: RecordStore> fmt::Debug for UserCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCache")
            .field("user_id", &self.user_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
