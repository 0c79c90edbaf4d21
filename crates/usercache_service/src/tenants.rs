//! Tenant discovery for batch consumers.

use crate::error::CacheResult;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use usercache_core::{type_filter, RecordType, TenantId};
use usercache_storage::RecordStore;

/// Lists the tenants present in a store.
///
/// Offline pipelines use this to find which users have work before creating
/// a [`crate::UserCache`] for each of them.
pub struct TenantEnumerator<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> TenantEnumerator<S> {
    /// Creates an enumerator over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns every tenant with at least one entry of any class.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn uuid_list(&self) -> CacheResult<Vec<TenantId>> {
        let tenants = self.store.distinct_tenants()?;
        debug!(count = tenants.len(), "listed tenants");
        Ok(tenants)
    }

    /// Returns the tenants that still hold message-class entries.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub fn tenants_with_pending(&self) -> CacheResult<Vec<TenantId>> {
        let messages = self
            .store
            .find_all(&type_filter(&RecordType::MESSAGE_CLASSES))?;

        let mut seen = HashSet::new();
        Ok(messages
            .into_iter()
            .map(|entry| entry.user_id)
            .filter(|user| seen.insert(*user))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use usercache_core::{Entry, MessageKind};
    use usercache_storage::InMemoryStore;

    #[test]
    fn empty_store_has_no_tenants() {
        let enumerator = TenantEnumerator::new(Arc::new(InMemoryStore::new()));
        assert!(enumerator.uuid_list().unwrap().is_empty());
        assert!(enumerator.tenants_with_pending().unwrap().is_empty());
    }

    #[test]
    fn pending_excludes_document_only_tenants() {
        let (docs_only, with_messages) = (TenantId::new(), TenantId::new());
        let store = Arc::new(InMemoryStore::with_entries(vec![
            Entry::document(docs_only, "config", json!({}), 1.0),
            Entry::message(with_messages, MessageKind::Message, "a", json!(1), 2.0),
            Entry::message(with_messages, MessageKind::SensorData, "b", json!(2), 3.0),
        ]));
        let enumerator = TenantEnumerator::new(store);

        assert_eq!(
            enumerator.uuid_list().unwrap(),
            vec![docs_only, with_messages]
        );
        assert_eq!(
            enumerator.tenants_with_pending().unwrap(),
            vec![with_messages]
        );
    }
}
