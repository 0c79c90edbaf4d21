//! Document commands.

use super::open_store;
use std::path::Path;
use tracing::info;
use usercache_core::{Entry, TenantId};
use usercache_service::UserCache;

/// Stores `value` (JSON text) as the document for `key` and returns it.
pub fn put(
    path: &Path,
    user: TenantId,
    key: &str,
    value: &str,
) -> Result<Entry, Box<dyn std::error::Error>> {
    let value: serde_json::Value = serde_json::from_str(value)?;
    let cache = UserCache::new(user, open_store(path)?);

    cache.put_document(key, value)?;
    info!(%user, key, "document stored");

    let stored = cache
        .get_document(key)?
        .ok_or_else(|| format!("Document {key:?} missing after write"))?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn put_overwrites_document() {
        let dir = tempdir().unwrap();
        let user = TenantId::new();

        put(dir.path(), user, "config/consent", r#"{"approved": false}"#).unwrap();
        let stored = put(dir.path(), user, "config/consent", r#"{"approved": true}"#).unwrap();

        assert_eq!(stored.data, json!({"approved": true}));
        assert!(stored.is_document());
    }

    #[test]
    fn put_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        assert!(put(dir.path(), TenantId::new(), "k", "{not json").is_err());
    }
}
