//! Message commands: push, claim and clear.

use super::open_store;
use serde::Serialize;
use std::path::Path;
use tracing::info;
use usercache_core::{Entry, MessageKind, TenantId, TimeField, TimeQuery};
use usercache_service::{CacheConfig, ClaimMode, UserCache};

/// Result of a clear.
#[derive(Debug, Serialize)]
pub struct ClearResult {
    /// User the clear applied to.
    pub user: TenantId,
    /// Number of entries deleted.
    pub deleted: usize,
}

/// Builds the optional time window from command-line bounds.
///
/// No `end` means no window; a `start` without an `end` is rejected.
pub fn window(
    field: TimeField,
    start: Option<f64>,
    end: Option<f64>,
) -> Result<Option<TimeQuery>, Box<dyn std::error::Error>> {
    match (start, end) {
        (_, Some(end)) => Ok(Some(TimeQuery::new(field, start, end)?)),
        (Some(_), None) => Err("--start requires --end".into()),
        (None, None) => Ok(None),
    }
}

/// Appends a message-class entry with `data` (JSON text) as its payload.
pub fn push(
    path: &Path,
    user: TenantId,
    kind: MessageKind,
    key: &str,
    data: &str,
    plugin: Option<&str>,
) -> Result<Entry, Box<dyn std::error::Error>> {
    let data: serde_json::Value = serde_json::from_str(data)?;
    let cache = UserCache::new(user, open_store(path)?);
    Ok(cache.ingest().push(kind, key, data, plugin)?)
}

/// Claims and returns messages for `user`.
pub fn get(
    path: &Path,
    user: TenantId,
    keys: &[String],
    window: Option<&TimeQuery>,
    two_phase: bool,
) -> Result<Vec<Entry>, Box<dyn std::error::Error>> {
    let mode = if two_phase {
        ClaimMode::TwoPhase
    } else {
        ClaimMode::Atomic
    };
    let cache = UserCache::with_config(
        user,
        open_store(path)?,
        CacheConfig::new().with_claim_mode(mode),
    );
    Ok(cache.get_message(Some(keys), window)?)
}

/// Deletes processed messages for `user` inside `window`.
pub fn clear(
    path: &Path,
    user: TenantId,
    keys: &[String],
    window: &TimeQuery,
) -> Result<ClearResult, Box<dyn std::error::Error>> {
    let cache = UserCache::new(user, open_store(path)?);
    let deleted = cache.clear_processed_messages(window, Some(keys))?;
    info!(%user, deleted, "cleared messages");
    Ok(ClearResult { user, deleted })
}
