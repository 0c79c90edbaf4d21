//! CLI command implementations.

pub mod document;
pub mod geocode;
pub mod messages;
pub mod tenants;

use std::path::Path;
use std::sync::Arc;
use usercache_storage::FileStore;

/// Opens the store directory shared by the cache commands.
pub fn open_store(path: &Path) -> Result<Arc<FileStore>, Box<dyn std::error::Error>> {
    Ok(Arc::new(FileStore::open(path)?))
}
