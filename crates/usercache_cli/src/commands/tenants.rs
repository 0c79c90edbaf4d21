//! Tenant listing commands.

use super::open_store;
use std::path::Path;
use usercache_core::TenantId;
use usercache_service::TenantEnumerator;

/// Lists every user with cached entries.
pub fn users(path: &Path) -> Result<Vec<TenantId>, Box<dyn std::error::Error>> {
    Ok(TenantEnumerator::new(open_store(path)?).uuid_list()?)
}

/// Lists users with at least one outstanding message.
pub fn pending(path: &Path) -> Result<Vec<TenantId>, Box<dyn std::error::Error>> {
    Ok(TenantEnumerator::new(open_store(path)?).tenants_with_pending()?)
}
