//! # User Cache Service
//!
//! Server-side synchronization cache between a mobile client and the server.
//!
//! This crate provides:
//! - [`UserCache`]: per-tenant documents (server → phone) and messages
//!   (phone → server) with read-marking and processed-message cleanup
//! - [`MessageIngest`]: the append path used when the phone pushes records
//! - [`TenantEnumerator`]: discovery of tenants for offline batch consumers
//!
//! # Record Classes
//!
//! - `document`: one slot per `(user, key)`, overwritten by each write
//! - `message`, `sensor-data`, `rw-document`: append-only; only `read_ts`
//!   ever changes, and entries disappear only through cleanup
//!
//! # Delivery
//!
//! A read claims what it returns by stamping `read_ts`. Reads do not exclude
//! already-claimed entries, so delivery is at-least-once: a consumer that
//! crashes before clearing will see the same entries again.
//!
//! ```rust
//! use serde_json::json;
//! use std::sync::Arc;
//! use usercache_core::{MessageKind, TenantId, TimeField, TimeQuery};
//! use usercache_service::UserCache;
//! use usercache_storage::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let cache = UserCache::new(TenantId::new(), Arc::clone(&store));
//!
//! cache.ingest().push(MessageKind::SensorData, "background/location", json!({"mLat": 45.6}), None)?;
//! let claimed = cache.get_message(None, None)?;
//! assert_eq!(claimed.len(), 1);
//!
//! let processed = TimeQuery::until(TimeField::ReadTs, f64::MAX)?;
//! assert_eq!(cache.clear_processed_messages(&processed, None)?, 1);
//! # Ok::<(), usercache_service::CacheError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod cache;
mod config;
mod error;
mod ingest;
mod tenants;

pub use cache::UserCache;
pub use config::{CacheConfig, ClaimMode};
pub use error::{CacheError, CacheResult};
pub use ingest::MessageIngest;
pub use tenants::TenantEnumerator;
