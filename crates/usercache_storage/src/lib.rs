//! # User Cache Storage
//!
//! The persistence boundary of the user cache.
//!
//! A [`RecordStore`] is a document store partitioned by tenant. It evaluates
//! [`usercache_core::Filter`]s but knows nothing about documents vs. messages;
//! those semantics belong to `usercache_service`.
//!
//! ## Design Principles
//!
//! - Every primitive is atomic on its own
//! - No primitive is atomic together with another one
//! - Must be `Send + Sync` for concurrent access
//! - Errors are surfaced unchanged; stores never retry
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral caches
//! - [`FileStore`] - JSON-lines file with an advisory directory lock
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use usercache_core::{document_filter, Entry, TenantId};
//! use usercache_storage::{InMemoryStore, RecordStore};
//!
//! let store = InMemoryStore::new();
//! let user = TenantId::new();
//! let filter = document_filter(user, "config/sync");
//!
//! store.upsert(&filter, Entry::document(user, "config/sync", json!(1), 1.0)).unwrap();
//! store.upsert(&filter, Entry::document(user, "config/sync", json!(2), 2.0)).unwrap();
//! assert_eq!(store.find_all(&filter).unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::{FieldUpdate, RecordStore, UpsertOutcome};
