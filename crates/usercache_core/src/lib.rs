//! # User Cache Core
//!
//! Entry model and query builder for the server-side user cache.
//!
//! This crate provides:
//! - The persisted [`Entry`] shape and its tagged [`CacheRecord`] view
//! - Pure filter builders ([`key_filter`], [`type_filter`], [`time_filter`])
//! - A [`Clock`] abstraction used to stamp `write_ts` / `read_ts`
//!
//! This is a pure crate with no I/O operations. Storage lives in
//! `usercache_storage`; the read/clear semantics live in `usercache_service`.
//!
//! ## Example
//!
//! ```rust
//! use usercache_core::{key_filter, message_filter, TenantId, TimeField, TimeQuery};
//!
//! let user = TenantId::new();
//! let window = TimeQuery::new(TimeField::WriteTs, Some(15.0), 30.0).unwrap();
//! let keys = vec!["background/location".to_string()];
//!
//! let filter = message_filter(user, &keys, Some(&window));
//! assert_eq!(filter.tenant(), Some(user));
//! assert!(key_filter(&[]).is_unrestricted());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod entry;
mod error;
mod query;
mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{Entry, Metadata, RecordType, TenantId};
pub use error::{CoreError, CoreResult};
pub use query::{
    document_filter, key_filter, message_filter, tenant_filter, time_filter, type_filter, Clause,
    Filter, TimeField, TimeQuery,
};
pub use record::{CacheRecord, MessageKind};
