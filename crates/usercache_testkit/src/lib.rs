//! # User Cache Testkit
//!
//! Test utilities for the user cache.
//!
//! This crate provides:
//! - Store fixtures (in-memory and temp-dir file stores) and a manual clock
//! - Entry builders with realistic phone payloads
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use usercache_testkit::prelude::*;
//! use usercache_core::{message_filter, TenantId};
//! use usercache_storage::RecordStore;
//!
//! let store = memory_store();
//! let user = TenantId::new();
//! seed_messages(&*store, user, &[("background/location", 10.0), ("stats/event", 20.0)]);
//! assert_eq!(store.count(&message_filter(user, &[], None)).unwrap(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
