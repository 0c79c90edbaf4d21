//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use usercache_core::{Entry, MessageKind, TenantId};

/// Keys drawn from when generating messages.
pub const KEYS: [&str; 4] = [
    "background/location",
    "background/motion_activity",
    "statemachine/transition",
    "stats/client_time",
];

/// Generate `count` unread messages for `user` with write times in `0..count`.
pub fn generate_messages(user: TenantId, count: usize) -> Vec<Entry> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let key = KEYS.choose(&mut rng).copied().unwrap_or(KEYS[0]);
            let payload = json!({
                "mLat": rng.gen_range(-90.0..90.0),
                "mLng": rng.gen_range(-180.0..180.0),
                "mAccuracy": rng.gen_range(1.0..50.0),
            });
            Entry::message(user, MessageKind::SensorData, key, payload, i as f64)
        })
        .collect()
}

/// Generate messages for `tenants` users, `per_tenant` each, interleaved.
pub fn generate_population(tenants: usize, per_tenant: usize) -> (Vec<TenantId>, Vec<Entry>) {
    let users: Vec<TenantId> = (0..tenants).map(|_| TenantId::new()).collect();
    let mut batches: Vec<Vec<Entry>> = users
        .iter()
        .map(|user| generate_messages(*user, per_tenant))
        .collect();

    let mut entries = Vec::with_capacity(tenants * per_tenant);
    for _ in 0..per_tenant {
        for batch in &mut batches {
            if let Some(entry) = batch.pop() {
                entries.push(entry);
            }
        }
    }
    (users, entries)
}
