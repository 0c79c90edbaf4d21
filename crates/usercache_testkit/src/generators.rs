//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entries that respect the cache
//! invariants (documents vs. append-only messages).

use proptest::prelude::*;
use serde_json::{json, Value};
use usercache_core::{Entry, MessageKind, TenantId, TimeField, TimeQuery};
use uuid::Uuid;

/// Strategy for generating tenant IDs.
pub fn tenant_id_strategy() -> impl Strategy<Value = TenantId> {
    any::<u128>().prop_map(|bits| TenantId::from_uuid(Uuid::from_u128(bits)))
}

/// Strategy for generating cache keys like `background/location`.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "background/location",
        "background/motion_activity",
        "statemachine/transition",
        "stats/client_nav_event",
        "manual/mode_confirm",
    ])
    .prop_map(str::to_string)
}

/// Strategy for generating message classes.
pub fn message_kind_strategy() -> impl Strategy<Value = MessageKind> {
    prop_oneof![
        Just(MessageKind::Message),
        Just(MessageKind::SensorData),
        Just(MessageKind::RwDocument),
    ]
}

/// Strategy for generating small opaque payloads.
pub fn payload_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,12}".prop_map(|s| json!(s)),
        (any::<i32>(), "[a-z]{1,8}").prop_map(|(n, s)| json!({"n": n, "s": s})),
    ]
}

/// Strategy for generating unread message entries for `user`.
///
/// `write_ts` is drawn from whole seconds in `0..1000` so windows in tests
/// can hit exact boundaries.
pub fn message_strategy(user: TenantId) -> impl Strategy<Value = Entry> {
    (
        message_kind_strategy(),
        key_strategy(),
        payload_strategy(),
        0u32..1000,
    )
        .prop_map(move |(kind, key, payload, ts)| {
            Entry::message(user, kind, key, payload, f64::from(ts))
        })
}

/// Strategy for generating valid write-time windows over `0..1000`.
pub fn write_window_strategy() -> impl Strategy<Value = TimeQuery> {
    (prop::option::of(0u32..1000), 0u32..1000).prop_map(|(start, span)| {
        let start = start.map(f64::from);
        let end = start.unwrap_or(0.0) + f64::from(span);
        TimeQuery::new(TimeField::WriteTs, start, end).expect("generated window is valid")
    })
}
