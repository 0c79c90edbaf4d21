//! End-to-end user cache flows over both stores.

use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use usercache_core::{MessageKind, RecordType, TenantId, TimeField, TimeQuery};
use usercache_service::{CacheConfig, ClaimMode, TenantEnumerator, UserCache};
use usercache_storage::{FileStore, InMemoryStore, RecordStore};
use usercache_testkit::prelude::*;

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|key| key.to_string()).collect()
}

#[test]
fn phone_sync_round_trip() {
    let store = memory_store();
    let clock = manual_clock();
    let user = TenantId::new();
    let cache = UserCache::new(user, Arc::clone(&store)).with_clock(clock.clone());

    cache
        .put_document("config/sensor_config", json!({"accuracy": "high"}))
        .unwrap();

    let ingest = cache.ingest();
    for offset in 0..3 {
        clock.set(EPOCH + f64::from(offset));
        ingest
            .push(
                MessageKind::SensorData,
                "background/location",
                location_payload(EPOCH + f64::from(offset)),
                None,
            )
            .unwrap();
    }
    clock.set(EPOCH + 3.0);
    ingest
        .push(
            MessageKind::Message,
            "statemachine/transition",
            json!({"transition": "T_TRIP_ENDED"}),
            Some("statemachine"),
        )
        .unwrap();

    clock.set(EPOCH + 60.0);
    let locations = cache
        .get_message(Some(keys(&["background/location"]).as_slice()), None)
        .unwrap();
    assert_eq!(locations.len(), 3);
    assert!(locations
        .iter()
        .all(|entry| entry.record_type() == RecordType::SensorData));
    assert_eq!(cache.unread_count().unwrap(), 1);

    let processed = TimeQuery::until(TimeField::ReadTs, EPOCH + 61.0).unwrap();
    assert_eq!(cache.clear_processed_messages(&processed, None).unwrap(), 3);

    assert_eq!(cache.outstanding_count().unwrap(), 1);
    assert_eq!(
        cache.message_keys().unwrap(),
        keys(&["statemachine/transition"])
    );
    assert_eq!(
        cache.document_keys().unwrap(),
        keys(&["config/sensor_config"])
    );
}

#[test]
fn window_selects_middle_entry() {
    let store = memory_store();
    let user = TenantId::new();
    seed_messages(&*store, user, &[("k", 10.0), ("k", 20.0), ("k", 30.0)]);
    let cache = UserCache::new(user, Arc::clone(&store)).with_clock(manual_clock());

    let window = TimeQuery::new(TimeField::WriteTs, Some(15.0), 30.0).unwrap();
    let messages = cache.get_message(None, Some(&window)).unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].metadata.write_ts, 20.0);
    assert_eq!(messages[0].metadata.read_ts, Some(EPOCH));
}

#[test]
fn tenants_are_listed_once_each() {
    let store = memory_store();
    let (alice, bob) = (TenantId::new(), TenantId::new());
    seed_messages(&*store, alice, &[("a", 1.0), ("a", 2.0)]);
    UserCache::new(bob, Arc::clone(&store))
        .put_document("config/consent", json!(true))
        .unwrap();
    seed_messages(&*store, alice, &[("b", 3.0)]);

    let listed: BTreeSet<TenantId> = UserCache::get_uuid_list(Arc::clone(&store))
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(listed, BTreeSet::from([alice, bob]));

    let pending = TenantEnumerator::new(store).tenants_with_pending().unwrap();
    assert_eq!(pending, vec![alice]);
}

#[test]
fn two_phase_failure_leaves_entries_marked() {
    let store = Arc::new(InMemoryStore::new());
    let user = TenantId::new();
    seed_messages(&*store, user, &[("k", 1.0), ("k", 2.0)]);
    let cache = UserCache::with_config(
        user,
        Arc::clone(&store),
        CacheConfig::new().with_claim_mode(ClaimMode::TwoPhase),
    )
    .with_clock(manual_clock());

    store.fail_after(Some(1));
    let err = cache.get_message(None, None).unwrap_err();
    assert!(err.is_store_unavailable());

    store.fail_after(None);
    assert!(store.snapshot().iter().all(|entry| entry.is_read()));
    assert_eq!(cache.get_message(None, None).unwrap().len(), 2);
}

#[test]
fn file_store_flow_survives_restart() {
    let fixture = TempFileStore::new();
    let user = TenantId::new();

    {
        let cache = UserCache::new(user, fixture.shared()).with_clock(manual_clock());
        cache.put_document("config/sync_config", json!({"interval": 60})).unwrap();
        cache.put_document("config/sync_config", json!({"interval": 30})).unwrap();
        seed_messages(&*fixture, user, &[("a", 10.0), ("b", 20.0)]);
        assert_eq!(cache.get_message(Some(keys(&["a"]).as_slice()), None).unwrap().len(), 1);
    }

    let fixture = fixture.reopen();
    let cache: UserCache<FileStore> =
        UserCache::new(user, fixture.shared()).with_clock(manual_clock());

    let doc = cache.get_document("config/sync_config").unwrap().unwrap();
    assert_eq!(doc.data, json!({"interval": 30}));
    assert_eq!(cache.unread_count().unwrap(), 1);

    let processed = TimeQuery::until(TimeField::ReadTs, EPOCH + 1.0).unwrap();
    assert_eq!(cache.clear_processed_messages(&processed, None).unwrap(), 1);
    assert_eq!(cache.message_keys().unwrap(), keys(&["b"]));
}

#[test]
fn concurrent_ingest_and_drain_deliver_everything_once() {
    const TOTAL: u32 = 200;

    let store = memory_store();
    let user = TenantId::new();
    let cache = UserCache::new(user, Arc::clone(&store));

    let writer = {
        let ingest = cache.ingest();
        thread::spawn(move || {
            for n in 0..TOTAL {
                ingest
                    .push(MessageKind::SensorData, "background/location", json!(n), None)
                    .unwrap();
            }
        })
    };

    let drain = |delivered: &mut Vec<u32>| {
        let claimed = cache.get_message(None, None).unwrap();
        assert!(claimed.iter().all(|entry| entry.is_read()));
        let Some(read_ts) = claimed.iter().filter_map(|e| e.metadata.read_ts).reduce(f64::max)
        else {
            return;
        };
        delivered.extend(claimed.iter().filter_map(|e| e.data.as_u64()).map(|n| n as u32));
        let processed = TimeQuery::until(TimeField::ReadTs, read_ts + 1e-3).unwrap();
        cache.clear_processed_messages(&processed, None).unwrap();
    };

    let mut delivered = Vec::new();
    while !writer.is_finished() {
        drain(&mut delivered);
    }
    writer.join().unwrap();
    drain(&mut delivered);

    delivered.sort_unstable();
    assert_eq!(delivered, (0..TOTAL).collect::<Vec<_>>());
    assert!(store.is_empty());
}

#[test]
fn arc_store_is_shared_across_caches() {
    let store = memory_store();
    let user = TenantId::new();
    let writer = UserCache::new(user, Arc::clone(&store));
    let reader = UserCache::new(user, Arc::clone(&store));

    writer
        .ingest()
        .push(MessageKind::RwDocument, "manual/mode_confirm", json!("bike"), None)
        .unwrap();
    assert_eq!(reader.get_message(None, None).unwrap().len(), 1);
    assert_eq!(store.count(&usercache_core::tenant_filter(user)).unwrap(), 1);
}
