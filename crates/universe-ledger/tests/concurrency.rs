//! Concurrent writers and readers against a shared store.
//!
//! These tests verify:
//! - Parallel `add_event` calls from many authors all land
//! - Readers running alongside writers only ever see complete events
//! - The agent registry ends with one entry per author

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use universe_crypto::KeyPair;
use universe_ledger::{Event, EventStore};

const WRITERS: usize = 8;
const EVENTS_PER_WRITER: usize = 25;

fn make_event(store: &EventStore, keys: &KeyPair, writer: usize, n: usize, parent: Option<&str>) -> Event {
    let mut fields = BTreeMap::new();
    fields.insert("writer".to_string(), writer.to_string());
    fields.insert("n".to_string(), n.to_string());
    store
        .create_event(
            "state_change",
            &format!("writer {writer} event {n}"),
            fields,
            parent.into_iter().map(str::to_string).collect(),
            &keys.public_key_bytes(),
            &keys.private_key_bytes(),
        )
        .expect("create should succeed")
}

#[test]
fn parallel_writers_and_readers() {
    let store = Arc::new(EventStore::new());
    let keys: Vec<KeyPair> = (0..WRITERS)
        .map(|_| KeyPair::generate().expect("keygen"))
        .collect();

    thread::scope(|s| {
        for (writer, k) in keys.iter().enumerate() {
            let store = Arc::clone(&store);
            s.spawn(move || {
                let mut last: Option<String> = None;
                for n in 0..EVENTS_PER_WRITER {
                    let event = make_event(&store, k, writer, n, last.as_deref());
                    last = Some(store.add_event(event).expect("add should succeed"));
                }
            });
        }

        for _ in 0..4 {
            let store = Arc::clone(&store);
            s.spawn(move || {
                for _ in 0..50 {
                    for event in store.get_recent_events(10) {
                        // Every visible event is fully verified and complete.
                        let hash = event.hash().expect("hash");
                        assert_eq!(store.get_event(&hash), Some(event));
                    }
                    let agents = store.get_agents();
                    assert!(agents.len() <= WRITERS);
                }
            });
        }
    });

    assert_eq!(store.len(), WRITERS * EVENTS_PER_WRITER);

    let agents = store.get_agents();
    assert_eq!(agents.len(), WRITERS);
    for k in &keys {
        let info = &agents[&k.public_key_hex()];
        // Each writer's latest event chains back through all its events.
        let chain = store.get_event_chain(&info.last_event_hash, EVENTS_PER_WRITER + 5);
        assert_eq!(chain.len(), EVENTS_PER_WRITER);
        assert!(chain.iter().all(|e| e.author_key == k.public_key_hex()));
        assert_eq!(
            chain[0].payload.fields["n"],
            (EVENTS_PER_WRITER - 1).to_string()
        );
    }
}

#[test]
fn create_event_runs_without_store_lock() {
    // Creation is pure; it can run while another thread holds events in
    // flight without affecting the store.
    let store = Arc::new(EventStore::new());
    let k = KeyPair::generate().expect("keygen");

    let events: Vec<Event> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|writer| {
                let store = Arc::clone(&store);
                let k = &k;
                s.spawn(move || make_event(&store, k, writer, 0, None))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect()
    });

    assert!(store.is_empty());
    for event in events {
        store.add_event(event).expect("add should succeed");
    }
    assert_eq!(store.len(), 4);
    assert_eq!(store.get_agents().len(), 1);
}
