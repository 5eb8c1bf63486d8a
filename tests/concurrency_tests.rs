//! Concurrency tests for the stored counter.
//!
//! These tests verify that the per-counter lock fully serializes the
//! read-modify-write sequence.
//! Run with: cargo test --test concurrency_tests

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use stored_counter::contracts::{CounterError, KeyValueStore, SequenceCounter};
use stored_counter::storage::{MemoryStore, RocksDbConfig, RocksDbStore, StoredCounter};
use tempfile::TempDir;

fn create_rocksdb_store() -> (Arc<RocksDbStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    // fsync per put makes hundreds of writes slow; durability is covered elsewhere
    let config = RocksDbConfig {
        sync_writes: false,
        ..RocksDbConfig::default()
    };
    let store = RocksDbStore::open_with_config(dir.path(), config).unwrap();
    (Arc::new(store), dir)
}

/// M threads released together each call next() once.
fn one_call_per_thread<S: KeyValueStore + 'static>(store: Arc<S>, num_threads: usize) -> Vec<u64> {
    let counter = Arc::new(StoredCounter::new(store, "/race"));
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let c = Arc::clone(&counter);
            let b = Arc::clone(&barrier);
            thread::spawn(move || {
                b.wait();
                c.next().expect("next should succeed")
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

// =============================================================================
// Parallel advance tests
// =============================================================================

#[test]
fn parallel_single_calls_memory() {
    let num_threads = 64;
    let mut values = one_call_per_thread(Arc::new(MemoryStore::new()), num_threads);
    values.sort();
    assert_eq!(values, (0..num_threads as u64).collect::<Vec<_>>());
}

#[test]
fn parallel_single_calls_rocksdb() {
    let (store, _dir) = create_rocksdb_store();
    let num_threads = 32;
    let mut values = one_call_per_thread(store, num_threads);
    values.sort();
    assert_eq!(values, (0..num_threads as u64).collect::<Vec<_>>());
}

/// Test that many parallel calls produce no duplicates and no gaps.
#[test]
fn parallel_bursts_no_duplicates_no_gaps() {
    let (store, _dir) = create_rocksdb_store();
    let counter = Arc::new(StoredCounter::new(store, "/burst"));
    let num_threads = 8;
    let calls_per_thread = 100;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                let mut seen = Vec::with_capacity(calls_per_thread);
                for _ in 0..calls_per_thread {
                    seen.push(c.next().expect("next should succeed"));
                }
                seen
            })
        })
        .collect();

    let all: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let unique: HashSet<u64> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len(), "Found duplicate values");

    let total = (num_threads * calls_per_thread) as u64;
    assert_eq!(unique, (0..total).collect::<HashSet<_>>());
    assert_eq!(counter.current().unwrap(), Some(total - 1));
}

/// Each thread's own results must be strictly increasing.
#[test]
fn per_thread_values_are_increasing() {
    let counter = Arc::new(StoredCounter::new(Arc::new(MemoryStore::new()), "/order"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                let seen: Vec<u64> = (0..200).map(|_| c.next().unwrap()).collect();
                for window in seen.windows(2) {
                    assert!(
                        window[0] < window[1],
                        "Values out of order: {} >= {}",
                        window[0],
                        window[1]
                    );
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

// =============================================================================
// Mixed operation tests
// =============================================================================

/// Forced advances racing with next() never move the counter backward.
#[test]
fn set_if_greater_racing_next_never_decreases() {
    let counter = Arc::new(StoredCounter::new(Arc::new(MemoryStore::new()), "/mixed"));
    counter.next().unwrap();

    let advancers: Vec<_> = (0..4)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..200 {
                    let v = c.next().unwrap();
                    assert!(v > last || last == 0);
                    last = v;
                }
            })
        })
        .collect();

    let forcers: Vec<_> = (0..2)
        .map(|i| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                for step in 1..=50u64 {
                    match c.set_if_greater(step * 20 + i) {
                        Ok(()) | Err(CounterError::NonIncreasing { .. }) => {}
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let c = Arc::clone(&counter);
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..200 {
                    let v = c.current().unwrap().unwrap();
                    assert!(v >= last, "Counter moved backward: {} < {}", v, last);
                    last = v;
                }
            })
        })
        .collect();

    for h in advancers.into_iter().chain(forcers).chain(readers) {
        h.join().unwrap();
    }
}

/// Counters on different keys of one store progress independently.
#[test]
fn parallel_counters_on_different_keys() {
    let (store, _dir) = create_rocksdb_store();
    let num_keys = 4;
    let calls_per_key = 50;

    let handles: Vec<_> = (0..num_keys)
        .map(|i| {
            let s = Arc::clone(&store);
            thread::spawn(move || {
                let counter = StoredCounter::new(s, format!("/counters/{}", i));
                (0..calls_per_key)
                    .map(|_| counter.next().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for h in handles {
        let values = h.join().unwrap();
        assert_eq!(values, (0..calls_per_key as u64).collect::<Vec<_>>());
    }
}
