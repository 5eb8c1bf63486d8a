//! Monotonic `u64` counter persisted to a key-value store.
//!
//! [`storage::StoredCounter`] hands out gap-free sequence numbers that survive
//! restarts. Any [`contracts::KeyValueStore`] can back it; an in-memory store and
//! a RocksDB store are provided.

pub mod contracts;
pub mod storage;

pub use contracts::{CounterError, Key, KeyValueStore, SequenceCounter, StoreError};
pub use storage::{MemoryStore, RocksDbStore, StoredCounter};
