#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use stored_counter::contracts::SequenceCounter;
use stored_counter::storage::{varint, MemoryStore, StoredCounter};

fuzz_target!(|data: &[u8]| {
    // Seed the counter's key with arbitrary bytes, as a torn write might leave
    let store = Arc::new(MemoryStore::new());
    store.raw_put("/fuzz", data.to_vec());
    let counter = StoredCounter::new(Arc::clone(&store), "/fuzz");

    match varint::decode_u64_exact(data) {
        Ok(current) if current < u64::MAX => {
            assert_eq!(counter.next().ok(), Some(current + 1));
        }
        _ => {
            // Corrupt or saturated values are rejected and left in place
            assert!(counter.next().is_err());
            assert_eq!(store.raw_get("/fuzz"), Some(data.to_vec()));
        }
    }
});
