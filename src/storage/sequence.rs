use std::sync::{Arc, Mutex};

use crate::contracts::{CounterError, Key, KeyValueStore, LockResultExt, SequenceCounter};
use crate::storage::varint;

/// Sequence counter whose value lives in a [`KeyValueStore`].
///
/// Every operation holds one per-instance mutex across the whole
/// has/get/decode/encode/put sequence, so two callers can never observe the
/// same current value. The value is written before the lock is released and
/// before the caller sees it, which makes it durable to the extent the store is.
///
/// Counters on different keys share nothing but the store.
pub struct StoredCounter<S: KeyValueStore> {
    lock: Mutex<()>,
    store: Arc<S>,
    key: Key,
}

impl<S: KeyValueStore> StoredCounter<S> {
    /// Creates a counter over `key` in `store`. Nothing is read or written until first use.
    pub fn new(store: Arc<S>, key: impl Into<Key>) -> Self {
        Self {
            lock: Mutex::new(()),
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Reads the persisted value. Caller must hold the lock.
    fn load(&self) -> Result<Option<u64>, CounterError> {
        if !self.store.has(&self.key)? {
            return Ok(None);
        }
        let bytes = self.store.get(&self.key)?;
        let value = varint::decode_u64_exact(&bytes).map_err(|source| CounterError::Corrupt {
            key: self.key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    /// Writes `value`. Caller must hold the lock.
    fn save(&self, value: u64) -> Result<(), CounterError> {
        let mut buf = [0u8; varint::MAX_VARINT_LEN_U64];
        let len = varint::encode_u64(value, &mut buf);
        self.store.put(&self.key, &buf[..len])?;
        Ok(())
    }
}

impl<S: KeyValueStore> SequenceCounter for StoredCounter<S> {
    fn next(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().map_lock_err()?;

        let next = match self.load()? {
            None => 0,
            Some(current) => current.checked_add(1).ok_or_else(|| CounterError::Overflow {
                key: self.key.to_string(),
            })?,
        };
        self.save(next)?;

        tracing::debug!(key = %self.key, value = next, "Advanced counter");
        Ok(next)
    }

    fn set_if_greater(&self, count: u64) -> Result<(), CounterError> {
        // The implicit start value is already 0
        if count == 0 {
            return Ok(());
        }

        let _guard = self.lock.lock().map_lock_err()?;

        let current = self.load()?.ok_or_else(|| CounterError::NotInitialized {
            key: self.key.to_string(),
        })?;
        if count <= current {
            return Err(CounterError::NonIncreasing {
                current,
                candidate: count,
            });
        }
        self.save(count)?;

        tracing::debug!(key = %self.key, from = current, to = count, "Forced counter forward");
        Ok(())
    }

    fn current(&self) -> Result<Option<u64>, CounterError> {
        let _guard = self.lock.lock().map_lock_err()?;
        self.load()
    }
}
