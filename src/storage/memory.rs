#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

use dashmap::DashMap;

use crate::contracts::{Key, KeyValueStore, StoreError};

/// Store operation that a [`FailPoint`] can target.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Has,
    Get,
    Put,
}

/// Injected failure: the next `remaining` calls of `op` fail with `StoreError::Io`.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy)]
pub struct FailPoint {
    pub op: StoreOp,
    pub remaining: usize,
}

#[cfg(any(test, feature = "testing"))]
impl FailPoint {
    /// Fails the next single call of `op`.
    pub fn once(op: StoreOp) -> Self {
        Self { op, remaining: 1 }
    }
}

/// In-memory key-value store.
///
/// Backed by a concurrent map, so unrelated keys never contend. Useful as a
/// test double and for counters that do not need to outlive the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<Key, Vec<u8>>,
    #[cfg(any(test, feature = "testing"))]
    fail_point: Mutex<Option<FailPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Test support: fault injection and raw access that bypasses the store contract.
/// Only compiled with the `testing` feature.
#[cfg(any(test, feature = "testing"))]
impl MemoryStore {
    /// Creates a store that fails according to `fail_point`.
    pub fn with_failures(fail_point: FailPoint) -> Self {
        Self {
            entries: DashMap::new(),
            fail_point: Mutex::new(Some(fail_point)),
        }
    }

    /// Arms (or replaces) the fail point.
    pub fn fail_next(&self, fail_point: FailPoint) -> Result<(), StoreError> {
        let mut slot = self
            .fail_point
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        *slot = Some(fail_point);
        Ok(())
    }

    /// Stores raw bytes, bypassing any fail point.
    pub fn raw_put(&self, key: impl Into<Key>, value: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the raw bytes under `key`, bypassing any fail point.
    pub fn raw_get(&self, key: impl Into<Key>) -> Option<Vec<u8>> {
        self.entries.get(&key.into()).map(|v| v.value().clone())
    }

    fn check_fail_point(&self, op: StoreOp, key: &Key) -> Result<(), StoreError> {
        let mut slot = self
            .fail_point
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let Some(fp) = slot.as_mut() else {
            return Ok(());
        };
        if fp.remaining == 0 {
            *slot = None;
            return Ok(());
        }
        if fp.op != op {
            return Ok(());
        }
        fp.remaining -= 1;
        if fp.remaining == 0 {
            *slot = None;
        }
        Err(StoreError::Io(format!("injected {:?} failure for {}", op, key)))
    }
}

impl KeyValueStore for MemoryStore {
    fn has(&self, key: &Key) -> Result<bool, StoreError> {
        #[cfg(any(test, feature = "testing"))]
        self.check_fail_point(StoreOp::Has, key)?;
        Ok(self.entries.contains_key(key))
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>, StoreError> {
        #[cfg(any(test, feature = "testing"))]
        self.check_fail_point(StoreOp::Get, key)?;
        self.entries
            .get(key)
            .map(|v| v.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<(), StoreError> {
        #[cfg(any(test, feature = "testing"))]
        self.check_fail_point(StoreOp::Put, key)?;
        self.entries.insert(key.clone(), value.to_vec());
        Ok(())
    }
}
