use std::sync::{MutexGuard, PoisonError};

use thiserror::Error;

/// Extension trait for converting lock errors to crate errors.
pub trait LockResultExt<T> {
    /// Converts a lock error to a CounterError.
    fn map_lock_err(self) -> Result<T, CounterError>;
}

impl<'a, T> LockResultExt<MutexGuard<'a, T>>
    for Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>
{
    #[inline]
    fn map_lock_err(self) -> Result<MutexGuard<'a, T>, CounterError> {
        self.map_err(|e| CounterError::LockPoisoned(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("RocksDB error: {0}")]
    RocksDb(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Counter not initialized: no value stored at {key}")]
    NotInitialized { key: String },

    #[error("Counter must increase: current value {current}, rejected candidate {candidate}")]
    NonIncreasing { current: u64, candidate: u64 },

    #[error("Corrupt counter value at {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: VarintError,
    },

    #[error("Counter overflow at {key}")]
    Overflow { key: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    #[error("varint truncated")]
    Truncated,

    #[error("varint overflows 64 bits")]
    Overflow,

    #[error("varint followed by trailing bytes: consumed {consumed} of {len}")]
    TrailingBytes { consumed: usize, len: usize },
}
