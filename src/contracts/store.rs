use std::fmt;
use std::sync::Arc;

use crate::contracts::error::StoreError;

/// Hierarchical, path-like key into a [`KeyValueStore`].
///
/// Keys are normalized on construction: a leading `/`, no empty segments
/// and no trailing `/`. An empty path becomes `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Creates a key from a raw path, normalizing it.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut path = String::with_capacity(raw.as_ref().len() + 1);
        for segment in raw.as_ref().split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push('/');
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Key {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Minimal key-value capability set a persisted counter depends on.
///
/// # Invariants
/// - A `put` that returned `Ok` is visible to every later `has`/`get`
/// - Concurrent access to different keys must not corrupt either key
/// - `get` on a missing key returns [`StoreError::NotFound`]
pub trait KeyValueStore: Send + Sync {
    /// Returns true if a value is stored under `key`.
    fn has(&self, key: &Key) -> Result<bool, StoreError>;

    /// Returns the bytes stored under `key`.
    fn get(&self, key: &Key) -> Result<Vec<u8>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &Key, value: &[u8]) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn has(&self, key: &Key) -> Result<bool, StoreError> {
        (**self).has(key)
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, value)
    }
}
