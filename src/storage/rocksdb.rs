use std::path::{Path, PathBuf};

use rocksdb::{BlockBasedOptions, Cache, Options, WriteOptions, DB};

use crate::contracts::{Key, KeyValueStore, StoreError};

/// Tuning for [`RocksDbStore`].
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// fsync the WAL on every put, so an acknowledged value survives an OS crash.
    pub sync_writes: bool,
    /// Block cache size in bytes.
    pub block_cache_bytes: usize,
    /// Create the database if the directory is empty.
    pub create_if_missing: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            sync_writes: true,
            block_cache_bytes: 8 * 1024 * 1024, // 8MB, counters are tiny
            create_if_missing: true,
        }
    }
}

/// RocksDB-backed key-value store.
pub struct RocksDbStore {
    db: DB,
    path: PathBuf,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Opens or creates a store at the given path with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    /// Opens or creates a store at the given path with explicit settings.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RocksDbConfig,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(config.create_if_missing);

        // Values are a few bytes each, compression buys nothing
        opts.set_compression_type(rocksdb::DBCompressionType::None);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&Cache::new_lru_cache(config.block_cache_bytes));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, path).map_err(|e| StoreError::RocksDb(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            sync_writes = config.sync_writes,
            block_cache_bytes = config.block_cache_bytes,
            "Opened RocksDB store"
        );

        Ok(Self {
            db,
            path: path.to_path_buf(),
            config,
        })
    }

    /// Returns the directory this store was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the settings this store was opened with.
    pub fn config(&self) -> &RocksDbConfig {
        &self.config
    }

    /// Flushes memtables to SST files.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush().map_err(|e| StoreError::RocksDb(e.to_string()))
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

impl KeyValueStore for RocksDbStore {
    fn has(&self, key: &Key) -> Result<bool, StoreError> {
        self.db
            .get_pinned(key.as_bytes())
            .map(|v| v.is_some())
            .map_err(|e| StoreError::RocksDb(e.to_string()))
    }

    fn get(&self, key: &Key) -> Result<Vec<u8>, StoreError> {
        match self.db.get(key.as_bytes()) {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::RocksDb(e.to_string())),
        }
    }

    fn put(&self, key: &Key, value: &[u8]) -> Result<(), StoreError> {
        self.db
            .put_opt(key.as_bytes(), value, &self.write_options())
            .map_err(|e| StoreError::RocksDb(e.to_string()))
    }
}
