mod memory;
mod rocksdb;
mod sequence;
pub mod varint;

pub use memory::MemoryStore;
#[cfg(any(test, feature = "testing"))]
pub use memory::{FailPoint, StoreOp};
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};
pub use sequence::StoredCounter;
