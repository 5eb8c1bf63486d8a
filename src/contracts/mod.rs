pub mod error;
pub mod sequence;
pub mod store;

pub use error::{CounterError, LockResultExt, StoreError, VarintError};
pub use sequence::SequenceCounter;
pub use store::{Key, KeyValueStore};
