use crate::contracts::error::CounterError;

/// Hands out monotonically increasing sequence numbers backed by durable storage.
///
/// # Invariants
/// - The first `next()` on an absent counter returns 0, each later call returns
///   the previous value plus one
/// - A value returned by `next()` is persisted before it is returned
/// - `set_if_greater` never moves the persisted value backward
pub trait SequenceCounter: Send + Sync {
    /// Returns the next sequence number and persists it.
    fn next(&self) -> Result<u64, CounterError>;

    /// Forces the persisted value up to `count`.
    /// Fails if the counter was never started or `count` is not strictly greater.
    /// `count == 0` is always a no-op.
    fn set_if_greater(&self, count: u64) -> Result<(), CounterError>;

    /// Returns the persisted value without advancing, or None if never started.
    fn current(&self) -> Result<Option<u64>, CounterError>;
}
