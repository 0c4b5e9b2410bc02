//! Lazily built supply.

use std::fmt;
use std::sync::OnceLock;

use super::Supply;

/// A supply whose value is built on the first [`read`](Self::read).
///
/// Acquiring the supply only registers the demand; the expensive build runs
/// when a consumer first reads it, typically pinned to phase start.
pub struct MemoizingSupply<T> {
    builder: Box<dyn Fn() -> T + Send + Sync>,
    memoized: OnceLock<T>,
}

impl<T: Send + Sync + 'static> MemoizingSupply<T> {
    /// Creates a supply that runs `builder` at most once.
    pub fn new(builder: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            builder: Box::new(builder),
            memoized: OnceLock::new(),
        }
    }

    /// Returns the memoized value, building it if needed.
    pub fn read(&self) -> &T {
        self.memoized.get_or_init(|| (self.builder)())
    }

    /// Returns true once the value has been built.
    pub fn is_initialized(&self) -> bool {
        self.memoized.get().is_some()
    }
}

impl<T: Send + Sync + 'static> Supply for MemoizingSupply<T> {}

impl<T> fmt::Debug for MemoizingSupply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizingSupply")
            .field("initialized", &self.memoized.get().is_some())
            .finish()
    }
}
