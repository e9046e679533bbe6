//! Monotonic node-id / chunk-id allocators (spec §4.3, §9).
//!
//! Counters are process-local: they are recovered by scanning the tail of
//! their key ranges at load time rather than persisted on every allocation.
//! This is safe because keys are written synchronously before an id is
//! handed out, so max-on-disk never exceeds max-ever-allocated.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::codec::{CID_MAX, NID_MAX};
use crate::error::{Error, Result};

/// A monotonic counter with a ceiling; exceeding the ceiling is fatal (§3).
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
    ceiling: u64,
}

impl IdAllocator {
    fn new(next: u64, ceiling: u64) -> Self {
        IdAllocator { next: AtomicU64::new(next), ceiling }
    }

    pub fn node(next: u64) -> Self {
        Self::new(next, NID_MAX)
    }

    pub fn chunk(next: u64) -> Self {
        Self::new(next, CID_MAX)
    }

    /// Allocates the next id. Reaching the ceiling is a fatal condition for
    /// the store (§3); callers surface it as [`Error::IdSpaceExhausted`]
    /// rather than aborting the process, since that decision belongs to the
    /// embedding service.
    pub fn alloc(&self) -> Result<u64> {
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        if id >= self.ceiling {
            return Err(Error::IdSpaceExhausted);
        }
        Ok(id)
    }

    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}
