//! Per-nid read-modify-write serialization (spec §4.6, §5, §9).
//!
//! The source the spec distills from left per-nid locking as a TODO for
//! `open`'s atime bump, `chmod`, `chown`, and `utimes`; this is the striped
//! lock that closes that gap so an `open` never loses a concurrent `chmod`
//! on the same node.

use std::sync::{Mutex, MutexGuard};

const STRIPE_COUNT: usize = 64;

/// A fixed bank of mutexes, one of which guards every RMW on a given nid.
/// Two different nids may collide into the same stripe; that only costs
/// spurious serialization, never correctness.
pub struct NodeLocks {
    stripes: Vec<Mutex<()>>,
}

impl NodeLocks {
    pub fn new() -> Self {
        let stripes = (0..STRIPE_COUNT).map(|_| Mutex::new(())).collect();
        NodeLocks { stripes }
    }

    /// Locks the stripe `nid` hashes into. The guard must be held across the
    /// whole get-modify-put sequence for the node.
    pub fn lock(&self, nid: u64) -> MutexGuard<'_, ()> {
        let idx = (nid as usize) % self.stripes.len();
        self.stripes[idx].lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Default for NodeLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_nid_locks_the_same_stripe() {
        let locks = NodeLocks::new();
        let _a = locks.lock(5);
        drop(_a);
        let _b = locks.lock(5 + STRIPE_COUNT as u64);
    }
}
