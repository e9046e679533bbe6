//! The external OSD placement policy (spec §6's `assign_replicas`).
//!
//! The store never chooses which object-storage daemons hold a chunk's
//! replicas; it calls this trait so the embedding service can plug in its
//! real placement policy (rack-awareness, capacity balancing, …).

use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::RF_MAX_REPLICAS;
use crate::error::{Error, Result};

/// A 32-bit OSD identifier (spec glossary: `oid`).
pub type Oid = u32;

/// External OSD placement policy (spec §6's `assign_replicas`).
pub trait ReplicaPlacement: Sync + Send {
    /// Returns between 1 and [`RF_MAX_REPLICAS`] OSD ids for a new chunk.
    fn assign_replicas(&self, n: u32) -> Result<Vec<Oid>>;
}

/// A deterministic round-robin [`ReplicaPlacement`] over a fixed OSD pool.
/// Suitable for tests and as a starting point for an embedding binary; not a
/// production placement policy (no capacity or rack awareness).
pub struct RoundRobinPlacement {
    pool: Vec<Oid>,
    cursor: AtomicU32,
}

impl RoundRobinPlacement {
    pub fn new(pool: Vec<Oid>) -> Self {
        RoundRobinPlacement { pool, cursor: AtomicU32::new(0) }
    }
}

impl ReplicaPlacement for RoundRobinPlacement {
    fn assign_replicas(&self, n: u32) -> Result<Vec<Oid>> {
        if n == 0 || n > RF_MAX_REPLICAS || (n as usize) > self.pool.len() {
            return Err(Error::InvalidArgument);
        }
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) as usize % self.pool.len();
        let mut out = Vec::with_capacity(n as usize);
        for i in 0..n as usize {
            out.push(self.pool[(start + i) % self.pool.len()]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_requested_count_from_pool() {
        let placement = RoundRobinPlacement::new(vec![1, 2, 3, 4]);
        let replicas = placement.assign_replicas(3).unwrap();
        assert_eq!(replicas.len(), 3);
    }

    #[test]
    fn rejects_more_replicas_than_the_pool_can_supply() {
        let placement = RoundRobinPlacement::new(vec![1, 2]);
        assert_eq!(placement.assign_replicas(3), Err(Error::InvalidArgument));
    }
}
