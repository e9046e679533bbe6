//! The resolved configuration record [`Mstor::open`](crate::Mstor::open)
//! accepts. The crate does not parse CLI flags or TOML itself (that is the
//! embedding binary's job, out of scope per spec §1) but the record is a
//! plain `serde`-deserializable struct so a caller can load one from TOML
//! the way the rest of this corpus does.

use serde::{Deserialize, Serialize};

/// Default LRU block cache capacity, in bytes, when a config omits it.
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024 * 1024;

/// Default on-disk block size reported in stat records.
pub const DEFAULT_BLOCK_SIZE: u32 = 4096;

/// Default replication factor used when allocating a chunk's replica set.
pub const DEFAULT_REPLICATION: u32 = 3;

/// Maximum number of OSD ids a replica set may carry.
pub const RF_MAX_REPLICAS: u32 = 16;

/// Configuration resolved by the caller and handed to the store at open time
/// (the Rust equivalent of the spec's `mdsc`/`osdc` static configuration
/// records).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory the embedded KV engine persists its files under.
    pub data_dir: String,
    /// LRU block cache capacity, in bytes.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Whether writes fsync before returning (spec: "sync writes on").
    #[serde(default = "default_true")]
    pub sync_writes: bool,
    /// Minimum number of replicas a chunk must have.
    #[serde(default = "default_min_repl")]
    pub min_repl: u32,
    /// Requested ("man"datory) number of replicas for a new chunk.
    #[serde(default = "default_man_repl")]
    pub man_repl: u32,
    /// Block size reported in stat records.
    #[serde(default = "default_block_size")]
    pub block_size: u32,
}

fn default_cache_capacity() -> u64 {
    DEFAULT_CACHE_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_min_repl() -> u32 {
    1
}

fn default_man_repl() -> u32 {
    DEFAULT_REPLICATION
}

fn default_block_size() -> u32 {
    DEFAULT_BLOCK_SIZE
}

impl StoreConfig {
    /// A config pointed at `data_dir` with every other field defaulted;
    /// convenient for tests and small embeddings.
    pub fn new(data_dir: impl Into<String>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            cache_capacity: default_cache_capacity(),
            sync_writes: default_true(),
            min_repl: default_min_repl(),
            man_repl: default_man_repl(),
            block_size: default_block_size(),
        }
    }
}
