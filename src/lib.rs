//! mstor - the metadata store core of a distributed filesystem: hierarchical
//! namespace, POSIX-style permissions, and file-to-chunk-to-replica mapping
//! over an embedded ordered key/value store.
//!
//! Wire protocol/RPC framing, OSD placement policy internals, heartbeats and
//! leases, user/group lookup internals, CLI, and config file parsing are all
//! out of scope: this crate exposes [`Mstor`] and the [`UserDirectory`] /
//! [`ReplicaPlacement`] traits an embedding service plugs its own
//! implementations of those concerns into.

mod codec;
mod config;
mod dump;
mod error;
mod ids;
mod locks;
mod node;
mod path;
mod perm;
mod replicas;
mod request;
mod stat_wire;
mod store;
mod udata;

pub use config::StoreConfig;
pub use dump::StatRecord;
pub use error::{Error, Result};
pub use node::NodePayload;
pub use replicas::{Oid, ReplicaPlacement, RoundRobinPlacement};
pub use request::{Op, Reply, Request};
pub use store::Mstor;
pub use udata::{InMemoryUserDirectory, User, UserDirectory};
