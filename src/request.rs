//! The tagged request shape described in spec §6: `{op, user_name,
//! full_path, flags, op-specific fields}`. [`Mstor`](crate::Mstor) exposes a
//! typed method per operation; [`Mstor::do_operation`](crate::Mstor::do_operation)
//! is the single entry point a wire-protocol layer would actually call,
//! matching the data flow described in spec §2.

use crate::dump::StatRecord;
use crate::replicas::Oid;

/// One metadata operation and its op-specific fields.
#[derive(Debug, Clone)]
pub enum Op {
    Creat { path: String, mode: u32 },
    Open { path: String },
    Mkdirs { path: String, mode: u32 },
    Listdir { path: String, max_len: usize },
    Stat { path: String },
    Chmod { path: String, mode: u32 },
    Chown { path: String, new_user: Option<String>, new_group: Option<String> },
    Utimes { path: String, atime: Option<u64>, mtime: Option<u64> },
    Rmdir { path: String, recursive: bool },
    ChunkFind { nid: u64, start: u64, end: u64, max_cinfos: usize },
    ChunkAlloc { nid: u64, offset: u64 },
    /// Reserved; always answered with [`crate::Error::NotSupported`].
    Rename { from_path: String, to_path: String },
    /// Reserved; always answered with [`crate::Error::NotSupported`].
    SequesterTree { path: String },
    /// Reserved; always answered with [`crate::Error::NotSupported`].
    FindSequestered,
    /// Reserved; always answered with [`crate::Error::NotSupported`].
    DestroySequestered { cid: u64 },
}

/// A full request: the user on whose behalf the operation runs, plus the
/// operation itself.
#[derive(Debug, Clone)]
pub struct Request {
    pub user_name: String,
    pub op: Op,
}

/// Result payloads for [`Op`] variants that don't already have a natural
/// typed return (most do; this only covers the handful that return more
/// than one value).
#[derive(Debug, Clone)]
pub enum Reply {
    Nid(u64),
    Listing(Vec<u8>),
    Stat(StatRecord),
    Unit,
    Chunks(Vec<(u64, u64)>),
    Allocated { cid: u64, oids: Vec<Oid> },
}
