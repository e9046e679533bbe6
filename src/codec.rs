//! Key and payload encoding for the four on-disk key families (spec §3, §4.1).
//!
//! All integers are big-endian so that lexicographic key order matches
//! numeric order; the iterator-driven lookups (child listing, chunk range
//! scans, counter recovery) depend on that.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Maximum length, in bytes, of a single path component.
pub const PCOMP_MAX: usize = 255;

/// Maximum length, in bytes, of a full path.
pub const PATH_MAX: usize = 4096;

pub const PREFIX_VERSION: u8 = b'v';
pub const PREFIX_NODE: u8 = b'n';
pub const PREFIX_CHILD: u8 = b'c';
pub const PREFIX_FILE_CHUNK: u8 = b'f';
pub const PREFIX_CHUNK_REPLICAS: u8 = b'h';
pub const PREFIX_SEQUESTER: u8 = b'u';

/// Current on-disk schema version. Unknown versions are refused, not migrated.
pub const SCHEMA_VERSION: u32 = 1;

const MAGIC: &[u8; 4] = b"Fish";

/// Node ids and chunk ids share this ceiling (§3); the upper byte is reserved.
pub const NID_MAX: u64 = 0xffff_ffff_ffff_0000;
pub const CID_MAX: u64 = 0xffff_ffff_ffff_0000;

/// `v` — the single schema version record.
pub fn version_key() -> [u8; 1] {
    [PREFIX_VERSION]
}

pub fn encode_version(version: u32) -> [u8; 8] {
    let mut buf = [0u8; 8];
    buf[..4].copy_from_slice(MAGIC);
    BigEndian::write_u32(&mut buf[4..], version);
    buf
}

pub fn decode_version(value: &[u8]) -> Result<u32> {
    if value.len() != 8 || &value[..4] != MAGIC {
        return Err(Error::InvalidArgument);
    }
    Ok(BigEndian::read_u32(&value[4..]))
}

/// `n` + nid(8) — a metadata node.
pub fn node_key(nid: u64) -> [u8; 9] {
    let mut buf = [0u8; 9];
    buf[0] = PREFIX_NODE;
    BigEndian::write_u64(&mut buf[1..], nid);
    buf
}

pub fn decode_node_key(key: &[u8]) -> Result<u64> {
    if key.len() != 9 || key[0] != PREFIX_NODE {
        return Err(Error::InvalidArgument);
    }
    Ok(BigEndian::read_u64(&key[1..]))
}

/// `c` + parent-nid(8) + name — a directory entry.
pub fn child_key(parent: u64, name: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1 + 8 + name.len());
    buf.push(PREFIX_CHILD);
    buf.extend_from_slice(&parent.to_be_bytes());
    buf.extend_from_slice(name.as_bytes());
    buf
}

/// The shared `c || parent-nid` head; a seek-to-this + forward-scan-while-prefix
/// enumerates every child of `parent`.
pub fn child_prefix(parent: u64) -> [u8; 9] {
    let mut buf = [0u8; 9];
    buf[0] = PREFIX_CHILD;
    BigEndian::write_u64(&mut buf[1..], parent);
    buf
}

pub fn decode_child_name(key: &[u8]) -> Result<&str> {
    if key.len() <= 9 || key[0] != PREFIX_CHILD {
        return Err(Error::InvalidArgument);
    }
    std::str::from_utf8(&key[9..]).map_err(|_| Error::InvalidArgument)
}

pub fn encode_child_value(child_nid: u64) -> [u8; 8] {
    child_nid.to_be_bytes()
}

pub fn decode_child_value(value: &[u8]) -> Result<u64> {
    if value.len() != 8 {
        return Err(Error::InvalidArgument);
    }
    Ok(BigEndian::read_u64(value))
}

/// `f` + nid(8) + offset(8) — the chunk of a file that starts at `offset`.
pub fn file_chunk_key(nid: u64, offset: u64) -> [u8; 17] {
    let mut buf = [0u8; 17];
    buf[0] = PREFIX_FILE_CHUNK;
    BigEndian::write_u64(&mut buf[1..9], nid);
    BigEndian::write_u64(&mut buf[9..], offset);
    buf
}

/// The shared `f || nid` head for range scans over one file's chunks.
pub fn file_chunk_prefix(nid: u64) -> [u8; 9] {
    let mut buf = [0u8; 9];
    buf[0] = PREFIX_FILE_CHUNK;
    BigEndian::write_u64(&mut buf[1..], nid);
    buf
}

pub fn decode_file_chunk_key(key: &[u8]) -> Result<(u64, u64)> {
    if key.len() != 17 || key[0] != PREFIX_FILE_CHUNK {
        return Err(Error::InvalidArgument);
    }
    Ok((BigEndian::read_u64(&key[1..9]), BigEndian::read_u64(&key[9..])))
}

pub fn encode_cid(cid: u64) -> [u8; 8] {
    cid.to_be_bytes()
}

pub fn decode_cid(value: &[u8]) -> Result<u64> {
    if value.len() != 8 {
        return Err(Error::InvalidArgument);
    }
    Ok(BigEndian::read_u64(value))
}

/// `h` + cid(8) — the replica set (OSD ids) for one chunk.
pub fn chunk_replicas_key(cid: u64) -> [u8; 9] {
    let mut buf = [0u8; 9];
    buf[0] = PREFIX_CHUNK_REPLICAS;
    BigEndian::write_u64(&mut buf[1..], cid);
    buf
}

/// The synthetic upper bound `h || CID_MAX`; seeking here and stepping back
/// one recovers the highest allocated chunk id at load time.
pub fn chunk_replicas_upper_bound() -> [u8; 9] {
    chunk_replicas_key(CID_MAX)
}

/// The synthetic upper bound `n || NID_MAX`, used the same way for node ids.
pub fn node_upper_bound() -> [u8; 9] {
    node_key(NID_MAX)
}

pub fn encode_oids(oids: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(oids.len() * 4);
    for oid in oids {
        buf.extend_from_slice(&oid.to_be_bytes());
    }
    buf
}

pub fn decode_oids(value: &[u8]) -> Result<Vec<u32>> {
    if value.len() % 4 != 0 {
        return Err(Error::Io);
    }
    Ok(value.chunks_exact(4).map(BigEndian::read_u32).collect())
}

/// Validates a single path component per invariant 7: non-empty, no `/`,
/// shorter than [`PCOMP_MAX`].
pub fn validate_component(name: &str) -> Result<()> {
    if name.is_empty() || name.len() >= PCOMP_MAX || name.contains('/') {
        return Err(Error::NameTooLong);
    }
    Ok(())
}
