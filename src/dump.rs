//! Offline inspection: a forward scan over every key, dispatched on the
//! discriminator byte, rendering one human-readable line per record (spec
//! §4.8). Also defines [`StatRecord`], the in-memory shape `stat`/`listdir`
//! hand back before wire encoding (spec §6).

use std::io::Write;

use crate::codec::{self, *};
use crate::error::{Error, Result};
use crate::node::NodePayload;

/// The decoded attributes of one node, as returned by `stat`/`listdir`
/// before wire encoding.
#[derive(Debug, Clone)]
pub struct StatRecord {
    pub nid: u64,
    pub name: String,
    pub payload: NodePayload,
}

/// Forward-scans the whole store and writes one line per record to `out`.
/// Returns [`Error::InvalidArgument`] on an unknown discriminator byte; the
/// store itself is never modified or corrupted by a dump.
pub fn dump(db: &sled::Db, out: &mut dyn Write) -> Result<()> {
    for entry in db.iter() {
        let (key, value) = entry.map_err(Error::from)?;
        render_record(&key, &value, out)?;
    }
    Ok(())
}

fn render_record(key: &[u8], value: &[u8], out: &mut dyn Write) -> Result<()> {
    let line = match key.first().copied() {
        Some(codec::PREFIX_VERSION) => {
            let version = decode_version(value)?;
            format!("v: schema_version={version}\n")
        }
        Some(codec::PREFIX_NODE) => {
            let nid = decode_node_key(key)?;
            let payload = NodePayload::decode(value)?;
            format!(
                "n: nid={nid} dir={} mode={:o} uid={} gid={} mtime={} atime={} length={}\n",
                payload.is_dir(),
                payload.mode(),
                payload.uid,
                payload.gid,
                payload.mtime,
                payload.atime,
                payload.length,
            )
        }
        Some(codec::PREFIX_CHILD) => {
            let name = decode_child_name(key)?;
            let child_nid = decode_child_value(value)?;
            let parent_nid = read_parent_nid(key)?;
            format!("c: parent={parent_nid} name={name:?} child={child_nid}\n")
        }
        Some(codec::PREFIX_FILE_CHUNK) => {
            let (nid, offset) = decode_file_chunk_key(key)?;
            let cid = decode_cid(value)?;
            format!("f: nid={nid} offset={offset} cid={cid}\n")
        }
        Some(codec::PREFIX_CHUNK_REPLICAS) => {
            let cid = {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&key[1..]);
                u64::from_be_bytes(buf)
            };
            let oids = decode_oids(value)?;
            format!("h: cid={cid} oids={oids:?}\n")
        }
        Some(codec::PREFIX_SEQUESTER) => "u: <reserved>\n".to_owned(),
        _ => return Err(Error::InvalidArgument),
    };
    out.write_all(line.as_bytes()).map_err(|_| Error::Io)
}

fn read_parent_nid(key: &[u8]) -> Result<u64> {
    if key.len() < 9 {
        return Err(Error::InvalidArgument);
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&key[1..9]);
    Ok(u64::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_version_and_root_node_of_a_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::StoreConfig::new(dir.path().to_str().unwrap());
        let store = crate::Mstor::open(
            &config,
            std::sync::Arc::new(crate::udata::InMemoryUserDirectory::new()),
            std::sync::Arc::new(crate::replicas::RoundRobinPlacement::new(vec![1, 2, 3])),
        )
        .unwrap();
        drop(store);

        let db = sled::Config::new().path(dir.path()).open().unwrap();
        let mut out = Vec::new();
        dump(&db, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("v: schema_version=1"));
        assert!(text.contains("nid=0"));
    }
}
