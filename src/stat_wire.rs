//! The stat wire record (spec §6), emitted by `listdir`/`stat` into a
//! caller-supplied buffer.
//!
//! `stat_len(2, BE) | mode_and_type(2) | block_sz(4) | mtime(8) | atime(8) |
//! length(8) | man_repl(1) | uid(4) | gid(4) | name(len-prefixed string)`.
//! A record is atomic: either fully written or the whole call fails
//! [`Error::NameTooLong`].

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::node::NodePayload;

/// Fixed-width portion of a stat record, excluding the length-prefixed name.
const FIXED_LEN: usize = 2 + 2 + 4 + 8 + 8 + 8 + 1 + 4 + 4;

/// Serializes one stat record for `(nid, name, payload)` into `out`,
/// respecting `block_sz`/`man_repl` from the store's configuration.
///
/// Returns [`Error::NameTooLong`] if the record (including its length
/// prefix) would not fit before `out` reaches `max_len`.
pub fn write_stat_record(
    out: &mut Vec<u8>,
    name: &str,
    payload: &NodePayload,
    block_sz: u32,
    man_repl: u8,
    max_len: usize,
) -> Result<()> {
    let name_bytes = name.as_bytes();
    let record_len = FIXED_LEN + 2 + name_bytes.len();
    if out.len() + record_len > max_len {
        return Err(Error::NameTooLong);
    }
    if record_len > u16::MAX as usize {
        return Err(Error::NameTooLong);
    }

    out.write_u16::<BigEndian>(record_len as u16).expect("vec write cannot fail");
    out.write_u16::<BigEndian>(payload.mode_and_type()).unwrap();
    out.write_u32::<BigEndian>(block_sz).unwrap();
    out.write_u64::<BigEndian>(payload.mtime).unwrap();
    out.write_u64::<BigEndian>(payload.atime).unwrap();
    out.write_u64::<BigEndian>(payload.length).unwrap();
    out.write_u8(man_repl).unwrap();
    out.write_u32::<BigEndian>(payload.uid).unwrap();
    out.write_u32::<BigEndian>(payload.gid).unwrap();
    out.write_u16::<BigEndian>(name_bytes.len() as u16).unwrap();
    out.extend_from_slice(name_bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_one_complete_record() {
        let payload = NodePayload::new(true, 0o755, 0, 0, 42);
        let mut buf = Vec::new();
        write_stat_record(&mut buf, "dir", &payload, 4096, 3, 4096).unwrap();
        assert_eq!(buf.len(), FIXED_LEN + 2 + 3);
    }

    #[test]
    fn refuses_to_overflow_the_output_buffer() {
        let payload = NodePayload::new(false, 0o644, 0, 0, 0);
        let mut buf = Vec::new();
        assert_eq!(write_stat_record(&mut buf, "x", &payload, 4096, 3, 4), Err(Error::NameTooLong));
    }
}
