//! The metadata node payload (spec §3): a file or directory's fixed-width
//! on-disk record.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// High bit of `mode_and_type` marks a directory.
const IS_DIR_BIT: u16 = 1 << 15;
/// Low 9 bits of `mode_and_type` are the POSIX rwx triplet for owner/group/other.
const MODE_MASK: u16 = 0o777;

pub const RF_SUPERUSER_UID: u32 = 0;

/// Owner/group/other permission bits, read out of `mode_and_type`.
pub mod perm_bits {
    pub const READ: u32 = 0o4;
    pub const WRITE: u32 = 0o2;
    pub const EXEC: u32 = 0o1;
}

const PAYLOAD_LEN: usize = 8 + 8 + 8 + 4 + 4 + 2;

/// A file or directory's node record, fixed-width and packed (spec §3).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodePayload {
    pub mtime: u64,
    pub atime: u64,
    /// Directories always carry `length = 0` (deliberate, currently unused).
    pub length: u64,
    pub uid: u32,
    pub gid: u32,
    mode_and_type: u16,
}

impl NodePayload {
    pub fn new(is_dir: bool, mode: u32, uid: u32, gid: u32, now: u64) -> Self {
        let mut mode_and_type = (mode as u16) & MODE_MASK;
        if is_dir {
            mode_and_type |= IS_DIR_BIT;
        }
        NodePayload { mtime: now, atime: now, length: 0, uid, gid, mode_and_type }
    }

    pub fn is_dir(&self) -> bool {
        self.mode_and_type & IS_DIR_BIT != 0
    }

    pub fn mode(&self) -> u32 {
        (self.mode_and_type & MODE_MASK) as u32
    }

    /// Full `mode_and_type` field, as persisted and as emitted in stat records.
    pub fn mode_and_type(&self) -> u16 {
        self.mode_and_type
    }

    /// Overwrites the mode bits, preserving the IS_DIR flag (chmod can never
    /// flip a node between file and directory).
    pub fn set_mode(&mut self, mode: u32) {
        let is_dir = self.mode_and_type & IS_DIR_BIT;
        self.mode_and_type = is_dir | ((mode as u16) & MODE_MASK);
    }

    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut buf = [0u8; PAYLOAD_LEN];
        BigEndian::write_u64(&mut buf[0..8], self.mtime);
        BigEndian::write_u64(&mut buf[8..16], self.atime);
        BigEndian::write_u64(&mut buf[16..24], self.length);
        BigEndian::write_u32(&mut buf[24..28], self.uid);
        BigEndian::write_u32(&mut buf[28..32], self.gid);
        BigEndian::write_u16(&mut buf[32..34], self.mode_and_type);
        buf
    }

    pub fn decode(value: &[u8]) -> Result<Self> {
        if value.len() != PAYLOAD_LEN {
            return Err(Error::Io);
        }
        Ok(NodePayload {
            mtime: BigEndian::read_u64(&value[0..8]),
            atime: BigEndian::read_u64(&value[8..16]),
            length: BigEndian::read_u64(&value[16..24]),
            uid: BigEndian::read_u32(&value[24..28]),
            gid: BigEndian::read_u32(&value[28..32]),
            mode_and_type: BigEndian::read_u16(&value[32..34]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let payload = NodePayload::new(true, 0o755, 42, 100, 1_700_000_000);
        let decoded = NodePayload::decode(&payload.encode()).unwrap();
        assert_eq!(payload, decoded);
        assert!(decoded.is_dir());
        assert_eq!(decoded.mode(), 0o755);
    }

    #[test]
    fn set_mode_preserves_dir_flag() {
        let mut payload = NodePayload::new(true, 0o755, 0, 0, 0);
        payload.set_mode(0o700);
        assert!(payload.is_dir());
        assert_eq!(payload.mode(), 0o700);
    }

    #[test]
    fn rejects_malformed_payload_length() {
        assert_eq!(NodePayload::decode(&[0u8; 10]), Err(Error::Io));
    }
}
