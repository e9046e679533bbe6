//! Permission check (spec §4.5).

use crate::error::{Error, Result};
use crate::node::{perm_bits, NodePayload, RF_SUPERUSER_UID};
use crate::udata::{User, UserDirectory};

/// What type of node an operation expects to act on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WantType {
    Directory,
    File,
    Either,
}

/// Whether a caller's permission bits matter for this check. The superuser
/// path (`uid == 0`) always clears this (§3 invariant 8).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CheckPerms {
    Enforce,
    Skip,
}

/// Gates on expected type, then tests world → owner → group permission bits
/// in that order (spec §4.5).
pub fn check(
    node: &NodePayload,
    user: &User,
    want_type: WantType,
    want_perm: u32,
    check_perms: CheckPerms,
    dir: &dyn UserDirectory,
) -> Result<()> {
    match want_type {
        WantType::Directory if !node.is_dir() => return Err(Error::NotDir),
        WantType::File if node.is_dir() => return Err(Error::IsDir),
        _ => {}
    }

    if check_perms == CheckPerms::Skip || user.uid == RF_SUPERUSER_UID {
        return Ok(());
    }

    let mode = node.mode();
    let world_ok = (mode & want_perm) == want_perm;
    let owner_ok = user.uid == node.uid && ((mode >> 6) & want_perm) == want_perm;
    let group_ok =
        dir.user_in_gid(user, node.gid) && ((mode >> 3) & want_perm) == want_perm;

    if world_ok || owner_ok || group_ok {
        Ok(())
    } else {
        Err(Error::Permission)
    }
}

pub use perm_bits::{EXEC, READ, WRITE};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::udata::InMemoryUserDirectory;

    fn node(mode: u32, uid: u32, gid: u32) -> NodePayload {
        NodePayload::new(true, mode, uid, gid, 0)
    }

    #[test]
    fn superuser_bypasses_permission_bits() {
        let dir = InMemoryUserDirectory::new();
        let n = node(0o000, 50, 50);
        let root = User { uid: 0, gid: 0, groups: vec![] };
        assert!(check(&n, &root, WantType::Directory, READ, CheckPerms::Enforce, &dir).is_ok());
    }

    #[test]
    fn owner_bits_gate_non_owner() {
        let dir = InMemoryUserDirectory::new();
        let n = node(0o700, 1, 100);
        let other = User { uid: 2, gid: 200, groups: vec![] };
        assert_eq!(
            check(&n, &other, WantType::Directory, READ, CheckPerms::Enforce, &dir),
            Err(Error::Permission)
        );
    }

    #[test]
    fn group_membership_grants_group_bits() {
        let dir = InMemoryUserDirectory::new();
        let n = node(0o070, 1, 100);
        let member = User { uid: 2, gid: 100, groups: vec![] };
        assert!(check(&n, &member, WantType::Directory, READ, CheckPerms::Enforce, &dir).is_ok());
    }

    #[test]
    fn type_mismatch_is_reported_before_permission_bits() {
        let dir = InMemoryUserDirectory::new();
        let n = NodePayload::new(false, 0o777, 0, 0, 0);
        let user = User { uid: 0, gid: 0, groups: vec![] };
        assert_eq!(
            check(&n, &user, WantType::Directory, READ, CheckPerms::Enforce, &dir),
            Err(Error::NotDir)
        );
    }
}
