//! `udata` — the external user/group directory (spec §6).
//!
//! The store never looks up users or groups itself; it calls this trait so
//! the embedding service can plug in its real identity source (LDAP, a
//! passwd file, whatever).

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A resolved identity, as `udata::lookup_user` would return it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: u32,
    pub gid: u32,
    pub groups: Vec<u32>,
}

/// External user/group directory (spec §6's `udata`).
pub trait UserDirectory: Sync + Send {
    /// Resolves a user name to its identity. Returns
    /// [`Error::UnknownUser`] if the name is not recognized.
    fn lookup_user(&self, name: &str) -> Result<User>;

    /// Resolves a group name to a gid. Returns [`Error::UnknownUser`] if the
    /// name is not recognized.
    fn lookup_group(&self, name: &str) -> Result<u32>;

    /// Tests whether `user` belongs to `gid`, either as primary or
    /// supplementary group.
    fn user_in_gid(&self, user: &User, gid: u32) -> bool {
        user.gid == gid || user.groups.contains(&gid)
    }
}

/// A deterministic, in-memory [`UserDirectory`] suitable for tests and as a
/// starting point for an embedding binary. Not a production identity source.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, User>,
    groups: HashMap<String, u32>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, name: impl Into<String>, user: User) -> Self {
        self.users.insert(name.into(), user);
        self
    }

    pub fn with_group(mut self, name: impl Into<String>, gid: u32) -> Self {
        self.groups.insert(name.into(), gid);
        self
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn lookup_user(&self, name: &str) -> Result<User> {
        self.users.get(name).cloned().ok_or(Error::UnknownUser)
    }

    fn lookup_group(&self, name: &str) -> Result<u32> {
        self.groups.get(name).copied().ok_or(Error::UnknownUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_user_and_rejects_unknown() {
        let dir = InMemoryUserDirectory::new()
            .with_user("u1", User { uid: 1000, gid: 100, groups: vec![100, 200] });
        assert_eq!(dir.lookup_user("u1").unwrap().uid, 1000);
        assert_eq!(dir.lookup_user("nobody"), Err(Error::UnknownUser));
    }

    #[test]
    fn membership_checks_primary_and_supplementary_groups() {
        let dir = InMemoryUserDirectory::new();
        let user = User { uid: 1000, gid: 100, groups: vec![200] };
        assert!(dir.user_in_gid(&user, 100));
        assert!(dir.user_in_gid(&user, 200));
        assert!(!dir.user_in_gid(&user, 300));
    }
}
