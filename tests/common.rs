use std::sync::Arc;

use mstor::{InMemoryUserDirectory, Mstor, RoundRobinPlacement, StoreConfig, User};
use tempfile::TempDir;

pub const ROOT: &str = "root";
pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

/// An opened store backed by a scratch directory, plus a directory of three
/// well-known test identities (`root`, `alice`, `bob`) sharing the `users`
/// group.
pub struct Fixture {
    pub store: Mstor,
    _tempdir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let tempdir = TempDir::new().expect("create temp dir");
        let config = StoreConfig::new(tempdir.path().to_str().unwrap());
        let store = Mstor::open(&config, user_directory(), placement()).expect("open store");
        Fixture { store, _tempdir: tempdir }
    }

    pub fn reopen(self) -> Self {
        let config = StoreConfig::new(self._tempdir.path().to_str().unwrap());
        drop(self.store);
        let store = Mstor::open(&config, user_directory(), placement()).expect("reopen store");
        Fixture { store, _tempdir: self._tempdir }
    }

    /// Like [`Fixture::new`], but with `man_repl`/`min_repl` overridden.
    pub fn with_replication(man_repl: u32, min_repl: u32) -> Self {
        let tempdir = TempDir::new().expect("create temp dir");
        let mut config = StoreConfig::new(tempdir.path().to_str().unwrap());
        config.man_repl = man_repl;
        config.min_repl = min_repl;
        let store = Mstor::open(&config, user_directory(), placement()).expect("open store");
        Fixture { store, _tempdir: tempdir }
    }
}

fn user_directory() -> Arc<InMemoryUserDirectory> {
    Arc::new(
        InMemoryUserDirectory::new()
            .with_user(ROOT, User { uid: 0, gid: 0, groups: vec![] })
            .with_user(ALICE, User { uid: 1001, gid: 100, groups: vec![100] })
            .with_user(BOB, User { uid: 1002, gid: 100, groups: vec![100] })
            .with_group("users", 100),
    )
}

fn placement() -> Arc<RoundRobinPlacement> {
    Arc::new(RoundRobinPlacement::new(vec![1, 2, 3, 4]))
}
