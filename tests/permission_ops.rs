#[path = "common.rs"]
mod common;

use common::{Fixture, ALICE, BOB, ROOT};
use mstor::Error;

#[test]
fn owner_can_write_group_and_world_cannot() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/home", 0o777).unwrap();
    fixture.store.chmod(ROOT, "/home", 0o777).unwrap();
    fixture.store.creat(ALICE, "/home/private", 0o600).unwrap();

    assert_eq!(fixture.store.open(BOB, "/home/private"), Err(Error::Permission));
    assert!(fixture.store.open(ALICE, "/home/private").is_ok());
}

#[test]
fn superuser_bypasses_permission_bits() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/home", 0o777).unwrap();
    fixture.store.creat(ALICE, "/home/secret", 0o600).unwrap();

    assert!(fixture.store.open(ROOT, "/home/secret").is_ok());
}

#[test]
fn group_membership_grants_group_permission_bits() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/shared", 0o777).unwrap();
    fixture.store.creat(ALICE, "/shared/doc", 0o640).unwrap();

    assert!(fixture.store.open(BOB, "/shared/doc").is_ok());
}

#[test]
fn chmod_is_restricted_to_owner_or_superuser() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/home", 0o777).unwrap();
    fixture.store.creat(ALICE, "/home/f", 0o644).unwrap();

    assert_eq!(fixture.store.chmod(BOB, "/home/f", 0o777), Err(Error::Permission));
    fixture.store.chmod(ALICE, "/home/f", 0o600).unwrap();
    assert_eq!(fixture.store.stat(ROOT, "/home/f").unwrap().payload.mode(), 0o600);
}

#[test]
fn chown_of_owner_is_reserved_to_superuser() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/home", 0o777).unwrap();
    fixture.store.creat(ALICE, "/home/f", 0o644).unwrap();

    assert_eq!(fixture.store.chown(ALICE, "/home/f", Some(BOB), None), Err(Error::Permission));
    fixture.store.chown(ROOT, "/home/f", Some(BOB), None).unwrap();
    assert_eq!(fixture.store.stat(ROOT, "/home/f").unwrap().payload.uid, 1002);
}

#[test]
fn creat_requires_write_on_parent_directory() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/locked", 0o555).unwrap();
    assert_eq!(fixture.store.creat(ALICE, "/locked/f", 0o644), Err(Error::Permission));
}

#[test]
fn interior_directory_without_exec_blocks_traversal() {
    let fixture = Fixture::new();
    fixture.store.mkdirs(ROOT, "/a/b", 0o755).unwrap();
    fixture.store.chmod(ROOT, "/a", 0o644).unwrap();

    assert_eq!(fixture.store.stat(ALICE, "/a/b"), Err(Error::Permission));
}
