#[path = "common.rs"]
mod common;

use common::{Fixture, ROOT};
use mstor::Error;

#[test]
fn chunkalloc_assigns_increasing_cids_and_replicas() {
    let fixture = Fixture::new();
    let nid = fixture.store.creat(ROOT, "/file", 0o644).unwrap();

    let (cid1, oids1) = fixture.store.chunkalloc(ROOT, nid, 0).unwrap();
    let (cid2, oids2) = fixture.store.chunkalloc(ROOT, nid, 4 * 1024 * 1024).unwrap();

    assert!(cid2 > cid1);
    assert_eq!(oids1.len(), 3);
    assert_eq!(oids2.len(), 3);
}

#[test]
fn chunkalloc_rejects_an_offset_that_does_not_advance() {
    let fixture = Fixture::new();
    let nid = fixture.store.creat(ROOT, "/file", 0o644).unwrap();
    fixture.store.chunkalloc(ROOT, nid, 4 * 1024 * 1024).unwrap();

    assert_eq!(fixture.store.chunkalloc(ROOT, nid, 4 * 1024 * 1024), Err(Error::InvalidArgument));
    assert_eq!(fixture.store.chunkalloc(ROOT, nid, 0), Err(Error::InvalidArgument));
}

#[test]
fn chunkalloc_requires_write_on_the_file_and_rejects_directories() {
    let fixture = Fixture::new();
    let dir_nid = fixture.store.mkdirs(ROOT, "/dir", 0o755).unwrap();
    assert_eq!(fixture.store.chunkalloc(ROOT, dir_nid, 0), Err(Error::IsDir));
}

#[test]
fn chunkfind_returns_the_preceding_chunk_and_everything_after_it() {
    let fixture = Fixture::new();
    let nid = fixture.store.creat(ROOT, "/file", 0o644).unwrap();
    fixture.store.chunkalloc(ROOT, nid, 0).unwrap();
    fixture.store.chunkalloc(ROOT, nid, 4 * 1024 * 1024).unwrap();
    fixture.store.chunkalloc(ROOT, nid, 8 * 1024 * 1024).unwrap();

    let hits = fixture.store.chunkfind(nid, 5 * 1024 * 1024, 8 * 1024 * 1024, 16).unwrap();
    let offsets: Vec<u64> = hits.iter().map(|(offset, _)| *offset).collect();

    assert_eq!(offsets, vec![4 * 1024 * 1024, 8 * 1024 * 1024]);
}

#[test]
fn chunkalloc_floors_the_replica_count_at_min_repl() {
    let fixture = Fixture::with_replication(1, 3);
    let nid = fixture.store.creat(ROOT, "/file", 0o644).unwrap();

    let (_, oids) = fixture.store.chunkalloc(ROOT, nid, 0).unwrap();
    assert_eq!(oids.len(), 3);
}

#[test]
fn chunkfind_respects_max_cinfos() {
    let fixture = Fixture::new();
    let nid = fixture.store.creat(ROOT, "/file", 0o644).unwrap();
    for i in 0..5u64 {
        fixture.store.chunkalloc(ROOT, nid, i * 4 * 1024 * 1024).unwrap();
    }

    let hits = fixture.store.chunkfind(nid, 0, u64::MAX, 2).unwrap();
    assert_eq!(hits.len(), 2);
}
