//! The metadata store core: bootstrap, path resolution, and every operation
//! handler from spec §4.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, warn};

use crate::codec::{self, *};
use crate::config::StoreConfig;
use crate::dump::StatRecord;
use crate::error::{Error, Result};
use crate::ids::IdAllocator;
use crate::locks::NodeLocks;
use crate::node::{NodePayload, RF_SUPERUSER_UID};
use crate::path::{canonicalize, split_components};
use crate::perm::{self, CheckPerms, WantType};
use crate::replicas::{Oid, ReplicaPlacement};
use crate::request::{Op, Reply, Request};
use crate::stat_wire::write_stat_record;
use crate::udata::{User, UserDirectory};

fn now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// The metadata store. Cheaply cloneable and `Sync + Send`; callers run one
/// [`Mstor::do_operation`] per worker thread against a shared instance
/// (spec §5). Construction (`open`) is the only place this crate touches
/// the filesystem directly — everything else goes through the embedded KV
/// engine.
pub struct Mstor {
    db: sled::Db,
    node_cache: moka::sync::Cache<u64, NodePayload>,
    nid_alloc: IdAllocator,
    cid_alloc: IdAllocator,
    locks: NodeLocks,
    user_dir: Arc<dyn UserDirectory>,
    placement: Arc<dyn ReplicaPlacement>,
    config: StoreConfig,
}

impl Mstor {
    /// Opens (creating if necessary) the store described by `config` (spec
    /// §4.2). Bootstraps a fresh store if the underlying KV engine is empty,
    /// otherwise validates the schema version and recovers the id
    /// allocators from the tail of their key ranges.
    pub fn open(
        config: &StoreConfig,
        user_dir: Arc<dyn UserDirectory>,
        placement: Arc<dyn ReplicaPlacement>,
    ) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.data_dir)
            .cache_capacity(config.cache_capacity)
            .use_compression(false)
            .mode(sled::Mode::HighThroughput)
            .open()
            .map_err(Error::from)?;

        let node_cache_capacity = (config.cache_capacity / 256).max(1024);
        let node_cache = moka::sync::Cache::new(node_cache_capacity);

        let (nid_alloc, cid_alloc) = if db.iter().next().is_none() {
            bootstrap(&db, config)?
        } else {
            load(&db)?
        };

        Ok(Mstor {
            db,
            node_cache,
            nid_alloc,
            cid_alloc,
            locks: NodeLocks::new(),
            user_dir,
            placement,
            config: config.clone(),
        })
    }

    fn flush_if_sync(&self) -> Result<()> {
        if self.config.sync_writes {
            self.db.flush().map_err(Error::from)?;
        }
        Ok(())
    }

    fn resolve_user(&self, user_name: &str) -> Result<User> {
        self.user_dir.lookup_user(user_name)
    }

    fn node(&self, nid: u64) -> Result<NodePayload> {
        if let Some(payload) = self.node_cache.get(&nid) {
            return Ok(payload);
        }
        let raw = self.db.get(node_key(nid)).map_err(Error::from)?.ok_or(Error::NoEntry)?;
        let payload = NodePayload::decode(&raw)?;
        self.node_cache.insert(nid, payload);
        Ok(payload)
    }

    fn put_node(&self, nid: u64, payload: &NodePayload) -> Result<()> {
        self.db.insert(node_key(nid), &payload.encode()[..]).map_err(Error::from)?;
        self.flush_if_sync()?;
        self.node_cache.insert(nid, *payload);
        Ok(())
    }

    /// `fetch_child` (spec §4.4 step 5): requires `exec + IS_DIR` on
    /// `parent`, then looks up `name` under it.
    fn lookup_child(
        &self,
        parent_nid: u64,
        parent: &NodePayload,
        user: &User,
        name: &str,
        check_perms: CheckPerms,
    ) -> Result<Option<u64>> {
        perm::check(parent, user, WantType::Directory, perm::EXEC, check_perms, self.user_dir.as_ref())?;
        let raw = self.db.get(child_key(parent_nid, name)).map_err(Error::from)?;
        match raw {
            Some(value) => Ok(Some(decode_child_value(&value)?)),
            None => Ok(None),
        }
    }

    /// Walks `components` from the root, requiring `exec + IS_DIR` at every
    /// interior step (spec §4.4). An empty slice resolves to the root
    /// itself.
    fn resolve(&self, user: &User, components: &[&str]) -> Result<(u64, NodePayload)> {
        let mut nid = 0u64;
        let mut payload = self.node(0)?;
        for name in components {
            let child_nid = self
                .lookup_child(nid, &payload, user, name, CheckPerms::Enforce)?
                .ok_or(Error::NoEntry)?;
            payload = self.node(child_nid)?;
            nid = child_nid;
        }
        Ok((nid, payload))
    }

    /// Splits a canonical path into `(parent_nid, parent_payload,
    /// last_component)`. The root has no parent; callers must special-case
    /// `"/"` before calling this.
    fn resolve_parent<'a>(
        &self,
        user: &User,
        components: &'a [&'a str],
    ) -> Result<(u64, NodePayload, &'a str)> {
        let (last, init) = components.split_last().ok_or(Error::InvalidArgument)?;
        let (parent_nid, parent_payload) = self.resolve(user, init)?;
        Ok((parent_nid, parent_payload, *last))
    }

    fn create_child(
        &self,
        parent_nid: u64,
        name: &str,
        is_dir: bool,
        mode: u32,
        user: &User,
    ) -> Result<u64> {
        codec::validate_component(name)?;
        let nid = self.nid_alloc.alloc()?;
        let payload = NodePayload::new(is_dir, mode, user.uid, user.gid, now());

        let mut batch = sled::Batch::default();
        batch.insert(&child_key(parent_nid, name)[..], &encode_child_value(nid)[..]);
        batch.insert(&node_key(nid)[..], &payload.encode()[..]);
        self.db.apply_batch(batch).map_err(Error::from)?;
        self.flush_if_sync()?;
        self.node_cache.insert(nid, payload);
        Ok(nid)
    }

    // ---- operation handlers (spec §4.6) -------------------------------

    /// CREAT: requires `write + IS_DIR` on the parent; `EEXIST` if the
    /// child already exists.
    pub fn creat(&self, user_name: &str, path: &str, mode: u32) -> Result<u64> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;

        perm::check(&parent, &user, WantType::Directory, perm::WRITE, CheckPerms::Enforce, self.user_dir.as_ref())?;
        if self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.is_some() {
            return Err(Error::Exist);
        }
        let nid = self.create_child(parent_nid, name, false, mode, &user)?;
        debug!(nid, path, "creat");
        Ok(nid)
    }

    /// OPEN: requires `read` on the file; bumps atime under the node's
    /// stripe lock so a concurrent chmod is never lost (spec §5, §9).
    pub fn open(&self, user_name: &str, path: &str) -> Result<u64> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);

        let (nid, _payload) = if components.is_empty() {
            (0u64, self.node(0)?)
        } else {
            let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
            let child_nid =
                self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;
            (child_nid, self.node(child_nid)?)
        };

        let _guard = self.locks.lock(nid);
        let mut payload = self.node(nid)?;
        perm::check(&payload, &user, WantType::Either, perm::READ, CheckPerms::Enforce, self.user_dir.as_ref())?;
        payload.atime = now();
        self.put_node(nid, &payload)?;
        Ok(nid)
    }

    /// MKDIRS: requires `write + IS_DIR` on each existing parent; creates
    /// any missing intermediate directories. Once an intermediate directory
    /// is created, the permission check is cleared for the remainder of the
    /// walk (spec §4.4 step 6).
    pub fn mkdirs(&self, user_name: &str, path: &str, mode: u32) -> Result<u64> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        if components.is_empty() {
            return Ok(0);
        }

        let mut nid = 0u64;
        let mut payload = self.node(0)?;
        let mut check_perms = CheckPerms::Enforce;

        for name in &components {
            match self.lookup_child(nid, &payload, &user, name, check_perms)? {
                Some(child_nid) => {
                    let child = self.node(child_nid)?;
                    if !child.is_dir() {
                        return Err(Error::NotDir);
                    }
                    nid = child_nid;
                    payload = child;
                }
                None => {
                    perm::check(&payload, &user, WantType::Directory, perm::WRITE, check_perms, self.user_dir.as_ref())?;
                    let new_nid = self.create_child(nid, name, true, mode, &user)?;
                    payload = self.node(new_nid)?;
                    nid = new_nid;
                    check_perms = CheckPerms::Skip;
                }
            }
        }
        Ok(nid)
    }

    /// LISTDIR: requires `read + IS_DIR` on the target; skips (rather than
    /// fails) a child that vanished from underneath a concurrent delete.
    pub fn listdir(&self, user_name: &str, path: &str, max_len: usize) -> Result<Vec<u8>> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        let (dnid, dpayload) = self.resolve(&user, &components)?;
        perm::check(&dpayload, &user, WantType::Directory, perm::READ, CheckPerms::Enforce, self.user_dir.as_ref())?;

        let mut out = Vec::new();
        let prefix = child_prefix(dnid);
        for entry in self.db.scan_prefix(&prefix[..]) {
            let (key, value) = entry.map_err(Error::from)?;
            let name = decode_child_name(&key)?.to_owned();
            let child_nid = decode_child_value(&value)?;
            let child_payload = match self.node(child_nid) {
                Ok(payload) => payload,
                Err(Error::NoEntry) => continue,
                Err(err) => return Err(err),
            };
            write_stat_record(&mut out, &name, &child_payload, self.config.block_size, self.config.man_repl as u8, max_len)?;
        }
        Ok(out)
    }

    /// STAT: requires `read + IS_DIR` on the parent; not checked for the
    /// root, which has no parent.
    pub fn stat(&self, user_name: &str, path: &str) -> Result<StatRecord> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);

        if components.is_empty() {
            let payload = self.node(0)?;
            return Ok(StatRecord { nid: 0, name: "/".to_owned(), payload });
        }

        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
        perm::check(&parent, &user, WantType::Directory, perm::READ, CheckPerms::Enforce, self.user_dir.as_ref())?;
        let nid = self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;
        let payload = self.node(nid)?;
        Ok(StatRecord { nid, name: name.to_owned(), payload })
    }

    /// CHMOD: overwrites the mode bits, preserving IS_DIR. Restricted to the
    /// node's owner or the superuser (the spec does not restate the general
    /// POSIX rule; this crate applies it explicitly — see DESIGN.md).
    pub fn chmod(&self, user_name: &str, path: &str, mode: u32) -> Result<()> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
        perm::check(&parent, &user, WantType::Directory, perm::EXEC, CheckPerms::Enforce, self.user_dir.as_ref())?;
        let nid = self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;

        let _guard = self.locks.lock(nid);
        let mut payload = self.node(nid)?;
        if user.uid != RF_SUPERUSER_UID && user.uid != payload.uid {
            return Err(Error::Permission);
        }
        payload.set_mode(mode);
        payload.mtime = now();
        self.put_node(nid, &payload)
    }

    /// CHOWN: changing the owner is reserved to the superuser; changing the
    /// group requires the caller to own the node and belong to the new
    /// group (spec §4.6).
    pub fn chown(
        &self,
        user_name: &str,
        path: &str,
        new_user: Option<&str>,
        new_group: Option<&str>,
    ) -> Result<()> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
        perm::check(&parent, &user, WantType::Directory, perm::EXEC, CheckPerms::Enforce, self.user_dir.as_ref())?;
        let nid = self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;

        let new_uid = new_user.map(|n| self.user_dir.lookup_user(n)).transpose()?.map(|u| u.uid);
        let new_gid = new_group.map(|n| self.user_dir.lookup_group(n)).transpose()?;

        let _guard = self.locks.lock(nid);
        let mut payload = self.node(nid)?;

        if user.uid != RF_SUPERUSER_UID {
            if new_uid.is_some() {
                return Err(Error::Permission);
            }
            if let Some(gid) = new_gid {
                if payload.uid != user.uid {
                    return Err(Error::Permission);
                }
                if !self.user_dir.user_in_gid(&user, gid) {
                    return Err(Error::Permission);
                }
            }
        }

        if let Some(uid) = new_uid {
            payload.uid = uid;
        }
        if let Some(gid) = new_gid {
            payload.gid = gid;
        }
        payload.mtime = now();
        self.put_node(nid, &payload)
    }

    /// UTIMES: `None` means "do not change" (the spec's `INVAL_TIME`
    /// sentinel, expressed idiomatically as `Option`). Restricted to the
    /// node's owner or the superuser, same rationale as [`Mstor::chmod`].
    pub fn utimes(&self, user_name: &str, path: &str, atime: Option<u64>, mtime: Option<u64>) -> Result<()> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
        perm::check(&parent, &user, WantType::Directory, perm::EXEC, CheckPerms::Enforce, self.user_dir.as_ref())?;
        let nid = self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;

        let _guard = self.locks.lock(nid);
        let mut payload = self.node(nid)?;
        if user.uid != RF_SUPERUSER_UID && user.uid != payload.uid {
            return Err(Error::Permission);
        }
        if let Some(atime) = atime {
            payload.atime = atime;
        }
        if let Some(mtime) = mtime {
            payload.mtime = mtime;
        }
        self.put_node(nid, &payload)
    }

    /// RMDIR: the parent must permit `write + IS_DIR`. Non-recursive rmdir
    /// of a non-empty directory fails `ENOTEMPTY`; recursive rmdir deletes
    /// the whole subtree in one atomic batch, leaving neither the target's
    /// nor any descendant's `n`/`c` records (spec §8 property 5 — this
    /// requires a true recursive descent, not just the target's immediate
    /// children; see DESIGN.md).
    pub fn rmdir(&self, user_name: &str, path: &str, recursive: bool) -> Result<()> {
        let user = self.resolve_user(user_name)?;
        let canonical = canonicalize(path)?;
        let components = split_components(&canonical);
        if components.is_empty() {
            return Err(Error::Permission);
        }

        let (parent_nid, parent, name) = self.resolve_parent(&user, &components)?;
        perm::check(&parent, &user, WantType::Directory, perm::WRITE, CheckPerms::Enforce, self.user_dir.as_ref())?;
        let target_nid = self.lookup_child(parent_nid, &parent, &user, name, CheckPerms::Enforce)?.ok_or(Error::NoEntry)?;
        let target = self.node(target_nid)?;
        if !target.is_dir() {
            return Err(Error::NotDir);
        }

        let children = self.direct_children(target_nid)?;
        if !children.is_empty() && !recursive {
            return Err(Error::NotEmpty);
        }

        let mut batch = sled::Batch::default();
        if recursive {
            self.collect_subtree_deletions(target_nid, &user, &mut batch)?;
        }
        batch.remove(&child_key(parent_nid, name)[..]);
        batch.remove(&node_key(target_nid)[..]);
        self.db.apply_batch(batch).map_err(Error::from)?;
        self.flush_if_sync()?;
        self.node_cache.invalidate(&target_nid);
        for (_, child_nid) in children {
            self.node_cache.invalidate(&child_nid);
        }
        info!(path, recursive, "rmdir");
        Ok(())
    }

    fn direct_children(&self, nid: u64) -> Result<Vec<(String, u64)>> {
        let prefix = child_prefix(nid);
        let mut out = Vec::new();
        for entry in self.db.scan_prefix(&prefix[..]) {
            let (key, value) = entry.map_err(Error::from)?;
            let name = decode_child_name(&key)?.to_owned();
            let child_nid = decode_child_value(&value)?;
            out.push((name, child_nid));
        }
        Ok(out)
    }

    fn collect_subtree_deletions(&self, nid: u64, user: &User, batch: &mut sled::Batch) -> Result<()> {
        for (name, child_nid) in self.direct_children(nid)? {
            let child = match self.node(child_nid) {
                Ok(payload) => payload,
                Err(Error::NoEntry) => continue,
                Err(err) => return Err(err),
            };
            perm::check(&child, user, WantType::Either, perm::WRITE, CheckPerms::Enforce, self.user_dir.as_ref())?;
            if child.is_dir() {
                self.collect_subtree_deletions(child_nid, user, batch)?;
            }
            batch.remove(&child_key(nid, &name)[..]);
            batch.remove(&node_key(child_nid)[..]);
        }
        Ok(())
    }

    /// CHUNKFIND: chunks whose `offset` lies in `(start, end]`, plus the one
    /// chunk whose `offset` is `<= start`, if it exists (spec §4.7, §8
    /// property 4). Not permission-checked: it is a read-only index lookup
    /// consumed by `chunkalloc` and by a read path the spec places out of
    /// scope.
    pub fn chunkfind(&self, nid: u64, start: u64, end: u64, max_cinfos: usize) -> Result<Vec<(u64, u64)>> {
        if max_cinfos == 0 {
            return Ok(Vec::new());
        }
        let mut results = Vec::new();
        let prefix = file_chunk_prefix(nid);
        let at_or_before_start = file_chunk_key(nid, start);

        if let Some(entry) = self.db.range(prefix.to_vec()..=at_or_before_start.to_vec()).next_back() {
            let (key, value) = entry.map_err(Error::from)?;
            let (_, offset) = decode_file_chunk_key(&key)?;
            let cid = decode_cid(&value)?;
            results.push((offset, cid));
            if results.len() >= max_cinfos {
                return Ok(results);
            }
        }

        let after_start = file_chunk_key(nid, start.saturating_add(1));
        let prefix_end = file_chunk_prefix(nid.saturating_add(1));
        for entry in self.db.range(after_start.to_vec()..prefix_end.to_vec()) {
            let (key, value) = entry.map_err(Error::from)?;
            let (_, offset) = decode_file_chunk_key(&key)?;
            if offset > end {
                break;
            }
            let cid = decode_cid(&value)?;
            results.push((offset, cid));
            if results.len() >= max_cinfos {
                break;
            }
        }
        Ok(results)
    }

    fn last_chunk_offset(&self, nid: u64) -> Result<Option<u64>> {
        let prefix = file_chunk_prefix(nid);
        let prefix_end = file_chunk_prefix(nid.saturating_add(1));
        match self.db.range(prefix.to_vec()..prefix_end.to_vec()).next_back() {
            Some(entry) => {
                let (key, _) = entry.map_err(Error::from)?;
                let (_, offset) = decode_file_chunk_key(&key)?;
                Ok(Some(offset))
            }
            None => Ok(None),
        }
    }

    /// CHUNKALLOC: requires `write` on the file. Rejects an offset that
    /// duplicates or precedes the highest already-allocated offset for this
    /// file — appending out of order is `EINVAL` (spec §4.6; see DESIGN.md
    /// for how this reconciles with the literal "chunkfind([off,off]) must
    /// be empty" wording against spec §8 scenario 3).
    pub fn chunkalloc(&self, user_name: &str, nid: u64, offset: u64) -> Result<(u64, Vec<Oid>)> {
        let user = self.resolve_user(user_name)?;
        let file = self.node(nid)?;
        perm::check(&file, &user, WantType::File, perm::WRITE, CheckPerms::Enforce, self.user_dir.as_ref())?;

        if let Some(last) = self.last_chunk_offset(nid)? {
            if offset <= last {
                return Err(Error::InvalidArgument);
            }
        }

        let cid = self.cid_alloc.alloc()?;
        let replica_count = self.config.man_repl.max(self.config.min_repl);
        let oids = self.placement.assign_replicas(replica_count)?;

        let mut batch = sled::Batch::default();
        batch.insert(&file_chunk_key(nid, offset)[..], &encode_cid(cid)[..]);
        batch.insert(&chunk_replicas_key(cid)[..], &encode_oids(&oids)[..]);
        self.db.apply_batch(batch).map_err(Error::from)?;
        self.flush_if_sync()?;
        debug!(nid, offset, cid, "chunkalloc");
        Ok((cid, oids))
    }

    /// Single entry point a wire-protocol layer would call: resolves
    /// `user_name`, then dispatches by operation (spec §2's data flow).
    /// Reserved operations (`Rename`, `SequesterTree`, `FindSequestered`,
    /// `DestroySequestered`) always answer [`Error::NotSupported`].
    pub fn do_operation(&self, request: Request) -> Result<Reply> {
        match request.op {
            Op::Creat { path, mode } => self.creat(&request.user_name, &path, mode).map(Reply::Nid),
            Op::Open { path } => self.open(&request.user_name, &path).map(Reply::Nid),
            Op::Mkdirs { path, mode } => self.mkdirs(&request.user_name, &path, mode).map(Reply::Nid),
            Op::Listdir { path, max_len } => {
                self.listdir(&request.user_name, &path, max_len).map(Reply::Listing)
            }
            Op::Stat { path } => self.stat(&request.user_name, &path).map(Reply::Stat),
            Op::Chmod { path, mode } => self.chmod(&request.user_name, &path, mode).map(|_| Reply::Unit),
            Op::Chown { path, new_user, new_group } => self
                .chown(&request.user_name, &path, new_user.as_deref(), new_group.as_deref())
                .map(|_| Reply::Unit),
            Op::Utimes { path, atime, mtime } => {
                self.utimes(&request.user_name, &path, atime, mtime).map(|_| Reply::Unit)
            }
            Op::Rmdir { path, recursive } => self.rmdir(&request.user_name, &path, recursive).map(|_| Reply::Unit),
            Op::ChunkFind { nid, start, end, max_cinfos } => {
                self.chunkfind(nid, start, end, max_cinfos).map(Reply::Chunks)
            }
            Op::ChunkAlloc { nid, offset } => {
                self.chunkalloc(&request.user_name, nid, offset).map(|(cid, oids)| Reply::Allocated { cid, oids })
            }
            Op::Rename { .. } | Op::SequesterTree { .. } | Op::FindSequestered | Op::DestroySequestered { .. } => {
                warn!("rejecting reserved operation");
                Err(Error::NotSupported)
            }
        }
    }

    /// Forward-scans the whole store, rendering one line per record (spec
    /// §4.8).
    pub fn dump(&self, out: &mut dyn std::io::Write) -> Result<()> {
        crate::dump::dump(&self.db, out)
    }
}

fn bootstrap(db: &sled::Db, config: &StoreConfig) -> Result<(IdAllocator, IdAllocator)> {
    info!(dir = %config.data_dir, "bootstrapping fresh metadata store");
    let root = NodePayload::new(true, 0o755, RF_SUPERUSER_UID, RF_SUPERUSER_UID, now());

    let mut batch = sled::Batch::default();
    batch.insert(&version_key()[..], &encode_version(SCHEMA_VERSION)[..]);
    batch.insert(&node_key(0)[..], &root.encode()[..]);
    db.apply_batch(batch).map_err(Error::from)?;
    db.flush().map_err(Error::from)?;

    Ok((IdAllocator::node(1), IdAllocator::chunk(1)))
}

fn load(db: &sled::Db) -> Result<(IdAllocator, IdAllocator)> {
    let raw_version = db.get(version_key()).map_err(Error::from)?.ok_or_else(|| {
        error!("store is non-empty but carries no version record");
        Error::InvalidArgument
    })?;
    let version = decode_version(&raw_version)?;
    if version != SCHEMA_VERSION {
        error!(version, expected = SCHEMA_VERSION, "refusing to open store with unknown schema version");
        return Err(Error::InvalidArgument);
    }

    let next_nid = match db.range(..=node_upper_bound().to_vec()).next_back() {
        Some(entry) => {
            let (key, _) = entry.map_err(Error::from)?;
            decode_node_key(&key)? + 1
        }
        None => return Err(Error::InvalidArgument),
    };

    let next_cid = match db.range(..=chunk_replicas_upper_bound().to_vec()).next_back() {
        Some(entry) => {
            let (key, _) = entry.map_err(Error::from)?;
            if key.first().copied() != Some(codec::PREFIX_CHUNK_REPLICAS) {
                1
            } else {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&key[1..]);
                u64::from_be_bytes(buf) + 1
            }
        }
        None => 1,
    };

    info!(next_nid, next_cid, "recovered metadata store");
    Ok((IdAllocator::node(next_nid), IdAllocator::chunk(next_cid)))
}
