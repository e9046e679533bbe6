//! Error taxonomy for the metadata store.
//!
//! Mirrors the POSIX-style codes a metadata server hands back to callers
//! (RPC dispatch, out of scope here, is expected to translate these into
//! whatever wire-level status codes its protocol defines).

use std::fmt;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`crate::Mstor`] operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Path component missing, or a node vanished during a concurrent listdir.
    NoEntry,
    /// Creat target already exists.
    Exist,
    /// Caller expected a directory but found a file.
    NotDir,
    /// Caller expected a file but found a directory.
    IsDir,
    /// Permission check failed, rmdir of root, or non-superuser chown.
    Permission,
    /// Non-recursive rmdir on a non-empty directory.
    NotEmpty,
    /// A path component or an output record exceeds a length bound.
    NameTooLong,
    /// Bad schema version, malformed key/value on read, or out-of-order chunkalloc.
    InvalidArgument,
    /// The KV engine reported an error or returned a malformed value.
    Io,
    /// Iterator or batch allocation failed.
    NoMemory,
    /// Operation is reserved and not implemented (rename, sequester).
    NotSupported,
    /// User or group lookup failed.
    UnknownUser,
    /// The node or chunk identifier space has been exhausted.
    IdSpaceExhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::NoEntry => "no such file or directory",
            Error::Exist => "file exists",
            Error::NotDir => "not a directory",
            Error::IsDir => "is a directory",
            Error::Permission => "operation not permitted",
            Error::NotEmpty => "directory not empty",
            Error::NameTooLong => "name or record too long",
            Error::InvalidArgument => "invalid argument",
            Error::Io => "store I/O error",
            Error::NoMemory => "out of memory",
            Error::NotSupported => "operation not supported",
            Error::UnknownUser => "unknown user or group",
            Error::IdSpaceExhausted => "identifier space exhausted",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::CollectionNotFound(_) => Error::NoEntry,
            sled::Error::Unsupported(_) | sled::Error::ReportableBug(_) => Error::InvalidArgument,
            _ => Error::Io,
        }
    }
}
