//! Contracts between the scheme table and installed wrappers.

use crate::error::Result;
use crate::handle::{
    LockOperation, MetadataChange, OpenMode, Stat, StatFlags, StreamOption, Whence,
};
use std::fmt;

/// An opened path, as seen by a path-based consumer
pub trait Stream: Send + fmt::Debug {
    /// Read up to `count` bytes; fewer at end of data
    fn read(&mut self, count: usize) -> Result<Vec<u8>>;

    /// Write `data`, returning the number of bytes written
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Move the position
    ///
    /// Returns `false` when the offset cannot be expressed as a position (a
    /// negative absolute offset). A seek the underlying resource rejects, such
    /// as a relative move before the start, is an error instead.
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<bool>;

    fn tell(&mut self) -> Result<u64>;

    fn eof(&mut self) -> bool;

    fn flush(&mut self) -> Result<bool>;

    fn lock(&mut self, operation: LockOperation) -> Result<bool>;

    fn truncate(&mut self, size: u64) -> Result<bool>;

    /// Apply a stream option; `false` when it is not supported
    fn set_option(&mut self, option: StreamOption) -> Result<bool>;

    fn stat(&mut self) -> Result<Stat>;

    /// Close the stream and release whatever it is bound to
    fn close(self: Box<Self>) -> Result<bool>;
}

/// Factory and path-level operations for one scheme
pub trait StreamWrapper: Send + Sync {
    /// Open `path`, producing a fresh stream instance
    fn open(&self, path: &str, mode: OpenMode) -> Result<Box<dyn Stream>>;

    /// Delete the resource addressed by `path`
    fn unlink(&self, path: &str) -> Result<bool>;

    /// Metadata for `path` without opening it
    fn url_stat(&self, path: &str, flags: StatFlags) -> Result<Stat>;

    /// Change metadata of the resource addressed by `path`
    fn set_metadata(&self, path: &str, change: &MetadataChange) -> Result<bool>;

    /// Whether the wrapper can still serve paths; a dead one may be replaced
    fn is_live(&self) -> bool {
        true
    }
}
