//! Core handle capability trait.
//!
//! This module defines the [`Handle`] trait that every registrable resource
//! implements. All methods take `&self`: a handle is shared between the caller
//! that created it and every proxy opened against it, so implementations keep
//! their state behind a lock.

use crate::handle::options::{LockOperation, StreamOption};
use crate::handle::stat::Stat;
use std::fmt;
use std::io::{self, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;

/// Core trait for an open, externally owned byte resource
///
/// Every method reports failures as the resource's own [`io::Error`]; the
/// proxy layer forwards these without translation.
pub trait Handle: Send + Sync + fmt::Debug {
    /// Read up to `count` bytes from the current position
    ///
    /// # Returns
    /// * Fewer than `count` bytes when the end of data is reached
    /// * An empty vector when already at the end
    fn read(&self, count: usize) -> io::Result<Vec<u8>>;

    /// Write `data` at the current position, returning the number of bytes written
    fn write(&self, data: &[u8]) -> io::Result<usize>;

    /// Move the position, returning the new absolute offset
    fn seek(&self, pos: SeekFrom) -> io::Result<u64>;

    /// Current absolute offset
    fn tell(&self) -> io::Result<u64>;

    /// True once the position has reached the end of data
    fn eof(&self) -> bool;

    /// Push buffered writes down to the backing resource
    fn flush(&self) -> io::Result<bool>;

    /// Resize the resource to exactly `size` bytes. The position is not moved.
    fn truncate(&self, size: u64) -> io::Result<bool>;

    /// Apply an advisory lock operation
    ///
    /// # Returns
    /// * `Ok(true)` when the lock state changed as requested
    /// * `Ok(false)` when the resource does not support locking, or a
    ///   non-blocking request would have blocked
    fn lock(&self, operation: LockOperation) -> io::Result<bool>;

    /// Apply a stream option. Resources that do not understand an option report `false`.
    fn set_option(&self, _option: StreamOption) -> io::Result<bool> {
        Ok(false)
    }

    /// Metadata describing the open resource
    fn stat(&self) -> io::Result<Stat>;

    /// Release the resource. Closing an already closed handle reports `false`.
    fn close(&self) -> io::Result<bool>;

    /// True until [`Handle::close`] has been called
    fn is_open(&self) -> bool;

    /// Location on the real filesystem backing this handle, if any
    ///
    /// Pure memory and spooled temp buffers return `None`; this is the
    /// capability the proxy checks before touching the filesystem directly.
    fn real_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Reference-counted handle as stored in the registry and bound by proxies
pub type SharedHandle = Arc<dyn Handle>;

/// Identity comparison between two shared handles
///
/// Compares the data pointers only, so two `Arc`s created from the same
/// allocation match even when their vtable pointers differ.
pub fn same_handle(a: &SharedHandle, b: &SharedHandle) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Error returned by every operation on a handle after it has been closed
pub(crate) fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "handle is closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::memory::MemoryHandle;

    #[test]
    fn test_same_handle_uses_identity() {
        let a: SharedHandle = Arc::new(MemoryHandle::with_contents(b"same".to_vec()));
        let b: SharedHandle = Arc::new(MemoryHandle::with_contents(b"same".to_vec()));
        let a2 = Arc::clone(&a);

        assert!(same_handle(&a, &a2));
        assert!(!same_handle(&a, &b));
    }

    #[test]
    fn test_default_capabilities() {
        let handle = MemoryHandle::new();
        assert!(handle.real_path().is_none());
        assert!(!handle.set_option(StreamOption::Blocking(true)).unwrap());
    }
}
