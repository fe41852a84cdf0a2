//! Growable in-memory buffer handle
//!
//! This module provides the MemoryHandle implementation: a byte buffer with a
//! cursor, shareable between the caller and any proxy bound to it. It has no
//! real filesystem location.

use crate::handle::capability::{closed_error, Handle};
use crate::handle::options::LockOperation;
use crate::handle::stat::Stat;
use parking_lot::Mutex;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// In-memory buffer handle
///
/// Writes past the end grow the buffer; seeking past the end is allowed and
/// the gap is zero-filled by the next write. Locking is not supported.
#[derive(Debug, Default)]
pub struct MemoryHandle {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    cursor: Cursor<Vec<u8>>,
    closed: bool,
}

impl MemoryHandle {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer pre-filled with `content`, positioned at the start
    pub fn with_contents(content: Vec<u8>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                cursor: Cursor::new(content),
                closed: false,
            }),
        }
    }

    /// Snapshot of the whole buffer, independent of the position
    ///
    /// Still available after the handle is closed.
    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().cursor.get_ref().clone()
    }

    /// Current buffer length in bytes
    pub fn len(&self) -> usize {
        self.state.lock().cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_open<T>(
        &self,
        op: impl FnOnce(&mut Cursor<Vec<u8>>) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(closed_error());
        }
        op(&mut state.cursor)
    }
}

impl Handle for MemoryHandle {
    fn read(&self, count: usize) -> io::Result<Vec<u8>> {
        self.with_open(|cursor| {
            let mut buffer = Vec::with_capacity(count.min(cursor.get_ref().len()));
            (&mut *cursor).take(count as u64).read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        self.with_open(|cursor| {
            cursor.write_all(data)?;
            Ok(data.len())
        })
    }

    fn seek(&self, pos: SeekFrom) -> io::Result<u64> {
        self.with_open(|cursor| cursor.seek(pos))
    }

    fn tell(&self) -> io::Result<u64> {
        self.with_open(|cursor| Ok(cursor.position()))
    }

    fn eof(&self) -> bool {
        let state = self.state.lock();
        state.closed || state.cursor.position() >= state.cursor.get_ref().len() as u64
    }

    fn flush(&self) -> io::Result<bool> {
        self.with_open(|_| Ok(true))
    }

    fn truncate(&self, size: u64) -> io::Result<bool> {
        self.with_open(|cursor| {
            let size = usize::try_from(size)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            cursor.get_mut().resize(size, 0);
            Ok(true)
        })
    }

    fn lock(&self, _operation: LockOperation) -> io::Result<bool> {
        self.with_open(|_| Ok(false))
    }

    fn stat(&self) -> io::Result<Stat> {
        self.with_open(|cursor| Ok(Stat::for_buffer(cursor.get_ref().len() as u64)))
    }

    fn close(&self) -> io::Result<bool> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(false);
        }
        state.closed = true;
        Ok(true)
    }

    fn is_open(&self) -> bool {
        !self.state.lock().closed
    }
}
