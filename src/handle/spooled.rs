//! Spooled temp-buffer handle
//!
//! Data stays in memory until it grows past a threshold, then moves to an
//! anonymous temp file. Either way the handle has no real path, so path-level
//! stat calls are answered from the handle itself.

use crate::handle::capability::{closed_error, Handle};
use crate::handle::options::LockOperation;
use crate::handle::stat::Stat;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use tempfile::SpooledTempFile;

/// Temp buffer backed by [`SpooledTempFile`]
pub struct SpooledHandle {
    threshold: usize,
    inner: Mutex<Option<SpooledTempFile>>,
}

impl SpooledHandle {
    /// Conventional spill size for temp streams (2 MiB)
    pub const DEFAULT_THRESHOLD: usize = 2 * 1024 * 1024;

    /// Create an empty buffer that spills to disk after `threshold` bytes
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            inner: Mutex::new(Some(SpooledTempFile::new(threshold))),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// True once the data has moved from memory to the anonymous temp file
    pub fn is_rolled(&self) -> bool {
        self.inner
            .lock()
            .as_ref()
            .map(SpooledTempFile::is_rolled)
            .unwrap_or(false)
    }

    fn with_open<T>(
        &self,
        op: impl FnOnce(&mut SpooledTempFile) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut inner = self.inner.lock();
        match inner.as_mut() {
            Some(file) => op(file),
            None => Err(closed_error()),
        }
    }
}

/// Length of the spooled data without disturbing the position
fn spooled_len(file: &mut SpooledTempFile) -> io::Result<u64> {
    let position = file.stream_position()?;
    let len = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(position))?;
    Ok(len)
}

impl Default for SpooledHandle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl fmt::Debug for SpooledHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpooledHandle")
            .field("threshold", &self.threshold)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Handle for SpooledHandle {
    fn read(&self, count: usize) -> io::Result<Vec<u8>> {
        self.with_open(|file| {
            let mut buffer = Vec::new();
            (&mut *file).take(count as u64).read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        self.with_open(|file| {
            file.write_all(data)?;
            Ok(data.len())
        })
    }

    fn seek(&self, pos: SeekFrom) -> io::Result<u64> {
        self.with_open(|file| file.seek(pos))
    }

    fn tell(&self) -> io::Result<u64> {
        self.with_open(|file| file.stream_position())
    }

    fn eof(&self) -> bool {
        self.with_open(|file| Ok(file.stream_position()? >= spooled_len(file)?))
            .unwrap_or(true)
    }

    fn flush(&self) -> io::Result<bool> {
        self.with_open(|file| {
            file.flush()?;
            Ok(true)
        })
    }

    fn truncate(&self, size: u64) -> io::Result<bool> {
        self.with_open(|file| {
            file.set_len(size)?;
            Ok(true)
        })
    }

    fn lock(&self, _operation: LockOperation) -> io::Result<bool> {
        self.with_open(|_| Ok(false))
    }

    fn stat(&self) -> io::Result<Stat> {
        self.with_open(|file| Ok(Stat::for_buffer(spooled_len(file)?)))
    }

    fn close(&self) -> io::Result<bool> {
        Ok(self.inner.lock().take().is_some())
    }

    fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_in_memory_below_threshold() {
        let handle = SpooledHandle::new(64);
        handle.write(b"small").unwrap();
        assert!(!handle.is_rolled());
        assert_eq!(handle.stat().unwrap().size, 5);
        assert!(handle.real_path().is_none());
    }

    #[test]
    fn test_rolls_over_past_threshold() {
        let handle = SpooledHandle::new(8);
        handle.write(&[b'x'; 32]).unwrap();
        assert!(handle.is_rolled());

        handle.seek(SeekFrom::Start(0)).unwrap();
        assert_eq!(handle.read(64).unwrap().len(), 32);
        assert!(handle.eof());
        assert!(handle.real_path().is_none());
    }

    #[test]
    fn test_stat_does_not_move_position() {
        let handle = SpooledHandle::default();
        handle.write(b"abcdef").unwrap();
        handle.seek(SeekFrom::Start(2)).unwrap();

        assert_eq!(handle.stat().unwrap().size, 6);
        assert_eq!(handle.tell().unwrap(), 2);
        assert!(!handle.eof());
    }

    #[test]
    fn test_truncate_and_close() {
        let handle = SpooledHandle::default();
        handle.write(b"abcdef").unwrap();
        assert!(handle.truncate(3).unwrap());
        assert_eq!(handle.stat().unwrap().size, 3);

        assert!(handle.close().unwrap());
        assert!(!handle.close().unwrap());
        assert!(handle.read(1).is_err());
    }
}
