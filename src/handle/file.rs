//! On-disk file handle
//!
//! This module provides the FileHandle implementation over a real
//! [`std::fs::File`]. It is the only shipped handle with a real location, so
//! path-level metadata changes and deletes through the proxy act on its path.

use crate::handle::capability::{closed_error, Handle};
use crate::handle::options::{BufferMode, LockMode, LockOperation, OpenMode, StreamOption};
use crate::handle::stat::Stat;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Handle over a real file
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    state: Mutex<FileState>,
    /// Deletes the file on drop for handles created by [`FileHandle::temporary`]
    _temp_path: Option<TempPath>,
}

#[derive(Debug)]
struct FileState {
    file: Option<File>,
    at_eof: bool,
    blocking: bool,
    write_buffer: (BufferMode, usize),
}

impl FileHandle {
    /// Open `path` with the given access mode
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> io::Result<Self> {
        let path = path.as_ref();
        let file = mode.to_open_options().open(path)?;
        Ok(Self::from_file(file, path))
    }

    /// Wrap an already open file that lives at `path`
    pub fn from_file(file: File, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(FileState {
                file: Some(file),
                at_eof: false,
                blocking: true,
                write_buffer: (BufferMode::Full, 0),
            }),
            _temp_path: None,
        }
    }

    /// Create a read/write temp file that is removed when the handle is dropped
    pub fn temporary() -> io::Result<Self> {
        let (file, temp_path) = tempfile::NamedTempFile::new()?.into_parts();
        let mut handle = Self::from_file(file, temp_path.to_path_buf());
        handle._temp_path = Some(temp_path);
        Ok(handle)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocking flag last set through [`StreamOption::Blocking`]
    pub fn is_blocking(&self) -> bool {
        self.state.lock().blocking
    }

    /// Write buffer mode and size last set through [`StreamOption::WriteBuffer`]
    pub fn write_buffer(&self) -> (BufferMode, usize) {
        self.state.lock().write_buffer
    }

    fn with_open<T>(
        &self,
        op: impl FnOnce(&mut FileState, &File) -> io::Result<T>,
    ) -> io::Result<T> {
        let mut state = self.state.lock();
        let file = match state.file.take() {
            Some(file) => file,
            None => return Err(closed_error()),
        };
        let result = op(&mut state, &file);
        state.file = Some(file);
        result
    }
}

impl Handle for FileHandle {
    fn read(&self, count: usize) -> io::Result<Vec<u8>> {
        self.with_open(|state, file| {
            let mut buffer = Vec::new();
            file.take(count as u64).read_to_end(&mut buffer)?;
            if buffer.len() < count {
                state.at_eof = true;
            }
            Ok(buffer)
        })
    }

    fn write(&self, data: &[u8]) -> io::Result<usize> {
        self.with_open(|_, mut file| {
            file.write_all(data)?;
            Ok(data.len())
        })
    }

    fn seek(&self, pos: SeekFrom) -> io::Result<u64> {
        self.with_open(|state, mut file| {
            let offset = file.seek(pos)?;
            state.at_eof = false;
            Ok(offset)
        })
    }

    fn tell(&self) -> io::Result<u64> {
        self.with_open(|_, mut file| file.stream_position())
    }

    fn eof(&self) -> bool {
        let state = self.state.lock();
        state.file.is_none() || state.at_eof
    }

    fn flush(&self) -> io::Result<bool> {
        self.with_open(|_, mut file| {
            file.flush()?;
            Ok(true)
        })
    }

    fn truncate(&self, size: u64) -> io::Result<bool> {
        self.with_open(|_, file| {
            file.set_len(size)?;
            Ok(true)
        })
    }

    fn lock(&self, operation: LockOperation) -> io::Result<bool> {
        self.with_open(|_, file| {
            // Fully qualified: std's inherent File locking methods shadow the
            // trait methods on newer toolchains and return a different error type.
            let outcome = match (operation.mode, operation.non_blocking) {
                (LockMode::Shared, false) => FileExt::lock_shared(file),
                (LockMode::Exclusive, false) => FileExt::lock_exclusive(file),
                (LockMode::Shared, true) => FileExt::try_lock_shared(file),
                (LockMode::Exclusive, true) => FileExt::try_lock_exclusive(file),
                (LockMode::Unlock, _) => FileExt::unlock(file),
            };
            match outcome {
                Ok(()) => Ok(true),
                Err(e) if operation.non_blocking && is_would_block(&e) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }

    fn set_option(&self, option: StreamOption) -> io::Result<bool> {
        self.with_open(|state, _| match option {
            StreamOption::Blocking(blocking) => {
                state.blocking = blocking;
                Ok(true)
            }
            StreamOption::WriteBuffer { mode, size } => {
                state.write_buffer = (mode, size);
                Ok(true)
            }
            // Regular files never wait for data, so there is nothing to time out.
            StreamOption::ReadTimeout(_) => Ok(false),
        })
    }

    fn stat(&self) -> io::Result<Stat> {
        self.with_open(|_, file| Ok(Stat::from(&file.metadata()?)))
    }

    fn close(&self) -> io::Result<bool> {
        let mut state = self.state.lock();
        match state.file.take() {
            Some(mut file) => {
                file.flush()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_open(&self) -> bool {
        self.state.lock().file.is_some()
    }

    fn real_path(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

fn is_would_block(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_write_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let handle = FileHandle::open(&path, OpenMode::parse("w+").unwrap()).unwrap();

        assert_eq!(handle.write(b"line one\n").unwrap(), 9);
        assert!(handle.flush().unwrap());
        handle.seek(SeekFrom::Start(0)).unwrap();
        assert!(!handle.eof());
        assert_eq!(handle.read(4).unwrap(), b"line");
        assert_eq!(handle.read(64).unwrap(), b" one\n");
        assert!(handle.eof());

        assert_eq!(std::fs::read(&path).unwrap(), b"line one\n");
        assert_eq!(handle.real_path(), Some(path));
    }

    #[test]
    fn test_open_missing_file_propagates_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileHandle::open(dir.path().join("missing"), OpenMode::parse("r").unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_truncate_and_stat() {
        let handle = FileHandle::temporary().unwrap();
        handle.write(b"0123456789").unwrap();
        assert!(handle.truncate(4).unwrap());

        let stat = handle.stat().unwrap();
        assert_eq!(stat.size, 4);
        assert!(stat.is_file());
    }

    #[test]
    fn test_lock_cycle() {
        let handle = FileHandle::temporary().unwrap();
        assert!(handle.lock(LockOperation::exclusive()).unwrap());
        assert!(handle.lock(LockOperation::unlock()).unwrap());
        assert!(handle.lock(LockOperation::shared().non_blocking()).unwrap());
        assert!(handle.lock(LockOperation::unlock()).unwrap());
    }

    #[test]
    fn test_set_option() {
        let handle = FileHandle::temporary().unwrap();
        assert!(handle.set_option(StreamOption::Blocking(false)).unwrap());
        assert!(!handle.is_blocking());
        assert!(handle
            .set_option(StreamOption::WriteBuffer {
                mode: BufferMode::None,
                size: 0
            })
            .unwrap());
        assert_eq!(handle.write_buffer(), (BufferMode::None, 0));
        assert!(!handle
            .set_option(StreamOption::ReadTimeout(std::time::Duration::from_secs(1)))
            .unwrap());
    }

    #[test]
    fn test_temporary_file_removed_on_drop() {
        let handle = FileHandle::temporary().unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());
        drop(handle);
        assert!(!path.exists());
    }

    #[test]
    fn test_closed_handle() {
        let handle = FileHandle::temporary().unwrap();
        assert!(handle.close().unwrap());
        assert!(!handle.is_open());
        assert!(handle.eof());
        assert!(handle.write(b"x").is_err());
        assert!(!handle.close().unwrap());
    }
}
