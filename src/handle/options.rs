//! Operation vocabulary shared by handles, proxies and the scheme table.
//!
//! Hosts describe seeks, locks and stream options with small integer codes.
//! Each code family is decoded into a closed enum here so every consumer
//! matches exhaustively; codes that do not decode yield `None`.

use crate::error::{ProxyError, Result};
use std::io::SeekFrom;
use std::time::Duration;

/// Origin of a seek offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Offset from the start of the resource
    Set,
    /// Offset from the current position
    Current,
    /// Offset from the end of the resource
    End,
}

impl Whence {
    /// Decode a host whence code (`0` set, `1` current, `2` end)
    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Set),
            1 => Some(Self::Current),
            2 => Some(Self::End),
            _ => None,
        }
    }

    /// Combine with an offset into a [`SeekFrom`]
    ///
    /// Returns `None` for a negative absolute offset, which no resource can honour.
    pub fn seek_from(self, offset: i64) -> Option<SeekFrom> {
        match self {
            Self::Set => u64::try_from(offset).ok().map(SeekFrom::Start),
            Self::Current => Some(SeekFrom::Current(offset)),
            Self::End => Some(SeekFrom::End(offset)),
        }
    }
}

/// Advisory lock mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
    Unlock,
}

/// Lock request: a mode plus whether the caller is willing to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOperation {
    pub mode: LockMode,
    pub non_blocking: bool,
}

impl LockOperation {
    const SHARED: i32 = 1;
    const EXCLUSIVE: i32 = 2;
    const UNLOCK: i32 = 3;
    const NON_BLOCKING: i32 = 4;

    pub fn shared() -> Self {
        Self {
            mode: LockMode::Shared,
            non_blocking: false,
        }
    }

    pub fn exclusive() -> Self {
        Self {
            mode: LockMode::Exclusive,
            non_blocking: false,
        }
    }

    pub fn unlock() -> Self {
        Self {
            mode: LockMode::Unlock,
            non_blocking: false,
        }
    }

    /// Same mode, but fail instead of waiting
    pub fn non_blocking(mut self) -> Self {
        self.non_blocking = true;
        self
    }

    /// Decode a host lock code (`1` shared, `2` exclusive, `3` unlock, `| 4` non-blocking)
    pub fn from_raw(code: i32) -> Option<Self> {
        let non_blocking = code & Self::NON_BLOCKING != 0;
        let mode = match code & !Self::NON_BLOCKING {
            Self::SHARED => LockMode::Shared,
            Self::EXCLUSIVE => LockMode::Exclusive,
            Self::UNLOCK => LockMode::Unlock,
            _ => return None,
        };
        Some(Self { mode, non_blocking })
    }
}

/// Write buffering strategy requested through [`StreamOption::WriteBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    None,
    Line,
    Full,
}

/// Stream option understood by the host's option-setting API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOption {
    /// Switch blocking mode on or off
    Blocking(bool),
    /// Read timeout, optionally with a sub-second component
    ReadTimeout(Duration),
    /// Write buffer mode and size in bytes
    WriteBuffer { mode: BufferMode, size: usize },
}

impl StreamOption {
    pub const BLOCKING: i32 = 1;
    pub const WRITE_BUFFER: i32 = 3;
    pub const READ_TIMEOUT: i32 = 4;

    /// Decode a host option call
    ///
    /// # Arguments
    /// * `option` - Option code (`1` blocking, `3` write buffer, `4` read timeout)
    /// * `arg1` - Blocking flag, buffer mode (`0` none, `1` line, `2` full) or whole seconds
    /// * `arg2` - Buffer size, or microseconds for a read timeout
    ///
    /// # Returns
    /// * `None` for unknown codes, negative values, out-of-range microseconds
    ///   or a buffered mode without a size
    pub fn from_raw(option: i32, arg1: i64, arg2: Option<i64>) -> Option<Self> {
        match option {
            Self::BLOCKING => Some(Self::Blocking(arg1 != 0)),
            Self::READ_TIMEOUT => {
                let seconds = u64::try_from(arg1).ok()?;
                let micros = match arg2 {
                    None => 0,
                    Some(us) if (0..1_000_000).contains(&us) => us as u32,
                    Some(_) => return None,
                };
                Some(Self::ReadTimeout(Duration::new(seconds, micros * 1_000)))
            }
            Self::WRITE_BUFFER => {
                let mode = match arg1 {
                    0 => BufferMode::None,
                    1 => BufferMode::Line,
                    2 => BufferMode::Full,
                    _ => return None,
                };
                let size = match (mode, arg2) {
                    (BufferMode::None, _) => 0,
                    (_, Some(size)) => usize::try_from(size).ok()?,
                    (_, None) => return None,
                };
                Some(Self::WriteBuffer { mode, size })
            }
            _ => None,
        }
    }
}

/// Access mode requested when a path is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub create_new: bool,
}

impl OpenMode {
    /// Parse a conventional mode string such as `"r"`, `"w+"` or `"ab"`
    ///
    /// The binary/text flags `b` and `t` are accepted and ignored.
    pub fn parse(mode: &str) -> Result<Self> {
        let mut chars = mode.chars().filter(|c| *c != 'b' && *c != 't');
        let base = chars
            .next()
            .ok_or_else(|| ProxyError::invalid_input("empty open mode"))?;
        let plus = match chars.next() {
            None => false,
            Some('+') => true,
            Some(other) => {
                return Err(ProxyError::invalid_input(format!(
                    "unexpected '{}' in open mode '{}'",
                    other, mode
                )))
            }
        };
        if chars.next().is_some() {
            return Err(ProxyError::invalid_input(format!(
                "trailing characters in open mode '{}'",
                mode
            )));
        }

        let mut parsed = match base {
            'r' => Self {
                read: true,
                ..Self::default()
            },
            'w' => Self {
                write: true,
                truncate: true,
                create: true,
                ..Self::default()
            },
            'a' => Self {
                write: true,
                append: true,
                create: true,
                ..Self::default()
            },
            'x' => Self {
                write: true,
                create_new: true,
                ..Self::default()
            },
            'c' => Self {
                write: true,
                create: true,
                ..Self::default()
            },
            other => {
                return Err(ProxyError::invalid_input(format!(
                    "unknown open mode '{}'",
                    other
                )))
            }
        };
        if plus {
            parsed.read = true;
            parsed.write = true;
        }
        Ok(parsed)
    }

    /// Equivalent [`std::fs::OpenOptions`] for opening a real file
    pub fn to_open_options(self) -> std::fs::OpenOptions {
        let mut options = std::fs::OpenOptions::new();
        options
            .read(self.read)
            .write(self.write && !self.append)
            .append(self.append)
            .truncate(self.truncate)
            .create(self.create)
            .create_new(self.create_new);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whence_rejects_negative_absolute_offset() {
        assert_eq!(Whence::Set.seek_from(-1), None);
        assert_eq!(Whence::Set.seek_from(4), Some(SeekFrom::Start(4)));
        assert_eq!(Whence::Current.seek_from(-2), Some(SeekFrom::Current(-2)));
        assert_eq!(Whence::End.seek_from(0), Some(SeekFrom::End(0)));
        assert_eq!(Whence::from_raw(7), None);
    }

    #[test]
    fn test_lock_operation_from_raw() {
        assert_eq!(LockOperation::from_raw(1), Some(LockOperation::shared()));
        assert_eq!(
            LockOperation::from_raw(2 | 4),
            Some(LockOperation::exclusive().non_blocking())
        );
        assert_eq!(LockOperation::from_raw(3), Some(LockOperation::unlock()));
        assert_eq!(LockOperation::from_raw(0), None);
        assert_eq!(LockOperation::from_raw(8), None);
    }

    #[test]
    fn test_stream_option_read_timeout() {
        assert_eq!(
            StreamOption::from_raw(StreamOption::READ_TIMEOUT, 2, None),
            Some(StreamOption::ReadTimeout(Duration::from_secs(2)))
        );
        assert_eq!(
            StreamOption::from_raw(StreamOption::READ_TIMEOUT, 1, Some(500_000)),
            Some(StreamOption::ReadTimeout(Duration::from_millis(1_500)))
        );
        assert_eq!(
            StreamOption::from_raw(StreamOption::READ_TIMEOUT, 1, Some(1_000_000)),
            None
        );
        assert_eq!(StreamOption::from_raw(StreamOption::READ_TIMEOUT, -1, None), None);
    }

    #[test]
    fn test_stream_option_write_buffer() {
        assert_eq!(
            StreamOption::from_raw(StreamOption::WRITE_BUFFER, 0, None),
            Some(StreamOption::WriteBuffer {
                mode: BufferMode::None,
                size: 0
            })
        );
        assert_eq!(
            StreamOption::from_raw(StreamOption::WRITE_BUFFER, 2, Some(8192)),
            Some(StreamOption::WriteBuffer {
                mode: BufferMode::Full,
                size: 8192
            })
        );
        assert_eq!(StreamOption::from_raw(StreamOption::WRITE_BUFFER, 2, None), None);
        assert_eq!(StreamOption::from_raw(StreamOption::WRITE_BUFFER, 9, Some(1)), None);
        assert_eq!(StreamOption::from_raw(99, 0, None), None);
    }

    #[test]
    fn test_open_mode_parse() {
        let read = OpenMode::parse("rb").unwrap();
        assert!(read.read && !read.write);

        let write_plus = OpenMode::parse("w+").unwrap();
        assert!(write_plus.read && write_plus.write && write_plus.truncate && write_plus.create);

        let append = OpenMode::parse("a").unwrap();
        assert!(append.append && append.create && !append.read);

        assert!(OpenMode::parse("").is_err());
        assert!(OpenMode::parse("q").is_err());
        assert!(OpenMode::parse("r+x").is_err());
    }
}
