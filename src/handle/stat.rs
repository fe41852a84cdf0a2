//! Metadata records returned by handle and path stat calls.

use std::fs::Metadata;

/// Metadata record in the conventional stat layout
///
/// An all-zero record ([`Stat::empty`]) is what quiet path queries return
/// when the underlying stat call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub dev: u64,
    pub ino: u64,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub rdev: u64,
    pub size: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
    pub blksize: u64,
    pub blocks: u64,
}

impl Stat {
    /// Regular-file type bits
    pub const S_IFREG: u32 = 0o100000;
    /// Directory type bits
    pub const S_IFDIR: u32 = 0o040000;
    /// Symbolic link type bits
    pub const S_IFLNK: u32 = 0o120000;
    const S_IFMT: u32 = 0o170000;

    /// The empty record
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Record for an anonymous buffer of `size` bytes: a read/write regular file with one link
    pub fn for_buffer(size: u64) -> Self {
        Self {
            mode: Self::S_IFREG | 0o666,
            nlink: 1,
            size,
            ..Self::default()
        }
    }

    pub fn is_file(&self) -> bool {
        self.mode & Self::S_IFMT == Self::S_IFREG
    }

    pub fn is_dir(&self) -> bool {
        self.mode & Self::S_IFMT == Self::S_IFDIR
    }

    pub fn is_symlink(&self) -> bool {
        self.mode & Self::S_IFMT == Self::S_IFLNK
    }

    /// Permission bits without the file type
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

#[cfg(unix)]
impl From<&Metadata> for Stat {
    fn from(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
            mode: metadata.mode(),
            nlink: metadata.nlink(),
            uid: metadata.uid(),
            gid: metadata.gid(),
            rdev: metadata.rdev(),
            size: metadata.size(),
            atime: metadata.atime(),
            mtime: metadata.mtime(),
            ctime: metadata.ctime(),
            blksize: metadata.blksize(),
            blocks: metadata.blocks(),
        }
    }
}

#[cfg(not(unix))]
impl From<&Metadata> for Stat {
    fn from(metadata: &Metadata) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seconds = |time: std::io::Result<SystemTime>| {
            time.ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0)
        };
        let file_type = metadata.file_type();
        let type_bits = if file_type.is_dir() {
            Self::S_IFDIR
        } else if file_type.is_symlink() {
            Self::S_IFLNK
        } else {
            Self::S_IFREG
        };
        let perm_bits = if metadata.permissions().readonly() {
            0o444
        } else {
            0o666
        };

        Self {
            mode: type_bits | perm_bits,
            nlink: 1,
            size: metadata.len(),
            atime: seconds(metadata.accessed()),
            mtime: seconds(metadata.modified()),
            ctime: seconds(metadata.created()),
            ..Self::default()
        }
    }
}

/// Flags accepted by path-level stat queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatFlags {
    /// Report on a symbolic link itself instead of its target
    pub link: bool,
    /// Return an empty record instead of propagating stat failures
    pub quiet: bool,
}

impl StatFlags {
    const LINK: i32 = 1;
    const QUIET: i32 = 2;

    /// Decode host flag bits (`1` link, `2` quiet)
    pub fn from_raw(flags: i32) -> Self {
        Self {
            link: flags & Self::LINK != 0,
            quiet: flags & Self::QUIET != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        assert!(Stat::empty().is_empty());
        assert!(!Stat::for_buffer(0).is_empty());
    }

    #[test]
    fn test_buffer_record() {
        let stat = Stat::for_buffer(12);
        assert!(stat.is_file());
        assert!(!stat.is_dir());
        assert_eq!(stat.size, 12);
        assert_eq!(stat.permissions(), 0o666);
    }

    #[test]
    fn test_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"12345").unwrap();

        let stat = Stat::from(&std::fs::metadata(&path).unwrap());
        assert!(stat.is_file());
        assert_eq!(stat.size, 5);

        let dir_stat = Stat::from(&std::fs::metadata(dir.path()).unwrap());
        assert!(dir_stat.is_dir());
    }

    #[test]
    fn test_stat_flags_from_raw() {
        assert_eq!(StatFlags::from_raw(0), StatFlags::default());
        let both = StatFlags::from_raw(3);
        assert!(both.link && both.quiet);
        assert!(StatFlags::from_raw(2).quiet);
    }
}
