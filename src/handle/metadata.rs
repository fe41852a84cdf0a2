//! Metadata changes applied to a handle's real location.
//!
//! These are host filesystem primitives (touch, chown, chgrp, chmod). They act
//! on a path, never on an open handle, and report the OS failure untouched.

use std::fs::{File, FileTimes};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// User or group reference accepted by ownership changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Id(u32),
    Name(String),
}

/// Metadata change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataChange {
    /// Create the file if missing, then set its times.
    /// A missing `mtime` means now; a missing `atime` means `mtime`.
    Touch {
        mtime: Option<SystemTime>,
        atime: Option<SystemTime>,
    },
    Owner(Principal),
    Group(Principal),
    /// Permission bits
    Mode(u32),
}

impl MetadataChange {
    /// Apply the change to `path`
    pub fn apply(&self, path: &Path) -> io::Result<()> {
        match self {
            Self::Touch { mtime, atime } => touch(path, *mtime, *atime),
            Self::Owner(user) => change_owner(path, Some(user), None),
            Self::Group(group) => change_owner(path, None, Some(group)),
            Self::Mode(mode) => change_mode(path, *mode),
        }
    }
}

fn touch(path: &Path, mtime: Option<SystemTime>, atime: Option<SystemTime>) -> io::Result<()> {
    if !path.exists() {
        File::create(path)?;
    }
    let mtime = mtime.unwrap_or_else(SystemTime::now);
    let atime = atime.unwrap_or(mtime);
    let times = FileTimes::new().set_modified(mtime).set_accessed(atime);
    File::open(path)?.set_times(times)
}

#[cfg(unix)]
fn change_owner(
    path: &Path,
    user: Option<&Principal>,
    group: Option<&Principal>,
) -> io::Result<()> {
    let uid = user.map(resolve_user).transpose()?;
    let gid = group.map(resolve_group).transpose()?;
    std::os::unix::fs::chown(path, uid, gid)
}

#[cfg(not(unix))]
fn change_owner(
    _path: &Path,
    _user: Option<&Principal>,
    _group: Option<&Principal>,
) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "ownership changes are not supported on this platform",
    ))
}

#[cfg(unix)]
fn resolve_user(principal: &Principal) -> io::Result<u32> {
    match principal {
        Principal::Id(uid) => Ok(*uid),
        Principal::Name(name) => nix::unistd::User::from_name(name)?
            .map(|user| user.uid.as_raw())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("unknown user: {}", name))
            }),
    }
}

#[cfg(unix)]
fn resolve_group(principal: &Principal) -> io::Result<u32> {
    match principal {
        Principal::Id(gid) => Ok(*gid),
        Principal::Name(name) => nix::unistd::Group::from_name(name)?
            .map(|group| group.gid.as_raw())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("unknown group: {}", name))
            }),
    }
}

#[cfg(unix)]
fn change_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn change_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    std::fs::set_permissions(path, permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_touch_creates_and_sets_times() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touched");
        let mtime = UNIX_EPOCH + Duration::from_secs(1_000_000);

        MetadataChange::Touch {
            mtime: Some(mtime),
            atime: None,
        }
        .apply(&path)
        .unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 0);
        assert_eq!(metadata.modified().unwrap(), mtime);
        assert_eq!(metadata.accessed().unwrap(), mtime);
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_change() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"x").unwrap();

        MetadataChange::Mode(0o600).apply(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_owner_change_to_current_owner() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"x").unwrap();
        let metadata = std::fs::metadata(&path).unwrap();

        MetadataChange::Owner(Principal::Id(metadata.uid()))
            .apply(&path)
            .unwrap();
        MetadataChange::Group(Principal::Id(metadata.gid()))
            .apply(&path)
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unknown_user_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, b"x").unwrap();

        let err = MetadataChange::Owner(Principal::Name("no-such-user-pathproxy".into()))
            .apply(&path)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mode_change_on_missing_path_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetadataChange::Mode(0o644)
            .apply(&dir.path().join("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
