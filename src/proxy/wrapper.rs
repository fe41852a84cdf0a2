//! Stream wrapper installed for a registry's scheme.

use crate::error::{ProxyError, Result};
use crate::handle::{MetadataChange, OpenMode, SharedHandle, Stat, StatFlags};
use crate::proxy::adapter::ProxyAdapter;
use crate::registry::{Identifier, Registry};
use crate::scheme::{Stream, StreamWrapper};
use log::warn;
use std::io;
use std::sync::{Arc, Weak};

/// Factory producing one [`ProxyAdapter`] per open
///
/// Holds the registry weakly: the scheme table must not keep a registry
/// alive after its owner has dropped it. Paths opened after that resolve to
/// `NotFound`, and the table may replace the wrapper with a live one.
#[derive(Debug, Clone)]
pub struct ProxyWrapper {
    registry: Weak<Registry>,
}

impl ProxyWrapper {
    pub fn new(registry: Weak<Registry>) -> Self {
        Self { registry }
    }

    fn registry(&self, path: &str) -> Result<Arc<Registry>> {
        self.registry
            .upgrade()
            .ok_or_else(|| ProxyError::not_found(path))
    }

    /// Resolve `path` afresh, independent of any open adapter
    fn resolve(&self, path: &str) -> Result<(Identifier, SharedHandle)> {
        self.registry(path)?.resolve_path(path)
    }
}

impl StreamWrapper for ProxyWrapper {
    fn open(&self, path: &str, mode: OpenMode) -> Result<Box<dyn Stream>> {
        let registry = self.registry(path)?;
        Ok(Box::new(ProxyAdapter::open(&registry, path, mode)?))
    }

    /// Delete the real file behind the handle
    ///
    /// Handles without a real location report `false`. The registry entry is
    /// left alone; the handle itself stays open.
    fn unlink(&self, path: &str) -> Result<bool> {
        let (id, handle) = self.resolve(path)?;
        match handle.real_path() {
            Some(real) => {
                std::fs::remove_file(real)?;
                Ok(true)
            }
            None => {
                warn!("cannot unlink '{}': handle has no real location", id);
                Ok(false)
            }
        }
    }

    /// Metadata for the handle behind `path`
    ///
    /// Handles without a real location are asked directly. Otherwise the real
    /// location is stat'ed, or lstat'ed when `flags.link` is set and it is a
    /// symbolic link. With `flags.quiet`, a failing stat yields an empty
    /// record; a failing resolution is still reported.
    fn url_stat(&self, path: &str, flags: StatFlags) -> Result<Stat> {
        let (_, handle) = self.resolve(path)?;

        let stat = match handle.real_path() {
            None => handle.stat(),
            Some(real) => stat_real_path(&real, flags.link),
        };

        match stat {
            Ok(stat) => Ok(stat),
            Err(_) if flags.quiet => Ok(Stat::empty()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a metadata change to the handle's real location
    ///
    /// The OS result is reported as-is. Handles without a real location
    /// report `false`.
    fn set_metadata(&self, path: &str, change: &MetadataChange) -> Result<bool> {
        let (id, handle) = self.resolve(path)?;
        match handle.real_path() {
            Some(real) => {
                change.apply(&real)?;
                Ok(true)
            }
            None => {
                warn!(
                    "cannot apply {:?} to '{}': handle has no real location",
                    change, id
                );
                Ok(false)
            }
        }
    }

    fn is_live(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

fn stat_real_path(path: &std::path::Path, follow_link_flag: bool) -> io::Result<Stat> {
    if follow_link_flag {
        let link_metadata = std::fs::symlink_metadata(path)?;
        if link_metadata.file_type().is_symlink() {
            return Ok(Stat::from(&link_metadata));
        }
    }
    Ok(Stat::from(&std::fs::metadata(path)?))
}
