//! Scheme name → wrapper table.

use crate::error::{ProxyError, Result};
use crate::handle::{MetadataChange, OpenMode, Stat, StatFlags};
use crate::registry::path::SEPARATOR;
use crate::scheme::stream::{Stream, StreamWrapper};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Scheme of `path`: everything before the first `://`, if non-empty
pub fn split_scheme(path: &str) -> Option<&str> {
    path.find(SEPARATOR)
        .map(|idx| &path[..idx])
        .filter(|scheme| !scheme.is_empty())
}

/// Table of installed stream wrappers
///
/// Shared by every registry that installs into it and by every consumer that
/// opens paths through it.
#[derive(Default)]
pub struct SchemeTable {
    wrappers: RwLock<HashMap<String, Arc<dyn StreamWrapper>>>,
}

impl SchemeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `wrapper` for `scheme`
    ///
    /// # Returns
    /// * `true` when the scheme was newly installed, or when it replaced a
    ///   wrapper that is no longer live
    /// * `false` when a live wrapper already serves it; the existing one is kept
    pub fn install(&self, scheme: &str, wrapper: Arc<dyn StreamWrapper>) -> bool {
        let mut wrappers = self.wrappers.write();
        match wrappers.get(scheme) {
            Some(existing) if existing.is_live() => return false,
            Some(_) => debug!("replacing dead stream wrapper for scheme '{}'", scheme),
            None => debug!("installed stream wrapper for scheme '{}'", scheme),
        }
        wrappers.insert(scheme.to_string(), wrapper);
        true
    }

    pub fn uninstall(&self, scheme: &str) -> bool {
        let removed = self.wrappers.write().remove(scheme).is_some();
        if removed {
            debug!("uninstalled stream wrapper for scheme '{}'", scheme);
        }
        removed
    }

    pub fn is_installed(&self, scheme: &str) -> bool {
        self.wrappers.read().contains_key(scheme)
    }

    /// Installed scheme names, sorted
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.wrappers.read().keys().cloned().collect();
        schemes.sort();
        schemes
    }

    fn wrapper_for(&self, path: &str) -> Result<Arc<dyn StreamWrapper>> {
        let scheme = split_scheme(path).ok_or_else(|| ProxyError::unknown_scheme(path))?;
        self.wrappers
            .read()
            .get(scheme)
            .cloned()
            .ok_or_else(|| ProxyError::unknown_scheme(path))
    }

    /// Open `path` with a conventional mode string (`"r"`, `"w+"`, ...)
    pub fn open(&self, path: &str, mode: &str) -> Result<Box<dyn Stream>> {
        let mode = OpenMode::parse(mode)?;
        self.wrapper_for(path)?.open(path, mode)
    }

    pub fn unlink(&self, path: &str) -> Result<bool> {
        self.wrapper_for(path)?.unlink(path)
    }

    pub fn url_stat(&self, path: &str, flags: StatFlags) -> Result<Stat> {
        self.wrapper_for(path)?.url_stat(path, flags)
    }

    pub fn set_metadata(&self, path: &str, change: &MetadataChange) -> Result<bool> {
        self.wrapper_for(path)?.set_metadata(path, change)
    }
}

impl fmt::Debug for SchemeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeTable")
            .field("schemes", &self.schemes())
            .finish()
    }
}
