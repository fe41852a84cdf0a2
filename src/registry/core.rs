//! The handle registry.
//!
//! A [`Registry`] maps identifiers to live handles. It is an explicit object,
//! owned by whoever wires the system together and shared through an `Arc`;
//! nothing in the crate keeps a hidden global instance.

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};
use crate::handle::capability::{same_handle, SharedHandle};
use crate::proxy::ProxyWrapper;
use crate::registry::identifier::Identifier;
use crate::registry::path::SyntheticPath;
use crate::scheme::SchemeTable;
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Key accepted by [`Registry::remove`]: a handle (matched by identity) or an identifier
#[derive(Clone, Copy)]
pub enum RemovalKey<'a> {
    Handle(&'a SharedHandle),
    Identifier(&'a str),
}

impl<'a> From<&'a SharedHandle> for RemovalKey<'a> {
    fn from(handle: &'a SharedHandle) -> Self {
        Self::Handle(handle)
    }
}

impl<'a> From<&'a str> for RemovalKey<'a> {
    fn from(id: &'a str) -> Self {
        Self::Identifier(id)
    }
}

impl<'a> From<&'a Identifier> for RemovalKey<'a> {
    fn from(id: &'a Identifier) -> Self {
        Self::Identifier(id.as_str())
    }
}

/// Identifier → handle table
///
/// The registry holds references only; handles stay owned by whoever created
/// them. The scheme wrapper is installed into the [`SchemeTable`] on the first
/// registration.
pub struct Registry {
    config: ProxyConfig,
    table: Arc<SchemeTable>,
    entries: RwLock<HashMap<Identifier, SharedHandle>>,
    installed: AtomicBool,
}

impl Registry {
    /// Create a registry with the default configuration (`wrapper://` paths)
    pub fn new(table: Arc<SchemeTable>) -> Arc<Self> {
        Arc::new(Self::build(table, ProxyConfig::default()))
    }

    /// Create a registry with an explicit configuration
    ///
    /// # Errors
    /// * `InvalidInput` when the configured scheme is not a valid scheme name
    pub fn with_config(table: Arc<SchemeTable>, config: ProxyConfig) -> Result<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self::build(table, config)))
    }

    fn build(table: Arc<SchemeTable>, config: ProxyConfig) -> Self {
        Self {
            config,
            table,
            entries: RwLock::new(HashMap::new()),
            installed: AtomicBool::new(false),
        }
    }

    /// Register a live handle
    ///
    /// # Arguments
    /// * `handle` - Handle to expose
    /// * `id` - Identifier to use; a fresh one is generated when `None`
    ///
    /// # Errors
    /// * `InvalidInput` when the handle is closed or `id` is already registered
    pub fn register(
        self: &Arc<Self>,
        handle: SharedHandle,
        id: Option<Identifier>,
    ) -> Result<Identifier> {
        if !handle.is_open() {
            return Err(ProxyError::invalid_input(
                "cannot register a handle that is not open",
            ));
        }

        let id = {
            let mut entries = self.entries.write();
            let id = match id {
                Some(id) => {
                    if entries.contains_key(&id) {
                        return Err(ProxyError::invalid_input(format!(
                            "identifier already registered: {}",
                            id
                        )));
                    }
                    id
                }
                None => loop {
                    let candidate = Identifier::generate(&self.config.id_prefix);
                    if !entries.contains_key(&candidate) {
                        break candidate;
                    }
                },
            };
            entries.insert(id.clone(), handle);
            id
        };

        debug!("registered handle under '{}'", id);
        self.ensure_installed();
        Ok(id)
    }

    /// Register a handle and return the synthetic path that addresses it
    pub fn register_with_path(
        self: &Arc<Self>,
        handle: SharedHandle,
        id: Option<Identifier>,
    ) -> Result<SyntheticPath> {
        let id = self.register(handle, id)?;
        Ok(self.path_for(id))
    }

    fn ensure_installed(self: &Arc<Self>) {
        if self
            .installed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let wrapper = Arc::new(ProxyWrapper::new(Arc::downgrade(self)));
        if !self.table.install(&self.config.scheme, wrapper) {
            warn!(
                "scheme '{}' already served by a live wrapper; keeping it",
                self.config.scheme
            );
        }
    }

    /// Look up the handle registered under `id`
    ///
    /// # Errors
    /// * `NotFound` when nothing is registered under `id`
    pub fn resolve(&self, id: &str) -> Result<SharedHandle> {
        match self.entries.read().get(id) {
            Some(handle) => Ok(Arc::clone(handle)),
            None => {
                debug!("no handle registered under '{}'", id);
                Err(ProxyError::not_found(id))
            }
        }
    }

    /// Resolve the identifier embedded in a synthetic path of this registry's scheme
    pub fn resolve_path(&self, path: &str) -> Result<(Identifier, SharedHandle)> {
        let id = self.parse_path(path)?;
        let handle = self.resolve(id.as_str())?;
        Ok((id, handle))
    }

    /// Remove an entry by handle identity or by identifier
    ///
    /// # Returns
    /// * `true` when an entry was removed
    pub fn remove<'a>(&self, key: impl Into<RemovalKey<'a>>) -> bool {
        let mut entries = self.entries.write();
        let id = match key.into() {
            RemovalKey::Identifier(id) => entries.contains_key(id).then(|| id.to_string()),
            RemovalKey::Handle(handle) => entries
                .iter()
                .find(|(_, registered)| same_handle(registered, handle))
                .map(|(id, _)| id.as_str().to_string()),
        };

        match id.and_then(|id| entries.remove_entry(id.as_str())) {
            Some((id, _)) => {
                debug!("removed handle registered under '{}'", id);
                true
            }
            None => false,
        }
    }

    /// Remove the entry under `id` only while it still holds `handle`
    ///
    /// A handle may be registered under several identifiers, and an
    /// identifier may be reused for a different handle after removal; neither
    /// of those other entries is touched.
    pub fn remove_binding(&self, id: &str, handle: &SharedHandle) -> bool {
        let mut entries = self.entries.write();
        let bound = entries
            .get(id)
            .map_or(false, |registered| same_handle(registered, handle));
        if bound {
            entries.remove(id);
            debug!("removed handle registered under '{}'", id);
        }
        bound
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Scheme used in this registry's synthetic paths
    pub fn scheme(&self) -> &str {
        &self.config.scheme
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Scheme table the wrapper is installed into
    pub fn table(&self) -> &Arc<SchemeTable> {
        &self.table
    }

    /// Synthetic path addressing `id`
    pub fn path_for(&self, id: Identifier) -> SyntheticPath {
        SyntheticPath::new(self.config.scheme.clone(), id)
    }

    /// Extract the identifier from a synthetic path of this registry's scheme
    pub fn parse_path(&self, path: &str) -> Result<Identifier> {
        SyntheticPath::parse(&self.config.scheme, path).map(SyntheticPath::into_identifier)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("scheme", &self.config.scheme)
            .field("entries", &self.len())
            .field("installed", &self.installed.load(Ordering::Acquire))
            .finish()
    }
}
