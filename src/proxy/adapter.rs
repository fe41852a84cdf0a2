//! Per-open proxy forwarding stream operations to a bound handle.

use crate::error::Result;
use crate::handle::{LockOperation, OpenMode, SharedHandle, Stat, StreamOption, Whence};
use crate::registry::{Identifier, Registry};
use crate::scheme::Stream;
use log::debug;
use std::sync::{Arc, Weak};

/// Stream bound to one registered handle
///
/// An adapter only exists in the open state: [`ProxyAdapter::open`] is the
/// sole constructor and [`Stream::close`] consumes it, so no operation can
/// reach an unopened or closed adapter. Every result and error is the
/// handle's own.
#[derive(Debug)]
pub struct ProxyAdapter {
    registry: Weak<Registry>,
    identifier: Identifier,
    handle: SharedHandle,
    mode: OpenMode,
}

impl ProxyAdapter {
    /// Resolve the identifier embedded in `path` and bind its handle
    ///
    /// The mode is recorded but the handle is never reopened; it keeps
    /// whatever access it was created with.
    ///
    /// # Errors
    /// * `NotFound` when the path does not name a registered identifier
    pub fn open(registry: &Arc<Registry>, path: &str, mode: OpenMode) -> Result<Self> {
        let (identifier, handle) = registry.resolve_path(path)?;
        debug!("opened proxy for '{}'", identifier);
        Ok(Self {
            registry: Arc::downgrade(registry),
            identifier,
            handle,
            mode,
        })
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn handle(&self) -> &SharedHandle {
        &self.handle
    }

    /// Mode the path was opened with
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Forward a raw host option call
    ///
    /// Combinations that do not decode to a [`StreamOption`] report `false`
    /// without reaching the handle.
    pub fn set_option_raw(&mut self, option: i32, arg1: i64, arg2: Option<i64>) -> Result<bool> {
        match StreamOption::from_raw(option, arg1, arg2) {
            Some(option) => self.set_option(option),
            None => Ok(false),
        }
    }
}

impl Stream for ProxyAdapter {
    fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        Ok(self.handle.read(count)?)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.handle.write(data)?)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<bool> {
        match whence.seek_from(offset) {
            Some(pos) => {
                self.handle.seek(pos)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.handle.tell()?)
    }

    fn eof(&mut self) -> bool {
        self.handle.eof()
    }

    fn flush(&mut self) -> Result<bool> {
        Ok(self.handle.flush()?)
    }

    fn lock(&mut self, operation: LockOperation) -> Result<bool> {
        Ok(self.handle.lock(operation)?)
    }

    fn truncate(&mut self, size: u64) -> Result<bool> {
        Ok(self.handle.truncate(size)?)
    }

    fn set_option(&mut self, option: StreamOption) -> Result<bool> {
        Ok(self.handle.set_option(option)?)
    }

    fn stat(&mut self) -> Result<Stat> {
        Ok(self.handle.stat()?)
    }

    /// Close the bound handle and drop its registry entry
    ///
    /// The entry is removed even when the close itself fails, so a broken
    /// handle cannot be reopened through its identifier.
    fn close(self: Box<Self>) -> Result<bool> {
        let closed = self.handle.close();
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_binding(self.identifier.as_str(), &self.handle);
        }
        debug!("closed proxy for '{}'", self.identifier);
        Ok(closed?)
    }
}
