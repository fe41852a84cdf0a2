//! # pathproxy - Path Addressing for In-Process Handles
//!
//! Some APIs only accept a path. pathproxy lets such an API operate on an
//! already open, caller-owned resource (a file, a memory buffer, a spooled
//! temp buffer) by registering the resource under a synthetic
//! `wrapper://<identifier>` path and forwarding every operation made on that
//! path back to the resource.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error type; handle failures pass through untranslated
//! - [`handle`] - The [`Handle`] capability trait and the shipped handles
//! - [`registry`] - Identifier → handle table and synthetic path addressing
//! - [`scheme`] - The pluggable path-resolution table path-based consumers open through
//! - [`proxy`] - Per-open adapter forwarding stream operations to a bound handle
//! - [`xml`] - A small path-only consumer exercising the whole chain
//! - [`config`] - Registry configuration
//!
//! ## Example
//!
//! ```
//! use pathproxy::handle::MemoryHandle;
//! use pathproxy::registry::Identifier;
//! use pathproxy::{Registry, SchemeTable};
//! use std::sync::Arc;
//!
//! let table = Arc::new(SchemeTable::new());
//! let registry = Registry::new(Arc::clone(&table));
//!
//! let buffer = Arc::new(MemoryHandle::new());
//! let path = registry
//!     .register_with_path(buffer.clone(), Some(Identifier::new("foo").unwrap()))
//!     .unwrap();
//! assert_eq!(path.to_string(), "wrapper://foo");
//!
//! let root = pathproxy::xml::Element::new("a").unwrap().text("1");
//! pathproxy::xml::write_document(&table, &path.to_string(), &root).unwrap();
//! assert_eq!(buffer.contents(), b"<a>1</a>");
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod proxy;
pub mod registry;
pub mod scheme;
pub mod xml;

// Re-export commonly used types for convenience
pub use config::ProxyConfig;
pub use error::{ProxyError, Result};
pub use handle::{Handle, SharedHandle};
pub use proxy::{ProxyAdapter, ProxyWrapper};
pub use registry::{Identifier, Registry, SyntheticPath};
pub use scheme::{SchemeTable, Stream, StreamWrapper};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
