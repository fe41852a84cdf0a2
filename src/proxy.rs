//! Proxying layer between path-based consumers and registered handles.
//!
//! - [`ProxyWrapper`] is installed into the scheme table for the registry's
//!   scheme. It creates one [`ProxyAdapter`] per open and answers the
//!   path-level calls (unlink, stat, metadata changes).
//! - [`ProxyAdapter`] binds a single handle for its lifetime and forwards every
//!   stream operation to it.

pub mod adapter;
pub mod wrapper;

pub use adapter::ProxyAdapter;
pub use wrapper::ProxyWrapper;
