//! Handle capability abstraction and the concrete handles shipped with the crate.
//!
//! A handle is any open, externally owned byte resource. The proxy layer only
//! ever talks to the [`Handle`] trait, so files, memory buffers and spooled
//! temp buffers are interchangeable once registered.

pub mod capability;
pub mod file;
pub mod memory;
pub mod metadata;
pub mod options;
pub mod spooled;
pub mod stat;

pub use capability::{same_handle, Handle, SharedHandle};
pub use file::FileHandle;
pub use memory::MemoryHandle;
pub use metadata::{MetadataChange, Principal};
pub use options::{BufferMode, LockMode, LockOperation, OpenMode, StreamOption, Whence};
pub use spooled::SpooledHandle;
pub use stat::{Stat, StatFlags};
