//! The host's pluggable path-resolution mechanism.
//!
//! Path-based consumers never see handles or registries. They hand a path
//! string to a [`SchemeTable`], which dispatches on the scheme to whichever
//! [`StreamWrapper`] was installed for it and returns a [`Stream`].

pub mod stream;
pub mod table;

pub use stream::{Stream, StreamWrapper};
pub use table::{split_scheme, SchemeTable};
