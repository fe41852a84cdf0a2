//! Identifier → handle registry and synthetic path addressing.

pub mod core;
pub mod identifier;
pub mod path;

pub use self::core::{Registry, RemovalKey};
pub use identifier::Identifier;
pub use path::SyntheticPath;
