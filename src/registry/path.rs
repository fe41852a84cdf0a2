//! Synthetic `<scheme>://<identifier>` paths.
//!
//! Parsing strips a fixed-length prefix instead of searching for a
//! delimiter, so identifiers that themselves contain `://` or `/` survive
//! the round trip.

use crate::error::{ProxyError, Result};
use crate::registry::identifier::Identifier;
use std::fmt;

/// Separator between scheme and identifier
pub const SEPARATOR: &str = "://";

/// Path addressing a registered handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntheticPath {
    scheme: String,
    identifier: Identifier,
}

impl SyntheticPath {
    pub fn new(scheme: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            scheme: scheme.into(),
            identifier,
        }
    }

    /// The fixed prefix `<scheme>://` for a scheme
    pub fn prefix(scheme: &str) -> String {
        format!("{}{}", scheme, SEPARATOR)
    }

    /// Extract the identifier from `path` by skipping exactly the prefix length
    ///
    /// # Errors
    /// * `NotFound` when the path does not start with this scheme's prefix or
    ///   nothing follows it
    pub fn parse(scheme: &str, path: &str) -> Result<Self> {
        let prefix_len = scheme.len() + SEPARATOR.len();
        let matches_prefix = path
            .get(..prefix_len)
            .map_or(false, |head| head == Self::prefix(scheme));
        let rest = if matches_prefix {
            path.get(prefix_len..).unwrap_or_default()
        } else {
            ""
        };
        if rest.is_empty() {
            return Err(ProxyError::not_found(path));
        }

        Ok(Self::new(scheme, Identifier::new(rest)?))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn into_identifier(self) -> Identifier {
        self.identifier
    }
}

impl fmt::Display for SyntheticPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scheme, SEPARATOR, self.identifier)
    }
}
