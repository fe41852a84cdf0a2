//! Registry identifiers and the collision-free default generator.

use crate::error::{ProxyError, Result};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Process-wide sequence; guarantees distinct generated ids within one process
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Token naming a registered handle; the variable segment of a synthetic path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a caller-supplied identifier. Empty identifiers are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ProxyError::invalid_input("identifier must not be empty"));
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier of the form `<prefix>-<sequence>-<random>`
    ///
    /// The sequence component differs for every call in the process, so ids
    /// generated in the same instant never collide; the random component keeps
    /// ids from different processes apart.
    pub fn generate(prefix: &str) -> Self {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{}-{:x}-{}", prefix, sequence, &random[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Identifier {
    type Error = ProxyError;

    fn try_from(id: &str) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ProxyError;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_rejects_empty() {
        assert!(Identifier::new("").is_err());
        assert_eq!(Identifier::new("foo").unwrap().as_str(), "foo");
    }

    #[test]
    fn test_generated_ids_are_distinct_in_tight_loop() {
        let ids: HashSet<Identifier> = (0..10_000).map(|_| Identifier::generate("res")).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_generated_ids_are_distinct_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..500)
                        .map(|_| Identifier::generate("t"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id));
            }
        }
        assert_eq!(ids.len(), 4_000);
    }

    #[test]
    fn test_generated_id_shape() {
        let id = Identifier::generate("buf");
        assert!(id.as_str().starts_with("buf-"));
        assert_eq!(id.as_str().split('-').count(), 3);
    }
}
