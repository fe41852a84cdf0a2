//! Registry configuration.
//!
//! Defaults cover the common case; with the `config` feature the same
//! settings can be loaded from a TOML file.

use crate::error::{ProxyError, Result};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Settings applied when a [`Registry`](crate::Registry) is wired up
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ProxyConfig {
    /// Scheme name used in synthetic paths (`<scheme>://<identifier>`)
    pub scheme: String,
    /// Prefix for generated identifiers
    pub id_prefix: String,
    /// Spill size for [`SpooledHandle`](crate::handle::SpooledHandle)s created
    /// by the registry owner
    pub spool_threshold: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            scheme: "wrapper".to_string(),
            id_prefix: "res".to_string(),
            spool_threshold: 2 * 1024 * 1024,
        }
    }
}

impl ProxyConfig {
    /// Check that the scheme can appear in front of `://`
    pub fn validate(&self) -> Result<()> {
        if self.scheme.is_empty() {
            return Err(ProxyError::invalid_input("scheme must not be empty"));
        }
        let valid = self
            .scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            return Err(ProxyError::invalid_input(format!(
                "invalid scheme name: {}",
                self.scheme
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    #[cfg(feature = "config")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| ProxyError::invalid_input(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    #[cfg(feature = "config")]
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// `<config_dir>/pathproxy/config.toml`, when the platform has a config directory
    #[cfg(feature = "config")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pathproxy").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProxyConfig::default();
        assert_eq!(config.scheme, "wrapper");
        assert_eq!(config.spool_threshold, 2 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_schemes() {
        for scheme in ["", "with space", "a:b", "x/y"] {
            let config = ProxyConfig {
                scheme: scheme.to_string(),
                ..ProxyConfig::default()
            };
            assert!(config.validate().is_err(), "scheme {:?} accepted", scheme);
        }

        let config = ProxyConfig {
            scheme: "mem+buf.v1-x".to_string(),
            ..ProxyConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_toml_str() {
        let config = ProxyConfig::from_toml_str("scheme = \"buffer\"\n").unwrap();
        assert_eq!(config.scheme, "buffer");
        assert_eq!(config.id_prefix, "res");

        assert!(ProxyConfig::from_toml_str("scheme = \"\"\n").is_err());
        assert!(ProxyConfig::from_toml_str("scheme = 5\n").is_err());
    }
}
