#![forbid(unsafe_code)]

//! Configuration for [`UndoHistory`](crate::UndoHistory).
//!
//! With the `config` feature the configuration can be loaded from TOML:
//!
//! ```toml
//! # vsvim-undo.toml
//! max_depth = 1000
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("vsvim-undo.toml")?;
//! ```
//!
//! Missing keys fall back to [`HistoryConfig::default`], which keeps the
//! undo stack unbounded.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits applied by an undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of transactions kept on the undo stack. The oldest
    /// entry is evicted when a push exceeds it.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl HistoryConfig {
    /// Create a configuration with a bounded undo stack.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No depth limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_depth == 0 {
            errors.push("max_depth must be > 0".into());
        }
        errors
    }

    /// Load from a TOML string and validate it.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML file on disk and validate it.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// Errors from loading a [`HistoryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("failed to read history config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("failed to parse history config: {0}")]
    Toml(#[from] toml::de::Error),
    /// Validation errors.
    #[error("invalid history config: {}", .0.join("; "))]
    Validation(Vec<String>),
}
