//! Run-time settings for loading and updating a record book
//!
//! ```
//! use arb_book::BookSettings;
//!
//! let settings = BookSettings::from_toml_str(r#"
//!     prune_orphaned_runs = false
//!     log_indent = 2
//! "#).unwrap();
//! assert!(!settings.prune_orphaned_runs);
//! assert!(settings.resync_multi_qs);
//! ```

use crate::error::BookError;
use crate::update::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record-book behavior switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BookSettings {
    /// Drop runs whose scoring no longer resolves after an update
    pub prune_orphaned_runs: bool,
    /// Recompute each day's multi-Qs after an update
    pub resync_multi_qs: bool,
    /// Drop history records naming things the configuration lacks
    pub reject_unknown_references: bool,
    /// Spaces per nesting level in the update log
    pub log_indent: usize,
}

impl Default for BookSettings {
    fn default() -> Self {
        Self {
            prune_orphaned_runs: true,
            resync_multi_qs: true,
            reject_unknown_references: true,
            log_indent: DEFAULT_INDENT,
        }
    }
}

impl BookSettings {
    /// Parse settings from TOML text; absent keys keep their defaults
    ///
    /// # Errors
    /// Malformed TOML or a value of the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, BookError> {
        Ok(toml::from_str(s)?)
    }

    /// Read settings from a TOML file
    ///
    /// # Errors
    /// Unreadable file or invalid contents.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub fn with_prune_orphaned_runs(mut self, prune: bool) -> Self {
        self.prune_orphaned_runs = prune;
        self
    }

    #[must_use]
    pub fn with_resync_multi_qs(mut self, resync: bool) -> Self {
        self.resync_multi_qs = resync;
        self
    }

    #[must_use]
    pub fn with_reject_unknown_references(mut self, reject: bool) -> Self {
        self.reject_unknown_references = reject;
        self
    }

    #[must_use]
    pub fn with_log_indent(mut self, indent: usize) -> Self {
        self.log_indent = indent;
        self
    }
}
