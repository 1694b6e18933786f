//! Error types for the record book
//!
//! Structural failures abort the subtree being read. Unknown references are
//! reported through the callback and the offending record is dropped; they
//! only become errors here so loaders can format them uniformly.

use arb_config::{ConfigError, LoadError};
use arb_scoring::ScoringError;
use arb_tree::TreeError;

/// Main record-book error type
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Malformed history or configuration entity
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration section could not be loaded
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    /// Scoring lookup failed
    #[error("scoring: {0}")]
    Scoring(#[from] ScoringError),

    /// Record names something the configuration lacks
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// What was referenced
        kind: &'static str,
        /// Referenced name, slash-joined for compound keys
        name: String,
    },

    /// Required top-level section absent
    #[error("missing <{0}> section")]
    MissingSection(&'static str),

    /// Settings text could not be parsed
    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// Settings file could not be read
    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
}

impl BookError {
    /// Unknown-reference error for a compound name
    #[must_use]
    pub fn unknown<S: AsRef<str>>(kind: &'static str, parts: &[S]) -> Self {
        let parts: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
        Self::UnknownReference {
            kind,
            name: parts.join("/"),
        }
    }

    /// Check if the error only rejects one record
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UnknownReference { .. } | Self::Scoring(_))
    }
}

impl From<TreeError> for BookError {
    fn from(err: TreeError) -> Self {
        Self::Load(LoadError::Tree(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_reference_display() {
        let err = BookError::unknown("event", &["AKC", "Open", "Novice", "Snooker"]);
        assert_eq!(err.to_string(), "unknown event 'AKC/Open/Novice/Snooker'");
        assert!(err.is_rejection());
    }

    #[test]
    fn structural_errors_are_not_rejections() {
        let err = BookError::from(TreeError::DuplicateSection("Configuration".into()));
        assert!(!err.is_rejection());
        assert_eq!(err.to_string(), "duplicate <Configuration> section");
    }
}
