//! Configuration load errors

use crate::names::ListError;
use arb_tree::{SchemaVersion, TreeError};

/// Errors loading configuration entities from a tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// Structural problem in the tree
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Entity named with the wildcard literal
    #[error("'{name}' is reserved and cannot name a {kind}")]
    ReservedName {
        /// Entity kind
        kind: &'static str,
        /// Offending name
        name: String,
    },

    /// Entity with an empty name
    #[error("{kind} has an empty name")]
    EmptyName {
        /// Entity kind
        kind: &'static str,
    },

    /// Enumerated attribute with an unrecognized value
    #[error("unknown {kind} '{value}'")]
    UnknownValue {
        /// Attribute kind
        kind: &'static str,
        /// Raw value
        value: String,
    },

    /// Duplicate or otherwise rejected list entry
    #[error("{kind}: {source}")]
    List {
        /// Entity kind
        kind: &'static str,
        /// Underlying list failure
        source: ListError,
    },
}

impl LoadError {
    /// Wrap a list failure with the entity kind
    #[inline]
    #[must_use]
    pub fn list(kind: &'static str, source: ListError) -> Self {
        Self::List { kind, source }
    }
}

/// Errors loading a whole configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Root element could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Document written by a newer schema than this library understands
    #[error("document version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version recorded in the document
        found: SchemaVersion,
        /// Newest version this library reads
        supported: SchemaVersion,
    },
}
