//! Structural tree errors

/// Errors raised while reading an element tree
///
/// These are structural: the caller aborts the offending subtree and decides
/// whether the rest of the document can still be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Required attribute absent
    #[error("missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// Attribute present but not parseable
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
        /// Raw value
        value: String,
    },

    /// Wrong element where a specific one was required
    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement {
        /// Expected element name
        expected: String,
        /// Actual element name
        found: String,
    },

    /// Singleton section appeared twice
    #[error("duplicate <{0}> section")]
    DuplicateSection(String),
}
