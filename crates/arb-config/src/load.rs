//! Shared load plumbing

use crate::error::LoadError;
use crate::match_key::WILDCARD;
use arb_tree::{Element, ErrorCallback, SchemaVersion};

/// State threaded through every entity loader
pub struct LoadContext<'a> {
    version: SchemaVersion,
    callback: &'a mut dyn ErrorCallback,
}

impl<'a> LoadContext<'a> {
    /// Create a context for a document of the given version
    #[inline]
    pub fn new(version: SchemaVersion, callback: &'a mut dyn ErrorCallback) -> Self {
        Self { version, callback }
    }

    /// Document schema version
    #[inline]
    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Report a non-fatal problem
    pub fn log(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.callback.log(message);
    }

    /// Underlying callback
    #[inline]
    pub fn callback(&mut self) -> &mut dyn ErrorCallback {
        &mut *self.callback
    }
}

impl std::fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Check a real entity name: non-empty and never the wildcard literal
///
/// # Errors
/// Returns [`LoadError::EmptyName`] or [`LoadError::ReservedName`].
pub fn check_name(kind: &'static str, name: &str) -> Result<(), LoadError> {
    if name.is_empty() {
        Err(LoadError::EmptyName { kind })
    } else if name == WILDCARD {
        Err(LoadError::ReservedName {
            kind,
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Read and check a required name attribute
///
/// # Errors
/// Missing attribute, empty or reserved name.
pub fn required_name(
    element: &Element,
    attr: &str,
    kind: &'static str,
) -> Result<String, LoadError> {
    let name: String = element.require(attr)?;
    check_name(kind, &name)?;
    Ok(name)
}

/// Save an optional string attribute only when non-empty
pub(crate) fn add_if_not_empty(element: &mut Element, attr: &str, value: &str) {
    if !value.is_empty() {
        element.add_attr(attr, value);
    }
}
