//! Shared plumbing for loading recorded history

use crate::error::BookError;
use arb_config::Configuration;
use arb_tree::{Element, ErrorCallback, SchemaVersion};

/// State threaded through every history loader
///
/// Records are checked against `config`; a record naming something the
/// configuration lacks is logged and dropped.
pub struct HistoryContext<'a> {
    config: &'a Configuration,
    version: SchemaVersion,
    reject_unknown: bool,
    callback: &'a mut dyn ErrorCallback,
}

impl<'a> HistoryContext<'a> {
    /// Create a context that rejects unknown references
    #[inline]
    pub fn new(
        config: &'a Configuration,
        version: SchemaVersion,
        callback: &'a mut dyn ErrorCallback,
    ) -> Self {
        Self {
            config,
            version,
            reject_unknown: true,
            callback,
        }
    }

    /// Keep records whose names the configuration does not know
    #[inline]
    #[must_use]
    pub fn with_reject_unknown(mut self, reject: bool) -> Self {
        self.reject_unknown = reject;
        self
    }

    /// Configuration records are checked against
    #[inline]
    #[must_use]
    pub fn config(&self) -> &'a Configuration {
        self.config
    }

    /// Document schema version
    #[inline]
    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Whether unknown references drop the record
    #[inline]
    #[must_use]
    pub fn rejects_unknown(&self) -> bool {
        self.reject_unknown
    }

    /// Report a non-fatal problem
    pub fn log(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.callback.log(message);
    }

    /// Load every `name` child of `tree`, logging and skipping failures
    pub(crate) fn load_each<T>(
        &mut self,
        tree: &Element,
        name: &str,
        what: &str,
        mut load: impl FnMut(&Element, &mut Self) -> Result<T, BookError>,
    ) -> Vec<T> {
        let mut loaded = Vec::new();
        for child in tree.elements_named(name) {
            match load(child, self) {
                Ok(item) => loaded.push(item),
                Err(e) => self.log(&format!("{what}: {e}")),
            }
        }
        loaded
    }
}

impl std::fmt::Debug for HistoryContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryContext")
            .field("version", &self.version)
            .field("reject_unknown", &self.reject_unknown)
            .finish_non_exhaustive()
    }
}

/// Save an optional string attribute only when non-empty
pub(crate) fn add_if_not_empty(element: &mut Element, attr: &str, value: &str) {
    if !value.is_empty() {
        element.add_attr(attr, value);
    }
}

/// Append a text-only child only when the text is non-empty
pub(crate) fn add_text_if_not_empty(element: &mut Element, name: &str, text: &str) {
    if !text.is_empty() {
        element.add_text_child(name, text);
    }
}

/// Text of the first `name` child, or empty
pub(crate) fn child_text(tree: &Element, name: &str) -> String {
    tree.first_named(name).map(Element::text).unwrap_or_default()
}
