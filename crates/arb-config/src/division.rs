//! Divisions

use crate::error::LoadError;
use crate::level::Level;
use crate::load::{required_name, LoadContext};
use crate::names::{Named, NamedList};
use crate::schema::{attr, element};
use arb_tree::Element;
use serde::{Deserialize, Serialize};

/// Competition division owning an ordered set of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Division {
    name: String,
    pub levels: NamedList<Level>,
}

impl Division {
    /// Create empty division
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: NamedList::new(),
        }
    }

    /// Level whose leaves include `leaf` (a leaf level or one of its sub-levels)
    #[must_use]
    pub fn find_level_by_leaf(&self, leaf: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.has_leaf(leaf))
    }

    /// Remove a sub-level from whichever level owns it
    pub fn delete_sub_level(&mut self, name: &str) -> bool {
        self.levels
            .iter_mut()
            .any(|level| level.sub_levels.delete(name))
    }

    /// Load from a `Division` element; bad levels are logged and skipped
    ///
    /// # Errors
    /// Missing/reserved division name.
    pub fn load(tree: &Element, ctx: &mut LoadContext<'_>) -> Result<Self, LoadError> {
        tree.expect_name(element::DIVISION)?;
        let mut division = Self::new(required_name(tree, attr::NAME, "division")?);
        for child in tree.elements_named(element::LEVEL) {
            match Level::load(child).and_then(|level| {
                division
                    .levels
                    .add(level)
                    .map(|_| ())
                    .map_err(|e| LoadError::list("level", e))
            }) {
                Ok(()) => {}
                Err(e) => ctx.log(&format!("division '{}': {e}", division.name)),
            }
        }
        Ok(division)
    }

    /// Append as a `Division` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::DIVISION);
        e.add_attr(attr::NAME, &self.name);
        for level in &self.levels {
            level.save(e);
        }
    }
}

impl Named for Division {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_tree::{MessageLog, SchemaVersion};

    #[test]
    fn bad_level_is_skipped_not_fatal() {
        let mut tree = Element::new(element::DIVISION);
        tree.add_attr(attr::NAME, "Open");
        tree.add_child(element::LEVEL).add_attr(attr::NAME, "Novice");
        tree.add_child(element::LEVEL).add_attr(attr::NAME, "*");

        let mut log = MessageLog::new();
        let mut ctx = LoadContext::new(SchemaVersion::CURRENT, &mut log);
        let div = Division::load(&tree, &mut ctx).unwrap();
        assert_eq!(div.levels.len(), 1);
        assert_eq!(log.messages().len(), 1);
    }

    #[test]
    fn sub_level_lookup_and_delete() {
        let mut div = Division::new("Open");
        div.levels
            .add(Level::new("Novice").with_sub_levels(&["A", "B"]).unwrap())
            .unwrap();
        assert_eq!(div.find_level_by_leaf("B").map(|l| l.name()), Some("Novice"));
        assert!(div.delete_sub_level("B"));
        assert!(div.find_level_by_leaf("B").is_none());
    }
}
