//! Levels and sub-levels

use crate::error::LoadError;
use crate::load::required_name;
use crate::names::{ListError, Named, NamedList};
use crate::schema::{attr, element};
use arb_tree::Element;
use serde::{Deserialize, Serialize};

/// Entry section of a split level (e.g. "Novice A")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubLevel {
    name: String,
}

impl SubLevel {
    /// Create sub-level
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Named for SubLevel {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// Competition level within a division
///
/// When sub-levels exist the level name is never a leaf match target; runs
/// record the sub-level name instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    name: String,
    pub sub_levels: NamedList<SubLevel>,
}

impl Level {
    /// Create leaf level
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_levels: NamedList::new(),
        }
    }

    /// Add sub-levels
    ///
    /// # Errors
    /// Empty or duplicate sub-level name.
    pub fn with_sub_levels(mut self, names: &[&str]) -> Result<Self, ListError> {
        for name in names {
            self.sub_levels.add(SubLevel::new(*name))?;
        }
        Ok(self)
    }

    /// Check if the level itself is a leaf
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sub_levels.is_empty()
    }

    /// Names a run may record for this level
    pub fn leaf_names(&self) -> Vec<&str> {
        if self.is_leaf() {
            vec![self.name.as_str()]
        } else {
            self.sub_levels.names().collect()
        }
    }

    /// Check if `name` is one of this level's leaves
    #[must_use]
    pub fn has_leaf(&self, name: &str) -> bool {
        if self.is_leaf() {
            self.name == name
        } else {
            self.sub_levels.contains(name)
        }
    }

    /// Load from a `Level` element
    ///
    /// # Errors
    /// Missing/reserved level or sub-level name, or duplicate sub-levels.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::LEVEL)?;
        let mut level = Self::new(required_name(tree, attr::NAME, "level")?);
        for sub in tree.elements_named(element::SUBLEVEL) {
            let name = required_name(sub, attr::NAME, "sub-level")?;
            level
                .sub_levels
                .add(SubLevel::new(name))
                .map_err(|e| LoadError::list("sub-level", e))?;
        }
        Ok(level)
    }

    /// Append as a `Level` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::LEVEL);
        e.add_attr(attr::NAME, &self.name);
        for sub in &self.sub_levels {
            e.add_child(element::SUBLEVEL).add_attr(attr::NAME, sub.name());
        }
    }
}

impl Named for Level {
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

    #[test]
    fn leaf_names_prefer_sub_levels() {
        let plain = Level::new("Masters");
        assert_eq!(plain.leaf_names(), ["Masters"]);
        assert!(plain.has_leaf("Masters"));

        let split = Level::new("Novice")
            .with_sub_levels(&["Novice A", "Novice B"])
            .unwrap();
        assert_eq!(split.leaf_names(), ["Novice A", "Novice B"]);
        assert!(!split.has_leaf("Novice"));
        assert!(split.has_leaf("Novice B"));
    }

    #[test]
    fn duplicate_sub_level_fails_load() {
        let mut tree = Element::new(element::LEVEL);
        tree.add_attr(attr::NAME, "Novice");
        tree.add_child(element::SUBLEVEL).add_attr(attr::NAME, "A");
        tree.add_child(element::SUBLEVEL).add_attr(attr::NAME, "A");
        assert!(matches!(
            Level::load(&tree),
            Err(LoadError::List { kind: "sub-level", .. })
        ));
    }
}
