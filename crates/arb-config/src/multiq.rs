//! Multi-Q definitions
//!
//! A [`MultiQ`] is earned by qualifying in every one of a set of
//! (division, level, event) combinations on the same day.

use crate::error::LoadError;
use crate::load::{add_if_not_empty, required_name};
use crate::names::{ListError, Named};
use crate::schema::{attr, element};
use arb_tree::{in_window, ArbDate, Element};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One required (division, level, event) combination
///
/// The level is always a leaf name (a sub-level when the level is split).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MultiQItem {
    /// Division name
    pub division: String,
    /// Leaf level name
    pub level: String,
    /// Event name
    pub event: String,
}

impl MultiQItem {
    /// Create item
    #[inline]
    #[must_use]
    pub fn new(
        division: impl Into<String>,
        level: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            division: division.into(),
            level: level.into(),
            event: event.into(),
        }
    }

    /// Check against a run's names
    #[inline]
    #[must_use]
    pub fn matches(&self, division: &str, level: &str, event: &str) -> bool {
        self.division == division && self.level == level && self.event == event
    }
}

impl Display for MultiQItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.division, self.level, self.event)
    }
}

/// Combination bonus definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiQ {
    name: String,
    /// Abbreviation shown on credited runs
    pub short_name: String,
    /// First day the combination counts
    pub valid_from: Option<ArbDate>,
    /// Last day the combination counts
    pub valid_to: Option<ArbDate>,
    items: IndexSet<MultiQItem>,
}

impl MultiQ {
    /// Create definition without requirements
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            ..Self::default()
        }
    }

    /// Add a requirement
    ///
    /// # Errors
    /// Empty name component or a requirement already present.
    pub fn add_item(&mut self, item: MultiQItem) -> Result<(), ListError> {
        if item.division.is_empty() || item.level.is_empty() || item.event.is_empty() {
            return Err(ListError::EmptyName);
        }
        let text = item.to_string();
        if self.items.insert(item) {
            Ok(())
        } else {
            Err(ListError::Duplicate(text))
        }
    }

    /// Builder form of [`MultiQ::add_item`]
    ///
    /// # Errors
    /// Empty name component or duplicate requirement.
    pub fn with_item(mut self, division: &str, level: &str, event: &str) -> Result<Self, ListError> {
        self.add_item(MultiQItem::new(division, level, event))?;
        Ok(self)
    }

    /// Required combinations
    #[inline]
    #[must_use]
    pub fn items(&self) -> &IndexSet<MultiQItem> {
        &self.items
    }

    /// Number of required combinations
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if a combination is required
    #[must_use]
    pub fn has_item(&self, division: &str, level: &str, event: &str) -> bool {
        self.items.iter().any(|i| i.matches(division, level, event))
    }

    /// Check if `date` falls in the definition's window
    #[inline]
    #[must_use]
    pub fn is_valid_on(&self, date: Option<ArbDate>) -> bool {
        in_window(date, self.valid_from, self.valid_to)
    }

    /// Rebuild the set through `rewrite`, which returns whether it changed an
    /// item; rewritten duplicates collapse into one
    fn rewrite(&mut self, mut rewrite: impl FnMut(&mut MultiQItem) -> bool) -> usize {
        let mut changed = 0;
        self.items = std::mem::take(&mut self.items)
            .into_iter()
            .map(|mut item| {
                if rewrite(&mut item) {
                    changed += 1;
                }
                item
            })
            .collect();
        changed
    }

    fn remove_where(&mut self, pred: impl Fn(&MultiQItem) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }

    /// Repoint items in a division
    pub fn rename_division(&mut self, old: &str, new: &str) -> usize {
        self.rewrite(|item| {
            let hit = item.division == old;
            if hit {
                item.division = new.to_string();
            }
            hit
        })
    }

    /// Drop items in a division
    pub fn delete_division(&mut self, name: &str) -> usize {
        self.remove_where(|item| item.division == name)
    }

    /// Repoint items for a leaf level of a division
    pub fn rename_level(&mut self, division: &str, old: &str, new: &str) -> usize {
        self.rewrite(|item| {
            let hit = item.division == division && item.level == old;
            if hit {
                item.level = new.to_string();
            }
            hit
        })
    }

    /// Drop items for a leaf level of a division
    pub fn delete_level(&mut self, division: &str, level: &str) -> usize {
        self.remove_where(|item| item.division == division && item.level == level)
    }

    /// Repoint items for an event
    pub fn rename_event(&mut self, old: &str, new: &str) -> usize {
        self.rewrite(|item| {
            let hit = item.event == old;
            if hit {
                item.event = new.to_string();
            }
            hit
        })
    }

    /// Drop items for an event
    pub fn delete_event(&mut self, name: &str) -> usize {
        self.remove_where(|item| item.event == name)
    }

    /// Load from a `MultiQ` element
    ///
    /// # Errors
    /// Missing names or a duplicate requirement.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::MULTIQ)?;
        let mut multi_q = Self::new(
            required_name(tree, attr::NAME, "multi-Q")?,
            tree.optional::<String>(attr::MULTIQ_SHORT_NAME)?
                .unwrap_or_default(),
        );
        multi_q.valid_from = tree.optional(attr::VALID_FROM)?;
        multi_q.valid_to = tree.optional(attr::VALID_TO)?;
        for child in tree.elements_named(element::MULTIQ_ITEM) {
            let item = MultiQItem::new(
                required_name(child, attr::MULTIQ_ITEM_DIVISION, "multi-Q division")?,
                required_name(child, attr::MULTIQ_ITEM_LEVEL, "multi-Q level")?,
                required_name(child, attr::MULTIQ_ITEM_EVENT, "multi-Q event")?,
            );
            multi_q
                .add_item(item)
                .map_err(|e| LoadError::list("multi-Q item", e))?;
        }
        Ok(multi_q)
    }

    /// Append as a `MultiQ` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::MULTIQ);
        e.add_attr(attr::NAME, &self.name);
        add_if_not_empty(e, attr::MULTIQ_SHORT_NAME, &self.short_name);
        if let Some(from) = self.valid_from {
            e.add_attr(attr::VALID_FROM, from);
        }
        if let Some(to) = self.valid_to {
            e.add_attr(attr::VALID_TO, to);
        }
        for item in &self.items {
            e.add_child(element::MULTIQ_ITEM)
                .add_attr(attr::MULTIQ_ITEM_DIVISION, &item.division)
                .add_attr(attr::MULTIQ_ITEM_LEVEL, &item.level)
                .add_attr(attr::MULTIQ_ITEM_EVENT, &item.event);
        }
    }
}

impl Named for MultiQ {
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
    use pretty_assertions::assert_eq;

    fn double_q() -> MultiQ {
        MultiQ::new("Double Q", "QQ")
            .with_item("Open", "Masters", "Standard")
            .and_then(|m| m.with_item("Open", "Masters", "Jumpers"))
            .unwrap()
    }

    #[test]
    fn items_form_a_set() {
        let mut m = double_q();
        assert_eq!(
            m.add_item(MultiQItem::new("Open", "Masters", "Jumpers")),
            Err(ListError::Duplicate("Open/Masters/Jumpers".into()))
        );
        assert_eq!(m.add_item(MultiQItem::new("", "a", "b")), Err(ListError::EmptyName));
        assert_eq!(m.item_count(), 2);
    }

    #[test]
    fn renaming_into_an_existing_item_collapses() {
        let mut m = double_q();
        assert_eq!(m.rename_event("Jumpers", "Standard"), 1);
        assert_eq!(m.item_count(), 1);
    }

    #[test]
    fn cascades() {
        let mut m = double_q();
        assert_eq!(m.rename_level("Open", "Masters", "Excellent"), 2);
        assert!(m.has_item("Open", "Excellent", "Jumpers"));
        assert_eq!(m.delete_event("Jumpers"), 1);
        assert_eq!(m.delete_division("Open"), 1);
        assert_eq!(m.item_count(), 0);
    }

    #[test]
    fn save_then_load_is_identity() {
        let mut m = double_q();
        m.valid_from = ArbDate::from_ymd(2011, 1, 1);
        let mut parent = Element::new(element::VENUE);
        m.save(&mut parent);
        let loaded = MultiQ::load(parent.first_named(element::MULTIQ).unwrap()).unwrap();
        assert_eq!(loaded, m);
        assert_eq!(loaded.items().iter().map(|i| i.event.as_str()).collect::<Vec<_>>(), ["Standard", "Jumpers"]);
    }
}
