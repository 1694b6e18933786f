//! Events and their scoring-rule lists

use crate::error::LoadError;
use crate::load::required_name;
use crate::names::Named;
use crate::schema::{attr, element};
use crate::scoring::ScoringRule;
use arb_tree::Element;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Competition class type within a venue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    pub description: String,
    pub has_table: bool,
    pub has_partner: bool,
    pub has_sub_names: bool,
    pub sub_names: IndexSet<String>,
    /// Date-scoped rules, resolved first-match
    pub scorings: Vec<ScoringRule>,
}

impl Event {
    /// Create event without rules
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a scoring rule
    #[inline]
    #[must_use]
    pub fn with_scoring(mut self, rule: ScoringRule) -> Self {
        self.scorings.push(rule);
        self
    }

    /// Enable the table flag
    #[inline]
    #[must_use]
    pub fn with_table(mut self) -> Self {
        self.has_table = true;
        self
    }

    /// Repoint rules keyed on an exact division
    pub fn rename_division(&mut self, old: &str, new: &str) -> usize {
        self.scorings
            .iter_mut()
            .map(|rule| rule.division.rename(old, new))
            .filter(|hit| *hit)
            .count()
    }

    /// Drop rules keyed on an exact division
    pub fn delete_division(&mut self, name: &str) -> usize {
        let before = self.scorings.len();
        self.scorings.retain(|rule| !rule.division.is_exact(name));
        before - self.scorings.len()
    }

    /// Repoint rules for an exact level within a division
    ///
    /// Rules with a wildcard division follow too, since they name the level
    /// the same way in every division.
    pub fn rename_level(&mut self, division: &str, old: &str, new: &str) -> usize {
        self.scorings
            .iter_mut()
            .filter(|rule| rule.division.matches(division))
            .map(|rule| rule.level.rename(old, new))
            .filter(|hit| *hit)
            .count()
    }

    /// Drop rules keyed on exactly (division, level)
    pub fn delete_level(&mut self, division: &str, level: &str) -> usize {
        let before = self.scorings.len();
        self.scorings
            .retain(|rule| !(rule.division.is_exact(division) && rule.level.is_exact(level)));
        before - self.scorings.len()
    }

    /// Load from an `Event` element
    ///
    /// # Errors
    /// Missing/reserved name or any malformed scoring rule.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::EVENT)?;
        let mut event = Self::new(required_name(tree, attr::NAME, "event")?);
        event.has_table = tree.optional(attr::EVENT_HAS_TABLE)?.unwrap_or(false);
        event.has_partner = tree.optional(attr::EVENT_HAS_PARTNER)?.unwrap_or(false);
        event.has_sub_names = tree.optional(attr::EVENT_HAS_SUBNAMES)?.unwrap_or(false);
        for child in tree.elements() {
            match child.name() {
                element::DESC => event.description = child.text(),
                element::SUBNAME => {
                    let sub = child.text();
                    if !sub.is_empty() {
                        event.sub_names.insert(sub);
                    }
                }
                element::SCORING => event.scorings.push(ScoringRule::load(child)?),
                _ => {}
            }
        }
        Ok(event)
    }

    /// Append as an `Event` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::EVENT);
        e.add_attr(attr::NAME, &self.name);
        if self.has_table {
            e.add_attr(attr::EVENT_HAS_TABLE, true);
        }
        if self.has_partner {
            e.add_attr(attr::EVENT_HAS_PARTNER, true);
        }
        if self.has_sub_names {
            e.add_attr(attr::EVENT_HAS_SUBNAMES, true);
        }
        if !self.description.is_empty() {
            e.add_text_child(element::DESC, &self.description);
        }
        for sub in &self.sub_names {
            e.add_text_child(element::SUBNAME, sub);
        }
        for rule in &self.scorings {
            rule.save(e);
        }
    }
}

impl Named for Event {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
