//! Venue titles

use crate::error::LoadError;
use crate::load::{add_if_not_empty, required_name};
use crate::names::Named;
use crate::schema::{attr, element};
use arb_tree::{in_window, ArbDate, Element};
use serde::{Deserialize, Serialize};

/// Title a dog can earn in a venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    name: String,
    pub long_name: String,
    /// How many times the title may be earned (1 = once)
    pub multiple: u16,
    /// Shown before the dog's name rather than after
    pub prefix: bool,
    pub valid_from: Option<ArbDate>,
    pub valid_to: Option<ArbDate>,
    pub description: String,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            name: String::new(),
            long_name: String::new(),
            multiple: 1,
            prefix: false,
            valid_from: None,
            valid_to: None,
            description: String::new(),
        }
    }
}

impl Title {
    /// Create title with defaults
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set long name
    #[inline]
    #[must_use]
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self
    }

    /// Check whether the title could be earned on `date`
    #[inline]
    #[must_use]
    pub fn is_valid_on(&self, date: Option<ArbDate>) -> bool {
        in_window(date, self.valid_from, self.valid_to)
    }

    /// Load from a `Titles` element
    ///
    /// # Errors
    /// Missing/reserved name or a malformed attribute.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::TITLES)?;
        Ok(Self {
            name: required_name(tree, attr::NAME, "title")?,
            long_name: tree.optional(attr::TITLE_LONG_NAME)?.unwrap_or_default(),
            multiple: tree.optional(attr::TITLE_MULTIPLE)?.unwrap_or(1),
            prefix: tree.optional(attr::TITLE_PREFIX)?.unwrap_or(false),
            valid_from: tree.optional(attr::VALID_FROM)?,
            valid_to: tree.optional(attr::VALID_TO)?,
            description: tree.text(),
        })
    }

    /// Append as a `Titles` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::TITLES);
        e.add_attr(attr::NAME, &self.name);
        add_if_not_empty(e, attr::TITLE_LONG_NAME, &self.long_name);
        if self.multiple != 1 {
            e.add_attr(attr::TITLE_MULTIPLE, self.multiple);
        }
        if self.prefix {
            e.add_attr(attr::TITLE_PREFIX, true);
        }
        if let Some(from) = self.valid_from {
            e.add_attr(attr::VALID_FROM, from);
        }
        if let Some(to) = self.valid_to {
            e.add_attr(attr::VALID_TO, to);
        }
        e.set_text(&self.description);
    }
}

impl Named for Title {
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
    fn validity_window() {
        let mut t = Title::new("MAD");
        t.valid_to = ArbDate::from_ymd(2010, 12, 31);
        assert!(t.is_valid_on(ArbDate::from_ymd(2010, 6, 1)));
        assert!(!t.is_valid_on(ArbDate::from_ymd(2011, 1, 1)));
        assert!(t.is_valid_on(None));
    }

    #[test]
    fn save_then_load_keeps_fields() {
        let mut t = Title::new("ADCH").with_long_name("Agility Dog Champion");
        t.multiple = 5;
        t.prefix = true;
        t.valid_from = ArbDate::from_ymd(2001, 1, 1);
        t.description = "Top title".into();

        let mut parent = Element::new("Venue");
        t.save(&mut parent);
        let loaded = Title::load(parent.first_named(element::TITLES).unwrap()).unwrap();
        assert_eq!(loaded, t);
    }
}
