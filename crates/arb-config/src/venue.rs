//! Venues
//!
//! A [`Venue`] owns its titles, divisions, events and multi-Q definitions.
//! Events and multi-Qs refer to divisions and levels by name only, so the
//! structural edits here also rewrite those references.

use crate::division::Division;
use crate::error::LoadError;
use crate::event::Event;
use crate::level::Level;
use crate::load::{add_if_not_empty, required_name, LoadContext};
use crate::multiq::MultiQ;
use crate::names::{ListError, Named, NamedList};
use crate::schema::{attr, element};
use crate::title::Title;
use arb_tree::Element;
use serde::{Deserialize, Serialize};

/// Sanctioning organization's rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    name: String,
    pub long_name: String,
    pub url: String,
    pub description: String,
    /// Speed-point formula key; empty selects the normal formula
    pub points_type: String,
    pub titles: NamedList<Title>,
    pub divisions: NamedList<Division>,
    pub events: NamedList<Event>,
    pub multi_qs: NamedList<MultiQ>,
}

impl Venue {
    /// Create empty venue
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

    /// Select the speed-point formula
    #[inline]
    #[must_use]
    pub fn with_points_type(mut self, points_type: impl Into<String>) -> Self {
        self.points_type = points_type.into();
        self
    }

    /// Level of `division` owning `leaf` (a leaf level or a sub-level)
    #[must_use]
    pub fn find_level(&self, division: &str, leaf: &str) -> Option<&Level> {
        self.divisions.find(division)?.find_level_by_leaf(leaf)
    }

    /// Multi-Q by short name
    #[must_use]
    pub fn find_multi_q_by_short_name(&self, short_name: &str) -> Option<&MultiQ> {
        self.multi_qs.iter().find(|m| m.short_name == short_name)
    }

    /// Rewrite event and multi-Q references from one division to another
    pub fn repoint_division(&mut self, old: &str, new: &str) -> usize {
        let rules: usize = self
            .events
            .iter_mut()
            .map(|e| e.rename_division(old, new))
            .sum();
        let items: usize = self
            .multi_qs
            .iter_mut()
            .map(|m| m.rename_division(old, new))
            .sum();
        rules + items
    }

    /// Fold division `old` into the existing division `new`
    ///
    /// Multi-Q items move over; `old`'s scoring rules are dropped so `new`
    /// keeps scoring with its own.
    pub fn merge_division(&mut self, old: &str, new: &str) -> bool {
        if old == new || !self.divisions.contains(new) {
            return false;
        }
        for multi_q in &mut self.multi_qs {
            multi_q.rename_division(old, new);
        }
        self.delete_division(old)
    }

    /// Remove a division with its scoring rules and multi-Q items
    pub fn delete_division(&mut self, name: &str) -> bool {
        if !self.divisions.delete(name) {
            return false;
        }
        for event in &mut self.events {
            event.delete_division(name);
        }
        for multi_q in &mut self.multi_qs {
            multi_q.delete_division(name);
        }
        true
    }

    /// Rewrite references to a level or sub-level of `division`
    ///
    /// Scoring rules name whole levels, multi-Q items name leaves; a
    /// sub-level rename only touches multi-Q items. Works before or after
    /// the level entry itself is renamed.
    pub fn repoint_level(&mut self, division: &str, old: &str, new: &str, is_sub_level: bool) -> usize {
        let leaf = is_sub_level
            || self
                .divisions
                .find(division)
                .and_then(|d| d.levels.find(old).or_else(|| d.levels.find(new)))
                .map_or(true, Level::is_leaf);
        let mut count = 0;
        if !is_sub_level {
            count += self
                .events
                .iter_mut()
                .map(|e| e.rename_level(division, old, new))
                .sum::<usize>();
        }
        if leaf {
            count += self
                .multi_qs
                .iter_mut()
                .map(|m| m.rename_level(division, old, new))
                .sum::<usize>();
        }
        count
    }

    /// Fold top-level `old` of `division` into the existing level `new`
    ///
    /// A leaf's multi-Q items move over, items naming `old`'s sub-levels are
    /// dropped, and rules keyed on `old` are dropped so `new` keeps its own.
    pub fn merge_level(&mut self, division: &str, old: &str, new: &str) -> bool {
        let Some(div) = self.divisions.find_mut(division) else {
            return false;
        };
        if old == new || !div.levels.contains(new) {
            return false;
        }
        let Some(level) = div.levels.find(old) else {
            return false;
        };
        let leaf = level.is_leaf();
        let sub_levels: Vec<String> = level.sub_levels.names().map(String::from).collect();
        div.levels.delete(old);
        for multi_q in &mut self.multi_qs {
            if leaf {
                multi_q.rename_level(division, old, new);
            }
            for sub_level in &sub_levels {
                multi_q.delete_level(division, sub_level);
            }
        }
        for event in &mut self.events {
            event.delete_level(division, old);
        }
        true
    }

    /// Remove a level (or sub-level) of `division` with the rules and multi-Q
    /// items that name it
    pub fn delete_level(&mut self, division: &str, name: &str) -> bool {
        let Some(div) = self.divisions.find_mut(division) else {
            return false;
        };
        let leaves: Vec<String> = if let Some(level) = div.levels.find(name) {
            level.leaf_names().into_iter().map(String::from).collect()
        } else if div.delete_sub_level(name) {
            vec![name.to_string()]
        } else {
            return false;
        };
        let whole_level = div.levels.delete(name);
        if whole_level {
            for event in &mut self.events {
                event.delete_level(division, name);
            }
        }
        for multi_q in &mut self.multi_qs {
            for leaf in &leaves {
                multi_q.delete_level(division, leaf);
            }
        }
        true
    }

    /// Rename a level in place, or a sub-level when `parent` is given
    ///
    /// # Errors
    /// Missing division/level, or a name collision.
    pub fn rename_level_entry(
        &mut self,
        division: &str,
        parent: Option<&str>,
        old: &str,
        new: &str,
    ) -> Result<(), ListError> {
        let div = self
            .divisions
            .find_mut(division)
            .ok_or_else(|| ListError::NotFound(division.to_string()))?;
        match parent {
            Some(parent) => div
                .levels
                .find_mut(parent)
                .ok_or_else(|| ListError::NotFound(parent.to_string()))?
                .sub_levels
                .rename(old, new),
            None => div.levels.rename(old, new),
        }
    }

    /// Rewrite multi-Q references from one event to another
    pub fn repoint_event(&mut self, old: &str, new: &str) -> usize {
        self.multi_qs
            .iter_mut()
            .map(|m| m.rename_event(old, new))
            .sum()
    }

    /// Remove an event and the multi-Q items naming it
    pub fn delete_event(&mut self, name: &str) -> bool {
        if !self.events.delete(name) {
            return false;
        }
        for multi_q in &mut self.multi_qs {
            multi_q.delete_event(name);
        }
        true
    }

    /// Load from a `Venue` element; bad children are logged and skipped
    ///
    /// # Errors
    /// Missing/reserved venue name or malformed venue attributes.
    pub fn load(tree: &Element, ctx: &mut LoadContext<'_>) -> Result<Self, LoadError> {
        tree.expect_name(element::VENUE)?;
        let mut venue = Self::new(required_name(tree, attr::NAME, "venue")?);
        venue.long_name = tree.optional(attr::VENUE_LONG_NAME)?.unwrap_or_default();
        venue.url = tree.optional(attr::VENUE_URL)?.unwrap_or_default();
        venue.points_type = tree.optional(attr::VENUE_POINTS_TYPE)?.unwrap_or_default();
        for child in tree.elements() {
            let result = match child.name() {
                element::DESC => {
                    venue.description = child.text();
                    Ok(())
                }
                element::TITLES => Title::load(child).and_then(|t| {
                    add_to(&mut venue.titles, t, "title")
                }),
                element::DIVISION => Division::load(child, ctx).and_then(|d| {
                    add_to(&mut venue.divisions, d, "division")
                }),
                element::EVENT => Event::load(child).and_then(|e| {
                    add_to(&mut venue.events, e, "event")
                }),
                element::MULTIQ => MultiQ::load(child).and_then(|m| {
                    add_to(&mut venue.multi_qs, m, "multi-Q")
                }),
                _ => Ok(()),
            };
            if let Err(e) = result {
                ctx.log(&format!("venue '{}': {e}", venue.name));
            }
        }
        Ok(venue)
    }

    /// Append as a `Venue` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::VENUE);
        e.add_attr(attr::NAME, &self.name);
        add_if_not_empty(e, attr::VENUE_LONG_NAME, &self.long_name);
        add_if_not_empty(e, attr::VENUE_URL, &self.url);
        add_if_not_empty(e, attr::VENUE_POINTS_TYPE, &self.points_type);
        if !self.description.is_empty() {
            e.add_text_child(element::DESC, &self.description);
        }
        for title in &self.titles {
            title.save(e);
        }
        for division in &self.divisions {
            division.save(e);
        }
        for event in &self.events {
            event.save(e);
        }
        for multi_q in &self.multi_qs {
            multi_q.save(e);
        }
    }
}

fn add_to<T: Named>(list: &mut NamedList<T>, item: T, kind: &'static str) -> Result<(), LoadError> {
    list.add(item).map(|_| ()).map_err(|e| LoadError::list(kind, e))
}

impl Named for Venue {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
