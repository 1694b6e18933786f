//! Configuration consistency checks
//!
//! Finds authoring mistakes that loading tolerates: scoring rules whose
//! validity windows overlap within one tier, and names that refer to
//! divisions, levels or events the venue does not define. Every finding is a
//! warning; nothing here rejects a configuration.

use crate::config::Configuration;
use crate::event::Event;
use crate::match_key::MatchKey;
use crate::names::Named;
use crate::venue::Venue;
use std::collections::HashSet;

/// Non-fatal configuration problem
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigDiagnostic {
    /// Two rules for the same key are valid on a common date
    #[error("{venue}/{event}: scoring rules #{first} and #{second} for {division}/{level} overlap")]
    OverlappingScoring {
        venue: String,
        event: String,
        division: MatchKey,
        level: MatchKey,
        first: usize,
        second: usize,
    },

    /// Scoring rule names a division the venue lacks
    #[error("{venue}/{event}: scoring division '{division}' does not exist")]
    UnknownDivision {
        venue: String,
        event: String,
        division: String,
    },

    /// Scoring rule names a level no matching division has
    #[error("{venue}/{event}: scoring level '{level}' does not exist in '{division}'")]
    UnknownLevel {
        venue: String,
        event: String,
        division: MatchKey,
        level: String,
    },

    /// Multi-Q item does not resolve
    #[error("{venue}/{multi_q}: item {item} does not exist")]
    UnknownMultiQItem {
        venue: String,
        multi_q: String,
        item: String,
    },

    /// Two multi-Qs share a short name
    #[error("{venue}: multi-Q short name '{short_name}' is used more than once")]
    DuplicateShortName { venue: String, short_name: String },
}

/// Configuration consistency validator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check every venue
    #[must_use]
    pub fn validate(&self, config: &Configuration) -> Vec<ConfigDiagnostic> {
        config
            .venues
            .iter()
            .flat_map(|venue| self.validate_venue(venue))
            .collect()
    }

    /// Check one venue
    #[must_use]
    pub fn validate_venue(&self, venue: &Venue) -> Vec<ConfigDiagnostic> {
        let mut found = Vec::new();
        for event in &venue.events {
            for (first, second) in Self::scoring_overlaps(event) {
                let rule = &event.scorings[first];
                found.push(ConfigDiagnostic::OverlappingScoring {
                    venue: venue.name().to_string(),
                    event: event.name().to_string(),
                    division: rule.division.clone(),
                    level: rule.level.clone(),
                    first,
                    second,
                });
            }
            found.extend(Self::unknown_scoring_names(venue, event));
        }

        for multi_q in &venue.multi_qs {
            for item in multi_q.items() {
                let known = venue.find_level(&item.division, &item.level).is_some()
                    && venue.events.contains(&item.event);
                if !known {
                    found.push(ConfigDiagnostic::UnknownMultiQItem {
                        venue: venue.name().to_string(),
                        multi_q: multi_q.name().to_string(),
                        item: item.to_string(),
                    });
                }
            }
        }

        let mut short_names = HashSet::new();
        for multi_q in &venue.multi_qs {
            if !multi_q.short_name.is_empty() && !short_names.insert(multi_q.short_name.as_str()) {
                found.push(ConfigDiagnostic::DuplicateShortName {
                    venue: venue.name().to_string(),
                    short_name: multi_q.short_name.clone(),
                });
            }
        }
        found
    }

    /// Index pairs of same-key rules with intersecting windows
    ///
    /// O(n²) in the number of rules per event, which is small.
    #[must_use]
    pub fn scoring_overlaps(event: &Event) -> Vec<(usize, usize)> {
        let rules = &event.scorings;
        let mut pairs = Vec::new();
        for i in 0..rules.len() {
            for j in (i + 1)..rules.len() {
                if rules[i].same_key(&rules[j]) && rules[i].overlaps(&rules[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    fn unknown_scoring_names(venue: &Venue, event: &Event) -> Vec<ConfigDiagnostic> {
        let mut found = Vec::new();
        for rule in &event.scorings {
            if let Some(division) = rule.division.exact_name() {
                if !venue.divisions.contains(division) {
                    found.push(ConfigDiagnostic::UnknownDivision {
                        venue: venue.name().to_string(),
                        event: event.name().to_string(),
                        division: division.to_string(),
                    });
                    continue;
                }
            }
            if let Some(level) = rule.level.exact_name() {
                let known = venue
                    .divisions
                    .iter()
                    .filter(|d| rule.division.matches(d.name()))
                    .any(|d| d.levels.contains(level));
                if !known {
                    found.push(ConfigDiagnostic::UnknownLevel {
                        venue: venue.name().to_string(),
                        event: event.name().to_string(),
                        division: rule.division.clone(),
                        level: level.to_string(),
                    });
                }
            }
        }
        found
    }
}
