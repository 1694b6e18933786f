//! Load-time schema migrations
//!
//! Older documents are rewritten into the current layout before any entity
//! loader sees them. Each [`Migration`] applies to the half-open range of
//! document versions it fixes; [`migrate`] runs every matching step in order.

use crate::match_key::WILDCARD;
use crate::schema::{attr, element};
use arb_tree::{Element, ErrorCallback, SchemaVersion};
use std::collections::HashSet;
use std::ops::Range;

/// One rewrite of a raw `Configuration` tree
pub struct Migration {
    /// Short label for diagnostics
    pub name: &'static str,
    /// Document versions the step applies to
    pub applies_to: Range<SchemaVersion>,
    /// Rewrite applied to the `Configuration` element
    pub apply: fn(&mut Element, &mut dyn ErrorCallback),
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("name", &self.name)
            .field("applies_to", &self.applies_to)
            .finish_non_exhaustive()
    }
}

const fn before(major: u16, minor: u16) -> Range<SchemaVersion> {
    SchemaVersion::new(0, 0)..SchemaVersion::new(major, minor)
}

/// All steps, oldest first
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "relocate venue faults and other points",
        applies_to: before(3, 0),
        apply: relocate_venue_lists,
    },
    Migration {
        name: "drop fractions for 100-point scoring",
        applies_to: before(3, 1),
        apply: drop_fractions_for_faults_100,
    },
    Migration {
        name: "title points from clean/with-faults attributes",
        applies_to: before(5, 0),
        apply: title_points_from_attributes,
    },
    Migration {
        name: "machPts renamed to speedPts",
        applies_to: before(10, 1),
        apply: rename_mach_points,
    },
    Migration {
        name: "double-Q scorings become a multi-Q",
        applies_to: before(11, 0),
        apply: double_q_to_multi_q,
    },
    Migration {
        name: "default speed-point multipliers",
        applies_to: before(12, 3),
        apply: default_speed_multipliers,
    },
];

/// Apply every step whose range contains `version`; returns how many ran
pub fn migrate(
    config: &mut Element,
    version: SchemaVersion,
    callback: &mut dyn ErrorCallback,
) -> usize {
    let mut applied = 0;
    for step in MIGRATIONS.iter().filter(|m| m.applies_to.contains(&version)) {
        tracing::debug!(step = step.name, %version, "migrating configuration");
        (step.apply)(config, callback);
        applied += 1;
    }
    applied
}

fn named_children<'a>(parent: &'a mut Element, name: &'a str) -> impl Iterator<Item = &'a mut Element> + 'a {
    parent.elements_mut().filter(move |e| e.name() == name)
}

fn for_each_scoring(config: &mut Element, mut f: impl FnMut(&mut Element)) {
    for venue in named_children(config, element::VENUE) {
        for event in named_children(venue, element::EVENT) {
            for scoring in named_children(event, element::SCORING) {
                f(scoring);
            }
        }
    }
}

fn relocate_venue_lists(config: &mut Element, _: &mut dyn ErrorCallback) {
    for list in [element::FAULT_TYPE, element::OTHER_POINTS] {
        let mut seen: HashSet<String> = config
            .elements_named(list)
            .filter_map(|e| e.attr(attr::NAME).map(String::from))
            .collect();
        let mut moved = Vec::new();
        for venue in named_children(config, element::VENUE) {
            for entry in venue.take_elements_named(list) {
                let name = entry.attr(attr::NAME).unwrap_or_default().to_string();
                if seen.insert(name) {
                    moved.push(entry);
                }
            }
        }
        for entry in moved {
            config.push_child(entry);
        }
    }
}

fn drop_fractions_for_faults_100(config: &mut Element, _: &mut dyn ErrorCallback) {
    for_each_scoring(config, |scoring| {
        if scoring.attr(attr::SCORING_TYPE) == Some("Faults100ThenTime") {
            scoring.add_attr(attr::SCORING_DROP_FRACTIONS, true);
        }
    });
}

fn title_points_from_attributes(config: &mut Element, callback: &mut dyn ErrorCallback) {
    const CLEAN: &str = "Clean";
    const FAULTS_ALLOWED: &str = "FaultsAllowed";
    const WITH_FAULTS: &str = "WithFaults";

    fn number(scoring: &Element, name: &str) -> f64 {
        scoring.get_attr::<f64>(name).found().unwrap_or(0.0)
    }

    for_each_scoring(config, |scoring| {
        if !scoring.has_attr(CLEAN) {
            callback.log(&format!(
                "scoring {}/{}: missing '{CLEAN}' points",
                scoring.attr(attr::SCORING_DIVISION).unwrap_or_default(),
                scoring.attr(attr::SCORING_LEVEL).unwrap_or_default(),
            ));
        }
        let clean = number(scoring, CLEAN);
        let allowed = number(scoring, FAULTS_ALLOWED);
        let with_faults = number(scoring, WITH_FAULTS);
        if clean > 0.0 {
            scoring
                .add_child(element::TITLE_POINTS)
                .add_attr(attr::POINTS, clean)
                .add_attr(attr::FAULTS, 0.0);
        }
        if allowed > 0.0 && with_faults > 0.0 {
            scoring
                .add_child(element::TITLE_POINTS)
                .add_attr(attr::POINTS, with_faults)
                .add_attr(attr::FAULTS, allowed);
        }
        for name in [CLEAN, FAULTS_ALLOWED, WITH_FAULTS] {
            scoring.remove_attr(name);
        }
    });
}

fn rename_mach_points(config: &mut Element, _: &mut dyn ErrorCallback) {
    for_each_scoring(config, |scoring| {
        if let Some(value) = scoring.remove_attr("machPts") {
            scoring.add_attr(attr::SCORING_SPEED_PTS, value);
        }
    });
}

fn double_q_to_multi_q(config: &mut Element, callback: &mut dyn ErrorCallback) {
    const DOUBLE_Q: &str = "doubleQ";

    for venue in named_children(config, element::VENUE) {
        let mut items: Vec<(String, String, String)> = Vec::new();
        for event in named_children(venue, element::EVENT) {
            let event_name = event.attr(attr::NAME).unwrap_or_default().to_string();
            for scoring in named_children(event, element::SCORING) {
                let flagged = scoring.get_attr::<bool>(DOUBLE_Q).found().unwrap_or(false);
                scoring.remove_attr(DOUBLE_Q);
                if !flagged {
                    continue;
                }
                let division = scoring.attr(attr::SCORING_DIVISION).unwrap_or_default();
                let level = scoring.attr(attr::SCORING_LEVEL).unwrap_or_default();
                if division == WILDCARD || level == WILDCARD {
                    callback.log(&format!(
                        "event '{event_name}': double Q on {division}/{level} cannot become a multi-Q item"
                    ));
                    continue;
                }
                let item = (division.to_string(), level.to_string(), event_name.clone());
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        }
        if items.len() > 1 {
            let multi_q = venue.add_child(element::MULTIQ);
            multi_q
                .add_attr(attr::NAME, "Double Q")
                .add_attr(attr::MULTIQ_SHORT_NAME, "QQ");
            for (division, level, event) in items {
                multi_q
                    .add_child(element::MULTIQ_ITEM)
                    .add_attr(attr::MULTIQ_ITEM_DIVISION, division)
                    .add_attr(attr::MULTIQ_ITEM_LEVEL, level)
                    .add_attr(attr::MULTIQ_ITEM_EVENT, event);
            }
        }
    }
}

fn default_speed_multipliers(config: &mut Element, _: &mut dyn ErrorCallback) {
    for_each_scoring(config, |scoring| {
        let speed = scoring
            .get_attr::<bool>(attr::SCORING_SPEED_PTS)
            .found()
            .unwrap_or(false);
        if speed && scoring.first_named(element::PLACE_INFO).is_none() {
            for (place, value) in [(1_u16, 2.0), (2, 1.5)] {
                scoring
                    .add_child(element::PLACE_INFO)
                    .add_attr(attr::PLACE_INFO_PLACE, place)
                    .add_attr(attr::PLACE_INFO_VALUE, value);
            }
        }
    });
}
