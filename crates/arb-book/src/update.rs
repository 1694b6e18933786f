//! Configuration update/merge engine
//!
//! Merges a shipped reference configuration into the user's current one.
//! Entities missing from the current configuration are cloned in, entities
//! present in both are updated field by field, and entities only the
//! current configuration has are left alone: removal only ever happens
//! through an action command.
//!
//! Every section reports an added/changed/skipped tally into an indented
//! [`UpdateLog`].

use arb_config::{Configuration, Division, Event, Level, Named, NamedList, Venue};
use std::fmt::{self, Display, Formatter};

/// Default spaces per nesting level in rendered logs
pub const DEFAULT_INDENT: usize = 3;

/// Hierarchical human-readable report
///
/// Lines are stored with a relative depth; nesting one log inside another
/// pushes every line one level deeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLog {
    lines: Vec<(usize, String)>,
    indent: usize,
}

impl Default for UpdateLog {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateLog {
    /// Create empty log with the default indent
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            indent: DEFAULT_INDENT,
        }
    }

    /// Set spaces per nesting level
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Append a top-level line
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push((0, line.into()));
    }

    /// Append `header` followed by `child` one level deeper
    pub fn nest(&mut self, header: impl Into<String>, child: Self) {
        self.push(header);
        self.lines
            .extend(child.lines.into_iter().map(|(depth, line)| (depth + 1, line)));
    }

    /// Append another log at the same depth
    pub fn append(&mut self, other: Self) {
        self.lines.extend(other.lines);
    }

    /// Lines without indentation
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(_, line)| line.as_str())
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if nothing was logged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check if any line contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    fn child(&self) -> Self {
        Self::new().with_indent(self.indent)
    }
}

impl Display for UpdateLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (depth, line) in &self.lines {
            writeln!(f, "{:width$}{line}", "", width = depth * self.indent)?;
        }
        Ok(())
    }
}

/// Per-section counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub added: usize,
    pub changed: usize,
    pub skipped: usize,
    pub deleted: usize,
}

impl Tally {
    /// Check if anything was added, changed or deleted
    #[inline]
    #[must_use]
    pub fn any_change(&self) -> bool {
        self.added + self.changed + self.deleted > 0
    }

    /// Write the section line with `details` nested under it
    fn report(&self, log: &mut UpdateLog, label: &str, reordered: bool, details: UpdateLog) {
        if self.added + self.changed > 0 {
            let header = format!(
                "{label}: {} added, {} changed, {} skipped",
                self.added, self.changed, self.skipped
            );
            log.nest(header, details);
        } else if reordered {
            log.push(format!("{label}: reordered"));
        }
    }
}

/// Merge `reference` into `current`
///
/// Returns whether anything in `current` changed.
pub fn update_configuration(current: &mut Configuration, reference: &Configuration, log: &mut UpdateLog) -> bool {
    let mut changed = false;

    let mut other = Tally::default();
    for entry in &reference.other_points {
        match current.other_points.find_mut(entry.name()) {
            Some(existing) if existing == entry => other.skipped += 1,
            Some(existing) => {
                *existing = entry.clone();
                other.changed += 1;
            }
            None => {
                push_clone(&mut current.other_points, entry);
                other.added += 1;
            }
        }
    }
    let empty = log.child();
    other.report(log, "Other Points", false, empty);
    changed |= other.any_change();

    let mut faults = Tally::default();
    for fault in &reference.faults {
        if current.faults.contains(fault.name()) {
            faults.skipped += 1;
        } else {
            push_clone(&mut current.faults, fault);
            faults.added += 1;
        }
    }
    let empty = log.child();
    faults.report(log, "Faults", false, empty);
    changed |= faults.any_change();

    let mut venues = Tally::default();
    let mut details = log.child();
    for venue in &reference.venues {
        match current.venues.find_mut(venue.name()) {
            Some(existing) if existing == venue => venues.skipped += 1,
            Some(existing) => {
                let mut venue_log = log.child();
                if update_venue(existing, venue, &mut venue_log) {
                    venues.changed += 1;
                } else {
                    venues.skipped += 1;
                }
                if !venue_log.is_empty() {
                    details.nest(venue.name(), venue_log);
                }
            }
            None => {
                push_clone(&mut current.venues, venue);
                venues.added += 1;
                details.push(format!("+{}", venue.name()));
            }
        }
    }
    if venues.any_change() {
        venues.report(log, "Venues", false, details);
    } else {
        log.append(details);
    }
    changed |= venues.any_change();

    if reference.version > current.version {
        tracing::debug!(from = current.version, to = reference.version, "adopting configuration version");
        current.version = reference.version;
        changed = true;
    }

    tracing::info!(
        venues_added = venues.added,
        venues_changed = venues.changed,
        changed,
        "configuration merged"
    );
    changed
}

fn push_clone<T: Named + Clone>(list: &mut NamedList<T>, item: &T) {
    if let Err(e) = list.add(item.clone()) {
        tracing::warn!("merge skipped '{}': {e}", item.name());
    }
}

/// Merge a list where each entry updates through `update`, then follow the
/// reference order
fn merge_list<T: Named + Clone + PartialEq>(
    current: &mut NamedList<T>,
    reference: &NamedList<T>,
    log: &mut UpdateLog,
    label: &str,
    mut update: impl FnMut(&mut T, &T, &mut UpdateLog) -> bool,
) -> bool {
    let mut tally = Tally::default();
    let mut details = log.child();
    for item in reference {
        match current.find_mut(item.name()) {
            Some(existing) if existing == item => tally.skipped += 1,
            Some(existing) => {
                let mut item_log = log.child();
                if update(existing, item, &mut item_log) {
                    tally.changed += 1;
                } else {
                    tally.skipped += 1;
                }
                if !item_log.is_empty() {
                    details.nest(item.name(), item_log);
                }
            }
            None => {
                push_clone(current, item);
                tally.added += 1;
                details.push(format!("+{}", item.name()));
            }
        }
    }
    let reordered = reorders(current, reference);
    current.reorder_by(reference);
    let changed = tally.any_change() || reordered;
    if tally.any_change() {
        tally.report(log, label, reordered, details);
    } else {
        let empty = log.child();
        tally.report(log, label, reordered, empty);
        log.append(details);
    }
    changed
}

/// Whether following the reference order would move anything
fn reorders<T: Named>(current: &NamedList<T>, reference: &NamedList<T>) -> bool {
    let shared: Vec<&str> = current.names().filter(|n| reference.contains(n)).collect();
    let wanted: Vec<&str> = reference.names().filter(|n| current.contains(n)).collect();
    shared != wanted
}

fn update_venue(current: &mut Venue, reference: &Venue, log: &mut UpdateLog) -> bool {
    let mut changed = false;
    for (field, new) in [
        (&mut current.long_name, &reference.long_name),
        (&mut current.url, &reference.url),
        (&mut current.description, &reference.description),
        (&mut current.points_type, &reference.points_type),
    ] {
        if field != new {
            field.clone_from(new);
            changed = true;
        }
    }
    if changed {
        log.push("Venue information updated");
    }

    changed |= merge_list(&mut current.titles, &reference.titles, log, "Titles", |cur, new, _| {
        *cur = new.clone();
        true
    });
    changed |= merge_list(
        &mut current.divisions,
        &reference.divisions,
        log,
        "Divisions",
        update_division,
    );
    changed |= merge_list(&mut current.events, &reference.events, log, "Events", update_event);
    changed |= update_multi_qs(current, reference, log);
    changed
}

fn update_division(current: &mut Division, reference: &Division, log: &mut UpdateLog) -> bool {
    merge_list(&mut current.levels, &reference.levels, log, "Levels", update_level)
}

fn update_level(current: &mut Level, reference: &Level, log: &mut UpdateLog) -> bool {
    merge_list(
        &mut current.sub_levels,
        &reference.sub_levels,
        log,
        "Sub-Levels",
        |_, _, _| false,
    )
}

fn update_event(current: &mut Event, reference: &Event, log: &mut UpdateLog) -> bool {
    let mut changed = false;
    if current.description != reference.description
        || current.has_table != reference.has_table
        || current.has_partner != reference.has_partner
        || current.has_sub_names != reference.has_sub_names
        || current.sub_names != reference.sub_names
    {
        current.description.clone_from(&reference.description);
        current.has_table = reference.has_table;
        current.has_partner = reference.has_partner;
        current.has_sub_names = reference.has_sub_names;
        current.sub_names.clone_from(&reference.sub_names);
        changed = true;
    }

    let mut tally = Tally::default();
    for rule in &reference.scorings {
        if current.scorings.contains(rule) {
            tally.skipped += 1;
        } else if current.scorings.iter().any(|r| r.same_key(rule)) {
            tally.changed += 1;
        } else {
            tally.added += 1;
        }
    }
    tally.deleted = current
        .scorings
        .iter()
        .filter(|r| !reference.scorings.iter().any(|n| n.same_key(r)))
        .count();
    if tally.any_change() || current.scorings.len() != reference.scorings.len() {
        current.scorings.clone_from(&reference.scorings);
        log.push(format!(
            "Scoring: {} added, {} changed, {} deleted, {} skipped",
            tally.added, tally.changed, tally.deleted, tally.skipped
        ));
        changed = true;
    }
    changed
}

/// Multi-Qs compare as whole values
///
/// A reference value the current venue lacks replaces the same-named entry
/// or is appended. Current values the reference lacks are only reported.
fn update_multi_qs(current: &mut Venue, reference: &Venue, log: &mut UpdateLog) -> bool {
    let mut tally = Tally::default();
    let mut details = log.child();
    for multi_q in &reference.multi_qs {
        if current.multi_qs.iter().any(|m| m == multi_q) {
            tally.skipped += 1;
            continue;
        }
        tally.added += 1;
        details.push(format!("+{}", multi_q.name()));
        match current.multi_qs.find_mut(multi_q.name()) {
            Some(existing) => *existing = multi_q.clone(),
            None => push_clone(&mut current.multi_qs, multi_q),
        }
    }
    for multi_q in &current.multi_qs {
        if !reference.multi_qs.contains(multi_q.name()) {
            tally.deleted += 1;
            details.push(format!("-{}", multi_q.name()));
        }
    }
    if tally.added + tally.deleted > 0 {
        let header = format!(
            "Multi-Qs: {} added, {} pending delete, {} skipped",
            tally.added, tally.deleted, tally.skipped
        );
        log.nest(header, details);
    }
    tally.added > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_config::{Fault, MatchKey, MultiQ, OtherPoints, ScoringRule, ScoringStyle, Title};
    use pretty_assertions::assert_eq;

    fn rule(level: &str, style: ScoringStyle) -> ScoringRule {
        ScoringRule::new(MatchKey::exact("Open"), MatchKey::exact(level), style)
    }

    fn venue() -> Venue {
        let mut venue = Venue::new("USDAA").with_long_name("United States Dog Agility Association");
        venue.titles.add(Title::new("AD")).unwrap();
        let mut division = Division::new("Open");
        division.levels.add(Level::new("Starters")).unwrap();
        division.levels.add(Level::new("Masters")).unwrap();
        venue.divisions.add(division).unwrap();
        venue
            .events
            .add(Event::new("Jumpers").with_scoring(rule("Masters", ScoringStyle::FaultsThenTime)))
            .unwrap();
        venue
            .multi_qs
            .add(MultiQ::new("Double Q", "QQ").with_item("Open", "Masters", "Jumpers").unwrap())
            .unwrap();
        venue
    }

    fn config() -> Configuration {
        let mut config = Configuration::new().with_version(3);
        config.venues.add(venue()).unwrap();
        config.faults.add(Fault::new("Refusal")).unwrap();
        config.other_points.add(OtherPoints::new("Top Ten")).unwrap();
        config
    }

    #[test]
    fn identical_reference_changes_nothing() {
        let mut current = config();
        let mut log = UpdateLog::new();
        assert!(!update_configuration(&mut current, &config(), &mut log));
        assert_eq!(current, config());
        assert!(log.is_empty(), "{log}");
    }

    #[test]
    fn missing_entities_are_added_and_extra_kept() {
        let mut current = config();
        current.venues.add(Venue::new("Local")).unwrap();
        let mut reference = config().with_version(5);
        reference.venues.add(Venue::new("CPE")).unwrap();
        reference.faults.add(Fault::new("Knocked bar")).unwrap();

        let mut log = UpdateLog::new();
        assert!(update_configuration(&mut current, &reference, &mut log));
        assert!(current.venue("CPE").is_some());
        assert!(current.venue("Local").is_some());
        assert_eq!(current.faults.len(), 2);
        assert_eq!(current.version, 5);
        assert!(log.contains("Venues: 1 added, 0 changed, 1 skipped"));
        assert!(log.contains("+CPE"));
    }

    #[test]
    fn changed_rule_replaces_whole_list() {
        let mut current = config();
        let mut reference = config();
        let mut venue = venue();
        let event = venue.events.find_mut("Jumpers").unwrap();
        event.scorings = vec![
            rule("Masters", ScoringStyle::TimePlusFaults),
            rule("Starters", ScoringStyle::FaultsThenTime),
        ];
        reference.venues.delete("USDAA");
        reference.venues.add(venue).unwrap();

        let mut log = UpdateLog::new();
        assert!(update_configuration(&mut current, &reference, &mut log));
        let merged = &current.venue("USDAA").unwrap().events.find("Jumpers").unwrap().scorings;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].style, ScoringStyle::TimePlusFaults);
        assert!(log.contains("Scoring: 1 added, 1 changed, 0 deleted, 0 skipped"));
    }

    #[test]
    fn nested_lines_are_indented() {
        let mut current = config();
        let mut reference = config();
        let mut venue = venue();
        venue.titles.add(Title::new("MAD")).unwrap();
        reference.venues.delete("USDAA");
        reference.venues.add(venue).unwrap();

        let mut log = UpdateLog::new().with_indent(2);
        update_configuration(&mut current, &reference, &mut log);
        let text = log.to_string();
        assert!(
            text.contains("Venues: 0 added, 1 changed, 0 skipped\n  USDAA\n    Titles: 1 added, 0 changed, 1 skipped\n      +MAD\n"),
            "{text}"
        );
    }

    #[test]
    fn reorder_alone_is_reported() {
        let mut current = config();
        let divisions = &mut current.venues.find_mut("USDAA").unwrap().divisions;
        let open = divisions.find_mut("Open").unwrap();
        open.levels.reorder_by(&{
            let mut order = NamedList::new();
            order.add(Level::new("Masters")).unwrap();
            order
        });

        let mut log = UpdateLog::new();
        assert!(update_configuration(&mut current, &config(), &mut log));
        assert!(log.contains("Levels: reordered"), "{log}");
        let levels: Vec<&str> = current.venue("USDAA").unwrap().divisions.find("Open").unwrap().levels.names().collect();
        assert_eq!(levels, ["Starters", "Masters"]);
    }

    #[test]
    fn multi_q_only_in_current_is_reported_not_removed() {
        let mut current = config();
        current
            .venues
            .find_mut("USDAA")
            .unwrap()
            .multi_qs
            .add(MultiQ::new("Triple Q", "QQQ"))
            .unwrap();
        let mut log = UpdateLog::new();
        assert!(!update_configuration(&mut current, &config(), &mut log));
        assert_eq!(current.venue("USDAA").unwrap().multi_qs.len(), 2);
        assert!(log.contains("Multi-Qs: 0 added, 1 pending delete, 1 skipped"), "{log}");
        assert!(log.contains("-Triple Q"));
    }
}
