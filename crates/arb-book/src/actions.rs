//! Applying configuration action commands
//!
//! Every command edits the configuration and cascades into recorded history
//! when history is supplied.
//!
//! # Rename
//!
//! When the target name already exists the rename becomes a merge: history
//! is repointed to the target and the source entity is removed.
//!
//! # Delete
//!
//! References are counted first. A non-zero count asks the callback to
//! confirm; a decline leaves configuration and history untouched.

use crate::dog::DogList;
use crate::update::UpdateLog;
use arb_config::{Action, ConfigAction, Configuration, ListError, Named, NamedList, Venue};
use arb_tree::ErrorCallback;

/// What an action command mutates
pub struct ActionTarget<'a> {
    config: &'a mut Configuration,
    dogs: Option<&'a mut DogList>,
    log: &'a mut UpdateLog,
    callback: &'a mut dyn ErrorCallback,
}

impl<'a> ActionTarget<'a> {
    /// Target a configuration, optionally with its history
    pub fn new(
        config: &'a mut Configuration,
        dogs: Option<&'a mut DogList>,
        log: &'a mut UpdateLog,
        callback: &'a mut dyn ErrorCallback,
    ) -> Self {
        Self {
            config,
            dogs,
            log,
            callback,
        }
    }

    /// Apply commands in order
    ///
    /// Commands gated on a configuration revision the configuration already
    /// reached are skipped. Stops early once the callback says not to
    /// continue. Returns how many commands changed something.
    pub fn apply_all(&mut self, actions: &[Action]) -> usize {
        let mut applied = 0;
        for action in actions {
            if !action.applies_to(self.config.version) {
                tracing::debug!(
                    verb = action.command.verb(),
                    gate = action.config_version,
                    "action skipped for configuration revision"
                );
                continue;
            }
            if self.apply(&action.command) {
                applied += 1;
            }
            if !self.callback.can_continue() {
                tracing::debug!(applied, "action batch stopped by callback");
                break;
            }
        }
        applied
    }

    /// Apply one command; returns whether anything changed
    pub fn apply(&mut self, action: &ConfigAction) -> bool {
        match action {
            ConfigAction::RenameOtherPoints { old, new } => self.rename_other_points(old, new),
            ConfigAction::DeleteOtherPoints { name } => self.delete_other_points(name),
            ConfigAction::RenameVenue { old, new } => self.rename_venue(old, new),
            ConfigAction::DeleteVenue { name } => self.delete_venue(name),
            ConfigAction::RenameDivision { venue, old, new } => self.rename_division(venue, old, new),
            ConfigAction::DeleteDivision { venue, name } => self.delete_division(venue, name),
            ConfigAction::RenameLevel {
                venue,
                division,
                parent,
                old,
                new,
            } => self.rename_level(venue, division, parent.as_deref(), old, new),
            ConfigAction::DeleteLevel {
                venue,
                division,
                parent,
                name,
            } => self.delete_level(venue, division, parent.as_deref(), name),
            ConfigAction::RenameTitle { venue, old, new } => self.rename_title(venue, old, new),
            ConfigAction::DeleteTitle { venue, old, new, .. } => self.delete_title(venue, old, new),
            ConfigAction::RenameEvent { venue, old, new } => self.rename_event(venue, old, new),
            ConfigAction::DeleteEvent { venue, name } => self.delete_event(venue, name),
            ConfigAction::RenameMultiQ { venue, old, new } => self.rename_multi_q(venue, old, new),
            ConfigAction::DeleteMultiQ { venue, name } => self.delete_multi_q(venue, name),
        }
    }

    fn history(&mut self, f: impl FnOnce(&mut DogList) -> usize) -> usize {
        self.dogs.as_deref_mut().map_or(0, f)
    }

    /// Ask before removing `count` references
    fn confirm_delete(&mut self, what: &str, count: usize) -> bool {
        if count == 0 {
            return true;
        }
        let message = format!("{what} is used by {count} record(s) which will be deleted. Continue?");
        let accepted = self.callback.confirm(&message);
        if !accepted {
            tracing::debug!(what, count, "delete declined");
        }
        accepted
    }

    fn renamed(&mut self, what: &str, old: &str, new: &str, merged: bool, count: usize) {
        let verb = if merged { "Merged" } else { "Renamed" };
        self.log.push(format!("{verb} {what} '{old}' to '{new}' ({count} records updated)"));
    }

    /// The configuration refused the new name; nothing was changed
    fn rename_failed(&mut self, what: &str, old: &str, new: &str, err: &ListError) -> bool {
        let message = format!("Cannot rename {what} '{old}' to '{new}': {err}");
        tracing::warn!("{message}");
        self.callback.log(&message);
        false
    }

    fn deleted(&mut self, what: &str, count: usize) {
        self.log.push(format!("Deleted {what} ({count} records removed)"));
    }

    fn venue_mut(&mut self, venue: &str) -> Option<&mut Venue> {
        self.config.venues.find_mut(venue)
    }

    fn rename_other_points(&mut self, old: &str, new: &str) -> bool {
        if !self.config.other_points.contains(old) {
            return false;
        }
        let merged = match rename_or_merge(&mut self.config.other_points, old, new) {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("other points", old, new, &e),
        };
        let count = self.history(|d| d.rename_other_points(old, new));
        self.renamed("other points", old, new, merged, count);
        true
    }

    fn delete_other_points(&mut self, name: &str) -> bool {
        if !self.config.other_points.contains(name) {
            return false;
        }
        let count = self.history(|d| d.count_other_points(name));
        if !self.confirm_delete(&format!("Other points '{name}'"), count) {
            return false;
        }
        let count = self.history(|d| d.delete_other_points(name));
        self.config.other_points.delete(name);
        self.deleted(&format!("other points '{name}'"), count);
        true
    }

    fn rename_venue(&mut self, old: &str, new: &str) -> bool {
        if !self.config.venues.contains(old) {
            return false;
        }
        let merged = match rename_or_merge(&mut self.config.venues, old, new) {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("venue", old, new, &e),
        };
        let count = self.history(|d| d.rename_venue(old, new));
        self.renamed("venue", old, new, merged, count);
        true
    }

    fn delete_venue(&mut self, name: &str) -> bool {
        if !self.config.venues.contains(name) {
            return false;
        }
        let count = self.history(|d| d.count_venue(name));
        if !self.confirm_delete(&format!("Venue '{name}'"), count) {
            return false;
        }
        let count = self.history(|d| d.delete_venue(name));
        self.config.venues.delete(name);
        self.deleted(&format!("venue '{name}'"), count);
        true
    }

    fn rename_division(&mut self, venue: &str, old: &str, new: &str) -> bool {
        let what = format!("{venue}/{old}");
        let result = match self.venue_mut(venue) {
            Some(v) if v.divisions.contains(old) => {
                if old != new && v.divisions.contains(new) {
                    // The target keeps its own scoring rules
                    v.merge_division(old, new);
                    Ok(true)
                } else {
                    let renamed = v.divisions.rename(old, new);
                    if renamed.is_ok() {
                        v.repoint_division(old, new);
                    }
                    renamed.map(|()| false)
                }
            }
            _ => return false,
        };
        let merged = match result {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("division", &what, new, &e),
        };
        let count = self.history(|d| d.rename_division(venue, old, new));
        self.renamed("division", &what, new, merged, count);
        true
    }

    fn delete_division(&mut self, venue: &str, name: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.divisions.contains(name)) {
            return false;
        }
        let what = format!("{venue}/{name}");
        let count = self.history(|d| d.count_division(venue, name));
        if !self.confirm_delete(&format!("Division '{what}'"), count) {
            return false;
        }
        let config = &*self.config;
        let count = self
            .dogs
            .as_deref_mut()
            .map_or(0, |d| d.delete_division(config, venue, name));
        if let Some(v) = self.venue_mut(venue) {
            v.delete_division(name);
        }
        self.deleted(&format!("division '{what}'"), count);
        true
    }

    fn rename_level(
        &mut self,
        venue: &str,
        division: &str,
        parent: Option<&str>,
        old: &str,
        new: &str,
    ) -> bool {
        let Some(found) = self
            .venue_mut(venue)
            .and_then(|v| level_entry(v, division, parent, old, new))
        else {
            return false;
        };
        let what = format!("{venue}/{division}/{old}");
        let Some(v) = self.venue_mut(venue) else {
            return false;
        };
        let result = match (found.target_exists, parent) {
            (true, None) => {
                v.merge_level(division, old, new);
                Ok(())
            }
            (true, Some(_)) => {
                v.repoint_level(division, old, new, true);
                remove_level_entry(v, division, parent, old);
                Ok(())
            }
            (false, _) => {
                let renamed = v.rename_level_entry(division, parent, old, new);
                if renamed.is_ok() {
                    v.repoint_level(division, old, new, parent.is_some());
                }
                renamed
            }
        };
        if let Err(e) = result {
            return self.rename_failed("level", &what, new, &e);
        }
        let count = if found.is_leaf {
            self.history(|d| d.rename_level(venue, division, old, new))
        } else {
            0
        };
        self.renamed("level", &what, new, found.target_exists, count);
        true
    }

    fn delete_level(&mut self, venue: &str, division: &str, parent: Option<&str>, name: &str) -> bool {
        let Some(leaves) = self.venue_mut(venue).and_then(|v| {
            let div = v.divisions.find(division)?;
            match parent {
                Some(parent) => div
                    .levels
                    .find(parent)
                    .filter(|l| l.sub_levels.contains(name))
                    .map(|_| vec![name.to_string()]),
                None => div
                    .levels
                    .find(name)
                    .map(|l| l.leaf_names().into_iter().map(String::from).collect::<Vec<_>>()),
            }
        }) else {
            return false;
        };
        let what = format!("{venue}/{division}/{name}");
        let count = self.history(|d| {
            leaves
                .iter()
                .map(|leaf| d.count_level(venue, division, leaf))
                .sum()
        });
        if !self.confirm_delete(&format!("Level '{what}'"), count) {
            return false;
        }
        let count = self.history(|d| {
            leaves
                .iter()
                .map(|leaf| d.delete_level(venue, division, leaf))
                .sum()
        });
        if let Some(v) = self.venue_mut(venue) {
            match parent {
                Some(parent) => {
                    remove_level_entry(v, division, Some(parent), name);
                    for multi_q in &mut v.multi_qs {
                        multi_q.delete_level(division, name);
                    }
                }
                None => {
                    v.delete_level(division, name);
                }
            }
        }
        self.deleted(&format!("level '{what}'"), count);
        true
    }

    fn rename_title(&mut self, venue: &str, old: &str, new: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.titles.contains(old)) {
            return false;
        }
        let what = format!("{venue}/{old}");
        let Some(v) = self.venue_mut(venue) else {
            return false;
        };
        let merged = match rename_or_merge(&mut v.titles, old, new) {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("title", &what, new, &e),
        };
        let count = self.history(|d| d.rename_title(venue, old, new));
        self.renamed("title", &what, new, merged, count);
        true
    }

    /// With a replacement name, earned titles move to it without asking
    fn delete_title(&mut self, venue: &str, old: &str, new: &str) -> bool {
        let known = self.venue_mut(venue).is_some_and(|v| v.titles.contains(old));
        let what = format!("{venue}/{old}");
        let count = if new.is_empty() {
            if !known {
                return false;
            }
            let count = self.history(|d| d.count_title(venue, old));
            if !self.confirm_delete(&format!("Title '{what}'"), count) {
                return false;
            }
            self.history(|d| d.delete_title(venue, old))
        } else {
            let count = self.history(|d| d.rename_title(venue, old, new));
            if count > 0 {
                self.renamed("earned title", &what, new, false, count);
            }
            count
        };
        if known {
            if let Some(v) = self.venue_mut(venue) {
                v.titles.delete(old);
            }
            self.deleted(&format!("title '{what}'"), if new.is_empty() { count } else { 0 });
        }
        known || count > 0
    }

    fn rename_event(&mut self, venue: &str, old: &str, new: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.events.contains(old)) {
            return false;
        }
        let what = format!("{venue}/{old}");
        let Some(v) = self.venue_mut(venue) else {
            return false;
        };
        let merged = match rename_or_merge(&mut v.events, old, new) {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("event", &what, new, &e),
        };
        v.repoint_event(old, new);
        let count = self.history(|d| d.rename_event(venue, old, new));
        self.renamed("event", &what, new, merged, count);
        true
    }

    fn delete_event(&mut self, venue: &str, name: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.events.contains(name)) {
            return false;
        }
        let what = format!("{venue}/{name}");
        let count = self.history(|d| d.count_event(venue, name));
        if !self.confirm_delete(&format!("Event '{what}'"), count) {
            return false;
        }
        let count = self.history(|d| d.delete_event(venue, name));
        if let Some(v) = self.venue_mut(venue) {
            v.delete_event(name);
        }
        self.deleted(&format!("event '{what}'"), count);
        true
    }

    fn rename_multi_q(&mut self, venue: &str, old: &str, new: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.multi_qs.contains(old)) {
            return false;
        }
        let what = format!("{venue}/{old}");
        let Some(v) = self.venue_mut(venue) else {
            return false;
        };
        let merged = match rename_or_merge(&mut v.multi_qs, old, new) {
            Ok(merged) => merged,
            Err(e) => return self.rename_failed("multi-Q", &what, new, &e),
        };
        let count = self.history(|d| d.rename_multi_q(venue, old, new));
        self.renamed("multi-Q", &what, new, merged, count);
        true
    }

    fn delete_multi_q(&mut self, venue: &str, name: &str) -> bool {
        if !self.venue_mut(venue).is_some_and(|v| v.multi_qs.contains(name)) {
            return false;
        }
        let what = format!("{venue}/{name}");
        let count = self.history(|d| d.count_multi_q(venue, name));
        if !self.confirm_delete(&format!("Multi-Q '{what}'"), count) {
            return false;
        }
        let count = self.history(|d| d.delete_multi_q(venue, name));
        if let Some(v) = self.venue_mut(venue) {
            v.multi_qs.delete(name);
        }
        self.deleted(&format!("multi-Q '{what}'"), count);
        true
    }
}

impl std::fmt::Debug for ActionTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTarget")
            .field("config_version", &self.config.version)
            .field("has_history", &self.dogs.is_some())
            .finish_non_exhaustive()
    }
}

/// Rename in place, or drop `old` when `new` already exists; returns
/// whether it merged
fn rename_or_merge<T: Named>(list: &mut NamedList<T>, old: &str, new: &str) -> Result<bool, ListError> {
    if old != new && list.contains(new) {
        list.delete(old);
        return Ok(true);
    }
    list.rename(old, new)?;
    Ok(false)
}

struct LevelEntry {
    is_leaf: bool,
    target_exists: bool,
}

/// Locate the level (or sub-level of `parent`) being renamed
fn level_entry(venue: &Venue, division: &str, parent: Option<&str>, old: &str, new: &str) -> Option<LevelEntry> {
    let div = venue.divisions.find(division)?;
    match parent {
        Some(parent) => {
            let level = div.levels.find(parent)?;
            level.sub_levels.contains(old).then(|| LevelEntry {
                is_leaf: true,
                target_exists: old != new && level.sub_levels.contains(new),
            })
        }
        None => div.levels.find(old).map(|level| LevelEntry {
            is_leaf: level.is_leaf(),
            target_exists: old != new && div.levels.contains(new),
        }),
    }
}

fn remove_level_entry(venue: &mut Venue, division: &str, parent: Option<&str>, name: &str) {
    let Some(div) = venue.divisions.find_mut(division) else {
        return;
    };
    match parent {
        Some(parent) => {
            if let Some(level) = div.levels.find_mut(parent) {
                level.sub_levels.delete(name);
            }
        }
        None => {
            div.levels.delete(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dog::Dog;
    use crate::trial::{Club, Run, Trial};
    use arb_config::{Division, Level, MultiQ, OtherPoints};
    use arb_tree::{ArbDate, MessageLog};
    use pretty_assertions::assert_eq;

    /// Declines every confirmation
    #[derive(Default)]
    struct Decline {
        asked: usize,
    }

    impl ErrorCallback for Decline {
        fn log(&mut self, _message: &str) {}

        fn confirm(&mut self, _message: &str) -> bool {
            self.asked += 1;
            false
        }
    }

    fn config() -> Configuration {
        let mut venue = Venue::new("AKC");
        let mut division = Division::new("Standard");
        division
            .levels
            .add(Level::new("Novice").with_sub_levels(&["Novice A", "Novice B"]).unwrap())
            .unwrap();
        division.levels.add(Level::new("Open")).unwrap();
        venue.divisions.add(division).unwrap();
        venue
            .multi_qs
            .add(MultiQ::new("Double Q", "QQ").with_item("Standard", "Novice A", "JWW").unwrap())
            .unwrap();
        let mut config = Configuration::new();
        config.venues.add(venue).unwrap();
        config.other_points.add(OtherPoints::new("Top Ten")).unwrap();
        config
    }

    fn dogs() -> DogList {
        let run = Run::new(ArbDate::from_ymd(2021, 6, 5), "Standard", "Novice A", "JWW");
        let trial = Trial::new(Club::new("Club", "AKC")).with_run(run);
        DogList::from_iter([Dog::new("Tess").with_trial(trial)])
    }

    #[test]
    fn sub_level_rename_follows_multi_q_items() {
        let mut config = config();
        let mut dogs = dogs();
        let mut log = UpdateLog::new();
        let mut callback = MessageLog::new();
        let changed = ActionTarget::new(&mut config, Some(&mut dogs), &mut log, &mut callback).apply(
            &ConfigAction::RenameLevel {
                venue: "AKC".into(),
                division: "Standard".into(),
                parent: Some("Novice".into()),
                old: "Novice A".into(),
                new: "Novice Preferred".into(),
            },
        );
        assert!(changed);
        let venue = config.venue("AKC").unwrap();
        assert!(venue.find_level("Standard", "Novice Preferred").is_some());
        assert!(venue
            .multi_qs
            .find("Double Q")
            .unwrap()
            .has_item("Standard", "Novice Preferred", "JWW"));
        assert_eq!(dogs.find("Tess").unwrap().trials[0].runs[0].level, "Novice Preferred");
        assert!(log.contains("(1 records updated)"));
    }

    #[test]
    fn refused_rename_changes_nothing() {
        let mut config = config();
        let mut dogs = dogs();
        let mut log = UpdateLog::new();
        let mut callback = MessageLog::new();
        let mut target = ActionTarget::new(&mut config, Some(&mut dogs), &mut log, &mut callback);
        assert!(!target.apply(&ConfigAction::RenameLevel {
            venue: "AKC".into(),
            division: "Standard".into(),
            parent: Some("Novice".into()),
            old: "Novice A".into(),
            new: String::new(),
        }));
        assert!(!target.apply(&ConfigAction::RenameDivision {
            venue: "AKC".into(),
            old: "Standard".into(),
            new: String::new(),
        }));
        assert!(!target.apply(&ConfigAction::RenameOtherPoints {
            old: "Top Ten".into(),
            new: String::new(),
        }));
        assert_eq!(config, self::config());
        assert_eq!(dogs, self::dogs());
        assert!(log.is_empty(), "{log}");
        let messages = callback.joined();
        assert!(messages.contains("Cannot rename level 'AKC/Standard/Novice A' to '': name is empty"), "{messages}");
        assert!(messages.contains("Cannot rename division 'AKC/Standard'"), "{messages}");
    }

    #[test]
    fn declined_delete_leaves_everything() {
        let mut config = config();
        let mut dogs = dogs();
        let mut log = UpdateLog::new();
        let mut callback = Decline::default();
        let changed = ActionTarget::new(&mut config, Some(&mut dogs), &mut log, &mut callback).apply(
            &ConfigAction::DeleteLevel {
                venue: "AKC".into(),
                division: "Standard".into(),
                parent: None,
                name: "Novice".into(),
            },
        );
        assert!(!changed);
        assert_eq!(callback.asked, 1);
        assert_eq!(config, self::config());
        assert_eq!(dogs, self::dogs());
        assert!(log.is_empty());
    }

    #[test]
    fn unreferenced_delete_never_asks() {
        let mut config = config();
        let mut log = UpdateLog::new();
        let mut callback = Decline::default();
        let mut target = ActionTarget::new(&mut config, None, &mut log, &mut callback);
        assert!(target.apply(&ConfigAction::DeleteOtherPoints { name: "Top Ten".into() }));
        assert!(!target.apply(&ConfigAction::DeleteOtherPoints { name: "Top Ten".into() }));
        assert_eq!(callback.asked, 0);
        assert!(config.other_points.is_empty());
    }

    #[test]
    fn gated_actions_skip_newer_configurations() {
        let mut config = config().with_version(4);
        let mut log = UpdateLog::new();
        let mut callback = MessageLog::new();
        let actions = [
            Action::new(ConfigAction::RenameOtherPoints {
                old: "Top Ten".into(),
                new: "Top 10".into(),
            })
            .with_config_version(4),
            Action::new(ConfigAction::RenameVenue {
                old: "AKC".into(),
                new: "American Kennel Club".into(),
            })
            .with_config_version(5),
        ];
        let applied = ActionTarget::new(&mut config, None, &mut log, &mut callback).apply_all(&actions);
        assert_eq!(applied, 1);
        assert!(config.other_points.contains("Top Ten"));
        assert!(config.venue("American Kennel Club").is_some());
    }

    #[test]
    fn delete_title_with_replacement_moves_earned_titles() {
        let mut config = config();
        config
            .venues
            .find_mut("AKC")
            .unwrap()
            .titles
            .add(arb_config::Title::new("NAP"))
            .unwrap();
        let mut dogs = dogs();
        for dog in dogs.iter_mut() {
            dog.titles.push(crate::dog::DogTitle::new("AKC", "NAP", None));
        }
        let mut log = UpdateLog::new();
        let mut callback = Decline::default();
        let changed = ActionTarget::new(&mut config, Some(&mut dogs), &mut log, &mut callback).apply(
            &ConfigAction::DeleteTitle {
                venue: "AKC".into(),
                division: None,
                old: "NAP".into(),
                new: "NA".into(),
            },
        );
        assert!(changed);
        assert_eq!(callback.asked, 0);
        assert_eq!(dogs.find("Tess").unwrap().titles[0].name, "NA");
        assert!(!config.venue("AKC").unwrap().titles.contains("NAP"));
    }
}
