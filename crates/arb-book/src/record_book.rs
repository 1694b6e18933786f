//! The record book: one configuration plus every dog's history

use crate::actions::ActionTarget;
use crate::dog::{Dog, DogList};
use crate::error::BookError;
use crate::history::HistoryContext;
use crate::schema::{attr, element};
use crate::settings::BookSettings;
use crate::trial::{Run, ScoreKind, Trial};
use crate::update::{update_configuration, UpdateLog};
use arb_config::{schema as config_schema, Configuration, Named};
use arb_scoring::{match_multi_q, FormulaRegistry, MultiQCandidate, RunOutcome, ScoreCalculator, ScoringResolver};
use arb_tree::{ArbDate, Element, ErrorCallback, SchemaVersion, TreeError};
use std::collections::BTreeMap;

/// What [`AgilityRecordBook::update`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Action commands that changed something
    pub actions_applied: usize,
    /// Whether the merge changed the configuration
    pub config_changed: bool,
    /// Runs whose recorded measurements switched to a new scoring style
    pub runs_resynced: usize,
    /// Runs removed because no rule scores them any more
    pub runs_pruned: usize,
    /// Runs now credited toward a multi-Q
    pub multi_q_runs: usize,
    pub log: UpdateLog,
}

impl UpdateReport {
    /// Check whether the book needs saving
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.actions_applied > 0 || self.config_changed || self.runs_resynced > 0 || self.runs_pruned > 0
    }
}

/// Configuration and history loaded together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgilityRecordBook {
    pub config: Configuration,
    pub dogs: DogList,
}

impl AgilityRecordBook {
    /// Create book without history
    #[inline]
    #[must_use]
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            dogs: DogList::new(),
        }
    }

    /// Add a dog
    #[inline]
    #[must_use]
    pub fn with_dog(mut self, dog: Dog) -> Self {
        self.dogs.push(dog);
        self
    }

    /// Load from an `AgilityBook` element
    ///
    /// The configuration loads first; history is then checked against it.
    ///
    /// # Errors
    /// Wrong root, missing book version, a missing or repeated
    /// `Configuration` section, or a configuration that fails to load.
    pub fn load(
        tree: &Element,
        settings: &BookSettings,
        callback: &mut dyn ErrorCallback,
    ) -> Result<Self, BookError> {
        tree.expect_name(element::BOOK)?;
        let version: SchemaVersion = tree.require(attr::BOOK_VERSION)?;

        let mut sections = tree.elements_named(config_schema::element::CONFIG);
        let section = sections
            .next()
            .ok_or(BookError::MissingSection(config_schema::element::CONFIG))?;
        if sections.next().is_some() {
            return Err(TreeError::DuplicateSection(config_schema::element::CONFIG.to_string()).into());
        }
        let config = Configuration::load(section, version, callback)?;

        let mut ctx = HistoryContext::new(&config, version, callback)
            .with_reject_unknown(settings.reject_unknown_references);
        let dogs = DogList::load(tree, &mut ctx);
        tracing::debug!(%version, dogs = dogs.len(), "record book loaded");
        Ok(Self { config, dogs })
    }

    /// Save as an `AgilityBook` element at the current schema version
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut book = Element::new(element::BOOK);
        book.add_attr(attr::BOOK_VERSION, SchemaVersion::CURRENT);
        self.config.save(&mut book);
        self.dogs.save(&mut book);
        book
    }

    /// Score `run` of `trial` with its venue's speed formula
    ///
    /// # Errors
    /// No hosting venue has a rule for the run, or the venue names an
    /// unknown formula.
    pub fn score(&self, trial: &Trial, run: &Run) -> Result<RunOutcome, BookError> {
        let (venue, rule) = trial.find_rule(&self.config, run).ok_or_else(|| {
            BookError::unknown("event", &[run.division.as_str(), &run.level, &run.event])
        })?;
        let points_type = self.config.venue(venue).map_or("", |v| v.points_type.as_str());
        let registry = FormulaRegistry::with_defaults();
        let calculator = ScoreCalculator::new(registry.select(points_type)?);
        Ok(run.outcome(rule, &calculator))
    }

    /// Bring the book in line with a shipped configuration
    ///
    /// Applies the reference's action commands, merges the reference
    /// configuration (unless the callback stopped the batch), then repairs
    /// runs: recorded measurements follow the resolved rule's style,
    /// unscorable runs are pruned and day multi-Qs are recomputed, as
    /// `settings` allow.
    pub fn update(
        &mut self,
        reference: &Configuration,
        settings: &BookSettings,
        callback: &mut dyn ErrorCallback,
    ) -> UpdateReport {
        let mut report = UpdateReport {
            log: UpdateLog::new().with_indent(settings.log_indent),
            ..UpdateReport::default()
        };
        report.actions_applied = ActionTarget::new(
            &mut self.config,
            Some(&mut self.dogs),
            &mut report.log,
            &mut *callback,
        )
        .apply_all(&reference.actions);

        if callback.can_continue() {
            report.config_changed = update_configuration(&mut self.config, reference, &mut report.log);
        }

        let (resynced, orphans) = self.resync_runs(settings.prune_orphaned_runs);
        report.runs_resynced = resynced;
        report.runs_pruned = orphans.len();
        for message in &orphans {
            tracing::warn!("{message}");
            callback.log(message);
        }

        if settings.resync_multi_qs {
            let config = &self.config;
            report.multi_q_runs = self.dogs.iter_mut().map(|dog| resync_multi_qs(config, dog)).sum();
        }

        tracing::info!(
            actions = report.actions_applied,
            config_changed = report.config_changed,
            pruned = report.runs_pruned,
            "record book updated"
        );
        report
    }

    /// Match each run's measurement kind to its rule; collect a message per
    /// unscorable run, removing it when `prune` is set
    fn resync_runs(&mut self, prune: bool) -> (usize, Vec<String>) {
        let resolver = ScoringResolver::new(&self.config);
        let mut resynced = 0;
        let mut orphans = Vec::new();
        for dog in self.dogs.iter_mut() {
            let call_name = &dog.call_name;
            for trial in &mut dog.trials {
                let clubs = &trial.clubs;
                trial.runs.retain_mut(|run| {
                    let rule = clubs.iter().find_map(|c| {
                        resolver
                            .find(&c.venue, &run.event, &run.division, &run.level, run.date)
                            .ok()
                    });
                    if let Some(rule) = rule {
                        let kind = ScoreKind::for_style(rule.style);
                        if run.scoring.kind != kind {
                            run.scoring.kind = kind;
                            resynced += 1;
                        }
                        return true;
                    }
                    if !prune {
                        return true;
                    }
                    orphans.push(format!(
                        "dog '{call_name}': {} run {}/{}/{} no longer scores, removed",
                        run.date.map_or_else(|| "undated".to_string(), |d| d.to_string()),
                        run.division,
                        run.level,
                        run.event
                    ));
                    false
                });
            }
        }
        (resynced, orphans)
    }
}

/// A qualifying run's names and where it sits in the dog's trials
struct DayRun {
    trial: usize,
    run: usize,
    date: Option<ArbDate>,
    division: String,
    level: String,
    event: String,
}

impl MultiQCandidate for DayRun {
    fn date(&self) -> Option<ArbDate> {
        self.date
    }

    fn division(&self) -> &str {
        &self.division
    }

    fn level(&self) -> &str {
        &self.level
    }

    fn event(&self) -> &str {
        &self.event
    }
}

/// Recompute the multi-Qs each of `dog`'s runs earned
///
/// Runs are grouped per venue and day; at most one multi-Q definition is
/// credited per venue per day. Returns the number of credited runs.
fn resync_multi_qs(config: &Configuration, dog: &mut Dog) -> usize {
    for run in dog.trials.iter_mut().flat_map(|t| t.runs.iter_mut()) {
        run.multi_qs.clear();
    }

    let mut credits: Vec<(usize, usize, String)> = Vec::new();
    for venue in config.venues.iter().filter(|v| !v.multi_qs.is_empty()) {
        let mut days: BTreeMap<ArbDate, Vec<DayRun>> = BTreeMap::new();
        for (t, trial) in dog.trials.iter().enumerate() {
            if !trial.has_venue(venue.name()) {
                continue;
            }
            for (r, run) in trial.runs.iter().enumerate() {
                let Some(date) = run.date.filter(|_| run.q.is_qualified()) else {
                    continue;
                };
                days.entry(date).or_default().push(DayRun {
                    trial: t,
                    run: r,
                    date: run.date,
                    division: run.division.clone(),
                    level: run.level.clone(),
                    event: run.event.clone(),
                });
            }
        }
        for (date, mut runs) in days {
            runs.sort_by(|a, b| {
                (&a.division, &a.level, &a.event, a.trial, a.run).cmp(&(
                    &b.division,
                    &b.level,
                    &b.event,
                    b.trial,
                    b.run,
                ))
            });
            if let Some((multi_q, matched)) = venue
                .multi_qs
                .iter()
                .find_map(|m| match_multi_q(m, &mut runs).map(|matched| (m, matched)))
            {
                tracing::debug!(dog = %dog.call_name, %date, multi_q = multi_q.name(), "multi-Q earned");
                credits.extend(
                    matched
                        .into_iter()
                        .map(|m| (m.trial, m.run, multi_q.name().to_string())),
                );
            }
        }
    }

    for (t, r, name) in &credits {
        if let Some(run) = dog.trials.get_mut(*t).and_then(|trial| trial.runs.get_mut(*r)) {
            run.multi_qs.push(name.clone());
        }
    }
    credits.len()
}
