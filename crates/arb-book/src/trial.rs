//! Trials and the runs recorded at them
//!
//! A run stores names only. Which venue's configuration applies comes from
//! the hosting clubs of its trial: the first club whose venue can score the
//! run wins.

use crate::error::BookError;
use crate::history::{add_if_not_empty, add_text_if_not_empty, child_text, HistoryContext};
use crate::schema::{attr, element};
use arb_config::{Configuration, LoadError, ScoringRule, ScoringStyle};
use arb_scoring::{QStatus, RunMeasurements, RunOutcome, ScoreCalculator, ScoringResolver};
use arb_tree::{ArbDate, Element};
use serde::{Deserialize, Serialize};

/// Hosting club of a trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub name: String,
    pub venue: String,
}

impl Club {
    /// Create club
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, venue: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            venue: venue.into(),
        }
    }
}

/// Which measurements a run records, following its rule's style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScoreKind {
    /// Faults and time
    #[default]
    ByTime,
    /// Opening and closing point totals
    ByOpenClose,
    /// A single point total
    ByPoints,
}

impl ScoreKind {
    /// Kind recorded under a scoring style
    #[must_use]
    pub fn for_style(style: ScoringStyle) -> Self {
        match style {
            ScoringStyle::OpenCloseScoreThenTime => Self::ByOpenClose,
            ScoringStyle::ScoreThenTime => Self::ByPoints,
            ScoringStyle::FaultsThenTime
            | ScoringStyle::Faults100ThenTime
            | ScoringStyle::Faults200ThenTime
            | ScoringStyle::TimePlusFaults => Self::ByTime,
        }
    }

    fn element(self) -> &'static str {
        match self {
            Self::ByTime => element::BY_TIME,
            Self::ByOpenClose => element::BY_OPEN_CLOSE,
            Self::ByPoints => element::BY_POINTS,
        }
    }

    fn from_element(name: &str) -> Option<Self> {
        match name {
            element::BY_TIME => Some(Self::ByTime),
            element::BY_OPEN_CLOSE => Some(Self::ByOpenClose),
            element::BY_POINTS => Some(Self::ByPoints),
            _ => None,
        }
    }
}

/// Raw measurements of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunScoring {
    pub kind: ScoreKind,
    pub course_faults: f64,
    pub time: f64,
    /// Table counted in the recorded time
    pub table: bool,
    pub sct: f64,
    /// Closing course time for opening/closing classes
    pub sct2: f64,
    pub yards: f64,
    pub need_open: u16,
    pub need_close: u16,
    pub open: u16,
    pub close: u16,
    pub bonus: f64,
}

impl RunScoring {
    /// Faults-and-time scoring
    #[must_use]
    pub fn by_time(time: f64, sct: f64, course_faults: f64) -> Self {
        Self {
            kind: ScoreKind::ByTime,
            time,
            sct,
            course_faults,
            ..Self::default()
        }
    }

    /// Point-total scoring
    #[must_use]
    pub fn by_points(need: u16, got: u16) -> Self {
        Self {
            kind: ScoreKind::ByPoints,
            need_open: need,
            open: got,
            ..Self::default()
        }
    }

    fn load(tree: &Element, kind: ScoreKind) -> Result<Self, LoadError> {
        let num = |name: &str| -> Result<f64, LoadError> { Ok(tree.optional(name)?.unwrap_or(0.0)) };
        let pts = |name: &str| -> Result<u16, LoadError> { Ok(tree.optional(name)?.unwrap_or(0)) };
        let mut scoring = Self {
            kind,
            course_faults: num(attr::SCORING_FAULTS)?,
            time: num(attr::SCORING_TIME)?,
            bonus: num(attr::SCORING_BONUS)?,
            sct: num(attr::SCORING_SCT)?,
            ..Self::default()
        };
        match kind {
            ScoreKind::ByTime => {
                scoring.table = tree.optional(attr::SCORING_HAS_TABLE)?.unwrap_or(false);
                scoring.yards = num(attr::SCORING_YARDS)?;
            }
            ScoreKind::ByOpenClose => {
                scoring.sct2 = num(attr::SCORING_SCT2)?;
                scoring.need_open = pts(attr::NEED_OPEN)?;
                scoring.need_close = pts(attr::NEED_CLOSE)?;
                scoring.open = pts(attr::GOT_OPEN)?;
                scoring.close = pts(attr::GOT_CLOSE)?;
            }
            ScoreKind::ByPoints => {
                scoring.need_open = pts(attr::NEED_POINTS)?;
                scoring.open = pts(attr::GOT_POINTS)?;
            }
        }
        Ok(scoring)
    }

    fn save(&self, parent: &mut Element) {
        let e = parent.add_child(self.kind.element());
        match self.kind {
            ScoreKind::ByTime => {
                if self.table {
                    e.add_attr(attr::SCORING_HAS_TABLE, true);
                }
                e.add_attr(attr::SCORING_FAULTS, self.course_faults)
                    .add_attr(attr::SCORING_TIME, self.time)
                    .add_attr(attr::SCORING_SCT, self.sct)
                    .add_attr(attr::SCORING_YARDS, self.yards);
            }
            ScoreKind::ByOpenClose => {
                e.add_attr(attr::SCORING_FAULTS, self.course_faults)
                    .add_attr(attr::SCORING_TIME, self.time)
                    .add_attr(attr::SCORING_SCT, self.sct)
                    .add_attr(attr::SCORING_SCT2, self.sct2)
                    .add_attr(attr::NEED_OPEN, self.need_open)
                    .add_attr(attr::NEED_CLOSE, self.need_close)
                    .add_attr(attr::GOT_OPEN, self.open)
                    .add_attr(attr::GOT_CLOSE, self.close);
            }
            ScoreKind::ByPoints => {
                e.add_attr(attr::SCORING_FAULTS, self.course_faults)
                    .add_attr(attr::SCORING_TIME, self.time)
                    .add_attr(attr::SCORING_SCT, self.sct)
                    .add_attr(attr::NEED_POINTS, self.need_open)
                    .add_attr(attr::GOT_POINTS, self.open);
            }
        }
        e.add_attr(attr::SCORING_BONUS, self.bonus);
    }
}

/// Other points earned at one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOtherPoints {
    pub name: String,
    pub points: f64,
}

/// One recorded run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub date: Option<ArbDate>,
    pub division: String,
    /// Leaf level entered (a sub-level when the level is split)
    pub level: String,
    pub height: String,
    pub event: String,
    pub sub_name: String,
    pub conditions: String,
    pub judge: String,
    pub handler: String,
    pub partners: Vec<String>,
    pub note: String,
    pub scoring: RunScoring,
    pub q: QStatus,
    pub place: u16,
    pub in_class: u16,
    pub dogs_qd: Option<u16>,
    pub other_points: Vec<RunOtherPoints>,
    /// Multi-Qs earned with this run; recomputed, never saved
    #[serde(skip)]
    pub multi_qs: Vec<String>,
}

impl Run {
    /// Create a run entered at (division, level, event)
    #[must_use]
    pub fn new(date: Option<ArbDate>, division: &str, level: &str, event: &str) -> Self {
        Self {
            date,
            division: division.to_string(),
            level: level.to_string(),
            event: event.to_string(),
            ..Self::default()
        }
    }

    /// Set the raw measurements
    #[inline]
    #[must_use]
    pub fn with_scoring(mut self, scoring: RunScoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set qualification status and placement
    #[inline]
    #[must_use]
    pub fn with_result(mut self, q: QStatus, place: u16, in_class: u16) -> Self {
        self.q = q;
        self.place = place;
        self.in_class = in_class;
        self
    }

    /// Measurements as the scoring engine sees them
    #[must_use]
    pub fn measurements(&self) -> RunMeasurements {
        let s = &self.scoring;
        let mut m = RunMeasurements::new()
            .with_date(self.date)
            .with_time(s.time, s.sct)
            .with_closing_sct(s.sct2)
            .with_faults(s.course_faults)
            .with_points(s.open, s.close)
            .with_place(self.place, self.in_class)
            .with_bonus(s.bonus);
        if self.q == QStatus::Excused {
            m = m.excused();
        }
        m
    }

    /// Score this run under `rule`
    #[must_use]
    pub fn outcome(&self, rule: &ScoringRule, calculator: &ScoreCalculator<'_>) -> RunOutcome {
        calculator.calculate(rule, &self.measurements())
    }

    /// Total of the other points earned at this run
    #[must_use]
    pub fn other_points_total(&self) -> f64 {
        self.other_points.iter().map(|o| o.points).sum()
    }

    fn load(tree: &Element, clubs: &[Club], ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::RUN)?;
        let mut run = Self::new(
            Some(tree.require(attr::RUN_DATE)?),
            &tree.require::<String>(attr::RUN_DIVISION)?,
            &tree.require::<String>(attr::RUN_LEVEL)?,
            &tree.require::<String>(attr::RUN_EVENT)?,
        );
        run.height = tree.optional(attr::RUN_HEIGHT)?.unwrap_or_default();
        run.sub_name = tree.optional(attr::RUN_SUBNAME)?.unwrap_or_default();

        for child in tree.elements() {
            match child.name() {
                element::CONDITIONS => run.conditions = child.text(),
                element::JUDGE => run.judge = child.text(),
                element::HANDLER => run.handler = child.text(),
                element::PARTNER => run.partners.push(child.text()),
                element::NOTE => run.note = child.text(),
                element::PLACEMENT => run.load_placement(child)?,
                name => {
                    if let Some(kind) = ScoreKind::from_element(name) {
                        run.scoring = RunScoring::load(child, kind)?;
                    }
                }
            }
        }

        let venue = Trial::scoring_venue(clubs, ctx.config(), &run).map(str::to_string);
        match venue {
            Some(venue) => run.check_table(ctx, &venue),
            None if ctx.rejects_unknown() => {
                let venues: Vec<&str> = clubs.iter().map(|c| c.venue.as_str()).collect();
                return Err(BookError::unknown(
                    "event",
                    &[&venues.join("|"), &run.division, &run.level, &run.event],
                ));
            }
            None => {}
        }
        Ok(run)
    }

    fn check_table(&mut self, ctx: &mut HistoryContext<'_>, venue: &str) {
        if !self.scoring.table {
            return;
        }
        let has_table = ctx
            .config()
            .venue(venue)
            .and_then(|v| v.events.find(&self.event))
            .is_some_and(|e| e.has_table);
        if !has_table {
            self.scoring.table = false;
            let date = self.date.map(|d| d.to_string()).unwrap_or_default();
            ctx.log(&format!(
                "run {date} {venue}/{}/{}/{}: event has no table, table flag cleared",
                self.division, self.level, self.event
            ));
        }
    }

    fn load_placement(&mut self, tree: &Element) -> Result<(), LoadError> {
        let q: String = tree.require(attr::PLACEMENT_Q)?;
        self.q = parse_q(&q).ok_or_else(|| LoadError::UnknownValue {
            kind: "qualification",
            value: q.clone(),
        })?;
        self.place = tree.optional(attr::PLACEMENT_PLACE)?.unwrap_or(0);
        self.in_class = tree.optional(attr::PLACEMENT_IN_CLASS)?.unwrap_or(0);
        self.dogs_qd = tree.optional(attr::PLACEMENT_DOGS_QD)?;
        for other in tree.elements_named(element::RUN_OTHER_POINTS) {
            self.other_points.push(RunOtherPoints {
                name: other.require(attr::OTHER_POINTS_NAME)?,
                points: other.optional(attr::OTHER_POINTS_POINTS)?.unwrap_or(0.0),
            });
        }
        Ok(())
    }

    fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::RUN);
        if let Some(date) = self.date {
            e.add_attr(attr::RUN_DATE, date);
        }
        e.add_attr(attr::RUN_DIVISION, &self.division)
            .add_attr(attr::RUN_LEVEL, &self.level);
        add_if_not_empty(e, attr::RUN_HEIGHT, &self.height);
        e.add_attr(attr::RUN_EVENT, &self.event);
        add_if_not_empty(e, attr::RUN_SUBNAME, &self.sub_name);
        add_text_if_not_empty(e, element::CONDITIONS, &self.conditions);
        add_text_if_not_empty(e, element::JUDGE, &self.judge);
        add_text_if_not_empty(e, element::HANDLER, &self.handler);
        for partner in &self.partners {
            e.add_text_child(element::PARTNER, partner);
        }
        self.scoring.save(e);

        let placement = e.add_child(element::PLACEMENT);
        placement.add_attr(attr::PLACEMENT_Q, q_text(self.q));
        placement
            .add_attr(attr::PLACEMENT_PLACE, self.place)
            .add_attr(attr::PLACEMENT_IN_CLASS, self.in_class);
        if let Some(dogs_qd) = self.dogs_qd {
            placement.add_attr(attr::PLACEMENT_DOGS_QD, dogs_qd);
        }
        for other in &self.other_points {
            placement
                .add_child(element::RUN_OTHER_POINTS)
                .add_attr(attr::OTHER_POINTS_NAME, &other.name)
                .add_attr(attr::OTHER_POINTS_POINTS, other.points);
        }
        add_text_if_not_empty(e, element::NOTE, &self.note);
    }
}

fn q_text(q: QStatus) -> &'static str {
    match q {
        QStatus::NotApplicable => "NA",
        QStatus::Qualified => "Q",
        QStatus::NotQualified => "NQ",
        QStatus::Excused => "E",
        QStatus::SuperQualified => "SQ",
    }
}

fn parse_q(text: &str) -> Option<QStatus> {
    match text {
        "NA" => Some(QStatus::NotApplicable),
        "Q" => Some(QStatus::Qualified),
        // Did-not-run is kept as a non-qualifying run
        "NQ" | "DNR" => Some(QStatus::NotQualified),
        "E" => Some(QStatus::Excused),
        "SQ" => Some(QStatus::SuperQualified),
        _ => None,
    }
}

/// A competition weekend or day hosted by one or more clubs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub location: String,
    pub note: String,
    pub verified: bool,
    pub clubs: Vec<Club>,
    pub runs: Vec<Run>,
}

impl Trial {
    /// Create trial hosted by `club`
    #[must_use]
    pub fn new(club: Club) -> Self {
        Self {
            clubs: vec![club],
            ..Self::default()
        }
    }

    /// Append a run
    #[inline]
    #[must_use]
    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    /// Check if any hosting club belongs to `venue`
    #[inline]
    #[must_use]
    pub fn has_venue(&self, venue: &str) -> bool {
        self.clubs.iter().any(|c| c.venue == venue)
    }

    /// Venue of the first club whose configuration can score `run`
    #[must_use]
    pub fn scoring_venue<'c>(clubs: &'c [Club], config: &Configuration, run: &Run) -> Option<&'c str> {
        let resolver = ScoringResolver::new(config);
        clubs
            .iter()
            .find(|c| resolver.verify(&c.venue, &run.event, &run.division, &run.level, run.date))
            .map(|c| c.venue.as_str())
    }

    /// Rule scoring `run` and the venue it came from
    #[must_use]
    pub fn find_rule<'a>(&self, config: &'a Configuration, run: &Run) -> Option<(&str, &'a ScoringRule)> {
        let resolver = ScoringResolver::new(config);
        self.clubs.iter().find_map(|c| {
            resolver
                .find(&c.venue, &run.event, &run.division, &run.level, run.date)
                .ok()
                .map(|rule| (c.venue.as_str(), rule))
        })
    }

    /// Load from a `Trial` element; rejected runs are logged and dropped
    ///
    /// # Errors
    /// Malformed trial attributes, or a club of an unknown venue.
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::TRIAL)?;
        let mut trial = Self {
            verified: tree.optional(attr::TRIAL_VERIFIED)?.unwrap_or(false),
            location: child_text(tree, element::LOCATION),
            note: child_text(tree, element::NOTE),
            ..Self::default()
        };
        for club in tree.elements_named(element::CLUB) {
            let club = Club::new(club.text(), club.require::<String>(attr::CLUB_VENUE)?);
            if ctx.rejects_unknown() && ctx.config().venue(&club.venue).is_none() {
                return Err(BookError::unknown("venue", &[&club.venue]));
            }
            trial.clubs.push(club);
        }
        let clubs = trial.clubs.clone();
        trial.runs = ctx.load_each(tree, element::RUN, "run", |e, ctx| Run::load(e, &clubs, ctx));
        Ok(trial)
    }

    /// Append as a `Trial` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::TRIAL);
        e.add_attr(attr::TRIAL_VERIFIED, self.verified);
        add_text_if_not_empty(e, element::LOCATION, &self.location);
        add_text_if_not_empty(e, element::NOTE, &self.note);
        for club in &self.clubs {
            e.add_text_child(element::CLUB, &club.name)
                .add_attr(attr::CLUB_VENUE, &club.venue);
        }
        for run in &self.runs {
            run.save(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_config::{Division, Event, Level, MatchKey, Venue};
    use arb_tree::{MessageLog, SchemaVersion};
    use pretty_assertions::assert_eq;

    fn config() -> Configuration {
        let mut venue = Venue::new("USDAA");
        let mut division = Division::new("Championship");
        division.levels.add(Level::new("Masters")).unwrap();
        venue.divisions.add(division).unwrap();
        for (name, style) in [
            ("Standard", ScoringStyle::FaultsThenTime),
            ("Gamblers", ScoringStyle::OpenCloseScoreThenTime),
        ] {
            venue
                .events
                .add(Event::new(name).with_scoring(ScoringRule::new(
                    MatchKey::Wildcard,
                    MatchKey::Wildcard,
                    style,
                )))
                .unwrap();
        }
        let mut config = Configuration::new();
        config.venues.add(venue).unwrap();
        config
    }

    fn trial() -> Trial {
        let date = ArbDate::from_ymd(2019, 5, 4);
        let mut run = Run::new(date, "Championship", "Masters", "Standard")
            .with_scoring(RunScoring::by_time(31.2, 40.0, 0.0))
            .with_result(QStatus::Qualified, 1, 14);
        run.judge = "Smith".into();
        run.partners.push("Rex".into());
        run.other_points.push(RunOtherPoints {
            name: "Top Ten".into(),
            points: 2.0,
        });
        run.dogs_qd = Some(6);
        let mut trial = Trial::new(Club::new("Paws", "USDAA")).with_run(run);
        trial.location = "Fairgrounds".into();
        trial
    }

    fn reload(trial: &Trial, config: &Configuration, log: &mut MessageLog) -> Trial {
        let mut parent = Element::new("Dog");
        trial.save(&mut parent);
        let mut ctx = HistoryContext::new(config, SchemaVersion::CURRENT, log);
        Trial::load(parent.first_named(element::TRIAL).unwrap(), &mut ctx).unwrap()
    }

    #[test]
    fn save_then_load_is_identity() {
        let config = config();
        let mut log = MessageLog::new();
        assert_eq!(reload(&trial(), &config, &mut log), trial());
        assert!(log.is_empty(), "{}", log.joined());
    }

    #[test]
    fn run_outside_configuration_is_dropped() {
        let config = config();
        let mut t = trial();
        t.runs.push(Run::new(ArbDate::from_ymd(2019, 5, 5), "Championship", "Masters", "Snooker"));
        let mut log = MessageLog::new();
        let loaded = reload(&t, &config, &mut log);
        assert_eq!(loaded.runs.len(), 1);
        assert!(log.joined().contains("Snooker"));
    }

    #[test]
    fn table_flag_cleared_without_event_table() {
        let config = config();
        let mut t = trial();
        t.runs[0].scoring.table = true;
        let mut log = MessageLog::new();
        let loaded = reload(&t, &config, &mut log);
        assert!(!loaded.runs[0].scoring.table);
        assert!(log.joined().contains("table flag cleared"));
    }

    #[test]
    fn rule_found_through_club_venue() {
        let config = config();
        let t = trial();
        let (venue, rule) = t.find_rule(&config, &t.runs[0]).unwrap();
        assert_eq!(venue, "USDAA");
        assert_eq!(rule.style, ScoringStyle::FaultsThenTime);
        assert_eq!(ScoreKind::for_style(ScoringStyle::OpenCloseScoreThenTime), ScoreKind::ByOpenClose);

        let outcome = t.runs[0].outcome(rule, &ScoreCalculator::default());
        assert_eq!(outcome.q, QStatus::Qualified);
    }
}
