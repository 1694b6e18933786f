//! Run scoring
//!
//! Turns one run's raw measurements and its resolved [`ScoringRule`] into a
//! score, a qualification status and, for qualifying runs, the point awards.

use crate::speed::{NormalSpeed, SpeedPointsFormula};
use arb_config::{ScoringRule, ScoringStyle};
use arb_tree::ArbDate;
use serde::{Deserialize, Serialize};

/// Qualification status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QStatus {
    /// Not scored (no time recorded)
    #[default]
    NotApplicable,
    /// Met the qualifying criteria
    Qualified,
    /// Ran but did not qualify
    NotQualified,
    /// Excused from the ring
    Excused,
    /// Qualified and placed in the top 15% of the class
    SuperQualified,
}

impl QStatus {
    /// Check if the run qualified
    #[inline]
    #[must_use]
    pub fn is_qualified(self) -> bool {
        matches!(self, Self::Qualified | Self::SuperQualified)
    }
}

/// Raw numbers recorded for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMeasurements {
    /// Run date, used for rule validity windows
    pub date: Option<ArbDate>,
    /// Elapsed seconds
    pub elapsed: f64,
    /// Standard course time (opening time for point styles)
    pub sct: f64,
    /// Closing time for point styles
    pub closing_sct: f64,
    /// Faults assessed on course, excluding time faults
    pub course_faults: f64,
    /// Points earned in the opening period
    pub opening_points: u16,
    /// Points earned in the closing period
    pub closing_points: u16,
    /// Finishing place, 0 when unplaced
    pub place: u16,
    /// Number of starters in the class
    pub in_class: u16,
    /// Bonus title points earned on course
    pub bonus_points: f64,
    /// Dog was excused from the ring
    pub excused: bool,
}

impl RunMeasurements {
    /// Create empty measurements
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set run date
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: Option<ArbDate>) -> Self {
        self.date = date;
        self
    }

    /// Set elapsed and standard course time
    #[inline]
    #[must_use]
    pub fn with_time(mut self, elapsed: f64, sct: f64) -> Self {
        self.elapsed = elapsed;
        self.sct = sct;
        self
    }

    /// Set closing time (point styles)
    #[inline]
    #[must_use]
    pub fn with_closing_sct(mut self, closing_sct: f64) -> Self {
        self.closing_sct = closing_sct;
        self
    }

    /// Set course faults
    #[inline]
    #[must_use]
    pub fn with_faults(mut self, faults: f64) -> Self {
        self.course_faults = faults;
        self
    }

    /// Set earned opening/closing points
    #[inline]
    #[must_use]
    pub fn with_points(mut self, opening: u16, closing: u16) -> Self {
        self.opening_points = opening;
        self.closing_points = closing;
        self
    }

    /// Set place and class size
    #[inline]
    #[must_use]
    pub fn with_place(mut self, place: u16, in_class: u16) -> Self {
        self.place = place;
        self.in_class = in_class;
        self
    }

    /// Set bonus title points
    #[inline]
    #[must_use]
    pub fn with_bonus(mut self, bonus: f64) -> Self {
        self.bonus_points = bonus;
        self
    }

    /// Mark as excused
    #[inline]
    #[must_use]
    pub fn excused(mut self) -> Self {
        self.excused = true;
        self
    }
}

/// Points earned by a qualifying run
///
/// `title` and `lifetime` already include `bonus` when the rule awards it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunPoints {
    /// Points toward titles
    pub title: f64,
    /// Points toward lifetime awards
    pub lifetime: f64,
    /// Points for the placement
    pub placement: f64,
    /// Speed points
    pub speed: f64,
    /// Bonus title points from the course
    pub bonus: f64,
}

impl RunPoints {
    /// Title points plus speed and placement points
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.title + self.placement + self.speed
    }
}

/// Result of scoring one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Score in the rule's style (faults, or points for point styles)
    pub score: f64,
    /// Faults from exceeding course time
    pub time_faults: f64,
    /// Computed qualification
    pub q: QStatus,
    /// Present only when the run qualified
    pub points: Option<RunPoints>,
}

/// Course time time faults are measured against
fn course_time(rule: &ScoringRule, run: &RunMeasurements) -> f64 {
    if rule.style.is_time_based() {
        run.sct
    } else {
        run.sct + run.closing_sct
    }
}

/// Time faults for a run under `rule`
///
/// Only the configured directions count. With fractions dropped the elapsed
/// time is rounded in the run's favor before comparing.
#[must_use]
pub fn time_faults(rule: &ScoringRule, run: &RunMeasurements) -> f64 {
    let sct = course_time(rule, run);
    if sct <= 0.0 {
        return 0.0;
    }
    let mut faults = 0.0;
    if rule.time_faults_under {
        let time = if rule.drop_fractions { run.elapsed.ceil() } else { run.elapsed };
        faults += (sct - time).max(0.0);
    }
    if rule.time_faults_over {
        let time = if rule.drop_fractions { run.elapsed.floor() } else { run.elapsed };
        faults += (time - sct).max(0.0);
    }
    faults * rule.time_fault_multiplier
}

/// Score for a run given its time faults
#[must_use]
pub fn score(rule: &ScoringRule, run: &RunMeasurements, time_faults: f64) -> f64 {
    let faults = run.course_faults + time_faults;
    let subtracted = if rule.subtract_time_faults { time_faults } else { 0.0 };
    match rule.style {
        ScoringStyle::FaultsThenTime => faults,
        ScoringStyle::Faults100ThenTime => 100.0 - faults,
        ScoringStyle::Faults200ThenTime => 200.0 - faults,
        ScoringStyle::TimePlusFaults => run.elapsed + faults,
        ScoringStyle::OpenCloseScoreThenTime => {
            f64::from(run.opening_points) + f64::from(run.closing_points)
                - run.course_faults
                - subtracted
        }
        ScoringStyle::ScoreThenTime => f64::from(run.opening_points) - run.course_faults - subtracted,
    }
}

fn qualifies(rule: &ScoringRule, run: &RunMeasurements, time_faults: f64) -> bool {
    let faults = run.course_faults + time_faults;
    match rule.style {
        ScoringStyle::FaultsThenTime
        | ScoringStyle::Faults100ThenTime
        | ScoringStyle::Faults200ThenTime => {
            faults == 0.0 || (!rule.clean_q && rule.title_points.lookup(faults) > 0.0)
        }
        ScoringStyle::TimePlusFaults => {
            if rule.clean_q {
                faults == 0.0
            } else {
                (run.sct <= 0.0 || run.elapsed <= run.sct) && run.course_faults == 0.0
            }
        }
        ScoringStyle::OpenCloseScoreThenTime => {
            run.opening_points >= rule.opening_points && run.closing_points >= rule.closing_points
        }
        ScoringStyle::ScoreThenTime => run.opening_points >= rule.opening_points,
    }
}

fn is_super_q(rule: &ScoringRule, run: &RunMeasurements) -> bool {
    if !rule.super_q || run.place == 0 {
        return false;
    }
    // Top 15%, rounded up
    let cutoff = (u32::from(run.in_class) * 15).div_ceil(100);
    u32::from(run.place) <= cutoff
}

/// Key into the title/lifetime tables
fn title_key(rule: &ScoringRule, run: &RunMeasurements, time_faults: f64, score: f64) -> f64 {
    match rule.style {
        ScoringStyle::FaultsThenTime
        | ScoringStyle::Faults100ThenTime
        | ScoringStyle::Faults200ThenTime => run.course_faults + time_faults,
        ScoringStyle::TimePlusFaults => 0.0,
        ScoringStyle::OpenCloseScoreThenTime | ScoringStyle::ScoreThenTime => {
            let required = if rule.style == ScoringStyle::OpenCloseScoreThenTime {
                f64::from(rule.opening_points) + f64::from(rule.closing_points)
            } else {
                f64::from(rule.opening_points)
            };
            if rule.subtract_time_faults && score >= required {
                0.0
            } else {
                time_faults
            }
        }
    }
}

/// Scores runs, delegating speed points to one formula
#[derive(Debug, Clone, Copy)]
pub struct ScoreCalculator<'f> {
    formula: &'f dyn SpeedPointsFormula,
}

static NORMAL: NormalSpeed = NormalSpeed;

impl Default for ScoreCalculator<'static> {
    fn default() -> Self {
        Self::new(&NORMAL)
    }
}

impl<'f> ScoreCalculator<'f> {
    /// Calculator using `formula` for speed points
    #[inline]
    #[must_use]
    pub fn new(formula: &'f dyn SpeedPointsFormula) -> Self {
        Self { formula }
    }

    /// Speed formula in use
    #[inline]
    #[must_use]
    pub fn formula(&self) -> &'f dyn SpeedPointsFormula {
        self.formula
    }

    /// Score, qualify and award points for one run
    #[must_use]
    pub fn calculate(&self, rule: &ScoringRule, run: &RunMeasurements) -> RunOutcome {
        let tf = time_faults(rule, run);
        let score = score(rule, run, tf);
        let q = if run.excused {
            QStatus::Excused
        } else if rule.style.is_time_based() && run.elapsed <= 0.0 {
            QStatus::NotApplicable
        } else if !qualifies(rule, run, tf) {
            QStatus::NotQualified
        } else if is_super_q(rule, run) {
            QStatus::SuperQualified
        } else {
            QStatus::Qualified
        };
        let points = q.is_qualified().then(|| self.points(rule, run, tf, score));
        tracing::trace!(style = rule.style.as_str(), score, time_faults = tf, ?q, "run scored");
        RunOutcome {
            score,
            time_faults: tf,
            q,
            points,
        }
    }

    fn points(&self, rule: &ScoringRule, run: &RunMeasurements, tf: f64, score: f64) -> RunPoints {
        let key = title_key(rule, run, tf, score);
        let bonus = if rule.bonus_points { run.bonus_points } else { 0.0 };
        let placement = if run.place > 0 {
            rule.placements.get_or_catch_all(run.place).unwrap_or(0.0)
        } else {
            0.0
        };
        let speed = if rule.speed_points {
            self.formula.speed_points(rule, run)
        } else {
            0.0
        };
        RunPoints {
            title: rule.title_points.lookup(key) + bonus,
            lifetime: rule.lifetime_points.lookup(key) + bonus,
            placement,
            speed,
            bonus,
        }
    }
}
