//! Scoring rules and their point tables
//!
//! A [`ScoringRule`] is the formula in effect for one (division, level) pair of
//! an event during a date window. Identity within an event is the
//! `(division, level)` key pair; several rules may share it across time.

use crate::error::LoadError;
use crate::match_key::MatchKey;
use crate::schema::{attr, element};
use arb_tree::{in_window, ArbDate, Element};
use serde::{Deserialize, Serialize};

/// Closed set of scoring formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScoringStyle {
    /// Faults, time breaks ties
    #[default]
    FaultsThenTime,
    /// 100 minus faults
    Faults100ThenTime,
    /// 200 minus faults
    Faults200ThenTime,
    /// Opening plus closing points
    OpenCloseScoreThenTime,
    /// Accumulated points
    ScoreThenTime,
    /// Time plus faults
    TimePlusFaults,
}

impl ScoringStyle {
    /// Document text form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FaultsThenTime => "FaultsThenTime",
            Self::Faults100ThenTime => "Faults100ThenTime",
            Self::Faults200ThenTime => "Faults200ThenTime",
            Self::OpenCloseScoreThenTime => "OCScoreThenTime",
            Self::ScoreThenTime => "ScoreThenTime",
            Self::TimePlusFaults => "TimePlusFaults",
        }
    }

    /// Parse document text
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "FaultsThenTime" => Some(Self::FaultsThenTime),
            "Faults100ThenTime" => Some(Self::Faults100ThenTime),
            "Faults200ThenTime" => Some(Self::Faults200ThenTime),
            "OCScoreThenTime" => Some(Self::OpenCloseScoreThenTime),
            "ScoreThenTime" => Some(Self::ScoreThenTime),
            "TimePlusFaults" => Some(Self::TimePlusFaults),
            _ => None,
        }
    }

    /// Styles scored primarily on faults and time
    #[inline]
    #[must_use]
    pub fn is_time_based(self) -> bool {
        !matches!(self, Self::OpenCloseScoreThenTime | Self::ScoreThenTime)
    }
}

/// One row of a title/lifetime points table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsBand {
    /// Upper fault threshold for this band
    pub faults: f64,
    /// Points awarded within the band
    pub points: f64,
}

/// Band table, kept sorted ascending by fault threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsTable {
    bands: Vec<PointsBand>,
}

impl PointsTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(faults, points)` pairs
    #[must_use]
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let mut table = Self::new();
        for &(faults, points) in pairs {
            table.add(faults, points);
        }
        table
    }

    /// Insert a band; a band with the same threshold is replaced
    pub fn add(&mut self, faults: f64, points: f64) {
        let band = PointsBand { faults, points };
        match self.bands.iter().position(|b| b.faults >= faults) {
            Some(i) if (self.bands[i].faults - faults).abs() < f64::EPSILON => self.bands[i] = band,
            Some(i) => self.bands.insert(i, band),
            None => self.bands.push(band),
        }
    }

    /// Points for `key`: the first band whose threshold is at least `key`
    #[must_use]
    pub fn lookup(&self, key: f64) -> f64 {
        self.bands
            .iter()
            .find(|b| key <= b.faults)
            .map_or(0.0, |b| b.points)
    }

    /// Bands in ascending threshold order
    #[inline]
    #[must_use]
    pub fn bands(&self) -> &[PointsBand] {
        &self.bands
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    fn load_rows(tree: &Element, name: &str) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for row in tree.elements_named(name) {
            table.add(row.require(attr::FAULTS)?, row.require(attr::POINTS)?);
        }
        Ok(table)
    }

    fn save_rows(&self, parent: &mut Element, name: &str) {
        for band in &self.bands {
            parent
                .add_child(name)
                .add_attr(attr::POINTS, band.points)
                .add_attr(attr::FAULTS, band.faults);
        }
    }
}

/// Per-place value (multiplier or points)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceInfo {
    /// Finishing place; 0 is the catch-all
    pub place: u16,
    pub value: f64,
    /// Only awarded on a qualifying run
    pub must_q: bool,
}

/// Place-keyed table, kept sorted by place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceTable {
    entries: Vec<PlaceInfo>,
}

impl PlaceTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(place, value)` pairs, all requiring a Q
    #[must_use]
    pub fn from_pairs(pairs: &[(u16, f64)]) -> Self {
        let mut table = Self::new();
        for &(place, value) in pairs {
            table.add(place, value, true);
        }
        table
    }

    /// Insert an entry; an entry for the same place is replaced
    pub fn add(&mut self, place: u16, value: f64, must_q: bool) {
        let info = PlaceInfo { place, value, must_q };
        match self.entries.binary_search_by_key(&place, |e| e.place) {
            Ok(i) => self.entries[i] = info,
            Err(i) => self.entries.insert(i, info),
        }
    }

    /// Value recorded for exactly `place`
    #[must_use]
    pub fn get(&self, place: u16) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.place == place)
            .map(|e| e.value)
    }

    /// Value for `place`, falling back to the place-0 catch-all
    #[must_use]
    pub fn get_or_catch_all(&self, place: u16) -> Option<f64> {
        self.get(place).or_else(|| self.get(0))
    }

    /// Entries in place order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[PlaceInfo] {
        &self.entries
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load_rows(tree: &Element) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for row in tree.elements_named(element::PLACE_INFO) {
            table.add(
                row.require(attr::PLACE_INFO_PLACE)?,
                row.require(attr::PLACE_INFO_VALUE)?,
                row.optional(attr::PLACE_INFO_MUST_Q)?.unwrap_or(true),
            );
        }
        Ok(table)
    }

    fn save_rows(&self, parent: &mut Element) {
        for info in &self.entries {
            let e = parent.add_child(element::PLACE_INFO);
            e.add_attr(attr::PLACE_INFO_PLACE, info.place)
                .add_attr(attr::PLACE_INFO_VALUE, info.value);
            if !info.must_q {
                e.add_attr(attr::PLACE_INFO_MUST_Q, false);
            }
        }
    }
}

/// Formula and point tables for one (division, level) pair over a date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub division: MatchKey,
    pub level: MatchKey,
    pub valid_from: Option<ArbDate>,
    pub valid_to: Option<ArbDate>,
    pub note: String,
    pub style: ScoringStyle,
    pub drop_fractions: bool,
    /// Only clean runs qualify
    pub clean_q: bool,
    pub time_faults_under: bool,
    pub time_faults_over: bool,
    pub subtract_time_faults: bool,
    pub time_fault_multiplier: f64,
    pub opening_points: u16,
    pub closing_points: u16,
    pub super_q: bool,
    pub speed_points: bool,
    pub bonus_points: bool,
    /// Speed-point multipliers by place
    pub speed_multipliers: PlaceTable,
    pub title_points: PointsTable,
    pub lifetime_points: PointsTable,
    pub placements: PlaceTable,
}

impl ScoringRule {
    /// Create rule with neutral settings
    #[must_use]
    pub fn new(division: MatchKey, level: MatchKey, style: ScoringStyle) -> Self {
        Self {
            division,
            level,
            valid_from: None,
            valid_to: None,
            note: String::new(),
            style,
            drop_fractions: false,
            clean_q: false,
            time_faults_under: false,
            time_faults_over: false,
            subtract_time_faults: false,
            time_fault_multiplier: 1.0,
            opening_points: 0,
            closing_points: 0,
            super_q: false,
            speed_points: false,
            bonus_points: false,
            speed_multipliers: PlaceTable::new(),
            title_points: PointsTable::new(),
            lifetime_points: PointsTable::new(),
            placements: PlaceTable::new(),
        }
    }

    /// Set validity window
    #[inline]
    #[must_use]
    pub fn with_window(mut self, from: Option<ArbDate>, to: Option<ArbDate>) -> Self {
        self.valid_from = from;
        self.valid_to = to;
        self
    }

    /// Set title points from `(faults, points)` pairs
    #[inline]
    #[must_use]
    pub fn with_title_points(mut self, pairs: &[(f64, f64)]) -> Self {
        self.title_points = PointsTable::from_pairs(pairs);
        self
    }

    /// Set lifetime points from `(faults, points)` pairs
    #[inline]
    #[must_use]
    pub fn with_lifetime_points(mut self, pairs: &[(f64, f64)]) -> Self {
        self.lifetime_points = PointsTable::from_pairs(pairs);
        self
    }

    /// Set placement points from `(place, points)` pairs
    #[inline]
    #[must_use]
    pub fn with_placements(mut self, pairs: &[(u16, f64)]) -> Self {
        self.placements = PlaceTable::from_pairs(pairs);
        self
    }

    /// Enable time faults
    #[inline]
    #[must_use]
    pub fn with_time_faults(mut self, over: bool, under: bool, multiplier: f64) -> Self {
        self.time_faults_over = over;
        self.time_faults_under = under;
        self.time_fault_multiplier = multiplier;
        self
    }

    /// Set required opening/closing points
    #[inline]
    #[must_use]
    pub fn with_required_points(mut self, opening: u16, closing: u16) -> Self {
        self.opening_points = opening;
        self.closing_points = closing;
        self
    }

    /// Require clean runs to qualify
    #[inline]
    #[must_use]
    pub fn with_clean_q(mut self, clean_q: bool) -> Self {
        self.clean_q = clean_q;
        self
    }

    /// Enable speed points with per-place multipliers
    #[inline]
    #[must_use]
    pub fn with_speed_points(mut self, multipliers: &[(u16, f64)]) -> Self {
        self.speed_points = true;
        self.speed_multipliers = PlaceTable::from_pairs(multipliers);
        self
    }

    /// Check if this rule covers `date` (an absent date matches every rule)
    #[inline]
    #[must_use]
    pub fn is_valid_on(&self, date: Option<ArbDate>) -> bool {
        in_window(date, self.valid_from, self.valid_to)
    }

    /// Check if both rules share the same `(division, level)` identity
    #[inline]
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.division == other.division && self.level == other.level
    }

    /// Check if validity windows intersect
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let starts_before_other_ends = match (self.valid_from, other.valid_to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        };
        let other_starts_before_end = match (other.valid_from, self.valid_to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        };
        starts_before_other_ends && other_starts_before_end
    }

    /// Load from a `Scoring` element (already migrated to the current schema)
    ///
    /// # Errors
    /// Missing division/level/type, unknown style, malformed attributes.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::SCORING)?;
        let style_text: String = tree.require(attr::SCORING_TYPE)?;
        let style = ScoringStyle::parse(&style_text).ok_or(LoadError::UnknownValue {
            kind: "scoring style",
            value: style_text,
        })?;
        let flag = |name: &str| -> Result<bool, LoadError> {
            Ok(tree.optional(name)?.unwrap_or(false))
        };
        let mut rule = Self::new(
            tree.require(attr::SCORING_DIVISION)?,
            tree.require(attr::SCORING_LEVEL)?,
            style,
        );
        rule.valid_from = tree.optional(attr::VALID_FROM)?;
        rule.valid_to = tree.optional(attr::VALID_TO)?;
        rule.drop_fractions = flag(attr::SCORING_DROP_FRACTIONS)?;
        rule.clean_q = flag(attr::SCORING_CLEAN_Q)?;
        rule.time_faults_under = flag(attr::SCORING_TF_UNDER)?;
        rule.time_faults_over = flag(attr::SCORING_TF_OVER)?;
        rule.subtract_time_faults = flag(attr::SCORING_SUBTRACT_TF)?;
        rule.time_fault_multiplier = tree.optional(attr::SCORING_TF_MULTIPLIER)?.unwrap_or(1.0);
        rule.opening_points = tree.optional(attr::SCORING_OPENING_PTS)?.unwrap_or(0);
        rule.closing_points = tree.optional(attr::SCORING_CLOSING_PTS)?.unwrap_or(0);
        rule.super_q = flag(attr::SCORING_SUPER_Q)?;
        rule.speed_points = flag(attr::SCORING_SPEED_PTS)?;
        rule.bonus_points = flag(attr::SCORING_BONUS_PTS)?;
        rule.note = tree
            .first_named(element::NOTE)
            .map(Element::text)
            .unwrap_or_default();
        rule.speed_multipliers = PlaceTable::load_rows(tree)?;
        rule.title_points = PointsTable::load_rows(tree, element::TITLE_POINTS)?;
        rule.lifetime_points = PointsTable::load_rows(tree, element::LIFETIME_POINTS)?;
        if let Some(placements) = tree.first_named(element::PLACEMENTS) {
            rule.placements = PlaceTable::load_rows(placements)?;
        }
        Ok(rule)
    }

    /// Append as a `Scoring` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::SCORING);
        if let Some(from) = self.valid_from {
            e.add_attr(attr::VALID_FROM, from);
        }
        if let Some(to) = self.valid_to {
            e.add_attr(attr::VALID_TO, to);
        }
        e.add_attr(attr::SCORING_DIVISION, &self.division)
            .add_attr(attr::SCORING_LEVEL, &self.level)
            .add_attr(attr::SCORING_TYPE, self.style.as_str());
        let flags = [
            (attr::SCORING_DROP_FRACTIONS, self.drop_fractions),
            (attr::SCORING_CLEAN_Q, self.clean_q),
            (attr::SCORING_TF_UNDER, self.time_faults_under),
            (attr::SCORING_TF_OVER, self.time_faults_over),
            (attr::SCORING_SUBTRACT_TF, self.subtract_time_faults),
            (attr::SCORING_SUPER_Q, self.super_q),
            (attr::SCORING_SPEED_PTS, self.speed_points),
            (attr::SCORING_BONUS_PTS, self.bonus_points),
        ];
        for (name, value) in flags {
            if value {
                e.add_attr(name, true);
            }
        }
        if (self.time_fault_multiplier - 1.0).abs() > f64::EPSILON {
            e.add_attr(attr::SCORING_TF_MULTIPLIER, self.time_fault_multiplier);
        }
        if self.opening_points > 0 {
            e.add_attr(attr::SCORING_OPENING_PTS, self.opening_points);
        }
        if self.closing_points > 0 {
            e.add_attr(attr::SCORING_CLOSING_PTS, self.closing_points);
        }
        if !self.note.is_empty() {
            e.add_text_child(element::NOTE, &self.note);
        }
        self.speed_multipliers.save_rows(e);
        self.title_points.save_rows(e, element::TITLE_POINTS);
        self.lifetime_points.save_rows(e, element::LIFETIME_POINTS);
        if !self.placements.is_empty() {
            self.placements.save_rows(e.add_child(element::PLACEMENTS));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn points_band_lookup_takes_first_satisfied_threshold() {
        let table = PointsTable::from_pairs(&[(5.0, 1.0), (0.0, 3.0), (2.0, 2.0)]);
        let thresholds: Vec<f64> = table.bands().iter().map(|b| b.faults).collect();
        assert_eq!(thresholds, [0.0, 2.0, 5.0]);
        assert!((table.lookup(0.0) - 3.0).abs() < f64::EPSILON);
        assert!((table.lookup(1.5) - 2.0).abs() < f64::EPSILON);
        assert!((table.lookup(5.0) - 1.0).abs() < f64::EPSILON);
        assert!(table.lookup(5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn place_table_catch_all() {
        let table = PlaceTable::from_pairs(&[(1, 2.0), (0, 1.0)]);
        assert_eq!(table.get(1), Some(2.0));
        assert_eq!(table.get(4), None);
        assert_eq!(table.get_or_catch_all(4), Some(1.0));
        assert_eq!(PlaceTable::new().get_or_catch_all(1), None);
    }

    #[test]
    fn window_overlap() {
        let d = |y| ArbDate::from_ymd(y, 1, 1);
        let a = ScoringRule::new(MatchKey::Wildcard, MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
            .with_window(None, d(2010));
        let b = a.clone().with_window(d(2010), None);
        let c = a.clone().with_window(d(2011), None);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn save_then_load_is_identity() {
        let rule = ScoringRule::new(
            MatchKey::exact("Championship"),
            MatchKey::Wildcard,
            ScoringStyle::OpenCloseScoreThenTime,
        )
        .with_window(ArbDate::from_ymd(2005, 1, 1), None)
        .with_required_points(20, 15)
        .with_time_faults(true, false, 2.0)
        .with_title_points(&[(0.0, 1.0)])
        .with_lifetime_points(&[(0.0, 10.0), (5.0, 5.0)])
        .with_placements(&[(1, 4.0), (2, 2.0)])
        .with_speed_points(&[(1, 2.0), (2, 1.5)]);

        let mut parent = Element::new(element::EVENT);
        rule.save(&mut parent);
        let tree = parent.first_named(element::SCORING).unwrap();
        assert_eq!(tree.attr(attr::SCORING_LEVEL), Some("*"));
        assert_eq!(ScoringRule::load(tree).unwrap(), rule);
    }

    #[test]
    fn unknown_style_rejected() {
        let mut tree = Element::new(element::SCORING);
        tree.add_attr(attr::SCORING_DIVISION, "*")
            .add_attr(attr::SCORING_LEVEL, "*")
            .add_attr(attr::SCORING_TYPE, "Golf");
        assert!(matches!(
            ScoringRule::load(&tree),
            Err(LoadError::UnknownValue { kind: "scoring style", .. })
        ));
    }
}
