//! Points carried over from before record keeping started

use crate::error::BookError;
use crate::history::{add_if_not_empty, HistoryContext};
use crate::schema::{attr, element};
use arb_config::{LoadError, Named};
use arb_scoring::ScoringResolver;
use arb_tree::{ArbDate, Element, SchemaVersion};
use serde::{Deserialize, Serialize};

/// What an existing-points entry counts toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointsKind {
    /// A configured other-points tally
    Other,
    /// Title points from runs
    Runs,
    /// Speed points
    Speed,
    /// Multi-Q count
    MultiQ,
    /// Super-Q count
    SuperQ,
}

impl PointsKind {
    /// Document text form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Runs => "Run",
            Self::Speed => "Speed",
            Self::MultiQ => "MQ",
            Self::SuperQ => "SQ",
        }
    }

    /// Parse document text, accepting names retired in older documents
    #[must_use]
    pub fn parse(text: &str, version: SchemaVersion) -> Option<Self> {
        match text {
            "Other" => Some(Self::Other),
            "Run" => Some(Self::Runs),
            "Speed" => Some(Self::Speed),
            "MQ" => Some(Self::MultiQ),
            "SQ" => Some(Self::SuperQ),
            "Mach" if version < SchemaVersion::new(10, 1) => Some(Self::Speed),
            "QQ" if version < SchemaVersion::new(11, 0) => Some(Self::MultiQ),
            _ => None,
        }
    }

    fn needs_event(self) -> bool {
        matches!(self, Self::Other | Self::Runs | Self::SuperQ)
    }
}

/// Points entered by hand rather than computed from runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingPoints {
    pub date: Option<ArbDate>,
    pub kind: PointsKind,
    /// Other-points name, for [`PointsKind::Other`]
    pub other: String,
    pub venue: String,
    /// Multi-Q name, for [`PointsKind::MultiQ`]
    pub multi_q: String,
    pub division: String,
    pub level: String,
    pub event: String,
    pub sub_name: String,
    pub points: f64,
    pub comment: String,
}

impl ExistingPoints {
    /// Create an entry of `kind` in `venue`
    #[must_use]
    pub fn new(kind: PointsKind, venue: impl Into<String>, points: f64) -> Self {
        Self {
            date: None,
            kind,
            other: String::new(),
            venue: venue.into(),
            multi_q: String::new(),
            division: String::new(),
            level: String::new(),
            event: String::new(),
            sub_name: String::new(),
            points,
            comment: String::new(),
        }
    }

    /// Set division, level and event
    #[must_use]
    pub fn with_class(mut self, division: &str, level: &str, event: &str) -> Self {
        self.division = division.to_string();
        self.level = level.to_string();
        self.event = event.to_string();
        self
    }

    /// Set the other-points name
    #[must_use]
    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = other.into();
        self
    }

    /// Set the multi-Q name
    #[must_use]
    pub fn with_multi_q(mut self, multi_q: impl Into<String>) -> Self {
        self.multi_q = multi_q.into();
        self
    }

    /// Load from an `ExistingPoints` element
    ///
    /// # Errors
    /// Missing type, venue or class attributes; names unknown to the
    /// configuration when the context rejects unknown references.
    pub fn load(tree: &Element, ctx: &mut HistoryContext<'_>) -> Result<Self, BookError> {
        tree.expect_name(element::EXISTING_POINTS)?;
        let text: String = tree.require(attr::EXISTING_TYPE)?;
        let kind = PointsKind::parse(&text, ctx.version()).ok_or_else(|| LoadError::UnknownValue {
            kind: "existing points type",
            value: text.clone(),
        })?;

        let mut points = Self::new(kind, non_empty(tree, attr::EXISTING_VENUE)?, 0.0);
        points.date = tree.optional(attr::EXISTING_DATE)?;
        points.points = tree.optional(attr::EXISTING_POINTS)?.unwrap_or(0.0);
        points.comment = tree.text();
        points.sub_name = tree.optional(attr::EXISTING_SUBNAME)?.unwrap_or_default();
        if kind == PointsKind::Other {
            points.other = non_empty(tree, attr::EXISTING_OTHER)?;
        }
        if kind == PointsKind::MultiQ {
            points.multi_q = if text == "QQ" {
                ctx.config()
                    .venue(&points.venue)
                    .and_then(|v| v.find_multi_q_by_short_name("QQ"))
                    .map_or_else(|| "Double Q".to_string(), |m| m.name().to_string())
            } else {
                non_empty(tree, attr::EXISTING_MULTIQ)?
            };
        } else {
            points.division = non_empty(tree, attr::EXISTING_DIVISION)?;
            points.level = non_empty(tree, attr::EXISTING_LEVEL)?;
        }
        if kind.needs_event() {
            points.event = non_empty(tree, attr::EXISTING_EVENT)?;
        }
        if ctx.rejects_unknown() {
            points.check(ctx)?;
        }
        Ok(points)
    }

    fn check(&self, ctx: &HistoryContext<'_>) -> Result<(), BookError> {
        let config = ctx.config();
        let venue = config
            .venue(&self.venue)
            .ok_or_else(|| BookError::unknown("venue", &[&self.venue]))?;
        if self.kind == PointsKind::Other && !config.other_points.contains(&self.other) {
            return Err(BookError::unknown("other points", &[&self.other]));
        }
        match self.kind {
            PointsKind::MultiQ => {
                if !venue.multi_qs.contains(&self.multi_q) {
                    return Err(BookError::unknown("multi-Q", &[&self.venue, &self.multi_q]));
                }
            }
            PointsKind::Other | PointsKind::Runs | PointsKind::SuperQ => {
                let resolver = ScoringResolver::new(config);
                if !resolver.verify(&self.venue, &self.event, &self.division, &self.level, self.date) {
                    return Err(BookError::unknown(
                        "event",
                        &[&self.venue, &self.division, &self.level, &self.event],
                    ));
                }
            }
            PointsKind::Speed => {
                if venue.find_level(&self.division, &self.level).is_none() {
                    return Err(BookError::unknown(
                        "level",
                        &[&self.venue, &self.division, &self.level],
                    ));
                }
            }
        }
        Ok(())
    }

    /// Append as an `ExistingPoints` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::EXISTING_POINTS);
        if let Some(date) = self.date {
            e.add_attr(attr::EXISTING_DATE, date);
        }
        e.add_attr(attr::EXISTING_TYPE, self.kind.as_str());
        add_if_not_empty(e, attr::EXISTING_OTHER, &self.other);
        e.add_attr(attr::EXISTING_VENUE, &self.venue);
        add_if_not_empty(e, attr::EXISTING_MULTIQ, &self.multi_q);
        add_if_not_empty(e, attr::EXISTING_DIVISION, &self.division);
        add_if_not_empty(e, attr::EXISTING_LEVEL, &self.level);
        add_if_not_empty(e, attr::EXISTING_EVENT, &self.event);
        add_if_not_empty(e, attr::EXISTING_SUBNAME, &self.sub_name);
        e.add_attr(attr::EXISTING_POINTS, self.points);
        e.set_text(&self.comment);
    }

    /// Check if the entry is recorded against `division` of `venue`
    #[inline]
    #[must_use]
    pub fn in_division(&self, venue: &str, division: &str) -> bool {
        self.venue == venue && self.division == division
    }
}

fn non_empty(tree: &Element, name: &str) -> Result<String, LoadError> {
    let value: String = tree.require(name)?;
    if value.is_empty() {
        return Err(LoadError::EmptyName { kind: "existing points reference" });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_config::{Configuration, MultiQ, Venue};
    use arb_tree::MessageLog;

    #[test]
    fn kind_text_round_trips() {
        for kind in [
            PointsKind::Other,
            PointsKind::Runs,
            PointsKind::Speed,
            PointsKind::MultiQ,
            PointsKind::SuperQ,
        ] {
            assert_eq!(PointsKind::parse(kind.as_str(), SchemaVersion::CURRENT), Some(kind));
        }
    }

    #[test]
    fn retired_kinds_only_in_old_documents() {
        assert_eq!(PointsKind::parse("Mach", SchemaVersion::new(10, 0)), Some(PointsKind::Speed));
        assert_eq!(PointsKind::parse("Mach", SchemaVersion::CURRENT), None);
        assert_eq!(PointsKind::parse("QQ", SchemaVersion::new(10, 9)), Some(PointsKind::MultiQ));
        assert_eq!(PointsKind::parse("QQ", SchemaVersion::new(11, 0)), None);
    }

    #[test]
    fn old_double_q_points_name_the_multi_q() {
        let mut venue = Venue::new("AKC");
        venue.multi_qs.add(MultiQ::new("Double Qualifier", "QQ")).unwrap();
        let mut config = Configuration::new();
        config.venues.add(venue).unwrap();

        let mut tree = Element::new(element::EXISTING_POINTS);
        tree.add_attr(attr::EXISTING_TYPE, "QQ")
            .add_attr(attr::EXISTING_VENUE, "AKC")
            .add_attr(attr::EXISTING_POINTS, 3.0);
        let mut log = MessageLog::new();
        let mut ctx = HistoryContext::new(&config, SchemaVersion::new(10, 0), &mut log);
        let points = ExistingPoints::load(&tree, &mut ctx).unwrap();
        assert_eq!(points.kind, PointsKind::MultiQ);
        assert_eq!(points.multi_q, "Double Qualifier");
    }

    #[test]
    fn unknown_venue_rejected() {
        let config = Configuration::new();
        let mut parent = Element::new("Dog");
        ExistingPoints::new(PointsKind::Speed, "UKC", 10.0)
            .with_class("Open", "Masters", "")
            .save(&mut parent);
        let mut log = MessageLog::new();
        let mut ctx = HistoryContext::new(&config, SchemaVersion::CURRENT, &mut log);
        let err = ExistingPoints::load(parent.first_named(element::EXISTING_POINTS).unwrap(), &mut ctx)
            .unwrap_err();
        assert!(err.is_rejection());
    }
}
