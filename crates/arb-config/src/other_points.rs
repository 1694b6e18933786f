//! Other-points tallies (e.g. "Top Ten" points)

use crate::error::LoadError;
use crate::load::required_name;
use crate::names::Named;
use crate::schema::{attr, element};
use arb_tree::Element;
use serde::{Deserialize, Serialize};

/// How other points accumulate across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TallyScope {
    /// All runs together
    #[default]
    All,
    /// All runs, broken out by event
    AllByEvent,
    /// Per level
    Level,
    /// Per level, broken out by event
    LevelByEvent,
}

impl TallyScope {
    /// Document text form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::AllByEvent => "AllByEvent",
            Self::Level => "Level",
            Self::LevelByEvent => "LevelByEvent",
        }
    }

    /// Parse document text
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "All" => Some(Self::All),
            "AllByEvent" => Some(Self::AllByEvent),
            "Level" => Some(Self::Level),
            "LevelByEvent" => Some(Self::LevelByEvent),
            _ => None,
        }
    }
}

/// Named point quantity tracked outside title points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherPoints {
    name: String,
    pub tally: TallyScope,
    pub default_points: f64,
    pub description: String,
}

impl OtherPoints {
    /// Create with defaults
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set tally scope
    #[inline]
    #[must_use]
    pub fn with_tally(mut self, tally: TallyScope) -> Self {
        self.tally = tally;
        self
    }

    /// Set default points
    #[inline]
    #[must_use]
    pub fn with_default_points(mut self, points: f64) -> Self {
        self.default_points = points;
        self
    }

    /// Load from an `OtherPts` element
    ///
    /// # Errors
    /// Missing name or count, or an unknown count value.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::OTHER_POINTS)?;
        let name = required_name(tree, attr::NAME, "other points")?;
        let count: String = tree.require(attr::OTHER_POINTS_COUNT)?;
        let tally = TallyScope::parse(&count).ok_or(LoadError::UnknownValue {
            kind: "other points count",
            value: count,
        })?;
        Ok(Self {
            name,
            tally,
            default_points: tree.optional(attr::OTHER_POINTS_DEFAULT)?.unwrap_or(0.0),
            description: tree.text(),
        })
    }

    /// Append as an `OtherPts` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::OTHER_POINTS);
        e.add_attr(attr::NAME, &self.name)
            .add_attr(attr::OTHER_POINTS_COUNT, self.tally.as_str());
        if self.default_points != 0.0 {
            e.add_attr(attr::OTHER_POINTS_DEFAULT, self.default_points);
        }
        e.set_text(&self.description);
    }
}

impl Named for OtherPoints {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_scope_and_default() {
        let mut tree = Element::new(element::OTHER_POINTS);
        tree.add_attr(attr::NAME, "Top Ten")
            .add_attr(attr::OTHER_POINTS_COUNT, "LevelByEvent")
            .add_attr(attr::OTHER_POINTS_DEFAULT, 1.5);
        tree.set_text("Ranking points");

        let pts = OtherPoints::load(&tree).unwrap();
        assert_eq!(pts.name(), "Top Ten");
        assert_eq!(pts.tally, TallyScope::LevelByEvent);
        assert!((pts.default_points - 1.5).abs() < f64::EPSILON);
        assert_eq!(pts.description, "Ranking points");

        let mut parent = Element::new("Configuration");
        pts.save(&mut parent);
        assert_eq!(parent.first_named(element::OTHER_POINTS), Some(&tree));
    }

    #[test]
    fn unknown_count_rejected() {
        let mut tree = Element::new(element::OTHER_POINTS);
        tree.add_attr(attr::NAME, "X").add_attr(attr::OTHER_POINTS_COUNT, "Bogus");
        assert!(matches!(
            OtherPoints::load(&tree),
            Err(LoadError::UnknownValue { .. })
        ));
    }
}
