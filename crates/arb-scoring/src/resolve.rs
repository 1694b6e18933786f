//! Scoring-rule resolution
//!
//! A run names a division, a level and a date; the event's rules are searched
//! tier by tier, most specific first, and the first tier holding a rule valid
//! on the date wins.

use crate::error::ScoringError;
use arb_config::{Configuration, Event, MatchKey, Named, ScoringRule, Venue};
use arb_tree::ArbDate;

/// Specificity tiers, searched in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    /// Exact division, exact level
    Exact,
    /// Exact division, any level
    AnyLevel,
    /// Any division, exact level
    AnyDivision,
    /// Any division, any level
    Any,
}

impl MatchTier {
    /// Every tier, most specific first
    pub const ALL: [Self; 4] = [Self::Exact, Self::AnyLevel, Self::AnyDivision, Self::Any];

    /// Check if `rule` belongs to this tier for the given names
    #[must_use]
    pub fn accepts(self, rule: &ScoringRule, division: &str, level: &str) -> bool {
        let key = |k: &MatchKey, name: &str, wild: bool| {
            if wild {
                k.is_wildcard()
            } else {
                k.is_exact(name)
            }
        };
        let (any_division, any_level) = match self {
            Self::Exact => (false, false),
            Self::AnyLevel => (false, true),
            Self::AnyDivision => (true, false),
            Self::Any => (true, true),
        };
        key(&rule.division, division, any_division) && key(&rule.level, level, any_level)
    }
}

/// Rules of `event` applying to `(division, level)` on `date`
///
/// Only the most specific non-empty tier is returned, in definition order.
/// An absent date matches every validity window.
#[must_use]
pub fn resolve<'a>(
    event: &'a Event,
    division: &str,
    level: &str,
    date: Option<ArbDate>,
) -> Vec<&'a ScoringRule> {
    resolve_tier(event, division, level, date).map_or_else(Vec::new, |(_, rules)| rules)
}

/// Like [`resolve`], also reporting which tier matched
#[must_use]
pub fn resolve_tier<'a>(
    event: &'a Event,
    division: &str,
    level: &str,
    date: Option<ArbDate>,
) -> Option<(MatchTier, Vec<&'a ScoringRule>)> {
    MatchTier::ALL.into_iter().find_map(|tier| {
        let rules: Vec<_> = event
            .scorings
            .iter()
            .filter(|r| tier.accepts(r, division, level) && r.is_valid_on(date))
            .collect();
        (!rules.is_empty()).then_some((tier, rules))
    })
}

/// The single rule for a run
///
/// Several valid rules in one tier is an authoring mistake; the first defined
/// is used and a warning is emitted.
#[must_use]
pub fn resolve_one<'a>(
    event: &'a Event,
    division: &str,
    level: &str,
    date: Option<ArbDate>,
) -> Option<&'a ScoringRule> {
    let (tier, rules) = resolve_tier(event, division, level, date)?;
    if rules.len() > 1 {
        tracing::warn!(
            event = event.name(),
            division,
            level,
            ?tier,
            count = rules.len(),
            "overlapping scoring rules, using the first"
        );
    }
    rules.into_iter().next()
}

/// Check if any rule covers `(division, level)` on `date`
#[inline]
#[must_use]
pub fn verify(event: &Event, division: &str, level: &str, date: Option<ArbDate>) -> bool {
    MatchTier::ALL.into_iter().any(|tier| {
        event
            .scorings
            .iter()
            .any(|r| tier.accepts(r, division, level) && r.is_valid_on(date))
    })
}

/// Venue-aware resolution over a whole configuration
///
/// Runs record the leaf they entered, which may be a sub-level; rules are
/// written against the owning level, so leaves are mapped up first.
#[derive(Debug, Clone, Copy)]
pub struct ScoringResolver<'a> {
    config: &'a Configuration,
}

impl<'a> ScoringResolver<'a> {
    /// Create resolver over `config`
    #[inline]
    #[must_use]
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Venue by name
    ///
    /// # Errors
    /// [`ScoringError::UnknownVenue`].
    pub fn venue(&self, venue: &str) -> Result<&'a Venue, ScoringError> {
        self.config
            .venue(venue)
            .ok_or_else(|| ScoringError::UnknownVenue(venue.to_string()))
    }

    /// Event of a venue by name
    ///
    /// # Errors
    /// Unknown venue or event.
    pub fn event(&self, venue: &str, event: &str) -> Result<&'a Event, ScoringError> {
        self.venue(venue)?
            .events
            .find(event)
            .ok_or_else(|| ScoringError::UnknownEvent {
                venue: venue.to_string(),
                event: event.to_string(),
            })
    }

    /// Rule scoring a run entered at `leaf`
    ///
    /// # Errors
    /// Unknown venue or event, or no rule valid on `date`.
    pub fn find(
        &self,
        venue: &str,
        event: &str,
        division: &str,
        leaf: &str,
        date: Option<ArbDate>,
    ) -> Result<&'a ScoringRule, ScoringError> {
        let v = self.venue(venue)?;
        let e = self.event(venue, event)?;
        let level = parent_level(v, division, leaf);
        resolve_one(e, division, level, date).ok_or_else(|| ScoringError::NoRule {
            event: event.to_string(),
            division: division.to_string(),
            level: leaf.to_string(),
            date: date.map_or_else(|| "any date".to_string(), |d| d.to_string()),
        })
    }

    /// Check if a run entered at `leaf` can be scored
    #[must_use]
    pub fn verify(
        &self,
        venue: &str,
        event: &str,
        division: &str,
        leaf: &str,
        date: Option<ArbDate>,
    ) -> bool {
        let Ok(v) = self.venue(venue) else {
            return false;
        };
        v.find_level(division, leaf).is_some()
            && v.events
                .find(event)
                .is_some_and(|e| verify(e, division, parent_level(v, division, leaf), date))
    }
}

fn parent_level<'v>(venue: &'v Venue, division: &str, leaf: &'v str) -> &'v str {
    venue
        .find_level(division, leaf)
        .map_or(leaf, |level| level.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_config::{Division, Level, ScoringStyle};
    use pretty_assertions::assert_eq;

    fn d(y: i32) -> Option<ArbDate> {
        ArbDate::from_ymd(y, 1, 1)
    }

    fn rule(div: MatchKey, level: MatchKey, note: &str) -> ScoringRule {
        let mut r = ScoringRule::new(div, level, ScoringStyle::FaultsThenTime);
        r.note = note.to_string();
        r
    }

    fn notes(rules: &[&ScoringRule]) -> Vec<String> {
        rules.iter().map(|r| r.note.clone()).collect()
    }

    fn event() -> Event {
        Event::new("Jumpers")
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "any"))
            .with_scoring(rule(MatchKey::exact("Open"), MatchKey::Wildcard, "open"))
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::exact("Masters"), "masters"))
            .with_scoring(rule(MatchKey::exact("Open"), MatchKey::exact("Masters"), "exact"))
    }

    #[test]
    fn most_specific_tier_wins() {
        let e = event();
        assert_eq!(notes(&resolve(&e, "Open", "Masters", None)), ["exact"]);
        assert_eq!(notes(&resolve(&e, "Open", "Novice", None)), ["open"]);
        assert_eq!(notes(&resolve(&e, "Vet", "Masters", None)), ["masters"]);
        assert_eq!(notes(&resolve(&e, "Vet", "Novice", None)), ["any"]);
    }

    #[test]
    fn date_filters_within_tier() {
        let e = Event::new("Gamblers")
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "old").with_window(None, d(2009)))
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "new").with_window(d(2010), None));
        assert_eq!(notes(&resolve(&e, "A", "B", d(2005))), ["old"]);
        assert_eq!(notes(&resolve(&e, "A", "B", d(2012))), ["new"]);
        assert_eq!(notes(&resolve(&e, "A", "B", None)), ["old", "new"]);
    }

    #[test]
    fn expired_specific_rule_falls_through() {
        let e = Event::new("Standard")
            .with_scoring(rule(MatchKey::exact("Open"), MatchKey::exact("Masters"), "exact").with_window(None, d(2000)))
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "any"));
        assert_eq!(
            resolve_tier(&e, "Open", "Masters", d(2010)).map(|(t, _)| t),
            Some(MatchTier::Any)
        );
    }

    #[test]
    fn overlap_picks_first() {
        let e = Event::new("Snooker")
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "first"))
            .with_scoring(rule(MatchKey::Wildcard, MatchKey::Wildcard, "second"));
        assert_eq!(resolve_one(&e, "A", "B", d(2020)).map(|r| r.note.as_str()), Some("first"));
    }

    #[test]
    fn verify_matches_resolve() {
        let e = Event::new("Pairs")
            .with_scoring(rule(MatchKey::exact("Open"), MatchKey::Wildcard, "").with_window(d(2010), None));
        assert!(verify(&e, "Open", "Novice", d(2011)));
        assert!(!verify(&e, "Open", "Novice", d(2001)));
        assert!(!verify(&e, "Vet", "Novice", d(2011)));
    }

    #[test]
    fn resolver_maps_sub_levels() {
        let mut venue = Venue::new("AKC");
        let mut div = Division::new("Regular");
        div.levels
            .add(Level::new("Novice").with_sub_levels(&["Novice A", "Novice B"]).unwrap())
            .unwrap();
        venue.divisions.add(div).unwrap();
        venue
            .events
            .add(Event::new("Standard").with_scoring(rule(
                MatchKey::exact("Regular"),
                MatchKey::exact("Novice"),
                "novice",
            )))
            .unwrap();
        let mut config = Configuration::new();
        config.venues.add(venue).unwrap();

        let resolver = ScoringResolver::new(&config);
        let found = resolver.find("AKC", "Standard", "Regular", "Novice B", None).unwrap();
        assert_eq!(found.note, "novice");
        assert!(resolver.verify("AKC", "Standard", "Regular", "Novice A", None));
        assert!(!resolver.verify("AKC", "Standard", "Regular", "Novice C", None));
        assert!(matches!(
            resolver.find("AKC", "Jumpers", "Regular", "Novice A", None),
            Err(ScoringError::UnknownEvent { .. })
        ));
        assert!(matches!(
            resolver.find("CPE", "Standard", "Regular", "Novice A", None),
            Err(ScoringError::UnknownVenue(_))
        ));
    }
}
