//! ARB Scoring
//!
//! Finds the scoring rule that governs a run and computes what the run
//! earned under it.
//!
//! # Core Concepts
//!
//! - [`resolve`]: most specific (division, level) tier valid on the run date
//! - [`ScoringResolver`]: venue-aware lookup mapping sub-levels to their level
//! - [`ScoreCalculator`]: score, [`QStatus`] and [`RunPoints`] for one run
//! - [`SpeedPointsFormula`]: per-venue speed points, chosen via [`FormulaRegistry`]
//! - [`match_multi_q`]: consumes one day's qualifying runs for a multi-Q
//!
//! # Example
//!
//! ```rust
//! use arb_config::{Event, MatchKey, ScoringRule, ScoringStyle};
//! use arb_scoring::{resolve_one, QStatus, RunMeasurements, ScoreCalculator};
//!
//! let event = Event::new("Jumpers").with_scoring(
//!     ScoringRule::new(MatchKey::Wildcard, MatchKey::Wildcard, ScoringStyle::FaultsThenTime)
//!         .with_clean_q(true)
//!         .with_title_points(&[(0.0, 1.0)]),
//! );
//! let rule = resolve_one(&event, "Open", "Masters", None).unwrap();
//! let run = RunMeasurements::new().with_time(31.2, 32.0);
//! let outcome = ScoreCalculator::default().calculate(rule, &run);
//! assert_eq!(outcome.q, QStatus::Qualified);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod calc;
mod error;
mod matcher;
mod resolve;
mod speed;

// Re-exports
pub use calc::{score, time_faults, QStatus, RunMeasurements, RunOutcome, RunPoints, ScoreCalculator};
pub use error::ScoringError;
pub use matcher::{match_multi_q, MultiQCandidate};
pub use resolve::{resolve, resolve_one, resolve_tier, verify, MatchTier, ScoringResolver};
pub use speed::{ClassSizeSpeed, FormulaRegistry, NormalSpeed, SpeedPointsFormula, StepTableSpeed};

/// Commonly used items
pub mod prelude {
    pub use crate::{
        match_multi_q, resolve_one, FormulaRegistry, MultiQCandidate, QStatus, RunMeasurements,
        RunOutcome, RunPoints, ScoreCalculator, ScoringError, ScoringResolver,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use arb_config::{Event, MatchKey, MultiQ, ScoringRule, ScoringStyle};
    use arb_tree::ArbDate;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        level: String,
        event: String,
    }

    impl MultiQCandidate for Entry {
        fn date(&self) -> Option<ArbDate> {
            None
        }
        fn division(&self) -> &str {
            "Open"
        }
        fn level(&self) -> &str {
            &self.level
        }
        fn event(&self) -> &str {
            &self.event
        }
    }

    fn rule(div: MatchKey, level: MatchKey) -> ScoringRule {
        ScoringRule::new(div, level, ScoringStyle::FaultsThenTime)
    }

    proptest! {
        /// A both-wildcard rule answers for any pair a specific rule does not
        #[test]
        fn wildcard_rule_is_the_fallback(division in "[A-Z][a-z]{1,6}", level in "[A-Z][a-z]{1,6}") {
            let mut specific = rule(MatchKey::exact("Open"), MatchKey::exact("Masters"));
            specific.note = "specific".into();
            let mut any = rule(MatchKey::Wildcard, MatchKey::Wildcard);
            any.note = "any".into();
            let event = Event::new("Standard").with_scoring(specific).with_scoring(any);

            let found = resolve_one(&event, &division, &level, None).map(|r| r.note.clone());
            let expected = if division == "Open" && level == "Masters" { "specific" } else { "any" };
            prop_assert_eq!(found.as_deref(), Some(expected));
        }

        /// Disjoint yearly windows: exactly the covering window is chosen
        #[test]
        fn disjoint_windows_pick_the_covering_one(year in 2000i32..2010, month in 1u32..=12) {
            let mut event = Event::new("Gamblers");
            for y in 2000..2010 {
                let mut r = rule(MatchKey::Wildcard, MatchKey::Wildcard)
                    .with_window(ArbDate::from_ymd(y, 1, 1), ArbDate::from_ymd(y, 12, 31));
                r.note = y.to_string();
                event.scorings.push(r);
            }
            let found = resolve(&event, "A", "B", ArbDate::from_ymd(year, month, 15));
            prop_assert_eq!(found.len(), 1);
            prop_assert_eq!(found[0].note.clone(), year.to_string());
        }

        /// A satisfied definition consumes exactly one run per item
        #[test]
        fn matcher_consumes_item_count(extra in prop::collection::vec(("[A-C]", "[X-Z]"), 0..6)) {
            let multi_q = MultiQ::new("Triple", "QQQ")
                .with_item("Open", "M", "Standard").unwrap()
                .with_item("Open", "M", "Jumpers").unwrap()
                .with_item("Open", "M", "Gamblers").unwrap();
            let mut runs: Vec<Entry> = extra
                .iter()
                .map(|(l, e)| Entry { level: l.clone(), event: e.clone() })
                .collect();
            for event in ["Gamblers", "Standard", "Jumpers"] {
                runs.push(Entry { level: "M".into(), event: event.into() });
            }
            let before = runs.len();
            let matched = match_multi_q(&multi_q, &mut runs).unwrap();
            prop_assert_eq!(matched.len(), 3);
            prop_assert_eq!(runs.len(), before - 3);
            prop_assert_eq!(&runs[..], &extra.iter().map(|(l, e)| Entry { level: l.clone(), event: e.clone() }).collect::<Vec<_>>()[..]);
        }
    }
}
