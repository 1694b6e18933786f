//! ARB Record Book
//!
//! Dog history recorded against a configuration, the action commands that
//! rename or delete configuration entries (with their history cascade), and
//! the engine that merges a shipped configuration into the user's one.
//!
//! # Core Concepts
//!
//! - [`DogList`]: every dog's trials, runs, titles and points
//! - [`HistoryContext`]: validates history names against the configuration
//! - [`ActionTarget`]: applies [`arb_config::ConfigAction`]s, asking before
//!   history is lost
//! - [`update_configuration`]: add-or-update merge reported in an [`UpdateLog`]
//! - [`AgilityRecordBook`]: load, save, score and update as one unit
//!
//! # Example
//!
//! ```rust
//! use arb_book::{AgilityRecordBook, BookSettings, Dog, DogTitle};
//! use arb_config::{Configuration, Title, Venue};
//! use arb_tree::MessageLog;
//!
//! let mut venue = Venue::new("AKC");
//! venue.titles.add(Title::new("MACH")).unwrap();
//! let mut config = Configuration::new();
//! config.venues.add(venue).unwrap();
//!
//! let mut dog = Dog::new("Tess");
//! dog.titles.push(DogTitle::new("AKC", "MACH", None));
//! let book = AgilityRecordBook::new(config).with_dog(dog);
//!
//! let tree = book.to_element();
//! let loaded = AgilityRecordBook::load(&tree, &BookSettings::default(), &mut MessageLog::new()).unwrap();
//! assert_eq!(loaded, book);
//! assert_eq!(loaded.dogs.count_title("AKC", "MACH"), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod actions;
mod dog;
mod error;
mod history;
mod points;
mod record_book;
pub mod schema;
mod settings;
mod trial;
mod update;
mod usage;

// Re-exports
pub use actions::ActionTarget;
pub use dog::{Dog, DogList, DogTitle, RegNum};
pub use error::BookError;
pub use history::HistoryContext;
pub use points::{ExistingPoints, PointsKind};
pub use record_book::{AgilityRecordBook, UpdateReport};
pub use settings::BookSettings;
pub use trial::{Club, Run, RunOtherPoints, RunScoring, ScoreKind, Trial};
pub use update::{update_configuration, Tally, UpdateLog, DEFAULT_INDENT};

/// Commonly used items
pub mod prelude {
    pub use crate::{
        ActionTarget, AgilityRecordBook, BookError, BookSettings, Club, Dog, DogList, Run,
        RunScoring, Trial, UpdateLog,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;

    fn dogs_with_titles(venues: &[Vec<usize>]) -> DogList {
        const VENUES: [&str; 3] = ["AKC", "USDAA", "CPE"];
        venues
            .iter()
            .enumerate()
            .map(|(i, titles)| {
                let mut dog = Dog::new(format!("Dog {i}"));
                for &v in titles {
                    dog.titles.push(DogTitle::new(VENUES[v], "Title", None));
                    dog.reg_nums.push(RegNum::new(VENUES[v], format!("{i}-{v}")));
                }
                dog
            })
            .collect()
    }

    proptest! {
        /// A venue rename touches exactly the records the count reported.
        #[test]
        fn venue_rename_matches_count(
            venues in prop::collection::vec(prop::collection::vec(0_usize..3, 0..6), 0..5)
        ) {
            let mut dogs = dogs_with_titles(&venues);
            let before = dogs.count_venue("AKC");
            let untouched = dogs.count_venue("USDAA");
            prop_assert_eq!(dogs.rename_venue("AKC", "AKC 2"), before);
            prop_assert_eq!(dogs.count_venue("AKC"), 0);
            prop_assert_eq!(dogs.count_venue("AKC 2"), before);
            prop_assert_eq!(dogs.count_venue("USDAA"), untouched);
        }

        /// Every rendered line is indented by its nesting depth.
        #[test]
        fn nested_log_indentation(depth in 0_usize..5, indent in 0_usize..6) {
            let mut log = UpdateLog::new().with_indent(indent);
            log.push("leaf");
            for level in 0..depth {
                let mut outer = UpdateLog::new().with_indent(indent);
                outer.nest(format!("level {level}"), log);
                log = outer;
            }
            let rendered = log.to_string();
            let last = rendered.lines().last().unwrap_or_default();
            prop_assert_eq!(last.len() - last.trim_start().len(), depth * indent);
            prop_assert_eq!(log.len(), depth + 1);
        }
    }
}
