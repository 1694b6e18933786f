//! ARB Configuration
//!
//! The rule configuration a record book is scored against: venues with their
//! divisions, levels, events, scoring rules, titles and multi-Q definitions,
//! plus the global fault and other-points lists.
//!
//! # Core Concepts
//!
//! - [`NamedList`]: ordered, unique-by-name collection behind every list
//! - [`MatchKey`]: exact name or wildcard in a scoring rule's division/level
//! - [`ScoringRule`]: formula and point tables for a (division, level) pair
//! - [`Configuration`]: root, loaded through the ordered [`MIGRATIONS`]
//! - [`ConfigAction`]: rename/delete command shipped with a configuration
//! - [`ConfigValidator`]: overlapping windows and dangling names, as warnings
//!
//! # Example
//!
//! ```rust
//! use arb_config::{Configuration, Division, Level, Named, Venue};
//! use arb_tree::{MessageLog, SchemaVersion};
//!
//! let mut venue = Venue::new("USDAA");
//! let mut division = Division::new("Championship");
//! division.levels.add(Level::new("Masters")).unwrap();
//! venue.divisions.add(division).unwrap();
//!
//! let mut config = Configuration::new();
//! config.venues.add(venue).unwrap();
//!
//! let tree = config.to_element();
//! let loaded = Configuration::load(&tree, SchemaVersion::CURRENT, &mut MessageLog::new()).unwrap();
//! assert_eq!(loaded.venue("USDAA").map(|v| v.name()), Some("USDAA"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod action;
mod config;
mod division;
mod error;
mod event;
mod fault;
mod level;
mod load;
mod match_key;
mod migrate;
mod multiq;
mod names;
mod other_points;
pub mod schema;
mod scoring;
mod title;
mod validation;
mod venue;

// Re-exports
pub use action::{Action, ConfigAction};
pub use config::Configuration;
pub use division::Division;
pub use error::{ConfigError, LoadError};
pub use event::Event;
pub use fault::Fault;
pub use level::{Level, SubLevel};
pub use load::{check_name, required_name, LoadContext};
pub use match_key::{MatchKey, WILDCARD};
pub use migrate::{migrate, Migration, MIGRATIONS};
pub use multiq::{MultiQ, MultiQItem};
pub use names::{ListError, Named, NamedList};
pub use other_points::{OtherPoints, TallyScope};
pub use scoring::{PlaceInfo, PlaceTable, PointsBand, PointsTable, ScoringRule, ScoringStyle};
pub use title::Title;
pub use validation::{ConfigDiagnostic, ConfigValidator};
pub use venue::Venue;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        ConfigAction, Configuration, Division, Event, Level, MatchKey, MultiQ, Named, NamedList,
        ScoringRule, ScoringStyle, Title, Venue,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
