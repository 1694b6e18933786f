//! ARB Tree
//!
//! The generic ordered-tree representation every agility-record entity loads
//! from and saves to, plus the small value types shared by all layers.
//!
//! # Core Concepts
//!
//! - [`Element`]: named node with a unique-by-name attribute map and ordered children
//! - [`AttrLookup`]: typed attribute read outcome (found / not found / invalid)
//! - [`SchemaVersion`]: two-part document version gating load-time migrations
//! - [`ArbDate`]: calendar day; `None` stands for an absent date
//! - [`ErrorCallback`]: `log` for non-fatal problems, `confirm` before destructive work
//!
//! # Example
//!
//! ```rust
//! use arb_tree::{AttrLookup, Element};
//!
//! let mut venue = Element::new("Venue");
//! venue.add_attr("Name", "USDAA");
//! venue.add_child("Division").add_attr("Name", "Championship");
//!
//! assert_eq!(venue.get_attr::<String>("Name"), AttrLookup::Found("USDAA".to_string()));
//! assert_eq!(venue.elements_named("Division").count(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod callback;
mod date;
mod element;
mod error;
mod version;

// Re-exports
pub use callback::{ErrorCallback, MessageLog};
pub use date::{in_window, ArbDate};
pub use element::{AttrLookup, Element, FromAttr, Node, ToAttr};
pub use error::TreeError;
pub use version::{SchemaVersion, VersionError};

/// Commonly used items
pub mod prelude {
    pub use crate::{ArbDate, AttrLookup, Element, ErrorCallback, SchemaVersion, TreeError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn version_text_round_trips(major in 0u16..100, minor in 0u16..100) {
            let v = SchemaVersion::new(major, minor);
            let back: SchemaVersion = v.to_string().parse().unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn date_attribute_round_trips(y in 1970i32..2100, m in 1u32..=12, d in 1u32..=28) {
            let date = ArbDate::from_ymd(y, m, d).unwrap();
            let mut e = Element::new("Run");
            e.add_attr("Date", date);
            prop_assert_eq!(e.get_attr::<ArbDate>("Date"), AttrLookup::Found(date));
        }
    }

    #[test]
    fn version_gates_compare_with_attribute_values() {
        let mut root = Element::new("Configuration");
        root.add_attr("version", "10.1");
        let v: SchemaVersion = root.require("version").unwrap();
        assert!(v < SchemaVersion::new(11, 0));
        assert!(v >= SchemaVersion::new(10, 1));
    }
}
