//! Configuration root

use crate::action::Action;
use crate::error::{ConfigError, LoadError};
use crate::fault::Fault;
use crate::load::LoadContext;
use crate::migrate::migrate;
use crate::names::{Named, NamedList};
use crate::other_points::OtherPoints;
use crate::schema::{attr, element};
use crate::validation::ConfigValidator;
use crate::venue::Venue;
use arb_tree::{Element, ErrorCallback, SchemaVersion};
use serde::{Deserialize, Serialize};

/// Complete rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Revision of the shipped configuration this one derives from
    pub version: u16,
    /// Pending rename/delete commands, applied in order
    pub actions: Vec<Action>,
    pub venues: NamedList<Venue>,
    pub faults: NamedList<Fault>,
    pub other_points: NamedList<OtherPoints>,
}

impl Configuration {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration revision
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Venue by name
    #[inline]
    #[must_use]
    pub fn venue(&self, name: &str) -> Option<&Venue> {
        self.venues.find(name)
    }

    /// Load from a `Configuration` element written at `doc_version`
    ///
    /// The tree is migrated to the current layout first. Bad venues, actions,
    /// faults and other-points entries are logged and skipped; consistency
    /// warnings are logged after loading.
    ///
    /// # Errors
    /// Wrong root element, malformed `version`, or a document newer than
    /// [`SchemaVersion::CURRENT`].
    pub fn load(
        tree: &Element,
        doc_version: SchemaVersion,
        callback: &mut dyn ErrorCallback,
    ) -> Result<Self, ConfigError> {
        if doc_version > SchemaVersion::CURRENT {
            return Err(ConfigError::UnsupportedVersion {
                found: doc_version,
                supported: SchemaVersion::CURRENT,
            });
        }
        tree.expect_name(element::CONFIG).map_err(LoadError::from)?;

        let mut tree = tree.clone();
        migrate(&mut tree, doc_version, callback);

        let mut config = Self::new();
        config.version = tree
            .optional(attr::CONFIG_VERSION)
            .map_err(LoadError::from)?
            .unwrap_or(0);

        let mut ctx = LoadContext::new(doc_version, callback);
        for child in tree.elements() {
            let result = match child.name() {
                element::ACTION => Action::load(child).map(|a| config.actions.push(a)),
                element::VENUE => Venue::load(child, &mut ctx).and_then(|v| {
                    config
                        .venues
                        .add(v)
                        .map(|_| ())
                        .map_err(|e| LoadError::list("venue", e))
                }),
                element::FAULT_TYPE => Fault::load(child).and_then(|f| {
                    config
                        .faults
                        .add(f)
                        .map(|_| ())
                        .map_err(|e| LoadError::list("fault", e))
                }),
                element::OTHER_POINTS => OtherPoints::load(child).and_then(|o| {
                    config
                        .other_points
                        .add(o)
                        .map(|_| ())
                        .map_err(|e| LoadError::list("other points", e))
                }),
                _ => Ok(()),
            };
            if let Err(e) = result {
                ctx.log(&format!("configuration: {e}"));
            }
        }

        for diagnostic in ConfigValidator::new().validate(&config) {
            ctx.log(&diagnostic.to_string());
        }
        tracing::debug!(
            venues = config.venues.len(),
            actions = config.actions.len(),
            version = config.version,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Append as a `Configuration` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::CONFIG);
        e.add_attr(attr::CONFIG_VERSION, self.version);
        for action in &self.actions {
            action.save(e);
        }
        for venue in &self.venues {
            venue.save(e);
        }
        for fault in &self.faults {
            fault.save(e);
        }
        for other in &self.other_points {
            other.save(e);
        }
    }

    /// Save into a fresh `Configuration` element
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut holder = Element::new("");
        self.save(&mut holder);
        holder
            .take_elements_named(element::CONFIG)
            .pop()
            .unwrap_or_else(|| Element::new(element::CONFIG))
    }

    /// Names of every venue, in order
    pub fn venue_names(&self) -> impl Iterator<Item = &str> {
        self.venues.iter().map(Named::name)
    }
}
