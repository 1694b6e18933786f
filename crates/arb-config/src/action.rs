//! Configuration action commands (data only)
//!
//! Shipped configurations carry a list of rename/delete commands that bring
//! older user data in line. Applying them, including the cascade into
//! recorded history, lives with the history model.

use crate::error::LoadError;
use crate::load::{add_if_not_empty, check_name};
use crate::schema::{attr, element};
use arb_tree::Element;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Closed set of configuration mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigAction {
    RenameOtherPoints { old: String, new: String },
    DeleteOtherPoints { name: String },
    RenameVenue { old: String, new: String },
    DeleteVenue { name: String },
    RenameDivision { venue: String, old: String, new: String },
    DeleteDivision { venue: String, name: String },
    /// Renames a sub-level when `parent` names its level
    RenameLevel {
        venue: String,
        division: String,
        parent: Option<String>,
        old: String,
        new: String,
    },
    /// Deletes a sub-level when `parent` names its level
    DeleteLevel {
        venue: String,
        division: String,
        parent: Option<String>,
        name: String,
    },
    RenameTitle { venue: String, old: String, new: String },
    /// With a non-empty `new` the title is renamed on dogs instead of deleted
    DeleteTitle {
        venue: String,
        division: Option<String>,
        old: String,
        new: String,
    },
    RenameEvent { venue: String, old: String, new: String },
    DeleteEvent { venue: String, name: String },
    RenameMultiQ { venue: String, old: String, new: String },
    DeleteMultiQ { venue: String, name: String },
}

impl ConfigAction {
    /// Document verb
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::RenameOtherPoints { .. } => "RenameOtherPoints",
            Self::DeleteOtherPoints { .. } => "DeleteOtherPoints",
            Self::RenameVenue { .. } => "RenameVenue",
            Self::DeleteVenue { .. } => "DeleteVenue",
            Self::RenameDivision { .. } => "RenameDivision",
            Self::DeleteDivision { .. } => "DeleteDivision",
            Self::RenameLevel { .. } => "RenameLevel",
            Self::DeleteLevel { .. } => "DeleteLevel",
            Self::RenameTitle { .. } => "RenameTitle",
            Self::DeleteTitle { .. } => "DeleteTitle",
            Self::RenameEvent { .. } => "RenameEvent",
            Self::DeleteEvent { .. } => "DeleteEvent",
            Self::RenameMultiQ { .. } => "RenameMultiQ",
            Self::DeleteMultiQ { .. } => "DeleteMultiQ",
        }
    }

    /// Venue the command is scoped to, if any
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        match self {
            Self::RenameOtherPoints { .. }
            | Self::DeleteOtherPoints { .. }
            | Self::RenameVenue { .. }
            | Self::DeleteVenue { .. } => None,
            Self::RenameDivision { venue, .. }
            | Self::DeleteDivision { venue, .. }
            | Self::RenameLevel { venue, .. }
            | Self::DeleteLevel { venue, .. }
            | Self::RenameTitle { venue, .. }
            | Self::DeleteTitle { venue, .. }
            | Self::RenameEvent { venue, .. }
            | Self::DeleteEvent { venue, .. }
            | Self::RenameMultiQ { venue, .. }
            | Self::DeleteMultiQ { venue, .. } => Some(venue),
        }
    }

    fn load(tree: &Element, verb: &str) -> Result<Self, LoadError> {
        let text = |name: &str| -> Result<String, LoadError> { Ok(tree.require(name)?) };
        let opt = |name: &str| -> Result<Option<String>, LoadError> {
            Ok(tree.optional::<String>(name)?.filter(|s| !s.is_empty()))
        };
        let venue = || text(attr::ACTION_VENUE);
        let old = || text(attr::ACTION_OLD_NAME);
        let new = || -> Result<String, LoadError> {
            let name = text(attr::ACTION_NEW_NAME)?;
            check_name("action target", &name)?;
            Ok(name)
        };
        let action = match verb {
            "RenameOtherPoints" => Self::RenameOtherPoints { old: old()?, new: new()? },
            "DeleteOtherPoints" => Self::DeleteOtherPoints { name: old()? },
            "RenameVenue" => Self::RenameVenue { old: old()?, new: new()? },
            "DeleteVenue" => Self::DeleteVenue { name: old()? },
            "RenameDivision" => Self::RenameDivision { venue: venue()?, old: old()?, new: new()? },
            "DeleteDivision" => Self::DeleteDivision { venue: venue()?, name: old()? },
            "RenameLevel" => Self::RenameLevel {
                venue: venue()?,
                division: text(attr::ACTION_DIVISION)?,
                parent: opt(attr::ACTION_LEVEL)?,
                old: old()?,
                new: new()?,
            },
            "DeleteLevel" => Self::DeleteLevel {
                venue: venue()?,
                division: text(attr::ACTION_DIVISION)?,
                parent: opt(attr::ACTION_LEVEL)?,
                name: old()?,
            },
            "RenameTitle" => Self::RenameTitle { venue: venue()?, old: old()?, new: new()? },
            "DeleteTitle" => Self::DeleteTitle {
                venue: venue()?,
                division: opt(attr::ACTION_DIVISION)?,
                old: old()?,
                new: opt(attr::ACTION_NEW_NAME)?.unwrap_or_default(),
            },
            "RenameEvent" => Self::RenameEvent { venue: venue()?, old: old()?, new: new()? },
            "DeleteEvent" => Self::DeleteEvent { venue: venue()?, name: old()? },
            "RenameMultiQ" => Self::RenameMultiQ { venue: venue()?, old: old()?, new: new()? },
            "DeleteMultiQ" => Self::DeleteMultiQ { venue: venue()?, name: old()? },
            _ => {
                return Err(LoadError::UnknownValue {
                    kind: "action verb",
                    value: verb.to_string(),
                })
            }
        };
        Ok(action)
    }

    fn save(&self, e: &mut Element) {
        e.add_attr(attr::ACTION_VERB, self.verb());
        if let Some(venue) = self.venue() {
            e.add_attr(attr::ACTION_VENUE, venue);
        }
        let (division, parent, old, new): (Option<&str>, Option<&str>, &str, &str) = match self {
            Self::RenameOtherPoints { old, new }
            | Self::RenameVenue { old, new }
            | Self::RenameDivision { old, new, .. }
            | Self::RenameTitle { old, new, .. }
            | Self::RenameEvent { old, new, .. }
            | Self::RenameMultiQ { old, new, .. } => (None, None, old.as_str(), new.as_str()),
            Self::DeleteOtherPoints { name }
            | Self::DeleteVenue { name }
            | Self::DeleteDivision { name, .. }
            | Self::DeleteEvent { name, .. }
            | Self::DeleteMultiQ { name, .. } => (None, None, name.as_str(), ""),
            Self::RenameLevel { division, parent, old, new, .. } => {
                (Some(division.as_str()), parent.as_deref(), old.as_str(), new.as_str())
            }
            Self::DeleteLevel { division, parent, name, .. } => {
                (Some(division.as_str()), parent.as_deref(), name.as_str(), "")
            }
            Self::DeleteTitle { division, old, new, .. } => {
                (division.as_deref(), None, old.as_str(), new.as_str())
            }
        };
        if let Some(division) = division {
            e.add_attr(attr::ACTION_DIVISION, division);
        }
        if let Some(parent) = parent {
            e.add_attr(attr::ACTION_LEVEL, parent);
        }
        e.add_attr(attr::ACTION_OLD_NAME, old);
        add_if_not_empty(e, attr::ACTION_NEW_NAME, new);
    }
}

impl Display for ConfigAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut e = Element::new(element::ACTION);
        self.save(&mut e);
        f.write_str(self.verb())?;
        for (name, value) in e.attributes().skip(1) {
            write!(f, " {name}={value:?}")?;
        }
        Ok(())
    }
}

/// A command plus the configuration revision it targets
///
/// A non-zero `config_version` means "only apply to configurations older
/// than this revision".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub config_version: u16,
    pub command: ConfigAction,
}

impl Action {
    /// Ungated action
    #[inline]
    #[must_use]
    pub fn new(command: ConfigAction) -> Self {
        Self {
            config_version: 0,
            command,
        }
    }

    /// Gate on a configuration revision
    #[inline]
    #[must_use]
    pub fn with_config_version(mut self, version: u16) -> Self {
        self.config_version = version;
        self
    }

    /// Check whether a configuration at `current` revision still needs this
    #[inline]
    #[must_use]
    pub fn applies_to(&self, current: u16) -> bool {
        self.config_version == 0 || current < self.config_version
    }

    /// Load from an `Action` element
    ///
    /// # Errors
    /// Unknown verb or a missing attribute for that verb.
    pub fn load(tree: &Element) -> Result<Self, LoadError> {
        tree.expect_name(element::ACTION)?;
        let verb: String = tree.require(attr::ACTION_VERB)?;
        Ok(Self {
            config_version: tree.optional(attr::ACTION_CONFIG)?.unwrap_or(0),
            command: ConfigAction::load(tree, &verb)?,
        })
    }

    /// Append as an `Action` child
    pub fn save(&self, parent: &mut Element) {
        let e = parent.add_child(element::ACTION);
        self.command.save(e);
        if self.config_version > 0 {
            e.add_attr(attr::ACTION_CONFIG, self.config_version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(action: &Action) -> Action {
        let mut parent = Element::new(element::CONFIG);
        action.save(&mut parent);
        Action::load(parent.first_named(element::ACTION).unwrap()).unwrap()
    }

    #[test]
    fn sub_level_rename_keeps_parent() {
        let action = Action::new(ConfigAction::RenameLevel {
            venue: "AKC".into(),
            division: "Open".into(),
            parent: Some("Novice".into()),
            old: "Novice A".into(),
            new: "Novice 1".into(),
        })
        .with_config_version(4);
        assert_eq!(round_trip(&action), action);
    }

    #[test]
    fn delete_title_without_replacement() {
        let action = Action::new(ConfigAction::DeleteTitle {
            venue: "AKC".into(),
            division: None,
            old: "NA".into(),
            new: String::new(),
        });
        assert_eq!(round_trip(&action), action);
        assert_eq!(action.command.to_string(), r#"DeleteTitle Venue="AKC" OldName="NA""#);
    }

    #[test]
    fn version_gate() {
        let gated = Action::new(ConfigAction::DeleteVenue { name: "CPE".into() }).with_config_version(3);
        assert!(gated.applies_to(2));
        assert!(!gated.applies_to(3));
        assert!(Action::new(ConfigAction::DeleteVenue { name: "CPE".into() }).applies_to(99));
    }

    #[test]
    fn rename_to_wildcard_rejected() {
        let mut tree = Element::new(element::ACTION);
        tree.add_attr(attr::ACTION_VERB, "RenameVenue")
            .add_attr(attr::ACTION_OLD_NAME, "A")
            .add_attr(attr::ACTION_NEW_NAME, "*");
        assert!(matches!(Action::load(&tree), Err(LoadError::ReservedName { .. })));
    }

    #[test]
    fn unknown_verb() {
        let mut tree = Element::new(element::ACTION);
        tree.add_attr(attr::ACTION_VERB, "Explode");
        assert!(matches!(Action::load(&tree), Err(LoadError::UnknownValue { .. })));
    }
}
