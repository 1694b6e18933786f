//! Division/level match keys for scoring rules
//!
//! [`MatchKey`] replaces the textual `*` sentinel with a tagged variant, so a
//! real division can never be mistaken for "any division".

use arb_tree::{FromAttr, ToAttr};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Wildcard literal used in the document format
pub const WILDCARD: &str = "*";

/// Exact name or "any"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKey {
    /// Matches only this name
    Exact(String),
    /// Matches every name
    Wildcard,
}

impl MatchKey {
    /// Exact key
    #[inline]
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Parse document text; `*` becomes [`MatchKey::Wildcard`]
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text == WILDCARD {
            Self::Wildcard
        } else {
            Self::Exact(text.to_string())
        }
    }

    /// Document text form
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Exact(name) => name,
            Self::Wildcard => WILDCARD,
        }
    }

    /// Check if this key accepts `name`
    #[inline]
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(n) => n == name,
            Self::Wildcard => true,
        }
    }

    /// Check if this is exactly `name` (wildcards never are)
    #[inline]
    #[must_use]
    pub fn is_exact(&self, name: &str) -> bool {
        matches!(self, Self::Exact(n) if n == name)
    }

    /// Check for the wildcard variant
    #[inline]
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Exact name, if any
    #[inline]
    #[must_use]
    pub fn exact_name(&self) -> Option<&str> {
        match self {
            Self::Exact(n) => Some(n),
            Self::Wildcard => None,
        }
    }

    /// Rewrite an exact `old` to `new`; returns whether it changed
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.is_exact(old) {
            *self = Self::Exact(new.to_string());
            true
        } else {
            false
        }
    }
}

impl Display for MatchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

impl FromAttr for MatchKey {
    fn from_attr(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self::from_text(raw))
        }
    }
}

impl ToAttr for MatchKey {
    fn to_attr(&self) -> String {
        self.as_text().to_string()
    }
}
