//! Document schema versions
//!
//! Provides [`SchemaVersion`], the two-part `major.minor` number carried by every
//! loaded document and used to gate load-time migrations.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Two-part document schema version
///
/// Ordering is lexicographic on `(major, minor)`, so `9.9 < 10.0 < 10.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SchemaVersion {
    major: u16,
    minor: u16,
}

impl SchemaVersion {
    /// Version written by this library
    pub const CURRENT: Self = Self::new(15, 0);

    /// Create a version
    #[inline]
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Major component
    #[inline]
    #[must_use]
    pub const fn major(self) -> u16 {
        self.major
    }

    /// Minor component
    #[inline]
    #[must_use]
    pub const fn minor(self) -> u16 {
        self.minor
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };
        let parse = |part: &str| {
            part.parse::<u16>()
                .map_err(|_| VersionError::Malformed(s.to_string()))
        };
        Ok(Self::new(parse(major)?, parse(minor)?))
    }
}

/// Version parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// Empty version text
    #[error("version is empty")]
    Empty,

    /// Not of the form `major[.minor]`
    #[error("malformed version: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_major_minor() {
        let v: SchemaVersion = "12.3".parse().unwrap();
        assert_eq!(v, SchemaVersion::new(12, 3));
        assert_eq!(v.to_string(), "12.3");
    }

    #[test]
    fn parse_major_only() {
        let v: SchemaVersion = "8".parse().unwrap();
        assert_eq!(v, SchemaVersion::new(8, 0));
    }

    #[test]
    fn ordering_is_numeric_not_textual() {
        let a: SchemaVersion = "9.9".parse().unwrap();
        let b: SchemaVersion = "10.1".parse().unwrap();
        assert!(a < b);
        assert!(SchemaVersion::new(10, 0) < SchemaVersion::new(10, 1));
    }

    #[test]
    fn reject_garbage() {
        assert_eq!("".parse::<SchemaVersion>(), Err(VersionError::Empty));
        assert!(matches!(
            "x.2".parse::<SchemaVersion>(),
            Err(VersionError::Malformed(_))
        ));
    }
}
