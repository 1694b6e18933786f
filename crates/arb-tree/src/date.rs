//! Calendar dates
//!
//! [`ArbDate`] is a plain calendar day. An absent date is modelled as
//! `Option::<ArbDate>::None` by callers and matches every validity window.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Calendar day used for run dates and validity windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArbDate(NaiveDate);

impl ArbDate {
    /// Create from year, month and day; `None` if the day does not exist
    #[inline]
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Underlying chrono date
    #[inline]
    #[must_use]
    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// Year component
    #[inline]
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Check `from <= self <= to`, treating a missing bound as open
    #[inline]
    #[must_use]
    pub fn is_between(self, from: Option<Self>, to: Option<Self>) -> bool {
        from.map_or(true, |from| from <= self) && to.map_or(true, |to| self <= to)
    }
}

impl From<NaiveDate> for ArbDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for ArbDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for ArbDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// Check whether an optional date lies in an optional window
///
/// An absent date matches every window.
#[inline]
#[must_use]
pub fn in_window(date: Option<ArbDate>, from: Option<ArbDate>, to: Option<ArbDate>) -> bool {
    date.map_or(true, |d| d.is_between(from, to))
}
