//! Puzzle identifiers
//!
//! An id is `YYYY-MM-DD_<catalog version>`. The date is the UTC calendar day
//! the puzzle belongs to; the version pins the rule catalog the id was issued
//! against so an old id never silently resolves to a different sequence.

use super::PuzzleError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar-day puzzle identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PuzzleId {
    date: NaiveDate,
    version: String,
}

impl PuzzleId {
    /// Build an id for a given day
    ///
    /// # Errors
    /// Returns `PuzzleError::MalformedId` if the version is empty or contains
    /// whitespace.
    pub fn new(date: NaiveDate, version: impl Into<String>) -> Result<Self, PuzzleError> {
        let version = version.into();
        if version.is_empty() || version.chars().any(char::is_whitespace) {
            return Err(PuzzleError::MalformedId(format!(
                "{}_{version}",
                date.format(DATE_FORMAT)
            )));
        }
        Ok(Self { date, version })
    }

    /// The id for the UTC calendar day containing `now`
    ///
    /// Every instant between two UTC midnights maps to the same id.
    ///
    /// # Errors
    /// Returns `PuzzleError::MalformedId` for an invalid version string.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use numericle::puzzle::PuzzleId;
    ///
    /// let morning = Utc.with_ymd_and_hms(2025, 3, 9, 0, 0, 1).unwrap();
    /// let night = Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap();
    ///
    /// let a = PuzzleId::for_instant(morning, "v1").unwrap();
    /// let b = PuzzleId::for_instant(night, "v1").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.to_string(), "2025-03-09_v1");
    /// ```
    pub fn for_instant(now: DateTime<Utc>, version: &str) -> Result<Self, PuzzleError> {
        Self::new(now.date_naive(), version)
    }

    /// Today's id according to the system clock
    ///
    /// # Errors
    /// Returns `PuzzleError::MalformedId` for an invalid version string.
    pub fn today(version: &str) -> Result<Self, PuzzleError> {
        Self::for_instant(Utc::now(), version)
    }

    #[inline]
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The id for the following day under the same catalog version
    #[must_use]
    pub fn next_day(&self) -> Option<Self> {
        self.date.succ_opt().map(|date| Self {
            date,
            version: self.version.clone(),
        })
    }

    /// The id for the preceding day under the same catalog version
    #[must_use]
    pub fn previous_day(&self) -> Option<Self> {
        self.date.pred_opt().map(|date| Self {
            date,
            version: self.version.clone(),
        })
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date.format(DATE_FORMAT), self.version)
    }
}

impl FromStr for PuzzleId {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PuzzleError::MalformedId(s.to_string());

        let (date, version) = s.split_once('_').ok_or_else(malformed)?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| malformed())?;
        Self::new(date, version).map_err(|_| malformed())
    }
}

impl TryFrom<String> for PuzzleId {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PuzzleId> for String {
    fn from(id: PuzzleId) -> Self {
        id.to_string()
    }
}
