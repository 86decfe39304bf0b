//! Weekday — the seven calendar day names and their integer projections.
//!
//! Two numbering conventions exist in the wild: plain zero-based
//! (Monday = 0 … Sunday = 6) and ISO one-based (Monday = 1 … Sunday = 7).
//! Both are pure projections of the same enum; the serialized schedule
//! always uses the fixed Monday-first [`slot`](Weekday::slot) position,
//! so the convention only affects the name↔index API surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownWeekdayError;

/// Token selecting all seven weekdays at once.
pub const WILDCARD: &str = "*";

/// Day of the week, Monday-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Numbering convention for integer projections of a [`Weekday`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayNumbering {
    /// Monday = 0 … Sunday = 6.
    #[default]
    ZeroBased,
    /// Monday = 1 … Sunday = 7.
    Iso,
}

impl Weekday {
    /// All seven days, Monday-first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Fixed storage position (`0..=6`, Monday-first) in the serialized
    /// schedule. Independent of the numbering convention.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    /// Canonical English name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Integer index under the given numbering convention.
    #[must_use]
    pub const fn to_index(self, numbering: WeekdayNumbering) -> usize {
        match numbering {
            WeekdayNumbering::ZeroBased => self.slot(),
            WeekdayNumbering::Iso => self.slot() + 1,
        }
    }

    /// Inverse of [`to_index`](Self::to_index). Returns `None` when the
    /// index falls outside the convention's range.
    #[must_use]
    pub fn from_index(numbering: WeekdayNumbering, index: usize) -> Option<Self> {
        let slot = match numbering {
            WeekdayNumbering::ZeroBased => index,
            WeekdayNumbering::Iso => index.checked_sub(1)?,
        };
        Self::ALL.get(slot).copied()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = UnknownWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownWeekdayError {
                name: s.to_string(),
            })
    }
}

/// Parse a weekday selection as given by a caller.
///
/// The single token `"*"` expands to all seven days; anything else is a
/// list of canonical names.
///
/// # Errors
///
/// Returns [`UnknownWeekdayError`] for the first name outside the
/// canonical set — before any schedule is touched.
pub fn parse_selection<T: AsRef<str>>(tokens: &[T]) -> Result<Vec<Weekday>, UnknownWeekdayError> {
    match tokens {
        [token] if token.as_ref() == WILDCARD => Ok(Weekday::ALL.to_vec()),
        _ => tokens.iter().map(|token| token.as_ref().parse()).collect(),
    }
}
