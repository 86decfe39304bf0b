//! Time window — a validated start–end pair of local times of day.
//!
//! The textual form is zone-agnostic 24-hour `HH:MM` (or `HH:MM:SS`
//! when seconds are present), joined by `-` as `"<start>-<end>"` — the
//! per-slot form used by the schedule codec.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A start–end pair of times of day during which an instance should be
/// running. Invariant: `start < end`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Build a window, rejecting equal or inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::WindowOrder`] when `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::WindowOrder { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a window from two `HH:MM[:SS]` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BadTime`] when either bound fails to
    /// parse, or [`ValidationError::WindowOrder`] when `start >= end`.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    /// Start of the window (inclusive).
    #[must_use]
    pub const fn start(self) -> NaiveTime {
        self.start
    }

    /// End of the window (inclusive).
    #[must_use]
    pub const fn end(self) -> NaiveTime {
        self.end
    }

    /// Whether `t` falls inside the window, inclusive at both bounds.
    #[must_use]
    pub fn contains(self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_time(self.start, f)?;
        f.write_str("-")?;
        render_time(self.end, f)
    }
}

impl FromStr for TimeWindow {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Times never contain `-`, so the first one is the separator.
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ValidationError::BadTime(s.to_string()))?;
        Self::parse(start, end)
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ValidationError::BadTime(s.to_string()))
}

/// Stable rendering: seconds only when non-zero, so `decode(encode(x))`
/// preserves the common `HH:MM` form byte for byte.
fn render_time(t: NaiveTime, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if t.second() == 0 {
        write!(f, "{}", t.format("%H:%M"))
    } else {
        write!(f, "{}", t.format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn should_accept_ordered_bounds() {
        let window = TimeWindow::new(hms(9, 0, 0), hms(17, 0, 0)).unwrap();
        assert_eq!(window.start(), hms(9, 0, 0));
        assert_eq!(window.end(), hms(17, 0, 0));
    }

    #[test]
    fn should_reject_equal_bounds() {
        let result = TimeWindow::new(hms(9, 0, 0), hms(9, 0, 0));
        assert!(matches!(
            result,
            Err(ValidationError::WindowOrder { .. })
        ));
    }

    #[test]
    fn should_reject_inverted_bounds() {
        let result = TimeWindow::new(hms(17, 0, 0), hms(9, 0, 0));
        assert!(matches!(
            result,
            Err(ValidationError::WindowOrder { .. })
        ));
    }

    #[test]
    fn should_parse_hour_minute_form() {
        let window: TimeWindow = "09:00-17:30".parse().unwrap();
        assert_eq!(window.start(), hms(9, 0, 0));
        assert_eq!(window.end(), hms(17, 30, 0));
    }

    #[test]
    fn should_parse_hour_minute_second_form() {
        let window: TimeWindow = "09:00:30-17:00:45".parse().unwrap();
        assert_eq!(window.start(), hms(9, 0, 30));
        assert_eq!(window.end(), hms(17, 0, 45));
    }

    #[test]
    fn should_reject_garbage_text() {
        assert!("not-a-window".parse::<TimeWindow>().is_err());
        assert!("0900".parse::<TimeWindow>().is_err());
        assert!("".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn should_include_both_bounds() {
        let window = TimeWindow::parse("09:00", "17:00").unwrap();
        assert!(window.contains(hms(9, 0, 0)));
        assert!(window.contains(hms(12, 0, 0)));
        assert!(window.contains(hms(17, 0, 0)));
        assert!(!window.contains(hms(8, 59, 59)));
        assert!(!window.contains(hms(17, 0, 1)));
    }

    #[test]
    fn should_render_without_seconds_when_zero() {
        let window = TimeWindow::parse("09:00", "17:00").unwrap();
        assert_eq!(window.to_string(), "09:00-17:00");
    }

    #[test]
    fn should_render_with_seconds_when_present() {
        let window = TimeWindow::parse("09:00:30", "17:00").unwrap();
        assert_eq!(window.to_string(), "09:00:30-17:00");
    }

    #[test]
    fn should_roundtrip_through_display() {
        let window = TimeWindow::parse("08:15", "18:45").unwrap();
        let parsed: TimeWindow = window.to_string().parse().unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let window = TimeWindow::parse("09:00", "17:00").unwrap();
        let json = serde_json::to_string(&window).unwrap();
        let parsed: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, window);
    }
}
