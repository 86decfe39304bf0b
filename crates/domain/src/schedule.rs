//! Weekly schedule — seven per-weekday slots and the metadata codec.
//!
//! The serialized form is a single string value of exactly seven
//! `;`-joined fields, Monday-first: the literal `None` for an unset
//! day, or `"<start>-<end>"` for a window. Legacy values with fewer
//! fields are padded with unset slots *before* any index-based update,
//! so absolute weekday positions stay correct.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::weekday::Weekday;
use crate::window::TimeWindow;

/// Number of slots in a schedule — one per weekday.
pub const SLOT_COUNT: usize = 7;

/// Field separator in the serialized form.
pub const DELIMITER: char = ';';

/// Serialized token for an unset slot.
pub const UNSET_TOKEN: &str = "None";

/// One weekday's entry in a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSlot {
    /// No restriction stored for this day.
    #[default]
    Unset,
    /// The day's uptime window.
    Window(TimeWindow),
    /// A stored field that failed to parse. The raw text is preserved
    /// verbatim so updates to *other* days never destroy it, and so
    /// reconciliation can tell "corrupt" apart from "explicitly unset".
    Invalid(String),
}

impl ScheduleSlot {
    /// The window, when this slot holds a valid one.
    #[must_use]
    pub const fn window(&self) -> Option<&TimeWindow> {
        match self {
            Self::Window(window) => Some(window),
            Self::Unset | Self::Invalid(_) => None,
        }
    }

    fn decode_field(field: &str) -> Self {
        if field == UNSET_TOKEN {
            return Self::Unset;
        }
        field
            .parse()
            .map_or_else(|_| Self::Invalid(field.to_string()), Self::Window)
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str(UNSET_TOKEN),
            Self::Window(window) => window.fmt(f),
            Self::Invalid(raw) => f.write_str(raw),
        }
    }
}

/// The full weekly uptime plan for one instance: exactly
/// [`SLOT_COUNT`] slots, Monday-first, regardless of what the
/// serialized source looked like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    slots: [ScheduleSlot; SLOT_COUNT],
}

impl WeeklySchedule {
    /// Decode a serialized schedule value.
    ///
    /// Never fails: an unparseable field becomes
    /// [`ScheduleSlot::Invalid`], missing trailing fields are padded as
    /// unset, and fields beyond the seventh are ignored.
    #[must_use]
    pub fn decode(input: &str) -> Self {
        let mut schedule = Self::default();
        for (slot, field) in schedule.slots.iter_mut().zip(input.split(DELIMITER)) {
            *slot = ScheduleSlot::decode_field(field);
        }
        schedule
    }

    /// Serialize to the seven-field metadata form.
    #[must_use]
    pub fn encode(&self) -> String {
        let fields: Vec<String> = self.slots.iter().map(ToString::to_string).collect();
        fields.join(&DELIMITER.to_string())
    }

    /// The slot stored for `day`.
    #[must_use]
    pub fn slot(&self, day: Weekday) -> &ScheduleSlot {
        &self.slots[day.slot()]
    }

    /// The window stored for `day`, when set and valid.
    #[must_use]
    pub fn window(&self, day: Weekday) -> Option<&TimeWindow> {
        self.slot(day).window()
    }

    /// Overwrite `day`'s slot — `None` clears it. Replaces whatever was
    /// there, including preserved invalid text.
    pub fn set(&mut self, day: Weekday, window: Option<TimeWindow>) {
        self.slots[day.slot()] = match window {
            Some(window) => ScheduleSlot::Window(window),
            None => ScheduleSlot::Unset,
        };
    }

    /// Iterate the days that hold a valid window, Monday-first.
    pub fn windows(&self) -> impl Iterator<Item = (Weekday, &TimeWindow)> {
        Weekday::ALL
            .into_iter()
            .filter_map(|day| self.window(day).map(|window| (day, window)))
    }

    /// Whether no day holds a window or preserved invalid text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| *slot == ScheduleSlot::Unset)
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
