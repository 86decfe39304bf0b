//! Time and timestamp helpers.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// UTC timestamp used for reconciliation instants.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Project a UTC instant onto a zone's local wall clock.
#[must_use]
pub fn localize(ts: Timestamp, tz: Tz) -> DateTime<Tz> {
    ts.with_timezone(&tz)
}
