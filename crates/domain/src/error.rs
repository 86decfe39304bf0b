//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`UptimeError`] via `#[from]`. Malformed stored schedule slots are
//! deliberately *not* an error: they are recovered in place as
//! [`ScheduleSlot::Invalid`](crate::schedule::ScheduleSlot::Invalid) so
//! that the remaining weekdays stay usable.

use chrono::NaiveTime;

/// Umbrella error for schedule and store operations.
#[derive(Debug, thiserror::Error)]
pub enum UptimeError {
    /// Input rejected before any instance was touched.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// A weekday name outside the canonical seven.
    #[error("unknown weekday")]
    UnknownWeekday(#[from] UnknownWeekdayError),

    /// Provider-level failure from the instance store.
    #[error("instance store failure")]
    Store(#[from] StoreError),
}

/// Invalid caller input, caught at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Window bounds are equal or inverted.
    #[error("window start {start} must be strictly before end {end}")]
    WindowOrder { start: NaiveTime, end: NaiveTime },

    /// Time-of-day text not in 24-hour `HH:MM` or `HH:MM:SS` form.
    #[error("invalid time of day: {0:?}")]
    BadTime(String),
}

/// A weekday name that is not one of the canonical seven.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday: {name:?}")]
pub struct UnknownWeekdayError {
    /// The rejected name, as given by the caller.
    pub name: String,
}

/// Failure reported by the instance store provider.
///
/// Transient failures may succeed on the next scheduled pass; permanent
/// ones will not. Either way the failure is scoped to a single store
/// call — batch operations keep processing the remaining instances.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Retryable provider failure (throttling, timeouts, …).
    #[error("transient store failure: {0}")]
    Transient(String),

    /// Non-retryable provider failure (missing instance, bad request, …).
    #[error("permanent store failure: {0}")]
    Permanent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_validation_error() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let err: UptimeError = ValidationError::WindowOrder { start, end: start }.into();
        assert!(matches!(err, UptimeError::Validation(_)));
    }

    #[test]
    fn should_render_unknown_weekday_name() {
        let err = UnknownWeekdayError {
            name: "Caturday".to_string(),
        };
        assert_eq!(err.to_string(), "unknown weekday: \"Caturday\"");
    }

    #[test]
    fn should_distinguish_transient_from_permanent_store_failures() {
        let transient = StoreError::Transient("throttled".to_string());
        let permanent = StoreError::Permanent("no such instance".to_string());
        assert_ne!(transient, permanent);
        assert!(transient.to_string().starts_with("transient"));
        assert!(permanent.to_string().starts_with("permanent"));
    }
}
