//! Instance — a cloud compute resource as seen by this system: an
//! observable power state plus a key-value metadata attachment.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schedule::WeeklySchedule;

/// Metadata key holding the encoded weekly schedule.
pub const TIMES_KEY: &str = "times";

/// Metadata key holding the IANA timezone name.
pub const TZ_KEY: &str = "tz";

/// Opaque provider-assigned instance identifier (e.g. `i-0abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Wrap a provider identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InstanceId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Power state reported by the provider, in provider wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
}

impl PowerState {
    /// Whether the instance is up and billable.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the instance is fully stopped (not merely stopping).
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Whether the instance is gone for good. Terminated instances are
    /// never written to or actioned.
    #[must_use]
    pub fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Running => f.write_str("running"),
            Self::ShuttingDown => f.write_str("shutting-down"),
            Self::Stopping => f.write_str("stopping"),
            Self::Stopped => f.write_str("stopped"),
            Self::Terminated => f.write_str("terminated"),
        }
    }
}

/// A compute instance snapshot from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub state: PowerState,
    /// String-valued metadata entries (provider tags).
    pub metadata: HashMap<String, String>,
}

impl Instance {
    /// Build an instance with empty metadata.
    pub fn new(id: impl Into<InstanceId>, state: PowerState) -> Self {
        Self {
            id: id.into(),
            state,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry (builder-style, for seeding and tests).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata value.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The persisted schedule record, or `None` when the instance
    /// carries no `times` metadata at all.
    #[must_use]
    pub fn schedule_record(&self) -> Option<ScheduleRecord> {
        let schedule = WeeklySchedule::decode(self.metadata(TIMES_KEY)?);
        Some(ScheduleRecord {
            schedule,
            timezone: self.metadata(TZ_KEY).map(str::to_string),
        })
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The persisted per-instance unit: a decoded schedule plus the raw
/// timezone identifier it was written with (absent on legacy records).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub schedule: WeeklySchedule,
    pub timezone: Option<String>,
}
