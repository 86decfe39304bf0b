//! Reconciler — compares schedule-desired state to actual power state.
//!
//! Each pass re-derives everything from the store: the instance's
//! metadata and power state are authoritative, nothing is persisted
//! between passes. Per instance the pass resolves the timezone,
//! localizes "now", picks today's slot, and issues at most one
//! correcting action — making repeated passes with an unchanged clock
//! converge to no-ops.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use uptime_domain::error::UptimeError;
use uptime_domain::instance::{InstanceId, PowerState, TIMES_KEY, TZ_KEY};
use uptime_domain::schedule::{ScheduleSlot, WeeklySchedule};
use uptime_domain::time::{localize, now};
use uptime_domain::weekday::Weekday;

use crate::ports::InstanceStore;

/// Correcting action chosen for one instance. Transient — recomputed
/// fresh on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Start,
    Stop,
    Noop,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// State-changing actions issued, in listing order.
    pub actions: Vec<(InstanceId, Decision)>,
    /// Instances whose start/stop request failed, with the store error.
    /// The rest of the batch still processed.
    pub failures: Vec<(InstanceId, UptimeError)>,
}

/// Per-instance reconciliation over an instance store.
pub struct Reconciler<S> {
    store: S,
}

impl<S: InstanceStore> Reconciler<S> {
    /// Create a reconciler over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run one reconciliation pass against the current clock.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails. Per-instance
    /// start/stop failures land in the report instead.
    pub async fn check(&self, ids: Option<&[InstanceId]>) -> Result<CheckReport, UptimeError> {
        self.check_at(ids, now()).await
    }

    /// Run one reconciliation pass against a fixed instant. Exposed for
    /// tests and dry runs; [`check`](Self::check) delegates here.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails.
    pub async fn check_at(
        &self,
        ids: Option<&[InstanceId]>,
        now: DateTime<Utc>,
    ) -> Result<CheckReport, UptimeError> {
        let instances = self.store.list(ids).await?;
        let mut report = CheckReport::default();
        for instance in instances {
            if instance.state.is_terminated() {
                continue;
            }
            let Some(encoded) = instance.metadata(TIMES_KEY) else {
                continue;
            };
            // Without a timezone there is no local clock to compare
            // against — skip, not a failure.
            let Some(tz_name) = instance.metadata(TZ_KEY) else {
                debug!(id = %instance.id, "no timezone recorded, skipping");
                continue;
            };
            let Ok(tz) = tz_name.parse::<Tz>() else {
                warn!(id = %instance.id, tz = %tz_name, "unrecognized timezone, skipping");
                continue;
            };
            let local = localize(now, tz);
            let today = Weekday::from(local.weekday());
            let schedule = WeeklySchedule::decode(encoded);
            let slot = schedule.slot(today);
            if let ScheduleSlot::Invalid(raw) = slot {
                // Corrupt metadata for today: no decision, other days
                // may still be fine on later passes.
                warn!(id = %instance.id, day = %today, slot = %raw, "malformed schedule slot, no decision");
                continue;
            }
            match decide(slot, local.time(), instance.state) {
                Decision::Start => {
                    info!(id = %instance.id, "starting instance");
                    match self.store.start(&instance.id).await {
                        Ok(()) => report.actions.push((instance.id, Decision::Start)),
                        Err(err) => report.failures.push((instance.id, err)),
                    }
                }
                Decision::Stop => {
                    info!(id = %instance.id, "stopping instance");
                    match self.store.stop(&instance.id).await {
                        Ok(()) => report.actions.push((instance.id, Decision::Stop)),
                        Err(err) => report.failures.push((instance.id, err)),
                    }
                }
                Decision::Noop => {}
            }
        }
        Ok(report)
    }
}

/// Pure decision procedure for one instance's today-slot.
///
/// An unset slot means the instance should be stopped today; a window
/// means it should be running inside the window (inclusive bounds) and
/// stopped outside it. Preserved-invalid slots yield no decision. The
/// emitted action only fires when the actual state disagrees, so a
/// converged instance always gets [`Decision::Noop`].
#[must_use]
pub fn decide(slot: &ScheduleSlot, local_time: NaiveTime, state: PowerState) -> Decision {
    match slot {
        ScheduleSlot::Invalid(_) => Decision::Noop,
        ScheduleSlot::Unset => {
            if state.is_running() {
                Decision::Stop
            } else {
                Decision::Noop
            }
        }
        ScheduleSlot::Window(window) => {
            if window.contains(local_time) {
                if state.is_stopped() {
                    Decision::Start
                } else {
                    Decision::Noop
                }
            } else if state.is_running() {
                Decision::Stop
            } else {
                Decision::Noop
            }
        }
    }
}
