//! Schedule service — read, set, and clear per-instance weekly schedules.
//!
//! Writes go through the store's atomic per-instance `set_metadata`:
//! every selected weekday slot is updated and persisted together with
//! the service's configured timezone identifier, or the instance's
//! failure is recorded and the batch moves on. Window validation happens
//! at [`TimeWindow`] construction, before any instance is touched, so a
//! rejected call makes zero mutations.

use std::collections::{BTreeMap, HashMap};

use chrono_tz::Tz;
use tracing::{debug, warn};

use uptime_domain::error::UptimeError;
use uptime_domain::instance::{InstanceId, ScheduleRecord, TIMES_KEY, TZ_KEY};
use uptime_domain::schedule::WeeklySchedule;
use uptime_domain::weekday::Weekday;
use uptime_domain::window::TimeWindow;

use crate::ports::InstanceStore;

/// Outcome of a batch schedule mutation.
///
/// Per-instance failures are collected here rather than aborting the
/// batch; only a failure to list instances at all surfaces as `Err`.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Instances whose schedule was written.
    pub updated: Vec<InstanceId>,
    /// Instances left untouched (terminated, or no record to mutate).
    pub skipped: Vec<InstanceId>,
    /// Instances whose write failed, with the store error.
    pub failures: Vec<(InstanceId, UptimeError)>,
}

/// Use-cases for managing stored schedules.
pub struct ScheduleService<S> {
    store: S,
    timezone: Tz,
    auto_create: bool,
}

impl<S: InstanceStore> ScheduleService<S> {
    /// Create a service writing `timezone` alongside every schedule.
    ///
    /// `auto_create` controls whether `set` initializes an all-unset
    /// record for instances that have none; `unset` never does.
    pub fn new(store: S, timezone: Tz, auto_create: bool) -> Self {
        Self {
            store,
            timezone,
            auto_create,
        }
    }

    /// Decoded set-day listings for all (or the given) instances.
    ///
    /// Instances without a schedule record are absent from the result;
    /// unset and unparseable slots are omitted from each listing.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails.
    pub async fn all(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> Result<BTreeMap<InstanceId, Vec<(Weekday, TimeWindow)>>, UptimeError> {
        let instances = self.store.list(ids).await?;
        let mut listings = BTreeMap::new();
        for instance in instances {
            let Some(encoded) = instance.metadata(TIMES_KEY) else {
                continue;
            };
            let schedule = WeeklySchedule::decode(encoded);
            let days: Vec<(Weekday, TimeWindow)> = schedule
                .windows()
                .map(|(day, window)| (day, *window))
                .collect();
            listings.insert(instance.id, days);
        }
        Ok(listings)
    }

    /// Decoded schedule records (schedule plus stored timezone) for all
    /// (or the given) instances. Instances with no record are skipped.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails.
    pub async fn records(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> Result<BTreeMap<InstanceId, ScheduleRecord>, UptimeError> {
        let instances = self.store.list(ids).await?;
        Ok(instances
            .into_iter()
            .filter_map(|instance| {
                let record = instance.schedule_record()?;
                Some((instance.id, record))
            })
            .collect())
    }

    /// Overwrite the selected days' slots with `window` on all (or the
    /// given) instances, creating missing records under the
    /// `auto_create` policy. Passing `None` clears the selected days.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails. Per-instance
    /// write failures land in the report instead.
    pub async fn set(
        &self,
        ids: Option<&[InstanceId]>,
        days: &[Weekday],
        window: Option<TimeWindow>,
    ) -> Result<ApplyReport, UptimeError> {
        self.apply(ids, days, window, self.auto_create).await
    }

    /// Clear the selected days' slots. An instance without a record is a
    /// no-op — clearing never creates one.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing instances fails.
    pub async fn unset(
        &self,
        ids: Option<&[InstanceId]>,
        days: &[Weekday],
    ) -> Result<ApplyReport, UptimeError> {
        self.apply(ids, days, None, false).await
    }

    async fn apply(
        &self,
        ids: Option<&[InstanceId]>,
        days: &[Weekday],
        window: Option<TimeWindow>,
        create_missing: bool,
    ) -> Result<ApplyReport, UptimeError> {
        let instances = self.store.list(ids).await?;
        let mut report = ApplyReport::default();
        for instance in instances {
            if instance.state.is_terminated() {
                debug!(id = %instance.id, "terminated instance, never written");
                report.skipped.push(instance.id);
                continue;
            }
            // Decoding pads short legacy values to seven slots before
            // any index-based update lands.
            let mut schedule = match instance.metadata(TIMES_KEY) {
                Some(encoded) => WeeklySchedule::decode(encoded),
                None if create_missing => WeeklySchedule::default(),
                None => {
                    debug!(id = %instance.id, "no schedule record, skipping");
                    report.skipped.push(instance.id);
                    continue;
                }
            };
            for day in days {
                schedule.set(*day, window);
            }
            let entries = HashMap::from([
                (TIMES_KEY.to_string(), schedule.encode()),
                (TZ_KEY.to_string(), self.timezone.name().to_string()),
            ]);
            match self.store.set_metadata(&instance.id, entries).await {
                Ok(()) => report.updated.push(instance.id),
                Err(err) => {
                    warn!(id = %instance.id, error = %err, "schedule write failed");
                    report.failures.push((instance.id, err));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::future::Future;
    use std::sync::Mutex;

    use uptime_domain::error::StoreError;
    use uptime_domain::instance::{Instance, PowerState};
    use uptime_domain::weekday::{WILDCARD, parse_selection};

    use super::*;

    // ── In-memory instance store ───────────────────────────────────

    struct FakeStore {
        instances: Mutex<HashMap<InstanceId, Instance>>,
        failing_writes: Mutex<HashSet<InstanceId>>,
    }

    impl FakeStore {
        fn with(instances: Vec<Instance>) -> Self {
            let map: HashMap<_, _> = instances
                .into_iter()
                .map(|i| (i.id.clone(), i))
                .collect();
            Self {
                instances: Mutex::new(map),
                failing_writes: Mutex::new(HashSet::new()),
            }
        }

        fn fail_writes_for(&self, id: &InstanceId) {
            self.failing_writes.lock().unwrap().insert(id.clone());
        }

        fn metadata(&self, id: &InstanceId, key: &str) -> Option<String> {
            let instances = self.instances.lock().unwrap();
            instances.get(id)?.metadata(key).map(str::to_string)
        }
    }

    impl InstanceStore for FakeStore {
        fn list(
            &self,
            ids: Option<&[InstanceId]>,
        ) -> impl Future<Output = Result<Vec<Instance>, UptimeError>> + Send {
            let instances = self.instances.lock().unwrap();
            let mut result: Vec<Instance> = match ids {
                Some(ids) => ids
                    .iter()
                    .filter_map(|id| instances.get(id).cloned())
                    .collect(),
                None => instances.values().cloned().collect(),
            };
            result.sort_by(|a, b| a.id.cmp(&b.id));
            async { Ok(result) }
        }

        fn set_metadata(
            &self,
            id: &InstanceId,
            entries: HashMap<String, String>,
        ) -> impl Future<Output = Result<(), UptimeError>> + Send {
            let failing = self.failing_writes.lock().unwrap().contains(id);
            let result = if failing {
                Err(StoreError::Transient("write throttled".to_string()).into())
            } else {
                let mut instances = self.instances.lock().unwrap();
                match instances.get_mut(id) {
                    Some(instance) => {
                        instance.metadata.extend(entries);
                        Ok(())
                    }
                    None => Err(StoreError::Permanent("no such instance".to_string()).into()),
                }
            };
            async { result }
        }

        fn start(
            &self,
            id: &InstanceId,
        ) -> impl Future<Output = Result<(), UptimeError>> + Send {
            let mut instances = self.instances.lock().unwrap();
            if let Some(instance) = instances.get_mut(id) {
                instance.state = PowerState::Running;
            }
            async { Ok(()) }
        }

        fn stop(&self, id: &InstanceId) -> impl Future<Output = Result<(), UptimeError>> + Send {
            let mut instances = self.instances.lock().unwrap();
            if let Some(instance) = instances.get_mut(id) {
                instance.state = PowerState::Stopped;
            }
            async { Ok(()) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::parse(start, end).unwrap()
    }

    fn scheduled_instance(id: &str, times: &str) -> Instance {
        Instance::new(id, PowerState::Stopped)
            .with_metadata(TIMES_KEY, times)
            .with_metadata(TZ_KEY, "UTC")
    }

    fn service(store: FakeStore, auto_create: bool) -> ScheduleService<FakeStore> {
        ScheduleService::new(store, chrono_tz::US::Eastern, auto_create)
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_set_selected_day_and_attach_timezone() {
        let store = FakeStore::with(vec![scheduled_instance(
            "i-01",
            "None;None;None;None;None;None;None",
        )]);
        let svc = service(store, false);

        let report = svc
            .set(None, &[Weekday::Monday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert_eq!(report.updated, vec![InstanceId::new("i-01")]);
        assert!(report.failures.is_empty());
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("09:00-17:00;None;None;None;None;None;None".to_string())
        );
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TZ_KEY),
            Some("US/Eastern".to_string())
        );
    }

    #[tokio::test]
    async fn should_not_alter_other_days_on_set() {
        let store = FakeStore::with(vec![scheduled_instance(
            "i-01",
            "08:00-12:00;None;garbage;None;None;None;13:00-14:00",
        )]);
        let svc = service(store, false);

        svc.set(None, &[Weekday::Tuesday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        // Monday, the corrupt Wednesday text, and Sunday all survive.
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("08:00-12:00;09:00-17:00;garbage;None;None;None;13:00-14:00".to_string())
        );
    }

    #[tokio::test]
    async fn should_pad_legacy_short_values_before_updating() {
        let store = FakeStore::with(vec![scheduled_instance("i-01", "09:00-17:00;None")]);
        let svc = service(store, false);

        svc.set(None, &[Weekday::Sunday], Some(window("10:00", "11:00")))
            .await
            .unwrap();

        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("09:00-17:00;None;None;None;None;None;10:00-11:00".to_string())
        );
    }

    #[tokio::test]
    async fn should_apply_wildcard_like_the_explicit_list() {
        let all_names: Vec<&str> = Weekday::ALL.iter().map(|d| d.name()).collect();
        for selection in [
            parse_selection(&[WILDCARD]).unwrap(),
            parse_selection(&all_names).unwrap(),
        ] {
            let store = FakeStore::with(vec![scheduled_instance(
                "i-01",
                "None;None;None;None;None;None;None",
            )]);
            let svc = service(store, false);
            svc.set(None, &selection, Some(window("09:00", "17:00")))
                .await
                .unwrap();
            let encoded = svc
                .store
                .metadata(&InstanceId::new("i-01"), TIMES_KEY)
                .unwrap();
            assert_eq!(encoded.matches("09:00-17:00").count(), 7);
        }
    }

    #[tokio::test]
    async fn should_create_missing_record_when_auto_create_is_on() {
        let store = FakeStore::with(vec![Instance::new("i-01", PowerState::Stopped)]);
        let svc = service(store, true);

        let report = svc
            .set(None, &[Weekday::Friday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("None;None;None;None;None;09:00-17:00;None".to_string())
        );
    }

    #[tokio::test]
    async fn should_skip_recordless_instance_when_auto_create_is_off() {
        let store = FakeStore::with(vec![Instance::new("i-01", PowerState::Stopped)]);
        let svc = service(store, false);

        let report = svc
            .set(None, &[Weekday::Friday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert!(report.updated.is_empty());
        assert_eq!(report.skipped, vec![InstanceId::new("i-01")]);
        assert_eq!(svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY), None);
    }

    #[tokio::test]
    async fn should_never_write_terminated_instances() {
        let store = FakeStore::with(vec![
            Instance::new("i-01", PowerState::Terminated)
                .with_metadata(TIMES_KEY, "None;None;None;None;None;None;None"),
        ]);
        let svc = service(store, true);

        let report = svc
            .set(None, &[Weekday::Monday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert!(report.updated.is_empty());
        assert_eq!(report.skipped, vec![InstanceId::new("i-01")]);
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("None;None;None;None;None;None;None".to_string())
        );
    }

    #[tokio::test]
    async fn should_clear_selected_days_on_unset() {
        let store = FakeStore::with(vec![scheduled_instance(
            "i-01",
            "09:00-17:00;09:00-17:00;None;None;None;None;None",
        )]);
        let svc = service(store, true);

        let report = svc.unset(None, &[Weekday::Monday]).await.unwrap();

        assert_eq!(report.updated.len(), 1);
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("None;09:00-17:00;None;None;None;None;None".to_string())
        );
    }

    #[tokio::test]
    async fn should_treat_unset_of_missing_record_as_noop_even_with_auto_create() {
        let store = FakeStore::with(vec![Instance::new("i-01", PowerState::Stopped)]);
        let svc = service(store, true);

        let report = svc.unset(None, &[Weekday::Monday]).await.unwrap();

        assert!(report.updated.is_empty());
        assert_eq!(report.skipped, vec![InstanceId::new("i-01")]);
        assert_eq!(svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY), None);
    }

    #[tokio::test]
    async fn should_collect_write_failures_and_continue_the_batch() {
        let store = FakeStore::with(vec![
            scheduled_instance("i-01", "None;None;None;None;None;None;None"),
            scheduled_instance("i-02", "None;None;None;None;None;None;None"),
        ]);
        store.fail_writes_for(&InstanceId::new("i-01"));
        let svc = service(store, false);

        let report = svc
            .set(None, &[Weekday::Monday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert_eq!(report.updated, vec![InstanceId::new("i-02")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, InstanceId::new("i-01"));
    }

    #[tokio::test]
    async fn should_restrict_mutation_to_the_given_ids() {
        let store = FakeStore::with(vec![
            scheduled_instance("i-01", "None;None;None;None;None;None;None"),
            scheduled_instance("i-02", "None;None;None;None;None;None;None"),
        ]);
        let svc = service(store, false);

        let only = [InstanceId::new("i-02")];
        svc.set(Some(&only), &[Weekday::Monday], Some(window("09:00", "17:00")))
            .await
            .unwrap();

        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-01"), TIMES_KEY),
            Some("None;None;None;None;None;None;None".to_string())
        );
        assert_eq!(
            svc.store.metadata(&InstanceId::new("i-02"), TIMES_KEY),
            Some("09:00-17:00;None;None;None;None;None;None".to_string())
        );
    }

    #[tokio::test]
    async fn should_list_set_days_and_skip_recordless_instances() {
        let store = FakeStore::with(vec![
            scheduled_instance("i-01", "09:00-17:00;None;garbage;None;None;None;None"),
            Instance::new("i-02", PowerState::Running),
        ]);
        let svc = service(store, false);

        let listings = svc.all(None).await.unwrap();

        assert_eq!(listings.len(), 1);
        let days = &listings[&InstanceId::new("i-01")];
        assert_eq!(days, &vec![(Weekday::Monday, window("09:00", "17:00"))]);
    }

    #[tokio::test]
    async fn should_read_records_with_their_stored_timezone() {
        let store = FakeStore::with(vec![
            scheduled_instance("i-01", "09:00-17:00;None;None;None;None;None;None"),
            Instance::new("i-02", PowerState::Running),
        ]);
        let svc = service(store, false);

        let records = svc.records(None).await.unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[&InstanceId::new("i-01")];
        assert_eq!(record.timezone.as_deref(), Some("UTC"));
        assert_eq!(
            record.schedule.window(Weekday::Monday),
            Some(&window("09:00", "17:00"))
        );
    }

    #[tokio::test]
    async fn should_list_instance_with_record_but_no_set_days() {
        let store = FakeStore::with(vec![scheduled_instance(
            "i-01",
            "None;None;None;None;None;None;None",
        )]);
        let svc = service(store, false);

        let listings = svc.all(None).await.unwrap();

        assert_eq!(listings.len(), 1);
        assert!(listings[&InstanceId::new("i-01")].is_empty());
    }
}
