//! # uptime-adapter-memory
//!
//! In-memory [`InstanceStore`] adapter — a simulated compute fleet for
//! testing and demonstration. State transitions are immediate:
//! `start`/`stop` land the instance directly in `running`/`stopped`.
//!
//! ## Dependency rule
//!
//! Depends on `uptime-app` (port traits) and `uptime-domain` only.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use uptime_app::ports::InstanceStore;
use uptime_domain::error::{StoreError, UptimeError};
use uptime_domain::instance::{Instance, InstanceId, PowerState};

/// Thread-safe in-memory instance registry.
///
/// Cheap to clone — clones share the same fleet, which is how the
/// schedule service and the reconciler see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryInstanceStore {
    instances: Arc<Mutex<HashMap<InstanceId, Instance>>>,
}

impl MemoryInstanceStore {
    /// Create an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an instance in the fleet.
    pub fn seed(&self, instance: Instance) {
        let mut instances = self.lock();
        instances.insert(instance.id.clone(), instance);
    }

    /// Snapshot one instance, if present.
    #[must_use]
    pub fn snapshot(&self, id: &InstanceId) -> Option<Instance> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<InstanceId, Instance>> {
        // Poisoned only if another holder panicked mid-write.
        self.instances.lock().expect("instance fleet lock poisoned")
    }

    fn transition(
        &self,
        id: &InstanceId,
        target: PowerState,
    ) -> Result<(), UptimeError> {
        let mut instances = self.lock();
        let instance = instances
            .get_mut(id)
            .ok_or_else(|| StoreError::Permanent(format!("no such instance: {id}")))?;
        if instance.state.is_terminated() {
            return Err(StoreError::Permanent(format!("instance {id} is terminated")).into());
        }
        instance.state = target;
        Ok(())
    }
}

impl InstanceStore for MemoryInstanceStore {
    fn list(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> impl Future<Output = Result<Vec<Instance>, UptimeError>> + Send {
        let instances = self.lock();
        let mut result: Vec<Instance> = match ids {
            Some(ids) => ids
                .iter()
                .filter_map(|id| instances.get(id).cloned())
                .collect(),
            None => instances.values().cloned().collect(),
        };
        drop(instances);
        result.sort_by(|a, b| a.id.cmp(&b.id));
        async { Ok(result) }
    }

    fn set_metadata(
        &self,
        id: &InstanceId,
        entries: HashMap<String, String>,
    ) -> impl Future<Output = Result<(), UptimeError>> + Send {
        let result = {
            let mut instances = self.lock();
            match instances.get_mut(id) {
                Some(instance) => {
                    instance.metadata.extend(entries);
                    Ok(())
                }
                None => Err(StoreError::Permanent(format!("no such instance: {id}")).into()),
            }
        };
        async { result }
    }

    fn start(&self, id: &InstanceId) -> impl Future<Output = Result<(), UptimeError>> + Send {
        let result = self.transition(id, PowerState::Running);
        async { result }
    }

    fn stop(&self, id: &InstanceId) -> impl Future<Output = Result<(), UptimeError>> + Send {
        let result = self.transition(id, PowerState::Stopped);
        async { result }
    }
}
