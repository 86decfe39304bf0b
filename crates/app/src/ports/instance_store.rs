//! Instance store port — the provider registry this system drives.
//!
//! An implementation fronts a compute provider (or an in-memory fake).
//! The contract the use-case layer relies on:
//!
//! - `set_metadata` is **atomic per instance**: a schedule write either
//!   lands whole or not at all, and a read issued after a successful
//!   write observes it (read-your-writes per instance).
//! - `start`/`stop` are fire-and-forget requests: the store tracks the
//!   ensuing state transition, callers do not wait for it.
//! - Failures are [`StoreError`](uptime_domain::error::StoreError)s,
//!   transient or permanent; either way they are scoped to the one call.

use std::collections::HashMap;
use std::future::Future;

use uptime_domain::error::UptimeError;
use uptime_domain::instance::{Instance, InstanceId};

/// Abstract compute-instance registry.
pub trait InstanceStore: Send + Sync {
    /// List instances, optionally restricted to the given ids.
    ///
    /// Unknown ids are silently absent from the result rather than an
    /// error, matching provider list semantics.
    fn list(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> impl Future<Output = Result<Vec<Instance>, UptimeError>> + Send;

    /// Atomically write metadata entries on one instance.
    fn set_metadata(
        &self,
        id: &InstanceId,
        entries: HashMap<String, String>,
    ) -> impl Future<Output = Result<(), UptimeError>> + Send;

    /// Request that an instance be started.
    fn start(&self, id: &InstanceId) -> impl Future<Output = Result<(), UptimeError>> + Send;

    /// Request that an instance be stopped.
    fn stop(&self, id: &InstanceId) -> impl Future<Output = Result<(), UptimeError>> + Send;
}
