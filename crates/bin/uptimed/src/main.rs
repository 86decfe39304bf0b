//! # uptimed — uptime scheduling daemon
//!
//! Composition root that wires the schedule service and reconciler to
//! an instance store and runs periodic reconciliation passes.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Construct the store adapter and application services
//! - Run a reconciliation pass on a fixed interval until shutdown
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uptime_adapter_memory::MemoryInstanceStore;
use uptime_app::reconciler::Reconciler;
use uptime_app::services::ScheduleService;
use uptime_domain::instance::{Instance, PowerState, TIMES_KEY, TZ_KEY};
use uptime_domain::schedule::WeeklySchedule;
use uptime_domain::weekday::Weekday;
use uptime_domain::window::TimeWindow;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let timezone = config.timezone()?;
    let store = MemoryInstanceStore::new();
    let service = ScheduleService::new(store.clone(), timezone, config.schedule.auto_create);
    let reconciler = Reconciler::new(store.clone());

    if config.demo.enabled {
        seed_demo_fleet(&store, &service).await?;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.reconciler.interval_secs));
    info!(
        interval_secs = config.reconciler.interval_secs,
        timezone = %timezone,
        "uptimed running"
    );
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match reconciler.check(None).await {
                    Ok(report) => info!(
                        actions = report.actions.len(),
                        failures = report.failures.len(),
                        "reconciliation pass complete"
                    ),
                    Err(err) => error!(error = %err, "reconciliation pass failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Seed a couple of instances and install weekday business hours on
/// them through the schedule service, so a fresh daemon has something
/// to reconcile.
async fn seed_demo_fleet(
    store: &MemoryInstanceStore,
    service: &ScheduleService<MemoryInstanceStore>,
) -> anyhow::Result<()> {
    let empty = WeeklySchedule::default().encode();
    store.seed(
        Instance::new("i-0demo01", PowerState::Stopped)
            .with_metadata(TIMES_KEY, empty.clone())
            .with_metadata(TZ_KEY, "UTC"),
    );
    store.seed(
        Instance::new("i-0demo02", PowerState::Running)
            .with_metadata(TIMES_KEY, empty)
            .with_metadata(TZ_KEY, "UTC"),
    );

    let weekdays = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
    let window = TimeWindow::parse("09:00", "17:00")?;
    let report = service.set(None, &weekdays, Some(window)).await?;
    info!(updated = report.updated.len(), "seeded demo fleet");
    Ok(())
}
