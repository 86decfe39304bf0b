//! Application services — use-cases built on the instance store port.

pub mod schedule_service;

pub use schedule_service::{ApplyReport, ScheduleService};
