//! # uptime-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** that adapters must implement:
//!   - `InstanceStore` — list instances, write metadata, start, stop
//! - Define **use-cases** over that port:
//!   - `ScheduleService` — read (`all`), set, and clear per-instance
//!     weekly schedules
//!   - `Reconciler` — compare schedule-desired state to actual power
//!     state and issue at most one correcting action per instance
//! - Orchestrate domain objects without knowing *how* the provider
//!   registry works
//!
//! ## Dependency rule
//! Depends on `uptime-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod reconciler;
pub mod services;
