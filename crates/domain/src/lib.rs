//! # uptime-domain
//!
//! Pure domain model for weekly uptime scheduling of cloud compute
//! instances.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Weekdays** and their integer projections (plain and ISO
//!   numbering)
//! - Define **Time windows** (validated start–end pairs of local times)
//! - Define the **Weekly schedule** — seven slots, one per weekday — and
//!   its compact metadata codec
//! - Define **Instances** (provider resources with a power state and a
//!   key-value metadata attachment)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod instance;
pub mod schedule;
pub mod weekday;
pub mod window;
