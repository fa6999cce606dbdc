#![forbid(unsafe_code)]

//! Core domain model and scheduling logic for the Dosplan system.
//!
//! This crate provides:
//! - Domain types (clock times, day ranges, dosage stages, doses, day plans)
//! - Stage table lookup with last-stage fallback
//! - Schedule generation over a wake/sleep window
//! - Pill budget estimation
//! - Post-generation editing and alarm polling helpers

pub mod types;
pub mod error;
pub mod stages;
pub mod config;
pub mod logging;
pub mod schedule;
pub mod budget;
pub mod editing;
pub mod alarm;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use stages::{default_dosage_stages, resolve_stage, validate_stages};
pub use config::Config;
pub use schedule::{generate_schedule, interval_minutes, plan_therapy};
pub use budget::{estimate_days, MAX_ESTIMATED_DAYS};
pub use alarm::{due_doses, AlarmClock, DueDose};
