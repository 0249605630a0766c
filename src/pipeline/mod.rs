// src/pipeline/mod.rs

//! Pipeline entry points for watcher operations.
//!
//! - `decide`: pure change detection between two readings
//! - `run_cycle`: one full check cycle against the configured collaborators

pub mod cycle;
pub mod detect;

pub use cycle::{CycleContext, CycleReport, notification_for, run_cycle};
pub use detect::{Decision, decide};
