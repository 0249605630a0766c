// src/models/mod.rs

//! Domain models for the watcher.
//!
//! Readings and actions flow through the decision core; the configuration
//! types describe the target, the relay and where state is kept.

mod config;
mod reading;

// Re-export all public types
pub use config::{
    Config, HttpConfig, LoggingConfig, NotifyConfig, StateConfig, TargetConfig, TargetKind, env,
};
pub use reading::{Action, Notification, Reading};
