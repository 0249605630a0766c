// src/pipeline/cycle.rs

//! One check cycle: load → extract → decide → persist → notify.
//!
//! Every failure inside a cycle is handled here. Extraction failures become
//! an error notification, persistence and delivery failures are logged, and
//! the cycle always runs to completion.

use crate::models::{Action, Config, Notification, Reading};
use crate::services::{Extractor, Notifier};
use crate::storage::StateStore;

use super::detect::decide;

/// Per-run settings the driver needs from the configuration.
#[derive(Debug, Clone)]
pub struct CycleContext {
    /// Display name of the monitored service
    pub name: String,
    /// Send a notification when the first baseline is recorded
    pub notify_on_first_observation: bool,
}

impl CycleContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.target.name.clone(),
            notify_on_first_observation: config.notify.on_first_observation,
        }
    }
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub action: Action,
    /// A new baseline was written successfully
    pub persisted: bool,
    /// A notification was handed to the notifier and accepted
    pub notified: bool,
}

/// Run a single check cycle.
pub async fn run_cycle(
    extractor: &dyn Extractor,
    store: &dyn StateStore,
    notifier: &dyn Notifier,
    ctx: &CycleContext,
) -> CycleReport {
    let stored = match store.load().await {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("Cannot load previous state, treating as absent: {}", e);
            None
        }
    };

    let (action, persisted) = match extractor.attempt_extract().await {
        Err(e) => {
            log::error!("Extraction failed: {}", e);
            (Action::ExtractionFailed(e), false)
        }
        Ok(reading) => {
            log::info!("Accounts: {}", reading);
            let previous = stored.as_ref().map(|s| s.baseline(&reading));
            let decision = decide(reading, previous);

            let persisted = match &decision.persist {
                Some(next) => match store.save(next).await {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("Failed to persist reading {}: {}", next, e);
                        false
                    }
                },
                None => false,
            };
            (decision.action, persisted)
        }
    };

    log::info!("Decision: {}", action.label());

    let notified = match notification_for(&action, ctx, extractor.source()) {
        Some(notification) => match notifier.notify(&notification).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Notification not delivered: {}", e);
                false
            }
        },
        None => false,
    };

    CycleReport {
        action,
        persisted,
        notified,
    }
}

/// Build the alert for an action, if the action warrants one.
pub fn notification_for(
    action: &Action,
    ctx: &CycleContext,
    link: &str,
) -> Option<Notification> {
    let (title, body) = match action {
        Action::None => return None,
        Action::FirstObservation(_) if !ctx.notify_on_first_observation => return None,
        Action::FirstObservation(reading) => (
            format!("{}: monitoring started", ctx.name),
            format!("Accounts: {}", reading),
        ),
        Action::Changed { previous, current } => (
            format!("{}: account count changed", ctx.name),
            change_body(previous, current),
        ),
        Action::ExtractionFailed(e) => (
            format!("{} Script Error", ctx.name),
            format!("Check failed: {}", e),
        ),
    };

    Some(Notification {
        title,
        body,
        link: link.to_string(),
    })
}

fn change_body(previous: &Reading, current: &Reading) -> String {
    let verdict = if current.has_free_slots() {
        "Slots are open!"
    } else {
        "Still full."
    };
    format!(
        "Accounts: {} → {} / {}. {}",
        previous.current, current.current, current.limit, verdict
    )
}
