// src/services/mod.rs

//! Service layer for the watcher.
//!
//! This module contains the collaborators of the decision core:
//! - Counter extraction from HTML pages (`HtmlExtractor`)
//! - Counter extraction from JSON endpoints (`JsonApiExtractor`)
//! - Push notification delivery (`BarkNotifier`)

mod api;
mod bark;
mod html;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ExtractionError, Result};
use crate::models::{Notification, Reading, TargetConfig, TargetKind};

pub use api::JsonApiExtractor;
pub use bark::BarkNotifier;
pub use html::HtmlExtractor;

/// Produces a fresh reading from the monitored source.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch and parse one reading.
    async fn attempt_extract(&self) -> std::result::Result<Reading, ExtractionError>;

    /// Where readings come from; used as the notification link.
    fn source(&self) -> &str;
}

/// Delivers an alert to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Build the extractor configured for `target`.
pub fn build_extractor(client: Client, target: &TargetConfig) -> Result<Box<dyn Extractor>> {
    Ok(match target.kind {
        TargetKind::Html => Box::new(HtmlExtractor::new(client, target)?),
        TargetKind::Json => Box::new(JsonApiExtractor::new(client, target)?),
    })
}
