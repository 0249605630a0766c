// src/services/bark.rs

//! Bark push notification delivery.
//!
//! Posts `{title, body, url, group}` as JSON to `{server}/{key}`. The relay
//! answers with `{"code": 200, ...}` on success.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Notification, NotifyConfig};
use crate::services::Notifier;

#[derive(Debug, Serialize)]
struct BarkPayload<'a> {
    title: &'a str,
    body: &'a str,
    url: &'a str,
    group: &'a str,
}

#[derive(Debug, Deserialize)]
struct BarkResponse {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Notifier backed by a Bark relay.
pub struct BarkNotifier {
    client: Client,
    server: String,
    key: String,
    group: String,
}

impl BarkNotifier {
    pub fn new(client: Client, config: &NotifyConfig) -> Self {
        Self {
            client,
            server: config.server.trim_end_matches('/').to_string(),
            key: config.key.trim().to_string(),
            group: config.group.clone(),
        }
    }

    /// Whether a device key is configured.
    pub fn is_enabled(&self) -> bool {
        !self.key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.server, self.key)
    }
}

#[async_trait]
impl Notifier for BarkNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        if !self.is_enabled() {
            log::warn!(
                "Notify key not set, skipping notification: {}",
                notification.title
            );
            return Ok(());
        }

        let payload = BarkPayload {
            title: &notification.title,
            body: &notification.body,
            url: &notification.link,
            group: &self.group,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notify(format!("relay unreachable: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::notify(format!("cannot read relay response: {e}")))?;

        match serde_json::from_str::<BarkResponse>(&text) {
            Ok(reply) if reply.code == 200 => {
                log::info!("Notification sent: {}", notification.title);
                Ok(())
            }
            Ok(reply) => Err(AppError::notify(format!(
                "relay rejected notification (code {}): {}",
                reply.code, reply.message
            ))),
            Err(_) => Err(AppError::notify(format!(
                "unexpected relay response ({status}): {text}"
            ))),
        }
    }
}
