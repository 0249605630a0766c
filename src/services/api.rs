// src/services/api.rs

//! JSON API counter extractor.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{ExtractionError, Result};
use crate::models::{Reading, TargetConfig};
use crate::services::Extractor;
use crate::utils::{http, snippet};

/// Extractor for endpoints that expose the counter as JSON.
pub struct JsonApiExtractor {
    client: Client,
    url: String,
    current_pointer: String,
    limit_pointer: String,
}

impl JsonApiExtractor {
    pub fn new(client: Client, target: &TargetConfig) -> Result<Self> {
        url::Url::parse(&target.url)?;
        Ok(Self {
            client,
            url: target.url.clone(),
            current_pointer: target.current_pointer.clone(),
            limit_pointer: target.limit_pointer.clone(),
        })
    }

    /// Read a reading out of a JSON payload.
    pub fn parse_reading(&self, body: &str) -> std::result::Result<Reading, ExtractionError> {
        let payload: Value = serde_json::from_str(body).map_err(|e| {
            log::debug!("Response body: {}", snippet(body, 250));
            ExtractionError::parse(format!("response is not JSON: {e}"))
        })?;

        Ok(Reading::new(
            Self::field(&payload, &self.current_pointer)?,
            Self::field(&payload, &self.limit_pointer)?,
        ))
    }

    fn field(payload: &Value, pointer: &str) -> std::result::Result<u64, ExtractionError> {
        match payload.pointer(pointer) {
            None | Some(Value::Null) => Err(ExtractionError::schema(format!(
                "field '{pointer}' missing from response"
            ))),
            Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
                ExtractionError::parse(format!(
                    "field '{pointer}' is not a non-negative integer: {n}"
                ))
            }),
            Some(Value::String(s)) => s.trim().parse().map_err(|e| {
                ExtractionError::parse(format!("field '{pointer}' value '{s}': {e}"))
            }),
            Some(other) => Err(ExtractionError::parse(format!(
                "field '{pointer}' has unexpected type: {other}"
            ))),
        }
    }
}

#[async_trait]
impl Extractor for JsonApiExtractor {
    async fn attempt_extract(&self) -> std::result::Result<Reading, ExtractionError> {
        log::info!("Querying API: {}", self.url);
        let body =
            http::fetch_text_with(&self.client, &self.url, Some("application/json")).await?;
        self.parse_reading(&body)
    }

    fn source(&self) -> &str {
        &self.url
    }
}
