// src/services/html.rs

//! HTML counter extractor.
//!
//! Locates the counter container with a CSS selector, then reads the pair
//! either from two data attributes on the container or from the first
//! `N / M` pattern in its text.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, ExtractionError, Result};
use crate::models::{Reading, TargetConfig};
use crate::services::Extractor;
use crate::utils::{http, normalize_whitespace, snippet};

const COUNTER_PATTERN: &str = r"(\d+)\s*/\s*(\d+)";

/// Extractor for server-rendered signup pages.
pub struct HtmlExtractor {
    client: Client,
    url: String,
    container_selector: String,
    container: Selector,
    attrs: Option<(String, String)>,
    counter: Regex,
}

impl HtmlExtractor {
    /// Create an extractor for the given target.
    pub fn new(client: Client, target: &TargetConfig) -> Result<Self> {
        let container = Self::parse_selector(&target.container_selector)?;
        let counter = Regex::new(COUNTER_PATTERN)
            .map_err(|e| AppError::config(format!("counter pattern: {e}")))?;

        let attrs = match (&target.current_attr, &target.limit_attr) {
            (Some(current), Some(limit)) => Some((current.clone(), limit.clone())),
            (None, None) => None,
            _ => {
                return Err(AppError::validation(
                    "target.current_attr and target.limit_attr must be set together",
                ));
            }
        };

        Ok(Self {
            client,
            url: target.url.clone(),
            container_selector: target.container_selector.clone(),
            container,
            attrs,
            counter,
        })
    }

    /// Read a reading out of an HTML document.
    pub fn parse_reading(&self, html: &str) -> std::result::Result<Reading, ExtractionError> {
        let document = Html::parse_document(html);
        let container = document.select(&self.container).next().ok_or_else(|| {
            ExtractionError::schema(format!(
                "no element matches '{}'; the page layout may have changed",
                self.container_selector
            ))
        })?;

        match &self.attrs {
            Some((current_attr, limit_attr)) => Ok(Reading::new(
                Self::attr_value(&container, current_attr)?,
                Self::attr_value(&container, limit_attr)?,
            )),
            None => self.parse_counter_text(&container),
        }
    }

    fn parse_counter_text(
        &self,
        container: &ElementRef,
    ) -> std::result::Result<Reading, ExtractionError> {
        let text = normalize_whitespace(&container.text().collect::<String>());

        let Some(caps) = self.counter.captures(&text) else {
            log::debug!("Container text: {}", snippet(&text, 250));
            return Err(ExtractionError::schema(
                "container found but no 'N / M' account counter in its text",
            ));
        };

        Ok(Reading::new(
            parse_count(&caps[1], "current")?,
            parse_count(&caps[2], "limit")?,
        ))
    }

    fn attr_value(
        container: &ElementRef,
        attr: &str,
    ) -> std::result::Result<u64, ExtractionError> {
        let raw = container
            .value()
            .attr(attr)
            .ok_or_else(|| ExtractionError::schema(format!("container has no '{attr}' attribute")))?;
        parse_count(raw.trim(), attr)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn parse_count(raw: &str, field: &str) -> std::result::Result<u64, ExtractionError> {
    raw.parse()
        .map_err(|e| ExtractionError::parse(format!("{field} value '{raw}': {e}")))
}

#[async_trait]
impl Extractor for HtmlExtractor {
    async fn attempt_extract(&self) -> std::result::Result<Reading, ExtractionError> {
        log::info!("Checking URL: {}", self.url);
        let body = http::fetch_text(&self.client, &self.url).await?;
        self.parse_reading(&body)
    }

    fn source(&self) -> &str {
        &self.url
    }
}
