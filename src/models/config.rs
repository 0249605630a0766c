// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// What to watch and how to read it
    #[serde(default)]
    pub target: TargetConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Push notification relay settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Where the last reading is kept between runs
    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration, returning `None` when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(toml::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::config(format!(
                "Cannot read config {:?}: {}",
                path, e
            ))),
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };

        if let Some(key) = first(&[env::NOTIFY_KEY, env::LEGACY_NOTIFY_KEY]) {
            self.notify.key = key;
        }
        if let Some(server) = first(&[env::NOTIFY_SERVER, env::LEGACY_NOTIFY_SERVER]) {
            self.notify.server = server;
        }
        if let Some(path) = first(&[env::STATE_FILE]) {
            self.state.path = PathBuf::from(path);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.target.name.trim().is_empty() {
            return Err(AppError::validation("target.name is empty"));
        }
        url::Url::parse(&self.target.url)?;
        url::Url::parse(&self.notify.server)?;
        if self.state.path.as_os_str().is_empty() {
            return Err(AppError::validation("state.path is empty"));
        }

        match self.target.kind {
            TargetKind::Html => {
                Selector::parse(&self.target.container_selector).map_err(|e| {
                    AppError::selector(&self.target.container_selector, format!("{e:?}"))
                })?;
                if self.target.current_attr.is_some() != self.target.limit_attr.is_some() {
                    return Err(AppError::validation(
                        "target.current_attr and target.limit_attr must be set together",
                    ));
                }
            }
            TargetKind::Json => {
                if self.target.current_pointer.is_empty() || self.target.limit_pointer.is_empty()
                {
                    return Err(AppError::validation(
                        "target.current_pointer and target.limit_pointer are required for json targets",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Environment variable names recognized by [`Config::apply_env`].
pub mod env {
    pub const NOTIFY_KEY: &str = "SLOTWATCH_NOTIFY_KEY";
    pub const NOTIFY_SERVER: &str = "SLOTWATCH_NOTIFY_SERVER";
    pub const STATE_FILE: &str = "SLOTWATCH_STATE_FILE";
    pub const LEGACY_NOTIFY_KEY: &str = "BARK_KEY";
    pub const LEGACY_NOTIFY_SERVER: &str = "BARK_SERVER_URL";
}

/// How the counter is read from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// HTML page with an `N / M` counter or data attributes
    #[default]
    Html,
    /// JSON endpoint
    Json,
}

/// The monitored page or endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Display name used in notification titles
    #[serde(default = "defaults::target_name")]
    pub name: String,

    #[serde(default = "defaults::target_url")]
    pub url: String,

    #[serde(default)]
    pub kind: TargetKind,

    /// CSS selector for the element holding the counter
    #[serde(default = "defaults::container_selector")]
    pub container_selector: String,

    /// Attribute on the container holding the current count
    #[serde(default)]
    pub current_attr: Option<String>,

    /// Attribute on the container holding the limit
    #[serde(default)]
    pub limit_attr: Option<String>,

    /// JSON pointer to the current count
    #[serde(default = "defaults::current_pointer")]
    pub current_pointer: String,

    /// JSON pointer to the limit
    #[serde(default = "defaults::limit_pointer")]
    pub limit_pointer: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            name: defaults::target_name(),
            url: defaults::target_url(),
            kind: TargetKind::default(),
            container_selector: defaults::container_selector(),
            current_attr: None,
            limit_attr: None,
            current_pointer: defaults::current_pointer(),
            limit_pointer: defaults::limit_pointer(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Bark relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the relay
    #[serde(default = "defaults::notify_server")]
    pub server: String,

    /// Device key; empty disables delivery
    #[serde(default)]
    pub key: String,

    /// Group shown on the receiving device
    #[serde(default = "defaults::notify_group")]
    pub group: String,

    /// Also notify when the first baseline is recorded
    #[serde(default)]
    pub on_first_observation: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            server: defaults::notify_server(),
            key: String::new(),
            group: defaults::notify_group(),
            on_first_observation: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "defaults::state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Target defaults
    pub fn target_name() -> String {
        "Serv00".into()
    }
    pub fn target_url() -> String {
        "https://www.serv00.com/".into()
    }
    pub fn container_selector() -> String {
        "div.hero-content".into()
    }
    pub fn current_pointer() -> String {
        "/current".into()
    }
    pub fn limit_pointer() -> String {
        "/limit".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        15
    }

    // Notify defaults
    pub fn notify_server() -> String {
        "https://api.day.app".into()
    }
    pub fn notify_group() -> String {
        "Serv00 Checker".into()
    }

    pub fn state_path() -> PathBuf {
        PathBuf::from("state/last_count.json")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.target.container_selector = "[[invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn validate_rejects_single_attr() {
        let mut config = Config::default();
        config.target.current_attr = Some("data-current".to_string());
        assert!(config.validate().is_err());

        config.target.limit_attr = Some("data-limit".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_json_pointer() {
        let mut config = Config::default();
        config.target.kind = TargetKind::Json;
        config.target.limit_pointer = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [target]
            kind = "json"
            url = "https://example.com/api/stats"
            current_pointer = "/accounts/used"

            [notify]
            on_first_observation = true
            "#,
        )
        .unwrap();

        assert_eq!(config.target.kind, TargetKind::Json);
        assert_eq!(config.target.current_pointer, "/accounts/used");
        assert_eq!(config.target.limit_pointer, "/limit");
        assert_eq!(config.http.timeout_secs, 15);
        assert!(config.notify.on_first_observation);
        assert!(config.notify.key.is_empty());
    }

    #[test]
    fn load_optional_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_optional(tmp.path().join("nope.toml")).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn load_optional_rejects_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("slotwatch.toml");
        fs::write(&path, "[target\nname = ").unwrap();
        assert!(Config::load_optional(&path).is_err());
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = Config::default();
        config.notify.key = "from-file".to_string();

        config.apply_overrides(lookup(&[
            (env::NOTIFY_KEY, "from-env"),
            (env::NOTIFY_SERVER, "https://bark.example.com"),
            (env::STATE_FILE, "/tmp/slotwatch.json"),
        ]));

        assert_eq!(config.notify.key, "from-env");
        assert_eq!(config.notify.server, "https://bark.example.com");
        assert_eq!(config.state.path, PathBuf::from("/tmp/slotwatch.json"));
    }

    #[test]
    fn env_overrides_fall_back_to_legacy_names() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (env::NOTIFY_KEY, "   "),
            (env::LEGACY_NOTIFY_KEY, "legacy-key"),
        ]));

        assert_eq!(config.notify.key, "legacy-key");
        assert_eq!(config.notify.server, "https://api.day.app");
    }
}
