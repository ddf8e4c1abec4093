//! Configuration management
//!
//! Settings live in `settings.json` inside the myflix directory:
//! ```json
//! {
//!   "app": { "apiUrl": "https://movies-api-21.herokuapp.com", "requestTimeoutSecs": 30 }
//! }
//! ```
//! Keys the client does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{MYFLIX_API_URL_ENV, MYFLIX_PRODUCTION_URL};

const SETTINGS_FILENAME: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Client configuration (resolved view of the settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL, without a trailing slash
    pub api_url: String,
    /// Client-side request timeout; `None` waits forever
    pub request_timeout_secs: Option<u64>,
    /// True when the URL came from the environment
    pub api_url_from_env: bool,
    // URL as written in the settings file, kept so an env override is not persisted
    stored_api_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: MYFLIX_PRODUCTION_URL.to_string(),
            request_timeout_secs: None,
            api_url_from_env: false,
            stored_api_url: None,
        }
    }
}

impl Config {
    /// Load config from the myflix directory
    ///
    /// The API URL can be set via:
    /// 1. Environment variable MYFLIX_API_URL (wins)
    /// 2. Settings file (`myflix config set-url`)
    pub fn load(myflix_dir: &Path) -> Result<Self> {
        Self::load_with_override(myflix_dir, std::env::var(MYFLIX_API_URL_ENV).ok())
    }

    fn load_with_override(myflix_dir: &Path, env_url: Option<String>) -> Result<Self> {
        let raw = read_settings(&myflix_dir.join(SETTINGS_FILENAME))?;

        let stored_api_url = raw
            .app
            .api_url
            .as_deref()
            .map(normalize_url)
            .filter(|url| !url.is_empty());
        let env_url = env_url.as_deref().map(normalize_url).filter(|url| !url.is_empty());

        let api_url_from_env = env_url.is_some();
        let api_url = env_url
            .or_else(|| stored_api_url.clone())
            .unwrap_or_else(|| MYFLIX_PRODUCTION_URL.to_string());

        Ok(Self {
            api_url,
            request_timeout_secs: raw.app.request_timeout_secs.filter(|secs| *secs > 0),
            api_url_from_env,
            stored_api_url,
        })
    }

    /// Save config to the myflix directory
    /// Preserves other settings that the client doesn't manage
    pub fn save(&self, myflix_dir: &Path) -> Result<()> {
        let settings_path = myflix_dir.join(SETTINGS_FILENAME);

        // Load existing settings to preserve fields we don't manage
        let mut settings = read_settings(&settings_path)?;

        settings.app.api_url = self.stored_api_url.clone();
        settings.app.request_timeout_secs = self.request_timeout_secs;

        std::fs::create_dir_all(myflix_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Point the client at another API; `None` restores the production URL
    pub fn set_api_url(&mut self, url: Option<&str>) {
        self.stored_api_url = url.map(normalize_url).filter(|u| !u.is_empty());
        if !self.api_url_from_env {
            self.api_url = self
                .stored_api_url
                .clone()
                .unwrap_or_else(|| MYFLIX_PRODUCTION_URL.to_string());
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn read_settings(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
