use std::{collections::HashMap, fs, time::Duration};

use advice::{DEFAULT_BASE_URL, DEFAULT_GENERATION_TIMEOUT, DEFAULT_MODEL};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "alerts.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub advice_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/alerts.db".into(),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.into(),
            gemini_base_url: DEFAULT_BASE_URL.into(),
            advice_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

pub fn load_settings() -> Settings {
    let file_cfg = fs::read_to_string(SETTINGS_FILE)
        .ok()
        .and_then(|raw| toml::from_str::<HashMap<String, String>>(&raw).ok())
        .unwrap_or_default();
    let env: HashMap<String, String> = std::env::vars().collect();
    settings_from(&file_cfg, &env)
}

/// Layers file values over defaults, then environment values over both.
fn settings_from(file_cfg: &HashMap<String, String>, env: &HashMap<String, String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("gemini_api_key") {
        settings.gemini_api_key = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("gemini_model") {
        settings.gemini_model = v.clone();
    }
    if let Some(v) = file_cfg.get("gemini_base_url") {
        settings.gemini_base_url = v.clone();
    }
    if let Some(ms) = file_cfg.get("advice_timeout_ms").and_then(|v| v.parse().ok()) {
        settings.advice_timeout = Duration::from_millis(ms);
    }

    if let Some(v) = env.get("DATABASE_URL") {
        settings.database_url = v.clone();
    }
    if let Some(v) = env.get("APP__DATABASE_URL") {
        settings.database_url = v.clone();
    }

    if let Some(v) = env.get("API_KEY") {
        settings.gemini_api_key = Some(v.clone());
    }
    if let Some(v) = env.get("GEMINI_API_KEY") {
        settings.gemini_api_key = Some(v.clone());
    }

    if let Some(v) = env.get("APP__GEMINI_MODEL") {
        settings.gemini_model = v.clone();
    }
    if let Some(v) = env.get("APP__GEMINI_BASE_URL") {
        settings.gemini_base_url = v.clone();
    }
    if let Some(ms) = env.get("APP__ADVICE_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.advice_timeout = Duration::from_millis(ms);
    }

    settings.gemini_api_key = settings
        .gemini_api_key
        .filter(|key| !key.trim().is_empty());
    settings
}

/// Normalises plain paths to `sqlite://` URLs; the storage layer creates
/// the parent directory when it opens the database.
pub fn prepare_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    let path = raw_database_url
        .strip_prefix("sqlite:")
        .unwrap_or(raw_database_url);
    format!("sqlite://{}", path.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
