use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::suggest::{MIN_QUERY_CHARS, SuggestionSettings};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Provider base URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: DEFAULT_GEOCODING_URL.to_string(),
            forecast: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// Autocomplete tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Candidates requested per suggestion fetch.
    pub count: u32,
    /// Quiescence window before a suggestion fetch fires.
    pub debounce_ms: u64,
    /// Trimmed query length below which no fetch happens.
    pub min_query_chars: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            count: 5,
            debounce_ms: 300,
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// language = "en"
/// [suggestions]
/// debounce_ms = 250
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language code sent to the geocoder.
    pub language: String,
    pub endpoints: Endpoints,
    pub suggestions: SuggestionConfig,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            endpoints: Endpoints::default(),
            suggestions: SuggestionConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weathernow", "weathernow")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.language.trim().is_empty(), "language must not be empty");
        Url::parse(&self.endpoints.geocoding)
            .with_context(|| format!("Invalid geocoding URL '{}'", self.endpoints.geocoding))?;
        Url::parse(&self.endpoints.forecast)
            .with_context(|| format!("Invalid forecast URL '{}'", self.endpoints.forecast))?;
        ensure!(self.suggestions.count >= 1, "suggestions.count must be at least 1");
        ensure!(
            self.suggestions.min_query_chars >= MIN_QUERY_CHARS,
            "suggestions.min_query_chars must be at least {MIN_QUERY_CHARS}"
        );
        ensure!(self.http.timeout_secs >= 1, "http.timeout_secs must be at least 1");
        Ok(())
    }

    /// Override the language for this run only.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        if let Some(language) = language {
            self.language = language;
        }
        self
    }

    pub fn suggestion_settings(&self) -> SuggestionSettings {
        SuggestionSettings {
            count: self.suggestions.count,
            language: self.language.clone(),
            debounce: Duration::from_millis(self.suggestions.debounce_ms),
            min_query_chars: self.suggestions.min_query_chars,
        }
    }
}
