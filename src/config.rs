use crate::error::{PrepaceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini model for explanations and structured translation.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Cloud Translation v2 endpoint used by the field-wise fallback.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    /// Key for the string translation service. Falls back to `gemini_api_key`.
    pub translate_api_key: Option<String>,
    pub translate_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub progress_file: Option<PathBuf>,
    pub bank_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            translate_api_key: None,
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
            progress_file: None,
            bank_file: None,
        }
    }
}

/// Presence report for the settings the remote features depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStatus {
    pub gemini_api_key: bool,
    pub translate_api_key: bool,
    pub config_file: Option<PathBuf>,
    pub progress_file: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents)?;
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment-style overrides. `lookup` returns the value for a variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            self.gemini_api_key = Some(key);
        }
        if let Some(key) = lookup("PREPACE_TRANSLATE_API_KEY") {
            self.translate_api_key = Some(key);
        }
        if let Some(url) = lookup("PREPACE_TRANSLATE_URL") {
            self.translate_url = url;
        }
        if let Some(model) = lookup("PREPACE_MODEL") {
            self.model = model;
        }
        if let Some(timeout) = lookup("PREPACE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
        if let Some(path) = lookup("PREPACE_PROGRESS_FILE") {
            self.progress_file = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("PREPACE_BANK_FILE") {
            self.bank_file = Some(PathBuf::from(path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.is_none() {
            return Err(PrepaceError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(PrepaceError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn translate_key(&self) -> Option<&str> {
        self.translate_api_key
            .as_deref()
            .or(self.gemini_api_key.as_deref())
    }

    pub fn progress_path(&self) -> PathBuf {
        self.progress_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("prepace")
                .join("progress.json")
        })
    }

    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            gemini_api_key: self.gemini_api_key.is_some(),
            translate_api_key: self.translate_key().is_some(),
            config_file: Self::config_file_path().filter(|p| p.exists()),
            progress_file: self.progress_path(),
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()
            .ok_or_else(|| PrepaceError::Config("No config directory available".to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prepace").join("config.toml"))
    }
}
