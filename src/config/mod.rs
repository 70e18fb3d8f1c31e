use crate::core::error::HeartTalkError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.cohere.ai/v1/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Environment variable that overrides the key stored in the config file.
pub const API_KEY_ENV: &str = "COHERE_API_KEY";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".hearttalk")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Loads `~/.hearttalk/config.yaml`, writing a default file on first run.
    pub fn load() -> Result<Config, HeartTalkError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Config, HeartTalkError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let mut config = if contents.trim().is_empty() {
                Config::default()
            } else {
                serde_yml::from_str::<Config>(&contents).map_err(|e| {
                    HeartTalkError::Config(format!("Parse {}: {}", path.display(), e))
                })?
            };
            config.source = Some(path.to_path_buf());
            debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config {
            source: Some(path.to_path_buf()),
            ..Config::default()
        };
        if let Err(e) = config.save_to(path) {
            debug!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), HeartTalkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Applies environment overrides. `lookup` is `std::env::var` in the
    /// binary and a closure in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            debug!("api key taken from {}", API_KEY_ENV);
            self.api_key = Some(key);
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn require_api_key(&self) -> Result<&str, HeartTalkError> {
        self.api_key()
            .ok_or_else(|| HeartTalkError::MissingApiKey(self.source_display()))
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    fn source_display(&self) -> String {
        self.source
            .clone()
            .unwrap_or_else(Self::config_path)
            .display()
            .to_string()
    }
}
