// Application settings
// Loaded once at startup from <config_dir>/fogowatch/config.toml and
// threaded explicitly into the pipeline; never read as ambient state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use fogowatch_feed::DEFAULT_FEED_URL;
use fogowatch_recon::RelevanceConfig;

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Notification transport settings. No endpoint = print to stdout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub endpoint: Option<String>,
    pub recipients: Vec<String>,
    /// Recipients for cycle-failure reports; falls back to `recipients`.
    pub error_recipients: Vec<String>,
}

impl NotifySettings {
    pub fn effective_error_recipients(&self) -> &[String] {
        if self.error_recipients.is_empty() {
            &self.recipients
        } else {
            &self.error_recipients
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed_url: String,
    pub state_file: PathBuf,
    /// Seconds between poll cycles in watch mode.
    pub interval_secs: u64,
    pub relevance: RelevanceConfig,
    pub notify: NotifySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            state_file: Self::default_state_file(),
            interval_secs: 300,
            relevance: RelevanceConfig::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fogowatch/config.toml")
    }

    fn default_state_file() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fogowatch/snapshot.json")
    }

    /// A missing file falls back to defaults; a present-but-broken file is
    /// a startup error — the watcher must not run on a half-read config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings
            .relevance
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(settings)
    }
}
