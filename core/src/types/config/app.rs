use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// User-facing application configuration, persisted as config.toml.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub pronunciation: PronunciationConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl AppConfig {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), AppConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates config values and returns list of validation errors.
    /// Returns empty vec if config is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.search.incremental_limit == 0 {
            errors.push("search.incremental_limit must be at least 1".to_string());
        }

        if self.search.fulltext_limit == 0 {
            errors.push("search.fulltext_limit must be at least 1".to_string());
        }

        if self.search.max_commit_delay_ms > MAX_DELAY_MS {
            errors.push(format!(
                "search.max_commit_delay_ms must not exceed {MAX_DELAY_MS}"
            ));
        }

        if self.clipboard.max_chars == 0 {
            errors.push("clipboard.max_chars must be at least 1".to_string());
        }

        errors
    }

    /// Returns a validated config, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();
        Self {
            search: SearchConfig {
                incremental_limit: if self.search.incremental_limit == 0 {
                    defaults.search.incremental_limit
                } else {
                    self.search.incremental_limit
                },
                fulltext_limit: if self.search.fulltext_limit == 0 {
                    defaults.search.fulltext_limit
                } else {
                    self.search.fulltext_limit
                },
                max_commit_delay_ms: if self.search.max_commit_delay_ms > MAX_DELAY_MS {
                    defaults.search.max_commit_delay_ms
                } else {
                    self.search.max_commit_delay_ms
                },
                ..self.search.clone()
            },
            paths: self.paths.clone(),
            pronunciation: self.pronunciation.clone(),
            clipboard: ClipboardConfig {
                max_chars: if self.clipboard.max_chars == 0 {
                    defaults.clipboard.max_chars
                } else {
                    self.clipboard.max_chars
                },
                ..self.clipboard.clone()
            },
        }
    }
}

const MAX_DELAY_MS: u64 = 10_000;

/// Result limits and debounce timings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_incremental_limit")]
    pub incremental_limit: usize,
    #[serde(default = "default_fulltext_limit")]
    pub fulltext_limit: usize,
    /// Upper bound of the adaptive delay before a result list is committed.
    #[serde(default = "default_max_commit_delay_ms")]
    pub max_commit_delay_ms: u64,
    #[serde(default)]
    pub fulltext_dispatch_delay_ms: u64,
    #[serde(default = "default_indicator_delay_ms")]
    pub searching_indicator_delay_ms: u64,
    #[serde(default = "default_spell_correction_delay_ms")]
    pub spell_correction_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            incremental_limit: default_incremental_limit(),
            fulltext_limit: default_fulltext_limit(),
            max_commit_delay_ms: default_max_commit_delay_ms(),
            fulltext_dispatch_delay_ms: 0,
            searching_indicator_delay_ms: default_indicator_delay_ms(),
            spell_correction_delay_ms: default_spell_correction_delay_ms(),
        }
    }
}

fn default_incremental_limit() -> usize {
    500
}

fn default_fulltext_limit() -> usize {
    10_000
}

fn default_max_commit_delay_ms() -> u64 {
    100
}

fn default_indicator_delay_ms() -> u64 {
    200
}

fn default_spell_correction_delay_ms() -> u64 {
    200
}

/// Locations of the prebuilt indexes. A missing path means the backend is absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub incremental_index: Option<PathBuf>,
    #[serde(default)]
    pub fulltext_index: Option<PathBuf>,
    #[serde(default)]
    pub spelling_dictionary: Option<PathBuf>,
}

/// Automatic pronunciation playback after an entry is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationConfig {
    #[serde(default)]
    pub auto_playback: AutoPronunciation,
    #[serde(default = "default_auto_playback_delay_ms")]
    pub delay_ms: u64,
}

impl Default for PronunciationConfig {
    fn default() -> Self {
        Self {
            auto_playback: AutoPronunciation::default(),
            delay_ms: default_auto_playback_delay_ms(),
        }
    }
}

fn default_auto_playback_delay_ms() -> u64 {
    500
}

/// Pronunciation variant played automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoPronunciation {
    #[default]
    Off,
    Us,
    Gb,
}

impl fmt::Display for AutoPronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoPronunciation::Off => write!(f, "off"),
            AutoPronunciation::Us => write!(f, "us"),
            AutoPronunciation::Gb => write!(f, "gb"),
        }
    }
}

/// Clipboard-driven lookups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default)]
    pub monitor: bool,
    #[serde(default = "default_clipboard_max_chars")]
    pub max_chars: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            monitor: false,
            max_chars: default_clipboard_max_chars(),
        }
    }
}

fn default_clipboard_max_chars() -> usize {
    100
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
