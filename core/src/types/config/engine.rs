use super::app::{AppConfig, AutoPronunciation};
use std::time::Duration;

/// Runtime view of [`AppConfig`] consumed by the query controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub incremental_limit: usize,
    pub fulltext_limit: usize,
    pub max_commit_delay: Duration,
    pub fulltext_dispatch_delay: Duration,
    pub searching_indicator_delay: Duration,
    pub spell_correction_delay: Duration,
    pub auto_pronunciation: AutoPronunciation,
    pub auto_pronunciation_delay: Duration,
    pub monitor_clipboard: bool,
    pub clipboard_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for EngineConfig {
    fn from(config: &AppConfig) -> Self {
        let search = &config.search;
        Self {
            incremental_limit: search.incremental_limit,
            fulltext_limit: search.fulltext_limit,
            max_commit_delay: Duration::from_millis(search.max_commit_delay_ms),
            fulltext_dispatch_delay: Duration::from_millis(search.fulltext_dispatch_delay_ms),
            searching_indicator_delay: Duration::from_millis(search.searching_indicator_delay_ms),
            spell_correction_delay: Duration::from_millis(search.spell_correction_delay_ms),
            auto_pronunciation: config.pronunciation.auto_playback,
            auto_pronunciation_delay: Duration::from_millis(config.pronunciation.delay_ms),
            monitor_clipboard: config.clipboard.monitor,
            clipboard_max_chars: config.clipboard.max_chars,
        }
    }
}
