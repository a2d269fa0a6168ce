mod app;
mod engine;

pub use app::{
    AppConfig, AppConfigError, AutoPronunciation, ClipboardConfig, PathsConfig,
    PronunciationConfig, SearchConfig,
};
pub use engine::EngineConfig;

#[cfg(test)]
mod tests;
