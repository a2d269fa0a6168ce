pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, AutoPronunciation, ClipboardConfig, EngineConfig, PathsConfig,
    PronunciationConfig, SearchConfig,
};

pub(crate) mod item;
pub use item::{EntryPath, EntryPathError, MAX_PATH_LENGTH, ResultItem, SelectionKey};

pub(crate) mod kind;
pub use kind::{ItemKind, ItemKinds};
