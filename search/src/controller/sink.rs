use glossa_core::types::{AutoPronunciation, EntryPath, ResultItem};
use std::fmt;

/// Page requested from the content renderer for an advanced search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub phrase: String,
    pub filters: Option<String>,
    pub mode: Option<SearchMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Examples,
    Definitions,
}

/// One-shot advisories shown when a backend cannot serve queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    IncrementalUnavailable,
    FullTextUnavailable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::IncrementalUnavailable => write!(
                f,
                "The incremental search index has not been created yet or is broken."
            ),
            Notice::FullTextUnavailable => write!(
                f,
                "The full-text search index has not been created yet or is broken."
            ),
        }
    }
}

/// Everything the controller tells the UI.
pub trait ResultSink {
    /// Replaces the result list. `selected` is the row to highlight, if any.
    fn show_results(&mut self, items: &[ResultItem], selected: Option<usize>);

    /// Moves the highlight without rebuilding the list.
    fn select_row(&mut self, row: Option<usize>);

    fn set_searching(&mut self, visible: bool);

    fn notice(&mut self, notice: Notice);

    /// Offers spelling candidates for `query`.
    fn suggest(&mut self, query: &str, candidates: &[String]);

    /// Opens an entry in the content view.
    fn load_entry(&mut self, path: &EntryPath);

    fn open_search_page(&mut self, page: &SearchPage);

    /// Starts pronunciation playback for the loaded entry.
    fn play_pronunciation(&mut self, path: &EntryPath, variant: AutoPronunciation);
}
