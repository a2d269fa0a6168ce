//! Query controller: the state machine in front of both search backends.
//!
//! Design:
//! - Every keystroke resets the query state, cancels the in-flight full-text
//!   request and all query timers, then runs the incremental search inline.
//! - The full-text request is issued from a zero-delay timer so keystrokes
//!   landing in the same loop turn collapse into one request.
//! - Full-text results are matched to the current request by generation;
//!   anything older is dropped before it can touch the state.
//! - Commits go through one single-shot timer whose delay scales with the
//!   incremental hit count, so two commit cycles never race.
//! - Selection and load requests made while the list is empty are latched and
//!   replayed after the next commit.
//!
//! Event loop API:
//! - `poll()`: fires due timers and drains finished full-text requests
//! - `wait_for_full_text()`: blocks for one full-text completion
//! - `time_until_next_timer()`: how long the loop may sleep

mod sink;

pub use sink::{Notice, ResultSink, SearchMode, SearchPage};

use crate::fulltext::{
    Completion, FullTextIndex, FullTextRequest, FullTextSearchClient, RequestToken,
};
use crate::incremental::{IncrementalIndex, IncrementalSearchClient};
use crate::merge::merge;
use crate::scheduler::{Clock, DebounceScheduler, TimerId, adaptive_delay};
use crate::selection::{self, SelectionTracker};
use crate::spell::{SpellCorrector, SpellIndex};
use glossa_core::text::{clipboard_query, has_wildcard, is_single_token, truncate_at_word};
use glossa_core::types::{AutoPronunciation, EngineConfig, EntryPath, ItemKinds, ResultItem};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Longest selected-text snippet turned into a query.
const SELECTION_MAX_CHARS: usize = 100;

/// Timers belonging to one logical query.
const QUERY_TIMERS: [TimerId; 4] = [
    TimerId::FullTextDispatch,
    TimerId::Commit,
    TimerId::SpellCorrection,
    TimerId::SearchingIndicator,
];

/// Backend handles owned by the application shell.
#[derive(Clone, Default)]
pub struct Backends {
    pub incremental: Option<Arc<dyn IncrementalIndex>>,
    pub full_text: Option<Arc<dyn FullTextIndex>>,
    pub spelling: Option<Arc<dyn SpellIndex>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No query.
    Idle,
    /// A full-text request is scheduled or in flight.
    Searching,
    /// Results are stored and a commit is pending.
    Merging,
    /// The shown list reflects every backend.
    Settled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    QueryBox,
    ResultList,
}

#[derive(Debug)]
pub enum Event {
    Timer(TimerId),
    FullText(Completion),
}

#[derive(Debug, Default)]
struct QueryState {
    text: String,
    /// `None`: backend absent or broken.
    incremental: Option<Vec<ResultItem>>,
    full_text: Option<Vec<ResultItem>>,
    /// Last committed list.
    items: Vec<ResultItem>,
    selection: SelectionTracker,
    pending_selection: bool,
    pending_load: bool,
    /// Query the next or current full-text request is issued for.
    full_text_query: Option<String>,
}

impl QueryState {
    fn reset(&mut self, text: &str, pending: bool) {
        self.text = text.to_string();
        self.incremental = None;
        self.full_text = None;
        self.full_text_query = None;
        self.pending_selection = pending;
        self.pending_load = pending;
    }
}

pub struct QueryController<S: ResultSink> {
    config: EngineConfig,
    scheduler: DebounceScheduler,
    incremental: IncrementalSearchClient,
    full_text: FullTextSearchClient,
    speller: SpellCorrector,
    sink: S,
    state: QueryState,
    focus: Focus,
    loaded: Option<EntryPath>,
    searching_visible: bool,
    incremental_missing_reported: bool,
    full_text_missing_reported: bool,
    closed: bool,
}

/// Create operations.
impl<S: ResultSink> QueryController<S> {
    pub fn new(config: EngineConfig, backends: Backends, clock: Arc<dyn Clock>, sink: S) -> Self {
        let full_text = match backends.full_text {
            Some(index) => FullTextSearchClient::spawn(index),
            None => FullTextSearchClient::detached(),
        };

        Self {
            config,
            scheduler: DebounceScheduler::new(clock),
            incremental: IncrementalSearchClient::new(backends.incremental),
            full_text,
            speller: SpellCorrector::new(backends.spelling),
            sink,
            state: QueryState::default(),
            focus: Focus::default(),
            loaded: None,
            searching_visible: false,
            incremental_missing_reported: false,
            full_text_missing_reported: false,
            closed: false,
        }
    }
}

/// State queries.
impl<S: ResultSink> QueryController<S> {
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        if self.closed {
            Phase::Idle
        } else if self.full_text.current().is_some()
            || self.scheduler.is_pending(TimerId::FullTextDispatch)
        {
            Phase::Searching
        } else if self.scheduler.is_pending(TimerId::Commit) {
            Phase::Merging
        } else if self.state.text.trim().is_empty() {
            Phase::Idle
        } else {
            Phase::Settled
        }
    }

    /// True while a selection or load request waits for results.
    pub fn is_deferred(&self) -> bool {
        self.state.pending_selection || self.state.pending_load
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn query(&self) -> &str {
        &self.state.text
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.state.items
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.state.selection.row()
    }

    pub fn loaded_entry(&self) -> Option<&EntryPath> {
        self.loaded.as_ref()
    }

    pub fn current_request(&self) -> Option<RequestToken> {
        self.full_text.current()
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.scheduler.is_pending(id)
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Query input.
impl<S: ResultSink> QueryController<S> {
    /// Keystroke-driven search. `immediate` skips the adaptive commit delay.
    pub fn on_query_changed(&mut self, text: &str, immediate: bool) {
        self.start_search(text, false, immediate);
    }

    /// Paste: searches immediately, then selects and loads the best row.
    pub fn on_query_pasted(&mut self, text: &str) {
        self.start_search(text, true, true);
    }

    /// Looks up text selected in the content view.
    pub fn search_selected_text(&mut self, text: &str) {
        let text = truncate_at_word(text, SELECTION_MAX_CHARS);
        self.start_search(&text, true, true);
    }

    /// Looks up clipboard contents copied from another window.
    ///
    /// Only searches when monitoring is enabled, the window is inactive, and
    /// the incremental index knows the text. Returns whether a search started.
    pub fn on_clipboard_changed(&mut self, text: &str, window_active: bool) -> bool {
        if self.closed || window_active || !self.config.monitor_clipboard {
            return false;
        }

        let query = clipboard_query(text, self.config.clipboard_max_chars);
        if query.is_empty() {
            return false;
        }

        let known = self
            .incremental
            .search(&query, self.config.incremental_limit)
            .is_some_and(|results| !results.is_empty());
        if known {
            self.start_search(&query, true, true);
        }
        known
    }

    /// Phrase search that replaces the incremental list with full-text results.
    pub fn run_advanced_search(
        &mut self,
        phrase: &str,
        filters: Option<&str>,
        mode: Option<SearchMode>,
    ) {
        if self.closed {
            return;
        }

        self.reset_pending_work();
        self.state.reset(phrase, false);
        self.state.incremental = Some(Vec::new());

        if self.full_text.is_attached() {
            let request = FullTextRequest {
                primary: phrase.to_string(),
                secondary: filters.map(str::to_string),
                item_kinds: ItemKinds::headwords_and_phrases(),
                limit: None,
                merge: false,
            };
            self.state.full_text_query = Some(phrase.to_string());
            self.show_searching();
            if self.full_text.update_query(request).is_none() {
                self.hide_searching();
                self.report_full_text_missing();
            }
        } else {
            self.report_full_text_missing();
        }

        self.scheduler.schedule_once(TimerId::Commit, Duration::ZERO);
        self.sink.open_search_page(&SearchPage {
            phrase: phrase.to_string(),
            filters: filters.map(str::to_string),
            mode,
        });
    }

    /// Opens the examples/definitions page for the current query.
    pub fn run_page_search(&mut self, mode: SearchMode) {
        let phrase = self.state.text.trim();
        if self.closed || phrase.is_empty() {
            return;
        }

        let page = SearchPage {
            phrase: phrase.to_string(),
            filters: None,
            mode: Some(mode),
        };
        self.sink.open_search_page(&page);
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }
}

/// Selection and loading.
impl<S: ResultSink> QueryController<S> {
    /// Moves the selection by `delta` rows.
    ///
    /// Without a selection, or with focus on the query box, the row is picked
    /// from the query instead. With no results the request is latched.
    pub fn select_relative(&mut self, delta: isize) {
        if self.closed {
            return;
        }
        if self.state.items.is_empty() {
            self.state.pending_selection = true;
            return;
        }

        let len = self.state.items.len();
        let row = match self.state.selection.row() {
            Some(current) if self.focus == Focus::ResultList => {
                let next = selection::step(current, delta, len);
                if next == current {
                    return;
                }
                Some(next)
            }
            _ => selection::fallback(&self.state.text, &self.state.items),
        };

        self.focus = Focus::ResultList;
        self.state.selection.select(row, &self.state.items);
        self.sink.select_row(row);
    }

    /// Loads the selected entry. With no results the request is latched.
    pub fn load_selected(&mut self) {
        if self.closed {
            return;
        }
        if self.state.items.is_empty() {
            self.state.pending_load = true;
            return;
        }
        if let Some(row) = self.state.selection.row() {
            self.load_row(row);
        }
    }

    /// Selects and loads `row`, as a mouse click on the list does.
    pub fn activate_row(&mut self, row: usize) {
        if self.closed || row >= self.state.items.len() {
            return;
        }
        self.focus = Focus::ResultList;
        self.state.selection.select(Some(row), &self.state.items);
        self.load_row(row);
    }

    fn load_row(&mut self, row: usize) {
        let Some(item) = self.state.items.get(row) else {
            return;
        };
        if self.loaded.as_ref() == Some(&item.path) {
            return;
        }

        let path = item.path.clone();
        debug!("loading entry {path}");
        self.sink.load_entry(&path);
        self.loaded = Some(path);

        if self.config.auto_pronunciation != AutoPronunciation::Off {
            self.scheduler.schedule_once(
                TimerId::AutoPronunciation,
                self.config.auto_pronunciation_delay,
            );
        }
    }
}

/// Event loop.
impl<S: ResultSink> QueryController<S> {
    pub fn handle(&mut self, event: Event) {
        if self.closed {
            return;
        }
        match event {
            Event::Timer(id) => self.on_timer(id),
            Event::FullText(completion) => self.on_full_text(completion),
        }
    }

    /// Drains finished full-text requests, then fires every due timer.
    pub fn poll(&mut self) {
        if self.closed {
            return;
        }
        while let Some(completion) = self.full_text.try_recv() {
            self.on_full_text(completion);
        }
        while let Some(id) = self.scheduler.pop_due() {
            self.on_timer(id);
        }
    }

    /// Waits up to `timeout` for one full-text completion and handles it.
    pub fn wait_for_full_text(&mut self, timeout: Duration) -> bool {
        if self.closed {
            return false;
        }
        match self.full_text.recv_timeout(timeout) {
            Some(completion) => {
                self.on_full_text(completion);
                true
            }
            None => false,
        }
    }

    /// Cancels all pending work and releases the backends. Idempotent.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.hide_searching();
        self.scheduler.cancel_all();
        self.full_text.shutdown();
        self.incremental.release();
        self.speller.release();
        self.state.full_text_query = None;
        self.closed = true;
        debug!("query controller shut down");
    }

    fn on_timer(&mut self, id: TimerId) {
        match id {
            TimerId::FullTextDispatch => self.dispatch_full_text(),
            TimerId::Commit => self.commit(),
            TimerId::SearchingIndicator => self.show_searching(),
            TimerId::SpellCorrection => self.run_spell_correction(),
            TimerId::AutoPronunciation => self.play_pronunciation(),
        }
    }

    fn on_full_text(&mut self, completion: Completion) {
        let token = completion.token;
        let completion = match self.full_text.accept(completion) {
            Ok(completion) => completion,
            Err(discard) => {
                debug!("dropping full-text result {token:?}: {discard:?}");
                return;
            }
        };

        self.hide_searching();
        match completion.outcome {
            Ok(results) => {
                debug!("full-text {token:?}: {} hits", results.len());
                let delay = if completion.merge {
                    let count = self.state.incremental.as_ref().map_or(0, Vec::len);
                    adaptive_delay(
                        count,
                        self.config.incremental_limit,
                        self.config.max_commit_delay,
                    )
                } else {
                    self.state.incremental = None;
                    Duration::ZERO
                };
                self.state.full_text = Some(results);
                self.scheduler.schedule_once(TimerId::Commit, delay);
            }
            Err(err) => {
                warn!("full-text request {token:?} failed: {err}");
                self.sink.notice(Notice::FullTextUnavailable);
            }
        }
    }
}

/// Internals.
impl<S: ResultSink> QueryController<S> {
    fn start_search(&mut self, text: &str, pending: bool, immediate: bool) {
        if self.closed {
            return;
        }

        self.reset_pending_work();
        self.state.reset(text, pending);

        let query = text.trim();
        if query.is_empty() {
            self.commit();
            return;
        }

        // Wildcards are full-text only.
        let incremental = if has_wildcard(query) {
            Some(Vec::new())
        } else {
            self.incremental.search(query, self.config.incremental_limit)
        };

        let delay = match &incremental {
            Some(results) if !immediate => adaptive_delay(
                results.len(),
                self.config.incremental_limit,
                self.config.max_commit_delay,
            ),
            Some(_) => Duration::ZERO,
            None => {
                self.report_incremental_failure();
                Duration::ZERO
            }
        };
        self.state.incremental = incremental;

        self.schedule_full_text(query);
        self.scheduler.schedule_once(TimerId::Commit, delay);
    }

    fn reset_pending_work(&mut self) {
        self.full_text.cancel();
        for id in QUERY_TIMERS {
            self.scheduler.cancel(id);
        }
        self.hide_searching();
    }

    fn schedule_full_text(&mut self, query: &str) {
        if !self.full_text.is_attached() {
            self.report_full_text_missing();
            return;
        }
        self.state.full_text_query = Some(query.to_string());
        let delay = self.config.fulltext_dispatch_delay;
        self.scheduler.schedule_once(TimerId::FullTextDispatch, delay);
    }

    fn dispatch_full_text(&mut self) {
        let Some(query) = self.state.full_text_query.clone() else {
            return;
        };

        let item_kinds = if has_wildcard(&query) {
            ItemKinds::headwords_and_phrases()
        } else {
            ItemKinds::any()
        };
        let request = FullTextRequest {
            primary: query,
            secondary: None,
            item_kinds,
            limit: Some(self.config.fulltext_limit),
            merge: true,
        };

        match self.full_text.update_query(request) {
            Some(token) => {
                debug!("issued full-text request {token:?}");
                self.scheduler.schedule_once(
                    TimerId::SearchingIndicator,
                    self.config.searching_indicator_delay,
                );
            }
            None => self.report_full_text_missing(),
        }
    }

    /// Publishes the merged list and replays latched requests.
    fn commit(&mut self) {
        self.scheduler.cancel(TimerId::Commit);

        let state = &mut self.state;
        let nothing_found = matches!(
            (&state.incremental, &state.full_text),
            (Some(incremental), Some(full_text)) if incremental.is_empty() && full_text.is_empty()
        );
        if nothing_found && is_single_token(&state.text) {
            let delay = self.config.spell_correction_delay;
            self.scheduler.schedule_once(TimerId::SpellCorrection, delay);
        }

        let items = merge(state.incremental.as_deref(), state.full_text.as_deref());
        let mut selected = state.selection.rebuild(&items);

        // The entry on screen wins over the restored selection.
        if let Some(row) = self
            .loaded
            .as_ref()
            .and_then(|loaded| items.iter().position(|item| &item.path == loaded))
        {
            state.selection.select(Some(row), &items);
            selected = Some(row);
        }

        debug!("committing {} results for {:?}", items.len(), state.text);
        self.sink.show_results(&items, selected);
        state.items = items;

        if self.state.pending_selection {
            self.state.pending_selection = false;
            self.select_relative(0);
        }
        if self.state.pending_load {
            self.state.pending_load = false;
            self.load_selected();
        }
    }

    fn run_spell_correction(&mut self) {
        let query = self.state.text.trim().to_string();
        if !is_single_token(&query) {
            return;
        }

        let candidates = self.speller.correct(&query);
        if candidates.is_empty() {
            debug!("no spelling candidates for {query:?}");
            return;
        }
        self.sink.suggest(&query, &candidates);
    }

    fn play_pronunciation(&mut self) {
        let variant = self.config.auto_pronunciation;
        if variant == AutoPronunciation::Off {
            return;
        }
        if let Some(path) = &self.loaded {
            self.sink.play_pronunciation(path, variant);
        }
    }

    fn show_searching(&mut self) {
        self.scheduler.cancel(TimerId::SearchingIndicator);
        if !self.searching_visible {
            self.searching_visible = true;
            self.sink.set_searching(true);
        }
    }

    fn hide_searching(&mut self) {
        self.scheduler.cancel(TimerId::SearchingIndicator);
        if self.searching_visible {
            self.searching_visible = false;
            self.sink.set_searching(false);
        }
    }

    /// A missing index is reported once, a failing one on every query.
    fn report_incremental_failure(&mut self) {
        if self.incremental.is_attached() {
            self.sink.notice(Notice::IncrementalUnavailable);
        } else if !self.incremental_missing_reported {
            self.incremental_missing_reported = true;
            self.sink.notice(Notice::IncrementalUnavailable);
        }
    }

    fn report_full_text_missing(&mut self) {
        if !self.full_text_missing_reported {
            self.full_text_missing_reported = true;
            self.sink.notice(Notice::FullTextUnavailable);
        }
    }
}
