//! Glossa query engine.
//!
//! Aggregates an incremental prefix index and a slower full-text index into
//! one result list for a dictionary lookup window.
//!
//! # Design
//!
//! - The incremental index answers inline on every keystroke.
//! - The full-text index runs on a worker thread. Requests carry a generation
//!   so results of superseded queries are dropped before they are merged.
//! - All timers (dispatch, commit, indicator, spelling, pronunciation) live in
//!   one [`DebounceScheduler`] owned by the controller; nothing fires behind
//!   the event loop's back.
//! - The merged list is committed after a delay that grows with the number of
//!   incremental hits, and the selected entry is restored by identity.
//!
//! # Event loop API
//!
//! - [`QueryController::poll`]: fires due timers and drains the worker
//! - [`QueryController::time_until_next_timer`]: how long the loop may sleep
//! - [`QueryController::wait_for_full_text`]: blocks for the worker instead

mod controller;
mod fulltext;
mod incremental;
mod index;
mod merge;
mod scheduler;
mod selection;
mod spell;

pub use controller::{
    Backends, Event, Focus, Notice, Phase, QueryController, ResultSink, SearchMode, SearchPage,
};
pub use fulltext::{
    Completion, Discard, FullTextIndex, FullTextRequest, FullTextSearchClient, RequestToken,
};
pub use incremental::{IncrementalIndex, IncrementalSearchClient};
pub use index::{FullTextDocument, FuzzyIndex, PrefixIndex, SymSpellIndex};
pub use merge::merge;
pub use scheduler::{Clock, DebounceScheduler, ManualClock, SystemClock, TimerId, adaptive_delay};
pub use selection::{SelectionTracker, fallback, quick_ratio, restore, step};
pub use spell::{SpellCorrector, SpellIndex};
