use glossa_core::types::{AutoPronunciation, EngineConfig, EntryPath, ItemKind, ResultItem};
use glossa_search::{
    Backends, FullTextDocument, FuzzyIndex, ManualClock, Notice, PrefixIndex, QueryController,
    ResultSink, SearchPage, SymSpellIndex,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Screen {
    list: Vec<String>,
    selected: Option<usize>,
    notices: Vec<Notice>,
    suggestions: Vec<String>,
    loaded: Vec<String>,
}

impl ResultSink for Screen {
    fn show_results(&mut self, items: &[ResultItem], selected: Option<usize>) {
        self.list = items.iter().map(|item| item.path.to_string()).collect();
        self.selected = selected;
    }

    fn select_row(&mut self, row: Option<usize>) {
        self.selected = row;
    }

    fn set_searching(&mut self, _visible: bool) {}

    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn suggest(&mut self, _query: &str, candidates: &[String]) {
        self.suggestions = candidates.to_vec();
    }

    fn load_entry(&mut self, path: &EntryPath) {
        self.loaded.push(path.to_string());
    }

    fn open_search_page(&mut self, _page: &SearchPage) {}

    fn play_pronunciation(&mut self, _path: &EntryPath, _variant: AutoPronunciation) {}
}

fn item(headword: &str) -> ResultItem {
    let path = EntryPath::try_new(headword.to_string()).unwrap();
    ResultItem::new(headword, path, headword, 0)
}

fn document(headword: &str, kind: ItemKind) -> FullTextDocument {
    FullTextDocument {
        item: item(headword),
        kind,
        text: String::new(),
    }
}

fn controller(clock: &ManualClock) -> QueryController<Screen> {
    let incremental = PrefixIndex::new(["weigh", "weird", "weirdo"].map(item));
    let full_text = FuzzyIndex::new(vec![
        document("weird", ItemKind::Headword),
        document("weirdo", ItemKind::Headword),
        document("outweigh", ItemKind::Headword),
    ]);
    let spelling = SymSpellIndex::from_entries([("weird", 500), ("weigh", 300)]);

    let backends = Backends {
        incremental: Some(Arc::new(incremental)),
        full_text: Some(Arc::new(full_text)),
        spelling: Some(Arc::new(spelling)),
    };
    QueryController::new(
        EngineConfig::default(),
        backends,
        Arc::new(clock.clone()),
        Screen::default(),
    )
}

fn settle(clock: &ManualClock, controller: &mut QueryController<Screen>) {
    for _ in 0..100 {
        controller.poll();
        if controller.current_request().is_some() {
            controller.wait_for_full_text(Duration::from_secs(5));
            continue;
        }
        match controller.time_until_next_timer() {
            Some(wait) => clock.advance(wait),
            None => return,
        }
    }
    panic!("lookup never settled");
}

/// Verify prefix matches come first and fuzzy-only matches are appended once.
#[test]
fn test_typing_merges_both_indexes() {
    let clock = ManualClock::new();
    let mut controller = controller(&clock);

    for query in ["w", "we", "wei", "weig", "weigh"] {
        controller.on_query_changed(query, false);
        controller.poll();
    }
    settle(&clock, &mut controller);

    assert_eq!(controller.sink().list, vec!["weigh", "outweigh"]);
    assert!(controller.sink().notices.is_empty());
}

/// Verify a paste selects and loads the best match without further input.
#[test]
fn test_paste_loads_best_match() {
    let clock = ManualClock::new();
    let mut controller = controller(&clock);

    controller.on_query_pasted("weird");
    settle(&clock, &mut controller);

    assert_eq!(controller.sink().list[0], "weird");
    assert_eq!(controller.sink().selected, Some(0));
    assert_eq!(controller.sink().loaded, vec!["weird"]);
}

/// Verify a misspelled single word ends with spelling suggestions.
#[test]
fn test_misspelling_suggests_corrections() {
    let clock = ManualClock::new();
    let mut controller = controller(&clock);

    controller.on_query_changed("wierd", false);
    settle(&clock, &mut controller);

    assert!(controller.sink().list.is_empty());
    assert!(controller.sink().suggestions.contains(&"weird".to_string()));
}

/// Verify a repeated shutdown is harmless and nothing is committed afterwards.
#[test]
fn test_shutdown_is_idempotent() {
    let clock = ManualClock::new();
    let mut controller = controller(&clock);

    controller.on_query_changed("wei", false);
    controller.shutdown();
    controller.shutdown();
    settle(&clock, &mut controller);

    assert!(controller.is_closed());
    assert!(controller.sink().list.is_empty());
}
