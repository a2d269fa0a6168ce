//! Result sink that prints to a terminal.

use glossa_core::types::{AutoPronunciation, EntryPath, ResultItem};
use glossa_search::{Notice, ResultSink, SearchPage};
use log::warn;
use std::io::{self, Write};

/// Rows printed per commit.
const MAX_ROWS: usize = 20;

pub struct TerminalSink<W: Write> {
    out: W,
    rows: Vec<String>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("failed to write to terminal: {err}");
        }
    }

    fn print_rows(&mut self, selected: Option<usize>) -> io::Result<()> {
        for (row, line) in self.rows.iter().enumerate().take(MAX_ROWS) {
            let marker = if Some(row) == selected { '>' } else { ' ' };
            writeln!(self.out, "{marker} {row:>3}  {line}")?;
        }
        if self.rows.len() > MAX_ROWS {
            writeln!(self.out, "      ... {} more", self.rows.len() - MAX_ROWS)?;
        }
        self.out.flush()
    }
}

impl<W: Write> ResultSink for TerminalSink<W> {
    fn show_results(&mut self, items: &[ResultItem], selected: Option<usize>) {
        self.rows = items
            .iter()
            .map(|item| format!("{}  [{}]", item.sort_key, item.path))
            .collect();
        self.print(&format!("-- {} results", items.len()));
        if let Err(err) = self.print_rows(selected) {
            warn!("failed to write to terminal: {err}");
        }
    }

    fn select_row(&mut self, row: Option<usize>) {
        match row.and_then(|row| self.rows.get(row).map(|line| (row, line.clone()))) {
            Some((row, line)) => self.print(&format!("-- selected {row}: {line}")),
            None => self.print("-- no selection"),
        }
    }

    fn set_searching(&mut self, visible: bool) {
        if visible {
            self.print("-- searching...");
        }
    }

    fn notice(&mut self, notice: Notice) {
        self.print(&format!("!! {notice}"));
    }

    fn suggest(&mut self, query: &str, candidates: &[String]) {
        self.print(&format!(
            "-- no entries for {query:?}; did you mean: {}",
            candidates.join(", ")
        ));
    }

    fn load_entry(&mut self, path: &EntryPath) {
        self.print(&format!("-- loaded {path}"));
    }

    fn open_search_page(&mut self, page: &SearchPage) {
        let mode = page
            .mode
            .map_or_else(|| "headwords".to_string(), |mode| format!("{mode:?}").to_lowercase());
        match &page.filters {
            Some(filters) => self.print(&format!(
                "-- {mode} page for {:?} filtered by {filters:?}",
                page.phrase
            )),
            None => self.print(&format!("-- {mode} page for {:?}", page.phrase)),
        }
    }

    fn play_pronunciation(&mut self, path: &EntryPath, variant: AutoPronunciation) {
        self.print(&format!("-- pronounce {path} ({variant})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(headword: &str) -> ResultItem {
        let path = EntryPath::try_new(headword.to_string()).unwrap();
        ResultItem::new(headword, path, headword, 0)
    }

    fn output(sink: TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_selected_row_is_marked() {
        let mut sink = TerminalSink::new(Vec::new());

        sink.show_results(&[item("weigh"), item("weird")], Some(1));

        let out = output(sink);
        assert!(out.contains("-- 2 results"));
        assert!(out.contains(">   1  weird  [weird]"));
        assert!(out.contains("    0  weigh  [weigh]"));
    }

    #[test]
    fn test_long_lists_are_cut() {
        let items: Vec<ResultItem> = (0..25).map(|n| item(&format!("w{n}"))).collect();
        let mut sink = TerminalSink::new(Vec::new());

        sink.show_results(&items, None);

        let out = output(sink);
        assert!(out.contains("... 5 more"));
        assert!(!out.contains("w20"));
    }
}
