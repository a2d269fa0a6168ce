//! Keeps the logically selected entry stable while the list is rebuilt.

use glossa_core::text::normalize_index_key;
use glossa_core::types::{ResultItem, SelectionKey};
use std::collections::HashMap;

/// Current row plus the identity of the entry on it.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    row: Option<usize>,
    key: Option<SelectionKey>,
}

impl SelectionTracker {
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn key(&self) -> Option<&SelectionKey> {
        self.key.as_ref()
    }

    pub fn select(&mut self, row: Option<usize>, items: &[ResultItem]) {
        let item = row.and_then(|row| items.get(row));
        self.row = item.and(row);
        self.key = item.map(ResultItem::selection_key);
    }

    /// Re-selects the previously selected entry in a rebuilt list.
    ///
    /// The entry keeps its selection wherever it moved; when it is gone
    /// nothing is selected.
    pub fn rebuild(&mut self, items: &[ResultItem]) -> Option<usize> {
        let row = self.key.as_ref().and_then(|key| restore(key, items));
        self.select(row, items);
        self.row
    }
}

/// Row of the first item whose `(sort_key, priority, path)` equals `key`.
pub fn restore(key: &SelectionKey, items: &[ResultItem]) -> Option<usize> {
    items.iter().position(|item| key.matches(item))
}

/// Picks a row for `query` when nothing usable is selected.
///
/// The first item whose case-folded sort key starts with the normalized
/// query wins. Without a prefix match the most similar sort key is chosen,
/// first occurrence on ties; nothing is selected if no item shares a single
/// character with the query.
pub fn fallback(query: &str, items: &[ResultItem]) -> Option<usize> {
    let needle = normalize_index_key(query);

    let folded: Vec<String> = items
        .iter()
        .map(|item| item.sort_key.to_lowercase())
        .collect();
    if let Some(row) = folded.iter().position(|key| key.starts_with(&needle)) {
        return Some(row);
    }

    let mut best: Option<(usize, f64)> = None;
    for (row, key) in folded.iter().enumerate() {
        let ratio = quick_ratio(&needle, key);
        if ratio > best.map_or(0.0, |(_, max)| max) {
            best = Some((row, ratio));
        }
    }
    best.map(|(row, _)| row)
}

/// Relative move from `current`, clamped to the list.
pub fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// Upper bound on the sequence-matching similarity of `a` and `b`.
///
/// Counts characters the two strings share regardless of position:
/// `2 * shared / (len(a) + len(b))`, and 1.0 for two empty strings.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut shared = 0usize;
    for c in a.chars() {
        match available.get_mut(&c) {
            Some(count) if *count > 0 => {
                *count -= 1;
                shared += 1;
            }
            _ => {}
        }
    }

    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        1.0
    } else {
        2.0 * shared as f64 / total as f64
    }
}
