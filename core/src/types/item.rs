use nutype::nutype;
use serde::{Deserialize, Serialize};

pub const MAX_PATH_LENGTH: usize = 512;

/// Stable identity of a dictionary entry inside one index.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = MAX_PATH_LENGTH),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Hash,
        Borrow,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct EntryPath(String);

/// One dictionary entry matched by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Highlighted text for the list row. Opaque to the engine.
    pub display_markup: String,
    pub path: EntryPath,
    /// Normalized headword used for prefix matching and tie-breaking.
    pub sort_key: String,
    /// Entry kind ordinal, only used as a secondary tie-break.
    #[serde(default)]
    pub priority: u8,
}

impl ResultItem {
    pub fn new(
        display_markup: impl Into<String>,
        path: EntryPath,
        sort_key: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            display_markup: display_markup.into(),
            path,
            sort_key: sort_key.into(),
            priority,
        }
    }

    pub fn selection_key(&self) -> SelectionKey {
        SelectionKey {
            sort_key: self.sort_key.clone(),
            priority: self.priority,
            path: self.path.clone(),
        }
    }
}

/// `(sort_key, priority, path)` triple identifying an item across re-renders.
///
/// `display_markup` is deliberately left out: highlighting changes with every
/// keystroke while the entry stays the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub sort_key: String,
    pub priority: u8,
    pub path: EntryPath,
}

impl SelectionKey {
    pub fn matches(&self, item: &ResultItem) -> bool {
        self.priority == item.priority && self.path == item.path && self.sort_key == item.sort_key
    }
}
