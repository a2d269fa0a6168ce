use crate::incremental::IncrementalIndex;
use glossa_core::BackendError;
use glossa_core::text::normalize_index_key;
use glossa_core::types::ResultItem;
use std::path::Path;

/// Headwords sorted by normalized sort key, then priority, then path.
pub struct PrefixIndex {
    entries: Vec<(String, ResultItem)>,
}

impl PrefixIndex {
    pub fn new(items: impl IntoIterator<Item = ResultItem>) -> Self {
        let mut entries: Vec<(String, ResultItem)> = items
            .into_iter()
            .map(|item| (normalize_index_key(&item.sort_key), item))
            .collect();
        entries.sort_by(|(ka, a), (kb, b)| {
            ka.cmp(kb)
                .then(a.priority.cmp(&b.priority))
                .then_with(|| a.path.cmp(&b.path))
        });
        Self { entries }
    }

    /// Loads a JSON-lines file of [`ResultItem`]s.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let items: Vec<ResultItem> = super::read_json_lines(path)?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IncrementalIndex for PrefixIndex {
    fn search(&self, key: &str, limit: usize) -> Result<Vec<ResultItem>, BackendError> {
        let needle = normalize_index_key(key);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let start = self
            .entries
            .partition_point(|(sort_key, _)| sort_key.as_str() < needle.as_str());

        Ok(self.entries[start..]
            .iter()
            .take_while(|(sort_key, _)| sort_key.starts_with(&needle))
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect())
    }
}
