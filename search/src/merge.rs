//! Combines the incremental and full-text result sets.

use glossa_core::types::{EntryPath, ResultItem};
use std::collections::HashSet;

/// Merges two result sets into one list.
///
/// With both present, incremental items come first in their own order,
/// followed by the full-text items whose `path` the incremental set does not
/// already contain. A single present set is returned verbatim, and two absent
/// sets give an empty list.
pub fn merge(
    incremental: Option<&[ResultItem]>,
    full_text: Option<&[ResultItem]>,
) -> Vec<ResultItem> {
    match (incremental, full_text) {
        (Some(incremental), Some(full_text)) => {
            let seen: HashSet<&EntryPath> = incremental.iter().map(|item| &item.path).collect();
            incremental
                .iter()
                .chain(full_text.iter().filter(|item| !seen.contains(&item.path)))
                .cloned()
                .collect()
        }
        (Some(only), None) | (None, Some(only)) => only.to_vec(),
        (None, None) => Vec::new(),
    }
}
