//! Reference backends implementing the index query contracts.
//!
//! - [`PrefixIndex`]: sorted in-memory headword list for the incremental path.
//! - [`FuzzyIndex`]: nucleo-backed matcher standing in for the full-text index.
//! - [`SymSpellIndex`]: frequency dictionary for spelling candidates.
//!
//! The on-disk formats are JSON lines for the two entry indexes and
//! `term count` lines for the spelling dictionary.

mod fuzzy;
mod prefix;
mod spelling;

pub use fuzzy::{FullTextDocument, FuzzyIndex};
pub use prefix::PrefixIndex;
pub use spelling::SymSpellIndex;

use glossa_core::BackendError;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::Path;

/// Reads one JSON value per non-blank line.
fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, BackendError> {
    let content = read_index_file(path)?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|err| {
                BackendError::Corrupt(format!("{}:{}: {err}", path.display(), idx + 1))
            })
        })
        .collect()
}

fn read_index_file(path: &Path) -> Result<String, BackendError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => BackendError::Unavailable(path.display().to_string()),
        ErrorKind::InvalidData => BackendError::Corrupt(format!("{}: {err}", path.display())),
        _ => BackendError::Unavailable(format!("{}: {err}", path.display())),
    })
}
