use crate::spell::SpellIndex;
use glossa_core::BackendError;
use log::debug;
use std::path::Path;
use symspell::{SymSpell, UnicodeStringStrategy, Verbosity};

const MAX_EDIT_DISTANCE: i64 = 2;
const MAX_CANDIDATES: usize = 10;

/// Spelling candidates from a SymSpell frequency dictionary.
pub struct SymSpellIndex {
    engine: SymSpell<UnicodeStringStrategy>,
    terms: usize,
}

impl SymSpellIndex {
    /// Builds a dictionary from `(term, frequency)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut index = Self::empty();
        for (term, count) in entries {
            if let Ok(count) = i64::try_from(count) {
                index.add_term(&term.to_lowercase(), count);
            }
        }
        index
    }

    /// Loads a `term count` dictionary file, one entry per line.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let content = super::read_index_file(path)?;

        let mut index = Self::empty();
        let mut rejected = 0usize;
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            match parse_line(line) {
                Some((term, count)) => index.add_term(term, count),
                None => rejected += 1,
            }
        }

        if index.terms == 0 && rejected > 0 {
            return Err(BackendError::Corrupt(format!(
                "{}: no valid dictionary lines",
                path.display()
            )));
        }
        debug!(
            "loaded {} spelling terms from {} ({rejected} rejected)",
            index.terms,
            path.display()
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms == 0
    }

    fn empty() -> Self {
        Self {
            engine: SymSpell::default(),
            terms: 0,
        }
    }

    fn add_term(&mut self, term: &str, count: i64) {
        if term.is_empty() {
            return;
        }
        self.engine
            .load_dictionary_line(&format!("{term} {count}"), 0, 1, " ");
        self.terms += 1;
    }
}

/// Splits a `term count` line. Anything but exactly two fields with an
/// integer count is rejected.
fn parse_line(line: &str) -> Option<(&str, i64)> {
    let mut fields = line.split_whitespace();
    let term = fields.next()?;
    let count = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((term, count))
}

impl SpellIndex for SymSpellIndex {
    fn correct(&self, word: &str) -> Result<Vec<String>, BackendError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .engine
            .lookup(&word, Verbosity::Closest, MAX_EDIT_DISTANCE)
            .into_iter()
            .filter(|suggestion| suggestion.term != word)
            .take(MAX_CANDIDATES)
            .map(|suggestion| suggestion.term)
            .collect())
    }
}
