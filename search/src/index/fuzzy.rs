use crate::fulltext::FullTextIndex;
use glossa_core::BackendError;
use glossa_core::text::WILDCARD_CHARS;
use glossa_core::types::{ItemKind, ItemKinds, ResultItem};
use nucleo::pattern::{CaseMatching, Normalization};
use nucleo::{Config as NucleoConfig, Nucleo, Utf32String};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Column 0 holds the headword, column 1 the searchable body text.
const HEADWORD_COLUMN: usize = 0;
const TEXT_COLUMN: usize = 1;

/// Upper bound for one `tick` while draining a query.
const TICK_TIMEOUT_MS: u64 = 10;

/// One entry of the full-text index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTextDocument {
    pub item: ResultItem,
    pub kind: ItemKind,
    /// Body text matched by the secondary query.
    #[serde(default)]
    pub text: String,
}

/// Fuzzy full-text index on top of Nucleo, built once from its documents.
///
/// Duplicate paths keep their first document. Queries serialize on an internal
/// lock because Nucleo holds one pattern at a time.
pub struct FuzzyIndex {
    inner: Mutex<Inner>,
}

struct Inner {
    nucleo: Nucleo<FullTextDocument>,
}

impl FuzzyIndex {
    pub fn new(documents: impl IntoIterator<Item = FullTextDocument>) -> Self {
        let notify = Arc::new(|| {});
        let nucleo = Nucleo::new(NucleoConfig::DEFAULT, notify, None, 2);

        let injector = nucleo.injector();
        let mut seen = HashSet::new();
        for doc in documents {
            if !seen.insert(doc.item.path.clone()) {
                continue;
            }
            injector.push(doc, |doc, cols| {
                cols[HEADWORD_COLUMN] = Utf32String::from(doc.item.sort_key.as_str());
                cols[TEXT_COLUMN] = Utf32String::from(doc.text.as_str());
            });
        }

        Self {
            inner: Mutex::new(Inner { nucleo }),
        }
    }

    /// Loads a JSON-lines file of [`FullTextDocument`]s.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let documents: Vec<FullTextDocument> = super::read_json_lines(path)?;
        Ok(Self::new(documents))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, BackendError> {
        self.inner
            .lock()
            .map_err(|_| BackendError::Corrupt("fuzzy index lock poisoned".to_string()))
    }
}

impl FullTextIndex for FuzzyIndex {
    fn query(
        &self,
        primary: &str,
        secondary: Option<&str>,
        kinds: &ItemKinds,
        limit: Option<usize>,
    ) -> Result<Vec<ResultItem>, BackendError> {
        let wildcard = glob_to_regex(primary)?;
        self.lock()?.query(primary, secondary, kinds, limit, wildcard.as_ref())
    }
}

impl Inner {
    fn query(
        &mut self,
        primary: &str,
        secondary: Option<&str>,
        kinds: &ItemKinds,
        limit: Option<usize>,
        wildcard: Option<&Regex>,
    ) -> Result<Vec<ResultItem>, BackendError> {
        // Wildcard queries match every headword and are filtered afterwards.
        let headword_pattern = if wildcard.is_some() { "" } else { primary };

        self.nucleo.pattern.reparse(
            HEADWORD_COLUMN,
            headword_pattern,
            CaseMatching::Ignore,
            Normalization::Smart,
            false,
        );
        self.nucleo.pattern.reparse(
            TEXT_COLUMN,
            secondary.unwrap_or(""),
            CaseMatching::Ignore,
            Normalization::Smart,
            false,
        );

        loop {
            let status = self.nucleo.tick(TICK_TIMEOUT_MS);
            if !status.running {
                break;
            }
        }

        let snapshot = self.nucleo.snapshot();
        Ok(snapshot
            .matched_items(..)
            .map(|item| item.data)
            .filter(|doc| kinds.allows(doc.kind))
            .filter(|doc| wildcard.is_none_or(|re| re.is_match(&doc.item.sort_key)))
            .take(limit.unwrap_or(usize::MAX))
            .map(|doc| doc.item.clone())
            .collect())
    }
}

/// Anchored, case-insensitive regex for a `*`/`?` pattern; `None` without wildcards.
fn glob_to_regex(pattern: &str) -> Result<Option<Regex>, BackendError> {
    if !pattern.contains(WILDCARD_CHARS) {
        return Ok(None);
    }

    let mut source = String::from("^");
    for c in pattern.trim().chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| BackendError::Query(err.to_string()))
}
