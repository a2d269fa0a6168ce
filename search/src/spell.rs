//! Correction candidates for single-word queries that found nothing.

use glossa_core::BackendError;
use log::warn;
use std::sync::Arc;

/// Query contract of the spelling dictionary.
pub trait SpellIndex: Send + Sync {
    /// Candidate spellings for `word`, best first.
    fn correct(&self, word: &str) -> Result<Vec<String>, BackendError>;
}

#[derive(Clone, Default)]
pub struct SpellCorrector {
    index: Option<Arc<dyn SpellIndex>>,
}

impl SpellCorrector {
    pub fn new(index: Option<Arc<dyn SpellIndex>>) -> Self {
        Self { index }
    }

    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    /// Never fails; a missing or broken dictionary means no suggestions.
    pub fn correct(&self, word: &str) -> Vec<String> {
        let Some(index) = self.index.as_ref() else {
            return Vec::new();
        };
        index.correct(word).unwrap_or_else(|err| {
            warn!("spell correction for {word:?} failed: {err}");
            Vec::new()
        })
    }

    pub fn release(&mut self) {
        self.index = None;
    }
}
