//! Synchronous prefix search on the typing path.

use glossa_core::BackendError;
use glossa_core::types::ResultItem;
use log::{debug, warn};
use std::sync::Arc;

/// Query contract of the incremental (prefix) index.
///
/// Implementations must return without suspending; the call runs on every
/// keystroke. Results come back in the index's own order and are not re-sorted.
pub trait IncrementalIndex: Send + Sync {
    fn search(&self, key: &str, limit: usize) -> Result<Vec<ResultItem>, BackendError>;
}

/// Wraps the incremental index, mapping every failure to an absent result.
#[derive(Clone, Default)]
pub struct IncrementalSearchClient {
    index: Option<Arc<dyn IncrementalIndex>>,
}

impl IncrementalSearchClient {
    pub fn new(index: Option<Arc<dyn IncrementalIndex>>) -> Self {
        Self { index }
    }

    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    /// Returns `None` when the index is absent or broken.
    pub fn search(&self, key: &str, limit: usize) -> Option<Vec<ResultItem>> {
        let index = self.index.as_ref()?;
        match index.search(key, limit) {
            Ok(results) => {
                debug!("incremental search {key:?}: {} hits", results.len());
                Some(results)
            }
            Err(err) => {
                warn!("incremental search {key:?} failed: {err}");
                None
            }
        }
    }

    /// Drops the backend handle.
    pub fn release(&mut self) {
        self.index = None;
    }
}
