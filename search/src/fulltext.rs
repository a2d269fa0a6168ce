//! Background worker thread for full-text queries.
//!
//! The worker owns nothing but the index handle. Jobs go in over one channel,
//! completions come back over another, and the loop that owns the controller
//! drains them. A new request or `cancel()` bumps the shared "latest"
//! generation so queued stale jobs are skipped before they reach the index;
//! results of a job that was already running are dropped by the controller
//! through [`FullTextSearchClient::accept`].

use glossa_core::BackendError;
use glossa_core::types::{ItemKinds, ResultItem};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Query contract of the full-text index.
///
/// `limit` of `None` means unbounded.
pub trait FullTextIndex: Send + Sync {
    fn query(
        &self,
        primary: &str,
        secondary: Option<&str>,
        kinds: &ItemKinds,
        limit: Option<usize>,
    ) -> Result<Vec<ResultItem>, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullTextRequest {
    pub primary: String,
    pub secondary: Option<String>,
    pub item_kinds: ItemKinds,
    /// Forwarded to the index as `limit + 1` so callers can tell "exactly at
    /// the limit" from "more exist".
    pub limit: Option<usize>,
    /// Combine with the incremental results instead of replacing them.
    pub merge: bool,
}

/// Generation of an accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub(crate) u64);

const NO_REQUEST: u64 = 0;

#[derive(Debug)]
pub struct Completion {
    pub token: RequestToken,
    pub merge: bool,
    pub outcome: Result<Vec<ResultItem>, BackendError>,
}

/// Why a completion was not handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// A newer request was issued after this one.
    Superseded,
    /// The request was cancelled and nothing replaced it.
    Cancelled,
}

enum Job {
    Query {
        token: RequestToken,
        request: FullTextRequest,
    },
    Shutdown,
}

pub struct FullTextSearchClient {
    jobs: Option<Sender<Job>>,
    completions: Receiver<Completion>,
    latest: Arc<AtomicU64>,
    next_generation: u64,
    current: Option<RequestToken>,
    worker: Option<JoinHandle<()>>,
}

/// Create operations.
impl FullTextSearchClient {
    /// Starts the worker thread for `index`.
    pub fn spawn(index: Arc<dyn FullTextIndex>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (completion_tx, completion_rx) = mpsc::channel::<Completion>();
        let latest = Arc::new(AtomicU64::new(NO_REQUEST));

        let worker_latest = latest.clone();
        let worker = thread::spawn(move || {
            worker_loop(index, job_rx, completion_tx, worker_latest);
        });

        Self {
            jobs: Some(job_tx),
            completions: completion_rx,
            latest,
            next_generation: NO_REQUEST,
            current: None,
            worker: Some(worker),
        }
    }

    /// A client without a backend; every request is refused.
    pub fn detached() -> Self {
        let (_completion_tx, completion_rx) = mpsc::channel::<Completion>();
        Self {
            jobs: None,
            completions: completion_rx,
            latest: Arc::new(AtomicU64::new(NO_REQUEST)),
            next_generation: NO_REQUEST,
            current: None,
            worker: None,
        }
    }
}

/// Request operations.
impl FullTextSearchClient {
    pub fn is_attached(&self) -> bool {
        self.jobs.is_some()
    }

    pub fn current(&self) -> Option<RequestToken> {
        self.current
    }

    /// Issues `request`, superseding any previous one.
    ///
    /// Returns `None` when no backend is attached or the worker has gone away.
    pub fn update_query(&mut self, request: FullTextRequest) -> Option<RequestToken> {
        let jobs = self.jobs.as_ref()?;

        self.next_generation += 1;
        let token = RequestToken(self.next_generation);
        self.latest.store(token.0, Ordering::Release);

        if jobs.send(Job::Query { token, request }).is_err() {
            warn!("full-text worker is gone; dropping request");
            self.jobs = None;
            self.current = None;
            return None;
        }

        self.current = Some(token);
        Some(token)
    }

    /// Drops the current request. Safe to call at any time.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            debug!("cancelling full-text request {token:?}");
        }
        self.latest.store(NO_REQUEST, Ordering::Release);
    }

    /// Checks a completion against the current request.
    ///
    /// A matching completion clears the current request.
    pub fn accept(&mut self, completion: Completion) -> Result<Completion, Discard> {
        match self.current {
            Some(token) if token == completion.token => {
                self.current = None;
                Ok(completion)
            }
            Some(_) => Err(Discard::Superseded),
            None => Err(Discard::Cancelled),
        }
    }

    pub fn try_recv(&self) -> Option<Completion> {
        match self.completions.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stops the worker without waiting for a running query to finish.
    pub fn shutdown(&mut self) {
        self.cancel();
        if let Some(jobs) = self.jobs.take() {
            let _ = jobs.send(Job::Shutdown);
        }
        // Detach; a running query finishes on its own and its result is dropped.
        self.worker.take();
    }
}

impl Drop for FullTextSearchClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    index: Arc<dyn FullTextIndex>,
    jobs: Receiver<Job>,
    completions: Sender<Completion>,
    latest: Arc<AtomicU64>,
) {
    for job in jobs {
        match job {
            Job::Query { token, request } => {
                if latest.load(Ordering::Acquire) != token.0 {
                    debug!("skipping superseded full-text request {token:?}");
                    continue;
                }

                let limit = request.limit.map(|limit| limit.saturating_add(1));
                let outcome = index.query(
                    &request.primary,
                    request.secondary.as_deref(),
                    &request.item_kinds,
                    limit,
                );

                let completion = Completion {
                    token,
                    merge: request.merge,
                    outcome,
                };
                if completions.send(completion).is_err() {
                    break;
                }
            }
            Job::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        limits: Mutex<Vec<Option<usize>>>,
    }

    impl FullTextIndex for Recording {
        fn query(
            &self,
            primary: &str,
            _secondary: Option<&str>,
            _kinds: &ItemKinds,
            limit: Option<usize>,
        ) -> Result<Vec<ResultItem>, BackendError> {
            self.limits.lock().unwrap().push(limit);
            if primary == "broken" {
                return Err(BackendError::Corrupt("segment missing".to_string()));
            }
            Ok(Vec::new())
        }
    }

    fn request(primary: &str, limit: Option<usize>) -> FullTextRequest {
        FullTextRequest {
            primary: primary.to_string(),
            secondary: None,
            item_kinds: ItemKinds::any(),
            limit,
            merge: true,
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_detached_client_refuses_requests() {
        let mut client = FullTextSearchClient::detached();

        assert!(!client.is_attached());
        assert_eq!(client.update_query(request("word", Some(10))), None);
        assert!(client.recv_timeout(Duration::from_millis(1)).is_none());
    }

    #[test]
    fn test_limit_is_forwarded_plus_one() {
        let index = Arc::new(Recording::default());
        let mut client = FullTextSearchClient::spawn(index.clone());

        let token = client.update_query(request("word", Some(10))).unwrap();
        let completion = client.recv_timeout(WAIT).unwrap();
        assert_eq!(completion.token, token);

        let token = client.update_query(request("word", None)).unwrap();
        let completion = client.recv_timeout(WAIT).unwrap();
        assert_eq!(completion.token, token);

        assert_eq!(*index.limits.lock().unwrap(), vec![Some(11), None]);
    }

    #[test]
    fn test_current_completion_is_accepted_once() {
        let mut client = FullTextSearchClient::spawn(Arc::new(Recording::default()));
        let token = client.update_query(request("word", Some(10))).unwrap();

        let completion = client.recv_timeout(WAIT).unwrap();
        let accepted = client.accept(completion).unwrap();
        assert_eq!(accepted.token, token);
        assert_eq!(client.current(), None);

        let replay = Completion {
            token,
            merge: true,
            outcome: Ok(Vec::new()),
        };
        assert_eq!(client.accept(replay).unwrap_err(), Discard::Cancelled);
    }

    #[test]
    fn test_older_completion_is_superseded() {
        let mut client = FullTextSearchClient::spawn(Arc::new(Recording::default()));
        let first = client.update_query(request("wor", Some(10))).unwrap();
        let second = client.update_query(request("word", Some(10))).unwrap();
        assert!(first < second);

        let stale = Completion {
            token: first,
            merge: true,
            outcome: Ok(Vec::new()),
        };
        assert_eq!(client.accept(stale).unwrap_err(), Discard::Superseded);
        assert_eq!(client.current(), Some(second));
    }

    #[test]
    fn test_cancel_discards_late_result() {
        let mut client = FullTextSearchClient::spawn(Arc::new(Recording::default()));
        let token = client.update_query(request("word", Some(10))).unwrap();
        client.cancel();
        client.cancel();

        let late = Completion {
            token,
            merge: true,
            outcome: Ok(Vec::new()),
        };
        assert_eq!(client.accept(late).unwrap_err(), Discard::Cancelled);
    }

    #[test]
    fn test_backend_error_is_delivered_as_outcome() {
        let mut client = FullTextSearchClient::spawn(Arc::new(Recording::default()));
        client.update_query(request("broken", Some(10))).unwrap();

        let completion = client.recv_timeout(WAIT).unwrap();
        let accepted = client.accept(completion).unwrap();
        assert!(matches!(accepted.outcome, Err(BackendError::Corrupt(_))));
    }

    #[test]
    fn test_shutdown_refuses_further_requests() {
        let mut client = FullTextSearchClient::spawn(Arc::new(Recording::default()));
        client.shutdown();
        client.shutdown();

        assert!(!client.is_attached());
        assert_eq!(client.update_query(request("word", Some(10))), None);
    }
}
