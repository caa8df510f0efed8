//! Fetchers
//!
//! A fetcher is an imperative handle that runs a route's loader outside of
//! navigation. Each handle is a small state machine: a request id counter
//! and a [`FetchState`] published through a `watch` channel. Results are
//! applied only if their request id is still the latest one issued, so a
//! slow response can never overwrite a newer one.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use super::loader::{LoadArgs, LoadError, Loader, LoaderData};
use super::path::{Params, PathPattern};
use crate::api::Query;

/// Lifecycle of one fetcher
pub enum FetchState<D> {
    Idle,
    /// A request is in flight; `stale` keeps the last applied data
    Loading { stale: Option<D> },
    Loaded(D),
    Failed(Arc<LoadError>),
}

impl<D> FetchState<D> {
    /// Last applied data, if any
    pub fn data(&self) -> Option<&D> {
        match self {
            FetchState::Loaded(data) => Some(data),
            FetchState::Loading { stale } => stale.as_ref(),
            FetchState::Idle | FetchState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }
}

impl<D: Clone> Clone for FetchState<D> {
    fn clone(&self) -> Self {
        match self {
            FetchState::Idle => FetchState::Idle,
            FetchState::Loading { stale } => FetchState::Loading {
                stale: stale.clone(),
            },
            FetchState::Loaded(data) => FetchState::Loaded(data.clone()),
            FetchState::Failed(err) => FetchState::Failed(err.clone()),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for FetchState<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchState::Idle => write!(f, "Idle"),
            FetchState::Loading { stale } => f.debug_struct("Loading").field("stale", stale).finish(),
            FetchState::Loaded(data) => f.debug_tuple("Loaded").field(data).finish(),
            FetchState::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// Parameters of one fetcher load
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    /// Values substituted into the route's pattern
    pub params: Params,
    pub query: Query,
}

/// What happened to one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued before this one resolved
    Superseded,
    Cancelled,
}

/// Handle to a load running in the background
pub struct PendingLoad {
    request_id: u64,
    task: JoinHandle<LoadOutcome>,
}

impl PendingLoad {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Wait for the load to resolve
    pub async fn wait(self) -> LoadOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => LoadOutcome::Cancelled,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}

struct FetcherShared<D> {
    route_id: String,
    pattern: PathPattern,
    loader: Arc<dyn Loader<D>>,
    latest: Mutex<u64>,
    state: watch::Sender<FetchState<D>>,
    tasks: Mutex<Vec<AbortHandle>>,
    in_flight: Arc<AtomicUsize>,
}

/// Imperative handle onto a route's loader
pub struct Fetcher<D> {
    shared: Arc<FetcherShared<D>>,
}

impl<D> Clone for Fetcher<D> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<D: LoaderData> Fetcher<D> {
    pub(crate) fn new(
        route_id: String,
        pattern: PathPattern,
        loader: Arc<dyn Loader<D>>,
        in_flight: Arc<AtomicUsize>,
    ) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            shared: Arc::new(FetcherShared {
                route_id,
                pattern,
                loader,
                latest: Mutex::new(0),
                state,
                tasks: Mutex::new(Vec::new()),
                in_flight,
            }),
        }
    }

    pub fn route_id(&self) -> &str {
        &self.shared.route_id
    }

    /// Start a load, superseding any load still in flight
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(&self, request: FetchRequest) -> PendingLoad {
        let request_id = {
            let mut latest = lock(&self.shared.latest);
            *latest += 1;
            self.shared.state.send_modify(|state| {
                let stale = state.data().cloned();
                *state = FetchState::Loading { stale };
            });
            *latest
        };

        let args = match self.shared.pattern.fill(&request.params) {
            Ok(href) => {
                debug!(route = %self.shared.route_id, %href, request_id, "Fetcher load");
                Ok(LoadArgs::new(request.params, request.query))
            }
            Err(_) => {
                let missing = self
                    .shared
                    .pattern
                    .params()
                    .find(|p| !request.params.contains_key(*p))
                    .unwrap_or_default()
                    .to_string();
                Err(LoadError::MissingParam(missing))
            }
        };

        let guard = InFlightGuard::new(self.shared.in_flight.clone());
        let shared = self.shared.clone();
        let task = tokio::spawn(async move {
            let result = match args {
                Ok(args) => shared.loader.load(args).await,
                Err(e) => Err(e),
            };
            drop(guard);
            shared.apply(request_id, result)
        });

        let mut tasks = lock(&self.shared.tasks);
        tasks.retain(|handle| !handle.is_finished());
        tasks.push(task.abort_handle());

        PendingLoad { request_id, task }
    }

    /// Abort in-flight loads and drop their results
    pub fn cancel(&self) {
        let mut latest = lock(&self.shared.latest);
        *latest += 1;

        let aborted = {
            let mut tasks = lock(&self.shared.tasks);
            let count = tasks.iter().filter(|h| !h.is_finished()).count();
            for handle in tasks.drain(..) {
                handle.abort();
            }
            count
        };

        self.shared.state.send_modify(|state| {
            if let FetchState::Loading { stale } = state {
                *state = match stale.take() {
                    Some(data) => FetchState::Loaded(data),
                    None => FetchState::Idle,
                };
            }
        });

        if aborted > 0 {
            debug!(route = %self.shared.route_id, aborted, "Fetcher cancelled");
        }
    }

    pub fn state(&self) -> FetchState<D> {
        self.shared.state.borrow().clone()
    }

    /// Last applied data
    pub fn data(&self) -> Option<D> {
        self.shared.state.borrow().data().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<D>> {
        self.shared.state.subscribe()
    }

    /// Id of the most recently issued request
    pub fn latest_request(&self) -> u64 {
        *lock(&self.shared.latest)
    }
}

impl<D: LoaderData> FetcherShared<D> {
    fn apply(&self, request_id: u64, result: Result<D, LoadError>) -> LoadOutcome {
        let latest = lock(&self.latest);
        if *latest != request_id {
            debug!(
                route = %self.route_id,
                request_id,
                latest = *latest,
                "Dropping superseded fetcher result"
            );
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                self.state.send_replace(FetchState::Loaded(data));
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!(route = %self.route_id, request_id, error = %e, "Fetcher load failed");
                self.state.send_replace(FetchState::Failed(Arc::new(e)));
                LoadOutcome::Failed
            }
        }
    }
}

/// Counts a running load for as long as it lives
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
