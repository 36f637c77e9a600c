//! Reusable async fetch state
//!
//! An `AsyncResource` wraps a producer (a zero-argument async function) and
//! publishes `{ data, loading, error }` as it is run and reset. Screens hold
//! one resource per remote listing they show.
//!
//! Every `run()` takes a sequence number. A response is applied only if no
//! later run has been applied already, so a slow early response cannot
//! overwrite a faster later one. `reset()` retires every run issued before it.

use futures::future::{BoxFuture, FutureExt};
use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::sync::watch;

use crate::error::{AppError, AppResult};

pub mod debounce;

pub use debounce::Debouncer;

/// Displayable description of a failed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: &'static str,
    pub message: String,
}

impl From<&AppError> for ErrorInfo {
    fn from(error: &AppError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

type Producer<T> = Arc<dyn Fn() -> BoxFuture<'static, AppResult<T>> + Send + Sync>;

struct Inner<T> {
    producer: Producer<T>,
    state: watch::Sender<ResourceState<T>>,
    issued: AtomicU64,
    applied: AtomicU64,
}

pub struct AsyncResource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for AsyncResource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> AsyncResource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates the resource; with `run_immediately` the producer is started
    /// right away on the current tokio runtime and `loading` starts out true.
    pub fn new<F, Fut>(producer: F, run_immediately: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let producer: Producer<T> = Arc::new(move || producer().boxed());
        let (state, _) = watch::channel(ResourceState {
            data: None,
            loading: run_immediately,
            error: None,
        });

        let resource = Self {
            inner: Arc::new(Inner {
                producer,
                state,
                issued: AtomicU64::new(0),
                applied: AtomicU64::new(0),
            }),
        };

        if run_immediately {
            let initial = resource.clone();
            tokio::spawn(async move {
                initial.run().await;
            });
        }

        resource
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// Runs the producer and publishes its outcome
    ///
    /// Returns the data if this run's success was applied. Runs are never
    /// coalesced; a run superseded by a later applied run is dropped.
    pub async fn run(&self) -> Option<T> {
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = (self.inner.producer)().await;
        let mut applied = None;

        self.inner.state.send_if_modified(|state| {
            if seq < self.inner.applied.load(Ordering::SeqCst) {
                tracing::debug!(seq, "Discarding stale response");
                return false;
            }
            self.inner.applied.store(seq, Ordering::SeqCst);
            state.loading = seq < self.inner.issued.load(Ordering::SeqCst);

            match result {
                Ok(data) => {
                    state.data = Some(data.clone());
                    applied = Some(data);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Resource producer failed");
                    state.error = Some(ErrorInfo::from(&e));
                }
            }
            true
        });

        applied
    }

    /// Clears data and error without running the producer
    ///
    /// Runs still in flight when this is called will not publish.
    pub fn reset(&self) {
        self.inner.state.send_modify(|state| {
            let issued = self.inner.issued.load(Ordering::SeqCst);
            self.inner.applied.fetch_max(issued + 1, Ordering::SeqCst);
            state.data = None;
            state.error = None;
            state.loading = false;
        });
    }
}
