//! Single-assignment asynchronous value.
//!
//! A [`Deferred`] is created empty and settled later, from anywhere, by
//! whoever holds it. Any number of tasks can wait for it before or after
//! settlement and they all observe the same outcome.

use std::sync::{Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::oneshot;

/// Why a [`Deferred`] did not produce a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeferredError {
    /// Settled through [`Deferred::reject`].
    #[error("rejected: {0}")]
    Rejected(String),
    /// Dropped without being settled.
    #[error("dropped before being settled")]
    Abandoned,
}

/// Outcome observed by waiters.
pub type Settled<T> = Result<T, DeferredError>;

/// Cloneable future resolving to a [`Deferred`]'s outcome.
pub type Promise<T> = Shared<BoxFuture<'static, Settled<T>>>;

struct State<T> {
    sender: Option<oneshot::Sender<Settled<T>>>,
    outcome: Option<Settled<T>>,
}

/// A value that is settled exactly once.
///
/// ```
/// # tokio_test_block(async {
/// use chess_analysis::Deferred;
///
/// let ready = Deferred::new();
/// let waiter = ready.wait();
/// assert!(ready.resolve(7));
/// assert!(!ready.resolve(8));
/// assert_eq!(waiter.await, Ok(7));
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
pub struct Deferred<T: Clone + Send + Sync + 'static> {
    state: Mutex<State<T>>,
    promise: Promise<T>,
}

impl<T: Clone + Send + Sync + 'static> Deferred<T> {
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel::<Settled<T>>();
        let promise = receiver
            .map(|received| received.unwrap_or(Err(DeferredError::Abandoned)))
            .boxed()
            .shared();
        Self {
            state: Mutex::new(State {
                sender: Some(sender),
                outcome: None,
            }),
            promise,
        }
    }

    /// Settles with a value. Returns `false` if already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles with a failure. Returns `false` if already settled.
    pub fn reject(&self, reason: impl Into<String>) -> bool {
        self.settle(Err(DeferredError::Rejected(reason.into())))
    }

    fn settle(&self, outcome: Settled<T>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = state.sender.take() else {
            return false;
        };
        state.outcome = Some(outcome.clone());
        // The promise keeps the receiver alive, so this cannot fail.
        let _ = sender.send(outcome);
        true
    }

    /// A future for the outcome. Cheap to call repeatedly.
    pub fn wait(&self) -> Promise<T> {
        self.promise.clone()
    }

    pub fn is_settled(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sender
            .is_none()
    }

    /// The outcome, if settled.
    pub fn peek(&self) -> Option<Settled<T>> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .outcome
            .clone()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}
