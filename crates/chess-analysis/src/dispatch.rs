//! Routing engine output lines to the requests waiting for them.
//!
//! Requests are matched to replies by predicate, not by identity. Each line
//! goes to the oldest subscriber whose predicate accepts it; that subscriber
//! is removed and nobody else sees the line.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Line filter installed by a waiting request.
pub type Predicate = Box<dyn Fn(&str) -> bool + Send>;

struct Waiter {
    id: u64,
    predicate: Predicate,
    reply: oneshot::Sender<String>,
}

#[derive(Default)]
struct Waiters {
    next_id: u64,
    pending: Vec<Waiter>,
    closed: bool,
}

/// The subscriber list for one engine's output.
#[derive(Default)]
pub struct LineDispatcher {
    waiters: Mutex<Waiters>,
}

impl LineDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Waiters> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a one-shot subscriber behind all existing ones.
    ///
    /// After [`close`](Self::close) the returned subscription resolves to
    /// `None` immediately.
    pub fn subscribe(self: &Arc<Self>, predicate: impl Fn(&str) -> bool + Send + 'static) -> Subscription {
        let (reply, receiver) = oneshot::channel();
        let mut waiters = self.lock();
        let id = waiters.next_id;
        waiters.next_id += 1;
        if !waiters.closed {
            waiters.pending.push(Waiter {
                id,
                predicate: Box::new(predicate),
                reply,
            });
        }
        Subscription {
            id,
            receiver,
            dispatcher: Arc::downgrade(self),
        }
    }

    /// Removes a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        self.lock().pending.retain(|w| w.id != id);
    }

    /// Hands `line` to the first subscriber that wants it.
    ///
    /// Returns `true` if the line was consumed.
    pub fn dispatch(&self, line: &str) -> bool {
        let waiter = {
            let mut waiters = self.lock();
            let found = waiters
                .pending
                .iter()
                .position(|w| !w.reply.is_closed() && (w.predicate)(line));
            match found {
                Some(index) => waiters.pending.remove(index),
                None => return false,
            }
        };
        waiter.reply.send(line.to_string()).is_ok()
    }

    /// Drops every pending subscriber and refuses new ones.
    pub fn close(&self) {
        let mut waiters = self.lock();
        waiters.closed = true;
        waiters.pending.clear();
    }

    /// Number of subscribers still waiting.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }
}

/// A pending subscription. Resolves to the matched line, or `None` once the
/// dispatcher is closed. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    receiver: oneshot::Receiver<String>,
    dispatcher: Weak<LineDispatcher>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Future for Subscription {
    type Output = Option<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(Result::ok)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.upgrade() {
            dispatcher.unsubscribe(self.id);
        }
    }
}
