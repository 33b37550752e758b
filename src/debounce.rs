// src/debounce.rs
// =============================================================================
// Delay-based value stabilizer.
//
// A Debouncer republishes its input only after the input has stayed the same
// for the full delay. State machine:
//
//   push(v):   abort the pending timer (if any), spawn a new one for v
//   timer:     publish v on the watch channel
//   drop:      abort the pending timer, nothing is published afterwards
//
// Used twice: for the username box and for the repository-name filter.
//
// Rust concepts:
// - tokio::sync::watch: single-value channel, receivers always see the latest
// - JoinHandle::abort: cancels a spawned task at its next await point
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: Arc<watch::Sender<T>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `initial` is published immediately; later values go through the delay.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            delay,
            pending: None,
            tx: Arc::new(tx),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Feeds a new raw input value. Must be called from inside a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let tx = Arc::clone(&self.tx);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            // A zero delay still goes through the scheduler: the value lands on
            // the next tick, not inside push().
            tokio::time::sleep(delay).await;
            tx.send_replace(value);
        }));
    }

    /// Drops the pending publication, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The last published (stable) value.
    pub fn current(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

// BEGINNER NOTES:
//
// 1. Why is the sender wrapped in an Arc?
//    - The spawned timer task needs its own handle to publish the value
//    - The Debouncer keeps another one so subscribe() works at any time
//
// 2. What happens to an aborted timer?
//    - abort() cancels the task at its next await point, which here is the
//      sleep; send_replace() is never reached
//
// 3. Why do the tests use start_paused?
//    - tokio's test clock only advances when every task is idle, so a 500ms
//      wait finishes instantly and the timing is exact
