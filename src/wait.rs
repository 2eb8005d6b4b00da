use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Fans one asynchronous completion result out to any number of waiters.
///
/// Built from a single-delivery source: a oneshot receiver that yields at
/// most one value over its lifetime. An internal listener stores the value,
/// then trips a one-way latch; the latch transition is what publishes the
/// value, so no waiter can observe the latch without the value being set.
/// The write-once cell and the token's single transition make a double
/// delivery structurally impossible.
///
/// If the producer drops its sender without delivering, the latch never
/// trips and waiters block until their own cancellation fires. "No result"
/// is only knowable by the caller giving up; that is the boundary contract,
/// not something compensated for here.
#[derive(Debug, Clone)]
pub struct WaitBroadcast<T> {
    result: Arc<OnceLock<T>>,
    done: CancellationToken,
}

impl<T: Clone + Send + Sync + 'static> WaitBroadcast<T> {
    /// Start listening on the single-delivery source.
    pub fn new(source: oneshot::Receiver<T>) -> Self {
        let result = Arc::new(OnceLock::new());
        let done = CancellationToken::new();

        let listener_result = result.clone();
        let listener_done = done.clone();
        tokio::spawn(async move {
            // A dropped sender means the producer went away without a
            // value; the latch stays untripped.
            if let Ok(value) = source.await {
                let _ = listener_result.set(value);
                listener_done.cancel();
            }
        });

        Self { result, done }
    }

    /// Block until the result is delivered or `cancel` fires.
    ///
    /// Every caller that outlasts delivery observes the same value, whether
    /// it started waiting before or after the producer delivered. A caller
    /// whose own cancellation fires first gets `None` without disturbing
    /// delivery for anyone else. Safe for unbounded concurrent callers.
    pub async fn wait(&self, cancel: &CancellationToken) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.done.cancelled() => self.result.get().cloned(),
            _ = cancel.cancelled() => None,
        }
    }

    /// Block until the result is delivered or `timeout` elapses.
    pub async fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        match tokio::time::timeout(timeout, self.done.cancelled()).await {
            Ok(()) => self.result.get().cloned(),
            Err(_) => None,
        }
    }

    /// Non-blocking probe for an already-delivered result.
    pub fn try_result(&self) -> Option<T> {
        if self.done.is_cancelled() {
            self.result.get().cloned()
        } else {
            None
        }
    }
}
