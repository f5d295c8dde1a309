//! Debounce: run an action once a burst of calls has gone quiet.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

/// Guarded action that only runs `wait` after the last call of a burst.
///
/// Each call cancels the pending timer and schedules a new one carrying that
/// call's arguments. Timers run on the runtime captured at construction, so
/// `call` also works from threads outside it; dropping the guard cancels a
/// pending call.
pub struct Debounced<A> {
    action: Arc<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    runtime: Option<Handle>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

/// Wraps `action` so it fires once per quiet period of `wait`.
///
/// Timers are scheduled on the current tokio runtime. Built outside one, the
/// guard falls back to whichever runtime `call` runs in.
pub fn debounce<A, F>(action: F, wait: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    build(Handle::try_current().ok(), action, wait)
}

/// Like [`debounce`], with timers always scheduled on `runtime`.
pub fn debounce_on<A, F>(runtime: Handle, action: F, wait: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    build(Some(runtime), action, wait)
}

fn build<A, F>(runtime: Option<Handle>, action: F, wait: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        action: Arc::new(action),
        wait,
        runtime,
        pending: Mutex::new(None),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Schedules the action with `args`, replacing any pending call.
    ///
    /// Without a runtime to schedule on, the call is dropped with a warning.
    pub fn call(&self, args: A) {
        let Some(runtime) = self
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            warn!("Debounce: no tokio runtime available, call dropped");
            return;
        };

        let action = Arc::clone(&self.action);
        let wait = self.wait;

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
            debug!("Debounce: superseded pending call");
        }
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            action(args);
        }));
    }

    /// Drops the pending call, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    /// Whether a call is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }
}

impl<A> Drop for Debounced<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
