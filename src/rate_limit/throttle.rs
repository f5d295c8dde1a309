//! Throttle: run an action at most once per cooldown window.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Guarded action that fires immediately, then ignores calls until `limit`
/// has elapsed. Dropped calls are not queued or replayed.
pub struct Throttled<A> {
    action: Box<dyn Fn(A) + Send + Sync>,
    limit: Duration,
    cooldown_until: Mutex<Option<Instant>>,
}

/// Wraps `action` so it fires at most once every `limit`.
pub fn throttle<A, F>(action: F, limit: Duration) -> Throttled<A>
where
    F: Fn(A) + Send + Sync + 'static,
{
    Throttled {
        action: Box::new(action),
        limit,
        cooldown_until: Mutex::new(None),
    }
}

impl<A> Throttled<A> {
    /// Runs the action if no cooldown is active. Returns whether it ran.
    pub fn call(&self, args: A) -> bool {
        let now = Instant::now();
        {
            let mut cooldown_until = self.cooldown_until.lock();
            if cooldown_until.is_some_and(|until| now < until) {
                trace!("Throttle: call dropped during cooldown");
                return false;
            }
            // An unrepresentable deadline means the cooldown never ends
            *cooldown_until = Some(now.checked_add(self.limit).unwrap_or_else(far_future));
        }

        (self.action)(args);
        true
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_until
            .lock()
            .is_some_and(|until| Instant::now() < until)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

fn far_future() -> Instant {
    let now = Instant::now();
    now.checked_add(Duration::from_secs(86_400 * 365 * 30)).unwrap_or(now)
}
