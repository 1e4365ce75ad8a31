//! Contact form throttling keyed by sender address.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;

use crocs_rwanda_core::contact::{SubmissionWindow, ThrottleDecision, WINDOW};

/// Upper bound on senders tracked at once.
const MAX_TRACKED_SENDERS: u64 = 100_000;

type SharedWindow = Arc<Mutex<SubmissionWindow>>;

/// Per-sender submission windows for `POST /api/contact`.
///
/// A sender idle for a whole window is evicted; its window would have reset
/// anyway. Lives in process memory, so a restart forgets every window.
#[derive(Clone)]
pub struct ContactThrottle {
    windows: Cache<String, SharedWindow>,
}

impl Default for ContactThrottle {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactThrottle {
    #[must_use]
    pub fn new() -> Self {
        let idle = WINDOW.to_std().unwrap_or(Duration::from_secs(15 * 60));
        Self::with_limits(MAX_TRACKED_SENDERS, idle)
    }

    fn with_limits(capacity: u64, idle: Duration) -> Self {
        let windows = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .build();
        Self { windows }
    }

    /// Record an attempt from `sender` at `now` and decide whether it may proceed.
    pub fn check(&self, sender: &str, now: DateTime<Utc>) -> ThrottleDecision {
        let window = self.windows.get_with_by_ref(sender, || {
            Arc::new(Mutex::new(SubmissionWindow::new(now)))
        });
        let mut window = match window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        window.check(now)
    }

    /// Number of senders currently tracked.
    #[must_use]
    pub fn tracked(&self) -> u64 {
        self.windows.run_pending_tasks();
        self.windows.entry_count()
    }
}
