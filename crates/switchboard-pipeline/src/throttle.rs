//! Per-submitter submission throttling.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

/// Fixed-window counter limiting submissions per submitter per minute.
pub struct SubmissionThrottle {
    max_per_minute: u32,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl SubmissionThrottle {
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            max_per_minute,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one submission attempt. Returns false when the submitter
    /// has exhausted the current window.
    pub fn try_acquire(&self, submitter_id: &str) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Instant::now();
        let entry = windows
            .entry(submitter_id.to_string())
            .or_insert((now, 0));

        if now.duration_since(entry.0) >= Duration::from_secs(60) {
            *entry = (now, 0);
        }

        if entry.1 >= self.max_per_minute {
            warn!(%submitter_id, "Submission throttled");
            return false;
        }
        entry.1 += 1;
        true
    }
}
