//! One-shot suppression of self-inflicted clipboard changes.
//!
//! Before the engine writes to the system clipboard it arms the suppressor;
//! the next poll cycle consumes the arm and skips capture. An arm that is not
//! consumed within its TTL expires on its own, so a write that never reaches
//! the clipboard cannot swallow a later user copy.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::config::DEFAULT_SUPPRESS_TTL_MS;
use crate::ports::ClockPort;

#[derive(Clone)]
pub struct ChangeSuppressor {
    deadline_ms: Arc<Mutex<Option<i64>>>,
    ttl: Duration,
    clock: Arc<dyn ClockPort>,
}

impl ChangeSuppressor {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self::with_ttl(clock, Duration::from_millis(DEFAULT_SUPPRESS_TTL_MS))
    }

    pub fn with_ttl(clock: Arc<dyn ClockPort>, ttl: Duration) -> Self {
        Self {
            deadline_ms: Arc::new(Mutex::new(None)),
            ttl,
            clock,
        }
    }

    /// Arms suppression for the next observed change. Re-arming extends the deadline.
    pub fn arm(&self) {
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let deadline = self.clock.now_ms().saturating_add(ttl_ms);
        *self.state() = Some(deadline);
        debug!(deadline_ms = deadline, "change suppressor armed");
    }

    /// Returns `true` exactly once per live arm. An expired arm is cleared
    /// and reported as `false`.
    pub fn consume(&self) -> bool {
        let now = self.clock.now_ms();
        match self.state().take() {
            Some(deadline) if now <= deadline => true,
            Some(deadline) => {
                debug!(deadline_ms = deadline, now_ms = now, "change suppressor expired");
                false
            }
            None => false,
        }
    }

    pub fn disarm(&self) {
        *self.state() = None;
    }

    pub fn is_armed(&self) -> bool {
        let now = self.clock.now_ms();
        let mut state = self.state();
        match *state {
            Some(deadline) if now <= deadline => true,
            Some(_) => {
                *state = None;
                false
            }
            None => false,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, Option<i64>> {
        self.deadline_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ChangeSuppressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSuppressor")
            .field("deadline_ms", &*self.state())
            .field("ttl", &self.ttl)
            .finish()
    }
}
