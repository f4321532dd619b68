//! Debounced aggregation of the two field validity flags.
//!
//! `notify` does not compute anything. It replaces the single pending
//! computation with a new one due `quiet_period` later, carrying the flags
//! captured at that moment. The owner drives time by calling `poll(now)`;
//! the computation fires on the first poll at or after its due instant and
//! writes `form_valid = email_valid && password_valid`.
//!
//! Invariants:
//! * At most one `PendingTimer` exists. Scheduling always cancels first.
//! * A cancelled timer is gone from the aggregator; nothing can fire it later.
//! * After `dispose` (or drop) no computation ever fires and `notify` is ignored.
//! * `form_valid` only changes inside `poll`, so it lags raw input by the
//!   quiet period and equals the conjunction evaluated at the last quiet point.

use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Quiet period used when the caller does not configure one.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Identity of a scheduled computation (monotonic per aggregator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// The one outstanding scheduled aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due: Instant,
    pub email_valid: bool,
    pub password_valid: bool,
}

#[derive(Debug)]
pub struct DebouncedValidityAggregator {
    quiet_period: Duration,
    pending: Option<PendingTimer>,
    form_valid: bool,
    next_id: u64,
    writes: u64,
    disposed: bool,
}

impl Default for DebouncedValidityAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl DebouncedValidityAggregator {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            form_valid: false,
            next_id: 0,
            writes: 0,
            disposed: false,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Last published combined validity (`false` until the first write).
    pub fn form_is_valid(&self) -> bool {
        self.form_valid
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn pending(&self) -> Option<&PendingTimer> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Due instant of the pending computation, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn notify(&mut self, email_valid: bool, password_valid: bool) -> Option<TimerId> {
        self.notify_at(email_valid, password_valid, Instant::now())
    }

    /// Cancel the pending computation and schedule a replacement due
    /// `now + quiet_period`. Returns `None` once disposed.
    pub fn notify_at(
        &mut self,
        email_valid: bool,
        password_valid: bool,
        now: Instant,
    ) -> Option<TimerId> {
        if self.disposed {
            trace!(target: "form.debounce", "notify_after_dispose_ignored");
            return None;
        }
        self.cancel();
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some(PendingTimer {
            id,
            due: now + self.quiet_period,
            email_valid,
            password_valid,
        });
        debug!(
            target: "form.debounce",
            timer = id.0,
            email_valid,
            password_valid,
            quiet_ms = self.quiet_period.as_millis() as u64,
            "timer_set"
        );
        Some(id)
    }

    /// Drop the pending computation. Returns the cancelled timer, if any.
    pub fn cancel(&mut self) -> Option<PendingTimer> {
        let cancelled = self.pending.take();
        if let Some(timer) = &cancelled {
            debug!(target: "form.debounce", timer = timer.id.0, "timer_cleared");
        }
        cancelled
    }

    /// Fire the pending computation if it is due. Returns the written value
    /// when a write happened, `None` otherwise.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        let timer = self.pending?;
        if now < timer.due {
            return None;
        }
        self.pending = None;
        self.form_valid = timer.email_valid && timer.password_valid;
        self.writes += 1;
        debug!(
            target: "form.debounce",
            timer = timer.id.0,
            form_valid = self.form_valid,
            late_ms = now.saturating_duration_since(timer.due).as_millis() as u64,
            "timer_fired"
        );
        Some(self.form_valid)
    }

    /// Tear down: cancel anything pending and refuse further scheduling.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel();
        self.disposed = true;
        trace!(target: "form.debounce", writes = self.writes, "disposed");
    }
}

impl Drop for DebouncedValidityAggregator {
    fn drop(&mut self) {
        self.dispose();
    }
}
