//! Render timing instrumentation.
//!
//! Captures the duration of the last emitted frame in nanoseconds, logged by
//! the runtime at shutdown.
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_RENDER_NS: AtomicU64 = AtomicU64::new(0);
static FRAMES_EMITTED: AtomicU64 = AtomicU64::new(0);

/// Record a completed frame and its duration in nanoseconds.
pub fn record_frame(ns: u64) {
    LAST_RENDER_NS.store(ns, Ordering::Relaxed);
    FRAMES_EMITTED.fetch_add(1, Ordering::Relaxed);
}

pub fn last_render_ns() -> u64 {
    LAST_RENDER_NS.load(Ordering::Relaxed)
}

pub fn frames_emitted() -> u64 {
    FRAMES_EMITTED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn record_updates_last_and_count() {
        let before = frames_emitted();
        record_frame(1234);
        assert_eq!(last_render_ns(), 1234);
        assert!(frames_emitted() > before);
    }
}
