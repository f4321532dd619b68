//! Timing scenarios for the debounced validity aggregation, driven by an
//! explicit clock.

use core_form::DebouncedValidityAggregator;
use proptest::prelude::*;
use std::time::{Duration, Instant};

const QUIET: Duration = Duration::from_millis(500);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn coalesces_rapid_notifications_into_one_write() {
    let t0 = Instant::now();
    let mut agg = DebouncedValidityAggregator::new(QUIET);
    agg.notify_at(true, false, t0);
    agg.notify_at(true, true, t0 + ms(100));

    let mut writes = Vec::new();
    // Walk the clock in 10ms steps past both due instants.
    for step in 0..=120 {
        let now = t0 + ms(step * 10);
        if let Some(v) = agg.poll(now) {
            writes.push((now, v));
        }
    }
    assert_eq!(writes.len(), 1, "exactly one write: {writes:?}");
    let (at, value) = writes[0];
    assert!(value, "second notify wins");
    assert_eq!(at, t0 + ms(600), "fires at the first poll after the last notify + quiet");
}

#[test]
fn no_write_before_quiet_period_after_last_notify() {
    let t0 = Instant::now();
    let mut agg = DebouncedValidityAggregator::new(QUIET);
    for i in 0..10 {
        agg.notify_at(i % 2 == 0, true, t0 + ms(i * 400));
        assert_eq!(agg.poll(t0 + ms(i * 400 + 399)), None);
    }
    assert_eq!(agg.write_count(), 0);
    // last notify at 3600ms carried (false, true)
    assert_eq!(agg.poll(t0 + ms(3600) + QUIET), Some(false));
    assert_eq!(agg.write_count(), 1);
}

#[test]
fn disposal_before_due_means_zero_writes() {
    let t0 = Instant::now();
    let mut agg = DebouncedValidityAggregator::new(QUIET);
    agg.notify_at(true, true, t0);
    agg.dispose();
    for step in 0..50 {
        assert_eq!(agg.poll(t0 + ms(step * 100)), None);
    }
    assert_eq!(agg.write_count(), 0);
}

#[test]
fn dropping_with_pending_timer_is_clean() {
    let t0 = Instant::now();
    let mut agg = DebouncedValidityAggregator::new(QUIET);
    agg.notify_at(true, true, t0);
    drop(agg);
}

proptest! {
    // Arbitrary notify sequences: the only write that can ever happen is the
    // one carrying the flags of the last notify, and only once quiet.
    #[test]
    fn only_last_notify_is_observed(
        notes in prop::collection::vec((0u64..600, any::<bool>(), any::<bool>()), 1..20)
    ) {
        let t0 = Instant::now();
        let mut agg = DebouncedValidityAggregator::new(QUIET);
        let mut now = t0;
        for (gap, e, p) in &notes {
            now += ms(*gap).min(QUIET - ms(1));
            // Gaps stay inside the quiet window, so nothing fires in between.
            prop_assert_eq!(agg.poll(now), None);
            agg.notify_at(*e, *p, now);
        }
        let last = notes.last().copied().unwrap();
        prop_assert_eq!(agg.poll(now + QUIET - ms(1)), None);
        prop_assert_eq!(agg.write_count(), 0);
        prop_assert_eq!(agg.poll(now + QUIET), Some(last.1 && last.2));
        prop_assert_eq!(agg.write_count(), 1);
        prop_assert_eq!(agg.poll(now + QUIET * 10), None);
    }
}
