use super::*;
use loadgen_core::FakeClock;
use std::sync::atomic::{AtomicUsize, Ordering as StdOrdering};
use std::time::Duration;

#[test]
fn snapshot_is_empty_until_something_is_recorded() {
    let collector = MetricsCollector::with_clock(FakeClock::new());
    assert!(collector.snapshot().is_empty());
}

#[test]
fn snapshot_reflects_recorded_counts_and_gate() {
    let collector = MetricsCollector::with_clock(FakeClock::new());
    collector.record("login", Duration::from_millis(100), true);
    collector.record("login", Duration::from_millis(200), false);
    collector.set_gate("login", 2, 10, 3);

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.len(), 1);
    let entry = &snapshot[0];
    assert_eq!(entry.action_name, "login");
    assert_eq!(entry.completed, 1);
    assert_eq!(entry.failed, 1);
    assert_eq!(entry.active_count, 2);
    assert_eq!(entry.max_size, 10);
    assert_eq!(entry.waiting_count, 3);
    assert!((entry.average_ms - 150.0).abs() < 0.001);
}

#[test]
fn gate_defaults_to_zero_when_never_set() {
    let collector = MetricsCollector::with_clock(FakeClock::new());
    collector.record("login", Duration::from_millis(10), true);
    let entry = &collector.snapshot()[0];
    assert_eq!(entry.active_count, 0);
    assert_eq!(entry.max_size, 0);
    assert_eq!(entry.waiting_count, 0);
}

#[tokio::test]
async fn start_waits_one_interval_before_the_first_snapshot() {
    let collector = MetricsCollector::new();
    collector.record("login", Duration::from_millis(10), true);
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_in_sink = Arc::clone(&fired);
    collector.subscribe(move |_snapshots| {
        fired_in_sink.fetch_add(1, StdOrdering::SeqCst);
    });

    collector.start(Duration::from_millis(50));
    assert_eq!(fired.load(StdOrdering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(fired.load(StdOrdering::SeqCst), 1);
    collector.stop();
}

#[tokio::test]
async fn stop_is_idempotent_and_safe_before_start() {
    let collector = MetricsCollector::new();
    collector.stop();
    collector.start(Duration::from_millis(10));
    collector.stop();
    collector.stop();
}

#[tokio::test]
async fn a_panicking_subscriber_does_not_prevent_others_from_receiving() {
    let collector = MetricsCollector::new();
    collector.record("login", Duration::from_millis(10), true);
    let good_calls = Arc::new(AtomicUsize::new(0));
    let good_calls_in_sink = Arc::clone(&good_calls);

    collector.subscribe(|_snapshots| panic!("bad subscriber"));
    collector.subscribe(move |_snapshots| {
        good_calls_in_sink.fetch_add(1, StdOrdering::SeqCst);
    });

    collector.start(Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(50)).await;
    collector.stop();
    assert!(good_calls.load(StdOrdering::SeqCst) >= 1);
}

#[test]
fn history_accumulates_across_manual_snapshots() {
    let collector = MetricsCollector::with_clock(FakeClock::new());
    collector.record("login", Duration::from_millis(10), true);
    assert!(collector.history().is_empty()); // history only grows via the scheduler
}
