use super::*;
use loadgen_metrics::epoch_ms_to_utc;

fn snapshot(action_name: &str, completed: u64, failed: u64, timestamp_ms: u64) -> PoolMetricsSnapshot {
    PoolMetricsSnapshot {
        action_name: action_name.to_string(),
        active_count: 0,
        max_size: 4,
        waiting_count: 0,
        completed,
        failed,
        average_ms: 12.5,
        p99_ms: 40.0,
        requests_per_second: 3.0,
        timestamp: epoch_ms_to_utc(timestamp_ms),
    }
}

#[test]
fn empty_snapshots_produce_no_action_summaries() {
    let result = ResultBuilder::build(0, 1000, 10, vec![]);
    assert!(result.action_summaries.is_empty());
    assert!(result.time_series_snapshots.is_empty());
}

#[test]
fn summary_uses_the_latest_snapshot_per_action_not_an_aggregate() {
    let snapshots = vec![
        snapshot("login", 1, 0, 100),
        snapshot("login", 5, 1, 200),
    ];
    let result = ResultBuilder::build(0, 1000, 10, snapshots);
    assert_eq!(result.action_summaries.len(), 1);
    let summary = &result.action_summaries[0];
    assert_eq!(summary.success_count, 5);
    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.total_requests, 6);
}

#[test]
fn multiple_actions_each_get_their_own_summary() {
    let snapshots = vec![snapshot("login", 1, 0, 100), snapshot("checkout", 2, 0, 100)];
    let result = ResultBuilder::build(0, 1000, 10, snapshots);
    assert_eq!(result.action_summaries.len(), 2);
    let names: Vec<&str> = result
        .action_summaries
        .iter()
        .map(|s| s.action_name.as_str())
        .collect();
    assert_eq!(names, vec!["checkout", "login"]);
}

#[test]
fn total_duration_is_derived_from_the_epoch_bounds() {
    let result = ResultBuilder::build(1_000, 4_500, 10, vec![]);
    assert_eq!(result.total_duration, Duration::from_millis(3_500));
}
