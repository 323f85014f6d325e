// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time per-action metrics record (§3, §4.4).
///
/// This is the stable wire shape §6 hands to SSE/REST consumers — field
/// names and the ISO-8601 UTC timestamp are part of that contract, not
/// an implementation detail, so they're pinned with explicit renames
/// rather than left to derive from the Rust field names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PoolMetricsSnapshot {
    #[serde(rename = "actionName")]
    pub action_name: String,
    #[serde(rename = "activeCount")]
    pub active_count: usize,
    #[serde(rename = "maxSize")]
    pub max_size: usize,
    #[serde(rename = "waitingCount")]
    pub waiting_count: usize,
    #[serde(rename = "completedCount")]
    pub completed: u64,
    #[serde(rename = "failedCount")]
    pub failed: u64,
    #[serde(rename = "averageResponseTimeMs")]
    pub average_ms: f64,
    #[serde(rename = "p99ResponseTimeMs")]
    pub p99_ms: f64,
    #[serde(rename = "requestsPerSecond")]
    pub requests_per_second: f64,
    pub timestamp: DateTime<Utc>,
}

/// Convert a `Clock::epoch_ms()` reading into the UTC timestamp the
/// snapshot serializes. Falls back to the earliest representable instant
/// on overflow rather than panicking; epoch milliseconds from any real
/// clock never come close to that bound.
pub fn epoch_ms_to_utc(ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
