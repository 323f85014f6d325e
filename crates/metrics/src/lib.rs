// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loadgen-metrics: per-action latency distributions, counters, and
//! periodic snapshotting with subscriber fan-out (§3, §4.4).

mod action_metrics;
mod collector;
mod distribution;
mod snapshot;

pub use collector::MetricsCollector;
pub use distribution::{LatencyDistribution, Percentiles};
pub use snapshot::{epoch_ms_to_utc, PoolMetricsSnapshot};
