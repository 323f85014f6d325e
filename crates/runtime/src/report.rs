// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only ergonomic helpers over [`TestResult`] for report renderers
//! (out of scope themselves; this is the surface they consume).

use crate::result::TestResult;
use std::time::Duration;

pub trait TestResultExt {
    /// Fraction of all requests, across every action, that succeeded.
    /// `1.0` if no requests were recorded.
    fn success_rate(&self) -> f64;

    /// Total wall-clock time divided evenly across the action summaries
    /// present in this result; `None` if there were none.
    fn duration_per_action(&self) -> Option<Duration>;
}

impl TestResultExt for TestResult {
    fn success_rate(&self) -> f64 {
        let (success, total) = self
            .action_summaries
            .iter()
            .fold((0u64, 0u64), |(success, total), summary| {
                (success + summary.success_count, total + summary.total_requests)
            });
        if total == 0 {
            1.0
        } else {
            success as f64 / total as f64
        }
    }

    fn duration_per_action(&self) -> Option<Duration> {
        let count = self.action_summaries.len() as u32;
        if count == 0 {
            None
        } else {
            Some(self.total_duration / count)
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
