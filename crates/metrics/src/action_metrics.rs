// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::distribution::LatencyDistribution;
use loadgen_core::Clock;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Per-action accumulated state. One of these is created lazily the
/// first time an action is observed.
pub(crate) struct ActionMetrics {
    distribution: Mutex<LatencyDistribution>,
    success: AtomicU64,
    failure: AtomicU64,
    active_count: AtomicUsize,
    max_size: AtomicUsize,
    waiting_count: AtomicUsize,
    first_seen: Instant,
}

impl ActionMetrics {
    pub(crate) fn new(clock: &impl Clock) -> Self {
        Self {
            distribution: Mutex::new(LatencyDistribution::new()),
            success: AtomicU64::new(0),
            failure: AtomicU64::new(0),
            active_count: AtomicUsize::new(0),
            max_size: AtomicUsize::new(0),
            waiting_count: AtomicUsize::new(0),
            first_seen: clock.now(),
        }
    }

    pub(crate) fn record(&self, duration: std::time::Duration, success: bool) {
        self.distribution.lock().record(duration);
        if success {
            self.success.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failure.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn set_gate(&self, active: usize, max_size: usize, waiting: usize) {
        self.active_count.store(active, Ordering::SeqCst);
        self.max_size.store(max_size, Ordering::SeqCst);
        self.waiting_count.store(waiting, Ordering::SeqCst);
    }

    pub(crate) fn success_count(&self) -> u64 {
        self.success.load(Ordering::SeqCst)
    }

    pub(crate) fn failure_count(&self) -> u64 {
        self.failure.load(Ordering::SeqCst)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active_count.load(Ordering::SeqCst)
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size.load(Ordering::SeqCst)
    }

    pub(crate) fn waiting_count(&self) -> usize {
        self.waiting_count.load(Ordering::SeqCst)
    }

    pub(crate) fn mean_ms(&self) -> f64 {
        self.distribution.lock().mean_ms()
    }

    pub(crate) fn p99_ms(&self) -> f64 {
        self.distribution.lock().p99_ms()
    }

    pub(crate) fn requests_per_second(&self, now: Instant) -> f64 {
        let observed = self.success_count() + self.failure_count();
        let elapsed_secs = now.saturating_duration_since(self.first_seen).as_secs_f64();
        observed as f64 / elapsed_secs.max(1.0)
    }
}
