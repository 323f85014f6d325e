// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The metrics core: per-action counters and latency distributions,
//! periodic snapshotting, and subscriber fan-out (§3, §4.4).

use crate::action_metrics::ActionMetrics;
use crate::snapshot::{epoch_ms_to_utc, PoolMetricsSnapshot};
use loadgen_core::{Clock, SystemClock};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::error;

type Subscriber = Box<dyn Fn(&[PoolMetricsSnapshot]) + Send + Sync>;

/// Shared, cheaply-cloneable handle to the metrics core.
#[derive(Clone)]
pub struct MetricsCollector<C: Clock = SystemClock> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: Clock> {
    clock: C,
    actions: RwLock<HashMap<String, Arc<ActionMetrics>>>,
    subscribers: Mutex<Vec<Subscriber>>,
    history: Mutex<Vec<PoolMetricsSnapshot>>,
    running: AtomicBool,
    scheduler: Mutex<Option<JoinHandle<()>>>,
}

impl MetricsCollector<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MetricsCollector<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MetricsCollector<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Arc::new(Inner {
                clock,
                actions: RwLock::new(HashMap::new()),
                subscribers: Mutex::new(Vec::new()),
                history: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
                scheduler: Mutex::new(None),
            }),
        }
    }

    fn action(&self, name: &str) -> Arc<ActionMetrics> {
        if let Some(existing) = self.inner.actions.read().get(name) {
            return Arc::clone(existing);
        }
        let mut actions = self.inner.actions.write();
        Arc::clone(
            actions
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(ActionMetrics::new(&self.inner.clock))),
        )
    }

    /// Record one completed action invocation.
    pub fn record(&self, action_name: &str, duration: Duration, success: bool) {
        self.action(action_name).record(duration, success);
    }

    /// Feed pool gate counters (`active`/`max`/`waiting`) into the next
    /// snapshot for this action; 0 for any action never set (§4.4).
    pub fn set_gate(&self, action_name: &str, active: usize, max_size: usize, waiting: usize) {
        self.action(action_name).set_gate(active, max_size, waiting);
    }

    /// Build one snapshot entry per observed action. Empty if nothing
    /// has been recorded yet.
    pub fn snapshot(&self) -> Vec<PoolMetricsSnapshot> {
        let now = self.inner.clock.now();
        let timestamp = epoch_ms_to_utc(self.inner.clock.epoch_ms());
        self.inner
            .actions
            .read()
            .iter()
            .map(|(name, metrics)| PoolMetricsSnapshot {
                action_name: name.clone(),
                active_count: metrics.active_count(),
                max_size: metrics.max_size(),
                waiting_count: metrics.waiting_count(),
                completed: metrics.success_count(),
                failed: metrics.failure_count(),
                average_ms: metrics.mean_ms(),
                p99_ms: metrics.p99_ms(),
                requests_per_second: metrics.requests_per_second(now),
                timestamp,
            })
            .collect()
    }

    /// Register a subscriber invoked with each snapshot cycle's entries,
    /// in production order, one cycle fully delivered before the next.
    pub fn subscribe(&self, sink: impl Fn(&[PoolMetricsSnapshot]) + Send + Sync + 'static) {
        self.inner.subscribers.lock().push(Box::new(sink));
    }

    /// The full historical snapshot list accumulated across cycles,
    /// folded by the result builder into a test result's time series.
    pub fn history(&self) -> Vec<PoolMetricsSnapshot> {
        self.inner.history.lock().clone()
    }

    fn dispatch_cycle(&self) {
        let entries = self.snapshot();
        self.inner.history.lock().extend(entries.iter().cloned());
        let subscribers = self.inner.subscribers.lock();
        for sink in subscribers.iter() {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| sink(&entries)));
            if let Err(panic) = outcome {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "subscriber panicked".to_string());
                error!(%message, "metrics subscriber failed; continuing with remaining subscribers");
            }
        }
    }
}

impl<C: Clock> MetricsCollector<C> {
    /// Start the periodic snapshot scheduler. The first snapshot fires
    /// one `interval` after this call, not immediately. Safe to call
    /// again after `stop()`.
    pub fn start(&self, interval: Duration) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let collector = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(
                tokio::time::Instant::now() + interval,
                interval,
            );
            loop {
                ticker.tick().await;
                if !collector.inner.running.load(Ordering::SeqCst) {
                    break;
                }
                collector.dispatch_cycle();
            }
        });
        *self.inner.scheduler.lock() = Some(handle);
    }

    /// Stop the scheduler. Idempotent; safe to call before any `start`.
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.inner.scheduler.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
