// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runtime engine: ramp controller, active-gauge updater, deadline
//! task, and the virtual-user loop (§4.5).

use crate::config::RuntimeConfig;
use crate::result::{ResultBuilder, TestResult};
use crate::state::{StateCell, TestState};
use loadgen_core::{ActionChain, Clock, Session, SystemClock};
use loadgen_metrics::MetricsCollector;
use loadgen_pool::PoolManager;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{Notify, OnceCell};
use tokio::task::JoinHandle;
use tracing::debug;

const RAMP_TICK: Duration = Duration::from_millis(200);
const GAUGE_TICK: Duration = Duration::from_secs(1);
const GAUGE_FIRST_TICK_DELAY: Duration = Duration::from_millis(500);

struct Shared<C: Clock> {
    config: RuntimeConfig,
    chain: ActionChain,
    pools: PoolManager,
    metrics: MetricsCollector<C>,
    clock: C,
    state: StateCell,
    spawned: AtomicU64,
    permanently_exited: AtomicU64,
    start_instant: Instant,
    start_epoch_ms: u64,
    end_epoch_ms: AtomicU64,
    result: OnceCell<TestResult>,
    done: Notify,
    scheduler_tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Handle to a running (or finished) load test (§6).
#[derive(Clone)]
pub struct LoadTestRun<C: Clock = SystemClock> {
    shared: Arc<Shared<C>>,
}

impl LoadTestRun<SystemClock> {
    /// Compile and validate inputs are the caller's responsibility;
    /// starting the run assumes both `config` and `chain` are already
    /// valid (§7 — configuration errors are surfaced before this call).
    pub fn start(config: RuntimeConfig, chain: ActionChain) -> Self {
        Self::start_with_clock(config, chain, SystemClock)
    }
}

impl<C: Clock> LoadTestRun<C> {
    pub fn start_with_clock(config: RuntimeConfig, chain: ActionChain, clock: C) -> Self {
        let pools = PoolManager::new();
        let mut seen = std::collections::HashSet::new();
        for name in chain.names() {
            if seen.insert(name) {
                pools.register(name, config.pool_size_for(name), config.worker_mode);
            }
        }
        let metrics = MetricsCollector::with_clock(clock.clone());
        let start_instant = clock.now();
        let start_epoch_ms = clock.epoch_ms();

        let shared = Arc::new(Shared {
            config,
            chain,
            pools,
            metrics,
            clock,
            state: StateCell::new(),
            spawned: AtomicU64::new(0),
            permanently_exited: AtomicU64::new(0),
            start_instant,
            start_epoch_ms,
            end_epoch_ms: AtomicU64::new(0),
            result: OnceCell::new(),
            done: Notify::new(),
            scheduler_tasks: Mutex::new(Vec::new()),
        });

        shared.metrics.start(shared.config.metrics_interval);

        let ramp_shared = Arc::clone(&shared);
        let ramp_handle = tokio::spawn(async move { ramp_controller(ramp_shared).await });

        let gauge_shared = Arc::clone(&shared);
        let gauge_handle = tokio::spawn(async move { gauge_updater(gauge_shared).await });

        let deadline_shared = Arc::clone(&shared);
        let test_duration = shared.config.test_duration;
        let deadline_handle = tokio::spawn(async move {
            tokio::time::sleep(test_duration).await;
            stop(deadline_shared).await;
        });

        {
            let mut tasks = shared.scheduler_tasks.lock().unwrap_or_else(|e| e.into_inner());
            tasks.push(ramp_handle);
            tasks.push(gauge_handle);
            tasks.push(deadline_handle);
        }

        LoadTestRun { shared }
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.is_running()
    }

    pub fn state(&self) -> TestState {
        self.shared.state.get()
    }

    /// `spawned − permanentlyExited` (§9 Open Question, resolved).
    pub fn active_users(&self) -> u64 {
        let spawned = self.shared.spawned.load(Ordering::SeqCst);
        let exited = self.shared.permanently_exited.load(Ordering::SeqCst);
        spawned.saturating_sub(exited)
    }

    pub async fn stop(&self) {
        stop(Arc::clone(&self.shared)).await;
    }

    pub async fn result(&self) -> TestResult {
        loop {
            let notified = self.shared.done.notified();
            if let Some(result) = self.shared.result.get() {
                return result.clone();
            }
            notified.await;
        }
    }
}

async fn ramp_controller<C: Clock>(shared: Arc<Shared<C>>) {
    let mut ticker = tokio::time::interval(RAMP_TICK);
    loop {
        ticker.tick().await;
        if !shared.state.is_running() {
            continue;
        }
        let elapsed = shared.clock.now().saturating_duration_since(shared.start_instant);
        let ramp_up = shared.config.ramp_up;
        let ratio = if ramp_up.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / ramp_up.as_secs_f64()).min(1.0)
        };
        if elapsed >= ramp_up {
            shared.state.try_transition_to_running();
        }
        let target = (shared.config.number_of_users as f64 * ratio).ceil() as u64;
        let spawned = shared.spawned.load(Ordering::SeqCst);
        let deficit = target.saturating_sub(spawned);
        for _ in 0..deficit {
            shared.spawned.fetch_add(1, Ordering::SeqCst);
            let user_shared = Arc::clone(&shared);
            tokio::spawn(async move { user_loop(user_shared).await });
        }
    }
}

async fn gauge_updater<C: Clock>(shared: Arc<Shared<C>>) {
    let mut ticker =
        tokio::time::interval_at(tokio::time::Instant::now() + GAUGE_FIRST_TICK_DELAY, GAUGE_TICK);
    loop {
        ticker.tick().await;
        for pool in shared.pools.pools() {
            shared.metrics.set_gate(
                pool.name(),
                pool.active_count(),
                pool.max_size(),
                pool.waiting_count(),
            );
        }
        if !shared.state.is_running() {
            return;
        }
    }
}

async fn user_loop<C: Clock>(shared: Arc<Shared<C>>) {
    let mut session = Session::new();
    let mut index = 0usize;
    loop {
        if !shared.state.is_running() {
            shared.permanently_exited.fetch_add(1, Ordering::SeqCst);
            return;
        }
        let Some(def) = shared.chain.get(index) else {
            // unreachable for a well-formed chain; treat as chain completion.
            index = 0;
            session = Session::new();
            continue;
        };
        let name = def.name().to_string();
        let body = Arc::clone(def.body());

        let Ok(rx) = shared.pools.submit(&name, body, session) else {
            // pool refused the job (shutting down); exit quietly.
            shared.permanently_exited.fetch_add(1, Ordering::SeqCst);
            return;
        };
        let Ok(outcome) = rx.await else {
            shared.permanently_exited.fetch_add(1, Ordering::SeqCst);
            return;
        };

        let success = outcome.result.is_ok();
        shared.metrics.record(&name, outcome.duration, success);
        session = outcome.session;

        match outcome.result {
            Ok(()) => {
                index += 1;
                if index == shared.chain.len() {
                    index = 0;
                    session = Session::new();
                }
            }
            Err(err) => {
                // Early-exit sentinel is counted as failure but not
                // logged as an error (§7, §9 Open Question).
                if !err.is_exit() {
                    debug!(action = %name, error = %err, "action failed");
                }
                index = 0;
                session = Session::new();
            }
        }
    }
}

async fn stop<C: Clock>(shared: Arc<Shared<C>>) {
    if !shared.state.try_transition_to_stopping() {
        return;
    }
    {
        let mut tasks = shared
            .scheduler_tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
    shared.pools.shutdown_all().await;
    shared.metrics.stop();

    let end_epoch_ms = shared.clock.epoch_ms();
    shared.end_epoch_ms.store(end_epoch_ms, Ordering::SeqCst);
    let snapshots = shared.metrics.history();
    let result = ResultBuilder::build(
        shared.start_epoch_ms,
        end_epoch_ms,
        shared.config.number_of_users,
        snapshots,
    );
    let _ = shared.result.set(result);
    shared.state.set_completed();
    shared.done.notify_waiters();
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
