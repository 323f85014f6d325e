// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single action's worker pool: a concurrency gate plus one of two
//! dispatch strategies for running submitted work against it (§4.2).

use crate::error::PoolError;
use loadgen_core::{Action, ActionError, Session};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinHandle;
use tracing::warn;

/// How a pool turns submitted jobs into running tasks.
///
/// Both modes are gated by the same `maxSize` semaphore; the difference
/// is only in how the underlying tokio tasks are provisioned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerMode {
    /// One throwaway tokio task per submission — the cheap default, apt
    /// for actions that mostly await I/O.
    Lightweight,
    /// A persistent set of worker tasks, grown from `core` up to
    /// `max_size` under load and reaped back down to `core` after 60s
    /// idle, modeled on a bounded thread-pool executor.
    Bounded { core: usize },
}

/// Outcome of one submitted job, handed back to the caller once the
/// action body has run (or the pool refused it).
pub struct PoolOutcome {
    pub session: Session,
    pub duration: Duration,
    pub result: Result<(), ActionError>,
}

struct Job {
    action: Arc<dyn Action>,
    session: Session,
    reply: oneshot::Sender<PoolOutcome>,
}

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
const IDLE_REAP: Duration = Duration::from_secs(60);

/// One action's worker pool. Concurrency never exceeds `max_size`
/// regardless of `WorkerMode`; the mode only governs queueing.
pub struct ActionPool {
    name: String,
    max_size: usize,
    mode: WorkerMode,
    gate: Arc<Semaphore>,
    waiting: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    shutting_down: Arc<AtomicBool>,
    handles: std::sync::Mutex<Vec<JoinHandle<()>>>,
    queue: Option<mpsc::Sender<Job>>,
    worker_count: Arc<AtomicUsize>,
}

impl ActionPool {
    pub fn new(name: impl Into<String>, max_size: usize, mode: WorkerMode) -> Arc<Self> {
        let name = name.into();
        let bounded_rx = if let WorkerMode::Bounded { .. } = mode {
            Some(mpsc::channel(max_size.max(1) * 2))
        } else {
            None
        };
        let (queue, rx) = match bounded_rx {
            Some((tx, rx)) => (Some(tx), Some(rx)),
            None => (None, None),
        };

        let pool = Arc::new(Self {
            name,
            max_size,
            mode,
            gate: Arc::new(Semaphore::new(max_size)),
            waiting: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
            shutting_down: Arc::new(AtomicBool::new(false)),
            handles: std::sync::Mutex::new(Vec::new()),
            queue,
            worker_count: Arc::new(AtomicUsize::new(0)),
        });

        if let (WorkerMode::Bounded { core }, Some(rx)) = (mode, rx) {
            pool.spawn_bounded_worker(rx, core);
        }

        pool
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn completed_count(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Submit a job for execution. Increments `waiting_count`
    /// immediately; the returned receiver resolves once a worker has
    /// run the action to completion.
    pub fn submit(
        &self,
        action: Arc<dyn Action>,
        session: Session,
    ) -> Result<oneshot::Receiver<PoolOutcome>, PoolError> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(PoolError::ShuttingDown(self.name.clone()));
        }
        let (reply, rx) = oneshot::channel();
        self.waiting.fetch_add(1, Ordering::SeqCst);

        match (&self.mode, &self.queue) {
            (WorkerMode::Lightweight, _) => self.dispatch_lightweight(action, session, reply),
            (WorkerMode::Bounded { .. }, Some(queue)) => {
                let job = Job {
                    action,
                    session,
                    reply,
                };
                if let Err(mpsc::error::TrySendError::Full(job)) = queue.try_send(job) {
                    // Caller-runs overflow: the buffer and worker pool are
                    // both saturated, so run this job on the submitting
                    // task instead of blocking indefinitely.
                    warn!(pool = %self.name, "bounded pool saturated, running job inline");
                    self.waiting.fetch_sub(1, Ordering::SeqCst);
                    self.run_inline(job.action, job.session, job.reply);
                }
            }
            (WorkerMode::Bounded { .. }, None) => unreachable!("bounded pool always has a queue"),
        }

        Ok(rx)
    }

    fn dispatch_lightweight(
        &self,
        action: Arc<dyn Action>,
        session: Session,
        reply: oneshot::Sender<PoolOutcome>,
    ) {
        let gate = Arc::clone(&self.gate);
        let waiting = Arc::clone(&self.waiting);
        let active = Arc::clone(&self.active);
        let completed = Arc::clone(&self.completed);
        let failed = Arc::clone(&self.failed);

        let handle = tokio::spawn(async move {
            waiting.fetch_sub(1, Ordering::SeqCst);
            run_gated(gate, active, completed, failed, action, session, reply).await;
        });
        self.track(handle);
    }

    fn run_inline(&self, action: Arc<dyn Action>, session: Session, reply: oneshot::Sender<PoolOutcome>) {
        let gate = Arc::clone(&self.gate);
        let active = Arc::clone(&self.active);
        let completed = Arc::clone(&self.completed);
        let failed = Arc::clone(&self.failed);
        let handle = tokio::spawn(async move {
            run_gated(gate, active, completed, failed, action, session, reply).await;
        });
        self.track(handle);
    }

    fn spawn_bounded_worker(self: &Arc<Self>, rx: mpsc::Receiver<Job>, core: usize) {
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        for _ in 0..core.max(1) {
            self.grow_bounded_workers(Arc::clone(&rx));
        }
    }

    fn grow_bounded_workers(self: &Arc<Self>, rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>) {
        let pool = Arc::clone(self);
        pool.worker_count.fetch_add(1, Ordering::SeqCst);
        let handle = tokio::spawn(async move {
            let WorkerMode::Bounded { core } = pool.mode else {
                unreachable!("bounded worker loop only runs for bounded pools")
            };
            loop {
                let job = {
                    let mut guard = rx.lock().await;
                    tokio::time::timeout(IDLE_REAP, guard.recv()).await
                };
                match job {
                    Ok(Some(job)) => {
                        pool.waiting.fetch_sub(1, Ordering::SeqCst);
                        run_gated(
                            Arc::clone(&pool.gate),
                            Arc::clone(&pool.active),
                            Arc::clone(&pool.completed),
                            Arc::clone(&pool.failed),
                            job.action,
                            job.session,
                            job.reply,
                        )
                        .await;
                    }
                    Ok(None) => break, // sender dropped, pool is gone
                    Err(_elapsed) => {
                        if pool.worker_count.load(Ordering::SeqCst) > core {
                            break;
                        }
                    }
                }
            }
            pool.worker_count.fetch_sub(1, Ordering::SeqCst);
        });
        self.track(handle);
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Idempotent. Refuses further submissions immediately, waits up to
    /// 10s for in-flight work to finish, then aborts whatever remains.
    pub async fn shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        loop {
            let still_running = self.active.load(Ordering::SeqCst) > 0
                || self.waiting.load(Ordering::SeqCst) > 0;
            if !still_running || Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let handles = std::mem::take(&mut *self.handles.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in handles {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

/// Counts a job as failed and replies on its behalf if it is dropped
/// before `run_gated` reaches a normal completion, i.e. the task is
/// aborted while still blocked on the gate (§4.2).
struct CancelGuard {
    failed: Arc<AtomicU64>,
    reply: Option<oneshot::Sender<PoolOutcome>>,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(reply) = self.reply.take() {
            self.failed.fetch_add(1, Ordering::SeqCst);
            let _ = reply.send(PoolOutcome {
                session: Session::new(),
                duration: Duration::ZERO,
                result: Err(ActionError::new("cancelled while waiting for a worker")),
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_gated(
    gate: Arc<Semaphore>,
    active: Arc<AtomicUsize>,
    completed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    action: Arc<dyn Action>,
    mut session: Session,
    reply: oneshot::Sender<PoolOutcome>,
) {
    let mut guard = CancelGuard {
        failed: Arc::clone(&failed),
        reply: Some(reply),
    };

    let Ok(permit) = gate.acquire_owned().await else {
        return;
    };
    active.fetch_add(1, Ordering::SeqCst);
    let start = Instant::now();
    let result = action.call(&mut session).await;
    let duration = start.elapsed();
    active.fetch_sub(1, Ordering::SeqCst);
    drop(permit);

    match &result {
        Ok(()) => {
            completed.fetch_add(1, Ordering::SeqCst);
        }
        Err(_) => {
            failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    if let Some(reply) = guard.reply.take() {
        let _ = reply.send(PoolOutcome {
            session,
            duration,
            result,
        });
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
