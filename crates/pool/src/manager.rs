// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owns one [`ActionPool`] per distinct action name, keyed off its
//! configured `connectionPoolSize` (§4.2, §4.3).

use crate::error::PoolError;
use crate::pool::{ActionPool, PoolOutcome, WorkerMode};
use loadgen_core::{Action, Session};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Registry of per-action pools. Cheap to clone; internally `Arc`-shared.
#[derive(Clone, Default)]
pub struct PoolManager {
    pools: Arc<RwLock<HashMap<String, Arc<ActionPool>>>>,
}

impl PoolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool for `action_name`, replacing any existing pool of
    /// the same name. Returns the new pool for direct inspection (e.g.
    /// by the metrics scheduler).
    pub fn register(
        &self,
        action_name: impl Into<String>,
        max_size: usize,
        mode: WorkerMode,
    ) -> Arc<ActionPool> {
        let action_name = action_name.into();
        let pool = ActionPool::new(action_name.clone(), max_size, mode);
        self.pools.write().insert(action_name, Arc::clone(&pool));
        pool
    }

    pub fn pool(&self, action_name: &str) -> Option<Arc<ActionPool>> {
        self.pools.read().get(action_name).cloned()
    }

    pub fn pools(&self) -> Vec<Arc<ActionPool>> {
        self.pools.read().values().cloned().collect()
    }

    /// Submit a job to the pool registered for `action_name`.
    pub fn submit(
        &self,
        action_name: &str,
        action: Arc<dyn Action>,
        session: Session,
    ) -> Result<oneshot::Receiver<PoolOutcome>, PoolError> {
        let pool = self
            .pool(action_name)
            .ok_or_else(|| PoolError::UnknownAction(action_name.to_string()))?;
        pool.submit(action, session)
    }

    /// Shut down every registered pool. Idempotent per-pool; safe to
    /// call more than once.
    pub async fn shutdown_all(&self) {
        let pools = self.pools();
        for pool in pools {
            pool.shutdown().await;
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
