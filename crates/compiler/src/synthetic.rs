// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small [`Action`] implementations synthesized by the compiler for
//! `Pause`, `Feed`, and `Repeat`'s per-iteration counter step. Every
//! other step variant either unrolls into user-supplied actions or is
//! handled by [`crate::inline`].

use async_trait::async_trait;
use loadgen_core::{Action, ActionError, Feeder, PauseStrategy, Session};
use std::sync::Arc;

pub struct PauseAction {
    pub strategy: PauseStrategy,
}

#[async_trait]
impl Action for PauseAction {
    async fn call(&self, _session: &mut Session) -> Result<(), ActionError> {
        let duration = self.strategy.sample();
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }
}

pub struct FeedAction {
    pub feeder: Arc<dyn Feeder>,
}

#[async_trait]
impl Action for FeedAction {
    async fn call(&self, session: &mut Session) -> Result<(), ActionError> {
        if !self.feeder.has_next() {
            return Err(ActionError::exit());
        }
        match self.feeder.next() {
            Some(row) => {
                session.merge(row);
                Ok(())
            }
            None => Err(ActionError::exit()),
        }
    }
}

pub struct CounterAction {
    pub key: String,
    pub value: usize,
}

#[async_trait]
impl Action for CounterAction {
    async fn call(&self, session: &mut Session) -> Result<(), ActionError> {
        session.set(self.key.clone(), self.value as i64);
        Ok(())
    }
}

#[cfg(test)]
#[path = "synthetic_tests.rs"]
mod tests;
