// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions and the action chain they form.
//!
//! An [`Action`] is a named unit of user-defined work executed in the
//! context of a [`Session`]. The scenario compiler lowers a step tree
//! into an immutable, ordered [`ActionChain`] of such actions.

use crate::session::Session;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Failure from running an action body. Any user-supplied action may
/// fail for any reason; the only contract the runtime relies on is that
/// failure is distinguishable from success.
///
/// `is_exit` distinguishes the exit sentinel (raised by `ExitIf` or by a
/// non-circular feeder's exhaustion) from a genuine action failure: the
/// runtime still restarts the user and counts it toward `failed`, but
/// never debug-logs it as an error (§7, §9 Open Question).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    is_exit: bool,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_exit: false,
        }
    }

    /// Build the exit-sentinel flavor of this error.
    pub fn exit() -> Self {
        Self {
            message: crate::exit::ExitSignal.to_string(),
            is_exit: true,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.is_exit
    }
}

impl From<&str> for ActionError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActionError {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// `Action = λ session: void | raises` (§6).
///
/// Implementations may block on external I/O (an HTTP call, a database
/// round trip, a queue publish); the pool executing them picks a worker
/// model suited to that (see `loadgen-pool`).
#[async_trait]
pub trait Action: Send + Sync {
    async fn call(&self, session: &mut Session) -> Result<(), ActionError>;
}

#[async_trait]
impl<F> Action for F
where
    F: Fn(&mut Session) -> Result<(), ActionError> + Send + Sync,
{
    async fn call(&self, session: &mut Session) -> Result<(), ActionError> {
        (self)(session)
    }
}

/// One action definition, immutable once inserted into a chain.
#[derive(Clone)]
pub struct ActionDef {
    name: String,
    body: Arc<dyn Action>,
    index: usize,
}

impl fmt::Debug for ActionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDef")
            .field("name", &self.name)
            .field("index", &self.index)
            .finish()
    }
}

impl ActionDef {
    /// Fails if `name` is blank (§7 — configuration errors are surfaced
    /// synchronously at construction; the runtime never starts).
    pub fn new(
        name: impl Into<String>,
        body: Arc<dyn Action>,
        index: usize,
    ) -> Result<Self, ActionChainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ActionChainError::BlankName);
        }
        Ok(Self { name, body, index })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Arc<dyn Action> {
        &self.body
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Non-empty, ordered, immutable sequence of [`ActionDef`]s. Indices run
/// `0..N-1` and match position.
#[derive(Clone, Debug)]
pub struct ActionChain {
    actions: Arc<Vec<ActionDef>>,
}

impl ActionChain {
    /// Build a chain from a list of `(name, body)` pairs, assigning
    /// sequential indices. Fails if the list is empty or any name is
    /// blank.
    pub fn new(entries: Vec<(String, Arc<dyn Action>)>) -> Result<Self, ActionChainError> {
        if entries.is_empty() {
            return Err(ActionChainError::Empty);
        }
        let actions = entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, body))| ActionDef::new(name, body, i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            actions: Arc::new(actions),
        })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ActionDef> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }
}

/// Errors building an [`ActionChain`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionChainError {
    #[error("action chain must not be empty")]
    Empty,
    #[error("action name must be non-blank")]
    BlankName,
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
