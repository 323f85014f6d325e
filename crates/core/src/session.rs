// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-virtual-user session state.
//!
//! A [`Session`] is minted fresh each time a virtual user (re)starts a
//! chain iteration (on completion or on failure) and is owned solely by
//! that user for the duration of the iteration; it is never shared
//! across concurrent users.

use serde_json::Value;
use std::collections::HashMap;

crate::define_id! {
    /// Opaque identifier for one session instance.
    pub struct SessionId;
}

/// Per-user keyed attribute store passed through every step of a chain
/// iteration.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    attrs: HashMap<String, Value>,
}

impl Session {
    /// Mint a fresh, empty session with a newly generated id.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(uuid::Uuid::new_v4().to_string()),
            attrs: HashMap::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Merge a row of key/value pairs into the session, e.g. from a
    /// [`crate::feeder::Feeder`].
    pub fn merge(&mut self, row: HashMap<String, Value>) {
        self.attrs.extend(row);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
