// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feeders: abstract sources of key/value attribute rows.
//!
//! A feeder may be infinite (circular/random/generated) or finite
//! (sequential, which is exhausted once its rows run out). Feeders used
//! by multiple virtual users concurrently must be thread-safe; the
//! built-in feeders here satisfy that by construction.

use parking_lot::Mutex;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One row of attributes a feeder yields.
pub type Row = HashMap<String, Value>;

/// Abstract source of attribute rows.
///
/// `next()` returns `None` once the feeder is exhausted; the scenario
/// compiler lowers that into the exit sentinel rather than a step error
/// (see [`crate::exit::ExitSignal`]).
pub trait Feeder: Send + Sync {
    /// Stable name used when naming the compiled `_feed:` step.
    fn name(&self) -> &str;

    /// Whether a subsequent call to [`Feeder::next`] would yield a row.
    fn has_next(&self) -> bool;

    /// Produce the next row, or `None` if exhausted.
    fn next(&self) -> Option<Row>;
}

/// Finite feeder that walks a fixed list of rows once, in order, then
/// reports exhaustion forever after.
pub struct SequentialFeeder {
    name: String,
    rows: Vec<Row>,
    cursor: AtomicUsize,
}

impl SequentialFeeder {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Feeder for SequentialFeeder {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_next(&self) -> bool {
        self.cursor.load(Ordering::SeqCst) < self.rows.len()
    }

    fn next(&self) -> Option<Row> {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.rows.get(idx).cloned()
    }
}

/// Infinite feeder that wraps around a fixed list of rows forever.
pub struct CircularFeeder {
    name: String,
    rows: Vec<Row>,
    cursor: AtomicUsize,
}

impl CircularFeeder {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        assert!(!rows.is_empty(), "CircularFeeder requires at least one row");
        Self {
            name: name.into(),
            rows,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Feeder for CircularFeeder {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_next(&self) -> bool {
        true
    }

    fn next(&self) -> Option<Row> {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst) % self.rows.len();
        self.rows.get(idx).cloned()
    }
}

/// Infinite feeder that samples uniformly at random from a fixed list of
/// rows on every call.
pub struct RandomFeeder {
    name: String,
    rows: Vec<Row>,
    rng: Mutex<rand::rngs::StdRng>,
}

impl RandomFeeder {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        assert!(!rows.is_empty(), "RandomFeeder requires at least one row");
        Self {
            name: name.into(),
            rows,
            rng: Mutex::new(rand::SeedableRng::from_entropy()),
        }
    }
}

impl Feeder for RandomFeeder {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_next(&self) -> bool {
        true
    }

    fn next(&self) -> Option<Row> {
        let idx = self.rng.lock().gen_range(0..self.rows.len());
        self.rows.get(idx).cloned()
    }
}

#[cfg(test)]
#[path = "feeder_tests.rs"]
mod tests;
