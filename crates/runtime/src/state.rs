// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run's lifecycle state machine (§4.5):
//! `RampingUp → Running → Stopping → Completed`, with `Stopping` also
//! reachable from `RampingUp`, and `Failed` terminal from any state.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TestState {
    RampingUp = 0,
    Running = 1,
    Stopping = 2,
    Completed = 3,
    Failed = 4,
}

impl TestState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => TestState::RampingUp,
            1 => TestState::Running,
            2 => TestState::Stopping,
            3 => TestState::Completed,
            _ => TestState::Failed,
        }
    }
}

/// Atomic holder for [`TestState`] supporting the CAS transitions the
/// engine relies on.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(TestState::RampingUp as u8))
    }

    pub fn get(&self) -> TestState {
        TestState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// `RampingUp → Running`, once `elapsed ≥ R`. A no-op (returns
    /// `false`) if the state is no longer `RampingUp`.
    pub fn try_transition_to_running(&self) -> bool {
        self.0
            .compare_exchange(
                TestState::RampingUp as u8,
                TestState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// CAS from `RampingUp` or `Running` to `Stopping`. Returns `false`
    /// (a no-op) if the run is already stopping, completed, or failed.
    pub fn try_transition_to_stopping(&self) -> bool {
        for from in [TestState::RampingUp, TestState::Running] {
            if self
                .0
                .compare_exchange(
                    from as u8,
                    TestState::Stopping as u8,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                )
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    pub fn set_completed(&self) {
        self.0.store(TestState::Completed as u8, Ordering::SeqCst);
    }

    pub fn set_failed(&self) {
        self.0.store(TestState::Failed as u8, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        matches!(self.get(), TestState::RampingUp | TestState::Running)
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
