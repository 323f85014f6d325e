// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loadgen-runtime: the virtual-user engine that drives a compiled
//! action chain to completion — ramp-up, per-action pooling and
//! metrics, and the final result (§4.5, §4.6).

pub mod config;
pub mod engine;
pub mod logging;
pub mod report;
pub mod result;
pub mod state;

pub use config::{ConfigError, RuntimeConfig, TomlConfig};
pub use engine::LoadTestRun;
pub use logging::init_tracing;
pub use report::TestResultExt;
pub use result::{ActionSummary, ResultBuilder, TestResult};
pub use state::TestState;
