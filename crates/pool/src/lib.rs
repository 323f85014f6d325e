// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loadgen-pool: the bounded worker pools actions run in, one per
//! distinct action name, gated by a concurrency semaphore (§4.2, §4.3).

mod error;
mod manager;
mod pool;

pub use error::PoolError;
pub use manager::PoolManager;
pub use pool::{ActionPool, PoolOutcome, WorkerMode};
