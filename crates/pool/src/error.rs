// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by [`crate::ActionPool`] and [`crate::PoolManager`].
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("pool \"{0}\" is shutting down and refuses new submissions")]
    ShuttingDown(String),
    #[error("no pool registered for action \"{0}\"")]
    UnknownAction(String),
}
