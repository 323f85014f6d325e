// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional `tracing-subscriber` wiring for binaries embedding this
//! core. The library crates themselves only emit `tracing` events and
//! never install a subscriber; this is for hosts that want a
//! reasonable default without pulling in their own filter setup.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing-subscriber` with an `EnvFilter` driven by
/// `RUST_LOG` (defaulting to `info`). Idempotent within a process: a
/// second call is a harmless no-op if a subscriber is already set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
