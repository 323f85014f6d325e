// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loadgen-compiler: lowers a [`loadgen_core::Scenario`] step tree into
//! the flat, ordered [`loadgen_core::ActionChain`] the runtime engine
//! walks.

mod inline;
mod lower;
mod synthetic;

pub use lower::{compile, CompileError};
