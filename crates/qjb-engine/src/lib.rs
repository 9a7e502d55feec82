// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! qjb-engine: the atomic operation envelope (§4.1) — the single
//! `Broker` type that composes `qjb-store`'s primitives into the
//! fourteen operations of §6's interface table, one guarded critical
//! section per call.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod broker;
pub mod results;

pub use broker::Broker;
pub use results::{CompleteOutcome, ConfigQuery};
