// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol for daemon communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload. One
//! `Request` variant per row of the operation table; `Response`
//! mirrors it with one success shape per operation plus a shared
//! `Error` variant for argument errors. This crate carries no engine
//! dependency: it only defines the envelope and the framing, so
//! `qjb-daemon` is the only place that maps a `Request` onto a live
//! `Broker`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod wire;

pub use request::Request;
pub use response::Response;
pub use wire::{decode, encode, read_message, write_message, ProtocolError};
