// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument-validation errors for the atomic operation envelope.
//!
//! These are always fatal to the call, never to the broker (see
//! the error handling design: argument errors vs. precondition
//! rejections). Precondition rejections are modeled as typed
//! `Ok` sentinels elsewhere, not as `BrokerError`.
//!
//! Most of §7's argument-error surface (wrong key count, missing
//! required field, malformed number, unknown subcommand) is caught
//! for free by `serde`'s typed deserialization of the wire `Request`
//! enum before a call ever reaches `Broker` — there is no positional,
//! stringly-typed argument list left to validate by hand. What
//! remains here is validation that `serde`'s type system cannot
//! express: the `put`-time shape constraint on `data`, and the
//! sign constraint on `failed`'s `start`/`limit`.

use thiserror::Error;

/// Errors raised while validating or executing an atomic operation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BrokerError {
    #[error("`data` must be a JSON object at the top level")]
    DataNotAnObject,

    #[error("`start` and `limit` must be non-negative")]
    InvalidRange,
}

pub type BrokerResult<T> = Result<T, BrokerError>;
