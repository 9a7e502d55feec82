// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed result shapes for operations whose source lineage returns an
//! overloaded sentinel (`false`/`nil`). Idiomatic Rust prefers a typed
//! outcome to a boolean that sometimes means "rejected" and sometimes
//! means "failure" — `qjb-wire` maps these back to the wire-level
//! sentinel for non-Rust callers.

use serde::Serialize;
use std::collections::HashMap;

/// `complete`'s three success shapes. Rejection (wrong worker, wrong
/// state, wrong queue) is modeled as `Ok(None)` at the call site, not
/// as a fourth variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompleteOutcome {
    Complete,
    Waiting,
    Scheduled,
}

impl CompleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompleteOutcome::Complete => "complete",
            CompleteOutcome::Waiting => "waiting",
            CompleteOutcome::Scheduled => "scheduled",
        }
    }
}

/// `getconfig`'s two shapes: a single value, or the whole mapping.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConfigQuery {
    Value(qjb_core::ConfigValue),
    All(HashMap<String, qjb_core::ConfigValue>),
}

impl ConfigQuery {
    pub fn as_map(&self) -> Option<&HashMap<String, qjb_core::ConfigValue>> {
        match self {
            ConfigQuery::All(map) => Some(map),
            ConfigQuery::Value(_) => None,
        }
    }
}
