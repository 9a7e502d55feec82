// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Response`: one success shape per operation, plus a shared `Error`
//! variant for argument errors.
//!
//! Precondition rejections (wrong worker, wrong state, unknown id)
//! are modeled as dedicated `Rejected`/`Job { job: None }`-style
//! shapes rather than `Error`, matching the spec's two-channel error
//! design (§7): only argument errors ever populate `Error`.

use qjb_core::{ConfigValue, FailedPage, Job, QueueStats, QueueSummary, TrackedJobs};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    /// `put`'s return value.
    Id { id: String },
    /// `peek`/`pop`'s return value.
    Jobs { jobs: Vec<Job> },
    /// `heartbeat` succeeded.
    Expiry { expires: f64 },
    /// `heartbeat`/`complete`/`fail` rejected their precondition.
    Rejected,
    /// `complete` succeeded; `outcome` is one of
    /// `"complete"`/`"waiting"`/`"scheduled"`.
    Completed { outcome: String },
    /// `fail` succeeded.
    Failed { group: String },
    /// `cancel` always succeeds.
    Cancelled,
    /// `get`'s return value.
    Job { job: Option<Job> },
    /// `getconfig name` returned a single value (or nothing).
    ConfigValue { value: Option<ConfigValue> },
    /// `getconfig` with no name returned the whole mapping.
    ConfigAll { values: HashMap<String, ConfigValue> },
    /// `setconfig` always succeeds.
    ConfigSet,
    /// `queues`'s return value; always an array (§9 Open Question).
    Queues { queues: Vec<QueueSummary> },
    /// `failed()` with no group: counts per group.
    FailedCounts { counts: HashMap<String, usize> },
    /// `failed(group, ..)`: a page of failed job records.
    FailedPage {
        total: usize,
        jobs: Vec<qjb_core::Job>,
    },
    /// `stats`'s return value.
    Stats { stats: QueueStats },
    /// `track`/`untrack` always succeed.
    Tracking,
    /// `tracked`'s return value.
    Tracked { jobs: Vec<String>, expired: Vec<String> },
    /// An argument error: arity mismatch, malformed JSON, unparseable
    /// number, unknown subcommand.
    Error { message: String },
}

impl From<FailedPage> for Response {
    fn from(page: FailedPage) -> Self {
        Response::FailedPage { total: page.total, jobs: page.jobs }
    }
}

impl From<TrackedJobs> for Response {
    fn from(tracked: TrackedJobs) -> Self {
        Response::Tracked { jobs: tracked.jobs, expired: tracked.expired }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_round_trips_through_json() {
        let resp = Response::Error { message: "bad".to_string() };
        let bytes = serde_json::to_vec(&resp).expect("serialize");
        let back: Response = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(resp, back);
    }

    #[test]
    fn rejected_has_no_payload_fields() {
        let resp = Response::Rejected;
        let value = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(value, serde_json::json!({"result": "rejected"}));
    }
}
