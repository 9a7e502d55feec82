// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Request`: one tagged variant per row of the operation table (§6).
//!
//! The source lineage's arguments are positional; this is the
//! idiomatic Rust rendition of the same contract as named fields on
//! the matching variant.

use qjb_core::ConfigValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_failed_limit() -> i64 {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Put {
        queue: String,
        id: String,
        data: Value,
        now: f64,
        #[serde(default)]
        priority: i64,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        delay: f64,
    },
    Peek {
        queue: String,
        count: usize,
        now: f64,
    },
    Pop {
        queue: String,
        worker: String,
        count: usize,
        now: f64,
        expires: f64,
    },
    Heartbeat {
        id: String,
        worker: String,
        now: f64,
        #[serde(default)]
        data: Option<Value>,
    },
    Complete {
        id: String,
        worker: String,
        queue: String,
        now: f64,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        delay: f64,
        #[serde(default)]
        data: Option<Value>,
    },
    Fail {
        id: String,
        worker: String,
        group: String,
        message: String,
        now: f64,
        #[serde(default)]
        data: Option<Value>,
    },
    Cancel {
        id: String,
    },
    Get {
        id: String,
    },
    GetConfig {
        #[serde(default)]
        name: Option<String>,
    },
    SetConfig {
        name: String,
        #[serde(default)]
        value: Option<ConfigValue>,
    },
    Queues {
        now: f64,
    },
    Failed {
        #[serde(default)]
        group: Option<String>,
        #[serde(default)]
        start: i64,
        #[serde(default = "default_failed_limit")]
        limit: i64,
    },
    Stats {
        queue: String,
        date: f64,
    },
    Track {
        id: String,
    },
    Untrack {
        id: String,
    },
    TrackedAll,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn put_round_trips_through_json() {
        let req = Request::Put {
            queue: "q".to_string(),
            id: "j1".to_string(),
            data: json!({"a": 1}),
            now: 10.0,
            priority: -1,
            tags: vec!["x".to_string()],
            delay: 0.0,
        };
        let bytes = serde_json::to_vec(&req).expect("serialize");
        let back: Request = serde_json::from_slice(&bytes).expect("deserialize");
        assert_eq!(req, back);
    }

    #[test]
    fn failed_defaults_limit_when_omitted() {
        let req: Request = serde_json::from_value(json!({"op": "failed"})).expect("deserialize");
        assert_eq!(req, Request::Failed { group: None, start: 0, limit: 25 });
    }
}
