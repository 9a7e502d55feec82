// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(queue, day-bucket) distribution storage.

use qjb_core::QueueStats;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct StatsStore {
    entries: HashMap<(String, i64), QueueStats>,
}

impl StatsStore {
    pub fn record_wait(&mut self, queue: &str, day: i64, seconds: f64) {
        self.entries.entry((queue.to_string(), day)).or_default().wait.record(seconds);
    }

    pub fn record_run(&mut self, queue: &str, day: i64, seconds: f64) {
        self.entries.entry((queue.to_string(), day)).or_default().run.record(seconds);
    }

    pub fn get(&self, queue: &str, day: i64) -> QueueStats {
        self.entries.get(&(queue.to_string(), day)).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecorded_bucket_is_empty() {
        let store = StatsStore::default();
        let stats = store.get("q", 0);
        assert_eq!(stats.wait.count, 0);
        assert_eq!(stats.run.count, 0);
    }

    #[test]
    fn wait_and_run_are_recorded_independently() {
        let mut store = StatsStore::default();
        store.record_wait("q", 1, 5.0);
        store.record_run("q", 1, 10.0);
        let stats = store.get("q", 1);
        assert_eq!(stats.wait.count, 1);
        assert_eq!(stats.run.count, 1);
    }
}
