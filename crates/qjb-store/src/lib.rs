// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! qjb-store: the key-value backend abstraction the engine composes
//! atomic operations from.
//!
//! The `Store` trait exposes the primitives §4.15 of the spec calls
//! for — per-job hashes, per-queue sorted sets, the failed/completed/
//! tracked indices, per-`(queue, day)` stats, and config — at the
//! granularity the engine actually needs them, rather than as a fully
//! generic Redis-shaped KV surface. `MemoryStore` is the sole
//! implementation: everything lives behind one guard, which is what
//! lets the engine treat "acquire it once" as the whole atomicity
//! story (see `qjb-engine`'s `Broker`).

mod completed_set;
mod failed_index;
mod queue_state;
mod stats_store;
mod tracked;

pub use queue_state::QueueState;

use completed_set::CompletedSet;
use failed_index::FailedIndex;
use qjb_core::{Config, FailedPage, Job, QueueStats, QueueSummary, TrackedJobs};
use stats_store::StatsStore;
use std::collections::HashMap;
use tracked::TrackedSet;

/// The primitives the engine composes `put`/`pop`/`heartbeat`/… from.
///
/// Every method is a plain synchronous call: the "atomic script
/// execution" the spec describes is realized by the caller (the
/// engine) holding the single lock around a `Store` for the whole
/// duration of one operation, never by anything inside this trait.
pub trait Store: Send {
    fn job(&self, id: &str) -> Option<&Job>;
    fn job_mut(&mut self, id: &str) -> Option<&mut Job>;
    fn insert_job(&mut self, job: Job);
    fn remove_job(&mut self, id: &str) -> Option<Job>;

    /// Get-or-create the named queue's structures.
    fn queue_mut(&mut self, name: &str) -> &mut QueueState;
    fn queue(&self, name: &str) -> Option<&QueueState>;
    fn queue_names(&self) -> Vec<String>;

    fn failed_mut(&mut self) -> &mut FailedIndex;
    fn failed(&self) -> &FailedIndex;

    fn completed_mut(&mut self) -> &mut CompletedSet;
    fn completed(&self) -> &CompletedSet;

    fn tracked_mut(&mut self) -> &mut TrackedSet;
    fn tracked(&self) -> &TrackedSet;

    fn stats_mut(&mut self) -> &mut StatsStore;
    fn stats(&self, queue: &str, day: i64) -> QueueStats;

    fn config(&self) -> &Config;
    fn config_mut(&mut self) -> &mut Config;
}

/// The sole `Store` implementation: everything held behind one lock
/// at the engine layer (see `qjb-engine::Broker`), in plain
/// `HashMap`/`BTreeMap` collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    jobs: HashMap<String, Job>,
    queues: HashMap<String, QueueState>,
    failed: FailedIndex,
    completed: CompletedSet,
    tracked: TrackedSet,
    stats: StatsStore,
    config: Config,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue summaries for every queue ever referenced, reconciled as
    /// of `now` without mutating anything (REDESIGN FLAGS: `queues`
    /// must stay a pure read).
    pub fn queue_summaries(&self, now: f64) -> Vec<QueueSummary> {
        let mut names: Vec<&String> = self.queues.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let state = &self.queues[name];
                let (waiting, running, scheduled, stalled) = state.counts_at(now);
                QueueSummary { name: name.clone(), waiting, running, scheduled, stalled }
            })
            .collect()
    }

    pub fn failed_page(&self, group: &str, start: usize, limit: usize) -> FailedPage {
        let (total, ids) = self.failed.page(group, start, limit);
        let jobs = ids.iter().filter_map(|id| self.jobs.get(id).cloned()).collect();
        FailedPage { total, jobs }
    }

    pub fn tracked_jobs(&self) -> TrackedJobs {
        self.tracked.snapshot()
    }
}

impl Store for MemoryStore {
    fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    fn job_mut(&mut self, id: &str) -> Option<&mut Job> {
        self.jobs.get_mut(id)
    }

    fn insert_job(&mut self, job: Job) {
        self.jobs.insert(job.id.clone(), job);
    }

    fn remove_job(&mut self, id: &str) -> Option<Job> {
        self.jobs.remove(id)
    }

    fn queue_mut(&mut self, name: &str) -> &mut QueueState {
        self.queues.entry(name.to_string()).or_default()
    }

    fn queue(&self, name: &str) -> Option<&QueueState> {
        self.queues.get(name)
    }

    fn queue_names(&self) -> Vec<String> {
        self.queues.keys().cloned().collect()
    }

    fn failed_mut(&mut self) -> &mut FailedIndex {
        &mut self.failed
    }

    fn failed(&self) -> &FailedIndex {
        &self.failed
    }

    fn completed_mut(&mut self) -> &mut CompletedSet {
        &mut self.completed
    }

    fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    fn tracked_mut(&mut self) -> &mut TrackedSet {
        &mut self.tracked
    }

    fn tracked(&self) -> &TrackedSet {
        &self.tracked
    }

    fn stats_mut(&mut self) -> &mut StatsStore {
        &mut self.stats
    }

    fn stats(&self, queue: &str, day: i64) -> QueueStats {
        self.stats.get(queue, day)
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}
