// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identity and state machine.

use crate::data::JobData;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Waiting,
    Scheduled,
    Running,
    Stalled,
    Complete,
    Failed,
}

crate::simple_display! {
    JobState {
        Waiting => "waiting",
        Scheduled => "scheduled",
        Running => "running",
        Stalled => "stalled",
        Complete => "complete",
        Failed => "failed",
    }
}

/// One entry in a job's queue-placement history.
///
/// A job gains a new `HistoryEvent` every time it is put into a
/// queue (including re-queues on completion and moves). `popped`
/// and `done` are filled in on the *last* event as the job
/// progresses through that placement's lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub queue: String,
    pub put: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popped: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<f64>,
}

impl HistoryEvent {
    pub fn put_at(queue: impl Into<String>, now: f64) -> Self {
        Self {
            queue: queue.into(),
            put: now,
            popped: None,
            done: None,
        }
    }
}

/// Failure metadata, present only while `state == Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub group: String,
    pub message: String,
    pub when: f64,
    pub worker: String,
}

/// A job record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub data: JobData,
    pub priority: i64,
    pub tags: Vec<String>,
    pub state: JobState,
    /// Name of the queue currently holding the job, empty when terminal.
    pub queue: String,
    /// Current leaseholder, empty unless `state == Running`.
    pub worker: String,
    /// Lease expiry; meaningful only while `state == Running`.
    pub expires: f64,
    pub history: Vec<HistoryEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl Job {
    /// Create a brand-new job record for `put` on an id that does not
    /// yet exist.
    pub fn new(
        id: impl Into<String>,
        queue: impl Into<String>,
        data: JobData,
        priority: i64,
        tags: Vec<String>,
        state: JobState,
        now: f64,
    ) -> Self {
        let queue = queue.into();
        Self {
            id: id.into(),
            data,
            priority,
            tags,
            state,
            queue: queue.clone(),
            worker: String::new(),
            expires: 0.0,
            history: vec![HistoryEvent::put_at(queue, now)],
            failure: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Complete | JobState::Failed)
    }

    /// Whether `worker` is the current leaseholder.
    ///
    /// This is the *recorded* ownership check used by `heartbeat`,
    /// `complete`, and `fail`: it does not compare against `now`.
    /// Expiry is only ever enforced lazily, by `pop`'s stalled-reclaim
    /// stage — a still-`running` job's original owner may keep acting
    /// on it right up until some `pop` call actually steals it.
    pub fn owned_by(&self, worker: &str) -> bool {
        self.state == JobState::Running && self.worker == worker
    }

    /// Append a fresh history entry for a new queue placement,
    /// as done by `put`/`move` and by `complete` with a next-queue.
    pub fn push_placement(&mut self, queue: impl Into<String>, now: f64) {
        self.queue = queue.into();
        self.history.push(HistoryEvent::put_at(self.queue.clone(), now));
    }

    /// Mark the current (last) history entry as popped.
    pub fn mark_popped(&mut self, now: f64) {
        if let Some(event) = self.history.last_mut() {
            event.popped = Some(now);
        }
    }

    /// Mark the current (last) history entry as done.
    pub fn mark_done(&mut self, now: f64) {
        if let Some(event) = self.history.last_mut() {
            event.done = Some(now);
        }
    }

    /// The `put` timestamp of the most recent placement, used as the
    /// wait-duration baseline at `pop`.
    pub fn last_put_time(&self) -> f64 {
        self.history.last().map(|e| e.put).unwrap_or(0.0)
    }

    /// The `popped` timestamp of the most recent placement, used as
    /// the run-duration baseline at `complete`.
    pub fn last_popped_time(&self) -> Option<f64> {
        self.history.last().and_then(|e| e.popped)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
