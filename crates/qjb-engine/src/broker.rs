// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The atomic operation envelope (§4.1): every public method here
//! acquires the `Store` lock exactly once, performs all its reads and
//! writes against the guarded state, and releases it before
//! returning. That single critical section is the Rust analogue of
//! "one server-side script invocation" — see `§4.1`/`§5` of the
//! design notes for the correctness argument this preserves.

use crate::results::{CompleteOutcome, ConfigQuery};
use parking_lot::Mutex;
use qjb_core::stats::day_bucket;
use qjb_core::{
    BrokerError, BrokerResult, Config, ConfigValue, ExpiryScore, FailedPage, Job, JobData,
    JobState, PopScore, QueueStats, QueueSummary, TrackedJobs,
};
use qjb_store::{MemoryStore, Store};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The broker: one guarded `MemoryStore` plus the fourteen operations
/// of §6's interface table. Not generic over `Store` — there is one
/// implementation, and the atomicity argument (§5) depends on every
/// operation locking the same concrete state once.
pub struct Broker {
    state: Mutex<MemoryStore>,
}

impl Broker {
    pub fn new() -> Self {
        Self { state: Mutex::new(MemoryStore::new()) }
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self { state: Mutex::new(store) }
    }

    /// §4.2. Create-or-move a job into `queue`.
    #[allow(clippy::too_many_arguments)]
    pub fn put(
        &self,
        queue: &str,
        id: &str,
        data: Value,
        now: f64,
        priority: i64,
        tags: Vec<String>,
        delay: f64,
    ) -> BrokerResult<String> {
        let data = JobData::parse(data)?;
        let mut state = self.state.lock();

        state.failed_mut().remove(id);
        state.completed_mut().remove(id);

        let existing_queue = state.job(id).map(|job| job.queue.clone());
        if let Some(old_queue) = existing_queue.as_deref() {
            if !old_queue.is_empty() {
                state.queue_mut(old_queue).remove_anywhere(id);
            }
        }

        let new_state = if delay > 0.0 { JobState::Scheduled } else { JobState::Waiting };
        let sequence = state.queue_mut(queue).next_sequence();
        let pop_score = PopScore::new(priority, sequence);

        if let Some(job) = state.job_mut(id) {
            job.data = data;
            job.priority = priority;
            job.tags = tags;
            job.worker = String::new();
            job.expires = 0.0;
            job.failure = None;
            job.state = new_state;
            job.push_placement(queue, now);
        } else {
            let job = Job::new(id, queue, data, priority, tags, new_state, now);
            state.insert_job(job);
        }

        match new_state {
            JobState::Scheduled => state.queue_mut(queue).insert_scheduled(id, now + delay, pop_score),
            _ => state.queue_mut(queue).insert_waiting(id, pop_score),
        }

        debug!(queue, id, ?new_state, "put");
        Ok(id.to_string())
    }

    /// §4.3. Non-mutating preview of what `pop` would dispense.
    pub fn peek(&self, queue: &str, count: usize, _now: f64) -> Vec<Job> {
        let state = self.state.lock();
        let Some(q) = state.queue(queue) else { return Vec::new() };
        q.peek_dispense_order(count).iter().filter_map(|id| state.job(id).cloned()).collect()
    }

    /// §4.4. The three-stage pipeline: reclaim stalled leases, promote
    /// due scheduled jobs, then dispense up to `count` jobs to `worker`.
    pub fn pop(&self, queue: &str, worker: &str, count: usize, now: f64, expires: f64) -> Vec<Job> {
        let mut state = self.state.lock();

        // Stage 1: reclaim stalled leases.
        let expired = state.queue_mut(queue).drain_expired_running(now);
        for id in &expired {
            if let Some(job) = state.job_mut(id) {
                job.state = JobState::Stalled;
            }
            let priority = state.job(id).map(|job| job.priority).unwrap_or(0);
            let sequence = state.queue_mut(queue).next_sequence();
            state.queue_mut(queue).insert_stalled(id, PopScore::new(priority, sequence));
        }
        if !expired.is_empty() {
            trace!(queue, count = expired.len(), "reclaimed stalled leases");
        }

        // Stage 2: promote due scheduled jobs, at their original pop score.
        let due = state.queue_mut(queue).drain_due_scheduled(now);
        for (id, score) in &due {
            if let Some(job) = state.job_mut(id) {
                job.state = JobState::Waiting;
            }
            state.queue_mut(queue).insert_waiting(id, *score);
        }
        if !due.is_empty() {
            trace!(queue, count = due.len(), "promoted scheduled jobs");
        }

        // Stage 3: dispense. Stalled is preferred over waiting regardless
        // of priority (see §9 Open Question — resolved).
        let mut dispensed = state.queue_mut(queue).drain_stalled_min(count);
        if dispensed.len() < count {
            let remaining = count - dispensed.len();
            dispensed.extend(state.queue_mut(queue).drain_waiting_min(remaining));
        }

        let day = day_bucket(now);
        let mut jobs = Vec::with_capacity(dispensed.len());
        for id in &dispensed {
            let wait_seconds = state.job(id).map(|job| now - job.last_put_time()).unwrap_or(0.0);
            if let Some(job) = state.job_mut(id) {
                job.state = JobState::Running;
                job.worker = worker.to_string();
                job.expires = expires;
                job.mark_popped(now);
            }
            state.queue_mut(queue).insert_running(id, ExpiryScore::new(expires));
            state.stats_mut().record_wait(queue, day, wait_seconds.max(0.0));
            if let Some(job) = state.job(id) {
                jobs.push(job.clone());
            }
        }
        debug!(queue, worker, dispensed = jobs.len(), "pop");
        jobs
    }

    /// §4.5. `Ok(None)` on any precondition rejection.
    pub fn heartbeat(
        &self,
        id: &str,
        worker: &str,
        now: f64,
        data: Option<Value>,
    ) -> BrokerResult<Option<f64>> {
        let data = data.map(JobData::parse).transpose()?;
        let mut state = self.state.lock();

        let owned = state.job(id).map(|job| job.owned_by(worker)).unwrap_or(false);
        if !owned {
            return Ok(None);
        }

        let new_expires = now + state.config().heartbeat_secs();
        let queue = state.job(id).map(|job| job.queue.clone()).unwrap_or_default();

        if let Some(job) = state.job_mut(id) {
            job.expires = new_expires;
            if let Some(data) = data {
                job.data = data;
            }
        }
        state.queue_mut(&queue).remove_running(id);
        state.queue_mut(&queue).insert_running(id, ExpiryScore::new(new_expires));
        Ok(Some(new_expires))
    }

    /// §4.6. `Ok(None)` on rejection; enforces retention afterward.
    #[allow(clippy::too_many_arguments)]
    pub fn complete(
        &self,
        id: &str,
        worker: &str,
        queue: &str,
        now: f64,
        next: Option<&str>,
        delay: f64,
        data: Option<Value>,
    ) -> BrokerResult<Option<CompleteOutcome>> {
        let data = data.map(JobData::parse).transpose()?;
        let mut state = self.state.lock();

        let eligible = state
            .job(id)
            .map(|job| job.owned_by(worker) && job.queue == queue)
            .unwrap_or(false);
        if !eligible {
            return Ok(None);
        }

        let popped_at = state.job(id).and_then(|job| job.last_popped_time());
        let run_seconds = popped_at.map(|popped| now - popped).unwrap_or(0.0);
        let day = day_bucket(now);
        state.stats_mut().record_run(queue, day, run_seconds.max(0.0));
        state.queue_mut(queue).remove_running(id);

        if let Some(job) = state.job_mut(id) {
            job.mark_done(now);
            if let Some(data) = data {
                job.data = data;
            }
        }

        let outcome = match next {
            None => {
                if let Some(job) = state.job_mut(id) {
                    job.state = JobState::Complete;
                    job.worker = String::new();
                    job.queue = String::new();
                }
                state.completed_mut().insert(id, now);
                CompleteOutcome::Complete
            }
            Some(next_queue) => {
                let next_state = if delay > 0.0 { JobState::Scheduled } else { JobState::Waiting };
                let sequence = state.queue_mut(next_queue).next_sequence();
                let priority = state.job(id).map(|job| job.priority).unwrap_or(0);
                let pop_score = PopScore::new(priority, sequence);
                if let Some(job) = state.job_mut(id) {
                    job.worker = String::new();
                    job.state = next_state;
                    job.push_placement(next_queue, now);
                }
                match next_state {
                    JobState::Scheduled => {
                        state.queue_mut(next_queue).insert_scheduled(id, now + delay, pop_score)
                    }
                    _ => state.queue_mut(next_queue).insert_waiting(id, pop_score),
                }
                match next_state {
                    JobState::Scheduled => CompleteOutcome::Scheduled,
                    _ => CompleteOutcome::Waiting,
                }
            }
        };

        self.enforce_retention(&mut state, now);
        debug!(queue, id, outcome = outcome.as_str(), "complete");
        Ok(Some(outcome))
    }

    /// §4.6 retention: while `completed` exceeds `jobs-history-count`, or
    /// its oldest entry exceeds `jobs-history` seconds of age, evict the
    /// oldest completed record. Runs inside the same lock as `complete`.
    fn enforce_retention(&self, state: &mut MemoryStore, now: f64) {
        let count_limit = state.config().jobs_history_count();
        let age_limit = state.config().jobs_history_secs();

        loop {
            let over_count = state.completed().len() as i64 > count_limit;
            let over_age = match age_limit {
                Some(limit) => state.completed().oldest_when().map(|when| now - when > limit).unwrap_or(false),
                None => !state.completed().is_empty(),
            };
            if !over_count && !over_age {
                break;
            }
            let Some(id) = state.completed_mut().pop_oldest() else { break };
            state.failed_mut().remove(&id);
            state.remove_job(&id);
            state.tracked_mut().expire(&id);
            trace!(id, "retention reaped completed job");
        }
    }

    /// §4.7. `Ok(None)` on rejection.
    pub fn fail(
        &self,
        id: &str,
        worker: &str,
        group: &str,
        message: &str,
        now: f64,
        data: Option<Value>,
    ) -> BrokerResult<Option<String>> {
        let data = data.map(JobData::parse).transpose()?;
        let mut state = self.state.lock();

        let owned = state.job(id).map(|job| job.owned_by(worker)).unwrap_or(false);
        if !owned {
            return Ok(None);
        }

        let queue = state.job(id).map(|job| job.queue.clone()).unwrap_or_default();
        state.queue_mut(&queue).remove_running(id);
        if let Some(job) = state.job_mut(id) {
            job.state = JobState::Failed;
            job.failure = Some(qjb_core::Failure {
                group: group.to_string(),
                message: message.to_string(),
                when: now,
                worker: worker.to_string(),
            });
            job.worker = String::new();
            if let Some(data) = data {
                job.data = data;
            }
        }
        state.failed_mut().insert(group, id);
        debug!(queue, id, group, "fail");
        Ok(Some(group.to_string()))
    }

    /// §4.8. A no-op for a nonexistent id.
    pub fn cancel(&self, id: &str) {
        let mut state = self.state.lock();
        let Some(job) = state.remove_job(id) else { return };
        if !job.queue.is_empty() {
            state.queue_mut(&job.queue).remove_anywhere(id);
        }
        state.failed_mut().remove(id);
        state.tracked_mut().expire(id);
    }

    pub fn get(&self, id: &str) -> Option<Job> {
        self.state.lock().job(id).cloned()
    }

    /// §4.14. `None` means the mapping as a whole.
    pub fn getconfig(&self, name: Option<&str>) -> Option<ConfigQuery> {
        let state = self.state.lock();
        match name {
            Some(name) => state.config().get(name).cloned().map(ConfigQuery::Value),
            None => Some(ConfigQuery::All(state.config().as_map().clone())),
        }
    }

    /// §4.14. `None` value deletes `name`.
    pub fn setconfig(&self, name: &str, value: Option<ConfigValue>) {
        let mut state = self.state.lock();
        match value {
            Some(value) => state.config_mut().set(name.to_string(), value),
            None => state.config_mut().remove(name),
        }
    }

    /// §4.11. Always an array (see §9 Open Question — resolved).
    pub fn queues(&self, now: f64) -> Vec<QueueSummary> {
        self.state.lock().queue_summaries(now)
    }

    pub fn failed_counts(&self) -> HashMap<String, usize> {
        self.state.lock().failed().group_counts()
    }

    /// §4.13. Rejects negative `start`/`limit`.
    pub fn failed_page(&self, group: &str, start: i64, limit: i64) -> BrokerResult<FailedPage> {
        if start < 0 || limit < 0 {
            return Err(BrokerError::InvalidRange);
        }
        Ok(self.state.lock().failed_page(group, start as usize, limit as usize))
    }

    /// §4.10. `date` is any timestamp within the desired day; the engine
    /// derives the day-bucket from it.
    pub fn stats(&self, queue: &str, date: f64) -> QueueStats {
        self.state.lock().stats(queue, day_bucket(date))
    }

    pub fn track(&self, id: &str) {
        self.state.lock().tracked_mut().track(id);
    }

    pub fn untrack(&self, id: &str) {
        self.state.lock().tracked_mut().untrack(id);
    }

    pub fn tracked(&self) -> TrackedJobs {
        self.state.lock().tracked_jobs()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}
