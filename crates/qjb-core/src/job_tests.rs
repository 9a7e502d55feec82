// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::data::JobData;

fn job(now: f64) -> Job {
    Job::new("j1", "q", JobData::empty(), 0, Vec::new(), JobState::Waiting, now)
}

#[test]
fn new_job_has_single_history_entry() {
    let j = job(10.0);
    assert_eq!(j.history.len(), 1);
    assert_eq!(j.history[0].queue, "q");
    assert_eq!(j.history[0].put, 10.0);
    assert_eq!(j.history[0].popped, None);
    assert_eq!(j.history[0].done, None);
}

#[test]
fn push_placement_appends_event_and_updates_queue() {
    let mut j = job(0.0);
    j.push_placement("q2", 5.0);
    assert_eq!(j.queue, "q2");
    assert_eq!(j.history.len(), 2);
    assert_eq!(j.history[1].queue, "q2");
    assert_eq!(j.history[1].put, 5.0);
}

#[test]
fn mark_popped_and_done_touch_last_event_only() {
    let mut j = job(0.0);
    j.push_placement("q2", 5.0);
    j.mark_popped(6.0);
    assert_eq!(j.history[0].popped, None);
    assert_eq!(j.history[1].popped, Some(6.0));
    j.mark_done(7.0);
    assert_eq!(j.history[1].done, Some(7.0));
}

#[test]
fn owned_by_requires_running_state_and_matching_worker() {
    let mut j = job(0.0);
    j.state = JobState::Running;
    j.worker = "w1".to_string();
    j.expires = 100.0;
    assert!(j.owned_by("w1"));
    assert!(!j.owned_by("w2"));
    // expiry is not consulted here — only `pop`'s reclaim stage enforces it.
    j.expires = -1.0;
    assert!(j.owned_by("w1"));
    j.state = JobState::Stalled;
    assert!(!j.owned_by("w1"));
}

#[test]
fn is_terminal_for_complete_and_failed_only() {
    let mut j = job(0.0);
    assert!(!j.is_terminal());
    j.state = JobState::Running;
    assert!(!j.is_terminal());
    j.state = JobState::Complete;
    assert!(j.is_terminal());
    j.state = JobState::Failed;
    assert!(j.is_terminal());
}

#[test]
fn job_state_display_matches_wire_names() {
    assert_eq!(JobState::Waiting.to_string(), "waiting");
    assert_eq!(JobState::Scheduled.to_string(), "scheduled");
    assert_eq!(JobState::Running.to_string(), "running");
    assert_eq!(JobState::Stalled.to_string(), "stalled");
    assert_eq!(JobState::Complete.to_string(), "complete");
    assert_eq!(JobState::Failed.to_string(), "failed");
}
