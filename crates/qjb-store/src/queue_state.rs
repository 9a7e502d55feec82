// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-queue storage: the four job-id structures (waiting, scheduled,
//! running, stalled) plus the arrival counter that breaks ties.
//!
//! Each structure pairs a `BTreeMap` keyed by score (for ordered
//! drain/range queries) with a reverse `id -> key` index, so removing
//! a job by id never requires a linear scan.

use qjb_core::{ordered_bits, ExpiryScore, PopScore, SequenceCounter};
use std::collections::BTreeMap;

/// Tie-break key for structures that are not already uniquely keyed
/// by `(priority, sequence)`: `scheduled` (keyed by due time) and
/// `running` (keyed by expiry). Ties are broken by a per-queue
/// arrival counter, giving every entry a distinct total order without
/// prescribing any particular meaning to the tie order. The first
/// field is always an `ordered_bits` encoding, never a raw
/// `f64::to_bits`, so a boundary built from `now` compares correctly
/// against entries with negative due times or expiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TieKey(u64, u64);

fn due_key(due: f64, tie: u64) -> TieKey {
    TieKey(ordered_bits(due), tie)
}

#[derive(Debug, Default)]
pub struct QueueState {
    pub waiting: BTreeMap<PopScore, String>,
    waiting_pos: std::collections::HashMap<String, PopScore>,

    scheduled: BTreeMap<TieKey, String>,
    scheduled_pos: std::collections::HashMap<String, TieKey>,
    /// The `PopScore` a scheduled job was assigned at `put` time, reused
    /// verbatim when it is promoted into `waiting`.
    scheduled_pop_score: std::collections::HashMap<String, PopScore>,

    running: BTreeMap<TieKey, String>,
    running_pos: std::collections::HashMap<String, TieKey>,

    pub stalled: BTreeMap<PopScore, String>,
    stalled_pos: std::collections::HashMap<String, PopScore>,

    sequence: SequenceCounter,
    ties: u64,
}

impl QueueState {
    fn next_tie(&mut self) -> u64 {
        let tie = self.ties;
        self.ties = self.ties.wrapping_add(1);
        tie
    }

    pub fn next_sequence(&mut self) -> u64 {
        self.sequence.next()
    }

    pub fn insert_waiting(&mut self, id: &str, score: PopScore) {
        self.waiting.insert(score, id.to_string());
        self.waiting_pos.insert(id.to_string(), score);
    }

    pub fn remove_waiting(&mut self, id: &str) -> bool {
        if let Some(score) = self.waiting_pos.remove(id) {
            self.waiting.remove(&score);
            true
        } else {
            false
        }
    }

    pub fn insert_scheduled(&mut self, id: &str, due: f64, pop_score: PopScore) {
        let key = due_key(due, self.next_tie());
        self.scheduled.insert(key, id.to_string());
        self.scheduled_pos.insert(id.to_string(), key);
        self.scheduled_pop_score.insert(id.to_string(), pop_score);
    }

    pub fn remove_scheduled(&mut self, id: &str) -> bool {
        if let Some(key) = self.scheduled_pos.remove(id) {
            self.scheduled.remove(&key);
            self.scheduled_pop_score.remove(id);
            true
        } else {
            false
        }
    }

    pub fn insert_running(&mut self, id: &str, expires: ExpiryScore) {
        let key = TieKey(expires.bits(), self.next_tie());
        self.running.insert(key, id.to_string());
        self.running_pos.insert(id.to_string(), key);
    }

    pub fn remove_running(&mut self, id: &str) -> bool {
        if let Some(key) = self.running_pos.remove(id) {
            self.running.remove(&key);
            true
        } else {
            false
        }
    }

    pub fn insert_stalled(&mut self, id: &str, score: PopScore) {
        self.stalled.insert(score, id.to_string());
        self.stalled_pos.insert(id.to_string(), score);
    }

    pub fn remove_stalled(&mut self, id: &str) -> bool {
        if let Some(score) = self.stalled_pos.remove(id) {
            self.stalled.remove(&score);
            true
        } else {
            false
        }
    }

    /// Remove every `running` entry whose expiry is `<= now`, returning
    /// the ids in expiry order. Callers re-insert each into `stalled`.
    pub fn drain_expired_running(&mut self, now: f64) -> Vec<String> {
        let boundary = TieKey(ordered_bits(now), u64::MAX);
        let expired: Vec<(TieKey, String)> = self
            .running
            .range(..=boundary)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        for (key, id) in &expired {
            self.running.remove(key);
            self.running_pos.remove(id);
        }
        expired.into_iter().map(|(_, id)| id).collect()
    }

    /// Remove every `scheduled` entry whose due time is `<= now`,
    /// returning `(id, original PopScore)` pairs in due-time order.
    /// Callers re-insert each into `waiting` with its original score.
    pub fn drain_due_scheduled(&mut self, now: f64) -> Vec<(String, PopScore)> {
        let boundary = TieKey(ordered_bits(now), u64::MAX);
        let due: Vec<(TieKey, String)> =
            self.scheduled.range(..=boundary).map(|(k, v)| (*k, v.clone())).collect();
        let mut out = Vec::with_capacity(due.len());
        for (key, id) in due {
            self.scheduled.remove(&key);
            self.scheduled_pos.remove(&id);
            let score = self.scheduled_pop_score.remove(&id).unwrap_or(PopScore::new(0, 0));
            out.push((id, score));
        }
        out
    }

    /// Remove up to `count` lowest-scoring ids from `stalled`.
    pub fn drain_stalled_min(&mut self, count: usize) -> Vec<String> {
        let ids: Vec<(PopScore, String)> =
            self.stalled.iter().take(count).map(|(k, v)| (*k, v.clone())).collect();
        for (score, _) in &ids {
            self.stalled.remove(score);
        }
        ids.into_iter()
            .map(|(score, id)| {
                self.stalled_pos.remove(&id);
                let _ = score;
                id
            })
            .collect()
    }

    /// Remove up to `count` lowest-scoring ids from `waiting`.
    pub fn drain_waiting_min(&mut self, count: usize) -> Vec<String> {
        let ids: Vec<(PopScore, String)> =
            self.waiting.iter().take(count).map(|(k, v)| (*k, v.clone())).collect();
        for (score, id) in &ids {
            self.waiting.remove(score);
            self.waiting_pos.remove(id);
        }
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Peek the lowest-scoring ids from `stalled` then `waiting`, without
    /// mutating either structure. Used by `peek`, which never promotes.
    pub fn peek_dispense_order(&self, count: usize) -> Vec<String> {
        let mut out: Vec<String> = self.stalled.values().take(count).cloned().collect();
        if out.len() < count {
            let remaining = count - out.len();
            out.extend(self.waiting.values().take(remaining).cloned());
        }
        out
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    pub fn stalled_len(&self) -> usize {
        self.stalled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
            && self.scheduled.is_empty()
            && self.running.is_empty()
            && self.stalled.is_empty()
    }

    /// Reconciled counts as of `now`, without mutating the structures
    /// (see REDESIGN FLAGS: `queues` must be a pure read).
    pub fn counts_at(&self, now: f64) -> (usize, usize, usize, usize) {
        let boundary = TieKey(ordered_bits(now), u64::MAX);
        let newly_stalled = self.running.range(..=boundary).count();
        let newly_waiting = self.scheduled.range(..=boundary).count();
        let waiting = self.waiting.len() + newly_waiting;
        let running = self.running.len() - newly_stalled;
        let scheduled = self.scheduled.len() - newly_waiting;
        let stalled = self.stalled.len() + newly_stalled;
        (waiting, running, scheduled, stalled)
    }

    /// Remove `id` from whichever of the four structures currently
    /// holds it. Used by `put` (on an existing job) and `cancel`.
    pub fn remove_anywhere(&mut self, id: &str) {
        self.remove_waiting(id);
        self.remove_scheduled(id);
        self.remove_running(id);
        self.remove_stalled(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_drains_in_score_order() {
        let mut q = QueueState::default();
        q.insert_waiting("b", PopScore::new(0, 1));
        q.insert_waiting("a", PopScore::new(0, 0));
        q.insert_waiting("c", PopScore::new(-1, 2));
        assert_eq!(q.drain_waiting_min(10), vec!["c", "a", "b"]);
    }

    #[test]
    fn scheduled_promotion_preserves_original_pop_score() {
        let mut q = QueueState::default();
        q.insert_scheduled("x", 10.0, PopScore::new(5, 0));
        let due = q.drain_due_scheduled(11.0);
        assert_eq!(due, vec![("x".to_string(), PopScore::new(5, 0))]);
        assert!(q.scheduled.is_empty());
    }

    #[test]
    fn remove_anywhere_clears_all_structures() {
        let mut q = QueueState::default();
        q.insert_waiting("a", PopScore::new(0, 0));
        q.remove_anywhere("a");
        assert_eq!(q.waiting_len(), 0);
    }

    #[test]
    fn stalled_preferred_over_waiting_in_peek_order() {
        let mut q = QueueState::default();
        q.insert_waiting("w", PopScore::new(-100, 0));
        q.insert_stalled("s", PopScore::new(100, 0));
        assert_eq!(q.peek_dispense_order(2), vec!["s", "w"]);
    }

    #[test]
    fn drain_expired_running_reclaims_a_negative_expiry_lease() {
        let mut q = QueueState::default();
        q.insert_running("j1", ExpiryScore::new(-10.0));
        assert_eq!(q.drain_expired_running(0.0), vec!["j1".to_string()]);
        assert_eq!(q.running_len(), 0);
    }

    #[test]
    fn counts_at_classifies_negative_expiry_lease_as_stalled() {
        let mut q = QueueState::default();
        q.insert_running("j1", ExpiryScore::new(-10.0));
        let (waiting, running, scheduled, stalled) = q.counts_at(0.0);
        assert_eq!((waiting, running, scheduled, stalled), (0, 0, 0, 1));
    }
}
