// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Global retention set: completed job ids scored by completion time,
//! oldest first, so retention (`§4.6`) can cheaply find and evict the
//! oldest entries.

use qjb_core::{from_ordered_bits, ordered_bits};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct When(u64, u64);

#[derive(Debug, Default)]
pub struct CompletedSet {
    by_time: BTreeMap<When, String>,
    pos: HashMap<String, When>,
    ties: u64,
}

impl CompletedSet {
    pub fn insert(&mut self, id: &str, when: f64) {
        let key = When(ordered_bits(when), self.ties);
        self.ties = self.ties.wrapping_add(1);
        self.by_time.insert(key, id.to_string());
        self.pos.insert(id.to_string(), key);
    }

    pub fn remove(&mut self, id: &str) {
        if let Some(key) = self.pos.remove(id) {
            self.by_time.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.by_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.is_empty()
    }

    /// The completion time of the oldest surviving entry.
    pub fn oldest_when(&self) -> Option<f64> {
        self.by_time.keys().next().map(|k| from_ordered_bits(k.0))
    }

    /// Remove and return the oldest entry's id.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (&key, _) = self.by_time.iter().next()?;
        let id = self.by_time.remove(&key)?;
        self.pos.remove(&id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_oldest_respects_insertion_time() {
        let mut set = CompletedSet::default();
        set.insert("b", 20.0);
        set.insert("a", 10.0);
        assert_eq!(set.oldest_when(), Some(10.0));
        assert_eq!(set.pop_oldest(), Some("a".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn negative_completion_time_still_sorts_oldest_first() {
        let mut set = CompletedSet::default();
        set.insert("b", 5.0);
        set.insert("a", -5.0);
        assert_eq!(set.oldest_when(), Some(-5.0));
        assert_eq!(set.pop_oldest(), Some("a".to_string()));
    }
}
