// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grouping of failed job ids by failure group, newest-first.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FailedIndex {
    // group -> ids, index 0 is newest
    groups: HashMap<String, Vec<String>>,
}

impl FailedIndex {
    pub fn insert(&mut self, group: &str, id: &str) {
        self.groups.entry(group.to_string()).or_default().insert(0, id.to_string());
    }

    /// Remove `id` from whichever group (if any) currently holds it.
    pub fn remove(&mut self, id: &str) {
        self.groups.retain(|_, ids| {
            ids.retain(|existing| existing != id);
            !ids.is_empty()
        });
    }

    pub fn group_counts(&self) -> HashMap<String, usize> {
        self.groups.iter().map(|(group, ids)| (group.clone(), ids.len())).collect()
    }

    /// `(total, page)` where `page` holds up to `limit` ids starting at
    /// `start`, newest-first.
    pub fn page(&self, group: &str, start: usize, limit: usize) -> (usize, Vec<String>) {
        let Some(ids) = self.groups.get(group) else {
            return (0, Vec::new());
        };
        let total = ids.len();
        let page = ids.iter().skip(start).take(limit).cloned().collect();
        (total, page)
    }
}
