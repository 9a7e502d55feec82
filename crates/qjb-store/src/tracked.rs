// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opt-in observation set. `expired` records ids that were tracked at
//! the moment they were cancelled or reaped by retention, so tracking
//! survives the job record's deletion.

use indexmap::IndexSet;
use qjb_core::TrackedJobs;

#[derive(Debug, Default)]
pub struct TrackedSet {
    jobs: IndexSet<String>,
    expired: IndexSet<String>,
}

impl TrackedSet {
    pub fn track(&mut self, id: &str) {
        self.jobs.insert(id.to_string());
    }

    pub fn untrack(&mut self, id: &str) {
        self.jobs.shift_remove(id);
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.jobs.contains(id)
    }

    /// Move `id` out of the live set and into `expired`, if it was tracked.
    pub fn expire(&mut self, id: &str) {
        if self.jobs.shift_remove(id) {
            self.expired.insert(id.to_string());
        }
    }

    pub fn snapshot(&self) -> TrackedJobs {
        TrackedJobs {
            jobs: self.jobs.iter().cloned().collect(),
            expired: self.expired.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expire_moves_id_from_jobs_to_expired() {
        let mut set = TrackedSet::default();
        set.track("a");
        set.expire("a");
        let snap = set.snapshot();
        assert!(snap.jobs.is_empty());
        assert_eq!(snap.expired, vec!["a".to_string()]);
    }

    #[test]
    fn expire_is_a_no_op_for_untracked_ids() {
        let mut set = TrackedSet::default();
        set.expire("a");
        assert!(set.snapshot().expired.is_empty());
    }
}
