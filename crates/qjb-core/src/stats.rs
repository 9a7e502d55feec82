// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(queue, day) timing distributions.
//!
//! Each distribution tracks a running count/sum/sum-of-squares plus a
//! fixed 150-bucket, one-second-wide histogram. Buckets beyond the
//! last one clamp into it rather than growing the histogram.

use serde::{Deserialize, Serialize};

/// Number of one-second histogram buckets kept per distribution.
pub const HISTOGRAM_BUCKETS: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: u64,
    sum: f64,
    sumsq: f64,
    pub histogram: Vec<u64>,
}

impl Default for Distribution {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sumsq: 0.0,
            histogram: vec![0; HISTOGRAM_BUCKETS],
        }
    }
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a duration sample in seconds.
    pub fn record(&mut self, seconds: f64) {
        let seconds = seconds.max(0.0);
        self.count += 1;
        self.sum += seconds;
        self.sumsq += seconds * seconds;
        let bucket = (seconds.floor() as usize).min(HISTOGRAM_BUCKETS - 1);
        self.histogram[bucket] += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Sample standard deviation; undefined (None) for fewer than two samples.
    pub fn std_dev(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        let variance = (self.sumsq - self.sum * self.sum / n) / (n - 1.0);
        Some(variance.max(0.0).sqrt())
    }
}

/// The pair of distributions kept per (queue, day).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub wait: Distribution,
    pub run: Distribution,
}

/// Compute the day-bucket index for a given `now`.
pub fn day_bucket(now: f64) -> i64 {
    (now / 86_400.0).floor() as i64
}
