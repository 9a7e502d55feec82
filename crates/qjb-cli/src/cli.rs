// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `qjb`: one subcommand per operation of §6's interface table.
//!
//! This is the client-side convenience layer the core spec calls out
//! of scope for correctness (§1), but it is the ambient operator
//! surface every binary in this lineage ships (§4.17).

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "qjb", version, about = "Job queue broker CLI client")]
pub struct Cli {
    /// Daemon address: `host:port` or `unix:<path>`.
    #[arg(long, env = "QJB_BIND", default_value = "127.0.0.1:7878", global = true)]
    pub bind: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or move a job into a queue.
    Put {
        #[arg(long)]
        queue: String,
        #[arg(long)]
        id: String,
        /// JSON object payload.
        #[arg(long, default_value = "{}")]
        data: String,
        #[arg(long)]
        now: f64,
        #[arg(long, default_value_t = 0)]
        priority: i64,
        /// Comma-separated tags.
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value_t = 0.0)]
        delay: f64,
    },
    /// Preview what `pop` would dispense, without transitioning jobs.
    Peek {
        #[arg(long)]
        queue: String,
        #[arg(long)]
        count: usize,
        #[arg(long)]
        now: f64,
    },
    /// Dispense up to `count` jobs to `worker`.
    Pop {
        #[arg(long)]
        queue: String,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        count: usize,
        #[arg(long)]
        now: f64,
        #[arg(long)]
        expires: f64,
    },
    /// Renew a lease.
    Heartbeat {
        #[arg(long)]
        id: String,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        now: f64,
        #[arg(long)]
        data: Option<String>,
    },
    /// Mark a job done, optionally re-queuing it.
    Complete {
        #[arg(long)]
        id: String,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        queue: String,
        #[arg(long)]
        now: f64,
        #[arg(long)]
        next: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        delay: f64,
        #[arg(long)]
        data: Option<String>,
    },
    /// Mark a job failed.
    Fail {
        #[arg(long)]
        id: String,
        #[arg(long)]
        worker: String,
        #[arg(long)]
        group: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        now: f64,
        #[arg(long)]
        data: Option<String>,
    },
    /// Delete a job outright.
    Cancel {
        #[arg(long)]
        id: String,
    },
    /// Fetch a job's current record.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Read or write the broker's config mapping.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Summarize every queue ever referenced.
    Queues {
        #[arg(long)]
        now: f64,
    },
    /// List failed jobs, or count them by group.
    Failed {
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value_t = 0)]
        start: i64,
        #[arg(long, default_value_t = 25)]
        limit: i64,
    },
    /// Fetch wait/run timing distributions for a queue's day-bucket.
    Stats {
        #[arg(long)]
        queue: String,
        #[arg(long)]
        date: f64,
    },
    /// Opt a job id into observation.
    Track {
        #[arg(long)]
        id: String,
    },
    /// Opt a job id out of observation.
    Untrack {
        #[arg(long)]
        id: String,
    },
    /// List tracked and expired-tracked job ids.
    Tracked,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Get a single value, or the whole mapping when `--name` is omitted.
    Get {
        #[arg(long)]
        name: Option<String>,
    },
    /// Set a value, or delete `--name` when `--value` is omitted.
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_requires_queue_and_id() {
        let err = Cli::try_parse_from(["qjb", "put", "--now", "0"]).expect_err("missing --queue/--id");
        let message = err.to_string();
        assert!(message.contains("queue") || message.contains("required"));
    }

    #[test]
    fn put_parses_with_required_fields() {
        let cli = Cli::try_parse_from(["qjb", "put", "--queue", "q", "--id", "j1", "--now", "0"])
            .expect("should parse");
        assert!(matches!(cli.command, Command::Put { .. }));
    }

    #[test]
    fn bind_defaults_when_omitted() {
        let cli = Cli::try_parse_from(["qjb", "cancel", "--id", "j1"]).expect("should parse");
        assert_eq!(cli.bind, "127.0.0.1:7878");
    }
}
