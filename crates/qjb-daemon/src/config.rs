// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup configuration: a TOML file merged with `QJB_*`
//! environment overrides, seeding the initial broker `Config` before
//! the first request is served.

use qjb_core::config::{HEARTBEAT, JOBS_HISTORY, JOBS_HISTORY_COUNT};
use qjb_core::{Config, ConfigValue};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:7878";

/// The on-disk (or env-supplied) shape; only the recognized keys are
/// typed, matching `qjb_core::config`'s documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    bind: Option<String>,
    heartbeat: Option<f64>,
    jobs_history: Option<f64>,
    jobs_history_count: Option<i64>,
}

impl FileConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var("QJB_BIND") {
            self.bind = Some(bind);
        }
        if let Some(v) = env_f64("QJB_HEARTBEAT") {
            self.heartbeat = Some(v);
        }
        if let Some(v) = env_f64("QJB_JOBS_HISTORY") {
            self.jobs_history = Some(v);
        }
        if let Some(v) = env_i64("QJB_JOBS_HISTORY_COUNT") {
            self.jobs_history_count = Some(v);
        }
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_i64(name: &str) -> Option<i64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Resolved daemon configuration: the listener address plus the
/// initial broker config mapping.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub bind: String,
    pub broker: Config,
}

impl DaemonConfig {
    /// Load `path` as TOML if it exists (a missing path is not an
    /// error — the daemon runs on defaults), then apply `QJB_*`
    /// environment overrides on top of whatever the file set.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut file = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text)?
            }
            _ => FileConfig::default(),
        };
        file.apply_env_overrides();

        let mut broker = Config::new();
        if let Some(v) = file.heartbeat {
            broker.set(HEARTBEAT, ConfigValue::Number(v));
        }
        if let Some(v) = file.jobs_history {
            broker.set(JOBS_HISTORY, ConfigValue::Number(v));
        }
        if let Some(v) = file.jobs_history_count {
            broker.set(JOBS_HISTORY_COUNT, ConfigValue::Number(v as f64));
        }

        Ok(Self { bind: file.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()), broker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = DaemonConfig::load(None).expect("load");
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.broker.heartbeat_secs(), 60.0);
    }

    #[test]
    fn file_value_is_applied_without_env_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("QJB_HEARTBEAT");
        let file = write_temp_toml("heartbeat = 30\n");
        let config = DaemonConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.broker.heartbeat_secs(), 30.0);
    }

    #[test]
    fn env_override_takes_precedence_over_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("QJB_HEARTBEAT", "45");
        let file = write_temp_toml("heartbeat = 30\n");
        let config = DaemonConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.broker.heartbeat_secs(), 45.0);
        std::env::remove_var("QJB_HEARTBEAT");
    }

    // Environment variable tests mutate process-global state; serialize them
    // so they don't race against each other within this crate's test binary.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
}
