// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide tunables for the broker.
//!
//! Recognized keys have typed accessors with defaults; arbitrary
//! other keys are accepted by `getconfig`/`setconfig` but are not
//! interpreted by the engine.

use std::collections::HashMap;

pub const HEARTBEAT: &str = "heartbeat";
pub const JOBS_HISTORY: &str = "jobs-history";
pub const JOBS_HISTORY_COUNT: &str = "jobs-history-count";

pub const DEFAULT_HEARTBEAT_SECS: f64 = 60.0;
pub const DEFAULT_JOBS_HISTORY_SECS: f64 = 604_800.0;
pub const DEFAULT_JOBS_HISTORY_COUNT: i64 = 50_000;

/// A single config value: either a string or a number, mirroring
/// what callers pass over the wire (JSON-scalar shaped).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Text(s) => s.parse().ok(),
        }
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n as f64)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

/// The broker's open config mapping.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: ConfigValue) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    pub fn as_map(&self) -> &HashMap<String, ConfigValue> {
        &self.values
    }

    pub fn heartbeat_secs(&self) -> f64 {
        self.get(HEARTBEAT)
            .and_then(ConfigValue::as_f64)
            .unwrap_or(DEFAULT_HEARTBEAT_SECS)
    }

    /// `None` means retention-by-age is disabled (negative value).
    pub fn jobs_history_secs(&self) -> Option<f64> {
        let secs = self
            .get(JOBS_HISTORY)
            .and_then(ConfigValue::as_f64)
            .unwrap_or(DEFAULT_JOBS_HISTORY_SECS);
        if secs < 0.0 {
            None
        } else {
            Some(secs)
        }
    }

    pub fn jobs_history_count(&self) -> i64 {
        self.get(JOBS_HISTORY_COUNT)
            .and_then(ConfigValue::as_f64)
            .map(|n| n as i64)
            .unwrap_or(DEFAULT_JOBS_HISTORY_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::new();
        assert_eq!(config.heartbeat_secs(), DEFAULT_HEARTBEAT_SECS);
        assert_eq!(config.jobs_history_secs(), Some(DEFAULT_JOBS_HISTORY_SECS));
        assert_eq!(config.jobs_history_count(), DEFAULT_JOBS_HISTORY_COUNT);
    }

    #[test]
    fn negative_history_disables_age_retention() {
        let mut config = Config::new();
        config.set(JOBS_HISTORY, ConfigValue::Number(-1.0));
        assert_eq!(config.jobs_history_secs(), None);
    }

    #[test]
    fn set_and_remove_round_trip() {
        let mut config = Config::new();
        config.set("testing", ConfigValue::from("foo"));
        assert_eq!(config.get("testing"), Some(&ConfigValue::from("foo")));
        config.remove("testing");
        assert_eq!(config.get("testing"), None);
    }
}
