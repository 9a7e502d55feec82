// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opaque job payloads.
//!
//! `data` is never interpreted by the broker beyond the `put`-time
//! requirement that its top level is a key-value mapping. It is
//! carried through `put`/`move`/`heartbeat`/`complete`/`fail` as an
//! untouched blob.

use crate::error::BrokerError;
use serde_json::{Map, Value};

/// A validated job payload: a JSON object at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobData(Map<String, Value>);

impl JobData {
    /// Validate and wrap a JSON value as job data.
    ///
    /// Fails unless `value` is a JSON object at the top level.
    pub fn parse(value: Value) -> Result<Self, BrokerError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(BrokerError::DataNotAnObject),
        }
    }

    pub fn empty() -> Self {
        Self(Map::new())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<JobData> for Value {
    fn from(data: JobData) -> Self {
        data.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_top_level_object() {
        assert!(JobData::parse(json!({"a": 1})).is_ok());
    }

    #[test]
    fn rejects_non_object_top_level() {
        assert_eq!(JobData::parse(json!([1, 2])), Err(BrokerError::DataNotAnObject));
        assert_eq!(JobData::parse(json!("hi")), Err(BrokerError::DataNotAnObject));
        assert_eq!(JobData::parse(json!(1)), Err(BrokerError::DataNotAnObject));
        assert_eq!(JobData::parse(Value::Null), Err(BrokerError::DataNotAnObject));
    }

    #[test]
    fn empty_object_round_trips() {
        let data = JobData::parse(json!({})).expect("empty object is valid");
        assert_eq!(data.into_value(), json!({}));
    }
}
