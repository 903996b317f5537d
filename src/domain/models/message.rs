//! Stream message model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A stream message as seen by the processor: a JSON payload plus headers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message body
    #[serde(default)]
    pub payload: Value,

    /// Header values by name
    #[serde(default)]
    pub headers: BTreeMap<String, Value>,
}

impl Message {
    /// Message with the given payload and no headers
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            headers: BTreeMap::new(),
        }
    }

    /// Add or replace a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: Value) -> Self {
        self.headers.insert(name.into(), value);
        self
    }

    /// Look up a header by exact name
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers.get(name)
    }

    /// The root object expressions navigate: `{ "payload": .., "headers": {..} }`
    pub fn to_root(&self) -> Value {
        let headers = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<serde_json::Map<_, _>>();

        let mut root = serde_json::Map::new();
        root.insert("payload".to_string(), self.payload.clone());
        root.insert("headers".to_string(), Value::Object(headers));
        Value::Object(root)
    }
}
