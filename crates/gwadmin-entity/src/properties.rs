//! Free-form property bag attached to tenants, users and groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extension properties stored as a JSON object.
///
/// Known attributes are regular columns on the owning entity; anything
/// else lands in `additional_properties` and is never accessed reflectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    /// Arbitrary key/value pairs.
    #[serde(flatten)]
    pub additional_properties: BTreeMap<String, Value>,
}

impl Properties {
    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.additional_properties.get(key)
    }

    /// Insert or replace a property, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.additional_properties.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.additional_properties.is_empty()
    }
}
