//! The values object shared by every field of a form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path::FieldPath;

/// Field name to current value. Keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(Map<String, Value>);

impl FormValues {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value; anything but an object yields `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Read the value at a path ("name", "secrets[0].key")
    pub fn get(&self, path: &str) -> Option<&Value> {
        FieldPath::parse(path).get(&self.0)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Write the value at a path, creating intermediate containers
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        FieldPath::parse(path).set(&mut self.0, value)
    }

    /// Builder-style `set` for seeding defaults
    pub fn with(mut self, path: &str, value: Value) -> Self {
        self.set(path, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of these values, key by key
    pub fn merge(&mut self, other: &FormValues) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for FormValues {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(FormValues::from_value(json!({ "name": "a" })).is_some());
        assert!(FormValues::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_nested_set_and_get() {
        let values = FormValues::new()
            .with("name", json!("crawler"))
            .with("secrets[0].key", json!("API_KEY"));

        assert_eq!(values.get_str("name"), Some("crawler"));
        assert_eq!(values.get_str("secrets[0].key"), Some("API_KEY"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_merge_keeps_insertion_order() {
        let mut values = FormValues::new().with("b", json!(1)).with("a", json!(2));
        values.merge(&FormValues::new().with("c", json!(3)).with("b", json!(4)));

        let keys: Vec<&String> = values.as_map().keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(values.get("b"), Some(&json!(4)));
    }
}
