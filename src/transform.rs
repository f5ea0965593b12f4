//! Small value transforms shared by step content and submit orchestration.
//!
//! Credentials are edited as an ordered list of key/value rows (duplicates
//! and blank keys are allowed while typing) and sent to the backend as a map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One editable credential row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl AuthEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Wire representation of credentials: key to value
pub type AuthMap = Map<String, Value>;

/// Collapse rows into a map. Rows with an empty key are dropped; a later
/// duplicate key overwrites an earlier one.
pub fn auth_array_to_object(entries: &[AuthEntry]) -> AuthMap {
    let mut map = AuthMap::new();
    for entry in entries.iter().filter(|e| !e.key.is_empty()) {
        map.insert(entry.key.clone(), Value::String(entry.value.clone()));
    }
    map
}

/// Expand a map into rows, in the map's insertion order
pub fn auth_object_to_array(map: &AuthMap) -> Vec<AuthEntry> {
    map.iter()
        .map(|(key, value)| AuthEntry {
            key: key.clone(),
            value: match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            },
        })
        .collect()
}

/// Two row lists are equal when their maps have the same keys and values
pub fn is_auth_data_equal(a: &[AuthEntry], b: &[AuthEntry]) -> bool {
    let a = auth_array_to_object(a);
    let b = auth_array_to_object(b);
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Read credential rows out of a form value (an array of `{key, value}` objects)
pub fn auth_entries_from_value(value: Option<&Value>) -> Vec<AuthEntry> {
    value
        .and_then(|v| serde_json::from_value::<Vec<AuthEntry>>(v.clone()).ok())
        .unwrap_or_default()
}

/// Whether a value counts as "set": false, 0, NaN, "" and null do not
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keep only entries whose value is truthy
pub fn filter_falsy_values(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(_, v)| is_truthy(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Turn a snake_case or space separated key into a Title Case label
pub fn generate_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch == ' ' {
            word_start = true;
            label.push(ch);
        } else if word_start {
            label.extend(ch.to_uppercase());
            word_start = false;
        } else {
            label.push(ch);
        }
    }
    label
}
