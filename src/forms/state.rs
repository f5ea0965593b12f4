//! Derived form status: errors, touched/dirty tracking and submission flags

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::path::FieldPath;

/// When field writes trigger validation before the first submit attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Only validate when the form is submitted
    #[default]
    OnSubmit,
    /// Validate a field on every write
    OnChange,
    /// Validate a field when it loses focus
    OnBlur,
    /// Validate on blur, then on every write once the field was touched
    OnTouched,
    /// Validate on both writes and blur
    All,
}

/// When field writes trigger validation after the first submit attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevalidateMode {
    #[default]
    OnChange,
    OnBlur,
    OnSubmit,
}

/// Validation messages keyed by field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    /// Drop every error recorded under a top-level field, nested rows included
    pub fn clear_field(&mut self, name: &str) {
        self.0
            .retain(|path, _| FieldPath::parse(path).root_name() != Some(name));
    }

    /// Whether any error is recorded under a top-level field
    pub fn has_field(&self, name: &str) -> bool {
        self.first_under(name).is_some()
    }

    /// First error path recorded under a top-level field
    pub fn first_under(&self, name: &str) -> Option<&str> {
        self.0
            .keys()
            .find(|path| FieldPath::parse(path).root_name() == Some(name))
            .map(String::as_str)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Status of a form instance. Only the owning form mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub(crate) errors: FieldErrors,
    pub(crate) touched: BTreeSet<String>,
    pub(crate) dirty: BTreeSet<String>,
    pub(crate) is_submitting: bool,
    pub(crate) is_submitted: bool,
    pub(crate) is_submit_successful: bool,
    pub(crate) submit_count: u32,
    pub(crate) focus: Option<String>,
}

impl FormState {
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    /// No active errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Any field differs from its default
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// A submit handler is currently running
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// At least one submit attempt was made
    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    pub fn is_submit_successful(&self) -> bool {
        self.is_submit_successful
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Field that should receive focus after a failed submit
    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_field_removes_nested_rows() {
        let mut errors = FieldErrors::new();
        errors.insert("secrets[0].key", "Key is required");
        errors.insert("secrets[2].value", "Value is required");
        errors.insert("name", "Name is required");
        errors.insert("secrets_note", "unrelated");

        errors.clear_field("secrets");

        assert_eq!(errors.len(), 2);
        assert!(errors.get("name").is_some());
        assert!(errors.get("secrets_note").is_some());
        assert!(!errors.has_field("secrets"));
    }

    #[test]
    fn test_first_under() {
        let mut errors = FieldErrors::new();
        errors.insert("secrets[1].key", "b");
        errors.insert("secrets[0].value", "a");
        assert_eq!(errors.first_under("secrets"), Some("secrets[0].value"));
        assert_eq!(errors.first_under("name"), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: ValidationMode = serde_json::from_str("\"on_touched\"").unwrap();
        assert_eq!(mode, ValidationMode::OnTouched);
        assert_eq!(ValidationMode::default(), ValidationMode::OnSubmit);
        assert_eq!(RevalidateMode::default(), RevalidateMode::OnChange);
    }
}
