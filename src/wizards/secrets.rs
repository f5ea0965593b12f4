//! Secret editor for an existing agent: a single-step form over key/value rows.
//!
//! Rows with a blank variable name are tolerated while editing and dropped
//! from the request. A named row must carry a value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PayloadError;
use crate::forms::{
    Constraint, FieldPath, FieldSchema, FormError, FormOptions, FormSchema, FormValues, SchemaForm,
    Transform,
};
use crate::transform::{
    auth_array_to_object, auth_entries_from_value, auth_object_to_array, is_auth_data_equal,
    AuthEntry, AuthMap,
};

/// Key/value rows for environment secrets
pub fn rows_field(name: &str) -> FieldSchema {
    FieldSchema::array(
        name,
        vec![
            FieldSchema::string("key")
                .label("Variable")
                .pattern("^[A-Za-z_][A-Za-z0-9_]*$")
                .message(Constraint::Pattern, "Use letters, digits and '_' only")
                .transform(Transform::Uppercase),
            FieldSchema::string("value"),
        ],
    )
}

pub fn schema() -> Result<FormSchema, FormError> {
    FormSchema::new(vec![rows_field("secrets")])
}

/// Collapse the key/value rows of `field` into the wire map, requiring a value on every named row
pub(crate) fn rows_map(values: &FormValues, field: &str) -> Result<AuthMap, PayloadError> {
    let rows = auth_entries_from_value(values.get(field));
    if let Some((index, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| !row.key.is_empty() && row.value.is_empty())
    {
        return Err(PayloadError::Rule {
            field: FieldPath::parse(field)
                .push_index(index)
                .push_property("value")
                .to_string(),
            message: format!("A value is required for {}", row.key),
        });
    }
    Ok(auth_array_to_object(&rows))
}

/// Editor seeded with an agent's current secrets, one row per key
pub fn form_for(existing: &AuthMap) -> Result<SchemaForm, FormError> {
    let defaults = FormValues::new().with("secrets", rows_value(&auth_object_to_array(existing)));
    Ok(SchemaForm::new(
        schema()?,
        FormOptions::default().with_defaults(defaults),
    ))
}

/// Rows currently in the editor
pub fn rows(values: &FormValues) -> Vec<AuthEntry> {
    auth_entries_from_value(values.get("secrets"))
}

/// Whether the edited rows differ from what the agent already has
pub fn has_changes(existing: &AuthMap, values: &FormValues) -> bool {
    !is_auth_data_equal(&auth_object_to_array(existing), &rows(values))
}

fn rows_value(rows: &[AuthEntry]) -> Value {
    serde_json::to_value(rows).unwrap_or_else(|_| Value::Array(Vec::new()))
}

/// Body sent when replacing an agent's secrets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretsUpdate {
    pub secrets: AuthMap,
}

impl SecretsUpdate {
    pub fn from_values(values: &FormValues) -> Result<Self, PayloadError> {
        Ok(Self {
            secrets: rows_map(values, "secrets")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::SubmitAttempt;
    use serde_json::json;

    fn existing() -> AuthMap {
        let mut map = AuthMap::new();
        map.insert("API_KEY".to_string(), json!("abc"));
        map.insert("REGION".to_string(), json!("eu"));
        map
    }

    #[test]
    fn test_form_is_seeded_in_order() {
        let form = form_for(&existing()).unwrap();
        assert_eq!(
            form.value("secrets"),
            Some(&json!([
                { "key": "API_KEY", "value": "abc" },
                { "key": "REGION", "value": "eu" }
            ]))
        );
        assert!(!has_changes(&existing(), form.values()));
    }

    #[test]
    fn test_reordering_is_not_a_change() {
        let values = FormValues::new().with(
            "secrets",
            json!([
                { "key": "REGION", "value": "eu" },
                { "key": "API_KEY", "value": "abc" }
            ]),
        );
        assert!(!has_changes(&existing(), &values));

        let values = values.with("secrets[0].value", json!("us"));
        assert!(has_changes(&existing(), &values));
    }

    #[test]
    fn test_submit_builds_update() {
        let mut form = form_for(&existing()).unwrap();
        form.set_value("secrets[1].key", json!("zone"));

        let SubmitAttempt::Ready(values) = form.begin_submit() else {
            panic!("expected valid secrets");
        };
        let update = SecretsUpdate::from_values(&values).unwrap();
        assert_eq!(update.secrets.get("ZONE"), Some(&json!("eu")));
        assert!(!update.secrets.contains_key("REGION"));
    }

    #[test]
    fn test_blank_key_row_is_dropped_on_submit() {
        let mut seeded = AuthMap::new();
        seeded.insert("API_KEY".to_string(), json!("x"));
        let mut form = form_for(&seeded).unwrap();
        form.set_value("secrets[1]", json!({ "key": "", "value": "y" }));
        form.set_value("secrets[2]", json!({ "key": "", "value": "" }));

        let SubmitAttempt::Ready(values) = form.begin_submit() else {
            panic!("blank rows must not block submit: {:?}", form.errors());
        };
        let update = SecretsUpdate::from_values(&values).unwrap();
        assert_eq!(Value::Object(update.secrets), json!({ "API_KEY": "x" }));
    }

    #[test]
    fn test_named_row_needs_a_value() {
        let values = FormValues::new().with(
            "secrets",
            json!([
                { "key": "API_KEY", "value": "x" },
                { "key": "TOKEN", "value": "" }
            ]),
        );
        let err = SecretsUpdate::from_values(&values).unwrap_err();
        assert_eq!(err.field(), Some("secrets[1].value"));
        assert_eq!(err.to_string(), "A value is required for TOKEN");
    }

    #[test]
    fn test_key_pattern_applies_only_when_present() {
        let schema = schema().unwrap();
        let values = FormValues::new().with(
            "secrets",
            json!([{ "key": "", "value": "y" }, { "key": "1bad", "value": "z" }]),
        );
        let errors = schema.validate(&values).unwrap_err();
        assert!(errors.get("secrets[0].key").is_none());
        assert_eq!(
            errors.get("secrets[1].key"),
            Some("Use letters, digits and '_' only")
        );
    }
}
