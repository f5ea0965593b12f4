//! Worker agent registration: basic info, input structure, then secrets.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{optional_str, required_str, secrets, PayloadError, WizardDefinition};
use crate::forms::{Constraint, FieldSchema, FormValues, StepDefinition, StringFormat, Transform};
use crate::transform::AuthMap;

pub const NAME: &str = "worker_agent";
pub const ENDPOINT: &str = "/worker-agents";

pub fn definition() -> WizardDefinition {
    WizardDefinition {
        name: NAME.to_string(),
        title: "Register Worker Agent".to_string(),
        description: Some("Register a worker agent and the secrets it needs".to_string()),
        endpoint: Some(ENDPOINT.to_string()),
        fields: vec![
            FieldSchema::string("name")
                .label("Agent Name")
                .required()
                .min_length(3)
                .max_length(64)
                .pattern("^[a-z0-9][a-z0-9_-]*$")
                .message(
                    Constraint::Pattern,
                    "Use lowercase letters, digits, '-' or '_'",
                )
                .transform(Transform::Trim),
            FieldSchema::string("description")
                .max_length(500)
                .transform(Transform::Trim),
            FieldSchema::string("category").required(),
            FieldSchema::string("endpoint")
                .label("Endpoint URL")
                .required()
                .format(StringFormat::Url),
            FieldSchema::string("payload")
                .label("Input Structure")
                .required()
                .format(StringFormat::Json)
                .default_value(json!("{}")),
            secrets::rows_field("secrets").default_value(json!([])),
        ],
        steps: vec![
            StepDefinition::new("basic_info", "Basic Info")
                .with_description("Name the agent and pick its category")
                .with_fields(["name", "description", "category"]),
            StepDefinition::new("structure", "Structure")
                .with_description("Where the agent runs and what input it accepts")
                .with_fields(["endpoint", "payload"]),
            StepDefinition::new("secrets", "Secrets")
                .with_description("Environment variables passed to the agent")
                .with_fields(["secrets"]),
        ],
    }
}

/// Body posted to the worker agent registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerAgentRegistration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub endpoint: String,
    pub payload: Value,
    pub secrets: AuthMap,
}

impl WorkerAgentRegistration {
    pub fn from_values(values: &FormValues) -> Result<Self, PayloadError> {
        let raw_payload = required_str(values, "payload")?;
        let payload =
            serde_json::from_str(&raw_payload).map_err(|source| PayloadError::InvalidJson {
                field: "payload".to_string(),
                source,
            })?;

        Ok(Self {
            name: required_str(values, "name")?,
            description: optional_str(values, "description"),
            category: required_str(values, "category")?,
            endpoint: required_str(values, "endpoint")?,
            payload,
            secrets: secrets::rows_map(values, "secrets")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormOptions;

    fn valid_values() -> FormValues {
        FormValues::new()
            .with("name", json!("crawler"))
            .with("category", json!("research"))
            .with("endpoint", json!("https://agents.local/crawl"))
            .with("payload", json!(r#"{"url": "string"}"#))
            .with(
                "secrets",
                json!([
                    { "key": "api_key", "value": "abc" },
                    { "key": "region", "value": "eu" }
                ]),
            )
    }

    #[test]
    fn test_schema_uppercases_secret_keys() {
        let schema = definition().schema().unwrap();
        let validated = schema.validate(&valid_values()).unwrap();
        assert_eq!(validated.get("secrets[0].key"), Some(&json!("API_KEY")));

        let registration = WorkerAgentRegistration::from_values(&validated).unwrap();
        assert_eq!(registration.secrets.get("API_KEY"), Some(&json!("abc")));
        assert_eq!(registration.payload, json!({ "url": "string" }));
        assert_eq!(registration.description, None);
    }

    #[test]
    fn test_name_pattern_message() {
        let schema = definition().schema().unwrap();
        let errors = schema
            .validate(&valid_values().with("name", json!("Crawler Bot")))
            .unwrap_err();
        assert_eq!(
            errors.get("name"),
            Some("Use lowercase letters, digits, '-' or '_'")
        );
    }

    #[test]
    fn test_secret_row_errors_are_indexed() {
        let schema = definition().schema().unwrap();
        let values = valid_values().with(
            "secrets",
            json!([{ "key": "ok", "value": "1" }, { "key": "9lives", "value": "" }]),
        );
        let errors = schema.validate(&values).unwrap_err();
        assert!(errors.get("secrets[1].key").is_some());
        assert!(errors.get("secrets[0].key").is_none());
        assert!(errors.get("secrets[1].value").is_none());
    }

    #[test]
    fn test_named_secret_without_value_is_rejected() {
        let schema = definition().schema().unwrap();
        let values = valid_values().with(
            "secrets",
            json!([{ "key": "token", "value": "" }, { "key": "", "value": "ignored" }]),
        );
        let validated = schema.validate(&values).unwrap();
        let err = WorkerAgentRegistration::from_values(&validated).unwrap_err();
        assert_eq!(err.field(), Some("secrets[0].value"));
        assert_eq!(err.to_string(), "A value is required for TOKEN");
    }

    #[test]
    fn test_invalid_payload_json() {
        let values = valid_values().with("payload", json!("{not json"));
        let err = WorkerAgentRegistration::from_values(&values).unwrap_err();
        assert_eq!(err.field(), Some("payload"));
    }

    #[test]
    fn test_defaults_seed_the_form() {
        let form = definition().build(FormOptions::default()).unwrap();
        assert_eq!(form.form().value("payload"), Some(&json!("{}")));
        assert_eq!(form.form().value("secrets"), Some(&json!([])));
    }
}
