//! Wizard definitions and the payloads built from their validated values.
//!
//! A wizard is a named schema plus an ordered step list. The built-in ones
//! back the registration and connection flows; more can be declared in
//! definition files (see [`crate::config`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::forms::{
    FieldSchema, FormError, FormOptions, FormSchema, FormValues, MultiStepForm, StepDefinition,
};

pub mod mcp_connection;
pub mod secrets;
pub mod worker_agent;

/// Errors raised while turning validated values into a request body
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Missing value for '{0}'")]
    MissingField(String),

    #[error("Field '{field}' is not valid JSON: {source}")]
    InvalidJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A cross-field rule the schema cannot express
    #[error("{message}")]
    Rule { field: String, message: String },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PayloadError {
    /// Form field the error belongs to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            PayloadError::MissingField(field)
            | PayloadError::InvalidJson { field, .. }
            | PayloadError::Rule { field, .. } => Some(field),
            PayloadError::Serialize(_) => None,
        }
    }
}

/// Named schema and step list for a multi-step form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardDefinition {
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path under the API base URL that receives the submitted payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub fields: Vec<FieldSchema>,
    pub steps: Vec<StepDefinition>,
}

impl WizardDefinition {
    pub fn schema(&self) -> Result<FormSchema, FormError> {
        FormSchema::new(self.fields.clone())
    }

    /// Instantiate a fresh multi-step form for this wizard
    pub fn build(&self, options: FormOptions) -> Result<MultiStepForm, FormError> {
        MultiStepForm::new(self.schema()?, self.steps.clone(), options)
    }

    /// Absolute URL the payload is posted to, when the wizard declares an endpoint
    pub fn request_url(&self, base_url: &str) -> Option<String> {
        self.endpoint.as_deref().map(|endpoint| join_url(base_url, endpoint))
    }

    /// Fields declared in the schema but placed on no step
    pub fn unassigned_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| !self.steps.iter().any(|s| s.fields.iter().any(|f| f == name)))
            .collect()
    }
}

/// Wizards that ship with the application
pub fn builtin() -> Vec<WizardDefinition> {
    vec![worker_agent::definition(), mcp_connection::definition()]
}

/// Request body for a wizard's validated values.
///
/// Built-in wizards get their typed payload; any other wizard submits its
/// values unchanged.
pub fn build_payload(wizard: &str, values: &FormValues) -> Result<Value, PayloadError> {
    let payload = match wizard {
        worker_agent::NAME => {
            serde_json::to_value(worker_agent::WorkerAgentRegistration::from_values(values)?)?
        }
        mcp_connection::NAME => {
            serde_json::to_value(mcp_connection::McpConnectionRequest::from_values(values)?)?
        }
        _ => values.clone().into_value(),
    };
    Ok(payload)
}

/// Join an API base URL and an endpoint path with exactly one slash between them
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

pub(crate) fn required_str(values: &FormValues, field: &str) -> Result<String, PayloadError> {
    optional_str(values, field).ok_or_else(|| PayloadError::MissingField(field.to_string()))
}

/// A string field, with blank treated as absent
pub(crate) fn optional_str(values: &FormValues, field: &str) -> Option<String> {
    values
        .get_str(field)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_build() {
        for wizard in builtin() {
            let form = wizard.build(FormOptions::default()).unwrap();
            assert_eq!(form.total_steps(), wizard.steps.len());
            assert!(wizard.unassigned_fields().is_empty(), "{}", wizard.name);
        }
    }

    #[test]
    fn test_unknown_wizard_submits_values_as_is() {
        let values = FormValues::new().with("title", json!("hello"));
        let payload = build_payload("custom", &values).unwrap();
        assert_eq!(payload, json!({ "title": "hello" }));
    }

    #[test]
    fn test_unassigned_fields() {
        let wizard = WizardDefinition {
            name: "w".to_string(),
            title: "W".to_string(),
            description: None,
            endpoint: None,
            fields: vec![FieldSchema::string("a"), FieldSchema::string("b")],
            steps: vec![StepDefinition::new("one", "One").with_fields(["a"])],
        };
        assert_eq!(wizard.unassigned_fields(), vec!["b"]);
    }

    #[test]
    fn test_request_url() {
        let wizard = worker_agent::definition();
        assert_eq!(
            wizard.request_url("http://127.0.0.1:8000/api/").as_deref(),
            Some("http://127.0.0.1:8000/api/worker-agents")
        );
        assert_eq!(join_url("/api", "mcp/connections"), "/api/mcp/connections");

        let custom = WizardDefinition {
            endpoint: None,
            ..worker_agent::definition()
        };
        assert_eq!(custom.request_url("http://localhost/api"), None);
    }

    #[test]
    fn test_payload_error_field() {
        assert_eq!(PayloadError::MissingField("name".into()).field(), Some("name"));
        let err = serde_json::from_str::<Value>("{").unwrap_err();
        assert_eq!(PayloadError::Serialize(err).field(), None);
    }
}
