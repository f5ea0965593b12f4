//! MCP server connection wizard: server details, then authentication.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{optional_str, required_str, secrets, PayloadError, WizardDefinition};
use crate::forms::{Constraint, FieldSchema, FormValues, StepDefinition, StringFormat, Transform};
use crate::transform::{filter_falsy_values, AuthMap};

pub const NAME: &str = "mcp_connection";
pub const ENDPOINT: &str = "/mcp/connections";

pub const TRANSPORTS: [&str; 2] = ["streamable_http", "sse"];
pub const AUTH_TYPES: [&str; 3] = ["none", "api_key", "oauth"];

pub fn definition() -> WizardDefinition {
    WizardDefinition {
        name: NAME.to_string(),
        title: "Connect MCP Server".to_string(),
        description: Some("Register a remote MCP server and how to authenticate".to_string()),
        endpoint: Some(ENDPOINT.to_string()),
        fields: vec![
            FieldSchema::string("name")
                .label("Connection Name")
                .required()
                .max_length(64)
                .pattern("^[a-z0-9][a-z0-9_-]*$")
                .message(
                    Constraint::Pattern,
                    "Use lowercase letters, digits, '-' or '_'",
                )
                .transform(Transform::Trim),
            FieldSchema::string("url")
                .label("Server URL")
                .required()
                .format(StringFormat::Url),
            FieldSchema::string("transport")
                .required()
                .one_of(TRANSPORTS)
                .default_value(json!("streamable_http")),
            FieldSchema::string("auth_type")
                .label("Authentication")
                .required()
                .one_of(AUTH_TYPES)
                .default_value(json!("none")),
            FieldSchema::string("api_key").label("API Key"),
            FieldSchema::string("client_id").label("Client ID"),
            FieldSchema::string("client_secret"),
            FieldSchema::array(
                "headers",
                vec![
                    FieldSchema::string("key").label("Header"),
                    FieldSchema::string("value"),
                ],
            )
            .default_value(json!([])),
            FieldSchema::boolean("enabled")
                .label("Enable immediately")
                .default_value(json!(true)),
        ],
        steps: vec![
            StepDefinition::new("server", "Server")
                .with_description("Where the MCP server lives")
                .with_fields(["name", "url", "transport"]),
            StepDefinition::new("auth", "Authentication")
                .with_description("Credentials and extra request headers")
                .with_fields([
                    "auth_type",
                    "api_key",
                    "client_id",
                    "client_secret",
                    "headers",
                    "enabled",
                ]),
        ],
    }
}

/// Body posted when creating an MCP connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpConnectionRequest {
    pub name: String,
    pub url: String,
    pub transport: String,
    pub auth_type: String,
    /// Only the credentials that were actually filled in
    pub credentials: Map<String, Value>,
    pub headers: AuthMap,
    pub enabled: bool,
}

impl McpConnectionRequest {
    pub fn from_values(values: &FormValues) -> Result<Self, PayloadError> {
        let auth_type = optional_str(values, "auth_type").unwrap_or_else(|| "none".to_string());
        match auth_type.as_str() {
            "api_key" => require_credential(values, "api_key", "An API key is required")?,
            "oauth" => {
                require_credential(values, "client_id", "A client ID is required for OAuth")?;
                require_credential(
                    values,
                    "client_secret",
                    "A client secret is required for OAuth",
                )?;
            }
            _ => {}
        }

        let mut credentials = Map::new();
        if auth_type != "none" {
            for key in ["api_key", "client_id", "client_secret"] {
                if let Some(value) = values.get(key) {
                    credentials.insert(key.to_string(), value.clone());
                }
            }
        }

        Ok(Self {
            name: required_str(values, "name")?,
            url: required_str(values, "url")?,
            transport: required_str(values, "transport")?,
            credentials: filter_falsy_values(&credentials),
            auth_type,
            headers: secrets::rows_map(values, "headers")?,
            enabled: values
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        })
    }
}

fn require_credential(values: &FormValues, field: &str, message: &str) -> Result<(), PayloadError> {
    match optional_str(values, field) {
        Some(_) => Ok(()),
        None => Err(PayloadError::Rule {
            field: field.to_string(),
            message: message.to_string(),
        }),
    }
}
