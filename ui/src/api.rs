//! API client for the Spark backend

use gloo_net::http::{Request, Response};
use serde::{Deserialize, Serialize};
use spark::transform::AuthMap;
use spark::wizards::join_url;
use spark::wizards::mcp_connection::{self, McpConnectionRequest};
use spark::wizards::secrets::SecretsUpdate;
use spark::wizards::worker_agent::{self, WorkerAgentRegistration};
use std::fmt;

/// Same variable the `spark` binary reads, fixed at build time for the browser bundle
const API_BASE: &str = match option_env!("SPARK_API_BASE_URL") {
    Some(base) => base,
    None => "/api",
};

/// Failed backend call. Conflicts may name the form field they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub field: Option<String>,
}

impl ApiError {
    fn transport(message: String) -> Self {
        Self {
            status: 0,
            message,
            field: None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.status)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    field: Option<String>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}

/// Agent as returned by the registry
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredAgent {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct McpConnection {
    pub id: String,
    pub name: String,
}

/// Register a worker agent
pub async fn register_worker_agent(
    registration: &WorkerAgentRegistration,
) -> Result<RegisteredAgent, ApiError> {
    let url = join_url(API_BASE, worker_agent::ENDPOINT);
    post_json(&url, registration).await
}

/// Existing agent categories, for the category picker
pub async fn list_categories() -> Result<Vec<String>, ApiError> {
    let url = join_url(API_BASE, &format!("{}/categories", worker_agent::ENDPOINT));
    fetch_json(&url).await
}

/// Current secrets of an agent
pub async fn get_agent_secrets(agent: &str) -> Result<AuthMap, ApiError> {
    let url = join_url(API_BASE, &format!("secrets/{}", urlencoding::encode(agent)));
    fetch_json(&url).await
}

/// Replace all secrets of an agent
pub async fn update_agent_secrets(agent: &str, update: &SecretsUpdate) -> Result<(), ApiError> {
    let url = join_url(API_BASE, &format!("secrets/{}", urlencoding::encode(agent)));
    let response = Request::put(&url)
        .json(update)
        .map_err(|e| ApiError::transport(format!("Failed to serialize body: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("Request failed: {}", e)))?;
    check_status(response).await.map(|_| ())
}

/// Create an MCP server connection
pub async fn create_mcp_connection(request: &McpConnectionRequest) -> Result<McpConnection, ApiError> {
    let url = join_url(API_BASE, mcp_connection::ENDPOINT);
    post_json(&url, request).await
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("Request failed: {}", e)))?;

    parse_json(check_status(response).await?).await
}

async fn post_json<T: Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, ApiError> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| ApiError::transport(format!("Failed to serialize body: {}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("Request failed: {}", e)))?;

    parse_json(check_status(response).await?).await
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    response.json().await.map_err(|e| ApiError {
        status,
        message: format!("Failed to parse response: {}", e),
        field: None,
    })
}

/// Turn a non-2xx response into an [`ApiError`], keeping `{field, message}` when present
async fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.json::<ErrorBody>().await.ok();
    let (field, message) = match body {
        Some(body) => (body.field, body.message),
        None => (None, None),
    };
    log::warn!("API call failed with status {}", status);
    Err(ApiError {
        status,
        message: message.unwrap_or_else(|| format!("Request failed with status {}", status)),
        field,
    })
}
