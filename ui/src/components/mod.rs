pub mod agent_secrets;
pub mod forms;
pub mod mcp_connect;
pub mod notice;
pub mod register_agent;
