//! Transient selection state shared across pages.
//!
//! Holds what the user picked in one surface (a drawer, a modal) so another
//! surface can read it. Nothing here outlives the application; owners call
//! [`SelectionStore::reset`] when the surface that filled it closes.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Agent picked from a list or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSelection {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected_agent: Option<AgentSelection>,
    new_category_name: String,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_agent(&self) -> Option<&AgentSelection> {
        self.selected_agent.as_ref()
    }

    pub fn select_agent(&mut self, agent: AgentSelection) {
        debug!(agent = %agent.name, "Agent selected");
        self.selected_agent = Some(agent);
    }

    pub fn clear_agent(&mut self) {
        self.selected_agent = None;
    }

    /// Category name being typed in the "new category" input
    pub fn new_category_name(&self) -> &str {
        &self.new_category_name
    }

    pub fn set_new_category_name(&mut self, name: impl Into<String>) {
        self.new_category_name = name.into();
    }

    /// Typed category name, trimmed, if there is one
    pub fn pending_category(&self) -> Option<&str> {
        let trimmed = self.new_category_name.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_agent.is_none() && self.new_category_name.is_empty()
    }

    /// Forget everything; called when the owning surface closes
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
