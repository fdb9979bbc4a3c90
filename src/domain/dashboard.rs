// Dashboard domain model - stored dashboard records as kept by the backend
use super::layout::{Layout, LayoutError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDashboard {
    pub id: i64,
    pub name: String,
    pub dataset_id: i64,
    /// JSON-encoded widget list.
    pub layout_config: String,
    pub created_at: NaiveDateTime,
}

impl StoredDashboard {
    pub fn layout(&self) -> Result<Layout, LayoutError> {
        Layout::decode(&self.layout_config)
    }
}

/// Body sent to the backend when saving a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardDraft {
    pub name: String,
    pub layout_config: String,
}

impl DashboardDraft {
    pub fn new(name: String, layout_config: String) -> Self {
        Self {
            name,
            layout_config,
        }
    }
}
