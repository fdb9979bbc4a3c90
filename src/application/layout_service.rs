// Layout service - Use cases for saving, listing, loading and deleting dashboards
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::{DashboardDraft, StoredDashboard};
use crate::domain::layout::{self, Layout, LayoutError};
use crate::domain::widget::Widget;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutServiceError {
    #[error("dashboard name must not be empty")]
    EmptyName,

    #[error("dashboard {0} not found")]
    DashboardNotFound(i64),

    #[error("dataset {0} not found")]
    DatasetNotFound(i64),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("dashboard backend request failed: {0:#}")]
    Backend(anyhow::Error),
}

#[derive(Clone)]
pub struct LayoutService {
    repository: Arc<dyn DashboardRepository>,
}

impl LayoutService {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        Self { repository }
    }

    pub async fn save_layout(
        &self,
        dataset_id: i64,
        name: &str,
        widgets: &[Widget],
    ) -> Result<StoredDashboard, LayoutServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LayoutServiceError::EmptyName);
        }

        let draft = DashboardDraft::new(name.to_string(), layout::encode(widgets)?);
        let stored = self
            .repository
            .save_dashboard(dataset_id, &draft)
            .await
            .map_err(LayoutServiceError::Backend)?
            .ok_or(LayoutServiceError::DatasetNotFound(dataset_id))?;

        tracing::info!(
            "saved dashboard {} ({} widgets) for dataset {}",
            stored.id,
            widgets.len(),
            dataset_id
        );
        Ok(stored)
    }

    /// Dashboards of a dataset, newest first.
    pub async fn list_dashboards(
        &self,
        dataset_id: i64,
    ) -> Result<Vec<StoredDashboard>, LayoutServiceError> {
        let mut dashboards = self
            .repository
            .list_dashboards(dataset_id)
            .await
            .map_err(LayoutServiceError::Backend)?;

        dashboards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(dashboards)
    }

    pub async fn load_layout(
        &self,
        dataset_id: i64,
        dashboard_id: i64,
    ) -> Result<Layout, LayoutServiceError> {
        let dashboard = self
            .list_dashboards(dataset_id)
            .await?
            .into_iter()
            .find(|d| d.id == dashboard_id)
            .ok_or(LayoutServiceError::DashboardNotFound(dashboard_id))?;

        let layout = dashboard.layout().inspect_err(|e| {
            tracing::warn!("stored layout of dashboard {} is unreadable: {}", dashboard_id, e);
        })?;

        tracing::info!(
            "loaded dashboard {} with {} widgets",
            dashboard_id,
            layout.widgets().len()
        );
        Ok(layout)
    }

    pub async fn delete_dashboard(&self, dashboard_id: i64) -> Result<(), LayoutServiceError> {
        let deleted = self
            .repository
            .delete_dashboard(dashboard_id)
            .await
            .map_err(LayoutServiceError::Backend)?;

        if deleted {
            tracing::info!("deleted dashboard {}", dashboard_id);
            Ok(())
        } else {
            Err(LayoutServiceError::DashboardNotFound(dashboard_id))
        }
    }
}
