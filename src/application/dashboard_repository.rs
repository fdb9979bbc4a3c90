// Repository trait for stored dashboard layouts
use crate::domain::dashboard::{DashboardDraft, StoredDashboard};
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// All dashboards saved for a dataset
    async fn list_dashboards(&self, dataset_id: i64) -> anyhow::Result<Vec<StoredDashboard>>;

    /// Persist a new dashboard and return the stored record; `Ok(None)` when
    /// the dataset does not exist
    async fn save_dashboard(
        &self,
        dataset_id: i64,
        draft: &DashboardDraft,
    ) -> anyhow::Result<Option<StoredDashboard>>;

    /// Delete a dashboard; `Ok(false)` when it does not exist
    async fn delete_dashboard(&self, dashboard_id: i64) -> anyhow::Result<bool>;
}
