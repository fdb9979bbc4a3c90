// Dashboard repository backed by the analytics backend's REST API
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::{DashboardDraft, StoredDashboard};
use crate::infrastructure::config::{endpoint_url, ApiSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDashboardRepository {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    fn dashboards_url(&self, id: i64) -> String {
        endpoint_url(&self.base_url, &format!("dashboards/{}", id))
    }

    async fn ensure_success(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{} failed with status {}: {}", action, status, body);
    }
}

#[async_trait]
impl DashboardRepository for HttpDashboardRepository {
    async fn list_dashboards(&self, dataset_id: i64) -> Result<Vec<StoredDashboard>> {
        let url = self.dashboards_url(dataset_id);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to dashboard backend")?;

        Self::ensure_success(response, "Listing dashboards")
            .await?
            .json::<Vec<StoredDashboard>>()
            .await
            .context("Failed to parse dashboard list")
    }

    async fn save_dashboard(
        &self,
        dataset_id: i64,
        draft: &DashboardDraft,
    ) -> Result<Option<StoredDashboard>> {
        let url = self.dashboards_url(dataset_id);
        tracing::debug!("POST {} name={}", url, draft.name);

        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .context("Failed to send request to dashboard backend")?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!("dataset {} missing on backend, dashboard not saved", dataset_id);
            return Ok(None);
        }

        let stored = Self::ensure_success(response, "Saving dashboard")
            .await?
            .json::<StoredDashboard>()
            .await
            .context("Failed to parse saved dashboard")?;
        Ok(Some(stored))
    }

    async fn delete_dashboard(&self, dashboard_id: i64) -> Result<bool> {
        let url = self.dashboards_url(dashboard_id);
        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send request to dashboard backend")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::ensure_success(response, "Deleting dashboard").await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::post, Json, Router};
    use serde_json::{json, Value};

    /// Serve a fake backend on a random port: dataset 1 exists, every other
    /// dataset is missing.
    async fn fake_backend() -> HttpDashboardRepository {
        async fn save(
            Path(dataset_id): Path<i64>,
            Json(draft): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            if dataset_id != 1 {
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "detail": "Parent dataset node missing" })),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": 7,
                    "name": draft["name"],
                    "dataset_id": dataset_id,
                    "layout_config": draft["layout_config"],
                    "created_at": "2025-03-01T12:30:45"
                })),
            )
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/api/dashboards/:dataset_id", post(save));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpDashboardRepository::new(&ApiSettings {
            base_url: format!("http://{}/api", addr),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_reports_missing_dataset() {
        let repository = fake_backend().await;
        let draft = DashboardDraft::new("Ops".to_string(), "[]".to_string());

        let stored = repository.save_dashboard(1, &draft).await.unwrap().unwrap();
        assert_eq!(stored.id, 7);
        assert_eq!(stored.name, "Ops");

        assert!(repository.save_dashboard(2, &draft).await.unwrap().is_none());
    }

    #[test]
    fn test_dashboards_url() {
        let repository = HttpDashboardRepository::new(&ApiSettings {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();

        assert_eq!(
            repository.dashboards_url(12),
            "http://localhost:8000/api/dashboards/12"
        );
    }

    #[test]
    fn test_draft_body_shape() {
        let draft = DashboardDraft::new("Ops".to_string(), "[]".to_string());
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({ "name": "Ops", "layout_config": "[]" })
        );
    }
}
