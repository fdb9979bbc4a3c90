// API errors and their HTTP mapping
use crate::application::layout_service::LayoutServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("builder session {0} not found")]
    SessionNotFound(Uuid),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Layout(#[from] LayoutServiceError),

    #[error("failed to encode response")]
    Encoding(StatusCode),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Layout(LayoutServiceError::DashboardNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Layout(LayoutServiceError::DatasetNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Layout(LayoutServiceError::EmptyName) => StatusCode::BAD_REQUEST,
            ApiError::Layout(LayoutServiceError::Layout(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Layout(LayoutServiceError::Backend(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Encoding(status) => *status,
        }
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Encoding(status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
