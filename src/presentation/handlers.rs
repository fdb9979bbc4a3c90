// HTTP request handlers
use crate::application::arrangement::{ArrangementEngine, MoveDirection};
use crate::application::canvas::{self, TileAction};
use crate::application::inspector::Inspector;
use crate::domain::palette::PALETTE;
use crate::domain::widget::{ConfigField, WidgetConfig};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::sessions::BuilderSession;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct OpenBuilderRequest {
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DragStartRequest {
    pub active_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DragEndRequest {
    pub active_id: String,
    #[serde(default)]
    pub over_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub field: ConfigField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
struct Deleted {
    ok: bool,
}

async fn respond<T: Serialize>(
    headers: &HeaderMap,
    status: StatusCode,
    data: &T,
) -> Result<Response, ApiError> {
    Ok(json_response(status, data, accepts_brotli(headers)).await?)
}

/// Apply `f` to an open session and answer with its fresh snapshot.
async fn mutate_session(
    state: &AppState,
    session_id: Uuid,
    headers: &HeaderMap,
    f: impl FnOnce(&mut BuilderSession),
) -> Result<Response, ApiError> {
    let snapshot = state
        .sessions
        .with_session(session_id, |session| {
            f(session);
            session.snapshot(session_id)
        })
        .ok_or(ApiError::SessionNotFound(session_id))?;

    respond(headers, StatusCode::OK, &snapshot).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The widget catalog a builder can drag from
pub async fn palette(headers: HeaderMap) -> Result<Response, ApiError> {
    respond(&headers, StatusCode::OK, &PALETTE).await
}

/// Open a builder session for a dataset. An empty body opens it without columns.
pub async fn open_builder(
    Path(dataset_id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        OpenBuilderRequest::default()
    } else {
        serde_json::from_slice::<OpenBuilderRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid builder request: {}", e)))?
    };
    let session = BuilderSession::new(dataset_id, request.columns, ArrangementEngine::new());

    let session_id = state.sessions.open(session);
    let snapshot = state
        .sessions
        .with_session(session_id, |s| s.snapshot(session_id))
        .ok_or(ApiError::SessionNotFound(session_id))?;
    respond(&headers, StatusCode::CREATED, &snapshot).await
}

pub async fn get_builder(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |_| ()).await
}

pub async fn close_builder(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    if !state.sessions.close(session_id) {
        return Err(ApiError::SessionNotFound(session_id));
    }
    respond(&headers, StatusCode::OK, &Deleted { ok: true }).await
}

pub async fn drag_start(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DragStartRequest>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        session.engine.on_drag_start(&request.active_id);
    })
    .await
}

pub async fn drag_end(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DragEndRequest>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        session
            .engine
            .on_drag_end(&request.active_id, request.over_id.as_deref());
    })
    .await
}

pub async fn select_widget(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        canvas::dispatch(&mut session.engine, &request.id, TileAction::Click);
    })
    .await
}

pub async fn remove_widget(
    Path((session_id, widget_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        canvas::dispatch(&mut session.engine, &widget_id, TileAction::Remove);
    })
    .await
}

/// Replace a widget's whole config; the body is decoded against the widget's type
pub async fn replace_config(
    Path((session_id, widget_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(config): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    let snapshot = state
        .sessions
        .with_session(session_id, |session| {
            if let Some(kind) = session.engine.widget(&widget_id).map(|w| w.kind) {
                let config = WidgetConfig::from_value(kind, config).map_err(|e| {
                    ApiError::BadRequest(format!("invalid config for {}: {}", kind, e))
                })?;
                session.engine.on_config_change(&widget_id, config);
            }
            Ok::<_, ApiError>(session.snapshot(session_id))
        })
        .ok_or(ApiError::SessionNotFound(session_id))??;

    respond(&headers, StatusCode::OK, &snapshot).await
}

/// Inspector edit of a single field; `field` is a config key such as `xColumn`
pub async fn edit_field(
    Path((session_id, widget_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<FieldEditRequest>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        Inspector::new(&session.columns).apply_edit(
            &mut session.engine,
            &widget_id,
            request.field,
            request.value,
        );
    })
    .await
}

pub async fn move_widget(
    Path((session_id, widget_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Result<Response, ApiError> {
    mutate_session(&state, session_id, &headers, |session| {
        session.engine.move_widget(&widget_id, request.direction);
    })
    .await
}

/// Persist the session's layout to the backend
pub async fn save_layout(
    Path(session_id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<Response, ApiError> {
    let (dataset_id, widgets) = state
        .sessions
        .with_session(session_id, |s| (s.dataset_id, s.engine.widgets().to_vec()))
        .ok_or(ApiError::SessionNotFound(session_id))?;

    let stored = state
        .layout_service
        .save_layout(dataset_id, &request.name, &widgets)
        .await?;
    respond(&headers, StatusCode::CREATED, &stored).await
}

/// Replace the session's layout with a stored dashboard
pub async fn load_layout(
    Path((session_id, dashboard_id)): Path<(Uuid, i64)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let dataset_id = state
        .sessions
        .with_session(session_id, |s| s.dataset_id)
        .ok_or(ApiError::SessionNotFound(session_id))?;

    let layout = state
        .layout_service
        .load_layout(dataset_id, dashboard_id)
        .await?;
    mutate_session(&state, session_id, &headers, |session| session.engine.load(layout)).await
}

pub async fn list_dashboards(
    Path(dataset_id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let dashboards = state.layout_service.list_dashboards(dataset_id).await?;
    respond(&headers, StatusCode::OK, &dashboards).await
}

pub async fn delete_dashboard(
    Path(dashboard_id): Path<i64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    state.layout_service.delete_dashboard(dashboard_id).await?;
    respond(&headers, StatusCode::OK, &Deleted { ok: true }).await
}
