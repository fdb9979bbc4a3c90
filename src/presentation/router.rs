// Route table for the builder API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    close_builder, delete_dashboard, drag_end, drag_start, edit_field, get_builder,
    health_check, list_dashboards, load_layout, move_widget, open_builder, palette,
    remove_widget, replace_config, save_layout, select_widget,
};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/palette", get(palette))
        .route("/datasets/:dataset_id/builders", post(open_builder))
        .route("/datasets/:dataset_id/dashboards", get(list_dashboards))
        .route("/dashboards/:dashboard_id", delete(delete_dashboard))
        .route("/builders/:session_id", get(get_builder).delete(close_builder))
        .route("/builders/:session_id/drag/start", post(drag_start))
        .route("/builders/:session_id/drag/end", post(drag_end))
        .route("/builders/:session_id/select", post(select_widget))
        .route("/builders/:session_id/save", post(save_layout))
        .route("/builders/:session_id/load/:dashboard_id", post(load_layout))
        .route("/builders/:session_id/widgets/:widget_id", delete(remove_widget))
        .route("/builders/:session_id/widgets/:widget_id/config", put(replace_config))
        .route("/builders/:session_id/widgets/:widget_id/fields", patch(edit_field))
        .route("/builders/:session_id/widgets/:widget_id/move", post(move_widget))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
