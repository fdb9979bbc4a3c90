// Application state for HTTP handlers
use crate::application::layout_service::LayoutService;
use crate::presentation::sessions::SessionRegistry;
use std::time::Duration;

pub struct AppState {
    pub sessions: SessionRegistry,
    pub layout_service: LayoutService,
}

impl AppState {
    pub fn new(layout_service: LayoutService, session_idle: Duration) -> Self {
        Self {
            sessions: SessionRegistry::new(session_idle),
            layout_service,
        }
    }
}
