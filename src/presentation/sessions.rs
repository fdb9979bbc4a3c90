// Builder sessions - one arrangement engine per open dashboard builder
use crate::application::arrangement::{ArrangementEngine, DragOverlay};
use crate::application::canvas::{self, CanvasView};
use crate::application::inspector::{Inspector, InspectorView};
use crate::domain::widget::{Widget, WidgetId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub struct BuilderSession {
    pub dataset_id: i64,
    /// Column names of the dataset, offered by the inspector's axis selectors
    pub columns: Vec<String>,
    pub engine: ArrangementEngine,
}

impl BuilderSession {
    pub fn new(dataset_id: i64, columns: Vec<String>, engine: ArrangementEngine) -> Self {
        Self {
            dataset_id,
            columns,
            engine,
        }
    }

    pub fn inspector(&self) -> Inspector<'_> {
        Inspector::new(&self.columns)
    }

    pub fn snapshot(&self, session_id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            session_id,
            dataset_id: self.dataset_id,
            widgets: self.engine.widgets().to_vec(),
            selected_id: self.engine.selected_id().cloned(),
            drag_overlay: self.engine.drag_overlay(),
            canvas: canvas::render(&self.engine),
            inspector: self.inspector().render(&self.engine),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub dataset_id: i64,
    pub widgets: Vec<Widget>,
    pub selected_id: Option<WidgetId>,
    pub drag_overlay: Option<DragOverlay>,
    pub canvas: CanvasView,
    pub inspector: InspectorView,
}

struct Entry {
    session: BuilderSession,
    touched: Instant,
}

/// Open builder sessions keyed by id. Every engine operation runs under the
/// registry lock, so mutations of one session never interleave. Sessions
/// untouched for longer than the idle timeout are evicted.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn open(&self, session: BuilderSession) -> Uuid {
        self.evict_idle();

        let id = Uuid::new_v4();
        tracing::info!("opened builder session {} for dataset {}", id, session.dataset_id);
        self.lock().insert(
            id,
            Entry {
                session,
                touched: Instant::now(),
            },
        );
        id
    }

    pub fn close(&self, id: Uuid) -> bool {
        let closed = self.lock().remove(&id).is_some();
        if closed {
            tracing::info!("closed builder session {}", id);
        }
        closed
    }

    /// Run `f` against the session, or return `None` if it is not open or has
    /// been idle past the timeout.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut BuilderSession) -> R) -> Option<R> {
        let now = Instant::now();
        let mut sessions = self.lock();

        if sessions
            .get(&id)
            .is_some_and(|entry| self.is_idle(entry, now))
        {
            sessions.remove(&id);
            tracing::info!("evicted idle builder session {}", id);
            return None;
        }

        let entry = sessions.get_mut(&id)?;
        entry.touched = now;
        Some(f(&mut entry.session))
    }

    /// Drop every session idle past the timeout, returning how many went.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    fn evict_idle_at(&self, now: Instant) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_idle(entry, now));

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!("evicted {} idle builder sessions", evicted);
        }
        evicted
    }

    fn is_idle(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) > self.idle_timeout
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
