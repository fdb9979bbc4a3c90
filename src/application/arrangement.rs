// Arrangement engine - widget creation, reordering, selection and removal
use crate::domain::layout::Layout;
use crate::domain::palette;
use crate::domain::widget::{Widget, WidgetConfig, WidgetId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Source of fresh widget ids.
pub trait WidgetIdSource: Send {
    fn next_id(&mut self) -> WidgetId;
}

/// Timestamp based ids (`widget-<millis>`), strictly increasing so an id is
/// never handed out twice even when two widgets land in the same millisecond.
#[derive(Debug, Default)]
pub struct ClockIds {
    last_millis: i64,
}

impl WidgetIdSource for ClockIds {
    fn next_id(&mut self) -> WidgetId {
        let millis = Utc::now().timestamp_millis().max(self.last_millis + 1);
        self.last_millis = millis;
        WidgetId::new(format!("widget-{}", millis))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped outside any target, onto itself, or with an unknown id.
    Ignored,
    Added(WidgetId),
    Moved { from: usize, to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Earlier,
    Later,
}

/// Feedback shown while something is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragOverlay {
    pub active_id: String,
    pub label: String,
}

/// In-memory state behind one dashboard builder canvas.
pub struct ArrangementEngine {
    widgets: Vec<Widget>,
    selected_id: Option<WidgetId>,
    active_drag: Option<String>,
    ids: Box<dyn WidgetIdSource>,
}

impl Default for ArrangementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrangementEngine {
    pub fn new() -> Self {
        Self::with_id_source(Box::new(ClockIds::default()))
    }

    pub fn with_id_source(ids: Box<dyn WidgetIdSource>) -> Self {
        Self {
            widgets: Vec::new(),
            selected_id: None,
            active_drag: None,
            ids,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn selected_id(&self) -> Option<&WidgetId> {
        self.selected_id.as_ref()
    }

    pub fn selected_widget(&self) -> Option<&Widget> {
        self.selected_id.as_ref().and_then(|id| self.widget(id.as_str()))
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == *id)
    }

    pub fn active_drag(&self) -> Option<&str> {
        self.active_drag.as_deref()
    }

    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        let active_id = self.active_drag()?;
        let label = match palette::entry(active_id) {
            Some(entry) => entry.label.to_string(),
            None => self
                .widget(active_id)
                .map(|w| w.display_title().to_string())
                .unwrap_or_else(|| active_id.to_string()),
        };

        Some(DragOverlay {
            active_id: active_id.to_string(),
            label,
        })
    }

    pub fn on_drag_start(&mut self, active_id: &str) {
        tracing::debug!("drag started: {}", active_id);
        self.active_drag = Some(active_id.to_string());
    }

    pub fn on_drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> DropOutcome {
        let outcome = match over_id {
            None => DropOutcome::Ignored,
            Some(_) if palette::is_palette_id(active_id) => self.add_from_palette(active_id),
            Some(over_id) if active_id != over_id => self.reorder(active_id, over_id),
            Some(_) => DropOutcome::Ignored,
        };

        self.active_drag = None;
        tracing::debug!(
            "drag ended: active={} over={:?} outcome={:?}",
            active_id,
            over_id,
            outcome
        );
        outcome
    }

    /// Selecting an id that is not on the canvas leaves the selection as is.
    pub fn on_select(&mut self, id: &str) {
        match self.widget(id) {
            Some(widget) => self.selected_id = Some(widget.id.clone()),
            None => tracing::debug!("select ignored, unknown widget {}", id),
        }
    }

    /// Replace the widget's config wholesale, returning whether it was applied.
    /// Unknown ids and configs shaped for another widget type are ignored.
    pub fn on_config_change(&mut self, id: &str, config: WidgetConfig) -> bool {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id == *id) else {
            tracing::debug!("config change ignored, unknown widget {}", id);
            return false;
        };

        if !config.fits(widget.kind) {
            tracing::warn!("config for {} does not fit type {}", id, widget.kind);
            return false;
        }

        widget.config = config;
        true
    }

    pub fn on_remove(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            tracing::debug!("remove ignored, unknown widget {}", id);
            return false;
        };

        self.widgets.remove(index);
        if self.selected_id.as_ref().is_some_and(|selected| *selected == *id) {
            self.selected_id = None;
        }
        true
    }

    /// Move a widget one slot, the keyboard counterpart of a drag reorder.
    pub fn move_widget(&mut self, id: &str, direction: MoveDirection) -> DropOutcome {
        let Some(from) = self.position(id) else {
            return DropOutcome::Ignored;
        };

        let to = match direction {
            MoveDirection::Earlier => from.checked_sub(1),
            MoveDirection::Later => Some(from + 1).filter(|to| *to < self.widgets.len()),
        };

        match to {
            Some(to) => {
                array_move(&mut self.widgets, from, to);
                DropOutcome::Moved { from, to }
            }
            None => DropOutcome::Ignored,
        }
    }

    /// Swap in a previously saved layout. Selection and drag state reset.
    pub fn load(&mut self, layout: Layout) {
        self.widgets = layout.into_widgets();
        self.selected_id = None;
        self.active_drag = None;
    }

    fn add_from_palette(&mut self, active_id: &str) -> DropOutcome {
        let Some(entry) = palette::entry(active_id) else {
            tracing::debug!("drop ignored, unknown palette entry {}", active_id);
            return DropOutcome::Ignored;
        };

        let id = self.fresh_id();
        self.widgets.push(Widget::new(id.clone(), entry.kind));
        DropOutcome::Added(id)
    }

    fn reorder(&mut self, active_id: &str, over_id: &str) -> DropOutcome {
        match (self.position(active_id), self.position(over_id)) {
            (Some(from), Some(to)) => {
                array_move(&mut self.widgets, from, to);
                DropOutcome::Moved { from, to }
            }
            _ => DropOutcome::Ignored,
        }
    }

    fn fresh_id(&mut self) -> WidgetId {
        loop {
            let id = self.ids.next_id();
            if self.position(id.as_str()).is_none() {
                return id;
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == *id)
    }
}

/// Remove the element at `from` and reinsert it at `to`, shifting the rest.
fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::widget::{ConfigField, WidgetKind};
    use std::collections::HashSet;

    /// Deterministic ids for tests: `w1`, `w2`, ...
    #[derive(Default)]
    pub(crate) struct SequentialIds {
        next: u32,
    }

    impl WidgetIdSource for SequentialIds {
        fn next_id(&mut self) -> WidgetId {
            self.next += 1;
            WidgetId::new(format!("w{}", self.next))
        }
    }

    pub(crate) fn engine() -> ArrangementEngine {
        ArrangementEngine::with_id_source(Box::new(SequentialIds::default()))
    }

    fn ids(engine: &ArrangementEngine) -> Vec<&str> {
        engine.widgets().iter().map(|w| w.id.as_str()).collect()
    }

    fn engine_with(kinds: &[&str]) -> ArrangementEngine {
        let mut engine = engine();
        for palette_id in kinds {
            engine.on_drag_end(palette_id, Some("canvas"));
        }
        engine
    }

    #[test]
    fn test_palette_drop_appends_default_widget() {
        let mut engine = engine();
        engine.on_drag_start("new-bar");
        let outcome = engine.on_drag_end("new-bar", Some("canvas"));

        assert_eq!(outcome, DropOutcome::Added(WidgetId::new("w1")));
        assert_eq!(engine.widgets().len(), 1);
        let widget = &engine.widgets()[0];
        assert_eq!(widget.kind, WidgetKind::BarChart);
        assert_eq!(widget.config, WidgetConfig::default_for(WidgetKind::BarChart));
        assert_eq!(widget.config.title(), "New Bar Chart");
        assert!(engine.active_drag().is_none());
    }

    #[test]
    fn test_palette_drop_onto_widget_still_appends() {
        let mut engine = engine_with(&["new-bar", "new-text"]);
        engine.on_drag_end("new-kpi", Some("w1"));
        assert_eq!(ids(&engine), ["w1", "w2", "w3"]);
        assert_eq!(engine.widgets()[2].kind, WidgetKind::KpiCard);
    }

    #[test]
    fn test_drop_without_target_changes_nothing() {
        let mut engine = engine_with(&["new-bar", "new-line"]);
        engine.on_select("w2");
        let before = engine.widgets().to_vec();

        engine.on_drag_start("new-pie");
        assert_eq!(engine.on_drag_end("new-pie", None), DropOutcome::Ignored);
        engine.on_drag_start("w1");
        assert_eq!(engine.on_drag_end("w1", None), DropOutcome::Ignored);

        assert_eq!(engine.widgets(), before.as_slice());
        assert_eq!(engine.selected_id().map(WidgetId::as_str), Some("w2"));
        assert!(engine.active_drag().is_none());
    }

    #[test]
    fn test_reorder_moves_first_past_last() {
        let mut engine = engine_with(&["new-bar", "new-line", "new-pie"]);
        let outcome = engine.on_drag_end("w1", Some("w3"));

        assert_eq!(outcome, DropOutcome::Moved { from: 0, to: 2 });
        assert_eq!(ids(&engine), ["w2", "w3", "w1"]);
    }

    #[test]
    fn test_reorder_moves_last_before_first() {
        let mut engine = engine_with(&["new-bar", "new-line", "new-pie", "new-text"]);
        engine.on_drag_end("w4", Some("w2"));
        assert_eq!(ids(&engine), ["w1", "w4", "w2", "w3"]);
    }

    #[test]
    fn test_reorder_is_a_permutation() {
        let mut engine = engine_with(&["new-bar", "new-line", "new-pie", "new-kpi", "new-text"]);
        let mut before = engine.widgets().to_vec();
        engine.on_drag_end("w2", Some("w5"));
        engine.on_drag_end("w4", Some("w1"));
        let mut after = engine.widgets().to_vec();

        before.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        after.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_with_unknown_or_same_id_is_ignored() {
        let mut engine = engine_with(&["new-bar", "new-line"]);
        assert_eq!(engine.on_drag_end("w1", Some("w1")), DropOutcome::Ignored);
        assert_eq!(engine.on_drag_end("w1", Some("canvas")), DropOutcome::Ignored);
        assert_eq!(engine.on_drag_end("ghost", Some("w2")), DropOutcome::Ignored);
        assert_eq!(engine.on_drag_end("new-map", Some("w2")), DropOutcome::Ignored);
        assert_eq!(ids(&engine), ["w1", "w2"]);
    }

    #[test]
    fn test_drag_sequences_never_duplicate_ids() {
        let mut engine = engine();
        let drags = [
            ("new-bar", Some("canvas")),
            ("new-text", Some("canvas")),
            ("w1", Some("w2")),
            ("new-kpi", Some("w1")),
            ("w3", Some("w1")),
            ("w2", None),
            ("new-pie", Some("canvas")),
            ("w4", Some("w4")),
        ];
        for (active, over) in drags {
            engine.on_drag_end(active, over);
            let unique: HashSet<_> = ids(&engine).into_iter().collect();
            assert_eq!(unique.len(), engine.widgets().len());
        }
        assert_eq!(engine.widgets().len(), 4);
    }

    #[test]
    fn test_fresh_ids_skip_ids_already_on_canvas() {
        let mut engine = engine();
        let taken = crate::domain::widget::Widget::new(WidgetId::new("w1"), WidgetKind::Text);
        engine.load(Layout::new(vec![taken]).unwrap());

        assert_eq!(
            engine.on_drag_end("new-bar", Some("canvas")),
            DropOutcome::Added(WidgetId::new("w2"))
        );
    }

    #[test]
    fn test_removed_id_is_not_handed_out_again() {
        let mut engine = engine_with(&["new-bar"]);
        assert!(engine.on_remove("w1"));
        assert!(engine.widgets().is_empty());

        let outcome = engine.on_drag_end("new-bar", Some("canvas"));
        assert_ne!(outcome, DropOutcome::Added(WidgetId::new("w1")));
        assert_eq!(ids(&engine), ["w2"]);
    }

    fn millis(id: &WidgetId) -> i64 {
        id.as_str().trim_start_matches("widget-").parse().unwrap()
    }

    #[test]
    fn test_clock_ids_strictly_increase() {
        let mut ids = ClockIds::default();
        let generated: Vec<_> = (0..50).map(|_| ids.next_id()).collect();

        assert!(generated.iter().all(|id| id.as_str().starts_with("widget-")));
        assert!(generated.windows(2).all(|pair| millis(&pair[0]) < millis(&pair[1])));
    }

    #[test]
    fn test_clock_ids_stay_ahead_of_a_clock_that_lags() {
        let ahead = Utc::now().timestamp_millis() + 60_000;
        let mut ids = ClockIds { last_millis: ahead };

        assert_eq!(millis(&ids.next_id()), ahead + 1);
        assert_eq!(millis(&ids.next_id()), ahead + 2);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut engine = engine_with(&["new-bar", "new-line"]);
        engine.on_select("w2");
        let once = engine.selected_id().cloned();
        engine.on_select("w2");
        assert_eq!(engine.selected_id().cloned(), once);
        assert_eq!(engine.selected_widget().map(|w| w.kind), Some(WidgetKind::LineChart));
    }

    #[test]
    fn test_select_unknown_id_keeps_selection() {
        let mut engine = engine_with(&["new-bar"]);
        engine.on_select("w1");
        engine.on_select("nope");
        assert_eq!(engine.selected_id().map(WidgetId::as_str), Some("w1"));
    }

    #[test]
    fn test_remove_selected_clears_selection() {
        let mut engine = engine_with(&["new-bar", "new-line"]);
        engine.on_select("w1");

        assert!(engine.on_remove("w1"));
        assert_eq!(ids(&engine), ["w2"]);
        assert!(engine.selected_id().is_none());
    }

    #[test]
    fn test_remove_other_keeps_selection_and_order() {
        let mut engine = engine_with(&["new-bar", "new-line", "new-text"]);
        engine.on_select("w3");
        let survivors: Vec<_> = engine
            .widgets()
            .iter()
            .filter(|w| w.id != *"w2")
            .cloned()
            .collect();

        assert!(engine.on_remove("w2"));
        assert!(!engine.on_remove("w2"));
        assert_eq!(engine.widgets(), survivors.as_slice());
        assert_eq!(engine.selected_id().map(WidgetId::as_str), Some("w3"));
    }

    #[test]
    fn test_config_change_touches_only_target() {
        let mut engine = engine_with(&["new-bar", "new-text"]);
        engine.on_select("w1");
        let untouched = engine.widgets()[0].clone();
        let config = engine.widgets()[1]
            .config
            .with_field(ConfigField::Body, "Quarterly notes")
            .unwrap();

        assert!(engine.on_config_change("w2", config.clone()));
        assert_eq!(engine.widgets()[0], untouched);
        assert_eq!(engine.widgets()[1].config, config);
        assert_eq!(engine.widgets()[1].kind, WidgetKind::Text);
        assert_eq!(ids(&engine), ["w1", "w2"]);
        assert_eq!(engine.selected_id().map(WidgetId::as_str), Some("w1"));
    }

    #[test]
    fn test_config_change_replaces_rather_than_merges() {
        let mut engine = engine_with(&["new-line"]);
        let with_axis = engine.widgets()[0]
            .config
            .with_field(ConfigField::XColumn, "date")
            .unwrap();
        engine.on_config_change("w1", with_axis);

        engine.on_config_change("w1", WidgetConfig::default_for(WidgetKind::LineChart));
        assert_eq!(engine.widgets()[0].config.field(ConfigField::XColumn), None);
    }

    #[test]
    fn test_config_change_rejects_unknown_id_and_wrong_shape() {
        let mut engine = engine_with(&["new-bar"]);
        let before = engine.widgets().to_vec();

        assert!(!engine.on_config_change("w9", WidgetConfig::default_for(WidgetKind::BarChart)));
        assert!(!engine.on_config_change("w1", WidgetConfig::default_for(WidgetKind::Text)));
        assert_eq!(engine.widgets(), before.as_slice());
    }

    #[test]
    fn test_line_chart_accepts_axis_config_of_bar_chart() {
        let mut engine = engine_with(&["new-line"]);
        assert!(engine.on_config_change("w1", WidgetConfig::default_for(WidgetKind::BarChart)));
        assert_eq!(engine.widgets()[0].kind, WidgetKind::LineChart);
    }

    #[test]
    fn test_move_widget_by_one_slot() {
        let mut engine = engine_with(&["new-bar", "new-line", "new-pie"]);
        assert_eq!(
            engine.move_widget("w1", MoveDirection::Later),
            DropOutcome::Moved { from: 0, to: 1 }
        );
        assert_eq!(ids(&engine), ["w2", "w1", "w3"]);

        assert_eq!(engine.move_widget("w3", MoveDirection::Later), DropOutcome::Ignored);
        assert_eq!(engine.move_widget("w2", MoveDirection::Earlier), DropOutcome::Ignored);
        assert_eq!(engine.move_widget("w9", MoveDirection::Earlier), DropOutcome::Ignored);
        assert_eq!(ids(&engine), ["w2", "w1", "w3"]);
    }

    #[test]
    fn test_drag_overlay_labels() {
        let mut engine = engine_with(&["new-text"]);
        assert!(engine.drag_overlay().is_none());

        engine.on_drag_start("new-kpi");
        assert_eq!(engine.drag_overlay().map(|o| o.label), Some("KPI Metric".to_string()));

        engine.on_drag_start("w1");
        assert_eq!(engine.drag_overlay().map(|o| o.label), Some("New Text".to_string()));

        engine.on_drag_end("w1", Some("w1"));
        assert!(engine.drag_overlay().is_none());
    }

    #[test]
    fn test_load_resets_transient_state() {
        let mut engine = engine_with(&["new-bar"]);
        engine.on_select("w1");
        engine.on_drag_start("w1");

        let layout = Layout::decode(r#"[{"id":"saved-1","type":"Pie Chart","config":{"title":"Mix"}}]"#)
            .unwrap();
        engine.load(layout);

        assert_eq!(ids(&engine), ["saved-1"]);
        assert!(engine.selected_id().is_none());
        assert!(engine.active_drag().is_none());
    }
}
