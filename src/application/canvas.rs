// Canvas view - maps the arranged widgets to placeholder tiles
use crate::application::arrangement::ArrangementEngine;
use crate::domain::widget::{Widget, WidgetKind};
use serde::{Deserialize, Serialize};

pub const SHORT_TILE_HEIGHT: u16 = 160;
pub const TALL_TILE_HEIGHT: u16 = 320;

const PLACEHOLDER_CAPTION: &str = "Configure Data Source";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderIcon {
    BarChart,
    Activity,
    PieChart,
    Hash,
    Type,
}

impl PlaceholderIcon {
    pub fn for_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::BarChart => PlaceholderIcon::BarChart,
            WidgetKind::LineChart => PlaceholderIcon::Activity,
            WidgetKind::PieChart => PlaceholderIcon::PieChart,
            WidgetKind::KpiCard => PlaceholderIcon::Hash,
            WidgetKind::Text => PlaceholderIcon::Type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub icon: PlaceholderIcon,
    pub caption: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasTile {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    pub height: u16,
    pub selected: bool,
    pub placeholder: Placeholder,
}

impl CanvasTile {
    fn from_widget(widget: &Widget, selected: bool) -> Self {
        Self {
            id: widget.id.to_string(),
            kind: widget.kind,
            title: widget.display_title().to_string(),
            height: tile_height(widget.kind),
            selected,
            placeholder: Placeholder {
                icon: PlaceholderIcon::for_kind(widget.kind),
                caption: PLACEHOLDER_CAPTION,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyCanvasHint {
    pub headline: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanvasView {
    pub tiles: Vec<CanvasTile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_hint: Option<EmptyCanvasHint>,
}

/// Pointer interactions on a tile outside its drag handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileAction {
    Click,
    Remove,
}

/// Text and KPI tiles are short, chart tiles tall.
pub fn tile_height(kind: WidgetKind) -> u16 {
    match kind {
        WidgetKind::Text | WidgetKind::KpiCard => SHORT_TILE_HEIGHT,
        _ => TALL_TILE_HEIGHT,
    }
}

pub fn render(engine: &ArrangementEngine) -> CanvasView {
    let selected = engine.selected_id();
    let tiles: Vec<CanvasTile> = engine
        .widgets()
        .iter()
        .map(|widget| CanvasTile::from_widget(widget, selected == Some(&widget.id)))
        .collect();

    let empty_hint = tiles.is_empty().then_some(EmptyCanvasHint {
        headline: "Drag components here",
        detail: "Start building your dashboard",
    });

    CanvasView { tiles, empty_hint }
}

/// Route a tile interaction to the engine.
pub fn dispatch(engine: &mut ArrangementEngine, id: &str, action: TileAction) {
    match action {
        TileAction::Click => engine.on_select(id),
        TileAction::Remove => {
            engine.on_remove(id);
        }
    }
}
