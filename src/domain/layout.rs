// Layout - the persisted, ordered widget list of a dashboard
use super::palette;
use super::widget::{RawWidget, Widget, WidgetKind};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("widget id {0} appears more than once")]
    DuplicateWidgetId(String),

    #[error("widget id {0} uses the reserved palette prefix")]
    ReservedWidgetId(String),

    #[error("config of widget {id} does not fit type {kind}: {source}")]
    ConfigMismatch {
        id: String,
        kind: WidgetKind,
        #[source]
        source: serde_json::Error,
    },
}

/// An ordered widget list whose ids are unique and never look like palette ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    widgets: Vec<Widget>,
}

impl Layout {
    pub fn new(widgets: Vec<Widget>) -> Result<Self, LayoutError> {
        let mut seen = HashSet::with_capacity(widgets.len());
        for widget in &widgets {
            if palette::is_palette_id(widget.id.as_str()) {
                return Err(LayoutError::ReservedWidgetId(widget.id.to_string()));
            }
            if !seen.insert(widget.id.as_str()) {
                return Err(LayoutError::DuplicateWidgetId(widget.id.to_string()));
            }
        }
        Ok(Self { widgets })
    }

    /// Parse a `layout_config` string as stored by the backend.
    pub fn decode(layout_config: &str) -> Result<Self, LayoutError> {
        let raw: Vec<RawWidget> = serde_json::from_str(layout_config)?;
        let widgets = raw
            .into_iter()
            .map(Widget::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(widgets)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn into_widgets(self) -> Vec<Widget> {
        self.widgets
    }
}

/// Serialize widgets into the JSON string sent as `layout_config`.
pub fn encode(widgets: &[Widget]) -> Result<String, LayoutError> {
    Ok(serde_json::to_string(widgets)?)
}
