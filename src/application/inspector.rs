// Inspector panel - editable fields of the selected widget
use crate::application::arrangement::ArrangementEngine;
use crate::domain::widget::{ConfigField, Widget, WidgetKind};
use serde::Serialize;

const NO_SELECTION_MESSAGE: &str = "Select a widget to configure its properties.";
const COLUMN_PLACEHOLDER: &str = "Select Column...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldControl {
    TextInput,
    TextArea,
    ColumnSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectorField {
    pub field: ConfigField,
    pub label: &'static str,
    pub control: FieldControl,
    pub value: Option<String>,
    pub enabled: bool,
    pub placeholder: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InspectorView {
    Empty {
        message: &'static str,
    },
    Editing {
        widget_id: String,
        #[serde(rename = "type")]
        kind: WidgetKind,
        fields: Vec<InspectorField>,
    },
}

/// Fields the inspector offers for a widget kind, in display order.
pub fn fields_for(kind: WidgetKind) -> &'static [ConfigField] {
    match kind {
        WidgetKind::BarChart | WidgetKind::LineChart => {
            &[ConfigField::Title, ConfigField::XColumn, ConfigField::YColumn]
        }
        WidgetKind::PieChart => &[ConfigField::Title],
        WidgetKind::KpiCard => &[ConfigField::Title, ConfigField::Metric],
        WidgetKind::Text => &[ConfigField::Title, ConfigField::Body],
    }
}

/// Inspector bound to the column names of the dataset behind the dashboard.
/// Without columns the axis selectors stay disabled placeholders.
pub struct Inspector<'a> {
    columns: &'a [String],
}

impl<'a> Inspector<'a> {
    pub fn new(columns: &'a [String]) -> Self {
        Self { columns }
    }

    pub fn render(&self, engine: &ArrangementEngine) -> InspectorView {
        match engine.selected_widget() {
            Some(widget) => InspectorView::Editing {
                widget_id: widget.id.to_string(),
                kind: widget.kind,
                fields: fields_for(widget.kind)
                    .iter()
                    .map(|field| self.describe(widget, *field))
                    .collect(),
            },
            None => InspectorView::Empty {
                message: NO_SELECTION_MESSAGE,
            },
        }
    }

    /// Apply one field edit as a full config replacement. Returns false when
    /// the widget is unknown, the field is not offered for its kind, the
    /// field is disabled, or the value is not one of the known columns.
    pub fn apply_edit(
        &self,
        engine: &mut ArrangementEngine,
        widget_id: &str,
        field: ConfigField,
        value: String,
    ) -> bool {
        let Some(widget) = engine.widget(widget_id) else {
            return false;
        };

        if !fields_for(widget.kind).contains(&field) {
            tracing::debug!("field {:?} is not editable on {}", field, widget.kind);
            return false;
        }

        if self.control(field) == FieldControl::ColumnSelect
            && !self.columns.iter().any(|column| *column == value)
        {
            tracing::debug!("column {} is not available for {}", value, widget_id);
            return false;
        }

        let Some(config) = widget.config.with_field(field, value) else {
            return false;
        };
        engine.on_config_change(widget_id, config)
    }

    fn control(&self, field: ConfigField) -> FieldControl {
        match field {
            ConfigField::XColumn | ConfigField::YColumn => FieldControl::ColumnSelect,
            ConfigField::Body => FieldControl::TextArea,
            ConfigField::Title | ConfigField::Metric => FieldControl::TextInput,
        }
    }

    fn describe(&self, widget: &Widget, field: ConfigField) -> InspectorField {
        let control = self.control(field);
        let (label, placeholder) = match field {
            ConfigField::Title => ("Title", "Widget Title"),
            ConfigField::XColumn => ("X-Axis Column", COLUMN_PLACEHOLDER),
            ConfigField::YColumn => ("Y-Axis Column", COLUMN_PLACEHOLDER),
            ConfigField::Body => ("Content", "Type your text here..."),
            ConfigField::Metric => ("Metric", "e.g. sum(revenue)"),
        };

        let (enabled, options) = match control {
            FieldControl::ColumnSelect => (!self.columns.is_empty(), self.columns.to_vec()),
            _ => (true, Vec::new()),
        };

        InspectorField {
            field,
            label,
            control,
            value: widget.config.field(field).map(str::to_string),
            enabled,
            placeholder,
            options,
        }
    }
}
