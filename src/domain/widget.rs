// Widget domain model
use super::layout::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a widget on the canvas, unique within one dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for WidgetId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    #[serde(rename = "Bar Chart")]
    BarChart,
    #[serde(rename = "Line Chart")]
    LineChart,
    #[serde(rename = "Pie Chart")]
    PieChart,
    #[serde(rename = "KPI Card")]
    KpiCard,
    #[serde(rename = "Text")]
    Text,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::BarChart => "Bar Chart",
            WidgetKind::LineChart => "Line Chart",
            WidgetKind::PieChart => "Pie Chart",
            WidgetKind::KpiCard => "KPI Card",
            WidgetKind::Text => "Text",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single configurable key inside a widget config, spelled as in the config JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    Title,
    XColumn,
    YColumn,
    Body,
    Metric,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisChartConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieConfig {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Display settings of a widget, one variant per family of widget kinds.
///
/// Serialized without a tag: the owning widget's `type` decides which
/// variant a stored config decodes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WidgetConfig {
    AxisChart(AxisChartConfig),
    Pie(PieConfig),
    Kpi(KpiConfig),
    Text(TextConfig),
}

impl WidgetConfig {
    /// Config a freshly dropped widget starts with: `{ title: "New <type>" }`.
    pub fn default_for(kind: WidgetKind) -> Self {
        let title = format!("New {}", kind);
        match kind {
            WidgetKind::BarChart | WidgetKind::LineChart => WidgetConfig::AxisChart(AxisChartConfig {
                title,
                ..Default::default()
            }),
            WidgetKind::PieChart => WidgetConfig::Pie(PieConfig { title }),
            WidgetKind::KpiCard => WidgetConfig::Kpi(KpiConfig {
                title,
                ..Default::default()
            }),
            WidgetKind::Text => WidgetConfig::Text(TextConfig {
                title,
                ..Default::default()
            }),
        }
    }

    /// Decode a raw JSON config for a widget of the given kind.
    pub fn from_value(kind: WidgetKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            WidgetKind::BarChart | WidgetKind::LineChart => {
                WidgetConfig::AxisChart(serde_json::from_value(value)?)
            }
            WidgetKind::PieChart => WidgetConfig::Pie(serde_json::from_value(value)?),
            WidgetKind::KpiCard => WidgetConfig::Kpi(serde_json::from_value(value)?),
            WidgetKind::Text => WidgetConfig::Text(serde_json::from_value(value)?),
        })
    }

    /// Whether this config shape belongs to widgets of `kind`.
    pub fn fits(&self, kind: WidgetKind) -> bool {
        matches!(
            (self, kind),
            (WidgetConfig::AxisChart(_), WidgetKind::BarChart | WidgetKind::LineChart)
                | (WidgetConfig::Pie(_), WidgetKind::PieChart)
                | (WidgetConfig::Kpi(_), WidgetKind::KpiCard)
                | (WidgetConfig::Text(_), WidgetKind::Text)
        )
    }

    pub fn title(&self) -> &str {
        match self {
            WidgetConfig::AxisChart(c) => &c.title,
            WidgetConfig::Pie(c) => &c.title,
            WidgetConfig::Kpi(c) => &c.title,
            WidgetConfig::Text(c) => &c.title,
        }
    }

    /// Current value of `field`, or `None` when unset or not part of this shape.
    pub fn field(&self, field: ConfigField) -> Option<&str> {
        match (self, field) {
            (_, ConfigField::Title) => Some(self.title()),
            (WidgetConfig::AxisChart(c), ConfigField::XColumn) => c.x_column.as_deref(),
            (WidgetConfig::AxisChart(c), ConfigField::YColumn) => c.y_column.as_deref(),
            (WidgetConfig::Kpi(c), ConfigField::Metric) => c.metric.as_deref(),
            (WidgetConfig::Text(c), ConfigField::Body) => c.body.as_deref(),
            _ => None,
        }
    }

    /// Copy of this config with one field set, the typed form of
    /// `{ ...config, [key]: value }`. Returns `None` if the field does not
    /// exist on this shape.
    pub fn with_field(&self, field: ConfigField, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let mut next = self.clone();
        match (&mut next, field) {
            (WidgetConfig::AxisChart(c), ConfigField::Title) => c.title = value,
            (WidgetConfig::Pie(c), ConfigField::Title) => c.title = value,
            (WidgetConfig::Kpi(c), ConfigField::Title) => c.title = value,
            (WidgetConfig::Text(c), ConfigField::Title) => c.title = value,
            (WidgetConfig::AxisChart(c), ConfigField::XColumn) => c.x_column = Some(value),
            (WidgetConfig::AxisChart(c), ConfigField::YColumn) => c.y_column = Some(value),
            (WidgetConfig::Kpi(c), ConfigField::Metric) => c.metric = Some(value),
            (WidgetConfig::Text(c), ConfigField::Body) => c.body = Some(value),
            _ => return None,
        }
        Some(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWidget")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub config: WidgetConfig,
}

impl Widget {
    pub fn new(id: WidgetId, kind: WidgetKind) -> Self {
        Self {
            id,
            kind,
            config: WidgetConfig::default_for(kind),
        }
    }

    /// Title shown on the canvas: the configured title, or the type name when blank.
    pub fn display_title(&self) -> &str {
        let title = self.config.title();
        if title.is_empty() {
            self.kind.as_str()
        } else {
            title
        }
    }
}

/// A widget as stored, before its config is decoded against its type.
#[derive(Deserialize)]
pub(crate) struct RawWidget {
    id: WidgetId,
    #[serde(rename = "type")]
    kind: WidgetKind,
    #[serde(default)]
    config: Option<serde_json::Value>,
}

impl TryFrom<RawWidget> for Widget {
    type Error = LayoutError;

    fn try_from(raw: RawWidget) -> Result<Self, Self::Error> {
        let config = match raw.config {
            Some(value) => WidgetConfig::from_value(raw.kind, value).map_err(|source| {
                LayoutError::ConfigMismatch {
                    id: raw.id.to_string(),
                    kind: raw.kind,
                    source,
                }
            })?,
            None => WidgetConfig::default_for(raw.kind),
        };

        Ok(Self {
            id: raw.id,
            kind: raw.kind,
            config,
        })
    }
}
