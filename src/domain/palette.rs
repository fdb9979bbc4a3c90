// Widget palette - the fixed catalog of draggable widget templates
use super::widget::WidgetKind;
use serde::Serialize;

/// Drag ids starting with this prefix come from the palette, not the canvas.
pub const NEW_WIDGET_PREFIX: &str = "new-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSection {
    Charts,
    Utilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub label: &'static str,
    pub section: PaletteSection,
}

pub const PALETTE: [PaletteEntry; 5] = [
    PaletteEntry {
        id: "new-bar",
        kind: WidgetKind::BarChart,
        label: "Bar Chart",
        section: PaletteSection::Charts,
    },
    PaletteEntry {
        id: "new-line",
        kind: WidgetKind::LineChart,
        label: "Line Chart",
        section: PaletteSection::Charts,
    },
    PaletteEntry {
        id: "new-pie",
        kind: WidgetKind::PieChart,
        label: "Pie Chart",
        section: PaletteSection::Charts,
    },
    PaletteEntry {
        id: "new-kpi",
        kind: WidgetKind::KpiCard,
        label: "KPI Metric",
        section: PaletteSection::Utilities,
    },
    PaletteEntry {
        id: "new-text",
        kind: WidgetKind::Text,
        label: "Text Block",
        section: PaletteSection::Utilities,
    },
];

pub fn is_palette_id(id: &str) -> bool {
    id.starts_with(NEW_WIDGET_PREFIX)
}

/// Look up a palette entry by its drag id.
pub fn entry(id: &str) -> Option<&'static PaletteEntry> {
    PALETTE.iter().find(|entry| entry.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_entry_is_prefixed_and_unique() {
        let ids: HashSet<_> = PALETTE.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), PALETTE.len());
        assert!(PALETTE.iter().all(|e| is_palette_id(e.id)));
    }

    #[test]
    fn test_entry_lookup() {
        assert_eq!(entry("new-kpi").map(|e| e.kind), Some(WidgetKind::KpiCard));
        assert_eq!(entry("new-text").map(|e| e.label), Some("Text Block"));
        assert!(entry("new-map").is_none());
        assert!(!is_palette_id("widget-17"));
    }
}
