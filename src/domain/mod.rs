// Domain layer - Widgets, palette, layouts and stored dashboards
pub mod dashboard;
pub mod layout;
pub mod palette;
pub mod widget;
