// Application layer - Arrangement engine, views and use cases
pub mod arrangement;
pub mod canvas;
pub mod dashboard_repository;
pub mod inspector;
pub mod layout_service;
