// Presentation layer - Builder sessions exposed over HTTP
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod router;
pub mod sessions;
