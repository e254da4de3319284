// Presentation layer - HTTP surface over the session, search and heatmap
pub mod app_state;
pub mod events;
pub mod handlers;
pub mod routes;
pub mod views;
