// Router wiring
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    edit_search, get_heatmap, get_search, get_session, health_check, select_candidate,
    select_location, share_session, stream_session,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    // Compression skips text/event-stream, so session events are not buffered
    Router::new()
        .route("/healthz", get(health_check))
        .route("/session", get(get_session))
        .route("/session/location", put(select_location))
        .route("/session/events", get(stream_session))
        .route("/session/share", get(share_session))
        .route("/search", get(get_search).put(edit_search))
        .route("/search/select", post(select_candidate))
        .route("/heatmap", get(get_heatmap))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
