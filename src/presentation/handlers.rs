// HTTP request handlers
use crate::domain::location::Coordinate;
use crate::domain::session::ShareSummary;
use crate::presentation::app_state::AppState;
use crate::presentation::events::session_events;
use crate::presentation::views::{
    HeatmapView, SearchView, SessionView, heatmap_view, search_view, session_view,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchEdit {
    pub query: String,
}

#[derive(Deserialize)]
pub struct CandidateSelection {
    pub index: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(session_view(&state.session.snapshot()))
}

/// Move the session to a clicked map point
pub async fn select_location(
    State(state): State<Arc<AppState>>,
    Json(coordinate): Json<Coordinate>,
) -> Result<(StatusCode, Json<SessionView>), StatusCode> {
    if !coordinate.is_valid() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    state.session.select_location(coordinate);
    Ok((StatusCode::ACCEPTED, Json(session_view(&state.session.snapshot()))))
}

/// Stream session changes as server-sent events
pub async fn stream_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    session_events(state.session.subscribe())
}

pub async fn share_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ShareSummary>, StatusCode> {
    state
        .session
        .snapshot()
        .share_summary(&state.public_url)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_search(State(state): State<Arc<AppState>>) -> Json<SearchView> {
    Json(search_view(&state.search.state()))
}

pub async fn edit_search(
    State(state): State<Arc<AppState>>,
    Json(edit): Json<SearchEdit>,
) -> Json<SearchView> {
    state.search.edit(edit.query);
    Json(search_view(&state.search.state()))
}

/// Pick a settled search result and move the session there
pub async fn select_candidate(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<CandidateSelection>,
) -> Result<(StatusCode, Json<SessionView>), StatusCode> {
    let candidate = state
        .search
        .select(selection.index)
        .ok_or(StatusCode::NOT_FOUND)?;

    state.session.select_location(candidate.coordinate);
    Ok((StatusCode::ACCEPTED, Json(session_view(&state.session.snapshot()))))
}

pub async fn get_heatmap(State(state): State<Arc<AppState>>) -> Json<HeatmapView> {
    Json(heatmap_view(&state.heatmap.snapshot(), &state.heatmap_points))
}
