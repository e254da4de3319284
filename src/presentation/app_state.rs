// Application state for HTTP handlers
use crate::application::heatmap_cache::HeatmapCache;
use crate::application::location_session::LocationSession;
use crate::application::search_debouncer::SearchDebouncer;
use crate::domain::location::WellKnownPoint;

#[derive(Clone)]
pub struct AppState {
    pub session: LocationSession,
    pub search: SearchDebouncer,
    pub heatmap: HeatmapCache,
    pub heatmap_points: Vec<WellKnownPoint>,
    pub public_url: String,
}
