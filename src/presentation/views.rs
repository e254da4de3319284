// JSON views of domain state
use crate::application::search_debouncer::SearchState;
use crate::domain::air_quality::{AirQualityReading, ErrorKind};
use crate::domain::aqi::{AqiLevel, ColorToken};
use crate::domain::heatmap::HeatmapSnapshot;
use crate::domain::location::{Coordinate, WellKnownPoint};
use crate::domain::search::SearchCandidate;
use crate::domain::session::SessionState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Serialize)]
pub struct LevelView {
    pub ordinal: Option<u8>,
    pub label: &'static str,
    pub color: ColorToken,
}

impl From<AqiLevel> for LevelView {
    fn from(level: AqiLevel) -> Self {
        Self {
            ordinal: level.ordinal(),
            label: level.label(),
            color: level.color(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub current_location: Coordinate,
    pub location_name: String,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
    pub reading: Option<AirQualityReading>,
    pub level: LevelView,
}

pub fn session_view(state: &SessionState) -> SessionView {
    SessionView {
        current_location: state.current_location,
        location_name: state.location_name.clone(),
        is_loading: state.is_loading,
        last_error: state.last_error,
        reading: state.latest_reading.clone(),
        level: state.current_level().into(),
    }
}

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub display_name: String,
    pub subtitle: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub status: &'static str,
    pub query: Option<String>,
    pub debounce_remaining_ms: Option<u64>,
    pub results: Vec<CandidateView>,
}

pub fn search_view(state: &SearchState) -> SearchView {
    match state {
        SearchState::Idle => SearchView {
            status: "idle",
            query: None,
            debounce_remaining_ms: None,
            results: Vec::new(),
        },
        SearchState::PendingDebounce { query, deadline } => SearchView {
            status: "pending",
            query: Some(query.clone()),
            debounce_remaining_ms: Some(
                deadline.saturating_duration_since(Instant::now()).as_millis() as u64,
            ),
            results: Vec::new(),
        },
        SearchState::InFlight { query } => SearchView {
            status: "searching",
            query: Some(query.clone()),
            debounce_remaining_ms: None,
            results: Vec::new(),
        },
        SearchState::Settled { query, results } => SearchView {
            status: "settled",
            query: Some(query.clone()),
            debounce_remaining_ms: None,
            results: results.iter().map(candidate_view).collect(),
        },
    }
}

fn candidate_view(candidate: &SearchCandidate) -> CandidateView {
    CandidateView {
        display_name: candidate.display_name.clone(),
        subtitle: candidate.subtitle(),
        coordinate: candidate.coordinate,
    }
}

#[derive(Debug, Serialize)]
pub struct HeatmapPointView {
    pub name: Option<String>,
    pub coordinate: Coordinate,
    pub european_aqi: Option<i32>,
    pub level: LevelView,
}

#[derive(Debug, Serialize)]
pub struct HeatmapView {
    pub refreshed_at: Option<DateTime<Utc>>,
    pub failure: Option<ErrorKind>,
    pub points: Vec<HeatmapPointView>,
}

/// Names are matched to readings by coordinate, since a snapshot may have
/// been taken for a different point list.
pub fn heatmap_view(snapshot: &HeatmapSnapshot, points: &[WellKnownPoint]) -> HeatmapView {
    HeatmapView {
        refreshed_at: snapshot.refreshed_at,
        failure: snapshot.failure,
        points: snapshot
            .readings
            .iter()
            .map(|r| HeatmapPointView {
                name: points
                    .iter()
                    .find(|p| p.coordinate() == r.coordinate)
                    .map(|p| p.name.clone()),
                coordinate: r.coordinate,
                european_aqi: r.european_aqi,
                level: r.level().into(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::air_quality::Pollutants;

    #[test]
    fn test_session_view_level() {
        let mut state = SessionState::new(Coordinate::new(51.5074, -0.1278), "London".to_string());
        assert_eq!(session_view(&state).level.label, "Unknown");

        state.latest_reading = Some(AirQualityReading::live(
            state.current_location,
            Some(85),
            Pollutants::default(),
            None,
        ));
        let view = session_view(&state);
        assert_eq!(view.level.ordinal, Some(5));
        assert_eq!(view.level.color.hex, "#9333ea");
    }

    #[test]
    fn test_search_view_settled() {
        let state = SearchState::Settled {
            query: "Lon".to_string(),
            results: vec![SearchCandidate {
                display_name: "London".to_string(),
                coordinate: Coordinate::new(51.50853, -0.12574),
                country_code: "GB".to_string(),
                region: Some("England".to_string()),
            }],
        };

        let view = search_view(&state);
        assert_eq!(view.status, "settled");
        assert_eq!(view.query.as_deref(), Some("Lon"));
        assert_eq!(view.results[0].subtitle, "England, GB");
        assert_eq!(search_view(&SearchState::Idle).status, "idle");
    }

    #[test]
    fn test_heatmap_view_names_points() {
        let points = vec![
            WellKnownPoint::new("Tokyo", 35.6762, 139.6503),
            WellKnownPoint::new("Seoul", 37.5665, 126.978),
        ];
        let snapshot = HeatmapSnapshot::new(
            vec![
                AirQualityReading::live(points[1].coordinate(), Some(45), Pollutants::default(), None),
                AirQualityReading::live(Coordinate::new(0.0, 0.0), None, Pollutants::default(), None),
            ],
            None,
        );

        let view = heatmap_view(&snapshot, &points);
        assert_eq!(view.points[0].name.as_deref(), Some("Seoul"));
        assert_eq!(view.points[0].level.label, "Moderate");
        assert_eq!(view.points[1].name, None);
        assert_eq!(view.points[1].level.ordinal, None);
    }
}
