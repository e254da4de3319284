// Remote data gateway - Degrade-gracefully wrapper over the repositories
use crate::application::repository::{AirQualityRepository, GeocodingRepository};
use crate::domain::air_quality::{AirQualityReading, ErrorKind};
use crate::domain::location::{Coordinate, UNKNOWN_LOCATION};
use crate::domain::search::SearchCandidate;
use std::sync::Arc;

/// Result of a call whose failures are swallowed. `failure` records why
/// `data` is empty so callers can tell "no results" from "unavailable".
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: T,
    pub failure: Option<ErrorKind>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            failure: None,
        }
    }

    pub fn degraded(data: T, failure: ErrorKind) -> Self {
        Self {
            data,
            failure: Some(failure),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Clone)]
pub struct AirQualityGateway {
    air_quality: Arc<dyn AirQualityRepository>,
    geocoding: Arc<dyn GeocodingRepository>,
    result_count: usize,
}

impl AirQualityGateway {
    pub fn new(
        air_quality: Arc<dyn AirQualityRepository>,
        geocoding: Arc<dyn GeocodingRepository>,
        result_count: usize,
    ) -> Self {
        Self {
            air_quality,
            geocoding,
            result_count,
        }
    }

    /// Never fails: a broken fetch yields a synthetic reading tagged as fallback.
    pub async fn fetch_current(&self, coordinate: Coordinate) -> AirQualityReading {
        match self.air_quality.current(coordinate).await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "Error fetching pollution data, serving fallback: {}",
                    e
                );
                AirQualityReading::fallback(coordinate, e.kind(), chrono::Utc::now())
            }
        }
    }

    /// All-or-nothing: any failure yields an empty sequence.
    pub async fn fetch_batch(&self, coordinates: &[Coordinate]) -> Outcome<Vec<AirQualityReading>> {
        if coordinates.is_empty() {
            return Outcome::ok(Vec::new());
        }

        match self.air_quality.current_batch(coordinates).await {
            Ok(readings) if readings.len() == coordinates.len() => Outcome::ok(readings),
            Ok(readings) => {
                tracing::warn!(
                    "Batch response has {} entries for {} points, discarding",
                    readings.len(),
                    coordinates.len()
                );
                Outcome::degraded(Vec::new(), ErrorKind::ParseFailure)
            }
            Err(e) => {
                tracing::warn!("Error fetching batch pollution data: {}", e);
                Outcome::degraded(Vec::new(), e.kind())
            }
        }
    }

    pub async fn search_by_name(&self, query: &str) -> Outcome<Vec<SearchCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Outcome::ok(Vec::new());
        }

        match self.geocoding.search(query, self.result_count).await {
            Ok(mut candidates) => {
                candidates.truncate(self.result_count);
                Outcome::ok(candidates)
            }
            Err(e) => {
                tracing::warn!(query, "Error searching city: {}", e);
                Outcome::degraded(Vec::new(), e.kind())
            }
        }
    }

    pub async fn location_name(&self, coordinate: Coordinate) -> String {
        match self.geocoding.reverse_lookup(coordinate).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(e) => {
                tracing::warn!("Error getting city name: {}", e);
                UNKNOWN_LOCATION.to_string()
            }
        }
    }
}
