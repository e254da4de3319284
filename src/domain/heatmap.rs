// Heatmap snapshot
use super::air_quality::{AirQualityReading, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Readings for the well-known points, positionally matching the requested
/// coordinates. Replaced wholesale on refresh.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeatmapSnapshot {
    pub readings: Vec<AirQualityReading>,
    pub failure: Option<ErrorKind>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl HeatmapSnapshot {
    pub fn new(readings: Vec<AirQualityReading>, failure: Option<ErrorKind>) -> Self {
        Self {
            readings,
            failure,
            refreshed_at: Some(Utc::now()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
