// Air quality readings
use super::aqi::{AqiLevel, classify};
use super::location::Coordinate;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a gateway call fell back to synthetic or empty data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NetworkFailure,
    ParseFailure,
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Fallback { cause: ErrorKind },
}

/// Pollutant concentrations in µg/m³. Batch readings only carry the index,
/// so every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pollutants {
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub carbon_monoxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub ozone: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReading {
    pub coordinate: Coordinate,
    pub european_aqi: Option<i32>,
    pub pollutants: Pollutants,
    /// Observation time in UTC, converted from the service's local time.
    pub observed_at: Option<DateTime<Utc>>,
    pub provenance: Provenance,
}

impl AirQualityReading {
    pub fn live(
        coordinate: Coordinate,
        european_aqi: Option<i32>,
        pollutants: Pollutants,
        observed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            coordinate,
            european_aqi,
            pollutants,
            observed_at,
            provenance: Provenance::Live,
        }
    }

    /// Synthetic reading served when the point fetch fails.
    pub fn fallback(coordinate: Coordinate, cause: ErrorKind, observed_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            european_aqi: Some(50),
            pollutants: Pollutants {
                pm10: Some(20.0),
                pm2_5: Some(10.0),
                carbon_monoxide: Some(200.0),
                nitrogen_dioxide: Some(15.0),
                sulphur_dioxide: Some(5.0),
                ozone: Some(50.0),
            },
            observed_at: Some(observed_at),
            provenance: Provenance::Fallback { cause },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.provenance, Provenance::Fallback { .. })
    }

    pub fn failure(&self) -> Option<ErrorKind> {
        match self.provenance {
            Provenance::Live => None,
            Provenance::Fallback { cause } => Some(cause),
        }
    }

    pub fn level(&self) -> AqiLevel {
        classify(self.european_aqi)
    }
}
