// Location session state
use super::air_quality::{AirQualityReading, ErrorKind};
use super::aqi::{AqiLevel, classify};
use super::location::Coordinate;
use serde::Serialize;

/// The single authoritative view of what the map is showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub current_location: Coordinate,
    pub location_name: String,
    pub latest_reading: Option<AirQualityReading>,
    pub is_loading: bool,
    pub last_error: Option<ErrorKind>,
}

/// Text and link for sharing the current reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareSummary {
    pub text: String,
    pub link: String,
}

impl SessionState {
    pub fn new(current_location: Coordinate, location_name: String) -> Self {
        Self {
            current_location,
            location_name,
            latest_reading: None,
            is_loading: false,
            last_error: None,
        }
    }

    pub fn current_level(&self) -> AqiLevel {
        classify(self.latest_reading.as_ref().and_then(|r| r.european_aqi))
    }

    pub fn share_summary(&self, public_url: &str) -> Option<ShareSummary> {
        let reading = self.latest_reading.as_ref()?;
        let name = if self.location_name.is_empty() {
            "Current Location"
        } else {
            &self.location_name
        };
        let aqi = reading
            .european_aqi
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());

        let text = format!(
            "🌬️ Air Quality Update for {}\n\n\
             🌍 AQI: {} ({})\n\n\
             📊 Pollutants:\n\
             • PM2.5: {} µg/m³\n\
             • PM10: {} µg/m³\n\
             • NO₂: {} µg/m³\n\n\
             Check more at: {}",
            name,
            aqi,
            self.current_level().label(),
            format_value(reading.pollutants.pm2_5),
            format_value(reading.pollutants.pm10),
            format_value(reading.pollutants.nitrogen_dioxide),
            public_url
        );
        let link = format!("https://wa.me/?text={}", urlencoding::encode(&text));

        Some(ShareSummary { text, link })
    }
}

/// Missing and zero concentrations both render as "-".
fn format_value(value: Option<f64>) -> String {
    value
        .filter(|v| *v != 0.0)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}
