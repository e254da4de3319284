// Open-Meteo air quality repository implementation
use crate::application::error::GatewayError;
use crate::application::repository::{AirQualityRepository, GatewayResult};
use crate::domain::air_quality::{AirQualityReading, Pollutants};
use crate::domain::location::Coordinate;
use crate::infrastructure::http_client::get_text;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;

const CURRENT_FIELDS: &str =
    "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone,european_aqi";

// Batch requests only need the index for the heatmap
const BATCH_FIELDS: &str = "european_aqi";

#[derive(Debug, Clone)]
pub struct OpenMeteoRepository {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    utc_offset_seconds: Option<i32>,
    #[serde(default)]
    current: Option<CurrentValues>,
}

#[derive(Debug, Deserialize)]
struct CurrentValues {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    european_aqi: Option<f64>,
    #[serde(default)]
    pm10: Option<f64>,
    #[serde(default)]
    pm2_5: Option<f64>,
    #[serde(default)]
    carbon_monoxide: Option<f64>,
    #[serde(default)]
    nitrogen_dioxide: Option<f64>,
    #[serde(default)]
    sulphur_dioxide: Option<f64>,
    #[serde(default)]
    ozone: Option<f64>,
}

impl OpenMeteoRepository {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn current_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url,
            coordinate.latitude,
            coordinate.longitude,
            urlencoding::encode(CURRENT_FIELDS)
        )
    }

    fn batch_url(&self, coordinates: &[Coordinate]) -> String {
        let latitudes: Vec<String> = coordinates.iter().map(|c| c.latitude.to_string()).collect();
        let longitudes: Vec<String> = coordinates.iter().map(|c| c.longitude.to_string()).collect();
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone=auto",
            self.base_url,
            urlencoding::encode(&latitudes.join(",")),
            urlencoding::encode(&longitudes.join(",")),
            BATCH_FIELDS
        )
    }
}

#[async_trait]
impl AirQualityRepository for OpenMeteoRepository {
    async fn current(&self, coordinate: Coordinate) -> GatewayResult<AirQualityReading> {
        let body = get_text(&self.http, &self.current_url(coordinate)).await?;
        parse_current(&body, coordinate)
    }

    async fn current_batch(&self, coordinates: &[Coordinate]) -> GatewayResult<Vec<AirQualityReading>> {
        let body = get_text(&self.http, &self.batch_url(coordinates)).await?;
        parse_batch(&body, coordinates)
    }
}

fn parse_current(body: &str, coordinate: Coordinate) -> GatewayResult<AirQualityReading> {
    let response: CurrentResponse = serde_json::from_str(body)?;
    let current = response
        .current
        .ok_or_else(|| GatewayError::Parse("response has no current block".to_string()))?;
    Ok(to_reading(coordinate, current, response.utc_offset_seconds))
}

/// The service answers a multi-point request with an array in input order,
/// but a single point comes back as a bare object.
fn parse_batch(body: &str, coordinates: &[Coordinate]) -> GatewayResult<Vec<AirQualityReading>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let responses: Vec<CurrentResponse> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    if responses.len() != coordinates.len() {
        return Err(GatewayError::Parse(format!(
            "expected {} results, got {}",
            coordinates.len(),
            responses.len()
        )));
    }

    Ok(coordinates
        .iter()
        .zip(responses)
        .map(|(coordinate, response)| match response.current {
            Some(current) => to_reading(*coordinate, current, response.utc_offset_seconds),
            None => AirQualityReading::live(*coordinate, None, Pollutants::default(), None),
        })
        .collect())
}

fn to_reading(
    coordinate: Coordinate,
    current: CurrentValues,
    utc_offset_seconds: Option<i32>,
) -> AirQualityReading {
    AirQualityReading::live(
        coordinate,
        current.european_aqi.map(|v| v.round() as i32),
        Pollutants {
            pm10: current.pm10,
            pm2_5: current.pm2_5,
            carbon_monoxide: current.carbon_monoxide,
            nitrogen_dioxide: current.nitrogen_dioxide,
            sulphur_dioxide: current.sulphur_dioxide,
            ozone: current.ozone,
        },
        current
            .time
            .as_deref()
            .and_then(|time| parse_time(time, utc_offset_seconds.unwrap_or(0))),
    )
}

/// Local ISO-8601 time as returned with `timezone=auto`, e.g. `2024-05-01T14:00`,
/// shifted back to UTC by the response's `utc_offset_seconds`.
fn parse_time(value: &str, utc_offset_seconds: i32) -> Option<DateTime<Utc>> {
    let local = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    local
        .checked_sub_signed(TimeDelta::seconds(i64::from(utc_offset_seconds)))
        .map(|utc| utc.and_utc())
}
