use crate::application::search_debouncer::SearchSettings;
use crate::domain::location::{Coordinate, WellKnownPoint};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub endpoints: EndpointSettings,
    pub search: SearchConfig,
    pub session: SessionConfig,
    pub heatmap: HeatmapConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    /// Address the dashboard is reachable at, used in share links
    pub public_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EndpointSettings {
    pub air_quality_url: String,
    pub geocoding_url: String,
    pub reverse_geocoding_url: String,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub result_count: usize,
    pub language: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub default_location: Coordinate,
    pub default_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct HeatmapConfig {
    pub points: Vec<WellKnownPoint>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            air_quality_url: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            reverse_geocoding_url: "https://api.bigdatacloud.net/data/reverse-geocode-client"
                .to_string(),
            request_timeout_secs: None,
        }
    }
}

impl EndpointSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            min_query_len: 2,
            result_count: 5,
            language: "en".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_query_len: self.min_query_len,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_location: Coordinate::new(51.5074, -0.1278),
            default_name: "London".to_string(),
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        let points = [
            ("London", 51.5074, -0.1278),
            ("Paris", 48.8566, 2.3522),
            ("Berlin", 52.52, 13.405),
            ("Madrid", 40.4168, -3.7038),
            ("Rome", 41.9028, 12.4964),
            ("Moscow", 55.7558, 37.6173),
            ("Istanbul", 41.0082, 28.9784),
            ("Cairo", 30.0444, 31.2357),
            ("Lagos", 6.5244, 3.3792),
            ("Johannesburg", -26.2041, 28.0473),
            ("Dubai", 25.2048, 55.2708),
            ("Delhi", 28.6139, 77.209),
            ("Mumbai", 19.076, 72.8777),
            ("Beijing", 39.9042, 116.4074),
            ("Shanghai", 31.2304, 121.4737),
            ("Tokyo", 35.6762, 139.6503),
            ("Seoul", 37.5665, 126.978),
            ("Jakarta", -6.2088, 106.8456),
            ("Sydney", -33.8688, 151.2093),
            ("New York", 40.7128, -74.006),
            ("Los Angeles", 34.0522, -118.2437),
            ("Mexico City", 19.4326, -99.1332),
            ("Sao Paulo", -23.5505, -46.6333),
            ("Buenos Aires", -34.6037, -58.3816),
        ];
        Self {
            points: points
                .iter()
                .map(|(name, lat, lon)| WellKnownPoint::new(name, *lat, *lon))
                .collect(),
        }
    }
}

impl HeatmapConfig {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.points.iter().map(WellKnownPoint::coordinate).collect()
    }
}

/// Compiled-in defaults, then `config/dashboard.*` if present, then
/// `AQMAP__SECTION__KEY` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    layered(config::File::with_name("config/dashboard").required(false))
}

fn layered<S>(file: S) -> anyhow::Result<DashboardConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(config::Config::try_from(&DashboardConfig::default())?)
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("AQMAP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
