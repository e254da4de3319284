// In-memory repositories for application tests
use super::error::GatewayError;
use super::repository::{AirQualityRepository, GatewayResult, GeocodingRepository};
use crate::domain::air_quality::{AirQualityReading, Pollutants};
use crate::domain::location::Coordinate;
use crate::domain::search::SearchCandidate;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct AirState {
    base_aqi: i32,
    numbered: bool,
    fail: bool,
    short_batch: bool,
    delay_by_point: Vec<(Coordinate, Duration)>,
    delay_by_call: VecDeque<Duration>,
    current_calls: usize,
    batch_calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeAirQuality {
    state: Arc<Mutex<AirState>>,
}

impl FakeAirQuality {
    pub fn with_aqi(aqi: i32) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().base_aqi = aqi;
        fake
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().fail = true;
        fake
    }

    pub fn short_batch() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().short_batch = true;
        fake
    }

    /// Point fetches return `base_aqi + call index`, so two fetches for the
    /// same coordinate can be told apart.
    pub fn numbered(self) -> Self {
        self.state.lock().unwrap().numbered = true;
        self
    }

    pub fn with_delay(self, coordinate: Coordinate, delay: Duration) -> Self {
        self.state
            .lock()
            .unwrap()
            .delay_by_point
            .push((coordinate, delay));
        self
    }

    /// Delays consumed by successive point fetches, ahead of per-point delays.
    pub fn with_call_delays(self, delays: &[Duration]) -> Self {
        self.state
            .lock()
            .unwrap()
            .delay_by_call
            .extend(delays.iter().copied());
        self
    }

    pub fn current_calls(&self) -> usize {
        self.state.lock().unwrap().current_calls
    }

    pub fn batch_calls(&self) -> usize {
        self.state.lock().unwrap().batch_calls
    }
}

#[async_trait]
impl AirQualityRepository for FakeAirQuality {
    async fn current(&self, coordinate: Coordinate) -> GatewayResult<AirQualityReading> {
        let (delay, fail, aqi) = {
            let mut state = self.state.lock().unwrap();
            let offset = if state.numbered { state.current_calls as i32 } else { 0 };
            state.current_calls += 1;
            let delay = state.delay_by_call.pop_front().or_else(|| {
                state
                    .delay_by_point
                    .iter()
                    .find(|(c, _)| *c == coordinate)
                    .map(|(_, d)| *d)
            });
            (delay, state.fail, state.base_aqi + offset)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(GatewayError::Network("connection refused".to_string()));
        }

        Ok(AirQualityReading::live(
            coordinate,
            Some(aqi),
            Pollutants {
                pm10: Some(12.0),
                pm2_5: Some(6.5),
                ..Pollutants::default()
            },
            None,
        ))
    }

    async fn current_batch(&self, coordinates: &[Coordinate]) -> GatewayResult<Vec<AirQualityReading>> {
        let (fail, short, aqi) = {
            let mut state = self.state.lock().unwrap();
            state.batch_calls += 1;
            (state.fail, state.short_batch, state.base_aqi)
        };

        if fail {
            return Err(GatewayError::Network("connection refused".to_string()));
        }

        let take = if short {
            coordinates.len().saturating_sub(1)
        } else {
            coordinates.len()
        };
        Ok(coordinates
            .iter()
            .take(take)
            .map(|c| AirQualityReading::live(*c, Some(aqi), Pollutants::default(), None))
            .collect())
    }
}

#[derive(Default)]
struct GeoState {
    fail: bool,
    places: Vec<SearchCandidate>,
    names: Vec<(Coordinate, String)>,
    delays: HashMap<String, Duration>,
    queries: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeGeocoding {
    state: Arc<Mutex<GeoState>>,
}

impl FakeGeocoding {
    pub fn failing() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().fail = true;
        fake
    }

    pub fn with_place(self, name: &str, coordinate: Coordinate) -> Self {
        self.state.lock().unwrap().places.push(SearchCandidate {
            display_name: name.to_string(),
            coordinate,
            country_code: "XX".to_string(),
            region: None,
        });
        self
    }

    /// Adds `count` places named "<prefix> 1", "<prefix> 2", ...
    pub fn with_places(mut self, prefix: &str, count: usize) -> Self {
        for i in 1..=count {
            self = self.with_place(&format!("{} {}", prefix, i), Coordinate::new(i as f64, 0.0));
        }
        self
    }

    pub fn with_name(self, coordinate: Coordinate, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .names
            .push((coordinate, name.to_string()));
        self
    }

    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(query.to_string(), delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl GeocodingRepository for FakeGeocoding {
    async fn search(&self, query: &str, _count: usize) -> GatewayResult<Vec<SearchCandidate>> {
        let (delay, fail, matches) = {
            let mut state = self.state.lock().unwrap();
            state.queries.push(query.to_string());
            let needle = query.to_lowercase();
            let matches: Vec<SearchCandidate> = state
                .places
                .iter()
                .filter(|p| p.display_name.to_lowercase().starts_with(&needle))
                .cloned()
                .collect();
            (state.delays.get(query).copied(), state.fail, matches)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(GatewayError::Network("connection refused".to_string()));
        }
        Ok(matches)
    }

    async fn reverse_lookup(&self, coordinate: Coordinate) -> GatewayResult<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.fail {
            return Err(GatewayError::Network("connection refused".to_string()));
        }
        Ok(state
            .names
            .iter()
            .find(|(c, _)| *c == coordinate)
            .map(|(_, n)| n.clone()))
    }
}
