// Repository traits for the remote air quality and geocoding services
use super::error::GatewayError;
use crate::domain::air_quality::AirQualityReading;
use crate::domain::location::Coordinate;
use crate::domain::search::SearchCandidate;
use async_trait::async_trait;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait AirQualityRepository: Send + Sync {
    /// Current pollutant readings and index for one point
    async fn current(&self, coordinate: Coordinate) -> GatewayResult<AirQualityReading>;

    /// Current index for many points in one request, in input order
    async fn current_batch(&self, coordinates: &[Coordinate]) -> GatewayResult<Vec<AirQualityReading>>;
}

#[async_trait]
pub trait GeocodingRepository: Send + Sync {
    /// Places whose name starts with the query, server-ranked
    async fn search(&self, query: &str, count: usize) -> GatewayResult<Vec<SearchCandidate>>;

    /// Display name for a point, if the service knows one
    async fn reverse_lookup(&self, coordinate: Coordinate) -> GatewayResult<Option<String>>;
}
