// Geocoding repository - City search and reverse lookup
use crate::application::repository::{GatewayResult, GeocodingRepository};
use crate::domain::location::{Coordinate, compose_place_name};
use crate::domain::search::SearchCandidate;
use crate::infrastructure::http_client::get_text;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    search_url: String,
    reverse_url: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    locality: Option<String>,
}

impl GeocodingClient {
    pub fn new(http: reqwest::Client, search_url: String, reverse_url: String, language: String) -> Self {
        Self {
            http,
            search_url: search_url.trim_end_matches('/').to_string(),
            reverse_url: reverse_url.trim_end_matches('/').to_string(),
            language,
        }
    }

    fn build_search_url(&self, query: &str, count: usize) -> String {
        format!(
            "{}?name={}&count={}&language={}&format=json",
            self.search_url,
            urlencoding::encode(query),
            count,
            urlencoding::encode(&self.language)
        )
    }

    fn build_reverse_url(&self, coordinate: Coordinate) -> String {
        format!(
            "{}?latitude={}&longitude={}&localityLanguage={}",
            self.reverse_url,
            coordinate.latitude,
            coordinate.longitude,
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl GeocodingRepository for GeocodingClient {
    async fn search(&self, query: &str, count: usize) -> GatewayResult<Vec<SearchCandidate>> {
        let body = get_text(&self.http, &self.build_search_url(query, count)).await?;
        parse_search(&body)
    }

    async fn reverse_lookup(&self, coordinate: Coordinate) -> GatewayResult<Option<String>> {
        let body = get_text(&self.http, &self.build_reverse_url(coordinate)).await?;
        let response: ReverseResponse = serde_json::from_str(&body)?;
        Ok(compose_place_name(
            response.locality.as_deref(),
            response.city.as_deref(),
        ))
    }
}

/// A response without `results` means no match.
fn parse_search(body: &str) -> GatewayResult<Vec<SearchCandidate>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|r| SearchCandidate {
            display_name: r.name,
            coordinate: Coordinate::new(r.latitude, r.longitude),
            country_code: r.country_code.unwrap_or_default(),
            region: r.admin1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::air_quality::ErrorKind;

    fn client() -> GeocodingClient {
        GeocodingClient::new(
            reqwest::Client::new(),
            "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            "https://api.bigdatacloud.net/data/reverse-geocode-client".to_string(),
            "en".to_string(),
        )
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            client().build_search_url("São Paulo", 5),
            "https://geocoding-api.open-meteo.com/v1/search?name=S%C3%A3o%20Paulo&count=5&language=en&format=json"
        );
    }

    #[test]
    fn test_reverse_url() {
        assert_eq!(
            client().build_reverse_url(Coordinate::new(51.5074, -0.1278)),
            "https://api.bigdatacloud.net/data/reverse-geocode-client?latitude=51.5074&longitude=-0.1278&localityLanguage=en"
        );
    }

    #[test]
    fn test_parse_search() {
        let body = r#"{
            "results": [
                {"id": 2643743, "name": "London", "latitude": 51.50853, "longitude": -0.12574,
                 "country_code": "GB", "admin1": "England"},
                {"id": 6058560, "name": "London", "latitude": 42.98339, "longitude": -81.23304,
                 "country_code": "CA"}
            ],
            "generationtime_ms": 0.5
        }"#;

        let candidates = parse_search(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].coordinate, Coordinate::new(51.50853, -0.12574));
        assert_eq!(candidates[0].region.as_deref(), Some("England"));
        assert_eq!(candidates[1].country_code, "CA");
        assert_eq!(candidates[1].region, None);
    }

    #[test]
    fn test_parse_search_without_results() {
        assert!(parse_search(r#"{"generationtime_ms": 0.2}"#).unwrap().is_empty());
        assert_eq!(parse_search("not json").unwrap_err().kind(), ErrorKind::ParseFailure);
    }
}
