// City search results
use super::location::Coordinate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCandidate {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub country_code: String,
    pub region: Option<String>,
}

impl SearchCandidate {
    /// Secondary line under the name, e.g. "England, GB".
    pub fn subtitle(&self) -> String {
        match &self.region {
            Some(region) if !region.is_empty() => format!("{}, {}", region, self.country_code),
            _ => self.country_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtitle() {
        let mut candidate = SearchCandidate {
            display_name: "London".to_string(),
            coordinate: Coordinate::new(51.50853, -0.12574),
            country_code: "GB".to_string(),
            region: Some("England".to_string()),
        };
        assert_eq!(candidate.subtitle(), "England, GB");

        candidate.region = None;
        assert_eq!(candidate.subtitle(), "GB");
    }
}
