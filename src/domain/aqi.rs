// European AQI classification and display metadata
use serde::Serialize;

/// Five-level scale derived from the European AQI, plus a neutral level for
/// readings that carry no index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

/// Color used to render a level: hex for markers, class token for badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorToken {
    pub hex: &'static str,
    pub css_class: &'static str,
}

pub fn classify(aqi: Option<i32>) -> AqiLevel {
    match aqi {
        None => AqiLevel::Unknown,
        Some(v) if v <= 20 => AqiLevel::Good,
        Some(v) if v <= 40 => AqiLevel::Fair,
        Some(v) if v <= 60 => AqiLevel::Moderate,
        Some(v) if v <= 80 => AqiLevel::Poor,
        Some(_) => AqiLevel::VeryPoor,
    }
}

impl AqiLevel {
    /// Position on the 1..=5 scale; `None` for `Unknown`.
    pub fn ordinal(self) -> Option<u8> {
        match self {
            AqiLevel::Good => Some(1),
            AqiLevel::Fair => Some(2),
            AqiLevel::Moderate => Some(3),
            AqiLevel::Poor => Some(4),
            AqiLevel::VeryPoor => Some(5),
            AqiLevel::Unknown => None,
        }
    }

    pub fn color(self) -> ColorToken {
        let (hex, css_class) = match self {
            AqiLevel::Good => ("#22c55e", "bg-green-500"),
            AqiLevel::Fair => ("#facc15", "bg-yellow-400"),
            AqiLevel::Moderate => ("#f97316", "bg-orange-500"),
            AqiLevel::Poor => ("#ef4444", "bg-red-500"),
            AqiLevel::VeryPoor => ("#9333ea", "bg-purple-600"),
            AqiLevel::Unknown => ("#9ca3af", "bg-gray-400"),
        };
        ColorToken { hex, css_class }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }
}
