// Domain layer - Value types and pure rules, no I/O
pub mod air_quality;
pub mod aqi;
pub mod heatmap;
pub mod location;
pub mod search;
pub mod session;
