// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod geocoding_repository;
pub mod http_client;
pub mod open_meteo_repository;
