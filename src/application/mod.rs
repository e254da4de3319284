// Application layer - Gateway, session orchestration and search
pub mod error;
pub mod gateway;
pub mod heatmap_cache;
pub mod location_session;
pub mod repository;
pub mod search_debouncer;

#[cfg(test)]
pub(crate) mod testing;
