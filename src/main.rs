// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use air_quality_map::application::gateway::AirQualityGateway;
use air_quality_map::application::heatmap_cache::HeatmapCache;
use air_quality_map::application::location_session::LocationSession;
use air_quality_map::application::search_debouncer::SearchDebouncer;
use air_quality_map::infrastructure::config::load_dashboard_config;
use air_quality_map::infrastructure::geocoding_repository::GeocodingClient;
use air_quality_map::infrastructure::http_client::build_client;
use air_quality_map::infrastructure::open_meteo_repository::OpenMeteoRepository;
use air_quality_map::presentation::app_state::AppState;
use air_quality_map::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repositories (infrastructure layer)
    let http = build_client(config.endpoints.request_timeout())?;
    let air_quality = Arc::new(OpenMeteoRepository::new(
        http.clone(),
        config.endpoints.air_quality_url.clone(),
    ));
    let geocoding = Arc::new(GeocodingClient::new(
        http,
        config.endpoints.geocoding_url.clone(),
        config.endpoints.reverse_geocoding_url.clone(),
        config.search.language.clone(),
    ));

    // Create services (application layer)
    let gateway = AirQualityGateway::new(air_quality, geocoding, config.search.result_count);
    let session = LocationSession::new(
        gateway.clone(),
        config.session.default_location,
        config.session.default_name.clone(),
    );
    let search = SearchDebouncer::new(gateway.clone(), config.search.settings());
    let heatmap = HeatmapCache::new(gateway);

    // Initial fetches: default location and the heatmap, once per session
    session.start();
    let heatmap_points = config.heatmap.coordinates();
    let heatmap_task = {
        let heatmap = heatmap.clone();
        tokio::spawn(async move {
            heatmap.refresh(&heatmap_points).await;
        })
    };

    let state = Arc::new(AppState {
        session: session.clone(),
        search: search.clone(),
        heatmap,
        heatmap_points: config.heatmap.points.clone(),
        public_url: config.server.public_url.clone(),
    });

    // Build router (presentation layer)
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!("Starting air-quality-map on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Tear down timers and outstanding fetches
    heatmap_task.abort();
    search.shutdown();
    session.shutdown();
    tracing::info!("Shut down");

    Ok(())
}
